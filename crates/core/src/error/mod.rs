// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

mod access;
mod layout;
mod serialize;

pub use access::AccessError;
pub use layout::LayoutError;
pub use serialize::SerializeError;
