// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

pub mod native;
pub mod tempdir;
