// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Rekord

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod error;
pub mod util;
pub mod value;

pub use error::{Diagnostic, Error, IntoDiagnostic};
pub use value::{Encoding, Value};

pub type Result<T> = std::result::Result<T, Error>;
