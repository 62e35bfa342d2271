// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Rekord

use std::{
	fmt::{Display, Formatter},
	ops::{Deref, DerefMut},
	string::FromUtf8Error,
};

pub mod diagnostic;
mod r#macro;

pub use diagnostic::{DefaultRenderer, Diagnostic, IntoDiagnostic};

#[derive(Debug, Clone, PartialEq)]
pub struct Error(pub Box<Diagnostic>);

impl Error {
	pub fn new(diagnostic: Diagnostic) -> Self {
		Self(Box::new(diagnostic))
	}

	pub fn diagnostic(self) -> Diagnostic {
		*self.0
	}

	pub fn code(&self) -> &str {
		&self.0.code
	}

	/// Attaches a field path to the diagnostic unless one is already set.
	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		if self.0.path.is_none() {
			self.0.path = Some(path.into());
		}
		self
	}
}

impl Deref for Error {
	type Target = Diagnostic;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl DerefMut for Error {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let out = DefaultRenderer::render_string(&self.0);
		f.write_str(out.as_str())
	}
}

impl std::error::Error for Error {}

impl From<Diagnostic> for Error {
	fn from(diagnostic: Diagnostic) -> Self {
		Error::new(diagnostic)
	}
}

impl From<FromUtf8Error> for Error {
	fn from(err: FromUtf8Error) -> Self {
		crate::error!(diagnostic::conversion::utf8_conversion_error(err))
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		crate::error!(diagnostic::conversion::json_error(err))
	}
}
