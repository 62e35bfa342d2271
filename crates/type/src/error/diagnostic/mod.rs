// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Rekord

use serde::{Deserialize, Serialize};

pub mod conversion;
mod render;

pub use render::{DefaultRenderer, DiagnosticRenderer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: String,
	pub message: String,
	/// Dotted path of the field the diagnostic refers to, e.g. `.header.len`
	pub path: Option<String>,
	pub label: Option<String>,
	pub help: Option<String>,
	pub notes: Vec<String>,
	pub cause: Option<Box<Diagnostic>>,
}

impl Diagnostic {
	pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			code: code.into(),
			message: message.into(),
			path: None,
			label: None,
			help: None,
			notes: vec![],
			cause: None,
		}
	}

	/// Walks the cause chain and returns the innermost diagnostic.
	pub fn root_cause(&self) -> &Diagnostic {
		let mut current = self;
		while let Some(cause) = &current.cause {
			current = cause;
		}
		current
	}
}

pub trait IntoDiagnostic {
	fn into_diagnostic(self) -> Diagnostic;
}

impl IntoDiagnostic for Diagnostic {
	fn into_diagnostic(self) -> Diagnostic {
		self
	}
}
