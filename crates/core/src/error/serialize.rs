// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

use rekord_type::{Diagnostic, Error, IntoDiagnostic};

/// Errors raised while writing values into a buffer. The buffer may hold
/// partial writes when one of these is returned from `serialize`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SerializeError {
	#[error("cannot write {found} into {type_name}, expected {expected}")]
	TypeMismatch {
		type_name: String,
		expected: &'static str,
		found: &'static str,
	},

	#[error("value {value} is out of range for {type_name}")]
	ValueOutOfRange {
		type_name: String,
		value: String,
	},

	#[error("array of {len} elements does not fit {capacity} slots")]
	ArrayTooLong {
		capacity: u32,
		len: usize,
	},

	#[error("cannot resolve '{segment}': expected {expected}, found {found}")]
	Resolution {
		segment: String,
		expected: &'static str,
		found: &'static str,
	},

	#[error("buffer of {available} bytes is too small, {required} bytes required")]
	BufferTooSmall {
		required: usize,
		available: usize,
	},

	#[error("failed to serialize field '{path}'")]
	Field {
		path: String,
		cause: Box<Diagnostic>,
	},
}

impl SerializeError {
	/// Wraps an error raised while writing `path`.
	pub fn field(path: impl Into<String>, cause: Error) -> Self {
		SerializeError::Field {
			path: path.into(),
			cause: cause.0,
		}
	}
}

impl IntoDiagnostic for SerializeError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			SerializeError::TypeMismatch {
				type_name,
				expected,
				found,
			} => Diagnostic {
				code: "SERIALIZE_001".to_string(),
				message: format!("cannot write {} into {}, expected {}", found, type_name, expected),
				path: None,
				label: Some("value kind does not match the field type".to_string()),
				help: None,
				notes: vec![],
				cause: None,
			},

			SerializeError::ValueOutOfRange {
				type_name,
				value,
			} => Diagnostic {
				code: "SERIALIZE_002".to_string(),
				message: format!("value {} is out of range for {}", value, type_name),
				path: None,
				label: Some("value does not fit the field width".to_string()),
				help: Some("use a wider type or clamp the value".to_string()),
				notes: vec![],
				cause: None,
			},

			SerializeError::ArrayTooLong {
				capacity,
				len,
			} => Diagnostic {
				code: "SERIALIZE_003".to_string(),
				message: format!("array of {} elements does not fit {} slots", len, capacity),
				path: None,
				label: None,
				help: Some("shorter arrays are allowed, longer ones are not".to_string()),
				notes: vec![],
				cause: None,
			},

			SerializeError::Resolution {
				segment,
				expected,
				found,
			} => Diagnostic {
				code: "SERIALIZE_004".to_string(),
				message: format!("cannot resolve '{}': expected {}, found {}", segment, expected, found),
				path: None,
				label: Some("value tree does not follow the layout".to_string()),
				help: None,
				notes: vec![],
				cause: None,
			},

			SerializeError::BufferTooSmall {
				required,
				available,
			} => Diagnostic {
				code: "SERIALIZE_005".to_string(),
				message: format!("buffer of {} bytes is too small, {} bytes required", available, required),
				path: None,
				label: None,
				help: Some("allocate the buffer with the heap size computed for this value".to_string()),
				notes: vec![],
				cause: None,
			},

			SerializeError::Field {
				path,
				cause,
			} => Diagnostic {
				code: "SERIALIZE_006".to_string(),
				message: format!("failed to serialize field '{}'", path),
				path: Some(path),
				label: None,
				help: None,
				notes: vec!["the buffer may hold partial writes and should be discarded".to_string()],
				cause: Some(cause),
			},
		}
	}
}

impl From<SerializeError> for Error {
	fn from(err: SerializeError) -> Self {
		Error::new(err.into_diagnostic())
	}
}
