// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

use rekord_type::{Diagnostic, Error, IntoDiagnostic};

/// Errors raised by path-addressed access before the buffer is touched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccessError {
	#[error("field '{path}' not found")]
	NotFound {
		path: String,
	},

	#[error("field '{path}' of type '{type_name}' is not a string")]
	NotAString {
		path: String,
		type_name: String,
	},

	#[error("cannot write to pointer field '{path}'")]
	CannotWriteToPointer {
		path: String,
	},

	#[error("writer not supported for pointer field '{path}'")]
	WriterNotSupportedForPointer {
		path: String,
	},

	#[error("field '{path}' reaches byte {end} of a {buffer_len} byte buffer")]
	OutOfBounds {
		path: String,
		end: usize,
		buffer_len: usize,
	},

	#[error("payload of '{path}' is {len} bytes, not a multiple of {elem_size}")]
	TruncatedPayload {
		path: String,
		len: usize,
		elem_size: usize,
	},
}

impl IntoDiagnostic for AccessError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			AccessError::NotFound {
				path,
			} => Diagnostic {
				code: "ACCESS_001".to_string(),
				message: format!("field '{}' not found", path),
				path: Some(path),
				label: Some("no compiled field has this path".to_string()),
				help: Some("paths start with a dot and use name[idx] for record array elements, e.g. '.a.b[0].c'".to_string()),
				notes: vec![],
				cause: None,
			},

			AccessError::NotAString {
				path,
				type_name,
			} => Diagnostic {
				code: "ACCESS_002".to_string(),
				message: format!("field '{}' of type '{}' is not a string", path, type_name),
				path: Some(path),
				label: None,
				help: Some("string access works on single cstring and cstring_p fields; read arrays with read_value".to_string()),
				notes: vec![],
				cause: None,
			},

			AccessError::CannotWriteToPointer {
				path,
			} => Diagnostic {
				code: "ACCESS_003".to_string(),
				message: format!("cannot write to pointer field '{}'", path),
				path: Some(path),
				label: Some("pointer payloads live on the heap".to_string()),
				help: Some("pointer fields are written by a full serialize of the record".to_string()),
				notes: vec![],
				cause: None,
			},

			AccessError::WriterNotSupportedForPointer {
				path,
			} => Diagnostic {
				code: "ACCESS_004".to_string(),
				message: format!("writer not supported for pointer field '{}'", path),
				path: Some(path),
				label: None,
				help: Some("create a reader instead, or serialize the whole record".to_string()),
				notes: vec![],
				cause: None,
			},

			AccessError::OutOfBounds {
				path,
				end,
				buffer_len,
			} => Diagnostic {
				code: "ACCESS_005".to_string(),
				message: format!("field '{}' reaches byte {} of a {} byte buffer", path, end, buffer_len),
				path: Some(path),
				label: Some("buffer is too short for the layout".to_string()),
				help: Some("the buffer was not produced for this layout or was truncated".to_string()),
				notes: vec![],
				cause: None,
			},

			AccessError::TruncatedPayload {
				path,
				len,
				elem_size,
			} => Diagnostic {
				code: "ACCESS_006".to_string(),
				message: format!("payload of '{}' is {} bytes, not a multiple of {}", path, len, elem_size),
				path: Some(path),
				label: Some("reference length splits an element".to_string()),
				help: Some("the reference was not written by this layout or the buffer is corrupt".to_string()),
				notes: vec![],
				cause: None,
			},
		}
	}
}

impl From<AccessError> for Error {
	fn from(err: AccessError) -> Self {
		Error::new(err.into_diagnostic())
	}
}
