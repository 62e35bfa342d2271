// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

use rekord_type::{Diagnostic, Error, IntoDiagnostic};

/// Errors raised while compiling a descriptor list into a layout. They are
/// never raised by serialization or access.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
	#[error("field '{name}' has unknown type '{type_name}'")]
	UnknownType {
		name: String,
		type_name: String,
	},

	#[error("field '{name}' has invalid array size in '{spec}'")]
	InvalidArraySize {
		name: String,
		spec: String,
	},

	#[error("record field '{name}' has no definition")]
	IncompleteRecord {
		name: String,
	},

	#[error("field '{name}' of type '{type_name}' has invalid size: {reason}")]
	InvalidSize {
		name: String,
		type_name: String,
		reason: String,
	},

	#[error("duplicate field '{path}'")]
	DuplicateField {
		path: String,
	},

	#[error("unsupported word width {width}")]
	InvalidWordWidth {
		width: u32,
	},
}

impl IntoDiagnostic for LayoutError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			LayoutError::UnknownType {
				name,
				type_name,
			} => Diagnostic {
				code: "LAYOUT_001".to_string(),
				message: format!("field '{}' has unknown type '{}'", name, type_name),
				path: None,
				label: Some("type is not in the registry".to_string()),
				help: Some(
					"use a registered base such as int32, uint64, double, cstring or record, optionally followed by _be/_le and _p".to_string(),
				),
				notes: vec!["type grammar: base(_be|_le)?(_p)?([N])?".to_string()],
				cause: None,
			},

			LayoutError::InvalidArraySize {
				name,
				spec,
			} => Diagnostic {
				code: "LAYOUT_002".to_string(),
				message: format!("field '{}' has invalid array size in '{}'", name, spec),
				path: None,
				label: Some("array count must be a positive integer".to_string()),
				help: Some("write the count as digits, e.g. 'int8[4]'".to_string()),
				notes: vec![],
				cause: None,
			},

			LayoutError::IncompleteRecord {
				name,
			} => Diagnostic {
				code: "LAYOUT_003".to_string(),
				message: format!("record field '{}' has no definition", name),
				path: None,
				label: Some("missing 'def'".to_string()),
				help: Some("add a 'def' list with the record's member descriptors".to_string()),
				notes: vec![],
				cause: None,
			},

			LayoutError::InvalidSize {
				name,
				type_name,
				reason,
			} => Diagnostic {
				code: "LAYOUT_004".to_string(),
				message: format!("field '{}' of type '{}' has invalid size: {}", name, type_name, reason),
				path: None,
				label: Some("size must be a positive integer".to_string()),
				help: Some(format!("variable-size type '{}' needs a 'size' in bytes", type_name)),
				notes: vec![],
				cause: None,
			},

			LayoutError::DuplicateField {
				path,
			} => Diagnostic {
				code: "LAYOUT_005".to_string(),
				message: format!("duplicate field '{}'", path),
				path: Some(path),
				label: Some("full path already defined".to_string()),
				help: Some("rename one of the fields".to_string()),
				notes: vec![],
				cause: None,
			},

			LayoutError::InvalidWordWidth {
				width,
			} => Diagnostic {
				code: "LAYOUT_006".to_string(),
				message: format!("unsupported word width {}", width),
				path: None,
				label: None,
				help: Some("word width must be 4 or 8 bytes".to_string()),
				notes: vec![],
				cause: None,
			},
		}
	}
}

impl From<LayoutError> for Error {
	fn from(err: LayoutError) -> Self {
		Error::new(err.into_diagnostic())
	}
}
