// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Rekord

use std::string::FromUtf8Error;

use super::Diagnostic;

pub fn utf8_conversion_error(err: FromUtf8Error) -> Diagnostic {
	Diagnostic {
		code: "CONVERSION_001".to_string(),
		message: format!("invalid UTF-8 sequence: {}", err),
		path: None,
		label: Some("bytes are not valid UTF-8".to_string()),
		help: Some("read the field as raw bytes or choose a different encoding".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn json_error(err: serde_json::Error) -> Diagnostic {
	Diagnostic {
		code: "CONVERSION_002".to_string(),
		message: format!("invalid JSON: {}", err),
		path: None,
		label: None,
		help: Some("check the JSON document at the reported line and column".to_string()),
		notes: vec![format!("line {}, column {}", err.line(), err.column())],
		cause: None,
	}
}

pub fn invalid_hex(input: &str) -> Diagnostic {
	Diagnostic {
		code: "CONVERSION_003".to_string(),
		message: format!("invalid hex string '{}'", input),
		path: None,
		label: None,
		help: Some("hex strings need an even number of digits 0-9, a-f".to_string()),
		notes: vec![],
		cause: None,
	}
}
