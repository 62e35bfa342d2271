// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

use rekord_type::{Encoding, Result, Value};

use crate::{error::SerializeError, registry::FieldType};

/// Writes a string or blob into a fixed-capacity region, truncating to the
/// region. Bytes past the written prefix are left as they are.
pub(crate) fn write_fixed(bytes: &mut [u8], field_type: &FieldType, value: &Value, encoding: Encoding) -> Result<usize> {
	let encoded = payload_bytes(field_type, value, encoding, bytes.len())?;
	bytes[..encoded.len()].copy_from_slice(&encoded);
	Ok(encoded.len())
}

/// Bytes of a string-like value, at most `limit` of them.
pub(crate) fn payload_bytes(field_type: &FieldType, value: &Value, encoding: Encoding, limit: usize) -> Result<Vec<u8>> {
	match value {
		Value::Utf8(s) => Ok(encoding.encode_bounded(s, limit)),
		Value::Blob(b) => Ok(b[..b.len().min(limit)].to_vec()),
		other => Err(SerializeError::TypeMismatch {
			type_name: field_type.to_string(),
			expected: "string or blob",
			found: other.kind(),
		}
		.into()),
	}
}
