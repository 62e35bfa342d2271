// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

//! Byte-level codecs for single field elements.

use rekord_type::{Encoding, Result, Value};

use crate::{
	error::SerializeError,
	registry::{BaseType, FieldType},
};

mod buffer;
mod float;
mod int;
mod pointer;
mod string;

pub use buffer::RecordBuffer;
pub use pointer::{Reference, read_reference, write_reference};
pub(crate) use string::payload_bytes;

/// Writes one non-pointer element into `bytes`, which spans exactly the
/// element.
pub(crate) fn write_element(bytes: &mut [u8], field_type: &FieldType, value: &Value, encoding: Encoding) -> Result<()> {
	match field_type.base {
		BaseType::Bool => write_bool(bytes, field_type, value),
		BaseType::Float | BaseType::Double => float::write_float(bytes, field_type, value),
		BaseType::CString | BaseType::Bytes => string::write_fixed(bytes, field_type, value, encoding).map(|_| ()),
		BaseType::Record => Err(SerializeError::TypeMismatch {
			type_name: field_type.to_string(),
			expected: "pointer payload",
			found: value.kind(),
		}
		.into()),
		_ => int::write_int(bytes, field_type, value),
	}
}

/// Reads one non-pointer element. Fixed strings come back as raw bytes.
pub(crate) fn read_element(bytes: &[u8], field_type: &FieldType) -> Value {
	match field_type.base {
		BaseType::Bool => Value::Boolean(bytes.iter().any(|&b| b != 0)),
		BaseType::Float | BaseType::Double => float::read_float(bytes, field_type),
		BaseType::CString | BaseType::Bytes | BaseType::Record => Value::Blob(bytes.to_vec()),
		_ => int::read_int(bytes, field_type),
	}
}

fn write_bool(bytes: &mut [u8], field_type: &FieldType, value: &Value) -> Result<()> {
	let flag = match value {
		Value::Boolean(b) => *b,
		v if v.is_integer() => match v.to_i128() {
			Some(0) => false,
			Some(1) => true,
			_ => {
				return Err(SerializeError::ValueOutOfRange {
					type_name: field_type.to_string(),
					value: v.to_string(),
				}
				.into());
			}
		},
		other => {
			return Err(SerializeError::TypeMismatch {
				type_name: field_type.to_string(),
				expected: "boolean",
				found: other.kind(),
			}
			.into());
		}
	};
	bytes.fill(0);
	bytes[0] = flag as u8;
	Ok(())
}
