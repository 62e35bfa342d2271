// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

use rekord_type::{Result, Value};

use crate::{error::SerializeError, machine::Endianness, registry::{BaseType, FieldType}};

pub(crate) fn write_float(bytes: &mut [u8], field_type: &FieldType, value: &Value) -> Result<()> {
	let v = match value {
		Value::Float(_) | Value::Int(_) | Value::Uint(_) | Value::BigInt(_) => value.to_f64(),
		_ => None,
	}
	.ok_or_else(|| SerializeError::TypeMismatch {
		type_name: field_type.to_string(),
		expected: "number",
		found: value.kind(),
	})?;

	let big = field_type.endianness == Endianness::Big;
	match field_type.base {
		BaseType::Float => {
			let v = v as f32;
			bytes.copy_from_slice(&if big {
				v.to_be_bytes()
			} else {
				v.to_le_bytes()
			});
		}
		_ => {
			bytes.copy_from_slice(&if big {
				v.to_be_bytes()
			} else {
				v.to_le_bytes()
			});
		}
	}
	Ok(())
}

pub(crate) fn read_float(bytes: &[u8], field_type: &FieldType) -> Value {
	let big = field_type.endianness == Endianness::Big;
	match field_type.base {
		BaseType::Float => {
			let mut raw = [0u8; 4];
			raw.copy_from_slice(&bytes[..4]);
			Value::Float(if big {
				f32::from_be_bytes(raw)
			} else {
				f32::from_le_bytes(raw)
			} as f64)
		}
		_ => {
			let mut raw = [0u8; 8];
			raw.copy_from_slice(&bytes[..8]);
			Value::Float(if big {
				f64::from_be_bytes(raw)
			} else {
				f64::from_le_bytes(raw)
			})
		}
	}
}

#[cfg(test)]
pub mod tests {
	use super::*;
	use crate::{machine::MachineParams, registry::lookup};

	fn ty(name: &str) -> FieldType {
		lookup(name, &MachineParams::native()).unwrap()
	}

	#[test]
	fn test_double_be() {
		let mut bytes = [0u8; 8];
		write_float(&mut bytes, &ty("double_be"), &Value::Float(1.0)).unwrap();
		assert_eq!(bytes, [0x3f, 0xf0, 0, 0, 0, 0, 0, 0]);
		assert_eq!(read_float(&bytes, &ty("double_be")), Value::Float(1.0));
	}

	#[test]
	fn test_float_narrows() {
		let mut bytes = [0u8; 4];
		write_float(&mut bytes, &ty("float_le"), &Value::Float(0.1)).unwrap();
		assert_eq!(read_float(&bytes, &ty("float_le")), Value::Float(0.1f32 as f64));
	}

	#[test]
	fn test_integer_input_is_accepted() {
		let mut bytes = [0u8; 8];
		write_float(&mut bytes, &ty("double"), &Value::Int(-3)).unwrap();
		assert_eq!(read_float(&bytes, &ty("double")), Value::Float(-3.0));
	}

	#[test]
	fn test_rejects_strings() {
		let mut bytes = [0u8; 8];
		let err = write_float(&mut bytes, &ty("double"), &Value::utf8("1.5")).unwrap_err();
		assert_eq!(err.code(), "SERIALIZE_001");
	}
}
