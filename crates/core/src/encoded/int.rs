// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

use num_bigint::{BigInt, Sign};
use rekord_type::{Result, Value};

use crate::{error::SerializeError, machine::Endianness, registry::FieldType};

/// Writes an integer of `bytes.len()` bytes. Widths up to 8 bytes go through
/// `i128`, wider ones through `BigInt`.
pub(crate) fn write_int(bytes: &mut [u8], field_type: &FieldType, value: &Value) -> Result<()> {
	if !value.is_integer() && !matches!(value, Value::Boolean(_)) {
		return Err(mismatch(field_type, value));
	}

	let width = bytes.len();
	if width <= 8 {
		let v = value.to_i128().ok_or_else(|| out_of_range(field_type, value))?;
		let bits = (width * 8) as u32;
		let (min, max) = if field_type.base.is_signed() {
			(-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)
		} else {
			(0, (1i128 << bits) - 1)
		};
		if v < min || v > max {
			return Err(out_of_range(field_type, value));
		}
		bytes.copy_from_slice(&v.to_le_bytes()[..width]);
	} else {
		let v = value.to_bigint().ok_or_else(|| mismatch(field_type, value))?;
		let (le, fill) = if field_type.base.is_signed() {
			let fill = if v.sign() == Sign::Minus {
				0xff
			} else {
				0x00
			};
			(v.to_signed_bytes_le(), fill)
		} else {
			if v.sign() == Sign::Minus {
				return Err(out_of_range(field_type, value));
			}
			(v.to_bytes_le().1, 0x00)
		};
		if le.len() > width {
			return Err(out_of_range(field_type, value));
		}
		bytes[..le.len()].copy_from_slice(&le);
		bytes[le.len()..].fill(fill);
	}

	if field_type.endianness == Endianness::Big {
		bytes.reverse();
	}
	Ok(())
}

pub(crate) fn read_int(bytes: &[u8], field_type: &FieldType) -> Value {
	let mut le = bytes.to_vec();
	if field_type.endianness == Endianness::Big {
		le.reverse();
	}

	let signed = field_type.base.is_signed();
	if le.len() > 8 {
		return Value::BigInt(if signed {
			BigInt::from_signed_bytes_le(&le)
		} else {
			BigInt::from_bytes_le(Sign::Plus, &le)
		});
	}

	let mut raw = [0u8; 8];
	raw[..le.len()].copy_from_slice(&le);
	let raw = u64::from_le_bytes(raw);

	if signed {
		let shift = 64 - 8 * le.len() as u32;
		Value::Int(((raw << shift) as i64) >> shift)
	} else {
		Value::Uint(raw)
	}
}

fn mismatch(field_type: &FieldType, value: &Value) -> rekord_type::Error {
	SerializeError::TypeMismatch {
		type_name: field_type.to_string(),
		expected: "integer",
		found: value.kind(),
	}
	.into()
}

fn out_of_range(field_type: &FieldType, value: &Value) -> rekord_type::Error {
	SerializeError::ValueOutOfRange {
		type_name: field_type.to_string(),
		value: value.to_string(),
	}
	.into()
}
