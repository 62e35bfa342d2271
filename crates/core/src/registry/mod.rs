// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

//! The type registry: canonical names, sizes and storage classes of every
//! field type a descriptor may use.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{
	error::LayoutError,
	machine::{Endianness, MachineParams},
};

mod name;

pub use name::parse_type_name;

/// Storage class of a field type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
	/// Constant byte size taken from the registry
	Fixed,
	/// Byte size supplied by the descriptor's `size`
	Variable,
	/// Two-word reference into the heap region
	Pointer,
	/// Expanded into its members at compile time, never stored
	Virtual,
}

/// Base types known to the registry, without byte order or pointer suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BaseType {
	Int8,
	Uint8,
	Bool,
	Int16,
	Uint16,
	Int32,
	Uint32,
	Int64,
	Uint64,
	Float,
	Double,
	/// Two's-complement integer of descriptor-defined width
	Int,
	/// Unsigned integer of descriptor-defined width
	Uint,
	/// Fixed-capacity character string
	CString,
	/// Fixed-capacity raw bytes
	Bytes,
	Record,
}

static BASES: [(&str, BaseType); 16] = [
	("int8", BaseType::Int8),
	("uint8", BaseType::Uint8),
	("bool", BaseType::Bool),
	("int16", BaseType::Int16),
	("uint16", BaseType::Uint16),
	("int32", BaseType::Int32),
	("uint32", BaseType::Uint32),
	("int64", BaseType::Int64),
	("uint64", BaseType::Uint64),
	("float", BaseType::Float),
	("double", BaseType::Double),
	("int", BaseType::Int),
	("uint", BaseType::Uint),
	("cstring", BaseType::CString),
	("bytes", BaseType::Bytes),
	("record", BaseType::Record),
];

impl BaseType {
	pub fn from_name(name: &str) -> Option<Self> {
		BASES.iter().find(|(n, _)| *n == name).map(|(_, base)| *base)
	}

	pub fn name(&self) -> &'static str {
		BASES.iter().find(|(_, base)| base == self).map(|(n, _)| *n).unwrap_or("unknown")
	}

	/// Registry size in bytes for fixed bases.
	pub const fn fixed_size(&self) -> Option<u32> {
		match self {
			BaseType::Int8 | BaseType::Uint8 | BaseType::Bool => Some(1),
			BaseType::Int16 | BaseType::Uint16 => Some(2),
			BaseType::Int32 | BaseType::Uint32 | BaseType::Float => Some(4),
			BaseType::Int64 | BaseType::Uint64 | BaseType::Double => Some(8),
			BaseType::Int | BaseType::Uint | BaseType::CString | BaseType::Bytes | BaseType::Record => None,
		}
	}

	pub const fn is_variable(&self) -> bool {
		matches!(self, BaseType::Int | BaseType::Uint | BaseType::CString | BaseType::Bytes)
	}

	pub const fn is_integer(&self) -> bool {
		matches!(
			self,
			BaseType::Int8
				| BaseType::Uint8
				| BaseType::Int16
				| BaseType::Uint16
				| BaseType::Int32
				| BaseType::Uint32
				| BaseType::Int64
				| BaseType::Uint64
				| BaseType::Int
				| BaseType::Uint
		)
	}

	pub const fn is_signed(&self) -> bool {
		matches!(self, BaseType::Int8 | BaseType::Int16 | BaseType::Int32 | BaseType::Int64 | BaseType::Int)
	}

	pub const fn is_float(&self) -> bool {
		matches!(self, BaseType::Float | BaseType::Double)
	}

	/// Bases whose in-memory representation depends on byte order.
	pub const fn is_numeric(&self) -> bool {
		self.is_integer() || self.is_float() || matches!(self, BaseType::Bool)
	}

	const fn ordinal(&self) -> u8 {
		match self {
			BaseType::Int8 => 0x01,
			BaseType::Uint8 => 0x02,
			BaseType::Bool => 0x03,
			BaseType::Int16 => 0x04,
			BaseType::Uint16 => 0x05,
			BaseType::Int32 => 0x06,
			BaseType::Uint32 => 0x07,
			BaseType::Int64 => 0x08,
			BaseType::Uint64 => 0x09,
			BaseType::Float => 0x0A,
			BaseType::Double => 0x0B,
			BaseType::Int => 0x0C,
			BaseType::Uint => 0x0D,
			BaseType::CString => 0x0E,
			BaseType::Bytes => 0x0F,
			BaseType::Record => 0x10,
		}
	}

	const fn from_ordinal(value: u8) -> Option<Self> {
		Some(match value {
			0x01 => BaseType::Int8,
			0x02 => BaseType::Uint8,
			0x03 => BaseType::Bool,
			0x04 => BaseType::Int16,
			0x05 => BaseType::Uint16,
			0x06 => BaseType::Int32,
			0x07 => BaseType::Uint32,
			0x08 => BaseType::Int64,
			0x09 => BaseType::Uint64,
			0x0A => BaseType::Float,
			0x0B => BaseType::Double,
			0x0C => BaseType::Int,
			0x0D => BaseType::Uint,
			0x0E => BaseType::CString,
			0x0F => BaseType::Bytes,
			0x10 => BaseType::Record,
			_ => return None,
		})
	}
}

const BIG_ENDIAN_FLAG: u8 = 0x20;
const POINTER_FLAG: u8 = 0x40;

/// A resolved registry entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldType {
	pub base: BaseType,
	/// Byte order of numeric payloads; `Little` for non-numeric bases
	pub endianness: Endianness,
	pub kind: FieldKind,
	/// Bytes occupied in the fixed region when the size does not come from
	/// the descriptor
	pub byte_size: Option<u32>,
}

impl FieldType {
	pub fn is_pointer(&self) -> bool {
		self.kind == FieldKind::Pointer
	}

	pub fn is_virtual(&self) -> bool {
		self.kind == FieldKind::Virtual
	}

	/// Size of one payload element behind a pointer.
	pub fn element_size(&self) -> u32 {
		self.base.fixed_size().unwrap_or(1)
	}

	/// The non-pointer counterpart, used to encode pointer payload elements.
	pub fn element(&self) -> FieldType {
		FieldType {
			base: self.base,
			endianness: self.endianness,
			kind: if self.base.is_variable() {
				FieldKind::Variable
			} else {
				FieldKind::Fixed
			},
			byte_size: self.base.fixed_size(),
		}
	}

	pub fn code(&self) -> TypeCode {
		let mut code = self.base.ordinal();
		if self.endianness == Endianness::Big {
			code |= BIG_ENDIAN_FLAG;
		}
		if self.is_pointer() {
			code |= POINTER_FLAG;
		}
		TypeCode(code)
	}
}

impl Display for FieldType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.base.name())?;
		if self.base.is_numeric() {
			write!(f, "_{}", self.endianness.suffix())?;
		}
		if self.is_pointer() {
			f.write_str("_p")?;
		}
		Ok(())
	}
}

/// Compact numeric identifier of a resolved field type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeCode(pub u8);

impl TypeCode {
	pub fn to_u8(&self) -> u8 {
		self.0
	}

	/// Reconstructs the field type for a code; pointer sizes need the
	/// machine the code was produced for.
	pub fn field_type(&self, machine: &MachineParams) -> Option<FieldType> {
		let base = BaseType::from_ordinal(self.0 & !(BIG_ENDIAN_FLAG | POINTER_FLAG))?;
		let endianness = if self.0 & BIG_ENDIAN_FLAG != 0 {
			Endianness::Big
		} else {
			Endianness::Little
		};
		resolve(base, endianness, self.0 & POINTER_FLAG != 0, machine)
	}
}

/// Looks up a type name such as `uint32_be`, `cstring_p` or `record`.
pub fn lookup(name: &str, machine: &MachineParams) -> Result<FieldType, LayoutError> {
	let unknown = || LayoutError::UnknownType {
		name: String::new(),
		type_name: name.to_string(),
	};

	let parsed = parse_type_name(name).ok_or_else(unknown)?;
	if parsed.endianness.is_some() && !parsed.base.is_numeric() {
		return Err(unknown());
	}

	let endianness = if parsed.base.is_numeric() {
		parsed.endianness.unwrap_or(machine.endianness)
	} else {
		Endianness::Little
	};

	resolve(parsed.base, endianness, parsed.pointer, machine).ok_or_else(unknown)
}

fn resolve(base: BaseType, endianness: Endianness, pointer: bool, machine: &MachineParams) -> Option<FieldType> {
	if pointer {
		if base == BaseType::Int || base == BaseType::Uint {
			return None;
		}
		return Some(FieldType {
			base,
			endianness,
			kind: FieldKind::Pointer,
			byte_size: Some(machine.pointer_size()),
		});
	}

	let kind = if base == BaseType::Record {
		FieldKind::Virtual
	} else if base.is_variable() {
		FieldKind::Variable
	} else {
		FieldKind::Fixed
	};

	Some(FieldType {
		base,
		endianness,
		kind,
		byte_size: base.fixed_size(),
	})
}

#[cfg(test)]
pub mod tests {
	use super::*;
	use crate::machine::WordWidth;

	const LE64: MachineParams = MachineParams::new(WordWidth::Eight, Endianness::Little);
	const BE32: MachineParams = MachineParams::new(WordWidth::Four, Endianness::Big);

	mod lookup {
		use super::*;

		#[test]
		fn test_fixed_types() {
			let t = lookup("int32", &LE64).unwrap();
			assert_eq!(t.kind, FieldKind::Fixed);
			assert_eq!(t.byte_size, Some(4));
			assert_eq!(t.endianness, Endianness::Little);

			let t = lookup("double", &LE64).unwrap();
			assert_eq!(t.byte_size, Some(8));
		}

		#[test]
		fn test_unsuffixed_resolves_to_machine_order() {
			assert_eq!(lookup("uint16", &BE32).unwrap().endianness, Endianness::Big);
			assert_eq!(lookup("uint16_le", &BE32).unwrap().endianness, Endianness::Little);
			assert_eq!(lookup("uint16_be", &LE64).unwrap().endianness, Endianness::Big);
		}

		#[test]
		fn test_variable_types() {
			let t = lookup("cstring", &LE64).unwrap();
			assert_eq!(t.kind, FieldKind::Variable);
			assert_eq!(t.byte_size, None);

			let t = lookup("uint_be", &LE64).unwrap();
			assert_eq!(t.kind, FieldKind::Variable);
			assert_eq!(t.endianness, Endianness::Big);
		}

		#[test]
		fn test_pointer_types_take_two_words() {
			let t = lookup("cstring_p", &LE64).unwrap();
			assert_eq!(t.kind, FieldKind::Pointer);
			assert_eq!(t.byte_size, Some(16));

			let t = lookup("int32_be_p", &BE32).unwrap();
			assert_eq!(t.byte_size, Some(8));
			assert_eq!(t.element_size(), 4);
			assert_eq!(t.endianness, Endianness::Big);
		}

		#[test]
		fn test_record_is_virtual() {
			assert_eq!(lookup("record", &LE64).unwrap().kind, FieldKind::Virtual);
			assert_eq!(lookup("record_p", &LE64).unwrap().kind, FieldKind::Pointer);
		}

		#[test]
		fn test_unknown() {
			for name in ["int7", "cstring_be", "record_le", "int_p", "", "_p", "int32_p_be", "INT32"] {
				assert!(
					matches!(lookup(name, &LE64), Err(LayoutError::UnknownType { .. })),
					"{name} should be unknown"
				);
			}
		}
	}

	mod code {
		use super::*;

		#[test]
		fn test_codes_are_distinct() {
			let names = ["int32", "int32_be", "int32_p", "int32_be_p", "uint32", "cstring", "cstring_p"];
			let mut codes: Vec<u8> = names.iter().map(|n| lookup(n, &LE64).unwrap().code().to_u8()).collect();
			codes.sort();
			codes.dedup();
			assert_eq!(codes.len(), names.len());
		}

		#[test]
		fn test_code_reconstructs_type() {
			for name in ["int8", "uint64_be", "double_le_p", "cstring_p", "bytes", "record_p"] {
				let t = lookup(name, &BE32).unwrap();
				assert_eq!(t.code().field_type(&BE32), Some(t), "{name}");
			}
			assert_eq!(TypeCode(0x1f).field_type(&LE64), None);
		}
	}

	#[test]
	fn test_display_is_canonical() {
		assert_eq!(lookup("int32", &LE64).unwrap().to_string(), "int32_le");
		assert_eq!(lookup("uint8_be_p", &LE64).unwrap().to_string(), "uint8_be_p");
		assert_eq!(lookup("cstring_p", &LE64).unwrap().to_string(), "cstring_p");
		assert_eq!(lookup("bytes", &LE64).unwrap().to_string(), "bytes");
	}
}
