// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

//! The two-region buffer model: a fixed region of `total_fixed_size` bytes
//! followed by a heap holding the payloads of pointer fields.

use rekord_type::{Encoding, Result, Value};
use tracing::instrument;

use crate::{
	deserialize::deserialize,
	encoded::{RecordBuffer, payload_bytes, read_element, write_element},
	error::{AccessError, SerializeError},
	layout::{CompiledField, CompiledLayout},
	path::{FieldPath, PathSegment},
	registry::BaseType,
	serialize::serialize_with,
};

/// Heap bytes needed to serialize `value`, strings encoded as UTF-8.
pub fn heap_size(layout: &CompiledLayout, value: &Value) -> usize {
	heap_size_with(layout, value, Encoding::Utf8)
}

/// Heap bytes needed to serialize `value` with `encoding`. Values that do
/// not resolve against the layout contribute nothing; the serializer
/// reports them.
#[instrument(name = "memory::heap_size", level = "trace", skip(layout, value))]
pub fn heap_size_with(layout: &CompiledLayout, value: &Value, encoding: Encoding) -> usize {
	let mut total = 0;
	for field in layout.fields.iter().filter(|f| f.is_pointer()) {
		let Ok(Some(node)) = resolve(value, &field.path) else {
			continue;
		};
		let Ok(slots) = slot_values(field, node) else {
			continue;
		};
		for slot in slots.into_iter().flatten() {
			if let Some(len) = payload_len(field, slot, encoding) {
				total += layout.heap_slot(len);
			}
		}
	}
	total
}

/// A zero-filled buffer for `layout` with `heap_size` heap bytes.
pub fn allocate(layout: &CompiledLayout, heap_size: usize) -> RecordBuffer {
	RecordBuffer::zeroed(layout.total_fixed_size as usize, heap_size)
}

/// Sizes, allocates and serializes `value` in one call.
pub fn encode(layout: &CompiledLayout, value: &Value) -> Result<RecordBuffer> {
	encode_with(layout, value, Encoding::Utf8)
}

pub fn encode_with(layout: &CompiledLayout, value: &Value, encoding: Encoding) -> Result<RecordBuffer> {
	let mut buffer = allocate(layout, heap_size_with(layout, value, encoding));
	serialize_with(layout, &mut buffer, value, encoding)?;
	Ok(buffer)
}

/// Finds the node addressed by `path`. Absent members, absent array
/// elements and null leaves resolve to `None`; an intermediate node of the
/// wrong kind is an error.
pub(crate) fn resolve<'v>(root: &'v Value, path: &FieldPath) -> Result<Option<&'v Value>> {
	let mut current = root;
	for segment in path.segments() {
		let members = match current {
			Value::Null => return Ok(None),
			Value::Record(members) => members,
			other => {
				return Err(SerializeError::Resolution {
					segment: segment.to_string(),
					expected: "record",
					found: other.kind(),
				}
				.into());
			}
		};

		let Some(member) = members.get(segment.name()) else {
			return Ok(None);
		};

		current = match segment {
			PathSegment::Field(_) => member,
			PathSegment::Index(_, idx) => match member {
				Value::Null => return Ok(None),
				Value::Array(items) => match items.get(*idx as usize) {
					Some(item) => item,
					None => return Ok(None),
				},
				other => {
					return Err(SerializeError::Resolution {
						segment: segment.to_string(),
						expected: "array",
						found: other.kind(),
					}
					.into());
				}
			},
		};
	}

	Ok(if current.is_null() {
		None
	} else {
		Some(current)
	})
}

/// Splits a field value into one optional value per stored slot.
pub(crate) fn slot_values<'v>(field: &CompiledField, value: &'v Value) -> Result<Vec<Option<&'v Value>>> {
	if !field.is_array() {
		return Ok(vec![Some(value)]);
	}

	let Value::Array(items) = value else {
		return Err(SerializeError::TypeMismatch {
			type_name: format!("{}[{}]", field.field_type, field.array_count),
			expected: "array",
			found: value.kind(),
		}
		.into());
	};

	if items.len() > field.array_count as usize {
		return Err(SerializeError::ArrayTooLong {
			capacity: field.array_count,
			len: items.len(),
		}
		.into());
	}

	let mut slots: Vec<Option<&Value>> = items.iter().map(|item| (!item.is_null()).then_some(item)).collect();
	slots.resize(field.array_count as usize, None);
	Ok(slots)
}

fn payload_len(field: &CompiledField, value: &Value, encoding: Encoding) -> Option<usize> {
	match (field.field_type.base, value) {
		(_, Value::Null) => None,
		(BaseType::CString | BaseType::Bytes, Value::Utf8(s)) => Some(encoding.encode(s).len()),
		(_, Value::Blob(b)) => Some(b.len()),
		(BaseType::Record, Value::Record(_)) => {
			let nested = field.nested.as_ref()?;
			Some(nested.total_fixed_size as usize + heap_size_with(nested, value, encoding))
		}
		(_, Value::Array(items)) if field.field_type.base.is_numeric() => {
			Some(items.len() * field.field_type.element_size() as usize)
		}
		_ => None,
	}
}

/// Encodes the heap payload of one pointer slot.
pub(crate) fn encode_payload(field: &CompiledField, value: &Value, encoding: Encoding) -> Result<Vec<u8>> {
	let field_type = &field.field_type;
	match field_type.base {
		BaseType::CString | BaseType::Bytes => payload_bytes(field_type, value, encoding, usize::MAX),
		BaseType::Record => match (value, field.nested.as_ref()) {
			(Value::Blob(bytes), _) => Ok(bytes.clone()),
			(Value::Record(_), Some(nested)) => Ok(encode_with(nested, value, encoding)?.into_vec()),
			(other, nested) => Err(SerializeError::TypeMismatch {
				type_name: field_type.to_string(),
				expected: if nested.is_some() {
					"record or blob"
				} else {
					"blob"
				},
				found: other.kind(),
			}
			.into()),
		},
		_ => {
			let Value::Array(items) = value else {
				return Err(SerializeError::TypeMismatch {
					type_name: field_type.to_string(),
					expected: "array",
					found: value.kind(),
				}
				.into());
			};

			let element = field_type.element();
			let size = field_type.element_size() as usize;
			let mut bytes = vec![0u8; items.len() * size];
			for (item, chunk) in items.iter().zip(bytes.chunks_exact_mut(size)) {
				if !item.is_null() {
					write_element(chunk, &element, item, encoding)?;
				}
			}
			Ok(bytes)
		}
	}
}

/// Decodes the heap payload of one pointer slot.
pub(crate) fn decode_payload(field: &CompiledField, bytes: &[u8]) -> Result<Value> {
	let field_type = &field.field_type;
	match field_type.base {
		BaseType::CString => Ok(Value::Utf8(String::from_utf8_lossy(bytes).into_owned())),
		BaseType::Bytes => Ok(Value::Blob(bytes.to_vec())),
		BaseType::Record => match field.nested.as_ref() {
			Some(nested) => deserialize(nested, bytes),
			None => Ok(Value::Blob(bytes.to_vec())),
		},
		_ => {
			let element = field_type.element();
			let size = field_type.element_size() as usize;
			if bytes.len() % size != 0 {
				return Err(AccessError::TruncatedPayload {
					path: field.full_path.clone(),
					len: bytes.len(),
					elem_size: size,
				}
				.into());
			}
			Ok(Value::Array(bytes.chunks_exact(size).map(|chunk| read_element(chunk, &element)).collect()))
		}
	}
}

#[cfg(test)]
pub mod tests {
	use super::*;
	use crate::{
		descriptor::FieldDescriptor,
		layout::{CompileOptions, compile},
		machine::{Endianness, MachineParams, WordWidth},
	};

	const LE64: MachineParams = MachineParams::new(WordWidth::Eight, Endianness::Little);

	fn layout(descriptors: &[FieldDescriptor], align: bool) -> CompiledLayout {
		compile(descriptors, CompileOptions::default().with_align(align).with_machine(LE64)).unwrap()
	}

	mod heap {
		use super::*;

		#[test]
		fn test_string_payload_rounds_to_word() {
			let layout = layout(&[FieldDescriptor::new("s", "cstring_p")], true);
			assert_eq!(heap_size(&layout, &Value::record([("s", Value::utf8("hello world!"))])), 16);
		}

		#[test]
		fn test_unaligned_is_exact() {
			let layout = layout(&[FieldDescriptor::new("s", "cstring_p")], false);
			assert_eq!(heap_size(&layout, &Value::record([("s", Value::utf8("hello world!"))])), 12);
		}

		#[test]
		fn test_null_and_absent_contribute_nothing() {
			let layout = layout(&[FieldDescriptor::new("s", "cstring_p"), FieldDescriptor::new("v", "int32_p")], true);
			assert_eq!(heap_size(&layout, &Value::record([("s", Value::Null)])), 0);
			assert_eq!(heap_size(&layout, &Value::empty_record()), 0);
		}

		#[test]
		fn test_numeric_array_payload() {
			let layout = layout(&[FieldDescriptor::new("v", "int16_p")], true);
			let value = Value::record([("v", Value::array([Value::Int(1), Value::Int(2), Value::Int(3)]))]);
			assert_eq!(heap_size(&layout, &value), 8);
		}

		#[test]
		fn test_nested_record_payload() {
			let layout = layout(
				&[FieldDescriptor::new("child", "record_p").with_def(vec![
					FieldDescriptor::new("id", "uint32"),
					FieldDescriptor::new("name", "cstring_p"),
				])],
				true,
			);
			let value = Value::record([(
				"child",
				Value::record([("id", Value::Uint(1)), ("name", Value::utf8("abc"))]),
			)]);
			// nested: 24 fixed + 8 heap, rounded to the word
			assert_eq!(heap_size(&layout, &value), 32);
		}

		#[test]
		fn test_pointer_array_slots() {
			let layout = layout(&[FieldDescriptor::new("names", "cstring_p[3]")], false);
			let value = Value::record([("names", Value::array([Value::utf8("a"), Value::Null, Value::utf8("bcd")]))]);
			assert_eq!(heap_size(&layout, &value), 4);
		}
	}

	mod resolve {
		use super::*;

		#[test]
		fn test_nested_and_indexed() {
			let value = Value::record([(
				"pts",
				Value::array([Value::record([("x", Value::Int(1))]), Value::record([("x", Value::Int(2))])]),
			)]);
			let path = FieldPath::parse(".pts[1].x").unwrap();
			assert_eq!(resolve(&value, &path).unwrap(), Some(&Value::Int(2)));

			let missing = FieldPath::parse(".pts[5].x").unwrap();
			assert_eq!(resolve(&value, &missing).unwrap(), None);
		}

		#[test]
		fn test_wrong_intermediate_kind() {
			let value = Value::record([("a", Value::Int(3))]);
			let err = resolve(&value, &FieldPath::parse(".a.b").unwrap()).unwrap_err();
			assert_eq!(err.code(), "SERIALIZE_004");

			let err = resolve(&value, &FieldPath::parse(".a[0].b").unwrap()).unwrap_err();
			assert_eq!(err.code(), "SERIALIZE_004");
		}

		#[test]
		fn test_null_leaf_is_absent() {
			let value = Value::record([("a", Value::Null)]);
			assert_eq!(resolve(&value, &FieldPath::parse(".a").unwrap()).unwrap(), None);
		}
	}

	#[test]
	fn test_allocate_is_zeroed() {
		let layout = layout(&[FieldDescriptor::new("a", "uint64"), FieldDescriptor::new("s", "cstring_p")], true);
		let buffer = allocate(&layout, 8);
		assert_eq!(buffer.len(), 32);
		assert_eq!(buffer.fixed().len(), 24);
		assert!(buffer.iter().all(|&b| b == 0));
	}
}
