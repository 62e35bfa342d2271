// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

use rekord_type::{Result, Value};
use tracing::instrument;

use crate::{
	encoded::{read_element, read_reference},
	error::AccessError,
	layout::{CompiledField, CompiledLayout},
	machine::MachineParams,
	memory::decode_payload,
	path::PathSegment,
};

/// Rebuilds the value tree stored in `buffer`.
#[instrument(name = "deserialize", level = "trace", skip(layout, buffer), fields(len = buffer.len()))]
pub fn deserialize(layout: &CompiledLayout, buffer: &[u8]) -> Result<Value> {
	let mut root = Value::empty_record();
	for field in layout.fields.iter() {
		let value = read_field(field, layout.machine(), buffer)?;
		insert(&mut root, field.path.segments(), value);
	}
	Ok(root)
}

/// Reads one field: scalars and fixed strings from the fixed region,
/// pointer payloads from wherever their reference points.
pub(crate) fn read_field(field: &CompiledField, machine: &MachineParams, buffer: &[u8]) -> Result<Value> {
	let end = field.end() as usize;
	if end > buffer.len() {
		return Err(AccessError::OutOfBounds {
			path: field.full_path.clone(),
			end,
			buffer_len: buffer.len(),
		}
		.into());
	}

	let elem_size = field.elem_size as usize;
	let mut values = Vec::with_capacity(field.slots() as usize);
	for idx in 0..field.slots() {
		let at = field.element_offset(idx);
		let bytes = &buffer[at..at + elem_size];
		values.push(if field.is_pointer() {
			read_payload(field, machine, bytes, buffer)?
		} else {
			read_element(bytes, &field.field_type)
		});
	}

	if field.is_array() {
		Ok(Value::Array(values))
	} else {
		Ok(values.pop().unwrap_or(Value::Null))
	}
}

fn read_payload(field: &CompiledField, machine: &MachineParams, reference: &[u8], buffer: &[u8]) -> Result<Value> {
	let reference = read_reference(reference, machine);
	if reference.is_null() {
		return Ok(Value::Null);
	}

	let start = reference.offset as usize;
	let end = start.saturating_add(reference.len as usize);
	if end > buffer.len() {
		return Err(AccessError::OutOfBounds {
			path: field.full_path.clone(),
			end,
			buffer_len: buffer.len(),
		}
		.into());
	}
	decode_payload(field, &buffer[start..end])
}

/// Places `value` at `segments` below `node`, creating intermediate records
/// and arrays.
fn insert(node: &mut Value, segments: &[PathSegment], value: Value) {
	let Some((first, rest)) = segments.split_first() else {
		*node = value;
		return;
	};

	if !matches!(node, Value::Record(_)) {
		*node = Value::empty_record();
	}
	let Value::Record(members) = node else {
		return;
	};

	match first {
		PathSegment::Field(name) => {
			insert(members.entry(name.clone()).or_insert(Value::Null), rest, value);
		}
		PathSegment::Index(name, idx) => {
			let slot = members.entry(name.clone()).or_insert_with(|| Value::Array(Vec::new()));
			if !matches!(slot, Value::Array(_)) {
				*slot = Value::Array(Vec::new());
			}
			let Value::Array(items) = slot else {
				return;
			};

			let idx = *idx as usize;
			if items.len() <= idx {
				items.resize_with(idx + 1, || Value::Null);
			}
			insert(&mut items[idx], rest, value);
		}
	}
}
