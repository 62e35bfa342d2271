// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

use rekord_type::{Encoding, Result, Value};
use tracing::instrument;

use crate::{
	encoded::{Reference, write_element, write_reference},
	error::SerializeError,
	layout::{CompiledField, CompiledLayout},
	memory::{encode_payload, resolve, slot_values},
};

/// Writes `value` into `buffer`, strings encoded as UTF-8. Returns the end
/// of the heap bytes used.
pub fn serialize(layout: &CompiledLayout, buffer: &mut [u8], value: &Value) -> Result<usize> {
	serialize_with(layout, buffer, value, Encoding::Utf8)
}

/// Writes `value` into `buffer` in one pass over the field table. Pointer
/// payloads are placed on the heap in table order, starting right after the
/// fixed region.
///
/// Absent or null values leave non-pointer fields untouched and write a null
/// reference for pointer fields. On error the buffer may hold partial writes.
#[instrument(name = "serialize", level = "trace", skip(layout, buffer, value), fields(len = buffer.len()))]
pub fn serialize_with(layout: &CompiledLayout, buffer: &mut [u8], value: &Value, encoding: Encoding) -> Result<usize> {
	let fixed = layout.total_fixed_size as usize;
	if buffer.len() < fixed {
		return Err(SerializeError::BufferTooSmall {
			required: fixed,
			available: buffer.len(),
		}
		.into());
	}

	let mut heap = fixed;
	for field in layout.fields.iter() {
		write_field(layout, field, buffer, value, encoding, &mut heap)
			.map_err(|err| SerializeError::field(&field.full_path, err))?;
	}
	Ok(heap)
}

fn write_field(
	layout: &CompiledLayout,
	field: &CompiledField,
	buffer: &mut [u8],
	value: &Value,
	encoding: Encoding,
	heap: &mut usize,
) -> Result<()> {
	let node = resolve(value, &field.path)?;
	let elem_size = field.elem_size as usize;

	if !field.is_pointer() {
		let Some(node) = node else {
			return Ok(());
		};
		for (idx, slot) in slot_values(field, node)?.into_iter().enumerate() {
			if let Some(item) = slot {
				let at = field.element_offset(idx as u32);
				write_element(&mut buffer[at..at + elem_size], &field.field_type, item, encoding)?;
			}
		}
		return Ok(());
	}

	let slots = match node {
		Some(node) => slot_values(field, node)?,
		None => vec![None; field.slots() as usize],
	};

	for (idx, slot) in slots.into_iter().enumerate() {
		let reference = match slot {
			None => Reference::NULL,
			Some(item) => {
				let payload = encode_payload(field, item, encoding)?;
				let end = *heap + payload.len();
				if end > buffer.len() {
					return Err(SerializeError::BufferTooSmall {
						required: end,
						available: buffer.len(),
					}
					.into());
				}
				buffer[*heap..end].copy_from_slice(&payload);
				let reference = Reference::new(*heap as u64, payload.len() as u64);
				*heap += layout.heap_slot(payload.len());
				reference
			}
		};

		let at = field.element_offset(idx as u32);
		write_reference(&mut buffer[at..at + elem_size], layout.machine(), reference)?;
	}
	Ok(())
}
