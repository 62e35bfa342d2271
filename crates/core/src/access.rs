// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

//! Path-addressed access to single fields of a serialized buffer.
//!
//! Every operation resolves and validates its field before touching the
//! buffer, so access errors never leave partial writes behind.

use rekord_type::{Encoding, IntoDiagnostic, Result, Value, return_error};

use crate::{
	deserialize::read_field,
	encoded::{read_reference, write_element},
	error::AccessError,
	layout::{CompiledField, CompiledLayout, FieldHandle},
	memory::slot_values,
	registry::BaseType,
};

/// Reads the field at `path`. Pointer fields are dereferenced.
pub fn read_value(layout: &CompiledLayout, buffer: &[u8], path: &str) -> Result<Value> {
	let field = find(layout, path)?;
	read_field(field, layout.machine(), buffer).map_err(|err| err.with_path(&field.full_path))
}

/// Writes `value` into the field at `path`. The field's bytes change only
/// when the whole value encodes; bytes past a shorter string are kept.
pub fn write_value(layout: &CompiledLayout, buffer: &mut [u8], path: &str, value: &Value) -> Result<()> {
	let field = find(layout, path)?;
	if field.is_pointer() {
		return_error!(
			AccessError::CannotWriteToPointer {
				path: field.full_path.clone(),
			}
			.into_diagnostic()
		);
	}
	write_fixed(field, buffer, value)
}

pub fn read_handle(layout: &CompiledLayout, buffer: &[u8], handle: FieldHandle) -> Result<Value> {
	let field = find_handle(layout, handle)?;
	read_field(field, layout.machine(), buffer).map_err(|err| err.with_path(&field.full_path))
}

pub fn write_handle(layout: &CompiledLayout, buffer: &mut [u8], handle: FieldHandle, value: &Value) -> Result<()> {
	let field = find_handle(layout, handle)?;
	if field.is_pointer() {
		return_error!(
			AccessError::CannotWriteToPointer {
				path: field.full_path.clone(),
			}
			.into_diagnostic()
		);
	}
	write_fixed(field, buffer, value)
}

/// Decodes the string at `path`. A fixed `cstring` stops at its first NUL;
/// a `cstring_p` decodes its whole payload and yields `None` when null.
pub fn read_string(layout: &CompiledLayout, buffer: &[u8], path: &str, encoding: Encoding) -> Result<Option<String>> {
	let field = string_field(layout, path)?;
	check_bounds(field, buffer.len())?;

	let region = &buffer[field.offset as usize..field.end() as usize];
	if !field.is_pointer() {
		return Ok(Some(encoding.decode_terminated(region)));
	}

	let reference = read_reference(&region[..field.elem_size as usize], layout.machine());
	if reference.is_null() {
		return Ok(None);
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
	Ok(Some(encoding.decode(&buffer[start..end])))
}

/// Zero-fills the fixed `cstring` at `path`, then writes as much of `s` as
/// fits. Returns the number of bytes written.
pub fn write_string(layout: &CompiledLayout, buffer: &mut [u8], path: &str, s: &str, encoding: Encoding) -> Result<usize> {
	let field = string_field(layout, path)?;
	if field.is_pointer() {
		return_error!(
			AccessError::CannotWriteToPointer {
				path: field.full_path.clone(),
			}
			.into_diagnostic()
		);
	}
	check_bounds(field, buffer.len())?;

	let region = &mut buffer[field.offset as usize..field.end() as usize];
	let encoded = encoding.encode_bounded(s, region.len());
	region.fill(0);
	region[..encoded.len()].copy_from_slice(&encoded);
	Ok(encoded.len())
}

/// Resolves `path` once and returns a reader bound to `buffer`.
pub fn create_reader<'b>(layout: &CompiledLayout, buffer: &'b [u8], path: &str) -> Result<impl Fn() -> Result<Value> + use<'b>> {
	let field = find(layout, path)?.clone();
	check_bounds(&field, buffer.len())?;
	let machine = *layout.machine();

	Ok(move || read_field(&field, &machine, buffer))
}

/// Resolves `path` once and returns a writer bound to `buffer`. Pointer
/// fields have no writer.
pub fn create_writer<'b>(
	layout: &CompiledLayout,
	buffer: &'b mut [u8],
	path: &str,
) -> Result<impl FnMut(&Value) -> Result<()> + use<'b>> {
	let field = find(layout, path)?.clone();
	if field.is_pointer() {
		return_error!(
			AccessError::WriterNotSupportedForPointer {
				path: field.full_path.clone(),
			}
			.into_diagnostic()
		);
	}
	check_bounds(&field, buffer.len())?;

	Ok(move |value: &Value| write_fixed(&field, &mut *buffer, value))
}

fn find<'l>(layout: &'l CompiledLayout, path: &str) -> Result<&'l CompiledField> {
	let found = if path.starts_with('.') {
		layout.field(path)
	} else {
		layout.field(&format!(".{}", path))
	};

	match found {
		Some(field) => Ok(field),
		None => return_error!(
			AccessError::NotFound {
				path: path.to_string(),
			}
			.into_diagnostic()
		),
	}
}

fn find_handle(layout: &CompiledLayout, handle: FieldHandle) -> Result<&CompiledField> {
	match layout.field_at(handle) {
		Some(field) => Ok(field),
		None => return_error!(
			AccessError::NotFound {
				path: format!("#{}", handle.index()),
			}
			.into_diagnostic()
		),
	}
}

fn string_field<'l>(layout: &'l CompiledLayout, path: &str) -> Result<&'l CompiledField> {
	let field = find(layout, path)?;
	if field.field_type.base != BaseType::CString || field.is_array() {
		let type_name = if field.is_array() {
			format!("{}[{}]", field.field_type, field.array_count)
		} else {
			field.field_type.to_string()
		};
		return_error!(
			AccessError::NotAString {
				path: field.full_path.clone(),
				type_name,
			}
			.into_diagnostic()
		);
	}
	Ok(field)
}

fn check_bounds(field: &CompiledField, buffer_len: usize) -> Result<()> {
	let end = field.end() as usize;
	if end > buffer_len {
		return_error!(
			AccessError::OutOfBounds {
				path: field.full_path.clone(),
				end,
				buffer_len,
			}
			.into_diagnostic()
		);
	}
	Ok(())
}

/// Encodes `value` into a copy of the field's bytes and commits it only on
/// success.
fn write_fixed(field: &CompiledField, buffer: &mut [u8], value: &Value) -> Result<()> {
	check_bounds(field, buffer.len())?;
	if value.is_null() {
		return Ok(());
	}

	let region = field.offset as usize..field.end() as usize;
	let mut scratch = buffer[region.clone()].to_vec();
	let elem_size = field.elem_size as usize;

	let slots = slot_values(field, value).map_err(|err| err.with_path(&field.full_path))?;
	for (idx, slot) in slots.into_iter().enumerate() {
		if let Some(item) = slot {
			let at = idx * elem_size;
			write_element(&mut scratch[at..at + elem_size], &field.field_type, item, Encoding::Utf8)
				.map_err(|err| err.with_path(&field.full_path))?;
		}
	}

	buffer[region].copy_from_slice(&scratch);
	Ok(())
}
