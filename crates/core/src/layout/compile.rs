// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

use indexmap::IndexMap;
use rekord_type::Result;
use tracing::{debug, instrument, trace};

use super::{CompileOptions, CompiledField, CompiledLayout};
use crate::{
	descriptor::{FieldDescriptor, parse_type_spec},
	error::LayoutError,
	path::FieldPath,
	registry::{BaseType, FieldKind, FieldType, lookup},
};

/// A field after record expansion, before it is placed.
struct Row {
	path: FieldPath,
	field_type: FieldType,
	elem_size: u32,
	array_count: u32,
	nested: Option<CompiledLayout>,
}

/// Compiles a descriptor list into a flat, offset-annotated field table.
#[instrument(name = "layout::compile", level = "trace", skip(descriptors), fields(descriptors = descriptors.len()))]
pub fn compile(descriptors: &[FieldDescriptor], options: CompileOptions) -> Result<CompiledLayout> {
	let mut rows = Vec::new();
	expand(descriptors, &FieldPath::root(), &options, &mut rows)?;

	let word = options.machine.word_bytes();
	let mut cursor: u32 = 0;
	let mut fields = Vec::with_capacity(rows.len());
	let mut fields_by_path = IndexMap::with_capacity(rows.len());

	for row in rows {
		let full_path = row.path.to_string();
		let too_large = || LayoutError::InvalidSize {
			name: full_path.clone(),
			type_name: row.field_type.to_string(),
			reason: "layout exceeds 4 GiB".to_string(),
		};

		let width = row.elem_size.checked_mul(row.array_count.max(1)).ok_or_else(too_large)?;
		let padding = if options.align {
			padding_for(cursor, width.min(word))
		} else {
			0
		};
		let offset = cursor.checked_add(padding).ok_or_else(too_large)?;
		cursor = offset.checked_add(width).ok_or_else(too_large)?;

		if fields_by_path.contains_key(&full_path) {
			return Err(LayoutError::DuplicateField {
				path: full_path,
			}
			.into());
		}

		trace!(path = %full_path, offset, padding, width, "placed field");

		fields_by_path.insert(full_path.clone(), fields.len());
		fields.push(CompiledField {
			offset,
			elem_size: row.elem_size,
			array_count: row.array_count,
			field_type: row.field_type,
			path: row.path,
			full_path,
			padding,
			nested: row.nested,
		});
	}

	debug!(fields = fields.len(), total_fixed_size = cursor, align = options.align, word, "compiled layout");

	Ok(CompiledLayout::new(fields, fields_by_path, cursor, options))
}

fn padding_for(cursor: u32, alignment: u32) -> u32 {
	(alignment - cursor % alignment) % alignment
}

fn expand(descriptors: &[FieldDescriptor], prefix: &FieldPath, options: &CompileOptions, rows: &mut Vec<Row>) -> Result<()> {
	for descriptor in descriptors {
		let name = prefix.field(&descriptor.name).to_string();

		let spec = parse_type_spec(&descriptor.type_spec).ok_or_else(|| LayoutError::InvalidArraySize {
			name: name.clone(),
			spec: descriptor.type_spec.clone(),
		})?;

		let field_type = lookup(spec.name, &options.machine).map_err(|err| match err {
			LayoutError::UnknownType {
				type_name,
				..
			} => LayoutError::UnknownType {
				name: name.clone(),
				type_name,
			},
			other => other,
		})?;

		if field_type.kind == FieldKind::Virtual {
			let def = descriptor.def.as_deref().ok_or_else(|| LayoutError::IncompleteRecord {
				name: name.clone(),
			})?;

			match spec.count {
				None => expand(def, &prefix.field(&descriptor.name), options, rows)?,
				Some(count) => {
					for idx in 0..count {
						expand(def, &prefix.index(&descriptor.name, idx), options, rows)?;
					}
				}
			}
			continue;
		}

		let elem_size = match field_type.kind {
			FieldKind::Variable => descriptor_size(descriptor, &name, &field_type)?,
			_ => field_type.byte_size.unwrap_or(0),
		};

		let nested = match (&descriptor.def, field_type.base) {
			(Some(def), BaseType::Record) => Some(compile(def, *options)?),
			_ => None,
		};

		rows.push(Row {
			path: prefix.field(&descriptor.name),
			field_type,
			elem_size,
			array_count: spec.count.unwrap_or(0),
			nested,
		});
	}
	Ok(())
}

fn descriptor_size(descriptor: &FieldDescriptor, name: &str, field_type: &FieldType) -> Result<u32> {
	let invalid = |reason: &str| LayoutError::InvalidSize {
		name: name.to_string(),
		type_name: field_type.to_string(),
		reason: reason.to_string(),
	};

	let Some(size) = descriptor.size.as_ref() else {
		return Err(invalid("missing").into());
	};

	if let Some(n) = size.as_u64() {
		if n == 0 {
			return Err(invalid("must be positive").into());
		}
		return u32::try_from(n).map_err(|_| invalid("too large").into());
	}

	if size.as_i64().is_some() {
		return Err(invalid("must be positive").into());
	}

	Err(invalid("must be an integer").into())
}

#[cfg(test)]
pub mod tests {
	use super::*;
	use crate::machine::{Endianness, MachineParams, WordWidth};

	const LE64: MachineParams = MachineParams::new(WordWidth::Eight, Endianness::Little);
	const LE32: MachineParams = MachineParams::new(WordWidth::Four, Endianness::Little);

	fn aligned() -> CompileOptions {
		CompileOptions::aligned().with_machine(LE64)
	}

	fn offsets(layout: &CompiledLayout) -> Vec<(String, u32)> {
		layout.fields.iter().map(|f| (f.full_path.clone(), f.offset)).collect()
	}

	mod offsets {
		use super::*;

		#[test]
		fn test_aligned_mixed_widths() {
			let layout = compile(
				&[
					FieldDescriptor::new("a", "int8"),
					FieldDescriptor::new("b", "int8"),
					FieldDescriptor::new("c", "uint32_be"),
					FieldDescriptor::new("d", "uint32_be"),
					FieldDescriptor::new("e", "int8"),
					FieldDescriptor::new("f", "uint64_be"),
				],
				aligned(),
			)
			.unwrap();

			assert_eq!(layout.total_fixed_size, 24);
			assert_eq!(
				offsets(&layout),
				vec![
					(".a".to_string(), 0),
					(".b".to_string(), 1),
					(".c".to_string(), 4),
					(".d".to_string(), 8),
					(".e".to_string(), 12),
					(".f".to_string(), 16),
				]
			);
			assert_eq!(layout.field(".c").unwrap().padding, 2);
		}

		#[test]
		fn test_unaligned_is_packed() {
			let layout = compile(
				&[
					FieldDescriptor::new("a", "int8"),
					FieldDescriptor::new("b", "int16_le"),
					FieldDescriptor::new("c", "int32_le"),
					FieldDescriptor::new("d", "int8"),
				],
				CompileOptions::default(),
			)
			.unwrap();

			assert_eq!(layout.total_fixed_size, 8);
			assert!(layout.fields.iter().all(|f| f.padding == 0));
			assert_eq!(layout.field(".d").unwrap().offset, 7);
		}

		#[test]
		fn test_no_trailing_padding() {
			let layout =
				compile(&[FieldDescriptor::new("a", "uint64"), FieldDescriptor::new("b", "int8")], aligned()).unwrap();
			assert_eq!(layout.total_fixed_size, 9);
		}

		#[test]
		fn test_pointer_alignment_caps_at_word() {
			let layout = compile(
				&[FieldDescriptor::new("a", "int8"), FieldDescriptor::new("s", "cstring_p")],
				CompileOptions::aligned().with_machine(LE32),
			)
			.unwrap();

			let s = layout.field(".s").unwrap();
			assert_eq!(s.offset, 4);
			assert_eq!(s.elem_size, 8);
			assert_eq!(layout.total_fixed_size, 12);
		}

		#[test]
		fn test_alignment_invariant() {
			let layout = compile(
				&[
					FieldDescriptor::new("a", "int8"),
					FieldDescriptor::new("b", "int16[3]"),
					FieldDescriptor::sized("c", "cstring", 5),
					FieldDescriptor::new("d", "double"),
					FieldDescriptor::new("e", "bool"),
					FieldDescriptor::new("f", "int32_p"),
					FieldDescriptor::sized("g", "uint_be", 3),
					FieldDescriptor::new("h", "float[2]"),
				],
				aligned(),
			)
			.unwrap();

			for field in layout.fields.iter() {
				let alignment = field.elem_size.min(8);
				assert_eq!(field.offset % alignment, 0, "{} at {}", field.full_path, field.offset);
			}
			let last = layout.fields.last().unwrap();
			assert_eq!(layout.total_fixed_size, last.end());
		}
	}

	mod records {
		use super::*;

		#[test]
		fn test_nested_record_is_flattened() {
			let layout = compile(
				&[
					FieldDescriptor::new("id", "uint32"),
					FieldDescriptor::record(
						"pos",
						vec![FieldDescriptor::new("x", "int16"), FieldDescriptor::new("y", "int16")],
					),
				],
				CompileOptions::default(),
			)
			.unwrap();

			assert_eq!(
				offsets(&layout),
				vec![(".id".to_string(), 0), (".pos.x".to_string(), 4), (".pos.y".to_string(), 6)]
			);
			assert_eq!(layout.field(".pos.y").unwrap().path.len(), 2);
		}

		#[test]
		fn test_record_array_expands_per_element() {
			let layout = compile(
				&[FieldDescriptor::record_array(
					"pts",
					3,
					vec![FieldDescriptor::new("x", "int8"), FieldDescriptor::new("y", "int8")],
				)],
				CompileOptions::default(),
			)
			.unwrap();

			let paths: Vec<&str> = layout.fields.iter().map(|f| f.full_path.as_str()).collect();
			assert_eq!(paths, vec![".pts[0].x", ".pts[0].y", ".pts[1].x", ".pts[1].y", ".pts[2].x", ".pts[2].y"]);
			assert_eq!(layout.total_fixed_size, 6);
		}

		#[test]
		fn test_scalar_array_stays_one_row() {
			let layout = compile(&[FieldDescriptor::new("v", "int8[4]")], CompileOptions::default()).unwrap();
			assert_eq!(layout.fields.len(), 1);
			assert_eq!(layout.fields[0].array_count, 4);
			assert_eq!(layout.total_fixed_size, 4);
		}

		#[test]
		fn test_record_pointer_compiles_nested_layout() {
			let layout = compile(
				&[FieldDescriptor::new("child", "record_p").with_def(vec![FieldDescriptor::new("v", "int32")])],
				aligned(),
			)
			.unwrap();

			let child = layout.field(".child").unwrap();
			assert!(child.is_pointer());
			assert_eq!(child.elem_size, 16);
			assert_eq!(child.nested.as_ref().unwrap().total_fixed_size, 4);
		}

		#[test]
		fn test_empty_layout() {
			let layout = compile(&[], CompileOptions::default()).unwrap();
			assert_eq!(layout.total_fixed_size, 0);
			assert!(layout.fields.is_empty());
		}
	}

	mod errors {
		use super::*;

		fn code(descriptors: &[FieldDescriptor]) -> String {
			compile(descriptors, CompileOptions::default()).unwrap_err().code().to_string()
		}

		#[test]
		fn test_unknown_type_names_field() {
			let err = compile(&[FieldDescriptor::new("x", "int7")], CompileOptions::default()).unwrap_err();
			assert_eq!(err.code(), "LAYOUT_001");
			assert!(err.message.contains("'.x'"));
			assert!(err.message.contains("'int7'"));
		}

		#[test]
		fn test_invalid_array_size() {
			assert_eq!(code(&[FieldDescriptor::new("x", "int8[-2]")]), "LAYOUT_002");
			assert_eq!(code(&[FieldDescriptor::new("x", "int8[1.5]")]), "LAYOUT_002");
		}

		#[test]
		fn test_record_without_def() {
			assert_eq!(code(&[FieldDescriptor::new("r", "record")]), "LAYOUT_003");
			assert_eq!(code(&[FieldDescriptor::new("r", "record[2]")]), "LAYOUT_003");
		}

		#[test]
		fn test_variable_size_validation() {
			assert_eq!(code(&[FieldDescriptor::new("s", "cstring")]), "LAYOUT_004");
			assert_eq!(code(&[FieldDescriptor::sized("s", "cstring", 0)]), "LAYOUT_004");
			assert_eq!(code(&[FieldDescriptor::new("s", "uint").with_size(-4i64)]), "LAYOUT_004");

			let fractional = serde_json::Number::from_f64(2.5).unwrap();
			assert_eq!(code(&[FieldDescriptor::new("s", "bytes").with_size(fractional)]), "LAYOUT_004");
		}

		#[test]
		fn test_layout_larger_than_4gib() {
			let err = compile(&[FieldDescriptor::new("x", "int64[1000000000]")], CompileOptions::default()).unwrap_err();
			assert_eq!(err.code(), "LAYOUT_004");
			assert!(err.message.contains("'.x'"));

			let halves = [
				FieldDescriptor::sized("a", "cstring", 3_000_000_000),
				FieldDescriptor::sized("b", "cstring", 3_000_000_000),
			];
			let err = compile(&halves, CompileOptions::default()).unwrap_err();
			assert_eq!(err.code(), "LAYOUT_004");
			assert!(err.message.contains("'.b'"));
			assert!(err.message.contains("exceeds 4 GiB"));
		}

		#[test]
		fn test_padding_past_4gib() {
			let descriptors = [FieldDescriptor::sized("a", "bytes", u32::MAX), FieldDescriptor::new("b", "uint64")];
			let err = compile(&descriptors, CompileOptions::aligned().with_machine(LE64)).unwrap_err();
			assert_eq!(err.code(), "LAYOUT_004");
		}

		#[test]
		fn test_duplicate_path() {
			let err = compile(
				&[
					FieldDescriptor::record("a", vec![FieldDescriptor::new("b", "int8")]),
					FieldDescriptor::new("a", "int8"),
					FieldDescriptor::record("a", vec![FieldDescriptor::new("b", "int8")]),
				],
				CompileOptions::default(),
			)
			.unwrap_err();
			assert_eq!(err.code(), "LAYOUT_005");
			assert_eq!(err.path.as_deref(), Some(".a.b"));
		}

		#[test]
		fn test_error_inside_record_reports_full_path() {
			let err = compile(
				&[FieldDescriptor::record_array("r", 2, vec![FieldDescriptor::new("s", "cstring")])],
				CompileOptions::default(),
			)
			.unwrap_err();
			assert_eq!(err.code(), "LAYOUT_004");
			assert!(err.message.contains("'.r[0].s'"));
		}
	}
}
