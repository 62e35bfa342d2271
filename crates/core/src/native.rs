// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

//! Emits a C11 struct declaration equivalent to a compiled layout.
//!
//! The struct is packed and every padding run the compiler inserted becomes
//! an explicit `__padN` member, so an independent C compiler must arrive at
//! the same offsets. `_Static_assert` lines pin the size and every offset.

use std::{collections::HashSet, fmt::Write};

use crate::{
	layout::{CompiledField, CompiledLayout},
	machine::WordWidth,
	registry::BaseType,
};

const C_KEYWORDS: &[&str] = &[
	"auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else", "enum", "extern",
	"float", "for", "goto", "if", "inline", "int", "long", "register", "restrict", "return", "short", "signed",
	"sizeof", "static", "struct", "switch", "typedef", "union", "unsigned", "void", "volatile", "while",
];

/// Renders `layout` as a packed C struct named `struct_name`.
pub fn emit_native_header(layout: &CompiledLayout, struct_name: &str) -> String {
	let name = identifier(struct_name);
	let mut out = String::new();

	let _ = writeln!(out, "#include <stddef.h>");
	let _ = writeln!(out, "#include <stdint.h>");
	let _ = writeln!(out);

	if layout.fields.is_empty() {
		let _ = writeln!(out, "struct {};", name);
		return out;
	}

	let mut used = HashSet::new();
	let mut members = Vec::with_capacity(layout.fields.len());
	let mut pads = 0;

	let _ = writeln!(out, "#pragma pack(push, 1)");
	let _ = writeln!(out, "typedef struct {} {{", name);
	for field in layout.fields.iter() {
		if field.padding > 0 {
			let _ = writeln!(out, "\tuint8_t __pad{}[{}];", pads, field.padding);
			pads += 1;
		}

		let member = unique(member_name(&field.full_path), &mut used);
		let _ = writeln!(out, "\t{};", declaration(field, &member, layout.machine().word_width));
		members.push((member, field));
	}
	let _ = writeln!(out, "}} {};", name);
	let _ = writeln!(out, "#pragma pack(pop)");
	let _ = writeln!(out);

	let _ = writeln!(out, "_Static_assert(sizeof({}) == {}, \"size of {}\");", name, layout.total_fixed_size, name);
	for (member, field) in members {
		let _ = writeln!(
			out,
			"_Static_assert(offsetof({}, {}) == {}, \"offset of {}\");",
			name, member, field.offset, field.full_path
		);
	}
	out
}

/// Name of the C member emitted for a field path, before deduplication.
pub fn member_name(full_path: &str) -> String {
	let flat: String = full_path
		.chars()
		.filter(|&c| c != ']')
		.map(|c| match c {
			'.' | '[' => '_',
			c => c,
		})
		.collect();
	identifier(flat.trim_start_matches('_'))
}

fn identifier(raw: &str) -> String {
	let mut id: String = raw.chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }).collect();
	if id.is_empty() || id.starts_with(|c: char| c.is_ascii_digit()) || C_KEYWORDS.contains(&id.as_str()) {
		id.insert_str(0, "f_");
	}
	id
}

fn unique(base: String, used: &mut HashSet<String>) -> String {
	let mut candidate = base.clone();
	let mut n = 1;
	while !used.insert(candidate.clone()) {
		candidate = format!("{}_{}", base, n);
		n += 1;
	}
	candidate
}

fn declaration(field: &CompiledField, member: &str, word_width: WordWidth) -> String {
	let array = if field.is_array() {
		format!("[{}]", field.array_count)
	} else {
		String::new()
	};

	if field.is_pointer() {
		let word = match word_width {
			WordWidth::Four => "uint32_t",
			WordWidth::Eight => "uint64_t",
		};
		return format!("{} {}{}[2]", word, member, array);
	}

	let scalar = match field.field_type.base {
		BaseType::Int8 => "int8_t",
		BaseType::Uint8 | BaseType::Bool => "uint8_t",
		BaseType::Int16 => "int16_t",
		BaseType::Uint16 => "uint16_t",
		BaseType::Int32 => "int32_t",
		BaseType::Uint32 => "uint32_t",
		BaseType::Int64 => "int64_t",
		BaseType::Uint64 => "uint64_t",
		BaseType::Float => "float",
		BaseType::Double => "double",
		BaseType::CString => return format!("char {}{}[{}]", member, array, field.elem_size),
		BaseType::Int | BaseType::Uint | BaseType::Bytes | BaseType::Record => {
			return format!("uint8_t {}{}[{}]", member, array, field.elem_size);
		}
	};
	format!("{} {}{}", scalar, member, array)
}
