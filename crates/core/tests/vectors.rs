// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

use std::{fs, path::Path};

use indexmap::IndexMap;
use rekord_core::{CompileOptions, FieldDescriptor, Value, allocate, compile, deserialize, encode, heap_size, serialize};
use rekord_type::util::hex;
use serde::Deserialize;
use test_each_file::test_each_path;

#[derive(Deserialize)]
struct Vector {
	#[serde(default)]
	options: CompileOptions,
	fields: Vec<FieldDescriptor>,
	size: Option<u32>,
	#[serde(default)]
	offsets: IndexMap<String, u32>,
	value: Option<serde_json::Value>,
	hex: Option<String>,
	error: Option<String>,
}

test_each_path! { in "crates/core/tests/vectors" as layout_vectors => test_vector }

fn test_vector(path: &Path) {
	let input = fs::read_to_string(path).unwrap();
	let vector: Vector = serde_json::from_str(&input).unwrap();

	let compiled = compile(&vector.fields, vector.options);
	if let Some(code) = vector.error {
		assert_eq!(compiled.unwrap_err().code(), code, "{}", path.display());
		return;
	}
	let layout = compiled.unwrap();

	if let Some(size) = vector.size {
		assert_eq!(layout.total_fixed_size, size, "{}", path.display());
	}
	for (field, offset) in vector.offsets {
		assert_eq!(layout.field(&field).map(|f| f.offset), Some(offset), "{} {}", path.display(), field);
	}

	let Some(value) = vector.value.map(Value::from_json) else {
		return;
	};
	let buffer = encode(&layout, &value).unwrap();
	if let Some(expected) = vector.hex {
		assert_eq!(hex::encode(&buffer), expected, "{}", path.display());
	}

	let decoded = deserialize(&layout, &buffer).unwrap();
	assert_eq!(decoded, value, "{}", path.display());

	let mut again = allocate(&layout, heap_size(&layout, &decoded));
	serialize(&layout, &mut again, &decoded).unwrap();
	assert_eq!(again, buffer, "{}", path.display());
}
