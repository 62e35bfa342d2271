// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

//! Field descriptors: the declarative input of the layout compiler.

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// One entry of a descriptor list, e.g. `{"name": "id", "type": "uint32_be"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
	pub name: String,
	/// Type name with optional array suffix, e.g. `int8[4]`
	#[serde(rename = "type")]
	pub type_spec: String,
	/// Byte size for variable-size types. Kept as a JSON number so that
	/// fractional or negative sizes reach the compiler and are rejected there.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub size: Option<Number>,
	/// Members of a `record` or `record_p` field
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub def: Option<Vec<FieldDescriptor>>,
}

impl FieldDescriptor {
	pub fn new(name: impl Into<String>, type_spec: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			type_spec: type_spec.into(),
			size: None,
			def: None,
		}
	}

	pub fn sized(name: impl Into<String>, type_spec: impl Into<String>, size: u32) -> Self {
		Self::new(name, type_spec).with_size(size)
	}

	pub fn record(name: impl Into<String>, def: Vec<FieldDescriptor>) -> Self {
		Self::new(name, "record").with_def(def)
	}

	pub fn record_array(name: impl Into<String>, count: u32, def: Vec<FieldDescriptor>) -> Self {
		Self::new(name, format!("record[{}]", count)).with_def(def)
	}

	pub fn with_size(mut self, size: impl Into<Number>) -> Self {
		self.size = Some(size.into());
		self
	}

	pub fn with_def(mut self, def: Vec<FieldDescriptor>) -> Self {
		self.def = Some(def);
		self
	}
}

/// A type specification split into type name and array count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeSpec<'a> {
	pub name: &'a str,
	pub count: Option<u32>,
}

/// Splits `int8[4]` into `int8` and `Some(4)`. Returns `None` when the array
/// suffix is malformed, zero, negative or not an integer.
pub fn parse_type_spec(spec: &str) -> Option<TypeSpec<'_>> {
	let Some(open) = spec.find('[') else {
		return Some(TypeSpec {
			name: spec,
			count: None,
		});
	};

	let digits = spec[open + 1..].strip_suffix(']')?;
	if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}

	let count: u32 = digits.parse().ok()?;
	if count == 0 {
		return None;
	}

	Some(TypeSpec {
		name: &spec[..open],
		count: Some(count),
	})
}

/// Parses a JSON array of descriptors.
pub fn descriptors_from_json(input: &str) -> rekord_type::Result<Vec<FieldDescriptor>> {
	Ok(serde_json::from_str(input)?)
}
