// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

//! Compiled layouts: the flat field table produced from a descriptor list.

use std::{fmt::Write, ops::Deref, sync::Arc};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
	machine::MachineParams,
	path::FieldPath,
	registry::{FieldType, TypeCode},
};

mod compile;

pub use compile::compile;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
	/// Insert padding so every field sits on its native alignment
	pub align: bool,
	pub machine: MachineParams,
}

impl CompileOptions {
	pub fn aligned() -> Self {
		Self::default().with_align(true)
	}

	pub fn with_align(mut self, align: bool) -> Self {
		self.align = align;
		self
	}

	pub fn with_machine(mut self, machine: MachineParams) -> Self {
		self.machine = machine;
		self
	}
}

/// One row of the flat field table.
#[derive(Clone, Debug)]
pub struct CompiledField {
	pub offset: u32,
	/// Bytes per element; two words for pointer fields
	pub elem_size: u32,
	/// Element count of an array field, 0 for scalars
	pub array_count: u32,
	pub field_type: FieldType,
	pub path: FieldPath,
	pub full_path: String,
	/// Padding bytes inserted immediately before this field
	pub padding: u32,
	/// Layout of the sub-record behind a `record_p` field declared with `def`
	pub nested: Option<CompiledLayout>,
}

impl CompiledField {
	/// Number of stored elements, 1 for scalars.
	pub fn slots(&self) -> u32 {
		self.array_count.max(1)
	}

	/// Bytes the field occupies in the fixed region.
	pub fn width(&self) -> u32 {
		self.elem_size * self.slots()
	}

	pub fn end(&self) -> u32 {
		self.offset + self.width()
	}

	pub fn is_array(&self) -> bool {
		self.array_count > 0
	}

	pub fn is_pointer(&self) -> bool {
		self.field_type.is_pointer()
	}

	pub fn type_code(&self) -> TypeCode {
		self.field_type.code()
	}

	/// Byte offset of element `idx`.
	pub fn element_offset(&self, idx: u32) -> usize {
		(self.offset + idx * self.elem_size) as usize
	}
}

/// Opaque index into a layout's field table, resolved once from a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldHandle(usize);

impl FieldHandle {
	pub fn index(&self) -> usize {
		self.0
	}
}

#[derive(Debug, Clone)]
pub struct CompiledLayout(Arc<CompiledLayoutInner>);

impl Deref for CompiledLayout {
	type Target = CompiledLayoutInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

#[derive(Debug)]
pub struct CompiledLayoutInner {
	pub total_fixed_size: u32,
	pub fields: Vec<CompiledField>,
	/// Full path to index into `fields`
	pub fields_by_path: IndexMap<String, usize>,
	pub options: CompileOptions,
}

impl CompiledLayout {
	pub(crate) fn new(fields: Vec<CompiledField>, fields_by_path: IndexMap<String, usize>, total_fixed_size: u32, options: CompileOptions) -> Self {
		Self(Arc::new(CompiledLayoutInner {
			total_fixed_size,
			fields,
			fields_by_path,
			options,
		}))
	}

	pub fn field(&self, path: &str) -> Option<&CompiledField> {
		self.fields_by_path.get(path).map(|&idx| &self.fields[idx])
	}

	pub fn handle(&self, path: &str) -> Option<FieldHandle> {
		self.fields_by_path.get(path).copied().map(FieldHandle)
	}

	pub fn field_at(&self, handle: FieldHandle) -> Option<&CompiledField> {
		self.fields.get(handle.0)
	}

	pub fn align(&self) -> bool {
		self.options.align
	}

	pub fn machine(&self) -> &MachineParams {
		&self.options.machine
	}

	/// Heap bytes reserved for a payload of `len` bytes.
	pub fn heap_slot(&self, len: usize) -> usize {
		if self.options.align {
			self.options.machine.align_word(len)
		} else {
			len
		}
	}

	/// Renders the field table, one line per field.
	pub fn describe(&self) -> String {
		let mut out = String::new();
		let _ = writeln!(
			out,
			"fixed size {} bytes, align {}, {}",
			self.total_fixed_size, self.options.align, self.options.machine
		);
		let _ = writeln!(out, "{:>6}  {:>4}  {:>4}  {:>5}  {:<14}  {}", "offset", "pad", "size", "count", "type", "path");
		for field in self.fields.iter() {
			let _ = writeln!(
				out,
				"{:>6}  {:>4}  {:>4}  {:>5}  {:<14}  {}",
				field.offset,
				field.padding,
				field.elem_size,
				field.array_count,
				field.field_type.to_string(),
				field.full_path
			);
		}
		out
	}
}

#[cfg(test)]
pub mod tests {
	use super::*;
	use crate::{descriptor::FieldDescriptor, machine::{Endianness, WordWidth}};

	fn layout() -> CompiledLayout {
		compile(
			&[
				FieldDescriptor::new("a", "int8"),
				FieldDescriptor::new("b", "int32[3]"),
				FieldDescriptor::new("s", "cstring_p"),
			],
			CompileOptions::aligned().with_machine(MachineParams::new(WordWidth::Eight, Endianness::Little)),
		)
		.unwrap()
	}

	#[test]
	fn test_field_geometry() {
		let layout = layout();
		let b = layout.field(".b").unwrap();
		// alignment follows the whole array width, capped at the word
		assert_eq!(b.offset, 8);
		assert_eq!(b.padding, 7);
		assert_eq!(b.slots(), 3);
		assert_eq!(b.width(), 12);
		assert_eq!(b.end(), 20);
		assert_eq!(b.element_offset(2), 16);
		assert!(b.is_array());
		assert!(!b.is_pointer());
	}

	#[test]
	fn test_handle_resolves_same_field() {
		let layout = layout();
		let handle = layout.handle(".s").unwrap();
		assert_eq!(layout.field_at(handle).unwrap().full_path, ".s");
		assert!(layout.handle(".missing").is_none());
	}

	#[test]
	fn test_heap_slot() {
		let layout = layout();
		assert_eq!(layout.heap_slot(12), 16);
		assert_eq!(layout.heap_slot(0), 0);

		let unaligned = compile(&[FieldDescriptor::new("s", "cstring_p")], CompileOptions::default()).unwrap();
		assert_eq!(unaligned.heap_slot(12), 12);
	}

	#[test]
	fn test_describe_lists_every_field() {
		let text = layout().describe();
		assert!(text.starts_with("fixed size 40 bytes, align true"));
		assert!(text.contains("int32_le"));
		assert!(text.contains(".s"));
		assert_eq!(text.lines().count(), 5);
	}

	#[test]
	fn test_options_from_json() {
		let options: CompileOptions = serde_json::from_str(r#"{"align": true}"#).unwrap();
		assert!(options.align);
		assert_eq!(options.machine, MachineParams::native());
	}
}
