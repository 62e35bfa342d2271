// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

//! Binary record layouts: compile a descriptor list into a native-compatible
//! field table, then serialize, deserialize and access record buffers with
//! out-of-line heap payloads.

// #![cfg_attr(not(debug_assertions), deny(missing_docs))]
#![cfg_attr(not(debug_assertions), deny(warnings))]
// #![cfg_attr(not(debug_assertions), deny(clippy::unwrap_used))]
// #![cfg_attr(not(debug_assertions), deny(clippy::expect_used))]

pub use access::{
	create_reader, create_writer, read_handle, read_string, read_value, write_handle, write_string, write_value,
};
pub use descriptor::{FieldDescriptor, descriptors_from_json};
pub use deserialize::deserialize;
pub use encoded::{RecordBuffer, Reference};
pub use error::{AccessError, LayoutError, SerializeError};
pub use layout::{CompileOptions, CompiledField, CompiledLayout, FieldHandle, compile};
pub use machine::{Endianness, MachineParams, WordWidth};
pub use memory::{allocate, encode, encode_with, heap_size, heap_size_with};
pub use native::emit_native_header;
pub use path::{FieldPath, PathSegment};
pub use rekord_type::{Encoding, Error, Result, Value};
pub use serialize::{serialize, serialize_with};

pub mod access;
pub mod descriptor;
mod deserialize;
pub mod encoded;
pub mod error;
pub mod layout;
pub mod machine;
mod memory;
pub mod native;
pub mod path;
pub mod registry;
mod serialize;
