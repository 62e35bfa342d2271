// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

use std::{
	fmt::{Display, Formatter},
	ops::{Deref, DerefMut},
};

use rekord_type::util::hex;
use serde::{Deserialize, Serialize};

/// An owned record buffer.
// [fixed region]:[heap region]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordBuffer {
	bytes: Vec<u8>,
	fixed_size: usize,
}

impl RecordBuffer {
	/// A zero-filled buffer of `fixed_size + heap_size` bytes.
	pub fn zeroed(fixed_size: usize, heap_size: usize) -> Self {
		Self {
			bytes: vec![0; fixed_size + heap_size],
			fixed_size,
		}
	}

	/// Wraps existing bytes; everything past `fixed_size` is the heap.
	pub fn from_vec(bytes: Vec<u8>, fixed_size: usize) -> Self {
		let fixed_size = fixed_size.min(bytes.len());
		Self {
			bytes,
			fixed_size,
		}
	}

	pub fn fixed(&self) -> &[u8] {
		&self.bytes[..self.fixed_size]
	}

	pub fn heap(&self) -> &[u8] {
		&self.bytes[self.fixed_size..]
	}

	pub fn fixed_size(&self) -> usize {
		self.fixed_size
	}

	pub fn heap_size(&self) -> usize {
		self.bytes.len() - self.fixed_size
	}

	pub fn into_vec(self) -> Vec<u8> {
		self.bytes
	}
}

impl Deref for RecordBuffer {
	type Target = [u8];

	fn deref(&self) -> &Self::Target {
		&self.bytes
	}
}

impl DerefMut for RecordBuffer {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.bytes
	}
}

impl AsRef<[u8]> for RecordBuffer {
	fn as_ref(&self) -> &[u8] {
		&self.bytes
	}
}

impl Display for RecordBuffer {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&hex::encode(&self.bytes))
	}
}
