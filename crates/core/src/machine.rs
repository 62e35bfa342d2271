// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

//! Target machine parameters a layout is compiled against.
//!
//! Word width decides the size of the two-word pointer references stored in
//! the fixed region; byte order decides how unsuffixed numeric types and the
//! pointer words themselves are laid out. Both are captured in the compiled
//! layout, so nothing consults process-global state after compilation.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
	Little,
	Big,
}

impl Endianness {
	pub const fn native() -> Self {
		if cfg!(target_endian = "big") {
			Endianness::Big
		} else {
			Endianness::Little
		}
	}

	pub const fn suffix(&self) -> &'static str {
		match self {
			Endianness::Little => "le",
			Endianness::Big => "be",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WordWidth {
	Four,
	Eight,
}

impl WordWidth {
	pub const fn native() -> Self {
		match size_of::<usize>() {
			4 => WordWidth::Four,
			_ => WordWidth::Eight,
		}
	}

	pub const fn bytes(&self) -> u32 {
		match self {
			WordWidth::Four => 4,
			WordWidth::Eight => 8,
		}
	}
}

impl TryFrom<u8> for WordWidth {
	type Error = LayoutError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			4 => Ok(WordWidth::Four),
			8 => Ok(WordWidth::Eight),
			other => Err(LayoutError::InvalidWordWidth {
				width: other as u32,
			}),
		}
	}
}

impl From<WordWidth> for u8 {
	fn from(value: WordWidth) -> Self {
		value.bytes() as u8
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachineParams {
	pub word_width: WordWidth,
	pub endianness: Endianness,
}

impl MachineParams {
	pub const fn new(word_width: WordWidth, endianness: Endianness) -> Self {
		Self {
			word_width,
			endianness,
		}
	}

	/// Parameters of the machine this code runs on.
	pub const fn native() -> Self {
		Self::new(WordWidth::native(), Endianness::native())
	}

	pub const fn word_bytes(&self) -> u32 {
		self.word_width.bytes()
	}

	/// Bytes a pointer reference occupies in the fixed region.
	pub const fn pointer_size(&self) -> u32 {
		2 * self.word_bytes()
	}

	/// Rounds `n` up to the next multiple of the word width.
	pub const fn align_word(&self, n: usize) -> usize {
		let word = self.word_bytes() as usize;
		n.div_ceil(word) * word
	}
}

impl Default for MachineParams {
	fn default() -> Self {
		Self::native()
	}
}

impl Display for MachineParams {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}-byte words, {}", self.word_bytes(), self.endianness.suffix())
	}
}
