// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

use rekord_type::Result;

use crate::{
	error::SerializeError,
	machine::{Endianness, MachineParams, WordWidth},
};

/// The two words stored at a pointer field: absolute payload offset and
/// payload length in bytes. Offset 0 means null.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reference {
	pub offset: u64,
	pub len: u64,
}

impl Reference {
	pub const NULL: Reference = Reference {
		offset: 0,
		len: 0,
	};

	pub fn new(offset: u64, len: u64) -> Self {
		Self {
			offset,
			len,
		}
	}

	pub fn is_null(&self) -> bool {
		self.offset == 0
	}
}

/// Writes `reference` into `bytes`, which spans exactly two words.
pub fn write_reference(bytes: &mut [u8], machine: &MachineParams, reference: Reference) -> Result<()> {
	let word = machine.word_bytes() as usize;
	write_word(&mut bytes[..word], machine, reference.offset)?;
	write_word(&mut bytes[word..2 * word], machine, reference.len)
}

pub fn read_reference(bytes: &[u8], machine: &MachineParams) -> Reference {
	let word = machine.word_bytes() as usize;
	Reference {
		offset: read_word(&bytes[..word], machine),
		len: read_word(&bytes[word..2 * word], machine),
	}
}

fn write_word(bytes: &mut [u8], machine: &MachineParams, value: u64) -> Result<()> {
	let big = machine.endianness == Endianness::Big;
	match machine.word_width {
		WordWidth::Four => {
			let value = u32::try_from(value).map_err(|_| SerializeError::ValueOutOfRange {
				type_name: "pointer word".to_string(),
				value: value.to_string(),
			})?;
			bytes.copy_from_slice(&if big {
				value.to_be_bytes()
			} else {
				value.to_le_bytes()
			});
		}
		WordWidth::Eight => bytes.copy_from_slice(&if big {
			value.to_be_bytes()
		} else {
			value.to_le_bytes()
		}),
	}
	Ok(())
}

fn read_word(bytes: &[u8], machine: &MachineParams) -> u64 {
	let big = machine.endianness == Endianness::Big;
	match machine.word_width {
		WordWidth::Four => {
			let mut raw = [0u8; 4];
			raw.copy_from_slice(bytes);
			(if big {
				u32::from_be_bytes(raw)
			} else {
				u32::from_le_bytes(raw)
			}) as u64
		}
		WordWidth::Eight => {
			let mut raw = [0u8; 8];
			raw.copy_from_slice(bytes);
			if big {
				u64::from_be_bytes(raw)
			} else {
				u64::from_le_bytes(raw)
			}
		}
	}
}

#[cfg(test)]
pub mod tests {
	use super::*;

	#[test]
	fn test_eight_byte_little_endian() {
		let machine = MachineParams::new(WordWidth::Eight, Endianness::Little);
		let mut bytes = [0u8; 16];
		write_reference(&mut bytes, &machine, Reference::new(16, 12)).unwrap();
		assert_eq!(bytes[0], 16);
		assert_eq!(bytes[8], 12);
		assert_eq!(read_reference(&bytes, &machine), Reference::new(16, 12));
	}

	#[test]
	fn test_four_byte_big_endian() {
		let machine = MachineParams::new(WordWidth::Four, Endianness::Big);
		let mut bytes = [0u8; 8];
		write_reference(&mut bytes, &machine, Reference::new(0x0102, 3)).unwrap();
		assert_eq!(bytes, [0, 0, 1, 2, 0, 0, 0, 3]);
		assert_eq!(read_reference(&bytes, &machine), Reference::new(0x0102, 3));
	}

	#[test]
	fn test_four_byte_word_overflow() {
		let machine = MachineParams::new(WordWidth::Four, Endianness::Little);
		let mut bytes = [0u8; 8];
		assert!(write_reference(&mut bytes, &machine, Reference::new(u32::MAX as u64 + 1, 0)).is_err());
	}

	#[test]
	fn test_null() {
		let machine = MachineParams::native();
		let bytes = vec![0u8; machine.pointer_size() as usize];
		assert!(read_reference(&bytes, &machine).is_null());
	}
}
