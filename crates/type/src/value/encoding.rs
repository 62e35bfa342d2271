// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Rekord

use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::util::hex;

/// Character encoding used when strings are written into or read out of
/// byte regions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
	#[default]
	Utf8,
	/// 7-bit ASCII; other characters become `?`
	Ascii,
	/// ISO-8859-1; characters above U+00FF become `?`
	Latin1,
	Utf16Le,
	/// The string holds hex digit pairs, each pair is one byte
	Hex,
}

impl Encoding {
	pub fn encode(&self, s: &str) -> Vec<u8> {
		self.encode_bounded(s, usize::MAX)
	}

	/// Encodes `s` into at most `limit` bytes. A character that does not fit
	/// completely is dropped together with everything after it.
	pub fn encode_bounded(&self, s: &str, limit: usize) -> Vec<u8> {
		let mut out = Vec::new();
		match self {
			Encoding::Utf8 => {
				let mut end = s.len().min(limit);
				while !s.is_char_boundary(end) {
					end -= 1;
				}
				out.extend_from_slice(&s.as_bytes()[..end]);
			}
			Encoding::Ascii => {
				for c in s.chars().take(limit) {
					out.push(if c.is_ascii() { c as u8 } else { b'?' });
				}
			}
			Encoding::Latin1 => {
				for c in s.chars().take(limit) {
					out.push(if (c as u32) <= 0xff { c as u8 } else { b'?' });
				}
			}
			Encoding::Utf16Le => {
				let mut units = [0u16; 2];
				for c in s.chars() {
					let encoded = c.encode_utf16(&mut units);
					if out.len() + encoded.len() * 2 > limit {
						break;
					}
					for unit in encoded.iter() {
						out.extend_from_slice(&unit.to_le_bytes());
					}
				}
			}
			Encoding::Hex => {
				let digits = s.as_bytes();
				let mut pairs = digits.chunks_exact(2);
				while out.len() < limit {
					let Some(pair) = pairs.next() else {
						break;
					};
					let Ok(text) = std::str::from_utf8(pair) else {
						break;
					};
					let Ok(byte) = hex::decode(text) else {
						break;
					};
					out.extend_from_slice(&byte);
				}
			}
		}
		out
	}

	pub fn decode(&self, bytes: &[u8]) -> String {
		match self {
			Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
			Encoding::Ascii => bytes.iter().map(|&b| (b & 0x7f) as char).collect(),
			Encoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
			Encoding::Utf16Le => {
				let units: Vec<u16> =
					bytes.chunks_exact(2).map(|pair| u16::from_le_bytes([pair[0], pair[1]])).collect();
				String::from_utf16_lossy(&units)
			}
			Encoding::Hex => hex::encode(bytes),
		}
	}

	/// Decodes a fixed-capacity region: output stops at the first NUL
	/// character (a NUL code unit for UTF-16LE).
	pub fn decode_terminated(&self, bytes: &[u8]) -> String {
		match self {
			Encoding::Hex => self.decode(bytes),
			Encoding::Utf16Le => {
				let end = bytes
					.chunks_exact(2)
					.position(|pair| pair[0] == 0 && pair[1] == 0)
					.map(|units| units * 2)
					.unwrap_or(bytes.len());
				self.decode(&bytes[..end])
			}
			_ => {
				let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
				self.decode(&bytes[..end])
			}
		}
	}
}

impl FromStr for Encoding {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"utf8" | "utf-8" => Ok(Encoding::Utf8),
			"ascii" => Ok(Encoding::Ascii),
			"latin1" | "binary" => Ok(Encoding::Latin1),
			"utf16le" | "utf-16le" | "ucs2" | "ucs-2" => Ok(Encoding::Utf16Le),
			"hex" => Ok(Encoding::Hex),
			other => Err(format!("unknown encoding '{}'", other)),
		}
	}
}

impl Display for Encoding {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			Encoding::Utf8 => "utf8",
			Encoding::Ascii => "ascii",
			Encoding::Latin1 => "latin1",
			Encoding::Utf16Le => "utf16le",
			Encoding::Hex => "hex",
		})
	}
}
