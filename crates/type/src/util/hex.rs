// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Rekord

use crate::{Result, error::diagnostic::conversion::invalid_hex, return_error};

const DIGITS: &[u8; 16] = b"0123456789abcdef";

pub fn encode(bytes: &[u8]) -> String {
	let mut out = String::with_capacity(bytes.len() * 2);
	for &b in bytes {
		out.push(DIGITS[(b >> 4) as usize] as char);
		out.push(DIGITS[(b & 0x0f) as usize] as char);
	}
	out
}

pub fn decode(input: &str) -> Result<Vec<u8>> {
	let digits = input.as_bytes();
	if digits.len() % 2 != 0 {
		return_error!(invalid_hex(input));
	}

	let mut out = Vec::with_capacity(digits.len() / 2);
	for pair in digits.chunks_exact(2) {
		match (nibble(pair[0]), nibble(pair[1])) {
			(Some(hi), Some(lo)) => out.push(hi << 4 | lo),
			_ => return_error!(invalid_hex(input)),
		}
	}
	Ok(out)
}

fn nibble(c: u8) -> Option<u8> {
	match c {
		b'0'..=b'9' => Some(c - b'0'),
		b'a'..=b'f' => Some(c - b'a' + 10),
		b'A'..=b'F' => Some(c - b'A' + 10),
		_ => None,
	}
}
