// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

use super::BaseType;
use crate::machine::Endianness;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParsedTypeName {
	pub base: BaseType,
	pub endianness: Option<Endianness>,
	pub pointer: bool,
}

/// Splits a type name of the form `base(_be|_le)?(_p)?` into its parts.
pub fn parse_type_name(name: &str) -> Option<ParsedTypeName> {
	let (rest, pointer) = match name.strip_suffix("_p") {
		Some(rest) => (rest, true),
		None => (name, false),
	};

	let (rest, endianness) = if let Some(rest) = rest.strip_suffix("_be") {
		(rest, Some(Endianness::Big))
	} else if let Some(rest) = rest.strip_suffix("_le") {
		(rest, Some(Endianness::Little))
	} else {
		(rest, None)
	};

	Some(ParsedTypeName {
		base: BaseType::from_name(rest)?,
		endianness,
		pointer,
	})
}
