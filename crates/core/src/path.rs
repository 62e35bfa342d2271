// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One step of a field path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
	/// A member of a record
	Field(String),
	/// Element `idx` of the record array `name`
	Index(String, u32),
}

impl PathSegment {
	pub fn name(&self) -> &str {
		match self {
			PathSegment::Field(name) => name,
			PathSegment::Index(name, _) => name,
		}
	}
}

impl Display for PathSegment {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			PathSegment::Field(name) => f.write_str(name),
			PathSegment::Index(name, idx) => write!(f, "{}[{}]", name, idx),
		}
	}
}

/// Structured path of a compiled field, e.g. `.points[1].x`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPath(SmallVec<[PathSegment; 4]>);

impl FieldPath {
	pub fn root() -> Self {
		Self(SmallVec::new())
	}

	pub fn segments(&self) -> &[PathSegment] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// The last segment, i.e. the field's own name.
	pub fn leaf(&self) -> Option<&PathSegment> {
		self.0.last()
	}

	pub fn child(&self, segment: PathSegment) -> Self {
		let mut result = self.clone();
		result.0.push(segment);
		result
	}

	pub fn field(&self, name: impl Into<String>) -> Self {
		self.child(PathSegment::Field(name.into()))
	}

	pub fn index(&self, name: impl Into<String>, idx: u32) -> Self {
		self.child(PathSegment::Index(name.into(), idx))
	}

	/// Parses the dotted form. A leading dot is optional; `name[idx]` becomes
	/// an index segment. Returns `None` for empty segments or malformed
	/// indices.
	pub fn parse(path: &str) -> Option<Self> {
		let trimmed = path.strip_prefix('.').unwrap_or(path);
		if trimmed.is_empty() {
			return None;
		}

		let mut segments = SmallVec::new();
		for part in trimmed.split('.') {
			segments.push(parse_segment(part)?);
		}
		Some(Self(segments))
	}
}

fn parse_segment(part: &str) -> Option<PathSegment> {
	if part.is_empty() {
		return None;
	}

	let Some(open) = part.find('[') else {
		return Some(PathSegment::Field(part.to_string()));
	};

	let digits = part[open + 1..].strip_suffix(']')?;
	if open == 0 || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	Some(PathSegment::Index(part[..open].to_string(), digits.parse().ok()?))
}

impl Display for FieldPath {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		for segment in self.0.iter() {
			write!(f, ".{}", segment)?;
		}
		Ok(())
	}
}

impl FromIterator<PathSegment> for FieldPath {
	fn from_iter<T: IntoIterator<Item = PathSegment>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}

#[cfg(test)]
pub mod tests {
	use super::*;

	#[test]
	fn test_display() {
		let path = FieldPath::root().field("a").index("points", 2).field("x");
		assert_eq!(path.to_string(), ".a.points[2].x");
		assert_eq!(FieldPath::root().to_string(), "");
	}

	#[test]
	fn test_parse_roundtrip() {
		for text in [".a", ".a.b", ".points[0].x", ".outer[3].inner[1].v"] {
			assert_eq!(FieldPath::parse(text).unwrap().to_string(), text);
		}
	}

	#[test]
	fn test_parse_without_leading_dot() {
		assert_eq!(FieldPath::parse("a.b"), FieldPath::parse(".a.b"));
	}

	#[test]
	fn test_parse_rejects_malformed() {
		for text in ["", ".", ".a..b", ".a.", ".p[]", ".p[x]", ".[1]", ".p[1"] {
			assert_eq!(FieldPath::parse(text), None, "{text}");
		}
	}

	#[test]
	fn test_leaf() {
		let path = FieldPath::parse(".a.items[4]").unwrap();
		assert_eq!(path.leaf(), Some(&PathSegment::Index("items".to_string(), 4)));
		assert_eq!(path.leaf().map(PathSegment::name), Some("items"));
	}
}
