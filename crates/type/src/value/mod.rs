// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Rekord

use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

pub mod encoding;
mod from;
mod json;

pub use encoding::Encoding;

use crate::util::hex;

/// A node of the untyped value tree a record buffer is serialized from and
/// deserialized into.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Value {
	/// Absent value; pointer fields serialize it as a null reference
	Null,
	/// A boolean: true or false.
	Boolean(bool),
	/// A signed integer that fits 8 bytes
	Int(i64),
	/// An unsigned integer that fits 8 bytes
	Uint(u64),
	/// An arbitrary-width integer
	BigInt(BigInt),
	/// A floating point number
	Float(f64),
	/// A UTF-8 encoded text
	Utf8(String),
	/// Raw bytes
	Blob(Vec<u8>),
	/// An ordered list of values
	Array(Vec<Value>),
	/// Named members in insertion order
	Record(IndexMap<String, Value>),
}

impl Value {
	pub fn bigint(v: impl Into<BigInt>) -> Self {
		Value::BigInt(v.into())
	}

	pub fn utf8(v: impl Into<String>) -> Self {
		Value::Utf8(v.into())
	}

	pub fn blob(v: impl Into<Vec<u8>>) -> Self {
		Value::Blob(v.into())
	}

	pub fn array(values: impl IntoIterator<Item = Value>) -> Self {
		Value::Array(values.into_iter().collect())
	}

	pub fn record<K: Into<String>>(members: impl IntoIterator<Item = (K, Value)>) -> Self {
		Value::Record(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
	}

	pub fn empty_record() -> Self {
		Value::Record(IndexMap::new())
	}
}

impl Value {
	/// Short name of the value's kind, used in diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Boolean(_) => "boolean",
			Value::Int(_) => "int",
			Value::Uint(_) => "uint",
			Value::BigInt(_) => "bigint",
			Value::Float(_) => "float",
			Value::Utf8(_) => "utf8",
			Value::Blob(_) => "blob",
			Value::Array(_) => "array",
			Value::Record(_) => "record",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn is_integer(&self) -> bool {
		matches!(self, Value::Int(_) | Value::Uint(_) | Value::BigInt(_))
	}

	pub fn as_record(&self) -> Option<&IndexMap<String, Value>> {
		match self {
			Value::Record(members) => Some(members),
			_ => None,
		}
	}

	/// Looks up a member of a record; `None` for other kinds.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.as_record().and_then(|members| members.get(key))
	}

	/// Integer view of the value. Booleans count as 0 / 1.
	pub fn to_bigint(&self) -> Option<BigInt> {
		match self {
			Value::Boolean(b) => Some(BigInt::from(*b as u8)),
			Value::Int(v) => Some(BigInt::from(*v)),
			Value::Uint(v) => Some(BigInt::from(*v)),
			Value::BigInt(v) => Some(v.clone()),
			_ => None,
		}
	}

	pub fn to_i128(&self) -> Option<i128> {
		match self {
			Value::Boolean(b) => Some(*b as i128),
			Value::Int(v) => Some(*v as i128),
			Value::Uint(v) => Some(*v as i128),
			Value::BigInt(v) => v.to_i128(),
			_ => None,
		}
	}

	pub fn to_f64(&self) -> Option<f64> {
		match self {
			Value::Float(v) => Some(*v),
			Value::Int(v) => Some(*v as f64),
			Value::Uint(v) => Some(*v as f64),
			Value::BigInt(v) => v.to_f64(),
			_ => None,
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Null, Value::Null) => true,
			(Value::Boolean(l), Value::Boolean(r)) => l == r,
			(Value::Int(l), Value::Int(r)) => l == r,
			(Value::Uint(l), Value::Uint(r)) => l == r,
			(Value::Int(l), Value::Uint(r)) | (Value::Uint(r), Value::Int(l)) => *l as i128 == *r as i128,
			(Value::BigInt(l), r) if r.is_integer() => r.to_bigint().is_some_and(|r| *l == r),
			(l, Value::BigInt(r)) if l.is_integer() => l.to_bigint().is_some_and(|l| l == *r),
			(Value::Float(l), Value::Float(r)) => l == r || (l.is_nan() && r.is_nan()),
			(Value::Utf8(l), Value::Utf8(r)) => l == r,
			(Value::Blob(l), Value::Blob(r)) => l == r,
			(Value::Array(l), Value::Array(r)) => l == r,
			(Value::Record(l), Value::Record(r)) => l == r,
			_ => false,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Null => f.write_str("null"),
			Value::Boolean(true) => f.write_str("true"),
			Value::Boolean(false) => f.write_str("false"),
			Value::Int(v) => Display::fmt(v, f),
			Value::Uint(v) => Display::fmt(v, f),
			Value::BigInt(v) => Display::fmt(v, f),
			Value::Float(v) => Display::fmt(v, f),
			Value::Utf8(s) => write!(f, "{:?}", s),
			Value::Blob(b) => write!(f, "0x{}", hex::encode(b)),
			Value::Array(values) => {
				f.write_str("[")?;
				for (i, v) in values.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}", v)?;
				}
				f.write_str("]")
			}
			Value::Record(members) => {
				f.write_str("{")?;
				for (i, (k, v)) in members.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}: {}", k, v)?;
				}
				f.write_str("}")
			}
		}
	}
}

#[cfg(test)]
pub mod tests {
	use num_bigint::BigInt;

	use super::*;

	mod equality {
		use super::*;

		#[test]
		fn test_int_uint_compare_by_value() {
			assert_eq!(Value::Int(5), Value::Uint(5));
			assert_ne!(Value::Int(-1), Value::Uint(u64::MAX));
		}

		#[test]
		fn test_bigint_compares_with_small_ints() {
			assert_eq!(Value::BigInt(BigInt::from(42)), Value::Int(42));
			assert_eq!(Value::Uint(7), Value::BigInt(BigInt::from(7)));
			assert_ne!(Value::BigInt(BigInt::from(-3)), Value::Uint(3));
		}

		#[test]
		fn test_float_only_equals_float() {
			assert_eq!(Value::Float(1.5), Value::Float(1.5));
			assert_ne!(Value::Float(1.0), Value::Int(1));
			assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
		}

		#[test]
		fn test_record_member_order_matters_for_values_only() {
			let a = Value::record([("x", Value::Int(1)), ("y", Value::Int(2))]);
			let b = Value::record([("x", Value::Uint(1)), ("y", Value::Uint(2))]);
			assert_eq!(a, b);
		}
	}

	mod display {
		use super::*;

		#[test]
		fn test_nested() {
			let v = Value::record([
				("a", Value::Int(1)),
				("b", Value::array([Value::utf8("x"), Value::Null])),
				("c", Value::blob(vec![0xde, 0xad])),
			]);
			assert_eq!(v.to_string(), r#"{a: 1, b: ["x", null], c: 0xdead}"#);
		}
	}
}
