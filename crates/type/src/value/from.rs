// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Rekord

use indexmap::IndexMap;
use num_bigint::BigInt;

use super::Value;

macro_rules! impl_from_signed {
	($($t:ty),*) => {
		$(impl From<$t> for Value {
			fn from(v: $t) -> Self {
				Value::Int(v as i64)
			}
		})*
	};
}

macro_rules! impl_from_unsigned {
	($($t:ty),*) => {
		$(impl From<$t> for Value {
			fn from(v: $t) -> Self {
				Value::Uint(v as u64)
			}
		})*
	};
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Boolean(v)
	}
}

impl From<f32> for Value {
	fn from(v: f32) -> Self {
		Value::Float(v as f64)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float(v)
	}
}

impl From<BigInt> for Value {
	fn from(v: BigInt) -> Self {
		Value::BigInt(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Utf8(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Utf8(v)
	}
}

impl From<Vec<Value>> for Value {
	fn from(v: Vec<Value>) -> Self {
		Value::Array(v)
	}
}

impl From<IndexMap<String, Value>> for Value {
	fn from(v: IndexMap<String, Value>) -> Self {
		Value::Record(v)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(v: Option<T>) -> Self {
		match v {
			Some(v) => v.into(),
			None => Value::Null,
		}
	}
}
