// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Rekord

use num_traits::ToPrimitive;
use serde_json::{Map, Number, Value as JsonValue};

use super::Value;
use crate::Result;

impl Value {
	/// Converts a JSON document into a value tree. Strings become `Utf8`,
	/// integral numbers `Int`/`Uint`, other numbers `Float`.
	pub fn from_json(json: JsonValue) -> Self {
		match json {
			JsonValue::Null => Value::Null,
			JsonValue::Bool(b) => Value::Boolean(b),
			JsonValue::Number(n) => {
				if let Some(i) = n.as_i64() {
					Value::Int(i)
				} else if let Some(u) = n.as_u64() {
					Value::Uint(u)
				} else {
					Value::Float(n.as_f64().unwrap_or(f64::NAN))
				}
			}
			JsonValue::String(s) => Value::Utf8(s),
			JsonValue::Array(values) => Value::Array(values.into_iter().map(Value::from_json).collect()),
			JsonValue::Object(members) => {
				Value::Record(members.into_iter().map(|(k, v)| (k, Value::from_json(v))).collect())
			}
		}
	}

	pub fn from_json_str(input: &str) -> Result<Self> {
		Ok(Value::from_json(serde_json::from_str(input)?))
	}

	/// Converts the value tree into JSON. Integers too wide for JSON numbers
	/// are rendered as decimal strings, blobs as arrays of bytes.
	pub fn to_json(&self) -> JsonValue {
		match self {
			Value::Null => JsonValue::Null,
			Value::Boolean(b) => JsonValue::Bool(*b),
			Value::Int(v) => JsonValue::Number((*v).into()),
			Value::Uint(v) => JsonValue::Number((*v).into()),
			Value::BigInt(v) => match (v.to_i64(), v.to_u64()) {
				(Some(i), _) => JsonValue::Number(i.into()),
				(None, Some(u)) => JsonValue::Number(u.into()),
				_ => JsonValue::String(v.to_string()),
			},
			Value::Float(v) => Number::from_f64(*v).map(JsonValue::Number).unwrap_or(JsonValue::Null),
			Value::Utf8(s) => JsonValue::String(s.clone()),
			Value::Blob(b) => JsonValue::Array(b.iter().map(|&x| JsonValue::Number(x.into())).collect()),
			Value::Array(values) => JsonValue::Array(values.iter().map(Value::to_json).collect()),
			Value::Record(members) => {
				let mut map = Map::new();
				for (k, v) in members {
					map.insert(k.clone(), v.to_json());
				}
				JsonValue::Object(map)
			}
		}
	}
}
