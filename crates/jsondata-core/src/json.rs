//! JSON serializer: `Value`/`Document` trees to and from JSON text.
//!
//! Serialization goes through serde, with `serde_json` as the text backend.
//! Object keys are written in document insertion order. Every JSON object
//! becomes a [`Document`], every array a [`Value::List`], `null` becomes
//! [`Value::Null`], and numbers become [`Value::Integer`] unless they carry
//! a fraction or an exponent, in which case they become [`Value::Float`].
//!
//! # Example
//! ```
//! use jsondata_core::json::{parse_json, to_json_compact};
//!
//! let value = parse_json(r#"{"name":"Alice","scores":[95,87.5]}"#).unwrap();
//! assert_eq!(to_json_compact(&value).unwrap(), r#"{"name":"Alice","scores":[95,87.5]}"#);
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::document::{insert_literal, Document};
use crate::error::{DocError, Result};
use crate::path::MAX_DEPTH;
use crate::policy::ConflictPolicy;
use crate::value::Value;

/// Parse JSON text of any shape into a value tree.
///
/// Duplicate keys inside one object are rejected, since objects are built
/// with the `Reject` policy.
pub fn parse_json(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

/// Parse JSON text that must hold an object.
pub fn parse_json_document(text: &str) -> Result<Document> {
    match parse_json(text)? {
        Value::Document(doc) => Ok(doc),
        other => Err(DocError::InvalidValue(format!(
            "expected a JSON object, found {}",
            other.type_name()
        ))),
    }
}

/// Serialize to indented JSON (two spaces per level).
///
/// Fails with [`DocError::DepthLimit`] when containers nest [`MAX_DEPTH`]
/// levels deep, since the parser could not read such text back.
pub fn to_json(value: &Value) -> Result<String> {
    check_depth(value, 0)?;
    Ok(serde_json::to_string_pretty(value)?)
}

/// Serialize to JSON without any whitespace.
pub fn to_json_compact(value: &Value) -> Result<String> {
    check_depth(value, 0)?;
    Ok(serde_json::to_string(value)?)
}

/// `depth` counts the containers enclosing `value`.
fn check_depth(value: &Value, depth: usize) -> Result<()> {
    match value {
        Value::Document(_) | Value::List(_) if depth + 1 >= MAX_DEPTH => {
            Err(DocError::DepthLimit(MAX_DEPTH))
        }
        Value::Document(doc) => doc.values().try_for_each(|v| check_depth(v, depth + 1)),
        Value::List(items) => items.iter().try_for_each(|v| check_depth(v, depth + 1)),
        _ => Ok(()),
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            // NaN and infinities have no JSON token; emit their text instead
            // of failing the whole document.
            Value::Float(f) if !f.is_finite() => serializer.serialize_str(&f.to_string()),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Document(doc) => doc.serialize(serializer),
            Value::List(items) => serializer.collect_seq(items),
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> std::result::Result<Value, E> {
        Ok(Value::Integer(n))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> std::result::Result<Value, E> {
        Ok(match i64::try_from(n) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::Float(n as f64),
        })
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> std::result::Result<Value, E> {
        Ok(Value::Float(f))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> std::result::Result<Value, E> {
        Ok(Value::String(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> std::result::Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<Value, D::Error> {
        Deserialize::deserialize(d)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Value, A::Error> {
        let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            insert_literal(&mut entries, &key, value, ConflictPolicy::Reject)
                .map_err(<A::Error as de::Error>::custom)?;
        }
        Ok(Value::Document(Document::from_entries_map(entries)))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Document(doc) => Ok(doc),
            other => Err(de::Error::invalid_type(
                de::Unexpected::Other(other.type_name()),
                &"a JSON object",
            )),
        }
    }
}
