//! Sorting and filtering collections of documents by a path's value.

use std::cmp::Ordering;

use crate::document::Document;
use crate::error::{DocError, Result};
use crate::value::Value;

/// Comparison family of a value; only values of the same family are ordered
/// against each other (integers and floats share one).
#[derive(Clone, Copy, PartialEq)]
enum Family {
    Null,
    Bool,
    Number,
    Text,
    Unordered,
}

fn family(value: &Value) -> Family {
    match value {
        Value::Null => Family::Null,
        Value::Bool(_) => Family::Bool,
        Value::Integer(_) | Value::Float(_) => Family::Number,
        Value::String(_) => Family::Text,
        Value::Document(_) | Value::List(_) => Family::Unordered,
    }
}

/// Compare two values by their natural order.
///
/// Null sorts below everything. Integers and floats compare numerically,
/// strings by ordinal (byte-wise UTF-8) order, `false` before `true`.
///
/// # Errors
///
/// [`DocError::NotComparable`] for mismatched families, documents and lists.
pub fn compare_values(a: &Value, b: &Value) -> Result<Ordering> {
    match (family(a), family(b)) {
        (Family::Null, Family::Null) => Ok(Ordering::Equal),
        (Family::Null, _) => Ok(Ordering::Less),
        (_, Family::Null) => Ok(Ordering::Greater),
        (fa, fb) if fa == fb && fa != Family::Unordered => Ok(compare_same_family(a, b)),
        _ => Err(DocError::NotComparable {
            left: a.type_name(),
            right: b.type_name(),
        }),
    }
}

/// Infallible comparison for values already known to share a family.
fn compare_same_family(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => Ordering::Equal,
        },
    }
}

/// Stable-sort documents by the value at `path`, ascending.
///
/// Returns the sorted documents and, in parallel, the value each was sorted
/// by. Documents where the path is missing (or crosses a non-document) sort
/// first, keep their relative order, and report [`Value::Null`].
///
/// # Errors
///
/// [`DocError::NotComparable`] when the present values mix families or
/// include documents or lists. Nothing is sorted in that case.
///
/// ```
/// use jsondata_core::{query::sort_by_path_value, ConflictPolicy, Document, Value};
///
/// let docs: Vec<Document> = [3, 1, 2]
///     .into_iter()
///     .map(|n| Document::from_keys_and_values(["n"], [n], false, ConflictPolicy::Reject).unwrap())
///     .collect();
/// let (_, values) = sort_by_path_value(&docs, "n").unwrap();
/// assert_eq!(values, vec![Value::from(1), Value::from(2), Value::from(3)]);
/// ```
pub fn sort_by_path_value(docs: &[Document], path: &str) -> Result<(Vec<Document>, Vec<Value>)> {
    let mut keyed: Vec<(&Document, Value)> = docs
        .iter()
        .map(|doc| {
            let value = doc.get_path(path, true).cloned().unwrap_or(Value::Null);
            (doc, value)
        })
        .collect();

    let mut seen: Option<&Value> = None;
    for (_, value) in &keyed {
        let current = family(value);
        if current == Family::Null {
            continue;
        }
        if current == Family::Unordered {
            return Err(DocError::NotComparable {
                left: value.type_name(),
                right: value.type_name(),
            });
        }
        match seen {
            Some(first) if family(first) != current => {
                return Err(DocError::NotComparable {
                    left: first.type_name(),
                    right: value.type_name(),
                })
            }
            Some(_) => {}
            None => seen = Some(value),
        }
    }

    keyed.sort_by(|(_, a), (_, b)| match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => compare_same_family(a, b),
    });
    tracing::debug!(path, count = keyed.len(), "sorted documents by path value");

    Ok(keyed
        .into_iter()
        .map(|(doc, value)| (doc.clone(), value))
        .unzip())
}

/// Split documents into those whose value at `path` matches and the rest.
///
/// A string `value` matches by case-insensitive substring containment in
/// the field's text; any other `value` matches by structural equality.
/// Documents where the path is missing or cannot be traversed simply do not
/// match.
pub fn filter_by_field_value(
    docs: &[Document],
    path: &str,
    value: &Value,
) -> (Vec<Document>, Vec<Document>) {
    let needle = value.as_str().map(str::to_lowercase);
    docs.iter().cloned().partition(|doc| match doc.get_path(path, true) {
        Ok(field) => match &needle {
            Some(needle) => field.to_string().to_lowercase().contains(needle.as_str()),
            None => field == value,
        },
        Err(_) => false,
    })
}
