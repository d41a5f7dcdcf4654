//! Duplicate-key resolution.
//!
//! A [`ConflictPolicy`] is chosen per call and decides what happens when an
//! insertion hits a key that is already present at the same document level.

use std::fmt;
use std::str::FromStr;

use crate::error::{DocError, Result};
use crate::value::Value;

/// Strategy for resolving a colliding key insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConflictPolicy {
    /// Fail with [`DocError::DuplicateKey`]. Exposed to hosts as `"None"`.
    #[default]
    Reject,
    /// Overwrite the existing value. Exposed to hosts as `"Update"`.
    Replace,
    /// Merge both values, see [`combine`]. Exposed to hosts as `"Combine"`.
    Combine,
}

/// Host-facing option names, in display order.
const OPTIONS: [(&str, ConflictPolicy); 3] = [
    ("None", ConflictPolicy::Reject),
    ("Update", ConflictPolicy::Replace),
    ("Combine", ConflictPolicy::Combine),
];

impl ConflictPolicy {
    /// The name→policy table offered to host integrations.
    ///
    /// ```
    /// use jsondata_core::ConflictPolicy;
    /// let names: Vec<&str> = ConflictPolicy::options().iter().map(|(n, _)| *n).collect();
    /// assert_eq!(names, ["None", "Update", "Combine"]);
    /// ```
    pub fn options() -> &'static [(&'static str, ConflictPolicy)] {
        &OPTIONS
    }

    /// Host-facing name of this policy.
    pub fn name(self) -> &'static str {
        match self {
            ConflictPolicy::Reject => "None",
            ConflictPolicy::Replace => "Update",
            ConflictPolicy::Combine => "Combine",
        }
    }

    /// Look up a policy by its host-facing name (case-insensitive).
    ///
    /// The descriptive aliases `reject` and `replace` are accepted too.
    pub fn from_name(name: &str) -> Result<Self> {
        let wanted = name.trim();
        if let Some((_, policy)) = OPTIONS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(wanted))
        {
            return Ok(*policy);
        }
        match wanted.to_ascii_lowercase().as_str() {
            "reject" => Ok(ConflictPolicy::Reject),
            "replace" => Ok(ConflictPolicy::Replace),
            _ => Err(DocError::InvalidValue(format!(
                "unknown option {:?}: expected None, Update or Combine",
                name
            ))),
        }
    }

    /// Resolve a collision on `key` between the stored value and a new one.
    pub fn resolve(self, key: &str, existing: Value, incoming: Value) -> Result<Value> {
        match self {
            ConflictPolicy::Reject => Err(DocError::DuplicateKey(key.to_string())),
            ConflictPolicy::Replace => Ok(incoming),
            ConflictPolicy::Combine => Ok(combine(existing, incoming)),
        }
    }
}

impl FromStr for ConflictPolicy {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self> {
        ConflictPolicy::from_name(s)
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Merge two colliding values into one.
///
/// Rules, first match wins:
///
/// 1. Deeply equal values collapse to the existing one.
/// 2. If either side is a list, the other side is appended to it (a list
///    argument is spliced element by element). Existing elements come first.
/// 3. Between a blank string-like value (null, `""`, `"null"`) and a string,
///    the non-blank one is kept.
/// 4. Anything else becomes a two-element list `[existing, incoming]`.
pub fn combine(existing: Value, incoming: Value) -> Value {
    if existing == incoming {
        return existing;
    }
    match (existing, incoming) {
        (Value::List(mut items), Value::List(more)) => {
            items.extend(more);
            Value::List(items)
        }
        (Value::List(mut items), other) => {
            items.push(other);
            Value::List(items)
        }
        (other, Value::List(more)) => {
            let mut items = Vec::with_capacity(more.len() + 1);
            items.push(other);
            items.extend(more);
            Value::List(items)
        }
        (old, new) if is_string_like(&old) && is_string_like(&new) => {
            if old.is_blank() && !new.is_blank() {
                new
            } else if new.is_blank() {
                old
            } else {
                Value::List(vec![old, new])
            }
        }
        (old, new) => Value::List(vec![old, new]),
    }
}

fn is_string_like(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Null)
}
