//! The ordered, dot-path addressable `Document`.
//!
//! A document maps non-empty string keys to [`Value`]s in insertion order.
//! Every transform (`add`, `remove`, `merge`, `sort_keys`) returns a new
//! document. Entries sit behind an `Arc`, so clones are cheap and unchanged
//! sub-documents are shared between the input and the output; a shared
//! child is copied only when a transform actually needs to change it.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{DocError, Result};
use crate::path;
use crate::policy::ConflictPolicy;
use crate::value::Value;

type Entries = IndexMap<String, Value>;

/// Ordered string-keyed mapping of values.
#[derive(Debug, Clone, Default)]
pub struct Document {
    entries: Arc<Entries>,
}

impl Document {
    /// An empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries_map(entries: Entries) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Build a document from parallel key and value sequences.
    ///
    /// With `nesting` on, a key such as `"a.b.c"` creates (or descends into)
    /// the child documents `a` and `a.b` and stores the value under `c`.
    /// With `nesting` off, keys are stored literally. Collisions at any level
    /// are settled by `policy`.
    ///
    /// # Errors
    ///
    /// - [`DocError::ArityMismatch`] if the sequences differ in length
    /// - [`DocError::InvalidKey`] for empty keys or empty path segments
    /// - [`DocError::DuplicateKey`] for collisions under `Reject`
    /// - [`DocError::DepthLimit`] for paths of [`path::MAX_DEPTH`] or more segments
    ///
    /// ```
    /// use jsondata_core::{ConflictPolicy, Document, Value};
    ///
    /// let doc = Document::from_keys_and_values(["a.b"], [1], true, ConflictPolicy::Reject).unwrap();
    /// assert_eq!(doc.keys().collect::<Vec<_>>(), ["a"]);
    /// assert_eq!(doc.get_path("a.b", true).unwrap(), &Value::from(1));
    /// ```
    pub fn from_keys_and_values<K, V>(
        keys: impl IntoIterator<Item = K>,
        values: impl IntoIterator<Item = V>,
        nesting: bool,
        policy: ConflictPolicy,
    ) -> Result<Self>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if keys.len() != values.len() {
            return Err(DocError::ArityMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        Self::from_pairs(keys.into_iter().zip(values), nesting, policy)
    }

    /// Build a document from `(key, value)` pairs, see
    /// [`Document::from_keys_and_values`].
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (String, Value)>,
        nesting: bool,
        policy: ConflictPolicy,
    ) -> Result<Self> {
        let pairs = pairs.into_iter();
        let mut entries = Entries::with_capacity(pairs.size_hint().0);
        for (key, value) in pairs {
            if nesting {
                path::validate_path(&key)?;
                insert_nested(&mut entries, &key, value, policy)?;
            } else {
                insert_literal(&mut entries, &key, value, policy)?;
            }
        }
        Ok(Self::from_entries_map(entries))
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-level keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Top-level values in insertion order, parallel to [`Document::keys`].
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    /// `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Single-level lookup; the key is never split.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Look up a value, descending through child documents when `nesting`
    /// is on and the path contains dots.
    ///
    /// # Errors
    ///
    /// - [`DocError::KeyNotFound`] when a segment is missing
    /// - [`DocError::PathTypeMismatch`] when an intermediate segment holds a
    ///   value that is not a document
    pub fn get_path(&self, path: &str, nesting: bool) -> Result<&Value> {
        if !nesting || !path::is_nested(path) {
            return self
                .entries
                .get(path)
                .ok_or_else(|| DocError::KeyNotFound(path.to_string()));
        }

        let segments = path::split(path);
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(DocError::KeyNotFound(path.to_string()));
        };
        let mut current = self;
        for (i, segment) in parents.iter().enumerate() {
            match current.entries.get(*segment) {
                Some(Value::Document(child)) => current = child,
                Some(other) => {
                    return Err(DocError::PathTypeMismatch {
                        key: path::join(&segments[..=i]),
                        found: other.type_name(),
                    })
                }
                None => return Err(DocError::KeyNotFound(path::join(&segments[..=i]))),
            }
        }
        current
            .entries
            .get(*leaf)
            .ok_or_else(|| DocError::KeyNotFound(path.to_string()))
    }

    /// Append new pairs after this document's own and rebuild.
    ///
    /// Equivalent to constructing from the concatenation of
    /// `self.keys() ++ keys` and `self.values() ++ values`.
    pub fn add<K, V>(
        &self,
        keys: impl IntoIterator<Item = K>,
        values: impl IntoIterator<Item = V>,
        nesting: bool,
        policy: ConflictPolicy,
    ) -> Result<Document>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if keys.len() != values.len() {
            return Err(DocError::ArityMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        let pairs = self.owned_pairs().chain(keys.into_iter().zip(values));
        Document::from_pairs(pairs, nesting, policy)
    }

    /// Remove keys (or nested paths) and return the pruned document.
    ///
    /// When a nested removal leaves its parent document empty, the parent's
    /// own key is removed as well, all the way up. Paths are applied in order
    /// against a working copy, so earlier removals never disturb later ones.
    ///
    /// # Errors
    ///
    /// [`DocError::KeyNotFound`] if a path does not exist, or
    /// [`DocError::PathTypeMismatch`] if it crosses a non-document value.
    pub fn remove<S: AsRef<str>>(&self, paths: &[S], nesting: bool) -> Result<Document> {
        let mut entries: Entries = (*self.entries).clone();
        for p in paths {
            let p = p.as_ref();
            if nesting && path::is_nested(p) {
                remove_segments(&mut entries, &path::split(p), p)?;
            } else if entries.shift_remove(p).is_none() {
                return Err(DocError::KeyNotFound(p.to_string()));
            }
        }
        Ok(Document::from_entries_map(entries))
    }

    /// Merge `others` into this document.
    ///
    /// All pairs of `self`, then of each document in `others`, are fed in
    /// order through nested construction with `policy`. Under `Replace` the
    /// last writer wins.
    pub fn merge(&self, others: &[Document], policy: ConflictPolicy) -> Result<Document> {
        let pairs = self
            .owned_pairs()
            .chain(others.iter().flat_map(Document::owned_pairs));
        Document::from_pairs(pairs, true, policy)
    }

    /// Top-level keys sorted by ordinal string comparison.
    ///
    /// Nested documents keep their own order; apply recursively for a deep
    /// sort.
    pub fn sort_keys(&self) -> Document {
        let mut entries: Entries = (*self.entries).clone();
        entries.sort_keys();
        Document::from_entries_map(entries)
    }

    fn owned_pairs(&self) -> impl Iterator<Item = (String, Value)> + '_ {
        self.entries.iter().map(|(k, v)| (k.clone(), v.clone()))
    }
}

/// Insert `key` verbatim, settling a collision with `policy`.
pub(crate) fn insert_literal(
    entries: &mut Entries,
    key: &str,
    value: Value,
    policy: ConflictPolicy,
) -> Result<()> {
    path::validate_key(key)?;
    match entries.get_mut(key) {
        Some(slot) => {
            tracing::debug!(key, policy = %policy, "resolving key collision");
            let existing = std::mem::take(slot);
            *slot = policy.resolve(key, existing, value)?;
        }
        None => {
            tracing::trace!(key, "inserting key");
            entries.insert(key.to_string(), value);
        }
    }
    Ok(())
}

/// Insert along a dot-path, creating or descending into child documents.
///
/// If the head segment already holds a non-document, the freshly built
/// child document collides with it and `policy` decides.
fn insert_nested(
    entries: &mut Entries,
    key: &str,
    value: Value,
    policy: ConflictPolicy,
) -> Result<()> {
    let (head, rest) = path::split_first(key);
    let Some(rest) = rest else {
        return insert_literal(entries, head, value, policy);
    };

    if let Some(Value::Document(child)) = entries.get_mut(head) {
        return insert_nested(Arc::make_mut(&mut child.entries), rest, value, policy);
    }

    let mut fresh = Entries::new();
    insert_nested(&mut fresh, rest, value, policy)?;
    insert_literal(
        entries,
        head,
        Value::Document(Document::from_entries_map(fresh)),
        policy,
    )
}

/// Remove the leaf of `segments`, pruning parents that end up empty.
fn remove_segments(entries: &mut Entries, segments: &[&str], full_path: &str) -> Result<()> {
    let Some((head, rest)) = segments.split_first() else {
        return Ok(());
    };
    if rest.is_empty() {
        return match entries.shift_remove(*head) {
            Some(_) => Ok(()),
            None => Err(DocError::KeyNotFound(full_path.to_string())),
        };
    }

    let child = match entries.get_mut(*head) {
        Some(Value::Document(child)) => child,
        Some(other) => {
            return Err(DocError::PathTypeMismatch {
                key: (*head).to_string(),
                found: other.type_name(),
            })
        }
        None => return Err(DocError::KeyNotFound(full_path.to_string())),
    };
    let child_entries = Arc::make_mut(&mut child.entries);
    remove_segments(child_entries, rest, full_path)?;
    if child_entries.is_empty() {
        tracing::debug!(key = *head, path = full_path, "pruning empty parent");
        entries.shift_remove(*head);
    }
    Ok(())
}

/// Documents are equal when they hold equal pairs in the same order.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
            || (self.len() == other.len()
                && self
                    .entries
                    .iter()
                    .zip(other.entries.iter())
                    .all(|(a, b)| a == b))
    }
}

/// Compact JSON by default, indented JSON with `{:#}`.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = Value::Document(self.clone());
        let text = if f.alternate() {
            crate::json::to_json(&value)
        } else {
            crate::json::to_json_compact(&value)
        };
        f.write_str(&text.map_err(|_| fmt::Error)?)
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
