//! Error types for document construction, traversal and format conversion.

use thiserror::Error;

/// Errors that can occur while building, querying or converting documents.
///
/// All of these are data-validity errors reported synchronously to the
/// caller; nothing is retried internally.
#[derive(Error, Debug)]
pub enum DocError {
    /// Keys and values passed to a constructor have different lengths.
    #[error("keys and values need to be of same size (keys: {keys}, values: {values})")]
    ArityMismatch { keys: usize, values: usize },

    /// A key (or one of its dot-separated segments) is empty, whitespace-only,
    /// or not representable in the target format.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// A value has the wrong shape for the requested operation.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// A colliding insertion under the `Reject` policy.
    #[error("duplicate key {0:?}: use the Update or Combine option to resolve collisions")]
    DuplicateKey(String),

    /// The key (or a segment of a dot-path) does not exist.
    #[error("key not found: {0:?}")]
    KeyNotFound(String),

    /// A dot-path tried to descend through a value that is not a document.
    #[error("cannot traverse {key:?}: value is {found}, not a document")]
    PathTypeMismatch { key: String, found: &'static str },

    /// Two values of incompatible types were compared while sorting.
    #[error("values are not comparable: {left} vs {right}")]
    NotComparable {
        left: &'static str,
        right: &'static str,
    },

    /// Documents rendered as CSV do not share an identical key sequence.
    #[error(
        "not every document has the same keys (document {index}): expected {expected:?}, found {found:?}"
    )]
    SchemaMismatch {
        index: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// XML needs exactly one root element. Carries the number of candidates.
    #[error(
        "XML needs exactly one root element but the input has {0}: wrap the input in a single-key document or supply a root element name"
    )]
    AmbiguousRoot(usize),

    /// A file collaborator was given a path with the wrong extension.
    #[error("unsupported file extension for {path:?}: expected {expected}")]
    UnsupportedExtension { path: String, expected: String },

    /// Input text could not be parsed. Carries the parser's own message.
    #[error("malformed {format} input: {message}")]
    MalformedInput {
        format: &'static str,
        message: String,
    },

    /// Nesting went past [`crate::MAX_DEPTH`] levels.
    #[error("nesting depth exceeds the limit of {0} levels")]
    DepthLimit(usize),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for DocError {
    fn from(e: serde_json::Error) -> Self {
        DocError::MalformedInput {
            format: "JSON",
            message: e.to_string(),
        }
    }
}

impl DocError {
    /// Shorthand for a `MalformedInput` error with a formatted message.
    pub(crate) fn malformed(format: &'static str, message: impl Into<String>) -> Self {
        DocError::MalformedInput {
            format,
            message: message.into(),
        }
    }

    /// Shorthand for an `InvalidKey` error.
    pub(crate) fn invalid_key(key: &str, reason: impl Into<String>) -> Self {
        DocError::InvalidKey {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout jsondata-core.
pub type Result<T> = std::result::Result<T, DocError>;
