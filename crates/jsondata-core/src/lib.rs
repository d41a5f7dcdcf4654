//! # jsondata-core
//!
//! An ordered, dot-path addressable document model with bridges to JSON,
//! XML and CSV.
//!
//! A [`Document`] maps string keys to [`Value`]s in insertion order. Keys
//! may be dot-paths (`"user.address.city"`) that address nested documents;
//! collisions are settled by a [`ConflictPolicy`]. Transforms never mutate
//! their input and share unchanged sub-documents with it.
//!
//! ## Quick start
//!
//! ```rust
//! use jsondata_core::{parse_json, to_json_compact, ConflictPolicy, Document, Value};
//!
//! let doc = Document::from_keys_and_values(
//!     ["user.name", "user.tags", "user.tags"],
//!     [Value::from("Alice"), Value::from("a"), Value::from("b")],
//!     true,
//!     ConflictPolicy::Combine,
//! )
//! .unwrap();
//! assert_eq!(doc.to_string(), r#"{"user":{"name":"Alice","tags":["a","b"]}}"#);
//!
//! let back = parse_json(&doc.to_string()).unwrap();
//! assert_eq!(back, Value::Document(doc));
//! assert_eq!(to_json_compact(&Value::from(2)).unwrap(), "2");
//! ```
//!
//! ## Modules
//!
//! - [`value`] / [`document`]: the data model
//! - [`path`]: dot-path helpers and [`MAX_DEPTH`]
//! - [`policy`]: collision resolution (`None`, `Update`, `Combine`)
//! - [`query`]: sort and filter collections of documents
//! - [`json`], [`xml`], [`csv`]: text bridges
//! - [`format`], [`files`]: dispatch by format name or file extension
//! - [`error`]: the [`DocError`] type

pub mod csv;
pub mod document;
pub mod error;
pub mod files;
pub mod format;
pub mod json;
pub mod path;
pub mod policy;
pub mod query;
pub mod value;
pub mod xml;

pub use csv::{parse_csv, to_csv};
pub use document::Document;
pub use error::{DocError, Result};
pub use files::{
    read_csv_file, read_file, read_file_as, read_json_file, read_xml_file, write_csv_file,
    write_file, write_file_as, write_json_file, write_xml_file,
};
pub use format::Format;
pub use json::{parse_json, parse_json_document, to_json, to_json_compact};
pub use path::MAX_DEPTH;
pub use policy::ConflictPolicy;
pub use query::{filter_by_field_value, sort_by_path_value};
pub use value::Value;
pub use xml::{parse_xml, to_xml};
