//! Format dispatch: pick a bridge by name or by file extension.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::document::Document;
use crate::error::{DocError, Result};
use crate::value::Value;
use crate::{csv, json, xml};

/// A text format with a bridge in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Xml,
    Csv,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Json, Format::Xml, Format::Csv];

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Csv => "csv",
        }
    }

    /// Detect the format from a path's extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// [`DocError::UnsupportedExtension`] when the extension is missing or
    /// unknown.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Format::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(ext))
            .ok_or_else(|| DocError::UnsupportedExtension {
                path: path.display().to_string(),
                expected: Format::ALL
                    .iter()
                    .map(|f| format!(".{}", f.extension()))
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Parse text in this format.
    ///
    /// CSV yields a [`Value::List`] with one document per row.
    pub fn parse(self, text: &str) -> Result<Value> {
        match self {
            Format::Json => json::parse_json(text),
            Format::Xml => xml::parse_xml(text),
            Format::Csv => Ok(Value::List(
                csv::parse_csv(text)?
                    .into_iter()
                    .map(Value::Document)
                    .collect(),
            )),
        }
    }

    /// Render a value in this format.
    ///
    /// `root` names the XML root element and is ignored elsewhere. JSON is
    /// indented unless `compact` is set.
    ///
    /// # Errors
    ///
    /// [`DocError::InvalidValue`] when the value has no representation in
    /// this format: XML needs a document, CSV a document or a list of them.
    pub fn render(self, value: &Value, root: Option<&str>, compact: bool) -> Result<String> {
        match self {
            Format::Json if compact => json::to_json_compact(value),
            Format::Json => json::to_json(value),
            Format::Xml => match value {
                Value::Document(doc) => xml::to_xml(doc, root),
                other => Err(shape_error("XML", "a document", other)),
            },
            Format::Csv => csv::to_csv(&documents_of(value)?),
        }
    }
}

/// The rows of a CSV-bound value.
fn documents_of(value: &Value) -> Result<Vec<Document>> {
    match value {
        Value::Document(doc) => Ok(vec![doc.clone()]),
        Value::List(items) => items
            .iter()
            .map(|item| match item {
                Value::Document(doc) => Ok(doc.clone()),
                other => Err(shape_error("CSV", "documents", other)),
            })
            .collect(),
        other => Err(shape_error("CSV", "a document or a list of documents", other)),
    }
}

fn shape_error(format: &str, expected: &str, found: &Value) -> DocError {
    DocError::InvalidValue(format!(
        "{format} output needs {expected}, found {}",
        found.type_name()
    ))
}

impl FromStr for Format {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().trim_start_matches('.');
        Format::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(name))
            .ok_or_else(|| DocError::InvalidValue(format!("unknown format {s:?}")))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
