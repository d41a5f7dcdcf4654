//! File collaborators: read and write documents by path.
//!
//! Every function checks the extension before touching the filesystem, so
//! a wrong path fails with [`DocError::UnsupportedExtension`] and never
//! creates or truncates a file.

use std::fs;
use std::path::Path;

use crate::document::Document;
use crate::error::{DocError, Result};
use crate::format::Format;
use crate::value::Value;
use crate::{csv, json, xml};

/// Read a file, choosing the bridge from its extension.
///
/// CSV files yield a [`Value::List`] of documents.
pub fn read_file(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let text = read_text(path)?;
    format.parse(&text)
}

/// Write a value, choosing the bridge from the path's extension.
///
/// JSON is written indented; `root` only applies to XML.
pub fn write_file(path: impl AsRef<Path>, value: &Value, root: Option<&str>) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let text = format.render(value, root, false)?;
    write_text(path, &text)
}

/// Read a file as `format`. The extension must still name that format.
pub fn read_file_as(path: impl AsRef<Path>, format: Format) -> Result<Value> {
    let path = expect_format(path.as_ref(), format)?;
    format.parse(&read_text(path)?)
}

/// Render `value` as `format` and write it. The extension must still name
/// that format; `root` only applies to XML and `compact` only to JSON.
pub fn write_file_as(
    path: impl AsRef<Path>,
    format: Format,
    value: &Value,
    root: Option<&str>,
    compact: bool,
) -> Result<()> {
    let path = expect_format(path.as_ref(), format)?;
    write_text(path, &format.render(value, root, compact)?)
}

pub fn read_json_file(path: impl AsRef<Path>) -> Result<Value> {
    let path = expect_format(path.as_ref(), Format::Json)?;
    json::parse_json(&read_text(path)?)
}

pub fn read_xml_file(path: impl AsRef<Path>) -> Result<Value> {
    let path = expect_format(path.as_ref(), Format::Xml)?;
    xml::parse_xml(&read_text(path)?)
}

pub fn read_csv_file(path: impl AsRef<Path>) -> Result<Vec<Document>> {
    let path = expect_format(path.as_ref(), Format::Csv)?;
    csv::parse_csv(&read_text(path)?)
}

pub fn write_json_file(path: impl AsRef<Path>, value: &Value) -> Result<()> {
    let path = expect_format(path.as_ref(), Format::Json)?;
    write_text(path, &json::to_json(value)?)
}

pub fn write_xml_file(path: impl AsRef<Path>, doc: &Document, root: Option<&str>) -> Result<()> {
    let path = expect_format(path.as_ref(), Format::Xml)?;
    write_text(path, &xml::to_xml(doc, root)?)
}

pub fn write_csv_file(path: impl AsRef<Path>, docs: &[Document]) -> Result<()> {
    let path = expect_format(path.as_ref(), Format::Csv)?;
    write_text(path, &csv::to_csv(docs)?)
}

fn expect_format(path: &Path, expected: Format) -> Result<&Path> {
    let matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(expected.extension()));
    if matches {
        Ok(path)
    } else {
        Err(DocError::UnsupportedExtension {
            path: path.display().to_string(),
            expected: format!(".{}", expected.extension()),
        })
    }
}

fn read_text(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read file");
    Ok(text)
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "wrote file");
    Ok(())
}
