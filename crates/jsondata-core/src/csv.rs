//! CSV bridge — flat records to and from documents.
//!
//! The first record is the header row and supplies the keys; every later
//! record becomes one flat document built with nesting off and the `Reject`
//! policy, so a dotted header such as `a.b` stays a literal key. Every field
//! is read as a string.
//!
//! Quoting follows RFC 4180: fields may be wrapped in `"`, and a doubled `""`
//! inside a quoted field is a literal quote. Records end at `\n` or `\r\n`,
//! blank lines are skipped, and whitespace around unquoted fields is trimmed.

use crate::document::Document;
use crate::error::{DocError, Result};
use crate::policy::ConflictPolicy;
use crate::value::Value;

const DELIMITER: char = ',';

/// Parse CSV text into one document per data row.
///
/// # Errors
///
/// - [`DocError::MalformedInput`] for broken quoting (with a line number)
/// - [`DocError::ArityMismatch`] for rows whose field count differs from
///   the header's
/// - [`DocError::DuplicateKey`] / [`DocError::InvalidKey`] for repeated or
///   empty header names
///
/// ```
/// use jsondata_core::{csv::parse_csv, Value};
///
/// let docs = parse_csv("id,name\n1,john\n2,jane").unwrap();
/// assert_eq!(docs.len(), 2);
/// assert_eq!(docs[0].get("name"), Some(&Value::from("john")));
/// ```
pub fn parse_csv(text: &str) -> Result<Vec<Document>> {
    let mut records = parse_records(text)?.into_iter();
    let Some(headers) = records.next() else {
        return Ok(Vec::new());
    };

    let docs = records
        .map(|row| {
            Document::from_keys_and_values(
                headers.iter().cloned(),
                row.into_iter().map(Value::String),
                false,
                ConflictPolicy::Reject,
            )
        })
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(columns = headers.len(), rows = docs.len(), "parsed CSV");
    Ok(docs)
}

/// Render documents as CSV text, header first, rows separated by `\n`.
///
/// Every document must have exactly the same keys in the same order.
/// Null renders as an empty field; nested documents and lists render as
/// compact JSON.
///
/// # Errors
///
/// [`DocError::SchemaMismatch`] naming the first document whose keys differ.
pub fn to_csv(docs: &[Document]) -> Result<String> {
    let Some(first) = docs.first() else {
        return Ok(String::new());
    };
    let headers: Vec<&str> = first.keys().collect();

    let mut lines = Vec::with_capacity(docs.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| escape_field(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    for (index, doc) in docs.iter().enumerate() {
        if !doc.keys().eq(headers.iter().copied()) {
            return Err(DocError::SchemaMismatch {
                index,
                expected: headers.iter().map(|h| h.to_string()).collect(),
                found: doc.keys().map(str::to_string).collect(),
            });
        }
        let row = doc
            .values()
            .map(|v| escape_field(&field_text(v)))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(row);
    }
    Ok(lines.join("\n"))
}

fn field_text(value: &Value) -> String {
    match value.scalar_text() {
        Some(text) => text,
        None => value.to_string(),
    }
}

/// Quote a field when it would otherwise be read back differently.
fn escape_field(s: &str) -> String {
    let needs_quotes = s.contains(DELIMITER)
        || s.contains('"')
        || s.contains('\n')
        || s.contains('\r')
        || s != s.trim();
    if needs_quotes {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[derive(Clone, Copy, PartialEq)]
enum FieldState {
    /// Inside an unquoted field (or before any content).
    Unquoted,
    /// Inside a quoted field.
    Quoted,
    /// After the closing quote, only whitespace may precede the delimiter.
    AfterQuote,
}

/// Split CSV text into records of fields, skipping blank lines.
fn parse_records(text: &str) -> Result<Vec<Vec<String>>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = FieldState::Unquoted;
    let mut quoted = false;
    let mut line = 1usize;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            FieldState::Quoted => match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => state = FieldState::AfterQuote,
                '\n' => {
                    line += 1;
                    field.push(ch);
                }
                _ => field.push(ch),
            },
            FieldState::Unquoted | FieldState::AfterQuote => match ch {
                DELIMITER => {
                    record.push(finish_field(&mut field, quoted));
                    quoted = false;
                    state = FieldState::Unquoted;
                }
                '\r' | '\n' => {
                    if ch == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    record.push(finish_field(&mut field, quoted));
                    finish_record(&mut records, std::mem::take(&mut record), quoted);
                    quoted = false;
                    state = FieldState::Unquoted;
                    line += 1;
                }
                '"' if state == FieldState::Unquoted && field.trim().is_empty() => {
                    field.clear();
                    quoted = true;
                    state = FieldState::Quoted;
                }
                '"' => {
                    return Err(DocError::malformed(
                        "CSV",
                        format!("line {line}: unexpected quote inside an unquoted field"),
                    ))
                }
                c if state == FieldState::AfterQuote && !c.is_whitespace() => {
                    return Err(DocError::malformed(
                        "CSV",
                        format!("line {line}: unexpected {c:?} after a closing quote"),
                    ))
                }
                _ if state == FieldState::AfterQuote => {}
                c => field.push(c),
            },
        }
    }

    if state == FieldState::Quoted {
        return Err(DocError::malformed(
            "CSV",
            format!("line {line}: unterminated quoted field"),
        ));
    }
    if !field.is_empty() || !record.is_empty() || quoted {
        record.push(finish_field(&mut field, quoted));
        finish_record(&mut records, record, quoted);
    }
    Ok(records)
}

fn finish_field(field: &mut String, quoted: bool) -> String {
    let raw = std::mem::take(field);
    if quoted {
        raw
    } else {
        raw.trim().to_string()
    }
}

/// Keep a record unless it is a blank line (one empty, unquoted field).
fn finish_record(records: &mut Vec<Vec<String>>, record: Vec<String>, last_quoted: bool) {
    let blank = record.len() == 1 && record[0].is_empty() && !last_quoted;
    if !blank {
        records.push(record);
    }
}
