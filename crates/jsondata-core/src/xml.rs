//! XML bridge — converts between document trees and XML text.
//!
//! The mapping is structural, with JSON object keys as element names:
//!
//! - **Elements**: each document key becomes a child element
//! - **Attributes**: keys starting with `@` become attributes of the
//!   enclosing element (`{"@id": 7}` → `id="7"`)
//! - **Text**: a `#text` key becomes the element's text content
//! - **Lists**: become repeated sibling elements sharing the key's name;
//!   on the way back, repeated siblings are collected into a list
//! - **Null**: a self-closing element `<k />`; the empty string is `<k></k>`
//!
//! XML has exactly one root element, so [`to_xml`] needs either a document
//! with a single top-level key or an explicit root name.
//!
//! Text read back from XML is typed by canonical form: `true`/`false` become
//! booleans, text that prints back identically as an integer or float becomes
//! a number, everything else stays a string.
//!
//! # Known lossy cases
//!
//! - a one-element list reads back as its element
//! - an empty list writes nothing, and an empty document reads back as null
//! - a string that looks like a canonical number reads back as a number

use indexmap::IndexMap;

use crate::document::Document;
use crate::error::{DocError, Result};
use crate::path::MAX_DEPTH;
use crate::value::{format_float, Value};

const ATTRIBUTE_PREFIX: char = '@';
const TEXT_KEY: &str = "#text";
const CDATA_KEY: &str = "#cdata-section";

// ============================================================================
// Writing
// ============================================================================

/// Serialize a document to indented XML.
///
/// With `root` set, the whole document is wrapped in an element of that name.
/// Without it, the document's single top-level key becomes the root element.
///
/// # Errors
///
/// - [`DocError::AmbiguousRoot`] when no root is given and the document does
///   not describe exactly one root element
/// - [`DocError::InvalidKey`] for keys that are not valid XML names
/// - [`DocError::InvalidValue`] for containers used as attribute values
///
/// ```
/// use jsondata_core::{xml::to_xml, ConflictPolicy, Document};
///
/// let doc = Document::from_keys_and_values(["a", "b"], [1, 2], false, ConflictPolicy::Reject).unwrap();
/// assert!(to_xml(&doc, None).is_err());
/// assert_eq!(to_xml(&doc, Some("root")).unwrap(), "<root>\n  <a>1</a>\n  <b>2</b>\n</root>\n");
/// ```
pub fn to_xml(doc: &Document, root: Option<&str>) -> Result<String> {
    let mut out = String::new();
    match root.map(str::trim).filter(|r| !r.is_empty()) {
        Some(name) => write_element(name, &Value::Document(doc.clone()), 0, &mut out)?,
        None => {
            let mut entries = doc.iter();
            let (name, value) = match (entries.next(), entries.next()) {
                (Some(single), None) => single,
                _ => return Err(DocError::AmbiguousRoot(doc.len())),
            };
            if let Value::List(items) = value {
                if items.len() != 1 {
                    return Err(DocError::AmbiguousRoot(items.len()));
                }
            }
            write_element(name, value, 0, &mut out)?;
        }
    }
    tracing::debug!(bytes = out.len(), "rendered XML");
    Ok(out)
}

/// Emit `value` as one (or, for lists, several) elements named `name`.
fn write_element(name: &str, value: &Value, depth: usize, out: &mut String) -> Result<()> {
    if depth >= MAX_DEPTH {
        return Err(DocError::DepthLimit(MAX_DEPTH));
    }
    validate_name(name)?;
    let indent = make_indent(depth);

    match value {
        Value::List(items) => {
            for item in items {
                if let Value::List(_) = item {
                    // A list inside a list has no sibling form of its own; it
                    // gets a wrapper element holding its items.
                    out.push_str(&format!("{indent}<{name}>\n"));
                    write_element(name, item, depth + 1, out)?;
                    out.push_str(&format!("{indent}</{name}>\n"));
                } else {
                    write_element(name, item, depth, out)?;
                }
            }
        }
        Value::Null => out.push_str(&format!("{indent}<{name} />\n")),
        Value::Document(doc) => write_document_element(name, doc, depth, out)?,
        scalar => {
            let text = scalar.scalar_text().unwrap_or_default();
            out.push_str(&format!("{indent}<{name}>{}</{name}>\n", escape_text(&text)));
        }
    }
    Ok(())
}

/// Emit a document as an element: `@` keys become attributes, `#text`
/// becomes text content, the rest become child elements.
fn write_document_element(name: &str, doc: &Document, depth: usize, out: &mut String) -> Result<()> {
    let indent = make_indent(depth);
    let mut attributes = String::new();
    let mut text: Option<String> = None;
    let mut children: Vec<(&str, &Value)> = Vec::new();

    for (key, value) in doc.iter() {
        if let Some(attr) = key.strip_prefix(ATTRIBUTE_PREFIX) {
            validate_name(attr)?;
            let attr_text = value.scalar_text().ok_or_else(|| {
                DocError::InvalidValue(format!(
                    "attribute {key:?} holds a {}, expected a scalar",
                    value.type_name()
                ))
            })?;
            attributes.push_str(&format!(" {attr}=\"{}\"", escape_attribute(&attr_text)));
        } else if key == TEXT_KEY || key == CDATA_KEY {
            let chunk = value.scalar_text().ok_or_else(|| {
                DocError::InvalidValue(format!(
                    "{key} holds a {}, expected a scalar",
                    value.type_name()
                ))
            })?;
            text.get_or_insert_with(String::new).push_str(&chunk);
        } else {
            children.push((key, value));
        }
    }

    match (text, children.is_empty()) {
        (None, true) => out.push_str(&format!("{indent}<{name}{attributes} />\n")),
        (Some(text), true) => out.push_str(&format!(
            "{indent}<{name}{attributes}>{}</{name}>\n",
            escape_text(&text)
        )),
        (text, false) => {
            out.push_str(&format!("{indent}<{name}{attributes}>\n"));
            if let Some(text) = text {
                out.push_str(&format!("{}{}\n", make_indent(depth + 1), escape_text(&text)));
            }
            for (key, value) in children {
                write_element(key, value, depth + 1, out)?;
            }
            out.push_str(&format!("{indent}</{name}>\n"));
        }
    }
    Ok(())
}

/// XML names: a letter or `_` first, then letters, digits, `-`, `_`, `.`, `:`.
fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'));
    if valid_start && valid_rest {
        Ok(())
    } else {
        Err(DocError::invalid_key(name, "not a valid XML element or attribute name"))
    }
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attribute(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            _ => out.push(ch),
        }
    }
    out
}

fn make_indent(depth: usize) -> String {
    "  ".repeat(depth)
}

// ============================================================================
// Reading
// ============================================================================

/// Parse XML text into a document holding the root element under its name.
///
/// The XML declaration, processing instructions, comments and DOCTYPE are
/// skipped.
///
/// # Errors
///
/// [`DocError::MalformedInput`] (with a line number) for anything that is not
/// well-formed, and [`DocError::DepthLimit`] for elements nested deeper than
/// [`MAX_DEPTH`].
pub fn parse_xml(text: &str) -> Result<Value> {
    let mut reader = XmlReader::new(text);
    reader.skip_misc()?;
    if !reader.starts_with("<") {
        return Err(reader.error("expected a root element"));
    }
    let (name, value) = reader.parse_element(1)?;
    reader.skip_misc()?;
    if !reader.at_end() {
        return Err(reader.error("content after the root element"));
    }
    let mut entries = IndexMap::with_capacity(1);
    entries.insert(name, value);
    Ok(Value::Document(Document::from_entries_map(entries)))
}

/// Byte-position cursor over the XML source.
struct XmlReader<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> XmlReader<'a> {
    fn new(src: &'a str) -> Self {
        // A leading byte-order mark is not part of the document.
        let src = src.strip_prefix('\u{feff}').unwrap_or(src);
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self, n: usize) {
        self.pos += n;
    }

    /// 1-based line of the current position, for error messages.
    fn line(&self) -> usize {
        self.src[..self.pos].matches('\n').count() + 1
    }

    fn error(&self, message: &str) -> DocError {
        DocError::malformed("XML", format!("line {}: {}", self.line(), message))
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn expect(&mut self, s: &str) -> Result<()> {
        if self.starts_with(s) {
            self.bump(s.len());
            Ok(())
        } else {
            Err(self.error(&format!("expected {s:?}")))
        }
    }

    /// Advance past the next occurrence of `end`, returning what came before.
    fn take_until(&mut self, end: &str, what: &str) -> Result<&'a str> {
        match self.rest().find(end) {
            Some(idx) => {
                let taken = &self.rest()[..idx];
                self.bump(idx + end.len());
                Ok(taken)
            }
            None => Err(self.error(&format!("unterminated {what}"))),
        }
    }

    /// Skip whitespace, comments, processing instructions and DOCTYPE.
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.skip_whitespace();
            if self.starts_with("<?") {
                self.take_until("?>", "processing instruction")?;
            } else if self.starts_with("<!--") {
                self.take_until("-->", "comment")?;
            } else if self.starts_with("<!DOCTYPE") {
                self.skip_doctype()?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_doctype(&mut self) -> Result<()> {
        let mut brackets = 0usize;
        for (i, ch) in self.rest().char_indices() {
            match ch {
                '[' => brackets += 1,
                ']' => brackets = brackets.saturating_sub(1),
                '>' if brackets == 0 => {
                    self.bump(i + 1);
                    return Ok(());
                }
                _ => {}
            }
        }
        Err(self.error("unterminated DOCTYPE"))
    }

    fn read_name(&mut self) -> Result<String> {
        let rest = self.rest();
        let end = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '/' | '>' | '=' | '<'))
            .unwrap_or(rest.len());
        if end == 0 {
            return Err(self.error("expected a name"));
        }
        self.bump(end);
        Ok(rest[..end].to_string())
    }

    /// Parse one element starting at `<`. Returns its name and mapped value.
    fn parse_element(&mut self, depth: usize) -> Result<(String, Value)> {
        if depth > MAX_DEPTH {
            return Err(DocError::DepthLimit(MAX_DEPTH));
        }
        self.expect("<")?;
        let name = self.read_name()?;
        let attributes = self.parse_attributes()?;

        if self.starts_with("/>") {
            self.bump(2);
            let value = if attributes.is_empty() {
                Value::Null
            } else {
                build_element_value(attributes, None, Vec::new())
            };
            return Ok((name, value));
        }
        self.expect(">")?;

        let mut text = String::new();
        let mut has_cdata = false;
        let mut children: Vec<(String, Value)> = Vec::new();
        loop {
            if self.at_end() {
                return Err(self.error(&format!("unclosed element <{name}>")));
            }
            if self.starts_with("</") {
                self.bump(2);
                let closing = self.read_name()?;
                if closing != name {
                    return Err(self.error(&format!(
                        "mismatched closing tag </{closing}> for <{name}>"
                    )));
                }
                self.skip_whitespace();
                self.expect(">")?;
                break;
            } else if self.starts_with("<!--") {
                self.take_until("-->", "comment")?;
            } else if self.starts_with("<![CDATA[") {
                self.bump("<![CDATA[".len());
                text.push_str(self.take_until("]]>", "CDATA section")?);
                has_cdata = true;
            } else if self.starts_with("<?") {
                self.take_until("?>", "processing instruction")?;
            } else if self.starts_with("<") {
                children.push(self.parse_element(depth + 1)?);
            } else {
                let rest = self.rest();
                let end = rest.find('<').unwrap_or(rest.len());
                let raw = &rest[..end];
                text.push_str(&self.decode_entities(raw)?);
                self.bump(end);
            }
        }

        let value = if attributes.is_empty() && children.is_empty() {
            if has_cdata {
                Value::String(text)
            } else {
                infer_scalar(text.trim())
            }
        } else {
            let trimmed = text.trim();
            let text = (!trimmed.is_empty()).then(|| infer_scalar(trimmed));
            build_element_value(attributes, text, children)
        };
        Ok((name, value))
    }

    fn parse_attributes(&mut self) -> Result<Vec<(String, String)>> {
        let mut attributes: Vec<(String, String)> = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('/') | Some('>') => return Ok(attributes),
                None => return Err(self.error("unterminated start tag")),
                _ => {}
            }
            let name = self.read_name()?;
            self.skip_whitespace();
            self.expect("=")?;
            self.skip_whitespace();
            let quote = match self.peek() {
                Some(q @ ('"' | '\'')) => q,
                _ => return Err(self.error(&format!("attribute {name:?} value must be quoted"))),
            };
            self.bump(1);
            let raw = self.take_until(&quote.to_string(), "attribute value")?;
            let value = self.decode_entities(raw)?;
            if attributes.iter().any(|(n, _)| *n == name) {
                return Err(self.error(&format!("duplicate attribute {name:?}")));
            }
            attributes.push((name, value));
        }
    }

    /// Decode predefined (`&lt;` …) and numeric (`&#10;`, `&#x41;`) entities.
    fn decode_entities(&self, raw: &str) -> Result<String> {
        if !raw.contains('&') {
            return Ok(raw.to_string());
        }
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(amp) = rest.find('&') {
            out.push_str(&rest[..amp]);
            let after = &rest[amp + 1..];
            let Some(semi) = after.find(';') else {
                return Err(self.error("unterminated entity reference"));
            };
            let entity = &after[..semi];
            let decoded = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => {
                    let code = if let Some(hex) = entity.strip_prefix("#x") {
                        u32::from_str_radix(hex, 16).ok()
                    } else if let Some(dec) = entity.strip_prefix('#') {
                        dec.parse::<u32>().ok()
                    } else {
                        None
                    };
                    code.and_then(char::from_u32)
                }
            };
            match decoded {
                Some(ch) => out.push(ch),
                None => return Err(self.error(&format!("unknown entity &{entity};"))),
            }
            rest = &after[semi + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// Build the document for an element with attributes and/or children.
///
/// Order: attributes, then `#text`, then children. Repeated child names are
/// gathered into a list at the position of their first occurrence.
fn build_element_value(
    attributes: Vec<(String, String)>,
    text: Option<Value>,
    children: Vec<(String, Value)>,
) -> Value {
    let mut entries: IndexMap<String, Value> = IndexMap::new();
    for (name, raw) in attributes {
        entries.insert(format!("{ATTRIBUTE_PREFIX}{name}"), infer_scalar(&raw));
    }
    if let Some(text) = text {
        entries.insert(TEXT_KEY.to_string(), text);
    }

    let mut groups: IndexMap<String, Vec<Value>> = IndexMap::new();
    for (name, value) in children {
        groups.entry(name).or_default().push(value);
    }
    for (name, mut values) in groups {
        let value = if values.len() == 1 {
            values.remove(0)
        } else {
            Value::List(values)
        };
        entries.insert(name, value);
    }
    Value::Document(Document::from_entries_map(entries))
}

/// Type XML text by canonical form; anything ambiguous stays a string.
fn infer_scalar(text: &str) -> Value {
    match text {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(i) = text.parse::<i64>() {
        if i.to_string() == text {
            return Value::Integer(i);
        }
    }
    if let Ok(f) = text.parse::<f64>() {
        if f.is_finite() && format_float(f) == text {
            return Value::Float(f);
        }
    }
    Value::String(text.to_string())
}
