//! Decoder implementations

use super::types::RecordDecoder;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use std::io::BufRead;

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with optional record path extraction
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    record_path: Option<String>,
}

impl JsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder extracting records at `path`
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }

    /// Extract records from a parsed document.
    ///
    /// Without a record path, an array document yields its elements and any
    /// other document is a single record.
    pub fn extract_records(&self, value: JsonValue) -> Result<Vec<JsonValue>> {
        let Some(path) = &self.record_path else {
            return Ok(into_records(value));
        };

        // jsonpath-rust only for wildcards, it does not support negative indices
        if path.contains('*') && !path.contains("[-") {
            extract_with_jsonpath(&value, path)
        } else {
            Ok(extract_simple_path(&value, path)
                .cloned()
                .map(into_records)
                .unwrap_or_default())
        }
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<Vec<JsonValue>> {
        let value = self.decode_raw(body)?;
        self.extract_records(value)
    }

    fn decode_raw(&self, body: &str) -> Result<JsonValue> {
        serde_json::from_str(body).map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))
    }
}

fn into_records(value: JsonValue) -> Vec<JsonValue> {
    match value {
        JsonValue::Array(items) => items,
        other => vec![other],
    }
}

// ============================================================================
// JSONL Decoder
// ============================================================================

/// JSON Lines decoder (one document per line, blank lines skipped)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonlDecoder;

impl JsonlDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Lazily decode documents from a buffered reader
    pub fn read<R: BufRead>(self, reader: R) -> JsonlRecords<R> {
        JsonlRecords {
            lines: reader.lines(),
            line_num: 0,
            max_lines: None,
        }
    }
}

impl RecordDecoder for JsonlDecoder {
    fn decode(&self, body: &str) -> Result<Vec<JsonValue>> {
        body.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| parse_line(line, i + 1))
            .collect()
    }

    fn decode_raw(&self, body: &str) -> Result<JsonValue> {
        self.decode(body).map(JsonValue::Array)
    }
}

/// Iterator over the documents of a JSON Lines stream
#[derive(Debug)]
pub struct JsonlRecords<R> {
    lines: std::io::Lines<R>,
    line_num: usize,
    max_lines: Option<usize>,
}

impl<R> JsonlRecords<R> {
    /// Stop after `max_lines` raw lines, blank ones included
    #[must_use]
    pub fn take_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = Some(max_lines);
        self
    }
}

impl<R: BufRead> Iterator for JsonlRecords<R> {
    type Item = Result<JsonValue>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.max_lines.is_some_and(|max| self.line_num >= max) {
                return None;
            }
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_num += 1;
            if !line.trim().is_empty() {
                return Some(parse_line(&line, self.line_num));
            }
        }
    }
}

fn parse_line(line: &str, line_num: usize) -> Result<JsonValue> {
    serde_json::from_str(line.trim())
        .map_err(|e| Error::decode(format!("Failed to parse JSONL at line {line_num}: {e}")))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Follow a dot-notation path with optional array indexing
/// (`data.items`, `$.results[0]`, `pages[-1].rows`).
fn extract_simple_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.trim();
    if path == "$" {
        return Some(value);
    }
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        let Some((name, index)) = part.split_once('[') else {
            current = current.get(part)?;
            continue;
        };

        if !name.is_empty() {
            current = current.get(name)?;
        }

        let index = index.strip_suffix(']')?;
        if index == "*" {
            return Some(current);
        }
        let index: i64 = index.parse().ok()?;
        let items = current.as_array()?;
        let position = if index < 0 {
            items.len().checked_sub(usize::try_from(index.unsigned_abs()).ok()?)?
        } else {
            usize::try_from(index).ok()?
        };
        current = items.get(position)?;
    }

    Some(current)
}

/// Extract records using jsonpath-rust
fn extract_with_jsonpath(value: &JsonValue, path: &str) -> Result<Vec<JsonValue>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path).map_err(|e| Error::JsonPath {
        message: format!("Invalid JSONPath: {e}"),
    })?;

    match jp.find(value) {
        JsonValue::Array(items) => Ok(items),
        JsonValue::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}
