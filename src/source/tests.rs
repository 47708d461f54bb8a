//! Tests for document sources

use super::*;
use crate::config::SourceConfig;
use crate::decode::DecoderFormat;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde_json::json;
use std::fs;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

fn collect(source: &dyn Source) -> Result<Vec<JsonValue>> {
    source.fetch()?.collect()
}

/// Counts fetches and fails the first `failures` of them
struct CountingSource {
    fetches: AtomicUsize,
    failures: usize,
}

impl CountingSource {
    fn new(failures: usize) -> Self {
        Self {
            fetches: AtomicUsize::new(0),
            failures,
        }
    }
}

impl Source for CountingSource {
    fn fetch(&self) -> Result<RecordIter<'_>> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            return Err(Error::fetch("temporarily unavailable"));
        }
        Ok(Box::new(vec![Ok(json!({"n": n}))].into_iter()))
    }
}

// ============================================================================
// Inline Source Tests
// ============================================================================

#[test]
fn test_inline_source_is_repeatable() {
    let source = InlineSource::new(vec![json!({"a": 1}), json!("x")]);

    assert_eq!(collect(&source).unwrap(), vec![json!({"a": 1}), json!("x")]);
    assert_eq!(collect(&source).unwrap().len(), 2);
}

#[test]
fn test_inline_source_from_json_str() {
    let source = InlineSource::from_json_str(r#"[{"a": 1}, {"a": 2}]"#).unwrap();
    assert_eq!(source.records().len(), 2);

    let source = InlineSource::from_json_str(r#"{"a": 1}"#).unwrap();
    assert_eq!(source.records(), &[json!({"a": 1})]);
}

// ============================================================================
// Cached Source Tests
// ============================================================================

#[test]
fn test_cached_source_fetches_once() {
    let source = CountingSource::new(0).cached();
    assert!(!source.is_loaded());

    let first = collect(&source).unwrap();
    let second = collect(&source).unwrap();

    assert_eq!(first, second);
    assert!(source.is_loaded());
    assert_eq!(source.into_inner().fetches.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cached_source_retries_after_failure() {
    let source = CountingSource::new(1).cached();

    assert!(collect(&source).is_err());
    assert_eq!(collect(&source).unwrap(), vec![json!({"n": 1})]);
}

// ============================================================================
// File Source Tests
// ============================================================================

#[test]
fn test_file_source_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rows.json");
    fs::write(&path, r#"[{"a": 1}, {"a": 2}, {"a": 3}]"#).unwrap();

    let source = FileSource::new(&path);
    assert_eq!(source.format(), DecoderFormat::Json);
    assert_eq!(collect(&source).unwrap().len(), 3);

    let limited = FileSource::new(&path).with_limit(2);
    assert_eq!(collect(&limited).unwrap().len(), 2);
}

#[test]
fn test_file_source_record_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("response.json");
    fs::write(&path, r#"{"data": {"items": [{"id": "x"}]}, "total": 1}"#).unwrap();

    let source = FileSource::new(&path).with_record_path("$.data.items");
    assert_eq!(collect(&source).unwrap(), vec![json!({"id": "x"})]);
}

#[test]
fn test_file_source_jsonl_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rows.jsonl");
    fs::write(&path, "{\"a\": 1}\n\n{\"a\": 2}\n{\"a\": 3}\n").unwrap();

    let source = FileSource::from_config(&SourceConfig::new(&path).with_limit(2));

    assert_eq!(source.format(), DecoderFormat::Jsonl);
    assert_eq!(
        collect(&source).unwrap(),
        vec![json!({"a": 1}), json!({"a": 2})]
    );
}

#[test]
fn test_file_source_explicit_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rows.txt");
    fs::write(&path, "1\n2\n").unwrap();

    let source = FileSource::new(&path).with_format(DecoderFormat::Jsonl);
    assert_eq!(collect(&source).unwrap(), vec![json!(1), json!(2)]);
}

#[test]
fn test_file_source_rejects_non_array_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("single.json");
    fs::write(&path, r#"{"a": 1}"#).unwrap();

    let err = collect(&FileSource::new(&path)).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("should be an array, got object"));

    let extracted = FileSource::new(&path).with_record_path("$");
    assert_eq!(collect(&extracted).unwrap(), vec![json!({"a": 1})]);
}

#[test]
fn test_file_source_missing_file() {
    let source = FileSource::new("/definitely/not/here.json");
    let err = collect(&source).unwrap_err();

    assert!(matches!(err, Error::Source { .. }));
    assert!(err.to_string().contains("here.json"));
}

// ============================================================================
// Reader Source Tests
// ============================================================================

#[test]
fn test_reader_source_document() {
    let source = ReaderSource::new(Cursor::new(r#"[1, {"a": true}]"#));
    assert!(!source.is_streaming());
    assert_eq!(collect(&source).unwrap(), vec![json!(1), json!({"a": true})]);
}

#[test]
fn test_reader_source_is_one_shot() {
    let source = ReaderSource::new(Cursor::new("[1]"));

    collect(&source).unwrap();
    let err = collect(&source).unwrap_err();
    assert!(matches!(err, Error::Source { .. }));
}

#[test]
fn test_reader_source_cached_is_repeatable() {
    let source = ReaderSource::new(Cursor::new("[1, 2]")).cached();

    assert_eq!(collect(&source).unwrap().len(), 2);
    assert_eq!(collect(&source).unwrap().len(), 2);
}

#[test]
fn test_reader_source_streaming_default_limit() {
    let body: String = (0..150).map(|i| format!("{{\"i\": {i}}}\n")).collect();
    let source = ReaderSource::streaming(Cursor::new(body));

    let records = collect(&source).unwrap();
    assert_eq!(records.len(), DEFAULT_STREAM_LIMIT);
    assert_eq!(records[99], json!({"i": 99}));
}

#[test]
fn test_reader_source_streaming_with_limit() {
    let source = ReaderSource::streaming(Cursor::new("1\n2\n3\n")).with_limit(2);
    assert_eq!(collect(&source).unwrap(), vec![json!(1), json!(2)]);
}

#[test]
fn test_reader_source_streaming_limit_counts_lines() {
    let source = ReaderSource::streaming(Cursor::new("1\n\n2\n3\n")).with_limit(3);
    assert_eq!(collect(&source).unwrap(), vec![json!(1), json!(2)]);
}

#[test]
fn test_reader_source_rejects_non_array_document() {
    let source = ReaderSource::new(Cursor::new(r#""hello""#));
    let err = collect(&source).unwrap_err();
    assert!(err.to_string().contains("should be an array, got string"));
}

#[test]
fn test_reader_source_invalid_document() {
    let source = ReaderSource::new(Cursor::new("{oops"));
    let err = collect(&source).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_boxed_sources() {
    let sources: Vec<Box<dyn Source>> = vec![
        Box::new(InlineSource::new(vec![json!(1)])),
        Box::new(ReaderSource::new(Cursor::new("[2]")).cached()),
    ];

    for source in &sources {
        assert_eq!(collect(source).unwrap().len(), 1);
    }
}
