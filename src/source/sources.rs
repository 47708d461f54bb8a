//! Source implementations

use super::types::{RecordIter, Source};
use crate::config::SourceConfig;
use crate::decode::{DecoderConfig, DecoderFormat, JsonDecoder, JsonlDecoder, RecordDecoder};
use crate::error::{Error, Result};
use crate::types::{json_kind, JsonValue};
use once_cell::sync::OnceCell;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Number of lines read from a streaming reader when no limit is given
pub const DEFAULT_STREAM_LIMIT: usize = 100;

// ============================================================================
// Inline Source
// ============================================================================

/// Documents held in memory
#[derive(Debug, Clone, Default)]
pub struct InlineSource {
    records: Vec<JsonValue>,
}

impl InlineSource {
    pub fn new(records: Vec<JsonValue>) -> Self {
        Self { records }
    }

    /// Parse a JSON document; an array yields one record per element
    pub fn from_json_str(json: &str) -> Result<Self> {
        JsonDecoder::new().decode(json).map(Self::new)
    }

    pub fn records(&self) -> &[JsonValue] {
        &self.records
    }
}

impl From<Vec<JsonValue>> for InlineSource {
    fn from(records: Vec<JsonValue>) -> Self {
        Self::new(records)
    }
}

impl Source for InlineSource {
    fn fetch(&self) -> Result<RecordIter<'_>> {
        Ok(Box::new(self.records.iter().cloned().map(Ok)))
    }
}

// ============================================================================
// Cached Source
// ============================================================================

/// Reads the wrapped source on first fetch and replays it afterwards.
///
/// A failed first read is not cached; the next fetch tries again.
#[derive(Debug)]
pub struct CachedSource<S> {
    inner: S,
    records: OnceCell<Vec<JsonValue>>,
}

impl<S: Source> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            records: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.records.get().is_some()
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Source> Source for CachedSource<S> {
    fn fetch(&self) -> Result<RecordIter<'_>> {
        let records = self.records.get_or_try_init(|| {
            let records = self.inner.fetch()?.collect::<Result<Vec<_>>>()?;
            tracing::debug!(records = records.len(), "Cached source documents");
            Ok::<_, Error>(records)
        })?;
        Ok(Box::new(records.iter().cloned().map(Ok)))
    }
}

// ============================================================================
// File Source
// ============================================================================

/// A JSON or JSON Lines file, re-read on every fetch
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    decoder: DecoderConfig,
    limit: Option<usize>,
}

impl FileSource {
    /// Create a file source, guessing the format from the extension
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::from_config(&SourceConfig::new(path))
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            path: config.path.clone(),
            decoder: DecoderConfig {
                format: config.resolved_format(),
                record_path: config.record_path.clone(),
            },
            limit: config.limit,
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: DecoderFormat) -> Self {
        self.decoder.format = format;
        self
    }

    #[must_use]
    pub fn with_record_path(mut self, path: impl Into<String>) -> Self {
        self.decoder = self.decoder.with_record_path(path);
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> DecoderFormat {
        self.decoder.format
    }

    fn read_error(&self, e: &std::io::Error) -> Error {
        Error::fetch(format!("Failed to read '{}': {e}", self.path.display()))
    }
}

impl Source for FileSource {
    fn fetch(&self) -> Result<RecordIter<'_>> {
        tracing::debug!(
            path = %self.path.display(),
            format = ?self.decoder.format,
            "Reading documents"
        );
        let limit = self.limit.unwrap_or(usize::MAX);

        match self.decoder.format {
            DecoderFormat::Json => {
                let body = fs::read_to_string(&self.path).map_err(|e| self.read_error(&e))?;
                let decoder = self.decoder.build();
                let records = match self.decoder.record_path {
                    Some(_) => decoder.decode(&body)?,
                    None => array_records(decoder.decode_raw(&body)?)?,
                };
                Ok(Box::new(records.into_iter().take(limit).map(Ok)))
            }
            DecoderFormat::Jsonl => {
                if self.decoder.record_path.is_some() {
                    tracing::warn!(path = %self.path.display(), "Record path ignored for JSON Lines");
                }
                let file = File::open(&self.path).map_err(|e| self.read_error(&e))?;
                let records = JsonlDecoder::new().read(BufReader::new(file));
                Ok(Box::new(records.take(limit)))
            }
        }
    }
}

// ============================================================================
// Reader Source
// ============================================================================

/// A one-shot reader, such as standard input.
///
/// The reader is consumed by the first fetch; later fetches fail. Wrap it
/// with [`Source::cached`] before building a table from it.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: Mutex<Option<R>>,
    streaming: bool,
    limit: Option<usize>,
}

impl<R: Read + Send> ReaderSource<R> {
    /// Read a single JSON document
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(Some(reader)),
            streaming: false,
            limit: None,
        }
    }

    /// Read JSON Lines, by default only the first [`DEFAULT_STREAM_LIMIT`]
    /// lines. Blank lines count toward the limit.
    pub fn streaming(reader: R) -> Self {
        Self {
            streaming: true,
            ..Self::new(reader)
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    fn take_reader(&self) -> Result<R> {
        self.reader
            .lock()
            .map_err(|_| Error::fetch("Reader source lock poisoned"))?
            .take()
            .ok_or_else(|| Error::fetch("Reader source has already been consumed"))
    }
}

impl ReaderSource<std::io::Stdin> {
    /// Documents from standard input
    pub fn stdin(streaming: bool) -> Self {
        if streaming {
            Self::streaming(std::io::stdin())
        } else {
            Self::new(std::io::stdin())
        }
    }
}

impl<R: Read + Send> Source for ReaderSource<R> {
    fn fetch(&self) -> Result<RecordIter<'_>> {
        let mut reader = self.take_reader()?;

        if self.streaming {
            let limit = self.limit.unwrap_or(DEFAULT_STREAM_LIMIT);
            tracing::debug!(limit, "Streaming documents from reader");
            let records = JsonlDecoder::new()
                .read(BufReader::new(reader))
                .take_lines(limit);
            return Ok(Box::new(records));
        }

        let mut body = String::new();
        reader
            .read_to_string(&mut body)
            .map_err(|e| Error::fetch(format!("Failed to read input: {e}")))?;
        let records = array_records(JsonDecoder::new().decode_raw(&body)?)?;
        let limit = self.limit.unwrap_or(usize::MAX);
        Ok(Box::new(records.into_iter().take(limit).map(Ok)))
    }
}

/// Rows of a whole JSON document, which must be an array
fn array_records(document: JsonValue) -> Result<Vec<JsonValue>> {
    match document {
        JsonValue::Array(records) => Ok(records),
        other => Err(Error::decode(format!(
            "JSON document should be an array, got {}",
            json_kind(&other)
        ))),
    }
}
