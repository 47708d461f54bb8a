//! Decoder types and traits

use super::decoders::{JsonDecoder, JsonlDecoder};
use crate::error::Result;
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};

/// Format of a document file or stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoderFormat {
    /// A single JSON document (default)
    #[default]
    Json,
    /// JSON Lines, one document per line
    #[serde(alias = "ndjson")]
    Jsonl,
}

/// Configuration for decoding documents
#[derive(Debug, Clone, Default)]
pub struct DecoderConfig {
    pub format: DecoderFormat,
    /// Path to the records inside a JSON document
    pub record_path: Option<String>,
}

impl DecoderConfig {
    pub fn json() -> Self {
        Self::default()
    }

    pub fn json_with_path(path: impl Into<String>) -> Self {
        Self {
            format: DecoderFormat::Json,
            record_path: Some(path.into()),
        }
    }

    pub fn jsonl() -> Self {
        Self {
            format: DecoderFormat::Jsonl,
            record_path: None,
        }
    }

    #[must_use]
    pub fn with_record_path(mut self, path: impl Into<String>) -> Self {
        self.record_path = Some(path.into());
        self
    }

    /// Build the decoder described by this config.
    ///
    /// The record path only applies to JSON documents.
    pub fn build(&self) -> Box<dyn RecordDecoder> {
        match (self.format, &self.record_path) {
            (DecoderFormat::Json, Some(path)) => Box::new(JsonDecoder::with_path(path.clone())),
            (DecoderFormat::Json, None) => Box::new(JsonDecoder::new()),
            (DecoderFormat::Jsonl, _) => Box::new(JsonlDecoder::new()),
        }
    }
}

/// Trait for decoding a document body into records
pub trait RecordDecoder: Send + Sync {
    /// Decode the body into a list of records
    fn decode(&self, body: &str) -> Result<Vec<JsonValue>>;

    /// Decode the body into a single JSON value
    fn decode_raw(&self, body: &str) -> Result<JsonValue>;
}
