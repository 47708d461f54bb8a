//! Configuration types for JSON tables
//!
//! A table definition can be written in YAML or JSON:
//!
//! ```yaml
//! table_name: events
//! sample_size: 100
//! null_fallback: double
//! source:
//!   path: data/events.json
//!   record_path: "$.items"
//! ```

use crate::convert::CoercionMode;
use crate::decode::DecoderFormat;
use crate::error::{Error, Result};
use crate::schema::{AtomicType, DEFAULT_SAMPLE_SIZE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default name a table is registered under in a query engine
pub const DEFAULT_TABLE_NAME: &str = "DATA";

// ============================================================================
// Table Config
// ============================================================================

/// Settings for inferring and scanning a JSON table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Name of the table in a query engine
    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// Number of leading documents used for row type inference
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Type of columns only ever observed as null
    #[serde(default)]
    pub null_fallback: AtomicType,

    /// Coercion mode used when scanning
    #[serde(default)]
    pub mode: CoercionMode,

    /// Where the documents come from, when defined in the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceConfig>,
}

fn default_table_name() -> String {
    DEFAULT_TABLE_NAME.to_string()
}

fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            table_name: default_table_name(),
            sample_size: default_sample_size(),
            null_fallback: AtomicType::default(),
            mode: CoercionMode::default(),
            source: None,
        }
    }
}

impl TableConfig {
    /// Parse and validate a YAML table definition
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse table YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON table definition
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Failed to parse table JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a table definition, picking the format from the file extension.
    ///
    /// `.json` files are read as JSON, anything else as YAML. A relative
    /// source path is resolved against the config file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read table config '{}': {e}",
                path.display()
            ))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let mut config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };

        if let (Some(source), Some(dir)) = (config.source.as_mut(), path.parent()) {
            if source.path.is_relative() {
                source.path = dir.join(&source.path);
            }
        }

        Ok(config)
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.table_name.trim().is_empty() {
            return Err(Error::config("Table name cannot be empty"));
        }
        if self.sample_size == 0 {
            return Err(Error::config("Sample size must be at least 1"));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = name.into();
        self
    }

    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    #[must_use]
    pub fn with_null_fallback(mut self, fallback: AtomicType) -> Self {
        self.null_fallback = fallback;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: CoercionMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: SourceConfig) -> Self {
        self.source = Some(source);
        self
    }
}

// ============================================================================
// Source Config
// ============================================================================

/// A file-backed document source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to the document file
    pub path: PathBuf,

    /// File format; guessed from the extension when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<DecoderFormat>,

    /// Path to the records inside a JSON document (e.g. `$.data.items`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_path: Option<String>,

    /// Maximum number of documents read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl SourceConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
            record_path: None,
            limit: None,
        }
    }

    /// Explicit format, or the one implied by the file extension
    pub fn resolved_format(&self) -> DecoderFormat {
        self.format.unwrap_or_else(|| {
            match self.path.extension().and_then(|ext| ext.to_str()) {
                Some(ext)
                    if ext.eq_ignore_ascii_case("jsonl") || ext.eq_ignore_ascii_case("ndjson") =>
                {
                    DecoderFormat::Jsonl
                }
                _ => DecoderFormat::Json,
            }
        })
    }

    #[must_use]
    pub fn with_format(mut self, format: DecoderFormat) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn with_record_path(mut self, path: impl Into<String>) -> Self {
        self.record_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
