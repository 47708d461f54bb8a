// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]

//! # jsontab
//!
//! Exposes a stream of heterogeneous JSON documents as a single, statically
//! typed table that a SQL engine can scan.
//!
//! ## Features
//!
//! - **Schema Inference**: deduce one row type from a sample of documents
//! - **Type Unification**: merge diverging shapes into a common supertype
//! - **Null Resolution**: give all-null columns a concrete fallback type
//! - **Value Coercion**: shape every document into a row, strictly or leniently
//! - **Arrow Output**: build Arrow RecordBatches from coerced rows
//! - **SQL Queries**: register tables with an in-memory DuckDB engine
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jsontab::{InlineSource, JsonTable, QueryEngine, TableConfig};
//! use serde_json::json;
//!
//! let source = InlineSource::new(vec![
//!     json!({"name": "a", "score": 1}),
//!     json!({"name": "b", "tags": ["x"]}),
//! ]);
//! let table = JsonTable::new(source, TableConfig::default());
//!
//! println!("{}", table.describe()?);
//!
//! let mut engine = QueryEngine::new()?;
//! engine.register(&table)?;
//! let rows = engine.query("SELECT name, score FROM data ORDER BY name")?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌───────────────────────────────────────┐   ┌──────────────┐
//! │   Source   │   │                Schema                 │   │   Convert    │
//! ├────────────┤   ├───────────────────────────────────────┤   ├──────────────┤
//! │ Inline     │──▶│ deduce → merge (fold) → resolve nulls │──▶│ Strict       │
//! │ File       │   │        (first sample_size rows)       │   │ Lenient      │
//! │ Reader     │   └───────────────────────────────────────┘   └──────┬───────┘
//! │ Cached     │                                                      │
//! └────────────┘              JsonTable (memoized row type)           ▼
//!                                                      ┌──────────────┴───────┐
//!                                                      │ Arrow    │  DuckDB   │
//!                                                      └──────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Table configuration
pub mod config;

/// Schema inference from JSON data
pub mod schema;

/// Value coercion into rows
pub mod convert;

/// Document decoders (JSON, JSONL)
pub mod decode;

/// Document sources
pub mod source;

/// JSON tables with memoized row types
pub mod table;

/// Arrow output
pub mod output;

/// SQL queries via DuckDB
pub mod database;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{SourceConfig, TableConfig};
pub use convert::{Cell, CoercionMode, Coercer, Row};
pub use database::QueryEngine;
pub use schema::{AtomicType, Field, RecordType, RowTypeInferrer, SqlType, TypeKind};
pub use source::{CachedSource, FileSource, InlineSource, ReaderSource, Source};
pub use table::JsonTable;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
