//! Document decoder module
//!
//! Supports: JSON, JSONL
//!
//! A JSON document yields its top-level array elements as records, or the
//! elements found at a configured record path. JSON Lines yields one record
//! per non-blank line and can be read lazily from any buffered reader.

mod decoders;
mod types;

pub use decoders::{JsonDecoder, JsonlDecoder, JsonlRecords};
pub use types::{DecoderConfig, DecoderFormat, RecordDecoder};
