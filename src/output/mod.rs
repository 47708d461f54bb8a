//! Output module
//!
//! Hands coerced rows to columnar consumers as Arrow RecordBatches.

mod schema;

pub use schema::{
    record_batch_to_json, rows_to_record_batch, to_arrow_field, to_arrow_schema, to_arrow_type,
};
