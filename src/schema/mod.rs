//! Schema inference module
//!
//! Deduces a single relational row type from a sample of heterogeneous JSON
//! documents.
//!
//! # Overview
//!
//! - **Type Deduction**: one JSON value → one [`SqlType`]
//! - **Type Merging**: unify the types observed for the same column across rows
//! - **Row Types**: fold a whole sample into one [`RecordType`], with synthetic
//!   identifier and marker columns
//! - **Null Resolution**: replace columns only ever seen as `null` with a
//!   concrete fallback type

mod deduce;
mod inference;
mod merge;
mod resolve;
mod types;

pub use deduce::{deduce_record, deduce_type};
pub use inference::{infer_row_type, row_type, wrap_value, RowTypeInferrer, DEFAULT_SAMPLE_SIZE};
pub use merge::{merge_records, merge_types};
pub use resolve::resolve_unknown;
pub use types::{
    AtomicType, Field, RecordType, SqlType, TypeKind, EMPTY_ROW_FIELD, EMPTY_TABLE_FIELD,
    ROW_ID_FIELD, VALUE_FIELD,
};
