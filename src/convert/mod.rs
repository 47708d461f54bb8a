//! Value coercion module
//!
//! Turns JSON documents into rows shaped by a finalized row type.
//!
//! # Overview
//!
//! - **Strict** coercion fails on the first value that does not fit its column
//! - **Lenient** coercion substitutes null and keeps going (used for scans)
//!
//! Coerced rows can be rendered back to JSON objects with [`row_to_json`].

mod coercer;
mod types;

pub use coercer::{cell_to_json, row_to_json, Coercer};
pub use types::{Cell, CoercionMode, Row};
