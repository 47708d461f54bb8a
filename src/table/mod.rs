//! JSON tables
//!
//! A [`JsonTable`] ties a [`Source`](crate::source::Source) to a memoized row
//! type and turns its documents into rows a query engine can consume.

mod json_table;
mod types;

pub use json_table::JsonTable;
pub use types::RowIter;
