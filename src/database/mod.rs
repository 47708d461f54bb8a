//! SQL queries over JSON tables via DuckDB
//!
//! [`QueryEngine`] registers [`JsonTable`](crate::table::JsonTable)s as typed
//! DuckDB tables (under `DATA` unless configured otherwise) and runs SQL
//! against them. Identifiers are matched case-insensitively.

mod engine;

pub use engine::{duckdb_type, quote_ident, QueryEngine};
