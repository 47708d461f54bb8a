//! DuckDB-based query engine over JSON tables
//!
//! A registered table becomes a native DuckDB table whose column types follow
//! the inferred row type. Rows are loaded through DuckDB's JSON reader and
//! query results come back through its JSON writer.

use crate::convert::{cell_to_json, Cell, Row};
use crate::error::{Error, Result, ResultExt};
use crate::schema::{RecordType, SqlType, TypeKind};
use crate::source::Source;
use crate::table::JsonTable;
use crate::types::{JsonObject, JsonValue};
use duckdb::Connection;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// SQL query engine backed by an in-memory DuckDB database
pub struct QueryEngine {
    conn: Connection,
    /// Names of the registered tables, in registration order
    tables: Vec<String>,
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("tables", &self.tables)
            .finish_non_exhaustive()
    }
}

impl QueryEngine {
    /// Create an engine with an empty in-memory database
    pub fn new() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::database(format!("Failed to create DuckDB connection: {e}")))?;
        Ok(Self {
            conn,
            tables: Vec::new(),
        })
    }

    /// Register a table under its configured name. Returns the number of
    /// rows loaded.
    pub fn register<S: Source>(&mut self, table: &JsonTable<S>) -> Result<usize> {
        self.register_as(table.name(), table)
    }

    /// Register a table under `name`, replacing any table of that name.
    ///
    /// The table is scanned once; its rows are copied into DuckDB.
    pub fn register_as<S: Source>(&mut self, name: &str, table: &JsonTable<S>) -> Result<usize> {
        let row_type = table.row_type()?;
        let rows = table.rows()?;

        let create_sql = format!(
            "CREATE OR REPLACE TABLE {} ({});",
            quote_ident(name),
            column_definitions(&row_type)
        );
        self.execute(&create_sql)?;

        if !rows.is_empty() {
            self.load_rows(name, &rows, &row_type)?;
        }

        if !self.tables.iter().any(|t| t.eq_ignore_ascii_case(name)) {
            self.tables.push(name.to_string());
        }

        tracing::debug!(table = name, rows = rows.len(), "Registered table");
        Ok(rows.len())
    }

    /// Names of the registered tables
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Run a query and return its result rows as JSON objects
    pub fn query(&self, sql: &str) -> Result<Vec<JsonValue>> {
        let sql = sql.trim().trim_end_matches(';');
        tracing::debug!("Executing query: {}", sql);

        let temp = TempPath::new("json");
        let copy_sql = format!(
            "COPY ({sql}) TO {} (FORMAT JSON, ARRAY true);",
            quote_literal(&temp.to_str()?)
        );
        self.conn
            .execute_batch(&copy_sql)
            .map_err(|e| Error::database(format!("Query failed: {e}")))?;

        let content = std::fs::read_to_string(&temp.0)
            .map_err(|e| Error::database(format!("Failed to read query result: {e}")))?;
        if content.trim().is_empty() {
            return Ok(vec![]);
        }
        serde_json::from_str(&content)
            .map_err(|e| Error::database(format!("Failed to parse query result: {e}")))
    }

    /// Run statements that return no rows
    pub fn execute(&self, sql: &str) -> Result<()> {
        tracing::debug!("Executing statement: {}", sql);
        self.conn
            .execute_batch(sql)
            .map_err(|e| Error::database(format!("Statement failed: {e}")))
    }

    /// Number of rows in a registered table
    pub fn row_count(&self, name: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", quote_ident(name)), [], |row| {
                row.get(0)
            })
            .map_err(|e| Error::database(format!("Failed to count rows of '{name}': {e}")))?;
        usize::try_from(count).map_err(|_| Error::database("Negative row count"))
    }

    /// Load rows by writing them as JSON Lines and reading them back with
    /// explicit column types
    fn load_rows(&self, name: &str, rows: &[Row], row_type: &RecordType) -> Result<()> {
        let temp = TempPath::new("jsonl");
        {
            let file = std::fs::File::create(&temp.0)
                .map_err(|e| Error::database(format!("Failed to create load file: {e}")))?;
            let mut writer = BufWriter::new(file);
            for row in rows {
                serde_json::to_writer(&mut writer, &loadable_row(row, row_type))
                    .context("Failed to write load file")?;
                writer.write_all(b"\n")?;
            }
            writer.flush().context("Failed to write load file")?;
        }

        let columns = row_type
            .iter()
            .map(|f| format!("{}: {}", quote_literal(&f.name), quote_literal(&duckdb_type(&f.ty))))
            .collect::<Vec<_>>()
            .join(", ");
        let insert_sql = format!(
            "INSERT INTO {} SELECT * FROM read_json({}, format = 'newline_delimited', columns = {{{columns}}});",
            quote_ident(name),
            quote_literal(&temp.to_str()?),
        );
        self.execute(&insert_sql)
    }
}

// ============================================================================
// Type Mapping
// ============================================================================

/// DuckDB column type of a row type column.
///
/// DuckDB has no empty STRUCT, so records without fields become a VARCHAR
/// column that only ever holds null.
pub fn duckdb_type(ty: &SqlType) -> String {
    match &ty.kind {
        TypeKind::Bool => "BOOLEAN".to_string(),
        TypeKind::Double => "DOUBLE".to_string(),
        TypeKind::String | TypeKind::Unknown => "VARCHAR".to_string(),
        TypeKind::Array { element } => format!("{}[]", duckdb_type(element)),
        TypeKind::Record { fields } if fields.is_empty() => "VARCHAR".to_string(),
        TypeKind::Record { fields } => {
            let members = fields
                .iter()
                .map(|f| format!("{} {}", quote_ident(&f.name), duckdb_type(&f.ty)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("STRUCT({members})")
        }
    }
}

fn column_definitions(row_type: &RecordType) -> String {
    row_type
        .iter()
        .map(|f| {
            let empty_record = f.ty.as_record().is_some_and(RecordType::is_empty);
            let not_null = if f.ty.nullable || empty_record { "" } else { " NOT NULL" };
            format!("{} {}{not_null}", quote_ident(&f.name), duckdb_type(&f.ty))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// JSON form of a row as loaded into DuckDB
fn loadable_row(row: &[Cell], row_type: &RecordType) -> JsonValue {
    JsonValue::Object(loadable_fields(row, row_type))
}

fn loadable_fields(cells: &[Cell], fields: &RecordType) -> JsonObject {
    fields
        .iter()
        .zip(cells)
        .map(|(field, cell)| (field.name.clone(), loadable_value(cell, &field.ty)))
        .collect()
}

fn loadable_value(cell: &Cell, ty: &SqlType) -> JsonValue {
    match (cell, &ty.kind) {
        (_, TypeKind::Record { fields }) if fields.is_empty() => JsonValue::Null,
        (Cell::Record(cells), TypeKind::Record { fields }) => {
            JsonValue::Object(loadable_fields(cells, fields))
        }
        (Cell::Array(items), TypeKind::Array { element }) => {
            JsonValue::Array(items.iter().map(|c| loadable_value(c, element)).collect())
        }
        _ => cell_to_json(cell, ty),
    }
}

// ============================================================================
// SQL Helpers
// ============================================================================

/// Quote an identifier for DuckDB
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal for DuckDB
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Scratch file in the temp directory, removed on drop
struct TempPath(PathBuf);

impl TempPath {
    fn new(extension: &str) -> Self {
        Self(std::env::temp_dir().join(format!("jsontab_{}.{extension}", uuid::Uuid::new_v4())))
    }

    fn to_str(&self) -> Result<String> {
        self.0
            .to_str()
            .map(str::to_string)
            .ok_or_else(|| Error::database("Invalid temp path"))
    }
}

impl Drop for TempPath {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;
    use serde_json::json;

    #[test]
    fn test_duckdb_type_mapping() {
        assert_eq!(duckdb_type(&SqlType::boolean()), "BOOLEAN");
        assert_eq!(duckdb_type(&SqlType::double()), "DOUBLE");
        assert_eq!(duckdb_type(&SqlType::string()), "VARCHAR");
        assert_eq!(
            duckdb_type(&SqlType::array(SqlType::array(SqlType::double()))),
            "DOUBLE[][]"
        );

        let record: RecordType = vec![
            Field::new("a", SqlType::double()),
            Field::new("b c", SqlType::array(SqlType::string())),
        ]
        .into();
        assert_eq!(
            duckdb_type(&SqlType::record(record)),
            "STRUCT(\"a\" DOUBLE, \"b c\" VARCHAR[])"
        );
        assert_eq!(duckdb_type(&SqlType::record(RecordType::new())), "VARCHAR");
    }

    #[test]
    fn test_column_definitions() {
        let row_type: RecordType = vec![
            Field::new("_ROW_UUID", SqlType::string().not_null()),
            Field::new("x", SqlType::boolean()),
        ]
        .into();
        assert_eq!(
            column_definitions(&row_type),
            "\"_ROW_UUID\" VARCHAR NOT NULL, \"x\" BOOLEAN"
        );
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(quote_literal("it's"), "'it''s'");
    }

    #[test]
    fn test_loadable_row_nulls_empty_records() {
        let row_type: RecordType = vec![
            Field::new("e", SqlType::record(RecordType::new()).with_nullable(true)),
            Field::new("l", SqlType::array(SqlType::double())),
        ]
        .into();
        let row = vec![Cell::Record(vec![]), Cell::Array(vec![Cell::Double(1.0)])];

        assert_eq!(loadable_row(&row, &row_type), json!({"e": null, "l": [1.0]}));
    }

    #[test]
    fn test_query_literal() {
        let engine = QueryEngine::new().unwrap();
        let rows = engine.query("SELECT 1 AS one, 'x' AS s;").unwrap();
        assert_eq!(rows, vec![json!({"one": 1, "s": "x"})]);
    }
}
