//! Query engine integration tests with an in-memory DuckDB

use jsontab::{Error, InlineSource, JsonTable, QueryEngine, TableConfig};
use serde_json::{json, Value};

fn table(documents: Vec<Value>) -> JsonTable<InlineSource> {
    JsonTable::new(InlineSource::new(documents), TableConfig::default())
}

fn people() -> JsonTable<InlineSource> {
    table(vec![
        json!({"name": "Alice", "age": 30, "tags": ["admin", "dev"], "address": {"city": "Oslo"}}),
        json!({"name": "Bob", "age": 25, "address": {"city": "Bergen", "zip": "5003"}}),
        json!({"name": "Carol", "age": null, "tags": []}),
        json!({"name": "Dan"}),
    ])
}

#[test]
fn test_register_and_count() {
    let mut engine = QueryEngine::new().unwrap();

    let loaded = engine.register(&people()).unwrap();

    assert_eq!(loaded, 4);
    assert_eq!(engine.tables(), &["DATA".to_string()]);
    assert_eq!(engine.row_count("DATA").unwrap(), 4);
}

#[test]
fn test_query_atomic_columns() {
    let mut engine = QueryEngine::new().unwrap();
    engine.register(&people()).unwrap();

    let rows = engine
        .query("SELECT name, age FROM data WHERE age IS NOT NULL ORDER BY age")
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "Bob");
    assert_eq!(rows[0]["age"].as_f64(), Some(25.0));
    assert_eq!(rows[1]["name"], "Alice");
}

#[test]
fn test_identifiers_are_case_insensitive() {
    let mut engine = QueryEngine::new().unwrap();
    engine.register(&people()).unwrap();

    let rows = engine
        .query("SELECT NAME FROM Data WHERE Name = 'Carol'")
        .unwrap();

    assert_eq!(rows.len(), 1);
}

#[test]
fn test_query_nested_columns() {
    let mut engine = QueryEngine::new().unwrap();
    engine.register(&people()).unwrap();

    let rows = engine
        .query("SELECT name, address.city AS city, len(tags) AS n FROM data ORDER BY name")
        .unwrap();

    assert_eq!(rows[0]["city"], "Oslo");
    assert_eq!(rows[0]["n"], 2);
    assert_eq!(rows[1]["city"], "Bergen");
    assert!(rows[2]["city"].is_null());
    assert_eq!(rows[2]["n"], 0);
    assert!(rows[3]["n"].is_null());
}

#[test]
fn test_row_ids_are_unique_and_present() {
    let mut engine = QueryEngine::new().unwrap();
    engine.register(&people()).unwrap();

    let rows = engine
        .query("SELECT COUNT(DISTINCT _ROW_UUID) AS ids, COUNT(*) AS total FROM data")
        .unwrap();

    assert_eq!(rows[0]["ids"], 4);
    assert_eq!(rows[0]["total"], 4);
}

#[test]
fn test_custom_table_name_and_replace() {
    let mut engine = QueryEngine::new().unwrap();
    let config = TableConfig::default().with_table_name("events");
    let events = JsonTable::new(InlineSource::new(vec![json!({"k": 1})]), config);

    engine.register(&events).unwrap();
    engine.register_as("EVENTS", &people()).unwrap();

    assert_eq!(engine.tables(), &["events".to_string()]);
    assert_eq!(engine.row_count("events").unwrap(), 4);
}

#[test]
fn test_empty_rows_and_empty_tables() {
    let mut engine = QueryEngine::new().unwrap();
    engine
        .register_as("sparse", &table(vec![json!({}), json!({"e": {}})]))
        .unwrap();
    engine.register_as("nothing", &table(vec![])).unwrap();

    let rows = engine
        .query("SELECT _EMPTY_ROW AS is_empty, e FROM sparse ORDER BY is_empty")
        .unwrap();
    assert_eq!(
        rows,
        vec![
            json!({"is_empty": false, "e": null}),
            json!({"is_empty": true, "e": null}),
        ]
    );

    assert_eq!(engine.row_count("nothing").unwrap(), 0);
    assert!(engine.query("SELECT * FROM nothing").unwrap().is_empty());
}

#[test]
fn test_scalar_documents() {
    let mut engine = QueryEngine::new().unwrap();
    engine
        .register(&table(vec![json!(1), json!(2.5), json!(null)]))
        .unwrap();

    let rows = engine.query("SELECT SUM(value) AS total FROM data").unwrap();
    assert_eq!(rows[0]["total"].as_f64(), Some(3.5));
}

#[test]
fn test_invalid_query() {
    let mut engine = QueryEngine::new().unwrap();
    engine.register(&people()).unwrap();

    let err = engine.query("SELECT nope FROM data").unwrap_err();
    assert!(matches!(err, Error::Database { .. }));
}

#[test]
fn test_register_propagates_inference_errors() {
    let mut engine = QueryEngine::new().unwrap();
    let conflicting = table(vec![json!({"a": true}), json!({"a": "x"})]);

    let err = engine.register(&conflicting).unwrap_err();
    assert!(matches!(err.root(), Error::TypeMismatch { .. }));
    assert!(engine.tables().is_empty());
}
