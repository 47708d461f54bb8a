//! Integration tests
//!
//! Tests the full end-to-end flow: documents on disk → table → rows → Arrow

use jsontab::convert::{row_to_json, Cell};
use jsontab::output::{record_batch_to_json, rows_to_record_batch, to_arrow_schema};
use jsontab::schema::{SqlType, EMPTY_TABLE_FIELD, ROW_ID_FIELD, VALUE_FIELD};
use jsontab::{
    AtomicType, CoercionMode, Error, FileSource, InlineSource, JsonTable, ReaderSource, Source,
    SourceConfig, TableConfig,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::io::Cursor;

// ============================================================================
// File Table Tests
// ============================================================================

#[test]
fn test_json_file_table_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orders.json");
    fs::write(
        &path,
        r#"{
            "object": "list",
            "data": [
                {"id": "o1", "amount": 12.5, "paid": true, "customer": {"name": "Ann"}},
                {"id": "o2", "amount": 3, "items": ["pen", "ink"]},
                {"id": "o3", "amount": null, "customer": {"name": "Bo", "vip": false}}
            ]
        }"#,
    )
    .unwrap();

    let source = FileSource::new(&path).with_record_path("$.data");
    let table = JsonTable::new(source, TableConfig::default().with_table_name("orders"));

    let row_type = table.row_type().unwrap();
    let names: Vec<_> = row_type.names().collect();
    assert_eq!(
        names,
        vec![ROW_ID_FIELD, "id", "amount", "paid", "customer", "items"]
    );

    let customer = &row_type.get("customer").unwrap().ty;
    assert_eq!(
        customer.to_string(),
        "RECORD(name VARCHAR, vip BOOLEAN)"
    );

    let rows = table.rows().unwrap();
    let rendered: Vec<_> = rows
        .iter()
        .map(|row| {
            let mut value = row_to_json(row, &row_type);
            value.as_object_mut().unwrap().remove(ROW_ID_FIELD);
            value
        })
        .collect();

    assert_eq!(
        rendered[1],
        json!({
            "id": "o2",
            "amount": 3.0,
            "paid": null,
            "customer": null,
            "items": ["pen", "ink"]
        })
    );
    assert_eq!(rendered[2]["customer"], json!({"name": "Bo", "vip": false}));
}

#[test]
fn test_jsonl_table_from_yaml_config() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("events.jsonl"),
        "{\"kind\": \"click\", \"x\": 1}\n{\"kind\": \"view\"}\n{\"kind\": \"click\", \"x\": \"oops\"}\n",
    )
    .unwrap();
    let config_path = dir.path().join("events.yaml");
    fs::write(
        &config_path,
        "table_name: events\nsample_size: 2\nsource:\n  path: events.jsonl\n",
    )
    .unwrap();

    let config = TableConfig::from_file(&config_path).unwrap();
    let table = JsonTable::from_config(config).unwrap();

    let rows = table.rows().unwrap();
    assert_eq!(rows.len(), 3);
    // The third document lies outside the sample and scans leniently
    assert_eq!(rows[2][2], Cell::Null);
    assert_eq!(rows[0][2], Cell::Double(1.0));
}

#[test]
fn test_reader_table_with_scalars() {
    let input = Cursor::new("\"hello\"\n\"world\"\nnull\n");
    let source = ReaderSource::streaming(input).cached();
    let table = JsonTable::new(source, TableConfig::default());

    let row_type = table.row_type().unwrap();
    assert_eq!(row_type.get(VALUE_FIELD).unwrap().ty, SqlType::string());

    let values: Vec<_> = table
        .rows()
        .unwrap()
        .into_iter()
        .map(|row| row[1].clone())
        .collect();
    assert_eq!(
        values,
        vec![
            Cell::String("hello".to_string()),
            Cell::String("world".to_string()),
            Cell::Null,
        ]
    );
}

#[test]
fn test_empty_file_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json");
    fs::write(&path, "[]").unwrap();

    let table = JsonTable::new(FileSource::new(&path), TableConfig::default());

    let row_type = table.row_type().unwrap();
    assert_eq!(row_type.names().collect::<Vec<_>>(), vec![EMPTY_TABLE_FIELD]);
    assert!(table.rows().unwrap().is_empty());
}

#[test]
fn test_conflicting_sample_reports_field() {
    let source = InlineSource::new(vec![
        json!({"meta": {"flag": true}}),
        json!({"meta": {"flag": "yes"}}),
    ]);
    let table = JsonTable::new(source, TableConfig::default());

    let err = table.describe().unwrap_err();
    assert_eq!(err.field(), Some("meta.flag"));
    assert!(matches!(err.root(), Error::TypeMismatch { .. }));
}

#[test]
fn test_strict_table_round_trips_sample() {
    let documents = vec![
        json!({"a": 1, "b": [{"c": "x"}]}),
        json!({"a": null, "b": []}),
        json!({"d": {"e": null}}),
        json!({}),
    ];
    let config = TableConfig::default().with_mode(CoercionMode::Strict);
    let table = JsonTable::new(InlineSource::new(documents.clone()), config);

    let rows = table.rows().unwrap();
    assert_eq!(rows.len(), documents.len());
}

#[test]
fn test_null_fallback_from_config() {
    let source = InlineSource::new(vec![json!({"maybe": null, "list": []})]);
    let config = TableConfig::from_yaml_str("null_fallback: boolean").unwrap();
    let table = JsonTable::new(source, config);

    let row_type = table.row_type().unwrap();
    assert_eq!(
        row_type.get("maybe").unwrap().ty,
        SqlType::from(AtomicType::Bool)
    );
    assert_eq!(
        row_type.get("list").unwrap().ty,
        SqlType::array(SqlType::boolean())
    );
}

// ============================================================================
// Arrow Output Tests
// ============================================================================

#[test]
fn test_table_to_record_batch() {
    let source = InlineSource::new(vec![
        json!({"name": "Alice", "age": 30, "tags": ["a"]}),
        json!({"name": "Bob", "address": {"city": "Oslo"}}),
    ]);
    let table = JsonTable::new(source, TableConfig::default());

    let row_type = table.row_type().unwrap();
    let batch = rows_to_record_batch(&table.rows().unwrap(), &row_type).unwrap();

    assert_eq!(batch.schema().as_ref(), &to_arrow_schema(&row_type));
    assert_eq!(batch.num_rows(), 2);

    let records = record_batch_to_json(&batch).unwrap();
    assert_eq!(records[0]["age"], json!(30.0));
    assert_eq!(records[1]["address"], json!({"city": "Oslo"}));
    assert!(records[1]["tags"].is_null());
}

#[test]
fn test_source_trait_objects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rows.ndjson");
    fs::write(&path, "{\"n\": 1}\n{\"n\": 2}\n").unwrap();

    let sources: Vec<Box<dyn Source>> = vec![
        Box::new(FileSource::from_config(&SourceConfig::new(&path))),
        Box::new(InlineSource::new(vec![json!({"n": 1}), json!({"n": 2})])),
    ];

    for source in sources {
        let table = JsonTable::new(source, TableConfig::default());
        assert_eq!(table.rows().unwrap().len(), 2);
    }
}
