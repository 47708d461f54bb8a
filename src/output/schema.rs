//! Arrow schema mapping and row to Arrow conversion
//!
//! Row types map onto Arrow types one to one: `BOOLEAN` → `Boolean`,
//! `DOUBLE` → `Float64`, `VARCHAR` → `Utf8`, arrays → `List`, records →
//! `Struct`. Records without fields have no Arrow struct counterpart and map
//! to an all-null `Null` column.

use crate::convert::{Cell, Row};
use crate::error::{Error, Result};
use crate::schema::{RecordType, SqlType, TypeKind};
use crate::types::{JsonObject, JsonValue};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float64Array, ListArray, NullArray, StringArray, StructArray,
};
use arrow::buffer::{NullBuffer, OffsetBuffer};
use arrow::datatypes::{DataType, Field, Fields, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// Name of the child field of list types
const LIST_ITEM: &str = "item";

/// Arrow schema of a row type
pub fn to_arrow_schema(row_type: &RecordType) -> Schema {
    Schema::new(to_arrow_fields(row_type))
}

/// Arrow field for a named column
pub fn to_arrow_field(name: &str, ty: &SqlType) -> Field {
    let data_type = to_arrow_type(ty);
    // Null columns cannot be declared non-nullable
    let nullable = ty.nullable || data_type == DataType::Null;
    Field::new(name, data_type, nullable)
}

/// Arrow data type of a column type
pub fn to_arrow_type(ty: &SqlType) -> DataType {
    match &ty.kind {
        TypeKind::Unknown => DataType::Null,
        TypeKind::Bool => DataType::Boolean,
        TypeKind::Double => DataType::Float64,
        TypeKind::String => DataType::Utf8,
        TypeKind::Array { element } => {
            DataType::List(Arc::new(to_arrow_field(LIST_ITEM, element)))
        }
        TypeKind::Record { fields } if fields.is_empty() => DataType::Null,
        TypeKind::Record { fields } => DataType::Struct(to_arrow_fields(fields)),
    }
}

fn to_arrow_fields(fields: &RecordType) -> Fields {
    fields
        .iter()
        .map(|field| to_arrow_field(&field.name, &field.ty))
        .collect()
}

/// Convert coerced rows to an Arrow RecordBatch
pub fn rows_to_record_batch(rows: &[Row], row_type: &RecordType) -> Result<RecordBatch> {
    let schema = Arc::new(to_arrow_schema(row_type));

    if rows.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }

    let columns = row_type
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let values: Vec<Option<&Cell>> = rows.iter().map(|row| row.get(i)).collect();
            build_array(&values, &field.ty)
        })
        .collect::<Result<Vec<_>>>()?;

    RecordBatch::try_new(schema, columns)
        .map_err(|e| Error::output(format!("Failed to create RecordBatch: {e}")))
}

/// Build an Arrow array from cells; `None` and `Cell::Null` are both null
fn build_array(values: &[Option<&Cell>], ty: &SqlType) -> Result<ArrayRef> {
    match &ty.kind {
        TypeKind::Unknown => Ok(Arc::new(NullArray::new(values.len()))),

        TypeKind::Bool => {
            let arr: BooleanArray = values.iter().map(|v| v.and_then(Cell::as_bool)).collect();
            Ok(Arc::new(arr))
        }

        TypeKind::Double => {
            let arr: Float64Array = values.iter().map(|v| v.and_then(Cell::as_f64)).collect();
            Ok(Arc::new(arr))
        }

        TypeKind::String => {
            let arr: StringArray = values.iter().map(|v| v.and_then(Cell::as_str)).collect();
            Ok(Arc::new(arr))
        }

        TypeKind::Array { element } => build_list_array(values, element),

        TypeKind::Record { fields } if fields.is_empty() => {
            Ok(Arc::new(NullArray::new(values.len())))
        }

        TypeKind::Record { fields } => build_struct_array(values, fields),
    }
}

/// Build a list array from array cells
fn build_list_array(values: &[Option<&Cell>], element: &SqlType) -> Result<ArrayRef> {
    let mut items: Vec<Option<&Cell>> = Vec::new();
    let mut offsets: Vec<i32> = vec![0];
    let mut validity = Vec::with_capacity(values.len());

    for value in values {
        let is_list = match value {
            Some(Cell::Array(cells)) => {
                items.extend(cells.iter().map(Some));
                true
            }
            _ => false,
        };
        validity.push(is_list);

        let offset = i32::try_from(items.len())
            .map_err(|_| Error::output("Array too large for i32 offset"))?;
        offsets.push(offset);
    }

    let field = Arc::new(to_arrow_field(LIST_ITEM, element));
    let items = build_array(&items, element)?;
    let list = ListArray::try_new(
        field,
        OffsetBuffer::new(offsets.into()),
        items,
        Some(NullBuffer::from(validity)),
    )?;
    Ok(Arc::new(list))
}

/// Build a struct array from record cells
fn build_struct_array(values: &[Option<&Cell>], fields: &RecordType) -> Result<ArrayRef> {
    let validity: Vec<bool> = values
        .iter()
        .map(|v| matches!(v, Some(Cell::Record(_))))
        .collect();

    let children = fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let child_values: Vec<Option<&Cell>> = values
                .iter()
                .map(|v| match v {
                    Some(Cell::Record(cells)) => cells.get(i),
                    _ => None,
                })
                .collect();
            build_array(&child_values, &field.ty)
        })
        .collect::<Result<Vec<_>>>()?;

    let array = StructArray::try_new(
        to_arrow_fields(fields),
        children,
        Some(NullBuffer::from(validity)),
    )?;
    Ok(Arc::new(array))
}

/// Convert an Arrow RecordBatch back to JSON objects, one per row
pub fn record_batch_to_json(batch: &RecordBatch) -> Result<Vec<JsonValue>> {
    let schema = batch.schema();

    (0..batch.num_rows())
        .map(|row| {
            let mut record = JsonObject::new();
            for (column, field) in batch.columns().iter().zip(schema.fields()) {
                record.insert(field.name().clone(), array_value_to_json(column.as_ref(), row)?);
            }
            Ok::<_, Error>(JsonValue::Object(record))
        })
        .collect()
}

fn downcast<'a, T: 'static>(array: &'a dyn Array, name: &str) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::output(format!("Failed to downcast to {name}")))
}

/// Convert a single array element to JSON
fn array_value_to_json(array: &dyn Array, row: usize) -> Result<JsonValue> {
    if array.is_null(row) {
        return Ok(JsonValue::Null);
    }

    match array.data_type() {
        DataType::Null => Ok(JsonValue::Null),

        DataType::Boolean => {
            let arr = downcast::<BooleanArray>(array, "BooleanArray")?;
            Ok(JsonValue::Bool(arr.value(row)))
        }

        DataType::Float64 => {
            let arr = downcast::<Float64Array>(array, "Float64Array")?;
            Ok(serde_json::Number::from_f64(arr.value(row)).map_or(JsonValue::Null, JsonValue::Number))
        }

        DataType::Utf8 => {
            let arr = downcast::<StringArray>(array, "StringArray")?;
            Ok(JsonValue::String(arr.value(row).to_string()))
        }

        DataType::List(_) => {
            let arr = downcast::<ListArray>(array, "ListArray")?;
            let values = arr.value(row);
            (0..values.len())
                .map(|i| array_value_to_json(values.as_ref(), i))
                .collect::<Result<Vec<_>>>()
                .map(JsonValue::Array)
        }

        DataType::Struct(_) => {
            let arr = downcast::<StructArray>(array, "StructArray")?;
            let mut object = JsonObject::new();
            for (column, field) in arr.columns().iter().zip(arr.fields()) {
                object.insert(field.name().clone(), array_value_to_json(column.as_ref(), row)?);
            }
            Ok(JsonValue::Object(object))
        }

        other => Err(Error::output(format!("Unsupported Arrow type: {other}"))),
    }
}
