//! Value coercion into a fixed row type

use super::types::{Cell, CoercionMode, Row};
use crate::error::{Error, Result};
use crate::schema::{
    wrap_value, RecordType, SqlType, TypeKind, EMPTY_ROW_FIELD, EMPTY_TABLE_FIELD, ROW_ID_FIELD,
    VALUE_FIELD,
};
use crate::types::{get_field_ci, json_kind, json_snippet, JsonObject, JsonValue};
use std::borrow::Cow;

/// Coerces JSON documents into rows of a finalized row type
#[derive(Debug, Clone, Copy, Default)]
pub struct Coercer {
    mode: CoercionMode,
}

impl Coercer {
    pub fn new(mode: CoercionMode) -> Self {
        Self { mode }
    }

    /// Coercer failing on the first mismatching value
    pub fn strict() -> Self {
        Self::new(CoercionMode::Strict)
    }

    /// Coercer substituting null for mismatching values
    pub fn lenient() -> Self {
        Self::new(CoercionMode::Lenient)
    }

    pub fn mode(&self) -> CoercionMode {
        self.mode
    }

    /// Coerce one top-level document into a row of `row_type`.
    ///
    /// Non-object documents are wrapped in a `VALUE` field first. Synthetic
    /// columns are generated here rather than read from the document.
    pub fn coerce_row(&self, row: &JsonValue, row_type: &RecordType) -> Result<Row> {
        let object = match row {
            JsonValue::Object(map) => Cow::Borrowed(map),
            other => {
                if !row_type.contains(VALUE_FIELD) {
                    return Err(Error::invariant(format!(
                        "row type {row_type} has no {VALUE_FIELD} field for a top-level {}",
                        json_kind(other)
                    )));
                }
                Cow::Owned(wrap_value(other.clone()))
            }
        };

        row_type
            .iter()
            .map(|field| match field.name.as_str() {
                ROW_ID_FIELD => Ok(Cell::String(uuid::Uuid::new_v4().to_string())),
                EMPTY_ROW_FIELD if is_marker(&field.ty) => Ok(Cell::Bool(object.is_empty())),
                EMPTY_TABLE_FIELD if is_marker(&field.ty) => Ok(Cell::Bool(true)),
                name => self
                    .coerce_field(&object, name, &field.ty)
                    .map_err(|e| e.within(name)),
            })
            .collect()
    }

    /// Coerce a single value into a cell of type `ty`
    pub fn coerce_value(&self, value: &JsonValue, ty: &SqlType) -> Result<Cell> {
        if ty.is_unknown() {
            return Err(Error::invariant(
                "cannot coerce into UNKNOWN; resolve the row type first",
            ));
        }

        match (&ty.kind, value) {
            (_, JsonValue::Null) if ty.nullable => Ok(Cell::Null),

            (TypeKind::Bool, JsonValue::Bool(b)) => Ok(Cell::Bool(*b)),
            (TypeKind::Double, JsonValue::Number(n)) => match n.as_f64() {
                Some(d) => Ok(Cell::Double(d)),
                None => self.mismatch(ty, value),
            },
            (TypeKind::String, JsonValue::String(s)) => Ok(Cell::String(s.clone())),

            (TypeKind::Array { element }, JsonValue::Array(items)) => items
                .iter()
                .map(|item| self.coerce_value(item, element).map_err(|e| e.within("[]")))
                .collect::<Result<Vec<_>>>()
                .map(Cell::Array),

            (TypeKind::Record { fields }, JsonValue::Object(map)) => fields
                .iter()
                .map(|field| {
                    self.coerce_field(map, &field.name, &field.ty)
                        .map_err(|e| e.within(&field.name))
                })
                .collect::<Result<Vec<_>>>()
                .map(Cell::Record),

            _ => self.mismatch(ty, value),
        }
    }

    fn coerce_field(&self, object: &JsonObject, name: &str, ty: &SqlType) -> Result<Cell> {
        match get_field_ci(object, name) {
            Some(value) => self.coerce_value(value, ty),
            None if ty.nullable || self.mode == CoercionMode::Lenient => Ok(Cell::Null),
            None => Err(Error::value_mismatch(ty, "missing field")),
        }
    }

    fn mismatch(&self, ty: &SqlType, value: &JsonValue) -> Result<Cell> {
        match self.mode {
            CoercionMode::Strict => Err(Error::value_mismatch(
                ty,
                format!("{} {}", json_kind(value), json_snippet(value)),
            )),
            CoercionMode::Lenient => {
                tracing::trace!(expected = %ty, found = json_kind(value), "Substituting null");
                Ok(Cell::Null)
            }
        }
    }
}

/// Marker columns are the only non-nullable booleans in a row type; document
/// fields of the same name are always deduced nullable.
fn is_marker(ty: &SqlType) -> bool {
    ty.kind == TypeKind::Bool && !ty.nullable
}

/// Render a coerced row back to a JSON object keyed by field name
pub fn row_to_json(row: &[Cell], row_type: &RecordType) -> JsonValue {
    JsonValue::Object(record_to_json(row, row_type))
}

/// Render a single cell as JSON, using `ty` for record field names.
///
/// Composite cells whose type does not describe them are rendered
/// positionally as arrays.
pub fn cell_to_json(cell: &Cell, ty: &SqlType) -> JsonValue {
    match (cell, &ty.kind) {
        (Cell::Null, _) => JsonValue::Null,
        (Cell::Bool(b), _) => JsonValue::Bool(*b),
        (Cell::Double(d), _) => {
            serde_json::Number::from_f64(*d).map_or(JsonValue::Null, JsonValue::Number)
        }
        (Cell::String(s), _) => JsonValue::String(s.clone()),
        (Cell::Array(items), TypeKind::Array { element }) => {
            JsonValue::Array(items.iter().map(|c| cell_to_json(c, element)).collect())
        }
        (Cell::Record(cells), TypeKind::Record { fields }) => {
            JsonValue::Object(record_to_json(cells, fields))
        }
        (Cell::Array(cells) | Cell::Record(cells), _) => JsonValue::Array(
            cells
                .iter()
                .map(|c| cell_to_json(c, &SqlType::unknown()))
                .collect(),
        ),
    }
}

fn record_to_json(cells: &[Cell], fields: &RecordType) -> JsonObject {
    fields
        .iter()
        .zip(cells)
        .map(|(field, cell)| (field.name.clone(), cell_to_json(cell, &field.ty)))
        .collect()
}
