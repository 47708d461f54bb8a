//! Type deduction from single JSON values

use super::types::{RecordType, SqlType, TypeKind};
use crate::types::{JsonObject, JsonValue};

/// Deduce the most specific type describing `value`.
///
/// Numbers are always widened to `DOUBLE`. Arrays only sample their first
/// element; an empty array has an `UNKNOWN` element type.
pub fn deduce_type(value: &JsonValue) -> SqlType {
    match value {
        JsonValue::Null => SqlType::unknown(),
        JsonValue::Bool(_) => SqlType::boolean(),
        JsonValue::Number(_) => SqlType::double(),
        JsonValue::String(_) => SqlType::string(),
        JsonValue::Array(items) => {
            SqlType::array(items.first().map_or_else(SqlType::unknown, deduce_nested))
        }
        JsonValue::Object(map) => SqlType::record(deduce_record(map)),
    }
}

/// Deduce the fields of an object, in insertion order.
///
/// Keys that collide case-insensitively with an earlier key are skipped.
pub fn deduce_record(map: &JsonObject) -> RecordType {
    let mut record = RecordType::new();
    for (name, value) in map {
        if !record.push(name.clone(), deduce_nested(value)) {
            tracing::debug!(field = %name, "Skipping field colliding case-insensitively");
        }
    }
    record
}

/// Nested values can always be absent, so nested records are nullable even
/// when they have no field.
fn deduce_nested(value: &JsonValue) -> SqlType {
    let ty = deduce_type(value);
    if matches!(ty.kind, TypeKind::Record { .. }) {
        ty.with_nullable(true)
    } else {
        ty
    }
}
