//! Row type inference from a sample of JSON documents

use super::deduce::deduce_record;
use super::merge::merge_records;
use super::types::{
    AtomicType, RecordType, SqlType, EMPTY_ROW_FIELD, EMPTY_TABLE_FIELD, ROW_ID_FIELD,
    VALUE_FIELD,
};
use crate::error::Result;
use crate::types::{JsonObject, JsonValue};

/// Default number of leading rows inspected to infer a table's row type
pub const DEFAULT_SAMPLE_SIZE: usize = 50;

/// Row type inferrer with configuration options
#[derive(Debug, Clone)]
pub struct RowTypeInferrer {
    /// Maximum number of rows read from the head of the input
    sample_size: usize,
    /// Type substituted for columns only ever observed as null
    null_fallback: AtomicType,
}

impl Default for RowTypeInferrer {
    fn default() -> Self {
        Self::new()
    }
}

impl RowTypeInferrer {
    /// Create a new inferrer with default settings
    pub fn new() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            null_fallback: AtomicType::String,
        }
    }

    /// Set the number of rows sampled
    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Set the type used in place of `UNKNOWN`
    #[must_use]
    pub fn with_null_fallback(mut self, fallback: AtomicType) -> Self {
        self.null_fallback = fallback;
        self
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn null_fallback(&self) -> AtomicType {
        self.null_fallback
    }

    /// Infer the finalized row type of a sample.
    ///
    /// Only the first `sample_size` rows are inspected. Unknown placeholders
    /// are resolved to the configured fallback.
    pub fn infer(&self, sample: &[JsonValue]) -> Result<RecordType> {
        let sample = &sample[..sample.len().min(self.sample_size)];
        let inferred = infer_row_type(sample)?;
        Ok(inferred.resolve_unknown(self.null_fallback))
    }

    /// Infer the finalized row type from the head of a fallible row stream.
    ///
    /// At most `sample_size` rows are pulled from `rows`; the first read
    /// error aborts inference.
    pub fn infer_from_rows<I>(&self, rows: I) -> Result<RecordType>
    where
        I: IntoIterator<Item = Result<JsonValue>>,
    {
        let sample = rows
            .into_iter()
            .take(self.sample_size)
            .collect::<Result<Vec<_>>>()?;
        self.infer(&sample)
    }
}

/// Infer the (unresolved) row type of a whole sample.
///
/// An empty sample yields a single non-nullable `EMPTY_TABLE` column.
/// Otherwise each row's type is deduced with [`row_type`] and all of them are
/// merged left to right; incompatible rows abort with a type mismatch.
pub fn infer_row_type(sample: &[JsonValue]) -> Result<RecordType> {
    let Some((first, rest)) = sample.split_first() else {
        tracing::debug!("Empty sample, using placeholder row type");
        return Ok(RecordType::new().with_field(EMPTY_TABLE_FIELD, SqlType::boolean().not_null()));
    };

    let mut merged = row_type(first);
    for row in rest {
        merged = merge_records(&merged, &row_type(row))?;
    }

    tracing::debug!(
        rows = sample.len(),
        fields = merged.len(),
        "Inferred row type"
    );

    Ok(merged)
}

/// Deduce the row type of a single top-level document.
///
/// The row identifier comes first. Non-object documents are wrapped in a
/// single `VALUE` field; a row without any field gets the empty-row marker.
pub fn row_type(row: &JsonValue) -> RecordType {
    let observed = match row {
        JsonValue::Object(map) => deduce_record(map),
        other => deduce_record(&wrap_value(other.clone())),
    };

    let mut record = RecordType::new().with_field(ROW_ID_FIELD, SqlType::string().not_null());
    if observed.is_empty() {
        record.push(EMPTY_ROW_FIELD, SqlType::boolean().not_null());
    }
    for field in observed.into_fields() {
        if !record.push(field.name.clone(), field.ty) {
            tracing::debug!(field = %field.name, "Ignoring field shadowed by a synthetic column");
        }
    }
    record
}

/// Wrap a non-object document the way row type inference does
pub fn wrap_value(value: JsonValue) -> JsonObject {
    let mut wrapped = JsonObject::new();
    wrapped.insert(VALUE_FIELD.to_string(), value);
    wrapped
}
