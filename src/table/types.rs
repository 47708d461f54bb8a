//! Table types

use crate::convert::Row;
use crate::error::{Error, Result};
use crate::schema::RecordType;
use std::sync::Arc;

/// Fallible iterator over coerced rows, in source order
pub type RowIter<'a> = Box<dyn Iterator<Item = Result<Row>> + 'a>;

/// Lifecycle of a table's memoized row type
#[derive(Debug, Default)]
pub(crate) enum InferenceState {
    #[default]
    Uninitialized,
    /// One caller is running inference, others wait
    Computing,
    Ready(Arc<RecordType>),
    Failed(Arc<Error>),
}

impl InferenceState {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            InferenceState::Uninitialized => "uninitialized",
            InferenceState::Computing => "computing",
            InferenceState::Ready(_) => "ready",
            InferenceState::Failed(_) => "failed",
        }
    }
}
