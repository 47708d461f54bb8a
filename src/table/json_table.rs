//! JSON table implementation

use super::types::{InferenceState, RowIter};
use crate::config::TableConfig;
use crate::convert::{Coercer, Row};
use crate::error::{Error, Result};
use crate::schema::{RecordType, RowTypeInferrer};
use crate::source::{FileSource, Source};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// A relational view over a source of JSON documents.
///
/// The row type is inferred from the first `sample_size` documents on first
/// use and memoized. Exactly one caller runs inference; concurrent callers
/// block until it finishes and observe the same row type or the same error.
/// A panic during inference resets the table so a later call starts over.
#[derive(Debug)]
pub struct JsonTable<S> {
    source: S,
    config: TableConfig,
    state: Mutex<InferenceState>,
    settled: Condvar,
}

impl<S: Source> JsonTable<S> {
    pub fn new(source: S, config: TableConfig) -> Self {
        Self {
            source,
            config,
            state: Mutex::new(InferenceState::Uninitialized),
            settled: Condvar::new(),
        }
    }

    /// Table with default settings
    pub fn with_defaults(source: S) -> Self {
        Self::new(source, TableConfig::default())
    }

    pub fn name(&self) -> &str {
        &self.config.table_name
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The table's row type, inferring it on first call.
    ///
    /// A failed inference is memoized too and reported to every caller as
    /// [`Error::Shared`].
    pub fn row_type(&self) -> Result<Arc<RecordType>> {
        let mut state = self.lock();
        loop {
            match &*state {
                InferenceState::Ready(row_type) => return Ok(Arc::clone(row_type)),
                InferenceState::Failed(error) => return Err(Error::Shared(Arc::clone(error))),
                InferenceState::Computing => {
                    state = self
                        .settled
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                InferenceState::Uninitialized => break,
            }
        }
        *state = InferenceState::Computing;
        drop(state);

        let reset = ResetOnPanic { table: self };
        let result = self.infer();
        std::mem::forget(reset);

        let (settled, outcome) = match result {
            Ok(row_type) => {
                let row_type = Arc::new(row_type);
                (
                    InferenceState::Ready(Arc::clone(&row_type)),
                    Ok(row_type),
                )
            }
            Err(error) => {
                let error = Arc::new(error);
                (
                    InferenceState::Failed(Arc::clone(&error)),
                    Err(Error::Shared(error)),
                )
            }
        };

        tracing::debug!(table = %self.name(), state = settled.label(), "Row type settled");
        *self.lock() = settled;
        self.settled.notify_all();
        outcome
    }

    /// Scan the whole source, one coerced row per document.
    ///
    /// Uses the configured coercion mode (lenient by default, where values
    /// that do not fit become null).
    pub fn scan(&self) -> Result<RowIter<'_>> {
        let row_type = self.row_type()?;
        let coercer = Coercer::new(self.config.mode);
        let documents = self.source.fetch()?;

        Ok(Box::new(documents.map(move |document| {
            document.and_then(|document| coercer.coerce_row(&document, &row_type))
        })))
    }

    /// Scan the whole source into memory
    pub fn rows(&self) -> Result<Vec<Row>> {
        self.scan()?.collect()
    }

    /// Multi-line description of the row type
    pub fn describe(&self) -> Result<String> {
        Ok(self.row_type()?.to_pretty_string())
    }

    fn infer(&self) -> Result<RecordType> {
        tracing::debug!(
            table = %self.name(),
            sample_size = self.config.sample_size,
            "Inferring row type"
        );
        let inferrer = RowTypeInferrer::new()
            .with_sample_size(self.config.sample_size)
            .with_null_fallback(self.config.null_fallback);
        inferrer.infer_from_rows(self.source.fetch()?)
    }

    fn lock(&self) -> MutexGuard<'_, InferenceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl JsonTable<FileSource> {
    /// Open the file table described by a config
    pub fn from_config(config: TableConfig) -> Result<Self> {
        config.validate()?;
        let source = config
            .source
            .as_ref()
            .map(FileSource::from_config)
            .ok_or_else(|| Error::config("Table config has no source"))?;
        Ok(Self::new(source, config))
    }
}

/// Puts an interrupted inference back to `Uninitialized` and wakes waiters
struct ResetOnPanic<'a, S: Source> {
    table: &'a JsonTable<S>,
}

impl<S: Source> Drop for ResetOnPanic<'_, S> {
    fn drop(&mut self) {
        tracing::warn!(table = %self.table.name(), "Row type inference panicked");
        *self.table.lock() = InferenceState::Uninitialized;
        self.table.settled.notify_all();
    }
}
