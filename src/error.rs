//! Error types for jsontab
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use crate::schema::SqlType;
use std::sync::Arc;
use thiserror::Error;

/// The main error type for jsontab
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Schema Errors
    // ============================================================================
    /// Two sample rows carry structurally incompatible types for the same field
    #[error("Cannot merge types{}: '{left}' with '{right}'", at_field(.field))]
    TypeMismatch {
        field: Option<String>,
        left: Box<SqlType>,
        right: Box<SqlType>,
    },

    /// A value does not conform to its expected type during strict coercion
    #[error("Expected {expected}{} but got: {found}", at_field(.field))]
    ValueMismatch {
        field: Option<String>,
        expected: Box<SqlType>,
        found: String,
    },

    #[error("Internal invariant violated: {message}")]
    InvariantViolation { message: String },

    /// A memoized failure, shared by every caller that observes it
    #[error(transparent)]
    Shared(Arc<Error>),

    // ============================================================================
    // Source Errors
    // ============================================================================
    #[error("Source error: {message}")]
    Source { message: String },

    #[error("Failed to decode documents: {message}")]
    Decode { message: String },

    #[error("JSONPath error: {message}")]
    JsonPath { message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Engine Errors
    // ============================================================================
    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

fn at_field(field: &Option<String>) -> String {
    field
        .as_ref()
        .map(|f| format!(" for field '{f}'"))
        .unwrap_or_default()
}

impl Error {
    /// Create a type mismatch error for two conflicting types
    pub fn type_mismatch(left: &SqlType, right: &SqlType) -> Self {
        Self::TypeMismatch {
            field: None,
            left: Box::new(left.clone()),
            right: Box::new(right.clone()),
        }
    }

    /// Create a value mismatch error
    pub fn value_mismatch(expected: &SqlType, found: impl Into<String>) -> Self {
        Self::ValueMismatch {
            field: None,
            expected: Box::new(expected.clone()),
            found: found.into(),
        }
    }

    /// Create an invariant violation error
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Create a source error
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Prefix the field path of a mismatch error with an enclosing segment.
    ///
    /// Segments are joined with `.`, except array element markers (`[]`)
    /// which attach directly to their parent.
    #[must_use]
    pub fn within(self, segment: &str) -> Self {
        let join = |field: Option<String>| match field {
            None => segment.to_string(),
            Some(inner) if inner.starts_with('[') => format!("{segment}{inner}"),
            Some(inner) => format!("{segment}.{inner}"),
        };

        match self {
            Error::TypeMismatch { field, left, right } => Error::TypeMismatch {
                field: Some(join(field)),
                left,
                right,
            },
            Error::ValueMismatch {
                field,
                expected,
                found,
            } => Error::ValueMismatch {
                field: Some(join(field)),
                expected,
                found,
            },
            other => other,
        }
    }

    /// The underlying error, looking through shared (memoized) failures
    pub fn root(&self) -> &Error {
        match self {
            Error::Shared(inner) => inner.root(),
            other => other,
        }
    }

    /// Field path carried by a mismatch error, if any
    pub fn field(&self) -> Option<&str> {
        match self.root() {
            Error::TypeMismatch { field, .. } | Error::ValueMismatch { field, .. } => {
                field.as_deref()
            }
            _ => None,
        }
    }
}

/// Result type alias for jsontab
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
