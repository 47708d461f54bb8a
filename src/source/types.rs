//! Source trait and shared types

use super::sources::CachedSource;
use crate::error::Result;
use crate::types::JsonValue;

/// Fallible iterator over the documents of one fetch
pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<JsonValue>> + 'a>;

/// A provider of JSON documents.
///
/// Row type inference and scanning each call [`Source::fetch`], so a table
/// reads its source at least twice. One-shot sources should be wrapped with
/// [`Source::cached`].
pub trait Source: Send + Sync {
    /// Start a new pass over the documents
    fn fetch(&self) -> Result<RecordIter<'_>>;

    /// Read this source once and replay the documents on every later fetch
    fn cached(self) -> CachedSource<Self>
    where
        Self: Sized,
    {
        CachedSource::new(self)
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn fetch(&self) -> Result<RecordIter<'_>> {
        (**self).fetch()
    }
}

impl<S: Source + ?Sized> Source for std::sync::Arc<S> {
    fn fetch(&self) -> Result<RecordIter<'_>> {
        (**self).fetch()
    }
}
