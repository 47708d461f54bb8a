//! Document sources
//!
//! A [`Source`] yields the JSON documents a table is built from. Every fetch
//! starts a new pass; sources that can only be read once fail on the second
//! fetch unless wrapped with [`Source::cached`].

mod sources;
mod types;

pub use sources::{CachedSource, FileSource, InlineSource, ReaderSource, DEFAULT_STREAM_LIMIT};
pub use types::{RecordIter, Source};

#[cfg(test)]
mod tests;
