//! Storage adapter boundary
//!
//! The codec never talks to a storage engine directly. It consumes the narrow
//! [`StorageAdapter`] trait: store a blob, fetch a blob, evaluate a compiled
//! extraction expression. Swapping the in-memory adapter for SQLite (or any
//! other engine with JSON extraction) does not touch the codec or resolver.

use crate::error::Result;
use crate::predicate::ExtractionExpression;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque row identifier issued by a storage adapter
///
/// The core never interprets it; it is a capability for `fetch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowHandle(u64);

impl RowHandle {
    /// Wrap an adapter-specific identifier
    pub const fn new(raw: u64) -> Self {
        RowHandle(raw)
    }

    /// The adapter-specific identifier
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Canonical encoded string of a value
///
/// Produced by the codec; adapters store and return it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedForm(String);

impl EncodedForm {
    /// Wrap text read back from storage
    ///
    /// No validation happens here; decoding validates.
    pub fn from_stored(text: impl Into<String>) -> Self {
        EncodedForm(text.into())
    }

    /// Encoded text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the empty string (never produced by the codec)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unwrap into the encoded text
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for EncodedForm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncodedForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage abstraction for encoded value columns
///
/// Rows live in named columns; each row holds one encoded value.
///
/// Thread safety: all methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync). The core never retries a failed
/// call; retry policy belongs to the caller.
pub trait StorageAdapter: Send + Sync {
    /// Matches produced by [`StorageAdapter::evaluate`]
    ///
    /// A finite sequence. Clone it before iterating to walk it twice.
    type Matches<'a>: Iterator<Item = RowHandle> + Clone
    where
        Self: 'a;

    /// Store an encoded value in `column`, returning its new handle
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the adapter fails.
    fn store(&self, column: &str, encoded: &EncodedForm) -> Result<RowHandle>;

    /// Fetch the encoded value stored under `handle`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the handle is stale or unknown, `StorageError`
    /// if the adapter fails.
    fn fetch(&self, column: &str, handle: RowHandle) -> Result<EncodedForm>;

    /// Evaluate a compiled extraction expression over every row of `column`
    ///
    /// An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Returns `PushdownUnsupported` if this adapter cannot evaluate the
    /// expression (the caller falls back to in-memory filtering), or
    /// `StorageError` if the adapter fails.
    fn evaluate<'a>(
        &'a self,
        column: &str,
        expr: &ExtractionExpression,
    ) -> Result<Self::Matches<'a>>;

    /// Every row of `column`, ordered by handle
    ///
    /// Used by the in-memory fallback.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the adapter fails.
    fn scan(&self, column: &str) -> Result<Vec<(RowHandle, EncodedForm)>>;
}
