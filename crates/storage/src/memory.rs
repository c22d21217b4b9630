//! MemoryAdapter: in-process storage adapter
//!
//! Columns are `BTreeMap<RowHandle, EncodedForm>` behind a
//! `parking_lot::RwLock`, shared copy-on-write through `Arc`. Evaluation
//! takes a snapshot of the column and filters it lazily, extracting the
//! field from the raw text without decoding the value.
//!
//! Handles come from a single `AtomicU64` counter and are never reused.
//!
//! For tests, the adapter can be made to refuse pushdown beyond a path depth
//! (driving the fallback) or to fail every call (driving error propagation).

use crate::extract::row_matches;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tessera_core::{EncodedForm, Error, ExtractionExpression, Result, RowHandle, StorageAdapter};
use tracing::trace;

type Column = BTreeMap<RowHandle, EncodedForm>;

/// In-memory storage adapter
#[derive(Debug)]
pub struct MemoryAdapter {
    columns: RwLock<FxHashMap<String, Arc<Column>>>,
    next_handle: AtomicU64,
    max_pushdown_depth: Option<usize>,
    failing: AtomicBool,
}

impl MemoryAdapter {
    /// Create an empty adapter
    pub fn new() -> Self {
        Self {
            columns: RwLock::new(FxHashMap::default()),
            next_handle: AtomicU64::new(1),
            max_pushdown_depth: None,
            failing: AtomicBool::new(false),
        }
    }

    /// Refuse to evaluate paths deeper than `depth`
    ///
    /// Refused expressions report `PushdownUnsupported`.
    pub fn with_max_pushdown_depth(mut self, depth: usize) -> Self {
        self.max_pushdown_depth = Some(depth);
        self
    }

    /// Make every subsequent call fail with `StorageError` (or stop failing)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of rows in `column`
    pub fn len(&self, column: &str) -> usize {
        self.columns.read().get(column).map_or(0, |rows| rows.len())
    }

    /// True if `column` holds no rows
    pub fn is_empty(&self, column: &str) -> bool {
        self.len(column) == 0
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::storage("memory adapter is unavailable"));
        }
        Ok(())
    }

    fn snapshot(&self, column: &str) -> Arc<Column> {
        self.columns
            .read()
            .get(column)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageAdapter for MemoryAdapter {
    type Matches<'a> = MemoryMatches;

    fn store(&self, column: &str, encoded: &EncodedForm) -> Result<RowHandle> {
        self.check_available()?;
        let handle = RowHandle::new(self.next_handle.fetch_add(1, Ordering::SeqCst));
        let mut columns = self.columns.write();
        let rows = columns.entry(column.to_string()).or_default();
        Arc::make_mut(rows).insert(handle, encoded.clone());
        trace!(target: "tessera::storage", column, handle = %handle, "Stored row");
        Ok(handle)
    }

    fn fetch(&self, column: &str, handle: RowHandle) -> Result<EncodedForm> {
        self.check_available()?;
        self.columns
            .read()
            .get(column)
            .and_then(|rows| rows.get(&handle))
            .cloned()
            .ok_or_else(|| Error::NotFound {
                column: column.to_string(),
                handle,
            })
    }

    fn evaluate<'a>(&'a self, column: &str, expr: &ExtractionExpression) -> Result<Self::Matches<'a>> {
        self.check_available()?;
        if let Some(max) = self.max_pushdown_depth {
            if expr.path().depth() > max {
                return Err(Error::PushdownUnsupported(format!(
                    "memory adapter evaluates paths up to depth {}, got '{}'",
                    max,
                    expr.path()
                )));
            }
        }
        Ok(MemoryMatches {
            rows: self.snapshot(column),
            expr: Arc::new(expr.clone()),
            after: None,
        })
    }

    fn scan(&self, column: &str) -> Result<Vec<(RowHandle, EncodedForm)>> {
        self.check_available()?;
        Ok(self
            .snapshot(column)
            .iter()
            .map(|(h, e)| (*h, e.clone()))
            .collect())
    }
}

/// Lazily filtered snapshot of a column
///
/// Later writes to the column are not visible to it.
#[derive(Debug, Clone)]
pub struct MemoryMatches {
    rows: Arc<Column>,
    expr: Arc<ExtractionExpression>,
    /// Last handle yielded
    after: Option<RowHandle>,
}

impl Iterator for MemoryMatches {
    type Item = RowHandle;

    fn next(&mut self) -> Option<RowHandle> {
        let lower = self.after.map_or(Bound::Unbounded, Bound::Excluded);
        let found = self
            .rows
            .range((lower, Bound::Unbounded))
            .find(|(_, encoded)| row_matches(encoded.as_str(), &self.expr))
            .map(|(handle, _)| *handle);
        match found {
            Some(handle) => self.after = Some(handle),
            None => self.after = self.rows.keys().next_back().copied(),
        }
        found
    }
}
