//! Storage adapters for Tessera
//!
//! Implementations of `tessera_core::StorageAdapter`:
//! - MemoryAdapter: in-process columns with lazy, snapshot-based evaluation
//! - SqliteAdapter (feature `sqlite`): one table per column, filters pushed
//!   down as `json_extract` conditions
//!
//! Both evaluate compiled expressions on the raw encoded text; neither
//! decodes values.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod extract;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use extract::{extract, row_matches};
pub use memory::{MemoryAdapter, MemoryMatches};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteAdapter;
