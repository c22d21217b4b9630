//! Tessera - canonical persistence for immutable value objects
//!
//! Tessera stores small immutable value objects (money amounts, coordinates,
//! names) as canonical encoded strings in a single column, and lets queries
//! filter on their fields without decoding every row.
//!
//! # Quick Start
//!
//! ```ignore
//! use tessera::{CompareOp, MemoryAdapter, Tessera, TesseraConfig, TypeRegistry};
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_value::<Money>()?;
//!
//! let tessera = Tessera::new(&registry, TesseraConfig::default())?;
//! let adapter = MemoryAdapter::new();
//! let prices = tessera.query(&adapter, "price", "Money")?;
//!
//! prices.insert_value(&Money::new(150.0, "USD"))?;
//! let expensive = prices.select_where("amount", CompareOp::Gt, 100.0)?;
//! ```
//!
//! # Architecture
//!
//! - `tessera-core`: schemas, instances, paths, predicates, errors and the
//!   `StorageAdapter` trait
//! - `tessera-engine`: registry, codec, containers, projection resolver,
//!   column queries and configuration
//! - `tessera-storage`: in-memory and SQLite adapters

pub use tessera_core::*;
pub use tessera_engine::*;
pub use tessera_storage::*;
