//! Value-object persistence engine for Tessera
//!
//! This crate builds on the core types:
//! - TypeRegistry: type identifier to schema and constructor, optionally
//!   installed once as the process-wide registry
//! - Codec: canonical encode, strict decode
//! - Container: immutable, validated, encoded value with equality by value
//! - ProjectionResolver: field projection and predicate compilation for pushdown
//! - ValueQuery: column queries with pushdown and in-memory fallback
//! - TesseraConfig: settings loaded from `tessera.toml`
//!
//! Storage engines plug in through `tessera_core::StorageAdapter`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod config;
pub mod container;
pub mod context;
pub mod projection;
pub mod query;
pub mod registry;
pub mod value_object;

pub use codec::Codec;
pub use config::{FallbackPolicy, TesseraConfig, CONFIG_FILE_NAME};
pub use container::Container;
pub use context::Tessera;
pub use projection::{FieldAccessor, ProjectionResolver, DEFAULT_MAX_PUSHDOWN_DEPTH};
pub use query::{Selection, Strategy, ValueQuery};
pub use registry::{global_registry, install_global, Constructor, RegisteredType, TypeRegistry};
pub use value_object::{required, ValueObject};
