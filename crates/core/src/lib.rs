//! Core types and traits for Tessera
//!
//! This crate defines the foundational types shared by the codec, the
//! projection resolver and the storage adapters:
//! - Primitive: the four scalar kinds a value-object field can hold
//! - TypeSchema / FieldKind: declared, ordered field layout of a value type
//! - Instance: an immutable aggregate of named field values
//! - FieldPath: dotted path into a (possibly nested) value object
//! - CompareOp / Predicate / ExtractionExpression: filters and their pushdown form
//! - Limits: size limits enforced by the codec
//! - Error: the error taxonomy shared by every layer
//! - Traits: the StorageAdapter boundary (store / fetch / evaluate)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod instance;
pub mod limits;
pub mod path;
pub mod predicate;
pub mod schema;
pub mod traits;
pub mod value;

pub use error::{DecodeReason, Error, Result};
pub use instance::{FieldValue, Instance};
pub use limits::{LimitError, Limits};
pub use path::{FieldPath, PathParseError};
pub use predicate::{CompareOp, ExtractionExpression, Predicate};
pub use schema::{validate_identifier, FieldDef, FieldKind, TypeSchema};
pub use traits::{EncodedForm, RowHandle, StorageAdapter};
pub use value::{Primitive, PrimitiveKind};
