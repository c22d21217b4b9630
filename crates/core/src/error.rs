//! Error types for Tessera
//!
//! Every failure the codec, the resolver or a storage adapter can report is a
//! distinct variant of [`Error`]. Callers branch on the variant (never on the
//! message) to decide between "malformed encoding", "schema mismatch" and
//! "field not found", and to drive the in-memory fallback.
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::path::PathParseError;
use crate::schema::FieldKind;
use crate::traits::RowHandle;
use thiserror::Error;

/// Result type alias for Tessera operations
pub type Result<T> = std::result::Result<T, Error>;

/// Why a decode was rejected
///
/// Carried by [`Error::DecodeError`] so that callers and tests can tell the
/// failure classes apart without parsing messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeReason {
    /// The text is not valid wire syntax
    #[error("malformed encoding: {0}")]
    Malformed(String),

    /// A field declared by the schema is absent
    #[error("missing field '{0}'")]
    MissingField(String),

    /// The text carries a field the schema does not declare
    #[error("unexpected field '{0}'")]
    UnexpectedField(String),

    /// The same field appears twice
    #[error("duplicate field '{0}'")]
    DuplicateField(String),

    /// A field value cannot be converted to its declared kind
    #[error("field '{field}' expected {expected}, found {found}")]
    KindMismatch {
        /// Field name
        field: String,
        /// Declared kind
        expected: FieldKind,
        /// What the wire text held
        found: &'static str,
    },

    /// The registered constructor refused the field values
    #[error("constructor rejected value: {0}")]
    Rejected(String),

    /// The encoded text exceeds the configured size limit
    #[error("encoding of {size} bytes exceeds maximum of {max}")]
    TooLarge {
        /// Input size in bytes
        size: usize,
        /// Maximum allowed size
        max: usize,
    },
}

/// Error taxonomy shared by every Tessera layer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Identifier already registered with a different schema
    #[error("type '{0}' is already registered with a different schema")]
    DuplicateType(String),

    /// Identifier is not registered
    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// Schema violates the registration rules
    #[error("invalid schema for '{type_id}': {reason}")]
    InvalidSchema {
        /// Type identifier being registered
        type_id: String,
        /// What is wrong with it
        reason: String,
    },

    /// The process-wide registry has already been installed
    #[error("the process-wide type registry is already installed")]
    RegistryInstalled,

    /// An instance could not be encoded
    #[error("cannot encode '{type_id}': {reason}")]
    EncodeError {
        /// Type identifier of the instance
        type_id: String,
        /// What is wrong with it
        reason: String,
    },

    /// An encoded string could not be decoded
    #[error("cannot decode '{type_id}': {reason}")]
    DecodeError {
        /// Type identifier the text was decoded as
        type_id: String,
        /// Failure class
        reason: DecodeReason,
    },

    /// An instance's field set does not match its schema
    #[error("instance does not match schema of '{type_id}': {reason}")]
    SchemaMismatch {
        /// Type identifier of the schema
        type_id: String,
        /// What does not match
        reason: String,
    },

    /// A field of an immutable value was written to
    #[error("value '{type_id}' is immutable; cannot assign field '{field}'")]
    ImmutabilityViolation {
        /// Type identifier of the value
        type_id: String,
        /// Field the caller tried to assign
        field: String,
    },

    /// The path does not exist in the schema
    #[error("type '{type_id}' has no field '{path}'")]
    UnknownField {
        /// Type identifier the path was resolved against
        type_id: String,
        /// The offending path
        path: String,
    },

    /// The path exists but cannot be projected or pushed down
    #[error("cannot project '{path}' of '{type_id}': {reason}")]
    UnsupportedProjection {
        /// Type identifier the path was resolved against
        type_id: String,
        /// The offending path
        path: String,
        /// Why the projection is unsupported
        reason: String,
    },

    /// A predicate literal cannot be compared with the field
    #[error("invalid literal for '{path}': {reason}")]
    InvalidLiteral {
        /// Field path the literal is compared with
        path: String,
        /// Why the literal is invalid
        reason: String,
    },

    /// A field path string could not be parsed
    #[error("invalid field path: {0}")]
    InvalidPath(#[from] PathParseError),

    /// The storage adapter failed
    #[error("storage error: {0}")]
    StorageError(String),

    /// The row handle is stale or unknown
    #[error("row {handle} not found in column '{column}'")]
    NotFound {
        /// Column the handle was looked up in
        column: String,
        /// The missing handle
        handle: RowHandle,
    },

    /// The storage adapter cannot evaluate this extraction expression
    #[error("pushdown unsupported: {0}")]
    PushdownUnsupported(String),

    /// Configuration could not be read or is invalid
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Error::StorageError(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create an encode error
    pub fn encode(type_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::EncodeError {
            type_id: type_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a decode error
    pub fn decode(type_id: impl Into<String>, reason: DecodeReason) -> Self {
        Error::DecodeError {
            type_id: type_id.into(),
            reason,
        }
    }

    /// Create a schema mismatch error
    pub fn schema_mismatch(type_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::SchemaMismatch {
            type_id: type_id.into(),
            reason: reason.into(),
        }
    }

    /// True if the caller should retry the filter with the in-memory fallback
    pub fn is_fallback_trigger(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedProjection { .. } | Error::PushdownUnsupported(_)
        )
    }

    /// True for decode failures of any reason
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Error::DecodeError { .. })
    }

    /// The decode reason, if this is a decode error
    pub fn decode_reason(&self) -> Option<&DecodeReason> {
        match self {
            Error::DecodeError { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// True for errors raised by the storage adapter
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Error::StorageError(_) | Error::NotFound { .. } | Error::PushdownUnsupported(_)
        )
    }
}
