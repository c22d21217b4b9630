//! Declared field layout of value types
//!
//! A [`TypeSchema`] is the explicit, ordered list of fields a value type
//! carries. Field order is the canonical encoding order, so it is part of the
//! schema's identity: two schemas with the same fields in a different order
//! are different schemas.
//!
//! ## Identifier rules
//!
//! Type identifiers and field names are non-empty, ASCII alphanumeric or `_`,
//! and do not start with a digit. This keeps every field addressable by the
//! `$.a.b` extraction path grammar without quoting.

use crate::value::PrimitiveKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Kind of a single field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// 64-bit signed integer
    Integer,
    /// Finite 64-bit float
    Float,
    /// UTF-8 text
    Text,
    /// Boolean
    Boolean,
    /// Another registered value type, by identifier
    Nested(String),
}

impl FieldKind {
    /// Kind of a field holding another registered value type
    pub fn nested(type_id: impl Into<String>) -> Self {
        FieldKind::Nested(type_id.into())
    }

    /// The primitive kind, or `None` for nested value types
    pub fn primitive(&self) -> Option<PrimitiveKind> {
        match self {
            FieldKind::Integer => Some(PrimitiveKind::Integer),
            FieldKind::Float => Some(PrimitiveKind::Float),
            FieldKind::Text => Some(PrimitiveKind::Text),
            FieldKind::Boolean => Some(PrimitiveKind::Boolean),
            FieldKind::Nested(_) => None,
        }
    }

    /// The referenced type identifier, for nested fields
    pub fn nested_type(&self) -> Option<&str> {
        match self {
            FieldKind::Nested(id) => Some(id),
            _ => None,
        }
    }
}

impl From<PrimitiveKind> for FieldKind {
    fn from(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Integer => FieldKind::Integer,
            PrimitiveKind::Float => FieldKind::Float,
            PrimitiveKind::Text => FieldKind::Text,
            PrimitiveKind::Boolean => FieldKind::Boolean,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Nested(id) => write!(f, "value '{}'", id),
            other => match other.primitive() {
                Some(kind) => f.write_str(kind.name()),
                None => Ok(()),
            },
        }
    }
}

/// One declared field: name and kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name, unique within its schema
    pub name: String,
    /// Declared kind
    pub kind: FieldKind,
}

impl FieldDef {
    /// Create a field definition
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldDef {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered field schema of a value type
///
/// # Examples
///
/// ```
/// use tessera_core::{FieldKind, TypeSchema};
///
/// let money = TypeSchema::new("Money")
///     .field("amount", FieldKind::Float)
///     .field("currency", FieldKind::Text);
///
/// assert_eq!(money.len(), 2);
/// assert_eq!(money.position("currency"), Some(1));
/// assert!(money.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeSchema {
    type_id: String,
    fields: Vec<FieldDef>,
}

impl TypeSchema {
    /// Start an empty schema for `type_id`
    pub fn new(type_id: impl Into<String>) -> Self {
        TypeSchema {
            type_id: type_id.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field (builder pattern)
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDef::new(name, kind));
        self
    }

    /// Type identifier
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Fields in canonical order
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the schema declares no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Canonical position of a field
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Identifiers of the nested types this schema references
    pub fn nested_types(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(|f| f.kind.nested_type())
    }

    /// Check the registration rules
    ///
    /// Returns a human-readable reason on failure. Whether nested types are
    /// registered is the registry's concern, not checked here.
    pub fn validate(&self) -> Result<(), String> {
        validate_identifier(&self.type_id).map_err(|e| format!("type identifier: {}", e))?;
        if self.fields.is_empty() {
            return Err("schema declares no fields".to_string());
        }
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            validate_identifier(&field.name)
                .map_err(|e| format!("field name '{}': {}", field.name, e))?;
            if !seen.insert(field.name.as_str()) {
                return Err(format!("duplicate field '{}'", field.name));
            }
            if let FieldKind::Nested(id) = &field.kind {
                validate_identifier(id)
                    .map_err(|e| format!("nested type of '{}': {}", field.name, e))?;
                if id == &self.type_id {
                    return Err(format!("field '{}' nests its own type", field.name));
                }
            }
        }
        Ok(())
    }
}

/// Check a type identifier or field name
pub fn validate_identifier(ident: &str) -> Result<(), String> {
    let mut chars = ident.chars();
    match chars.next() {
        None => return Err("empty identifier".to_string()),
        Some(c) if c.is_ascii_digit() => {
            return Err(format!("'{}' starts with a digit", ident));
        }
        _ => {}
    }
    if let Some(bad) = ident
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        return Err(format!("'{}' contains invalid character {:?}", ident, bad));
    }
    Ok(())
}
