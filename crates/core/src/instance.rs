//! Value instances
//!
//! An [`Instance`] is the dynamic form of a value object: a type identifier
//! plus named field values. It exposes no way to change a field after
//! construction; "changing" a value means building a new instance.
//!
//! Instances built by application code may list fields in any order and may
//! even be invalid for their schema. Validation, canonical ordering and
//! integer-to-float widening happen when an instance is wrapped in a
//! container or decoded.

use crate::value::Primitive;
use serde::{Deserialize, Serialize};

/// Value of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Scalar value
    Primitive(Primitive),
    /// Nested value object
    Nested(Instance),
}

impl FieldValue {
    /// The scalar, if this is not a nested value
    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            FieldValue::Primitive(p) => Some(p),
            FieldValue::Nested(_) => None,
        }
    }

    /// The nested instance, if any
    pub fn as_nested(&self) -> Option<&Instance> {
        match self {
            FieldValue::Nested(i) => Some(i),
            FieldValue::Primitive(_) => None,
        }
    }

    /// Short description of the value's shape, for error messages
    pub fn describe(&self) -> String {
        match self {
            FieldValue::Primitive(p) => p.kind().name().to_string(),
            FieldValue::Nested(i) => format!("value '{}'", i.type_id()),
        }
    }
}

impl From<Primitive> for FieldValue {
    fn from(value: Primitive) -> Self {
        FieldValue::Primitive(value)
    }
}

macro_rules! field_value_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FieldValue {
                fn from(value: $t) -> Self {
                    FieldValue::Primitive(Primitive::from(value))
                }
            }
        )*
    };
}

field_value_from_scalar!(&str, String, bool, i64, i32, u32, f64);

impl From<Instance> for FieldValue {
    fn from(instance: Instance) -> Self {
        FieldValue::Nested(instance)
    }
}

/// Immutable aggregate of named field values
///
/// # Examples
///
/// ```
/// use tessera_core::{Instance, Primitive};
///
/// let price = Instance::new("Money", [("amount", 100.0.into()), ("currency", "USD".into())]);
///
/// assert_eq!(price.type_id(), "Money");
/// assert_eq!(price.float("amount"), Some(100.0));
/// assert_eq!(price.text("currency"), Some("USD"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    type_id: String,
    fields: Vec<(String, FieldValue)>,
}

impl Instance {
    /// Build an instance from field name/value pairs
    pub fn new<K, I>(type_id: impl Into<String>, fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FieldValue)>,
    {
        Instance {
            type_id: type_id.into(),
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Type identifier this instance claims to conform to
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Fields in the order they were supplied
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field names in the order they were supplied
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the instance carries no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field value (first occurrence)
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Look up a scalar field
    pub fn primitive(&self, name: &str) -> Option<&Primitive> {
        self.get(name).and_then(FieldValue::as_primitive)
    }

    /// Integer field
    pub fn int(&self, name: &str) -> Option<i64> {
        self.primitive(name).and_then(Primitive::as_int)
    }

    /// Float field; integer values are widened
    pub fn float(&self, name: &str) -> Option<f64> {
        match self.primitive(name)? {
            Primitive::Float(f) => Some(*f),
            Primitive::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text field
    pub fn text(&self, name: &str) -> Option<&str> {
        self.primitive(name).and_then(Primitive::as_str)
    }

    /// Boolean field
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.primitive(name).and_then(Primitive::as_bool)
    }

    /// Nested value field
    pub fn nested(&self, name: &str) -> Option<&Instance> {
        self.get(name).and_then(FieldValue::as_nested)
    }

    /// Consume the instance, yielding its fields
    pub fn into_fields(self) -> Vec<(String, FieldValue)> {
        self.fields
    }
}

/// Structural equality: same type, same field set, equal values
///
/// Field order is ignored; canonical order is a property of the encoding,
/// not of the instance.
impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|(k, v)| other.get(k) == Some(v))
    }
}
