//! Value container
//!
//! A [`Container`] pairs an immutable instance with its registered type and
//! its canonical encoding. It is the unit stored in a column and returned by
//! queries. Equality and hashing use the encoding, so two containers are
//! equal exactly when their values are equal field by field.

use crate::codec::Codec;
use crate::registry::RegisteredType;
use crate::value_object::ValueObject;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tessera_core::{
    DecodeReason, EncodedForm, Error, FieldKind, FieldPath, FieldValue, Instance, Primitive, Result,
};

/// Immutable, validated, encoded value object
#[derive(Clone)]
pub struct Container {
    ty: Arc<RegisteredType>,
    instance: Instance,
    encoded: EncodedForm,
}

impl Container {
    /// Wrap an instance of a registered type
    ///
    /// The stored instance is normalized: fields in schema order, integers
    /// widened for float fields.
    ///
    /// # Errors
    ///
    /// - `UnknownType` if the instance's type is not registered
    /// - `SchemaMismatch` if the field set differs from the schema, or the
    ///   type's constructor rejects the values
    /// - `EncodeError` if a value cannot be encoded (wrong kind, non-finite
    ///   float, size limit)
    pub fn new(codec: &Codec<'_>, instance: Instance) -> Result<Self> {
        let ty = Arc::clone(codec.registry().resolve(instance.type_id())?);
        Self::with_type(codec, ty, instance)
    }

    /// Wrap an instance against an already-resolved type
    pub fn with_type(codec: &Codec<'_>, ty: Arc<RegisteredType>, instance: Instance) -> Result<Self> {
        check_field_set(&ty, &instance, "")?;
        let encoded = codec.encode_as(&ty, &instance)?;
        let instance = codec
            .decode_as(&ty, encoded.as_str())
            .map_err(|e| match e {
                Error::DecodeError {
                    type_id,
                    reason: DecodeReason::Rejected(reason),
                } => Error::SchemaMismatch { type_id, reason },
                other => other,
            })?;
        Ok(Container {
            ty,
            instance,
            encoded,
        })
    }

    /// Rebuild a container from stored text
    ///
    /// The container holds the canonical form, which differs from `text`
    /// only if `text` was not produced by the codec.
    ///
    /// # Errors
    ///
    /// `UnknownType` or `DecodeError`.
    pub fn decode(codec: &Codec<'_>, text: &str, type_id: &str) -> Result<Self> {
        let ty = Arc::clone(codec.registry().resolve(type_id)?);
        let instance = codec.decode_as(&ty, text)?;
        let encoded = codec.encode_as(&ty, &instance)?;
        Ok(Container {
            ty,
            instance,
            encoded,
        })
    }

    /// Wrap a Rust value object
    pub fn from_value<T: ValueObject>(codec: &Codec<'_>, value: &T) -> Result<Self> {
        Self::new(codec, value.to_instance())
    }

    /// Rebuild the Rust value object
    ///
    /// # Errors
    ///
    /// `SchemaMismatch` if this container holds another type or `T`
    /// refuses the values.
    pub fn to_value<T: ValueObject>(&self) -> Result<T> {
        if self.type_id() != T::TYPE_ID {
            return Err(Error::schema_mismatch(
                T::TYPE_ID,
                format!("container holds '{}'", self.type_id()),
            ));
        }
        T::from_instance(&self.instance).map_err(|reason| Error::schema_mismatch(T::TYPE_ID, reason))
    }

    /// Type identifier
    pub fn type_id(&self) -> &str {
        self.ty.type_id()
    }

    /// Registered type of the value
    pub fn registered_type(&self) -> &Arc<RegisteredType> {
        &self.ty
    }

    /// The value, fields in schema order
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Canonical encoding
    pub fn encoded(&self) -> &EncodedForm {
        &self.encoded
    }

    /// Top-level field value
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.instance.get(field)
    }

    /// Primitive value at `path`
    ///
    /// # Errors
    ///
    /// `UnknownField` if the path does not exist, `UnsupportedProjection`
    /// if it names a nested value.
    pub fn project(&self, path: &FieldPath) -> Result<Primitive> {
        self.ty.resolve_path(path)?;
        let unknown = || Error::UnknownField {
            type_id: self.type_id().to_string(),
            path: path.to_string(),
        };

        let (last, parents) = path.segments().split_last().ok_or_else(unknown)?;
        let mut current = &self.instance;
        for segment in parents {
            current = current.nested(segment).ok_or_else(unknown)?;
        }
        current.primitive(last).cloned().ok_or_else(unknown)
    }

    /// Containers never change; assignment always fails
    ///
    /// # Errors
    ///
    /// Always `ImmutabilityViolation`. Use [`Container::with_field`] to
    /// derive a new value.
    pub fn set_field(&self, field: &str, _value: impl Into<FieldValue>) -> Result<()> {
        Err(Error::ImmutabilityViolation {
            type_id: self.type_id().to_string(),
            field: field.to_string(),
        })
    }

    /// New container with the field at `path` replaced
    ///
    /// `self` is left untouched.
    ///
    /// # Errors
    ///
    /// `UnknownField` if the path does not exist, otherwise whatever
    /// [`Container::new`] reports for the new value.
    pub fn with_field(&self, codec: &Codec<'_>, path: &FieldPath, value: impl Into<FieldValue>) -> Result<Self> {
        let instance = replace(&self.instance, path.segments(), value.into()).ok_or_else(|| {
            Error::UnknownField {
                type_id: self.type_id().to_string(),
                path: path.to_string(),
            }
        })?;
        Self::with_type(codec, Arc::clone(&self.ty), instance)
    }

    /// Unwrap the instance
    pub fn into_instance(self) -> Instance {
        self.instance
    }
}

/// Recursively compare field names with the schema
fn check_field_set(ty: &RegisteredType, instance: &Instance, prefix: &str) -> Result<()> {
    let mismatch = |reason: String| Error::schema_mismatch(ty.type_id(), reason);
    let qualify = |name: &str| {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", prefix, name)
        }
    };

    if instance.type_id() != ty.type_id() {
        return Err(mismatch(format!(
            "value at '{}' is '{}', expected '{}'",
            if prefix.is_empty() { "$" } else { prefix },
            instance.type_id(),
            ty.type_id()
        )));
    }

    let mut seen = Vec::with_capacity(instance.len());
    for name in instance.field_names() {
        if ty.schema().position(name).is_none() {
            return Err(mismatch(format!("unexpected field '{}'", qualify(name))));
        }
        if seen.contains(&name) {
            return Err(mismatch(format!("duplicate field '{}'", qualify(name))));
        }
        seen.push(name);
    }

    for (index, field) in ty.schema().fields().iter().enumerate() {
        let value = instance
            .get(&field.name)
            .ok_or_else(|| mismatch(format!("missing field '{}'", qualify(&field.name))))?;
        if let (FieldKind::Nested(_), FieldValue::Nested(inner), Some(nested)) =
            (&field.kind, value, ty.nested_type(index))
        {
            check_field_set(nested, inner, &qualify(&field.name))?;
        }
    }
    Ok(())
}

/// Copy of `instance` with the value at `segments` replaced
fn replace(instance: &Instance, segments: &[String], value: FieldValue) -> Option<Instance> {
    let (head, rest) = segments.split_first()?;
    instance.get(head)?;

    let mut value = Some(value);
    let mut fields = Vec::with_capacity(instance.len());
    for (name, current) in instance.fields() {
        let next = if name == head {
            let value = value.take()?;
            if rest.is_empty() {
                value
            } else {
                FieldValue::Nested(replace(current.as_nested()?, rest, value)?)
            }
        } else {
            current.clone()
        };
        fields.push((name.to_string(), next));
    }
    Some(Instance::new(instance.type_id(), fields))
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id() && self.encoded == other.encoded
    }
}

impl Eq for Container {}

impl Hash for Container {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id().hash(state);
        self.encoded.hash(state);
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("type_id", &self.type_id())
            .field("encoded", &self.encoded.as_str())
            .finish()
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.type_id(), self.encoded)
    }
}
