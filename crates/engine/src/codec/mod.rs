//! Canonical codec
//!
//! Converts instances to and from their encoded string form.
//!
//! # Wire format
//!
//! A strict subset of JSON:
//!
//! ```text
//! value   = "{" [ member *( "," member ) ] "}"
//! member  = string ":" field
//! field   = integer | float | string | "true" | "false" | value
//! ```
//!
//! Encoding is canonical: members appear in schema order, there is no
//! insignificant whitespace, floats use the shortest round-trip form and
//! always carry a `.` or an exponent, and `-0.0` is written as `0.0`. Equal
//! instances therefore always encode to identical strings, which is what
//! lets a storage engine compare fields of the raw text.
//!
//! Decoding is tolerant of member order and whitespace but strict about
//! content: missing, unknown or duplicate members, and kind mismatches, are
//! all errors. An integer literal is accepted for a float field when it is
//! exactly representable.

mod decode;
mod encode;

use crate::registry::{RegisteredType, TypeRegistry};
use tessera_core::{DecodeReason, EncodedForm, Error, Instance, Limits, Result};
use tracing::trace;

/// Encoder/decoder bound to a registry
#[derive(Debug, Clone)]
pub struct Codec<'r> {
    registry: &'r TypeRegistry,
    limits: Limits,
}

impl<'r> Codec<'r> {
    /// Codec with default limits
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self::with_limits(registry, Limits::default())
    }

    /// Codec with custom limits
    pub fn with_limits(registry: &'r TypeRegistry, limits: Limits) -> Self {
        Codec { registry, limits }
    }

    /// Registry this codec resolves types against
    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Limits enforced on encode and decode
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Encode an instance of a registered type
    ///
    /// # Errors
    ///
    /// - `UnknownType` if the instance's type is not registered
    /// - `EncodeError` if a field is missing, extra, of the wrong kind, a
    ///   non-finite float, or if a size limit is exceeded
    pub fn encode(&self, instance: &Instance) -> Result<EncodedForm> {
        let ty = self.registry.resolve(instance.type_id())?;
        self.encode_as(ty, instance)
    }

    /// Encode against an already-resolved type
    pub fn encode_as(&self, ty: &RegisteredType, instance: &Instance) -> Result<EncodedForm> {
        let mut out = String::with_capacity(16 * ty.schema().len().max(1));
        encode::write_value(ty, instance, &self.limits, &mut out)
            .map_err(|reason| Error::encode(ty.type_id(), reason))?;
        self.limits
            .validate_encoded(out.len())
            .map_err(|e| Error::encode(ty.type_id(), e.to_string()))?;
        trace!(target: "tessera::codec", type_id = ty.type_id(), bytes = out.len(), "Encoded value");
        Ok(EncodedForm::from_stored(out))
    }

    /// Decode `text` as an instance of `type_id`
    ///
    /// # Errors
    ///
    /// - `UnknownType` if `type_id` is not registered
    /// - `DecodeError` carrying the [`DecodeReason`] otherwise
    pub fn decode(&self, text: &str, type_id: &str) -> Result<Instance> {
        let ty = self.registry.resolve(type_id)?;
        self.decode_as(ty, text)
    }

    /// Decode against an already-resolved type
    pub fn decode_as(&self, ty: &RegisteredType, text: &str) -> Result<Instance> {
        if text.len() > self.limits.max_encoded_bytes {
            return Err(Error::decode(
                ty.type_id(),
                DecodeReason::TooLarge {
                    size: text.len(),
                    max: self.limits.max_encoded_bytes,
                },
            ));
        }
        decode::read_value(ty, text, &self.limits).map_err(|reason| Error::decode(ty.type_id(), reason))
    }

    /// Canonical form of arbitrary (valid) encoded text
    ///
    /// Decodes and re-encodes, so whitespace and member order are normalized.
    pub fn canonicalize(&self, text: &str, type_id: &str) -> Result<EncodedForm> {
        let ty = self.registry.resolve(type_id)?;
        let instance = self.decode_as(ty, text)?;
        self.encode_as(ty, &instance)
    }
}
