//! Rust value types as value objects
//!
//! Implement [`ValueObject`] for a plain Rust struct to register it with
//! [`TypeRegistry::register_value`](crate::TypeRegistry::register_value) and
//! move between it and a [`Container`](crate::Container).
//!
//! ```ignore
//! #[derive(Debug, Clone, PartialEq)]
//! struct Money { amount: f64, currency: String }
//!
//! impl ValueObject for Money {
//!     const TYPE_ID: &'static str = "Money";
//!
//!     fn schema() -> TypeSchema {
//!         TypeSchema::new(Self::TYPE_ID)
//!             .field("amount", FieldKind::Float)
//!             .field("currency", FieldKind::Text)
//!     }
//!
//!     fn to_instance(&self) -> Instance {
//!         Instance::new(Self::TYPE_ID, [
//!             ("amount", self.amount.into()),
//!             ("currency", self.currency.clone().into()),
//!         ])
//!     }
//!
//!     fn from_instance(instance: &Instance) -> Result<Self, String> {
//!         Ok(Money {
//!             amount: required(instance.float("amount"), "amount")?,
//!             currency: required(instance.text("currency"), "currency")?.to_string(),
//!         })
//!     }
//! }
//! ```

use tessera_core::{Instance, TypeSchema};

/// An immutable Rust type with a registered schema
pub trait ValueObject: Sized {
    /// Stable type identifier
    const TYPE_ID: &'static str;

    /// Declared schema; its identifier must equal [`Self::TYPE_ID`]
    fn schema() -> TypeSchema;

    /// Dynamic form of this value
    fn to_instance(&self) -> Instance;

    /// Rebuild from a schema-valid instance
    ///
    /// This is the constructor hook: returning `Err` rejects the value
    /// (for example a currency code of the wrong length).
    fn from_instance(instance: &Instance) -> Result<Self, String>;
}

/// Turn a missing accessor result into a constructor error
pub fn required<T>(value: Option<T>, field: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("missing or mistyped field '{}'", field))
}
