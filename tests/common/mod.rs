//! Shared test utilities for all integration test suites.
//!
//! Value-object fixtures plus registry and adapter builders.
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::Once;
pub use tessera::{
    required, CompareOp, Container, EncodedForm, Error, FieldKind, FieldPath, Instance, MemoryAdapter,
    Predicate, Primitive, RowHandle, StorageAdapter, Tessera, TesseraConfig, TypeRegistry,
    TypeSchema, ValueObject, ValueQuery,
};

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Route `tracing` output through the test harness (visible with --nocapture).
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Fixtures
// ============================================================================

/// Amount of money in a currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Money {
    pub amount: f64,
    pub currency: String,
}

impl Money {
    pub fn new(amount: f64, currency: &str) -> Self {
        Money {
            amount,
            currency: currency.to_string(),
        }
    }
}

impl ValueObject for Money {
    const TYPE_ID: &'static str = "Money";

    fn schema() -> TypeSchema {
        TypeSchema::new(Self::TYPE_ID)
            .field("amount", FieldKind::Float)
            .field("currency", FieldKind::Text)
    }

    fn to_instance(&self) -> Instance {
        Instance::new(
            Self::TYPE_ID,
            [
                ("amount", self.amount.into()),
                ("currency", self.currency.clone().into()),
            ],
        )
    }

    fn from_instance(instance: &Instance) -> Result<Self, String> {
        let currency = required(instance.text("currency"), "currency")?;
        if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(format!("'{}' is not an ISO currency code", currency));
        }
        Ok(Money {
            amount: required(instance.float("amount"), "amount")?,
            currency: currency.to_string(),
        })
    }
}

/// Geographic position.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl ValueObject for Coordinates {
    const TYPE_ID: &'static str = "Coordinates";

    fn schema() -> TypeSchema {
        TypeSchema::new(Self::TYPE_ID)
            .field("lat", FieldKind::Float)
            .field("lng", FieldKind::Float)
    }

    fn to_instance(&self) -> Instance {
        Instance::new(Self::TYPE_ID, [("lat", self.lat.into()), ("lng", self.lng.into())])
    }

    fn from_instance(instance: &Instance) -> Result<Self, String> {
        Ok(Coordinates {
            lat: required(instance.float("lat"), "lat")?,
            lng: required(instance.float("lng"), "lng")?,
        })
    }
}

/// A person's name.
#[derive(Debug, Clone, PartialEq)]
pub struct FullName {
    pub first: String,
    pub last: String,
}

impl FullName {
    pub fn new(first: &str, last: &str) -> Self {
        FullName {
            first: first.to_string(),
            last: last.to_string(),
        }
    }
}

impl ValueObject for FullName {
    const TYPE_ID: &'static str = "FullName";

    fn schema() -> TypeSchema {
        TypeSchema::new(Self::TYPE_ID)
            .field("first", FieldKind::Text)
            .field("last", FieldKind::Text)
    }

    fn to_instance(&self) -> Instance {
        Instance::new(
            Self::TYPE_ID,
            [("first", self.first.clone().into()), ("last", self.last.clone().into())],
        )
    }

    fn from_instance(instance: &Instance) -> Result<Self, String> {
        Ok(FullName {
            first: required(instance.text("first"), "first")?.to_string(),
            last: required(instance.text("last"), "last")?.to_string(),
        })
    }
}

/// A name with an age; nests `FullName`.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: FullName,
    pub age: i64,
}

impl ValueObject for Profile {
    const TYPE_ID: &'static str = "Profile";

    fn schema() -> TypeSchema {
        TypeSchema::new(Self::TYPE_ID)
            .field("name", FieldKind::nested(FullName::TYPE_ID))
            .field("age", FieldKind::Integer)
    }

    fn to_instance(&self) -> Instance {
        Instance::new(
            Self::TYPE_ID,
            [("name", self.name.to_instance().into()), ("age", self.age.into())],
        )
    }

    fn from_instance(instance: &Instance) -> Result<Self, String> {
        Ok(Profile {
            name: FullName::from_instance(required(instance.nested("name"), "name")?)?,
            age: required(instance.int("age"), "age")?,
        })
    }
}

/// A profile with a membership flag; `profile.name.first` has depth 3.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub profile: Profile,
    pub active: bool,
}

impl ValueObject for Member {
    const TYPE_ID: &'static str = "Member";

    fn schema() -> TypeSchema {
        TypeSchema::new(Self::TYPE_ID)
            .field("profile", FieldKind::nested(Profile::TYPE_ID))
            .field("active", FieldKind::Boolean)
    }

    fn to_instance(&self) -> Instance {
        Instance::new(
            Self::TYPE_ID,
            [
                ("profile", self.profile.to_instance().into()),
                ("active", self.active.into()),
            ],
        )
    }

    fn from_instance(instance: &Instance) -> Result<Self, String> {
        Ok(Member {
            profile: Profile::from_instance(required(instance.nested("profile"), "profile")?)?,
            active: required(instance.bool("active"), "active")?,
        })
    }
}

pub fn profile(first: &str, last: &str, age: i64) -> Profile {
    Profile {
        name: FullName::new(first, last),
        age,
    }
}

pub fn member(first: &str, last: &str, age: i64, active: bool) -> Member {
    Member {
        profile: profile(first, last, age),
        active,
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Registry holding every fixture type.
pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register_value::<Money>().unwrap();
    registry.register_value::<Coordinates>().unwrap();
    registry.register_value::<FullName>().unwrap();
    registry.register_value::<Profile>().unwrap();
    registry.register_value::<Member>().unwrap();
    registry
}

/// Insert every value into `query`, returning handles in insertion order.
pub fn insert_all<A: StorageAdapter, T: ValueObject>(query: &ValueQuery<'_, A>, values: &[T]) -> Vec<RowHandle> {
    values
        .iter()
        .map(|v| query.insert_value(v).unwrap())
        .collect()
}

/// Sorted copy of a handle list.
pub fn sorted(mut handles: Vec<RowHandle>) -> Vec<RowHandle> {
    handles.sort();
    handles
}

pub fn path(s: &str) -> FieldPath {
    s.parse().unwrap()
}
