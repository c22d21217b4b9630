//! Registration rules on an explicitly passed registry.

use crate::common::*;
use std::sync::Arc;
use std::thread;

#[test]
fn fixture_registry_is_complete() {
    let registry = registry();
    assert_eq!(
        registry.type_ids(),
        vec!["Coordinates", "FullName", "Member", "Money", "Profile"]
    );
}

#[test]
fn nested_types_must_be_registered_first() {
    let mut registry = TypeRegistry::new();
    assert_eq!(
        registry.register_value::<Profile>().unwrap_err(),
        Error::UnknownType("FullName".to_string())
    );
    registry.register_value::<FullName>().unwrap();
    registry.register_value::<Profile>().unwrap();
}

#[test]
fn identical_reregistration_is_idempotent() {
    let mut registry = registry();
    registry.register_value::<Money>().unwrap();
    assert_eq!(registry.len(), 5);
}

#[test]
fn conflicting_schema_is_rejected() {
    let mut registry = registry();
    let err = registry
        .register_schema(TypeSchema::new("Money").field("cents", FieldKind::Integer))
        .unwrap_err();
    assert_eq!(err, Error::DuplicateType("Money".to_string()));
}

#[test]
fn invalid_schemas_are_rejected() {
    let mut registry = TypeRegistry::new();
    for schema in [
        TypeSchema::new("1Money").field("amount", FieldKind::Float),
        TypeSchema::new("Money")
            .field("amount", FieldKind::Float)
            .field("amount", FieldKind::Text),
        TypeSchema::new("Money").field("amount value", FieldKind::Float),
        TypeSchema::new("Loop").field("next", FieldKind::nested("Loop")),
    ] {
        assert!(
            matches!(registry.register_schema(schema.clone()), Err(Error::InvalidSchema { .. })),
            "{schema:?}"
        );
    }
    assert!(registry.is_empty());
}

#[test]
fn shared_registry_reads_from_many_threads() {
    let registry = Arc::new(registry());
    let workers: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let tessera = Tessera::new(&registry, TesseraConfig::default()).unwrap();
                let value = tessera.wrap_value(&profile("Ayşe", "Yılmaz", i)).unwrap();
                let back = tessera.decode(value.encoded().as_str(), "Profile").unwrap();
                assert_eq!(&back, value.instance());
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }
}
