//! Concrete encode/decode scenarios.

use crate::common::*;
use tessera::{Codec, DecodeReason};

#[test]
fn money_float_and_int_encode_identically() {
    let registry = registry();
    let codec = Codec::new(&registry);

    let from_float = Instance::new("Money", [("amount", 100.0.into()), ("currency", "USD".into())]);
    let from_int = Instance::new("Money", [("amount", 100i64.into()), ("currency", "USD".into())]);

    let a = codec.encode(&from_float).unwrap();
    let b = codec.encode(&from_int).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.as_str(), r#"{"amount":100.0,"currency":"USD"}"#);
}

#[test]
fn money_missing_currency_fails_to_decode() {
    let registry = registry();
    let codec = Codec::new(&registry);
    let err = codec.decode(r#"{"amount":100.0}"#, "Money").unwrap_err();
    assert!(err.is_decode_error());
    assert_eq!(
        err.decode_reason(),
        Some(&DecodeReason::MissingField("currency".to_string()))
    );
}

#[test]
fn coordinates_round_trip_and_projection() {
    let registry = registry();
    let codec = Codec::new(&registry);
    let istanbul = Coordinates {
        lat: 41.0151,
        lng: 28.9793,
    };
    let container = Container::from_value(&codec, &istanbul).unwrap();
    assert_eq!(container.encoded().as_str(), r#"{"lat":41.0151,"lng":28.9793}"#);
    assert_eq!(
        container.project(&path("lat")).unwrap(),
        Primitive::Float(41.0151)
    );
    assert_eq!(container.to_value::<Coordinates>().unwrap(), istanbul);
}

#[test]
fn non_ascii_text_round_trips() {
    let registry = registry();
    let codec = Codec::new(&registry);
    let name = FullName::new("Ayşe", "Yılmaz");
    let container = Container::from_value(&codec, &name).unwrap();
    assert_eq!(container.encoded().as_str(), r#"{"first":"Ayşe","last":"Yılmaz"}"#);

    let decoded = codec.decode(container.encoded().as_str(), "FullName").unwrap();
    assert_eq!(FullName::from_instance(&decoded).unwrap(), name);
}

#[test]
fn nested_profile_encoding() {
    let registry = registry();
    let codec = Codec::new(&registry);
    let container = Container::from_value(&codec, &profile("Ayşe", "Yılmaz", 34)).unwrap();
    assert_eq!(
        container.encoded().as_str(),
        r#"{"name":{"first":"Ayşe","last":"Yılmaz"},"age":34}"#
    );
    assert_eq!(
        container.project(&path("name.first")).unwrap(),
        Primitive::from("Ayşe")
    );
    assert!(matches!(
        container.project(&path("name")),
        Err(Error::UnsupportedProjection { .. })
    ));
}

#[test]
fn decode_is_order_and_whitespace_tolerant_but_encode_is_canonical() {
    let registry = registry();
    let codec = Codec::new(&registry);
    let loose = "{\n  \"age\": 34,\n  \"name\": { \"last\": \"Yılmaz\", \"first\": \"Ayşe\" }\n}";
    let container = Container::decode(&codec, loose, "Profile").unwrap();
    assert_eq!(
        container.encoded().as_str(),
        r#"{"name":{"first":"Ayşe","last":"Yılmaz"},"age":34}"#
    );
}

#[test]
fn tessera_context_uses_configured_limits() {
    let registry = registry();
    let config = TesseraConfig {
        limits: tessera::Limits::with_small_limits(),
        ..TesseraConfig::default()
    };
    let tessera = Tessera::new(&registry, config).unwrap();
    let err = tessera
        .wrap_value(&FullName::new("Bartholomew-Alexander", "Smith"))
        .unwrap_err();
    assert!(matches!(err, Error::EncodeError { .. }));
}
