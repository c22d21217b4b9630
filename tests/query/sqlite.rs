//! The same queries against SQLite's json_extract.

use crate::common::*;
use tempfile::TempDir;
use tessera::{SqliteAdapter, Strategy};

#[test]
fn money_pushdown() {
    init_tracing();
    let registry = registry();
    let adapter = SqliteAdapter::open_in_memory().unwrap();
    let prices = ValueQuery::new(&adapter, &registry, "price", "Money").unwrap();
    let handles = insert_all(
        &prices,
        &[
            Money::new(50.0, "USD"),
            Money::new(150.0, "USD"),
            Money::new(999.0, "USD"),
        ],
    );

    let selection = prices.select_where("amount", CompareOp::Gt, 100i64).unwrap();
    assert_eq!(selection.strategy, Strategy::Pushdown);
    assert_eq!(selection.handles(), vec![handles[1], handles[2]]);
}

#[test]
fn coordinates_equality() {
    let registry = registry();
    let adapter = SqliteAdapter::open_in_memory().unwrap();
    let places = ValueQuery::new(&adapter, &registry, "location", "Coordinates").unwrap();
    let handles = insert_all(
        &places,
        &[
            Coordinates { lat: 41.0151, lng: 28.9793 },
            Coordinates { lat: 39.9334, lng: 32.8597 },
        ],
    );
    let selection = places.select_where("lat", CompareOp::Eq, 41.0151).unwrap();
    assert_eq!(selection.handles(), vec![handles[0]]);
}

#[test]
fn owner_name_and_nested_profile() {
    let registry = registry();
    let adapter = SqliteAdapter::open_in_memory().unwrap();

    let owners = ValueQuery::new(&adapter, &registry, "owner_name", "FullName").unwrap();
    let owner_handles = insert_all(
        &owners,
        &[FullName::new("Ayşe", "Yılmaz"), FullName::new("Mehmet", "Kaya")],
    );
    let selection = owners.select_where("first", CompareOp::Eq, "Ayşe").unwrap();
    assert_eq!(selection.handles(), vec![owner_handles[0]]);

    let profiles = ValueQuery::new(&adapter, &registry, "profile", "Profile").unwrap();
    let profile_handles = insert_all(
        &profiles,
        &[profile("Ayşe", "Yılmaz", 34), profile("Mehmet", "Kaya", 41)],
    );
    let selection = profiles.select_where("name.last", CompareOp::Eq, "Kaya").unwrap();
    assert_eq!(selection.handles(), vec![profile_handles[1]]);
}

#[test]
fn boolean_field_and_fallback() {
    let registry = registry();
    let adapter = SqliteAdapter::open_in_memory().unwrap();
    let query = ValueQuery::new(&adapter, &registry, "member", "Member").unwrap();
    let handles = insert_all(
        &query,
        &[member("Ayşe", "Yılmaz", 34, true), member("Mehmet", "Kaya", 41, false)],
    );

    let inactive = query.select_where("active", CompareOp::Eq, false).unwrap();
    assert_eq!(inactive.strategy, Strategy::Pushdown);
    assert_eq!(inactive.handles(), vec![handles[1]]);

    let deep = query
        .select_where("profile.name.first", CompareOp::Eq, "Ayşe")
        .unwrap();
    assert_eq!(deep.strategy, Strategy::Fallback);
    assert_eq!(deep.handles(), vec![handles[0]]);
}

#[test]
fn matches_memory_adapter() {
    let registry = registry();
    let sqlite = SqliteAdapter::open_in_memory().unwrap();
    let memory = MemoryAdapter::new();
    let rows = [
        Money::new(-5.0, "EUR"),
        Money::new(0.0, "USD"),
        Money::new(100.0, "TRY"),
        Money::new(100.5, "USD"),
        Money::new(1e6, "EUR"),
    ];

    let on_sqlite = ValueQuery::new(&sqlite, &registry, "price", "Money").unwrap();
    let on_memory = ValueQuery::new(&memory, &registry, "price", "Money").unwrap();
    insert_all(&on_sqlite, &rows);
    insert_all(&on_memory, &rows);

    for op in CompareOp::ALL {
        for literal in [Primitive::Int(100), Primitive::Float(0.0), Primitive::Float(100.25)] {
            let predicate = Predicate::new(path("amount"), op, literal);
            let a: Vec<Money> = on_sqlite
                .select(&predicate)
                .unwrap()
                .values()
                .map(|c| c.to_value().unwrap())
                .collect();
            let b: Vec<Money> = on_memory
                .select(&predicate)
                .unwrap()
                .values()
                .map(|c| c.to_value().unwrap())
                .collect();
            assert_eq!(a, b, "{predicate}");
        }
    }
}

#[test]
fn values_survive_reopen() {
    let registry = registry();
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("values.db");

    let handle = {
        let adapter = SqliteAdapter::open(&db).unwrap();
        let prices = ValueQuery::new(&adapter, &registry, "price", "Money").unwrap();
        prices.insert_value(&Money::new(150.0, "USD")).unwrap()
    };

    let adapter = SqliteAdapter::open(&db).unwrap();
    let prices = ValueQuery::new(&adapter, &registry, "price", "Money").unwrap();
    assert_eq!(
        prices.get(handle).unwrap().to_value::<Money>().unwrap(),
        Money::new(150.0, "USD")
    );
}
