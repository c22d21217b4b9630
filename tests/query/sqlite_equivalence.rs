//! SQLite's json_extract comparisons agree with in-process evaluation.

use crate::common::*;
use proptest::prelude::*;
use tessera::SqliteAdapter;

fn op() -> impl Strategy<Value = CompareOp> {
    prop::sample::select(CompareOp::ALL.to_vec())
}

fn finite_f64() -> impl Strategy<Value = f64> {
    prop_oneof![
        any::<f64>().prop_filter("finite", |f| f.is_finite()),
        -1.0e3..1.0e3f64,
        (-1_000i64..1_000).prop_map(|i| i as f64),
        Just(0.0),
        Just(-0.0),
        Just(f64::MAX),
        Just(f64::MIN_POSITIVE),
    ]
}

fn extreme_i64() -> impl Strategy<Value = i64> {
    prop_oneof![
        any::<i64>(),
        -3i64..3,
        Just(i64::MIN),
        Just(i64::MIN + 1),
        Just(i64::MAX),
        Just(i64::MAX - 1),
        Just(1i64 << 53),
        Just((1i64 << 53) + 1),
    ]
}

fn any_text() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::collection::vec(any::<char>(), 0..8).prop_map(|cs| cs.into_iter().collect()),
        "\\PC{0,6}",
        prop::sample::select(vec!["Ayşe", "Ayse", "ayşe", "Zeynep", ""]).prop_map(str::to_string),
    ]
}

/// Pushdown handles, then in-process handles, for one predicate
fn both_paths(query: &ValueQuery<'_, SqliteAdapter>, predicate: &Predicate) -> (Vec<RowHandle>, Vec<RowHandle>) {
    let pushed = query.select(predicate).unwrap();
    assert_eq!(pushed.strategy, tessera::Strategy::Pushdown, "{predicate}");
    let in_memory = sorted(
        query
            .select_in_memory(predicate)
            .unwrap()
            .into_iter()
            .map(|(h, _)| h)
            .collect(),
    );
    (pushed.handles(), in_memory)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn float_filters_agree(
        rows in prop::collection::vec((finite_f64(), finite_f64()), 0..12),
        op in op(),
        literal in prop_oneof![
            finite_f64().prop_map(Primitive::Float),
            (-(1i64 << 53)..=(1i64 << 53)).prop_map(Primitive::Int),
        ],
        pick in any::<prop::sample::Index>(),
    ) {
        let registry = registry();
        let adapter = SqliteAdapter::open_in_memory().unwrap();
        let query = ValueQuery::new(&adapter, &registry, "location", "Coordinates").unwrap();
        let values: Vec<Coordinates> = rows.iter().map(|&(lat, lng)| Coordinates { lat, lng }).collect();
        insert_all(&query, &values);

        let (pushed, in_memory) = both_paths(&query, &Predicate::new(path("lat"), op, literal));
        prop_assert_eq!(pushed, in_memory);

        // A literal equal to a stored value
        if !values.is_empty() {
            let stored = values[pick.index(values.len())].lng;
            let (pushed, in_memory) = both_paths(&query, &Predicate::new(path("lng"), op, stored));
            prop_assert_eq!(pushed, in_memory);
        }
    }

    #[test]
    fn integer_filters_agree(
        ages in prop::collection::vec(extreme_i64(), 0..12),
        op in op(),
        literal in extreme_i64(),
    ) {
        let registry = registry();
        let adapter = SqliteAdapter::open_in_memory().unwrap();
        let query = ValueQuery::new(&adapter, &registry, "profile", "Profile").unwrap();
        let values: Vec<Profile> = ages.iter().map(|&age| profile("Ayşe", "Yılmaz", age)).collect();
        insert_all(&query, &values);

        let (pushed, in_memory) = both_paths(&query, &Predicate::new(path("age"), op, literal));
        prop_assert_eq!(pushed, in_memory);
    }

    #[test]
    fn text_filters_agree(
        names in prop::collection::vec((any_text(), any_text()), 0..12),
        op in op(),
        literal in any_text(),
    ) {
        let registry = registry();
        let adapter = SqliteAdapter::open_in_memory().unwrap();

        let owners = ValueQuery::new(&adapter, &registry, "owner_name", "FullName").unwrap();
        let values: Vec<FullName> = names
            .iter()
            .map(|(first, last)| FullName { first: first.clone(), last: last.clone() })
            .collect();
        insert_all(&owners, &values);
        let (pushed, in_memory) = both_paths(&owners, &Predicate::new(path("first"), op, literal.clone()));
        prop_assert_eq!(pushed, in_memory);

        let profiles = ValueQuery::new(&adapter, &registry, "profile", "Profile").unwrap();
        let nested: Vec<Profile> = values
            .into_iter()
            .map(|name| Profile { name, age: 30 })
            .collect();
        insert_all(&profiles, &nested);
        let (pushed, in_memory) = both_paths(&profiles, &Predicate::new(path("name.last"), op, literal));
        prop_assert_eq!(pushed, in_memory);
    }

    #[test]
    fn boolean_filters_agree(
        flags in prop::collection::vec(any::<bool>(), 0..12),
        op in op(),
        literal in any::<bool>(),
    ) {
        let registry = registry();
        let adapter = SqliteAdapter::open_in_memory().unwrap();
        let query = ValueQuery::new(&adapter, &registry, "member", "Member").unwrap();
        let values: Vec<Member> = flags.iter().map(|&active| member("Ayşe", "Yılmaz", 34, active)).collect();
        insert_all(&query, &values);

        let (pushed, in_memory) = both_paths(&query, &Predicate::new(path("active"), op, literal));
        prop_assert_eq!(pushed, in_memory);
    }
}
