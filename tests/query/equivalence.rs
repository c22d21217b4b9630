//! Pushdown and in-process evaluation select identical rows.

use crate::common::*;
use proptest::prelude::*;
use tessera::ProjectionResolver;

fn op() -> impl Strategy<Value = CompareOp> {
    prop::sample::select(CompareOp::ALL.to_vec())
}

fn currency() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["EUR", "TRY", "USD"]).prop_map(str::to_string)
}

fn money() -> impl Strategy<Value = Money> {
    (
        prop_oneof![(-500i64..500).prop_map(|i| i as f64), -500.0..500.0f64],
        currency(),
    )
        .prop_map(|(amount, currency)| Money { amount, currency })
}

fn first_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Ayşe", "Ayse", "Mehmet", "Zeynep", ""]).prop_map(str::to_string)
}

fn profiles() -> impl Strategy<Value = Vec<Profile>> {
    prop::collection::vec(
        (first_name(), first_name(), 0i64..100).prop_map(|(first, last, age)| Profile {
            name: FullName { first, last },
            age,
        }),
        0..12,
    )
}

fn same_rows<A: StorageAdapter>(query: &ValueQuery<'_, A>, predicate: &Predicate) -> (Vec<RowHandle>, Vec<RowHandle>) {
    let pushed = query.select(predicate).unwrap().handles();
    let in_memory = sorted(
        query
            .select_in_memory(predicate)
            .unwrap()
            .into_iter()
            .map(|(h, _)| h)
            .collect(),
    );
    (pushed, in_memory)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn amount_filters_agree(
        rows in prop::collection::vec(money(), 0..16),
        op in op(),
        literal in prop_oneof![(-500i64..500).prop_map(Primitive::Int), (-500.0..500.0f64).prop_map(Primitive::Float)],
    ) {
        let registry = registry();
        let adapter = MemoryAdapter::new();
        let query = ValueQuery::new(&adapter, &registry, "price", "Money").unwrap();
        insert_all(&query, &rows);

        let predicate = Predicate::new(path("amount"), op, literal);
        let (pushed, in_memory) = same_rows(&query, &predicate);
        prop_assert_eq!(pushed, in_memory);
    }

    #[test]
    fn currency_filters_agree(
        rows in prop::collection::vec(money(), 0..16),
        op in op(),
        literal in currency(),
    ) {
        let registry = registry();
        let adapter = MemoryAdapter::new();
        let query = ValueQuery::new(&adapter, &registry, "price", "Money").unwrap();
        insert_all(&query, &rows);

        let predicate = Predicate::new(path("currency"), op, literal);
        let (pushed, in_memory) = same_rows(&query, &predicate);
        prop_assert_eq!(pushed, in_memory);
    }

    #[test]
    fn nested_filters_agree(rows in profiles(), op in op(), literal in first_name()) {
        let registry = registry();
        let adapter = MemoryAdapter::new();
        let query = ValueQuery::new(&adapter, &registry, "profile", "Profile").unwrap();
        insert_all(&query, &rows);

        let predicate = Predicate::new(path("name.first"), op, literal);
        let (pushed, in_memory) = same_rows(&query, &predicate);
        prop_assert_eq!(pushed, in_memory);
    }

    #[test]
    fn compiled_expression_agrees_with_matches(rows in profiles(), op in op(), age in 0i64..100) {
        let registry = registry();
        let adapter = MemoryAdapter::new();
        let query = ValueQuery::new(&adapter, &registry, "profile", "Profile").unwrap();
        insert_all(&query, &rows);

        let resolver = ProjectionResolver::new(&registry);
        let predicate = Predicate::new(path("age"), op, age);
        let expr = resolver.compile("Profile", &predicate).unwrap();
        for (_, container) in query.scan().unwrap() {
            prop_assert_eq!(
                resolver.matches(&container, &predicate).unwrap(),
                resolver.evaluate(&container, &expr).unwrap()
            );
        }
    }
}
