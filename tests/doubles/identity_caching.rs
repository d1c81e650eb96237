//! Field lists and items keep their identity across accesses.

use crate::common::*;
use proptest::prelude::*;
use std::sync::Arc;

#[test]
fn same_field_returns_same_list() {
    let node = create(article(false));
    let a = node.call("get", &[Value::from("tags")]).unwrap();
    let b = node.call("get", &[Value::from("tags")]).unwrap();
    let c = node.property("tags").unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
    assert_ne!(a, node.property("title").unwrap());
}

#[test]
fn same_delta_returns_same_item() {
    let node = create(article(false));
    let tags = field(&node, "tags");
    assert!(item(&tags, 1).ptr_eq(&item(&tags, 1)));
    assert!(item(&tags, 0).ptr_eq(&as_double(tags.call("first", &[]).unwrap())));
    assert!(!item(&tags, 0).ptr_eq(&item(&tags, 1)));
}

#[test]
fn caches_are_per_double() {
    let definition = Arc::new(article(false));
    let a = create(Arc::clone(&definition));
    let b = create(definition);
    assert_ne!(a.property("title").unwrap(), b.property("title").unwrap());
}

#[test]
fn generator_runs_once_per_double() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let definition = Arc::new(
        factory()
            .definition("node")
            .fieldable()
            .field(
                "created",
                FieldDoubleDefinition::generator(move |ctx| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Value::from(ctx.field_name().unwrap_or_default())
                }),
            )
            .build()
            .unwrap(),
    );

    let a = create(Arc::clone(&definition));
    assert_eq!(first_value(&a, "created"), Value::from("created"));
    assert_eq!(first_value(&a, "created"), Value::from("created"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let b = create(definition);
    first_value(&b, "created");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

proptest! {
    #[test]
    fn prop_items_are_stable(values in prop::collection::vec("[a-z]{1,6}", 1..6), picks in prop::collection::vec(0usize..6, 1..10)) {
        let definition = factory()
            .definition("node")
            .fieldable()
            .field("tags", FieldDoubleDefinition::list(values.clone()))
            .build()
            .unwrap();
        let node = create(definition);
        let tags = field(&node, "tags");
        for pick in picks {
            let delta = pick % values.len();
            let once = item(&tags, delta as i64);
            let twice = item(&tags, delta as i64);
            prop_assert!(once.ptr_eq(&twice));
            prop_assert_eq!(once.property("value").unwrap(), Value::from(values[delta].as_str()));
        }
    }
}
