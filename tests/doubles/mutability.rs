//! Writes on mutable and immutable doubles.

use crate::common::*;
use entity_doubles::TARGET_ID_KEY;
use std::sync::Arc;

#[test]
fn immutable_double_rejects_every_write() {
    let node = create(article(false));
    let title = field(&node, "title");

    assert_eq!(
        title.call("setValue", &[Value::from("x")]).unwrap_err(),
        DoubleError::immutable("title")
    );
    assert_eq!(
        item(&title, 0).call("setValue", &[Value::from("x")]).unwrap_err(),
        DoubleError::immutable("title")
    );
    assert_eq!(
        node.set_property("tags", "x").unwrap_err(),
        DoubleError::immutable("tags")
    );
    assert!(matches!(
        title.set_property("value", "x"),
        Err(DoubleError::Immutable { .. })
    ));
    assert_eq!(first_value(&node, "title"), Value::from("Hello"));
}

#[test]
fn mutable_double_overlays_writes() {
    let node = create(article(true));
    let tags = field(&node, "tags");

    item(&tags, 1).call("setValue", &[Value::from("blue")]).unwrap();
    assert_eq!(item(&tags, 1).call("getValue", &[]).unwrap(), Value::from("blue"));
    assert_eq!(item(&tags, 0).call("getValue", &[]).unwrap(), Value::from("red"));
    assert_eq!(first_value(&node, "title"), Value::from("Hello"));
}

#[test]
fn writes_follow_call_order() {
    let node = create(article(true));
    let tags = field(&node, "tags");

    item(&tags, 0).call("setValue", &[Value::from("first")]).unwrap();
    tags.call("setValue", &[Value::Array(vec![Value::from("a"), Value::from("b")])]).unwrap();
    assert_eq!(item(&tags, 0).call("getValue", &[]).unwrap(), Value::from("a"));

    item(&tags, 0).call("setValue", &[Value::from("last")]).unwrap();
    assert_eq!(
        tags.call("getValue", &[]).unwrap(),
        Value::Array(vec![Value::from("last"), Value::from("b")])
    );
}

#[test]
fn same_definition_mutable_and_immutable() {
    let definition = Arc::new(article(false));
    let frozen = create(Arc::clone(&definition));
    let open = create(definition.with_mutable(true));

    assert!(field(&frozen, "title").call("setValue", &[Value::from("x")]).is_err());
    field(&open, "title").call("setValue", &[Value::from("x")]).unwrap();
    assert_eq!(first_value(&open, "title"), Value::from("x"));
    assert_eq!(first_value(&frozen, "title"), Value::from("Hello"));
}

#[test]
fn state_is_never_shared() {
    let definition = Arc::new(article(true));
    let a = create(Arc::clone(&definition));
    let b = create(definition);

    a.set_property("title", "Changed").unwrap();
    assert_eq!(first_value(&a, "title"), Value::from("Changed"));
    assert_eq!(first_value(&b, "title"), Value::from("Hello"));
}

#[test]
fn append_and_count() {
    let node = create(article(true));
    let tags = field(&node, "tags");
    let appended = as_double(tags.call("appendItem", &[Value::from("blue")]).unwrap());
    assert!(appended.ptr_eq(&item(&tags, 2)));
    assert_eq!(tags.call("count", &[]).unwrap(), Value::Int(3));
    assert_eq!(
        node.call("toArray", &[]).unwrap().as_map().unwrap()["tags"],
        Value::Array(vec![Value::from("red"), Value::from("green"), Value::from("blue")])
    );
}

#[test]
fn reference_write_is_normalized() {
    let node = create(article(true));
    let uid = field(&node, "uid");

    uid.call("setValue", &[Value::map([(TARGET_ID_KEY, Value::Int(9))])]).unwrap();
    assert_eq!(uid.property(TARGET_ID_KEY).unwrap(), Value::Int(9));
    assert!(matches!(
        uid.call("referencedEntities", &[]),
        Err(DoubleError::UnresolvedReference { .. })
    ));

    let user = EntityHandle::stub("user", 3);
    uid.set_property("entity", Value::Entity(user.clone())).unwrap();
    assert_eq!(
        uid.call("referencedEntities", &[]).unwrap(),
        Value::Array(vec![Value::Entity(user)])
    );
}
