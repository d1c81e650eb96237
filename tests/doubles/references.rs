//! Relational field values end to end.

use crate::common::*;
use entity_doubles::{contains_references, normalize, Identifier, ENTITY_KEY, TARGET_ID_KEY};

fn target(id: i64) -> Value {
    Value::map([(TARGET_ID_KEY, Value::Int(id))])
}

#[test]
fn multi_value_target_ids() {
    let definition = factory()
        .definition("node")
        .fieldable()
        .field("field_related", Value::Array(vec![target(1), target(2), target(3)]))
        .build()
        .unwrap();
    let node = create(definition);
    let related = field(&node, "field_related");

    assert_eq!(related.call("count", &[]).unwrap(), Value::Int(3));
    assert_eq!(item(&related, 1).property(TARGET_ID_KEY).unwrap(), Value::Int(2));
    assert_eq!(item(&related, 1).property(ENTITY_KEY).unwrap(), Value::Null);
    assert_eq!(
        related.call("referencedEntities", &[]).unwrap_err(),
        DoubleError::unresolved_reference("field_related")
    );
}

#[test]
fn referenced_entities_from_handles() {
    let a = EntityHandle::stub("taxonomy_term", 10);
    let b = EntityHandle::stub("taxonomy_term", 11);
    let definition = factory()
        .definition("node")
        .fieldable()
        .field(
            "field_tags",
            Value::Array(vec![
                Value::Entity(a.clone()),
                Value::map([(ENTITY_KEY, Value::Null)]),
                Value::map([(ENTITY_KEY, Value::Entity(b.clone())), (TARGET_ID_KEY, Value::from("11"))]),
            ]),
        )
        .build()
        .unwrap();
    let node = create(definition);
    let tags = field(&node, "field_tags");

    assert_eq!(tags.call("count", &[]).unwrap(), Value::Int(2));
    assert_eq!(
        tags.call("referencedEntities", &[]).unwrap(),
        Value::Array(vec![Value::Entity(a.clone()), Value::Entity(b)])
    );
    assert_eq!(tags.property(ENTITY_KEY).unwrap(), Value::Entity(a));
    assert_eq!(tags.property(TARGET_ID_KEY).unwrap(), Value::Int(10));
}

#[test]
fn mismatched_target_id_fails_field_access() {
    let definition = factory()
        .definition("node")
        .fieldable()
        .field(
            "uid",
            Value::map([
                (ENTITY_KEY, Value::Entity(EntityHandle::stub("user", 42))),
                (TARGET_ID_KEY, Value::Int(999)),
            ]),
        )
        .build()
        .unwrap();
    let node = create(definition);

    let err = node.call("get", &[Value::from("uid")]).unwrap_err();
    assert!(matches!(err, DoubleError::IdentifierMismatch { .. }));
    let message = err.to_string();
    assert!(message.contains("999"));
    assert!(message.contains("42"));
}

#[test]
fn empty_reference_is_detected_but_empty() {
    let empty = Value::map([(ENTITY_KEY, Value::Null)]);
    assert!(contains_references(&empty));
    assert!(normalize(&empty).unwrap().is_empty());

    let definition = factory()
        .definition("node")
        .fieldable()
        .field("uid", empty)
        .build()
        .unwrap();
    let node = create(definition);
    let uid = field(&node, "uid");
    assert_eq!(uid.call("isEmpty", &[]).unwrap(), Value::Bool(true));
    assert_eq!(uid.call("referencedEntities", &[]).unwrap(), Value::Array(vec![]));
}

#[test]
fn entity_double_as_reference_target() {
    let factory = factory();
    let author = factory
        .create(factory.definition("user").id(5).label("Ada").build().unwrap())
        .unwrap();
    let handle = author.handle().expect("entity doubles have handles");
    assert_eq!(handle.id(), Some(Identifier::Int(5)));
    assert_eq!(handle.label().as_deref(), Some("Ada"));

    let node = factory
        .create(
            factory
                .definition("node")
                .fieldable()
                .field("uid", handle.clone())
                .build()
                .unwrap(),
        )
        .unwrap();
    let uid = field(&node, "uid");
    assert_eq!(uid.property(TARGET_ID_KEY).unwrap(), Value::Int(5));
    let owner = uid.property(ENTITY_KEY).unwrap();
    let owner = owner.as_entity().unwrap();
    assert!(owner.ptr_eq(&handle));
    assert_eq!(owner.entity_type(), "user");
}

#[test]
fn unsaved_reference_has_null_target_id() {
    let definition = factory()
        .definition("node")
        .fieldable()
        .field("uid", EntityHandle::unsaved("user"))
        .build()
        .unwrap();
    let node = create(definition);
    let uid = field(&node, "uid");
    assert_eq!(uid.property(TARGET_ID_KEY).unwrap(), Value::Null);
    assert_eq!(uid.call("referencedEntities", &[]).unwrap().as_array().map(<[Value]>::len), Some(1));
}

#[test]
fn non_reference_value_on_reference_field() {
    let definition = factory()
        .definition("node")
        .fieldable()
        .field("uid", FieldDoubleDefinition::value("not a reference").references())
        .build()
        .unwrap();
    let node = create(definition);
    assert!(matches!(
        node.call("get", &[Value::from("uid")]),
        Err(DoubleError::InvalidReference { .. })
    ));
}
