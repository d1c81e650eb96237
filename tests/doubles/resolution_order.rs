//! The five-stage resolution order of a double.

use crate::common::*;
use entity_doubles::{ResolutionStage, ValueKind};

#[test]
fn override_beats_guardrail() {
    let definition = factory()
        .definition("node")
        .method("save", |_| Ok(Value::Int(1)))
        .method("delete", |_| Ok(Value::Null))
        .build()
        .unwrap();
    let node = create(definition);

    assert_eq!(node.resolve("save"), ResolutionStage::Override);
    assert_eq!(node.call("save", &[]).unwrap(), Value::Int(1));
    assert_eq!(node.call("delete", &[]).unwrap(), Value::Null);
}

#[test]
fn override_receives_arguments_only() {
    let definition = factory()
        .definition("node")
        .method("access", |args| Ok(Value::Bool(args.first() == Some(&Value::from("view")))))
        .build()
        .unwrap();
    let node = create(definition);
    assert_eq!(node.call("access", &[Value::from("view")]).unwrap(), Value::Bool(true));
    assert_eq!(node.call("access", &[Value::from("edit")]).unwrap(), Value::Bool(false));
}

#[test]
fn override_beats_core_resolver() {
    let definition = factory()
        .definition("node")
        .label("Real")
        .method("label", |_| Ok(Value::from("Overridden")))
        .build()
        .unwrap();
    let node = create(definition);
    assert_eq!(node.call("label", &[]).unwrap(), Value::from("Overridden"));
}

#[test]
fn guardrails_fail_with_reason() {
    let node = create(article(false));
    for method in ["save", "delete", "createDuplicate", "access", "toUrl", "toLink", "getTranslation", "validate"] {
        match node.call(method, &[]) {
            Err(DoubleError::Unsupported { method: name, reason }) => {
                assert_eq!(name, method);
                assert!(!reason.is_empty());
            }
            other => panic!("{} should be guarded, got {:?}", method, other),
        }
    }
}

#[test]
fn lenient_double_returns_neutral_defaults() {
    let definition = factory()
        .definition("node")
        .interface(Capability::PUBLISHED)
        .lenient(true)
        .build()
        .unwrap();
    let node = create(definition);

    assert_eq!(node.resolve("isPublished"), ResolutionStage::Lenient(ValueKind::Bool));
    assert_eq!(node.call("isPublished", &[]).unwrap(), Value::Bool(false));
    assert_eq!(node.call("somethingElse", &[]).unwrap(), Value::Null);
}

#[test]
fn lenient_double_still_guards() {
    let definition = factory().definition("node").lenient(true).build().unwrap();
    let node = create(definition);
    assert!(matches!(node.call("save", &[]), Err(DoubleError::Unsupported { .. })));
}

#[test]
fn lenient_double_keeps_field_errors() {
    let frozen = factory()
        .definition("node")
        .fieldable()
        .field("title", "a")
        .lenient(true)
        .build()
        .unwrap();
    let frozen = create(frozen);
    assert_eq!(
        frozen.set_property("title", "b").unwrap_err(),
        DoubleError::immutable("title")
    );

    let mismatched = factory()
        .definition("node")
        .fieldable()
        .field(
            "uid",
            Value::map([
                ("entity", Value::Entity(EntityHandle::stub("user", 42))),
                ("target_id", Value::Int(999)),
            ]),
        )
        .lenient(true)
        .mutable(true)
        .build()
        .unwrap();
    let mismatched = create(mismatched);
    assert!(matches!(
        mismatched.call("get", &[Value::from("uid")]),
        Err(DoubleError::IdentifierMismatch { .. })
    ));
}

#[test]
fn missing_resolver_names_capability() {
    let definition = factory()
        .definition("node")
        .interface(Capability::OWNER)
        .build()
        .unwrap();
    let node = create(definition);

    assert_eq!(
        node.call("getOwner", &[]).unwrap_err(),
        DoubleError::missing_resolver("getOwner", "owner")
    );
    assert_eq!(
        node.call("frobnicate", &[]).unwrap_err(),
        DoubleError::missing_resolver("frobnicate", "unknown")
    );
}

#[test]
fn primary_interface_is_named_first() {
    // `isEmpty` is declared by both field_item and field_list.
    let plain = factory()
        .definition("node")
        .interface(Capability::FIELD_ITEM)
        .interface(Capability::FIELD_LIST)
        .build()
        .unwrap();
    let with_primary = factory()
        .definition("node")
        .interface(Capability::FIELD_ITEM)
        .interface(Capability::FIELD_LIST)
        .primary_interface(Capability::FIELD_LIST)
        .build()
        .unwrap();

    assert_eq!(
        create(plain).resolve("isEmpty"),
        ResolutionStage::Missing("field_item".to_string())
    );
    assert_eq!(
        create(with_primary).resolve("isEmpty"),
        ResolutionStage::Missing("field_list".to_string())
    );
}

#[test]
fn property_access_uses_same_resolver() {
    let node = create(article(false));
    let by_method = node.call("get", &[Value::from("title")]).unwrap();
    let by_property = node.property("title").unwrap();
    assert_eq!(by_method, by_property);
}
