//! Resolver context and definition derivation.

use crate::common::*;
use entity_doubles::DEFINITION_CONTEXT_KEY;
use std::sync::Arc;

#[test]
fn reserved_key_rejected_at_build() {
    let result = factory()
        .definition("node")
        .context(DEFINITION_CONTEXT_KEY, "anything")
        .build();
    assert!(matches!(result, Err(DoubleError::Configuration { .. })));
}

#[test]
fn reserved_key_rejected_when_merging() {
    let definition = Arc::new(article(false));
    let result = definition.with_context([(DEFINITION_CONTEXT_KEY.to_string(), Value::Null)]);
    assert!(matches!(result, Err(DoubleError::Configuration { .. })));
}

#[test]
fn fields_require_fieldable() {
    let result = factory().definition("node").field("title", "x").build();
    match result {
        Err(DoubleError::Configuration { reason }) => assert!(reason.contains("fieldable")),
        other => panic!("Expected a configuration error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn generators_see_context_and_definition() {
    let definition = factory()
        .definition("node")
        .bundle("page")
        .fieldable()
        .context("langcode", "fr")
        .field(
            "summary",
            FieldDoubleDefinition::generator(|ctx| {
                let lang = ctx.get("langcode").cloned().unwrap_or(Value::Null);
                Value::from(format!("{}:{}", ctx.definition().bundle(), lang))
            }),
        )
        .build()
        .unwrap();
    let node = create(definition);
    assert_eq!(first_value(&node, "summary"), Value::from("page:fr"));
}

#[test]
fn derived_definitions_share_when_unchanged() {
    let definition = Arc::new(
        factory()
            .definition("node")
            .context("langcode", "en")
            .build()
            .unwrap(),
    );

    let same = definition
        .with_context([("langcode".to_string(), Value::from("en"))])
        .unwrap();
    assert!(Arc::ptr_eq(&definition, &same));
    assert!(Arc::ptr_eq(&definition, &definition.with_mutable(false)));

    let changed = definition
        .with_context([("langcode".to_string(), Value::from("de"))])
        .unwrap();
    assert!(!Arc::ptr_eq(&definition, &changed));
    assert_eq!(changed.context().get("langcode"), Some(&Value::from("de")));
    assert_eq!(definition.context().get("langcode"), Some(&Value::from("en")));
}

#[test]
fn field_definitions_carry_names() {
    let node = create(article(false));
    let definition = as_double(node.call("getFieldDefinition", &[Value::from("title")]).unwrap());
    assert_eq!(definition.call("getName", &[]).unwrap(), Value::from("title"));
    assert_eq!(
        node.call("getFieldDefinition", &[Value::from("missing")]).unwrap(),
        Value::Null
    );
    assert_eq!(node.call("hasField", &[Value::from("tags")]).unwrap(), Value::Bool(true));
}

#[test]
fn unknown_field_access() {
    let node = create(article(false));
    assert_eq!(
        node.property("missing").unwrap_err(),
        DoubleError::unknown_field("node", "missing")
    );
}
