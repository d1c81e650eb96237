//! Shared helpers for the doubles integration suite.

#![allow(dead_code)]

pub use entity_doubles::{
    Capability, Double, DoubleError, DoubleFactory, DoubleRef, EntityDoubleDefinition,
    EntityHandle, FieldDoubleDefinition, Value,
};
use std::sync::Arc;

/// Factory with default configuration.
pub fn factory() -> DoubleFactory {
    DoubleFactory::new()
}

/// Fieldable `node:article` definition with a title, tags and an author.
pub fn article(mutable: bool) -> EntityDoubleDefinition {
    factory()
        .definition("node")
        .bundle("article")
        .id(1)
        .label("Hello")
        .fieldable()
        .field("title", "Hello")
        .field("tags", FieldDoubleDefinition::list(["red", "green"]))
        .field("uid", EntityHandle::stub("user", 7))
        .mutable(mutable)
        .build()
        .expect("article definition")
}

/// Create a double with the default factory.
pub fn create(definition: impl Into<Arc<EntityDoubleDefinition>>) -> Arc<Double> {
    factory().create(definition).expect("double creation")
}

/// Unwrap a value that must be a double.
pub fn as_double(value: Value) -> DoubleRef {
    match value {
        Value::Double(double) => double,
        other => panic!("Expected a double, got {:?}", other),
    }
}

/// The field-list double of an entity double.
pub fn field(entity: &Double, name: &str) -> DoubleRef {
    as_double(entity.call("get", &[Value::from(name)]).expect("field access"))
}

/// The item double at `delta` of a field list.
pub fn item(list: &DoubleRef, delta: i64) -> DoubleRef {
    as_double(list.call("get", &[Value::Int(delta)]).expect("item access"))
}

/// `value` property of a field's first item.
pub fn first_value(entity: &Double, name: &str) -> Value {
    field(entity, name).property("value").expect("first value")
}
