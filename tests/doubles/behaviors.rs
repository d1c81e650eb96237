//! Behavior mixins applied through traits.

use crate::common::*;
use entity_doubles::{Behavior, CapabilityDefinition, EntityFields, ResolverMap, ValueKind};
use std::sync::Arc;

fn published(mutable: bool) -> Arc<Double> {
    create(
        factory()
            .definition("node")
            .fieldable()
            .field("status", true)
            .field("changed", 100i64)
            .field("uid", EntityHandle::stub("user", 7))
            .with_trait(Capability::PUBLISHED)
            .with_trait(Capability::CHANGED)
            .with_trait(Capability::OWNER)
            .mutable(mutable)
            .build()
            .unwrap(),
    )
}

#[test]
fn traits_join_capabilities() {
    let node = published(false);
    for capability in [Capability::PUBLISHED, Capability::CHANGED, Capability::OWNER] {
        assert!(node.supports(&capability));
    }
    assert_eq!(node.call("isPublished", &[]).unwrap(), Value::Bool(true));
    assert_eq!(node.call("getChangedTime", &[]).unwrap(), Value::Int(100));
    assert_eq!(node.call("getOwnerId", &[]).unwrap(), Value::Int(7));
}

#[test]
fn behavior_writes_honor_mutability() {
    let frozen = published(false);
    assert_eq!(
        frozen.call("setUnpublished", &[]).unwrap_err(),
        DoubleError::immutable("status")
    );

    let open = published(true);
    open.call("setUnpublished", &[]).unwrap();
    assert_eq!(open.call("isPublished", &[]).unwrap(), Value::Bool(false));
    assert_eq!(first_value(&open, "status"), Value::Bool(false));
}

#[test]
fn behavior_shares_field_cache() {
    let node = published(true);
    let status = field(&node, "status");
    node.call("setPublished", &[]).unwrap();
    assert_eq!(status.property("value").unwrap(), Value::Bool(true));
    assert!(status.ptr_eq(&field(&node, "status")));
}

#[test]
fn overrides_beat_behaviors() {
    let definition = factory()
        .definition("node")
        .fieldable()
        .field("status", false)
        .with_trait(Capability::PUBLISHED)
        .method("isPublished", |_| Ok(Value::Bool(true)))
        .build()
        .unwrap();
    assert_eq!(create(definition).call("isPublished", &[]).unwrap(), Value::Bool(true));
}

struct Sticky;

impl Behavior for Sticky {
    fn capability(&self) -> Capability {
        Capability::new("sticky")
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["sticky"]
    }

    fn resolvers(&self, fields: &Arc<EntityFields>) -> ResolverMap {
        let mut map = ResolverMap::new();
        let f = Arc::clone(fields);
        map.insert("isSticky", move |_, _| {
            Ok(Value::Bool(f.first_property("sticky", "value")?.is_truthy()))
        });
        map
    }
}

#[test]
fn custom_behavior() {
    let mut factory = factory();
    factory.register_capability(
        CapabilityDefinition::new(Capability::new("sticky")).method("isSticky", ValueKind::Bool),
    );
    factory.register_behavior(Sticky);

    let definition = factory
        .definition("node")
        .fieldable()
        .field("sticky", 1)
        .with_trait("sticky")
        .build()
        .unwrap();
    let node = factory.create(definition).unwrap();
    assert_eq!(node.call("isSticky", &[]).unwrap(), Value::Bool(true));
}

#[test]
fn owner_on_plain_uid_reads_back_written_handle() {
    let definition = factory()
        .definition("node")
        .fieldable()
        .field("uid", 3)
        .with_trait(Capability::OWNER)
        .mutable(true)
        .build()
        .unwrap();
    let node = create(definition);
    assert_eq!(node.call("getOwnerId", &[]).unwrap(), Value::Int(3));

    let user = EntityHandle::stub("user", 8);
    node.call("setOwner", &[Value::Entity(user.clone())]).unwrap();
    assert_eq!(node.call("getOwner", &[]).unwrap(), Value::Entity(user));
    assert_eq!(node.call("getOwnerId", &[]).unwrap(), Value::Int(8));
}
