//! Behavior mixins
//!
//! A behavior adds the resolvers of one capability to an entity double,
//! after base resolution. Behaviors read and write through the entity's
//! field lists, so they share the field cache and the mutability rules of
//! ordinary field access.

use super::entity::EntityFields;
use super::field_item::VALUE_PROPERTY;
use super::{arg, ResolverMap};
use crate::reference::{ENTITY_KEY, TARGET_ID_KEY};
use double_core::{Capability, Result, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Resolvers for one capability, layered over an entity double
pub trait Behavior: Send + Sync {
    /// Capability the behavior implements
    fn capability(&self) -> Capability;

    /// Fields the definition must declare for this behavior
    fn required_fields(&self) -> &'static [&'static str] {
        &[]
    }

    /// Resolvers reading and writing through the entity's fields
    fn resolvers(&self, fields: &Arc<EntityFields>) -> ResolverMap;
}

/// Publishing status stored in the `status` field
#[derive(Debug, Clone, Copy, Default)]
pub struct PublishedBehavior;

impl PublishedBehavior {
    /// Field holding the status flag
    pub const FIELD: &'static str = "status";
}

impl Behavior for PublishedBehavior {
    fn capability(&self) -> Capability {
        Capability::PUBLISHED
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &[Self::FIELD]
    }

    fn resolvers(&self, fields: &Arc<EntityFields>) -> ResolverMap {
        let mut map = ResolverMap::new();

        let f = Arc::clone(fields);
        map.insert("isPublished", move |_, _| {
            let status = f.first_property(Self::FIELD, VALUE_PROPERTY)?;
            Ok(Value::Bool(status.is_truthy()))
        });

        let f = Arc::clone(fields);
        map.insert("setPublished", move |_, _| {
            f.set(Self::FIELD, Value::Bool(true))?;
            Ok(Value::Null)
        });

        let f = Arc::clone(fields);
        map.insert("setUnpublished", move |_, _| {
            f.set(Self::FIELD, Value::Bool(false))?;
            Ok(Value::Null)
        });

        map
    }
}

/// Last-change timestamp stored in the `changed` field
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangedBehavior;

impl ChangedBehavior {
    /// Field holding the timestamp
    pub const FIELD: &'static str = "changed";
}

impl Behavior for ChangedBehavior {
    fn capability(&self) -> Capability {
        Capability::CHANGED
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &[Self::FIELD]
    }

    fn resolvers(&self, fields: &Arc<EntityFields>) -> ResolverMap {
        let mut map = ResolverMap::new();

        let f = Arc::clone(fields);
        map.insert("getChangedTime", move |_, _| {
            f.first_property(Self::FIELD, VALUE_PROPERTY)
        });

        let f = Arc::clone(fields);
        map.insert("setChangedTime", move |_, args| {
            f.set(Self::FIELD, arg("setChangedTime", args, 0)?.clone())?;
            Ok(Value::Null)
        });

        map
    }
}

/// Owning user stored in the `uid` reference field
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerBehavior;

impl OwnerBehavior {
    /// Field referencing the owner
    pub const FIELD: &'static str = "uid";

    // A plain `uid` holds either the owner handle or its id as the item value.
    fn owner(fields: &EntityFields) -> Result<Value> {
        match fields.first_property(Self::FIELD, ENTITY_KEY)? {
            Value::Null => match fields.first_property(Self::FIELD, VALUE_PROPERTY)? {
                owner @ Value::Entity(_) => Ok(owner),
                _ => Ok(Value::Null),
            },
            owner => Ok(owner),
        }
    }

    fn owner_id(fields: &EntityFields) -> Result<Value> {
        match fields.first_property(Self::FIELD, TARGET_ID_KEY)? {
            Value::Null => match fields.first_property(Self::FIELD, VALUE_PROPERTY)? {
                Value::Entity(owner) => Ok(owner.id().map(|id| id.to_value()).unwrap_or(Value::Null)),
                id => Ok(id),
            },
            id => Ok(id),
        }
    }
}

impl Behavior for OwnerBehavior {
    fn capability(&self) -> Capability {
        Capability::OWNER
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &[Self::FIELD]
    }

    fn resolvers(&self, fields: &Arc<EntityFields>) -> ResolverMap {
        let mut map = ResolverMap::new();

        let f = Arc::clone(fields);
        map.insert("getOwner", move |_, _| Self::owner(&f));

        let f = Arc::clone(fields);
        map.insert("getOwnerId", move |_, _| Self::owner_id(&f));

        let f = Arc::clone(fields);
        map.insert("setOwner", move |_, args| {
            f.set(Self::FIELD, arg("setOwner", args, 0)?.clone())?;
            Ok(Value::Null)
        });

        let f = Arc::clone(fields);
        map.insert("setOwnerId", move |_, args| {
            let id = arg("setOwnerId", args, 0)?.clone();
            f.set(Self::FIELD, Value::map([(TARGET_ID_KEY, id)]))?;
            Ok(Value::Null)
        });

        map
    }
}

/// Behaviors by capability
#[derive(Clone, Default)]
pub struct BehaviorRegistry {
    behaviors: BTreeMap<Capability, Arc<dyn Behavior>>,
}

impl BehaviorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the published, changed and owner behaviors
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(PublishedBehavior);
        registry.register(ChangedBehavior);
        registry.register(OwnerBehavior);
        registry
    }

    /// Register (or replace) the behavior for its capability
    pub fn register(&mut self, behavior: impl Behavior + 'static) {
        self.behaviors.insert(behavior.capability(), Arc::new(behavior));
    }

    /// Look up the behavior for a capability
    pub fn get(&self, capability: &Capability) -> Option<&Arc<dyn Behavior>> {
        self.behaviors.get(capability)
    }

    /// True if a behavior is registered for the capability
    pub fn contains(&self, capability: &Capability) -> bool {
        self.behaviors.contains_key(capability)
    }
}

impl fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.behaviors.keys()).finish()
    }
}
