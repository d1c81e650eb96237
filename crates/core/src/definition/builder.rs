//! Fluent definition builder

use super::{EntityDoubleDefinition, FieldDoubleDefinition};
use crate::capability::Capability;
use crate::config::DoubleConfig;
use crate::error::Result;
use crate::sequence::IdSequence;
use crate::value::{Identifier, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builder for [`EntityDoubleDefinition`]
///
/// Every definition declares the `entity` capability; further capabilities
/// are added with [`interface`](Self::interface). Validation runs in
/// [`build`](Self::build).
#[must_use]
pub struct EntityDoubleDefinitionBuilder {
    definition: EntityDoubleDefinition,
}

impl EntityDoubleDefinitionBuilder {
    /// Start a definition for an entity type
    pub fn new(entity_type: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        Self {
            definition: EntityDoubleDefinition {
                bundle: entity_type.clone(),
                entity_type,
                id: None,
                uuid: None,
                label: None,
                fields: BTreeMap::new(),
                interfaces: vec![Capability::ENTITY],
                primary_interface: None,
                methods: BTreeMap::new(),
                context: BTreeMap::new(),
                mutable: false,
                lenient: false,
                traits: Vec::new(),
            },
        }
    }

    /// Apply configured defaults for the mutable and lenient flags
    pub fn with_config(mut self, config: &DoubleConfig) -> Self {
        self.definition.mutable = config.mutable;
        self.definition.lenient = config.lenient;
        self
    }

    /// Set the bundle
    pub fn bundle(mut self, bundle: impl Into<String>) -> Self {
        self.definition.bundle = bundle.into();
        self
    }

    /// Set the identifier
    pub fn id(mut self, id: impl Into<Identifier>) -> Self {
        self.definition.id = Some(id.into());
        self
    }

    /// Take the next identifier from a sequence
    pub fn next_id(mut self, sequence: &IdSequence) -> Self {
        self.definition.id = Some(sequence.next_id());
        self
    }

    /// Set the UUID
    pub fn uuid(mut self, uuid: impl Into<String>) -> Self {
        self.definition.uuid = Some(uuid.into());
        self
    }

    /// Generate a random v4 UUID
    pub fn random_uuid(mut self) -> Self {
        self.definition.uuid = Some(uuid::Uuid::new_v4().to_string());
        self
    }

    /// Set the label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.definition.label = Some(label.into());
        self
    }

    /// Declare a capability
    pub fn interface(mut self, capability: impl Into<Capability>) -> Self {
        let capability = capability.into();
        if !self.definition.interfaces.contains(&capability) {
            self.definition.interfaces.push(capability);
        }
        self
    }

    /// Declare the `fieldable` capability
    pub fn fieldable(self) -> Self {
        self.interface(Capability::FIELDABLE)
    }

    /// Set the capability that declares ambiguous methods
    pub fn primary_interface(mut self, capability: impl Into<Capability>) -> Self {
        self.definition.primary_interface = Some(capability.into());
        self
    }

    /// Model a field
    pub fn field(mut self, name: impl Into<String>, field: impl Into<FieldDoubleDefinition>) -> Self {
        self.definition.fields.insert(name.into(), field.into());
        self
    }

    /// Override a method
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.definition.methods.insert(name.into(), Arc::new(f));
        self
    }

    /// Add context data
    pub fn context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.definition.context.insert(key.into(), value.into());
        self
    }

    /// Allow or forbid field writes
    pub fn mutable(mut self, mutable: bool) -> Self {
        self.definition.mutable = mutable;
        self
    }

    /// Return neutral defaults for unimplemented methods
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.definition.lenient = lenient;
        self
    }

    /// Apply a behavior mixin after base resolution
    pub fn with_trait(mut self, capability: impl Into<Capability>) -> Self {
        let capability = capability.into();
        if !self.definition.traits.contains(&capability) {
            self.definition.traits.push(capability);
        }
        self
    }

    /// Validate and produce the definition
    pub fn build(self) -> Result<EntityDoubleDefinition> {
        self.definition.validate()?;
        Ok(self.definition)
    }
}
