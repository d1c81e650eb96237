//! Entity double definition

use super::{EntityDoubleDefinitionBuilder, FieldDoubleDefinition, MethodOverride};
use crate::capability::Capability;
use crate::context::DEFINITION_CONTEXT_KEY;
use crate::error::{DoubleError, Result};
use crate::value::{Identifier, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Immutable description of an entity double
///
/// Built once through [`EntityDoubleDefinition::builder`], validated
/// eagerly, and shared behind `Arc` as a reusable template: every double
/// built from it gets its own state and caches.
///
/// ## Invariants
///
/// - `fields` is non-empty only if `interfaces` contains `fieldable`
/// - `context` never contains [`DEFINITION_CONTEXT_KEY`]
/// - `primary_interface`, when set, is one of `interfaces`
#[derive(Clone)]
pub struct EntityDoubleDefinition {
    pub(crate) entity_type: String,
    pub(crate) bundle: String,
    pub(crate) id: Option<Identifier>,
    pub(crate) uuid: Option<String>,
    pub(crate) label: Option<String>,
    pub(crate) fields: BTreeMap<String, FieldDoubleDefinition>,
    pub(crate) interfaces: Vec<Capability>,
    pub(crate) primary_interface: Option<Capability>,
    pub(crate) methods: BTreeMap<String, MethodOverride>,
    pub(crate) context: BTreeMap<String, Value>,
    pub(crate) mutable: bool,
    pub(crate) lenient: bool,
    pub(crate) traits: Vec<Capability>,
}

impl EntityDoubleDefinition {
    /// Start building a definition for an entity type
    pub fn builder(entity_type: impl Into<String>) -> EntityDoubleDefinitionBuilder {
        EntityDoubleDefinitionBuilder::new(entity_type)
    }

    /// Check the construction invariants
    pub(crate) fn validate(&self) -> Result<()> {
        if self.entity_type.is_empty() {
            return Err(DoubleError::configuration("entity type must not be empty"));
        }
        if !self.fields.is_empty() && !self.interfaces.contains(&Capability::FIELDABLE) {
            let names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
            return Err(DoubleError::configuration(format!(
                "fields [{}] declared on '{}' without the '{}' capability",
                names.join(", "),
                self.entity_type,
                Capability::FIELDABLE
            )));
        }
        validate_context(&self.context)?;
        if let Some(primary) = &self.primary_interface {
            if !self.interfaces.contains(primary) {
                return Err(DoubleError::configuration(format!(
                    "primary interface '{}' is not among the declared interfaces",
                    primary
                )));
            }
        }
        Ok(())
    }

    /// Entity type id
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Bundle (defaults to the entity type)
    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    /// Identifier
    pub fn id(&self) -> Option<&Identifier> {
        self.id.as_ref()
    }

    /// UUID
    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    /// Label
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Modeled fields by name
    pub fn fields(&self) -> &BTreeMap<String, FieldDoubleDefinition> {
        &self.fields
    }

    /// Look up one field
    pub fn field(&self, name: &str) -> Option<&FieldDoubleDefinition> {
        self.fields.get(name)
    }

    /// Declared capabilities, in declaration order
    pub fn interfaces(&self) -> &[Capability] {
        &self.interfaces
    }

    /// True if the capability is declared
    pub fn supports(&self, capability: &Capability) -> bool {
        self.interfaces.contains(capability)
    }

    /// Capability that declares ambiguous methods
    pub fn primary_interface(&self) -> Option<&Capability> {
        self.primary_interface.as_ref()
    }

    /// Explicit method overrides
    pub fn methods(&self) -> &BTreeMap<String, MethodOverride> {
        &self.methods
    }

    /// Context data handed to every resolver
    pub fn context(&self) -> &BTreeMap<String, Value> {
        &self.context
    }

    /// Whether field writes are permitted
    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Whether unimplemented methods return neutral defaults
    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    /// Behavior mixins applied after base resolution
    pub fn traits(&self) -> &[Capability] {
        &self.traits
    }

    /// Return a definition with the given context entries merged in
    ///
    /// Returns the same `Arc` when every entry is already present with an
    /// equal value.
    pub fn with_context(
        self: &Arc<Self>,
        context: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<Arc<Self>> {
        let entries: BTreeMap<String, Value> = context.into_iter().collect();
        validate_context(&entries)?;

        let unchanged = entries
            .iter()
            .all(|(key, value)| self.context.get(key) == Some(value));
        if unchanged {
            return Ok(Arc::clone(self));
        }

        let mut next = Self::clone(self);
        next.context.extend(entries);
        Ok(Arc::new(next))
    }

    /// Return a definition with the mutability flag set
    ///
    /// Returns the same `Arc` when the flag already has that value.
    pub fn with_mutable(self: &Arc<Self>, mutable: bool) -> Arc<Self> {
        if self.mutable == mutable {
            return Arc::clone(self);
        }
        let mut next = Self::clone(self);
        next.mutable = mutable;
        Arc::new(next)
    }
}

fn validate_context(context: &BTreeMap<String, Value>) -> Result<()> {
    if context.contains_key(DEFINITION_CONTEXT_KEY) {
        return Err(DoubleError::configuration(format!(
            "context key '{}' is reserved for the definition itself",
            DEFINITION_CONTEXT_KEY
        )));
    }
    Ok(())
}

impl fmt::Debug for EntityDoubleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDoubleDefinition")
            .field("entity_type", &self.entity_type)
            .field("bundle", &self.bundle)
            .field("id", &self.id)
            .field("uuid", &self.uuid)
            .field("label", &self.label)
            .field("fields", &self.fields)
            .field("interfaces", &self.interfaces)
            .field("primary_interface", &self.primary_interface)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("context", &self.context)
            .field("mutable", &self.mutable)
            .field("lenient", &self.lenient)
            .field("traits", &self.traits)
            .finish()
    }
}
