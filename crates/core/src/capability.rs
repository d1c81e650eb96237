//! Capabilities and the method catalog
//!
//! A capability is a named interface a double may be declared to support.
//! The [`CapabilityRegistry`] records which methods each capability
//! declares and what kind of value they return, which drives two things at
//! dispatch time: naming the declaring capability in missing-resolver
//! errors, and picking the neutral default for lenient doubles.

use crate::value::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Named capability tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Capability(Cow<'static, str>);

impl Capability {
    /// Basic entity identity: id, uuid, label, bundle
    pub const ENTITY: Capability = Capability::from_static("entity");
    /// Entity with fields
    pub const FIELDABLE: Capability = Capability::from_static("fieldable");
    /// Multi-valued field container
    pub const FIELD_LIST: Capability = Capability::from_static("field_list");
    /// Field container whose items reference entities
    pub const REFERENCE_LIST: Capability = Capability::from_static("reference_list");
    /// Positional element of a field list
    pub const FIELD_ITEM: Capability = Capability::from_static("field_item");
    /// Field item exposing `entity` / `target_id`
    pub const REFERENCE_ITEM: Capability = Capability::from_static("reference_item");
    /// Minimal field definition
    pub const FIELD_DEFINITION: Capability = Capability::from_static("field_definition");
    /// Publishing status behavior
    pub const PUBLISHED: Capability = Capability::from_static("published");
    /// Changed-time tracking behavior
    pub const CHANGED: Capability = Capability::from_static("changed");
    /// Ownership behavior
    pub const OWNER: Capability = Capability::from_static("owner");

    /// Create a capability from a static name
    pub const fn from_static(name: &'static str) -> Self {
        Capability(Cow::Borrowed(name))
    }

    /// Create a capability from any name
    pub fn new(name: impl Into<String>) -> Self {
        Capability(Cow::Owned(name.into()))
    }

    /// Capability name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Capability {
    fn from(name: &str) -> Self {
        Capability::new(name)
    }
}

/// Kind of value a declared method returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Objects, identifiers and setters
    Null,
    /// Predicates
    Bool,
    /// Counts, timestamps
    Int,
    /// Numeric measures
    Float,
    /// Labels, names
    String,
    /// Sequences
    Array,
    /// Keyed data
    Map,
}

impl ValueKind {
    /// Neutral default returned by lenient doubles
    pub fn neutral(self) -> Value {
        match self {
            ValueKind::Null => Value::Null,
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Int => Value::Int(0),
            ValueKind::Float => Value::Float(0.0),
            ValueKind::String => Value::String(String::new()),
            ValueKind::Array => Value::Array(Vec::new()),
            ValueKind::Map => Value::Map(BTreeMap::new()),
        }
    }
}

/// A capability together with the methods it declares
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityDefinition {
    capability: Capability,
    methods: BTreeMap<String, ValueKind>,
}

impl CapabilityDefinition {
    /// Start a definition with no methods
    pub fn new(capability: Capability) -> Self {
        Self {
            capability,
            methods: BTreeMap::new(),
        }
    }

    /// Declare a method
    pub fn method(mut self, name: impl Into<String>, returns: ValueKind) -> Self {
        self.methods.insert(name.into(), returns);
        self
    }

    /// The capability tag
    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    /// True if the method is declared
    pub fn declares(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Declared return kind of a method
    pub fn returns(&self, method: &str) -> Option<ValueKind> {
        self.methods.get(method).copied()
    }

    /// Declared method names, sorted
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }
}

/// Catalog of known capabilities
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    definitions: BTreeMap<Capability, CapabilityDefinition>,
}

impl CapabilityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the standard capabilities
    pub fn standard() -> Self {
        use ValueKind::*;

        let mut registry = Self::new();
        registry.register(
            CapabilityDefinition::new(Capability::ENTITY)
                .method("id", Null)
                .method("uuid", Null)
                .method("label", Null)
                .method("bundle", String)
                .method("getEntityTypeId", String)
                .method("isNew", Bool)
                .method("save", Int)
                .method("delete", Null)
                .method("access", Bool)
                .method("toUrl", Null)
                .method("toLink", Null)
                .method("createDuplicate", Null)
                .method("getTranslation", Null)
                .method("validate", Array),
        );
        registry.register(
            CapabilityDefinition::new(Capability::FIELDABLE)
                .method("hasField", Bool)
                .method("getFieldDefinition", Null)
                .method("getFieldDefinitions", Array)
                .method("get", Null)
                .method("set", Null)
                .method("__get", Null)
                .method("__set", Null)
                .method("toArray", Map),
        );
        registry.register(
            CapabilityDefinition::new(Capability::FIELD_LIST)
                .method("first", Null)
                .method("get", Null)
                .method("isEmpty", Bool)
                .method("getValue", Array)
                .method("setValue", Null)
                .method("appendItem", Null)
                .method("count", Int)
                .method("getName", String)
                .method("__get", Null)
                .method("__set", Null),
        );
        registry.register(
            CapabilityDefinition::new(Capability::REFERENCE_LIST)
                .method("referencedEntities", Array),
        );
        registry.register(
            CapabilityDefinition::new(Capability::FIELD_ITEM)
                .method("getValue", Null)
                .method("setValue", Null)
                .method("isEmpty", Bool)
                .method("get", Null)
                .method("set", Null)
                .method("__get", Null)
                .method("__set", Null),
        );
        registry.register(CapabilityDefinition::new(Capability::REFERENCE_ITEM));
        registry.register(
            CapabilityDefinition::new(Capability::FIELD_DEFINITION)
                .method("getName", String),
        );
        registry.register(
            CapabilityDefinition::new(Capability::PUBLISHED)
                .method("isPublished", Bool)
                .method("setPublished", Null)
                .method("setUnpublished", Null),
        );
        registry.register(
            CapabilityDefinition::new(Capability::CHANGED)
                .method("getChangedTime", Int)
                .method("setChangedTime", Null),
        );
        registry.register(
            CapabilityDefinition::new(Capability::OWNER)
                .method("getOwner", Null)
                .method("getOwnerId", Null)
                .method("setOwner", Null)
                .method("setOwnerId", Null),
        );
        registry
    }

    /// Register (or replace) a capability
    pub fn register(&mut self, definition: CapabilityDefinition) {
        self.definitions
            .insert(definition.capability().clone(), definition);
    }

    /// Look up a capability
    pub fn get(&self, capability: &Capability) -> Option<&CapabilityDefinition> {
        self.definitions.get(capability)
    }

    /// True if the capability is registered
    pub fn contains(&self, capability: &Capability) -> bool {
        self.definitions.contains_key(capability)
    }

    /// True if the capability declares the method
    pub fn declares(&self, capability: &Capability, method: &str) -> bool {
        self.get(capability)
            .map(|def| def.declares(method))
            .unwrap_or(false)
    }

    /// Find the capability that declares a method
    ///
    /// The primary capability wins when it declares the method; otherwise
    /// the first capability in `capabilities` that declares it.
    pub fn declaring<'a>(
        &self,
        primary: Option<&'a Capability>,
        capabilities: &'a [Capability],
        method: &str,
    ) -> Option<&'a Capability> {
        primary
            .filter(|cap| self.declares(cap, method))
            .or_else(|| capabilities.iter().find(|cap| self.declares(cap, method)))
    }

    /// Declared return kind of a method on the given capabilities
    pub fn return_kind(
        &self,
        primary: Option<&Capability>,
        capabilities: &[Capability],
        method: &str,
    ) -> Option<ValueKind> {
        self.declaring(primary, capabilities, method)
            .and_then(|cap| self.get(cap))
            .and_then(|def| def.returns(method))
    }

    /// Number of registered capabilities
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
