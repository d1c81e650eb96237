//! The dispatcher
//!
//! A [`Double`] is a resolver map wired into an object. Every call goes
//! through the same total order; the first stage that matches wins:
//!
//! 1. explicit override from the definition (arguments only)
//! 2. core resolver from the builders (`context, arguments`)
//! 3. guardrail: unsupported-operation error with its reason
//! 4. lenient default: neutral value of the declared return kind
//! 5. missing-resolver error naming the declaring capability
//!
//! Overrides therefore bypass guardrails, and leniency never softens a
//! guardrail.

use crate::guardrail::Guardrails;
use crate::resolver::behavior::BehaviorRegistry;
use crate::resolver::{Resolver, ResolverMap, PROPERTY_GET, PROPERTY_SET};
use double_core::{
    Capability, CapabilityRegistry, DoubleError, DoubleObject, DoubleRef, EntityDoubleDefinition,
    EntityHandle, EntityLike, Identifier, MethodOverride, Result, ResolverContext, Value,
    ValueKind,
};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Shared, read-only services every double consults
#[derive(Clone, Default)]
pub struct DoubleEnv {
    /// Capability catalog
    pub capabilities: CapabilityRegistry,
    /// Unsupported-operation table
    pub guardrails: Guardrails,
    /// Behavior mixins by capability
    pub behaviors: BehaviorRegistry,
}

impl DoubleEnv {
    /// Standard catalog, guardrails and behaviors
    pub fn standard() -> Self {
        Self {
            capabilities: CapabilityRegistry::standard(),
            guardrails: Guardrails::new(),
            behaviors: BehaviorRegistry::standard(),
        }
    }
}

impl fmt::Debug for DoubleEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleEnv")
            .field("capabilities", &self.capabilities.len())
            .field("behaviors", &self.behaviors)
            .finish()
    }
}

/// What a double models
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleKind {
    /// The entity itself
    Entity,
    /// A field's item list
    FieldList,
    /// One item of a field list
    FieldItem,
    /// A minimal field definition
    FieldDefinition,
}

impl DoubleKind {
    /// Kind label
    pub fn label(self) -> &'static str {
        match self {
            DoubleKind::Entity => "entity",
            DoubleKind::FieldList => "field_list",
            DoubleKind::FieldItem => "field_item",
            DoubleKind::FieldDefinition => "field_definition",
        }
    }
}

/// Stage that handles a call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStage {
    /// Explicit override
    Override,
    /// Core resolver
    Core,
    /// Guardrail with its reason
    Guardrail(&'static str),
    /// Lenient default of the given kind
    Lenient(ValueKind),
    /// Missing resolver; names the declaring capability or `unknown`
    Missing(String),
}

enum Resolution<'a> {
    Override(&'a MethodOverride),
    Core(&'a Resolver),
    Guardrail(&'static str),
    Lenient(ValueKind),
    Missing(Option<&'a Capability>),
}

/// Everything needed to assemble a double
pub(crate) struct DoubleParts {
    pub kind: DoubleKind,
    pub name: String,
    pub capabilities: Vec<Capability>,
    pub primary: Option<Capability>,
    pub overrides: BTreeMap<String, MethodOverride>,
    pub resolvers: ResolverMap,
    pub context: ResolverContext,
    pub env: Arc<DoubleEnv>,
}

/// A produced test double
pub struct Double {
    kind: DoubleKind,
    name: String,
    capabilities: Vec<Capability>,
    primary: Option<Capability>,
    overrides: BTreeMap<String, MethodOverride>,
    resolvers: ResolverMap,
    context: ResolverContext,
    lenient: bool,
    env: Arc<DoubleEnv>,
}

impl Double {
    pub(crate) fn new(parts: DoubleParts) -> Self {
        let lenient = parts.context.definition().is_lenient();
        Self {
            kind: parts.kind,
            name: parts.name,
            capabilities: parts.capabilities,
            primary: parts.primary,
            overrides: parts.overrides,
            resolvers: parts.resolvers,
            context: parts.context,
            lenient,
            env: parts.env,
        }
    }

    /// What this double models
    pub fn kind(&self) -> DoubleKind {
        self.kind
    }

    /// Diagnostic name (`node:article`, `node.tags`, `node.tags[1]`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capabilities this double exposes
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// True if the capability is exposed
    pub fn supports(&self, capability: &Capability) -> bool {
        self.capabilities.contains(capability)
    }

    /// Context handed to core resolvers
    pub fn context(&self) -> &ResolverContext {
        &self.context
    }

    /// Definition this double was built from
    pub fn definition(&self) -> &Arc<EntityDoubleDefinition> {
        self.context.definition()
    }

    /// Core resolvers wired onto this double
    pub fn resolvers(&self) -> &ResolverMap {
        &self.resolvers
    }

    fn resolution(&self, method: &str) -> Resolution<'_> {
        if let Some(f) = self.overrides.get(method) {
            return Resolution::Override(f);
        }
        if let Some(resolver) = self.resolvers.get(method) {
            return Resolution::Core(resolver);
        }
        if let Some(reason) = self.env.guardrails.reason_for(method) {
            return Resolution::Guardrail(reason);
        }
        let catalog = &self.env.capabilities;
        if self.lenient {
            let kind = catalog
                .return_kind(self.primary.as_ref(), &self.capabilities, method)
                .unwrap_or(ValueKind::Null);
            return Resolution::Lenient(kind);
        }
        Resolution::Missing(catalog.declaring(self.primary.as_ref(), &self.capabilities, method))
    }

    /// Report which stage would handle a call, without invoking anything
    pub fn resolve(&self, method: &str) -> ResolutionStage {
        match self.resolution(method) {
            Resolution::Override(_) => ResolutionStage::Override,
            Resolution::Core(_) => ResolutionStage::Core,
            Resolution::Guardrail(reason) => ResolutionStage::Guardrail(reason),
            Resolution::Lenient(kind) => ResolutionStage::Lenient(kind),
            Resolution::Missing(capability) => ResolutionStage::Missing(
                capability
                    .map(|cap| cap.name().to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            ),
        }
    }

    /// Invoke a method
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        match self.resolution(method) {
            Resolution::Override(f) => {
                debug!(double = %self.name, method, stage = "override", "dispatch");
                f(args)
            }
            Resolution::Core(resolver) => {
                debug!(double = %self.name, method, stage = "core", "dispatch");
                resolver(&self.context, args)
            }
            Resolution::Guardrail(reason) => {
                debug!(double = %self.name, method, stage = "guardrail", "dispatch");
                Err(DoubleError::unsupported(method, reason))
            }
            Resolution::Lenient(kind) => {
                debug!(double = %self.name, method, stage = "lenient", ?kind, "dispatch");
                Ok(kind.neutral())
            }
            Resolution::Missing(capability) => {
                debug!(double = %self.name, method, stage = "missing", "dispatch");
                Err(DoubleError::missing_resolver(
                    method,
                    capability.map(Capability::name).unwrap_or("unknown"),
                ))
            }
        }
    }

    /// Property-style read, sugar for `__get`
    pub fn property(&self, name: &str) -> Result<Value> {
        self.call(PROPERTY_GET, &[Value::from(name)])
    }

    /// Property-style write, sugar for `__set`
    pub fn set_property(&self, name: &str, value: impl Into<Value>) -> Result<Value> {
        self.call(PROPERTY_SET, &[Value::from(name), value.into()])
    }

    /// Share this double as a value
    pub fn to_value(self: &Arc<Self>) -> Value {
        Value::Double(DoubleRef::new(Arc::clone(self) as Arc<dyn DoubleObject>))
    }

    /// Entity handle for an entity double, so other doubles can reference it
    pub fn handle(self: &Arc<Self>) -> Option<EntityHandle> {
        (self.kind == DoubleKind::Entity)
            .then(|| EntityHandle::new(Arc::clone(self) as Arc<dyn EntityLike>))
    }
}

impl fmt::Debug for Double {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Double")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("capabilities", &self.capabilities)
            .field("overrides", &self.overrides.keys().collect::<Vec<_>>())
            .field("resolvers", &self.resolvers)
            .field("lenient", &self.lenient)
            .finish()
    }
}

impl DoubleObject for Double {
    fn kind(&self) -> &'static str {
        self.kind.label()
    }

    fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        Double::call(self, method, args)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl EntityLike for Double {
    fn entity_type(&self) -> &str {
        self.definition().entity_type()
    }

    fn id(&self) -> Option<Identifier> {
        self.call("id", &[])
            .ok()
            .and_then(|id| Identifier::from_value(&id))
    }

    fn bundle(&self) -> Option<String> {
        self.call("bundle", &[])
            .ok()
            .and_then(|b| b.as_str().map(str::to_string))
    }

    fn label(&self) -> Option<String> {
        self.call("label", &[])
            .ok()
            .and_then(|l| l.as_str().map(str::to_string))
    }
}
