//! Resolver context
//!
//! Every resolver receives a [`ResolverContext`]: the definition's context
//! data plus the originating definition itself, exposed under the reserved
//! key [`DEFINITION_CONTEXT_KEY`]. List and item resolvers additionally see
//! the field name and delta they were built for.

use crate::definition::EntityDoubleDefinition;
use crate::value::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Reserved context key under which resolvers find their definition
///
/// Supplying this key in definition context is a configuration error.
pub const DEFINITION_CONTEXT_KEY: &str = "_definition";

/// Context threaded to every resolver
#[derive(Clone)]
pub struct ResolverContext {
    definition: Arc<EntityDoubleDefinition>,
    data: Arc<BTreeMap<String, Value>>,
    field: Option<String>,
    delta: Option<usize>,
}

impl ResolverContext {
    /// Context for an entity-level resolver
    pub fn new(definition: Arc<EntityDoubleDefinition>) -> Self {
        let data = Arc::new(definition.context().clone());
        Self {
            definition,
            data,
            field: None,
            delta: None,
        }
    }

    /// Derive the context for a field list
    pub fn for_field(&self, field: impl Into<String>) -> Self {
        Self {
            definition: Arc::clone(&self.definition),
            data: Arc::clone(&self.data),
            field: Some(field.into()),
            delta: None,
        }
    }

    /// Derive the context for a field item
    pub fn for_delta(&self, delta: usize) -> Self {
        Self {
            delta: Some(delta),
            ..self.clone()
        }
    }

    /// The originating definition (the reserved key)
    pub fn definition(&self) -> &Arc<EntityDoubleDefinition> {
        &self.definition
    }

    /// Context data by key
    ///
    /// The reserved key is never part of the data; read it through
    /// [`ResolverContext::definition`].
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// True if [`ResolverContext::get`] has a value for the key
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// All context data (without the reserved key)
    pub fn data(&self) -> &BTreeMap<String, Value> {
        &self.data
    }

    /// Field the resolver was built for
    pub fn field_name(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Delta the resolver was built for
    pub fn delta(&self) -> Option<usize> {
        self.delta
    }
}

impl std::fmt::Debug for ResolverContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverContext")
            .field("entity_type", &self.definition.entity_type())
            .field("data", &self.data)
            .field("field", &self.field)
            .field("delta", &self.delta)
            .finish()
    }
}
