//! Double factory
//!
//! Owns the capability catalog, the behavior registry and the configured
//! defaults, and turns definitions into entity doubles.
//!
//! # Example
//!
//! ```
//! use double_engine::DoubleFactory;
//!
//! let factory = DoubleFactory::new();
//! let definition = factory
//!     .definition("node")
//!     .bundle("article")
//!     .id(1)
//!     .label("Hello")
//!     .build()
//!     .unwrap();
//! let node = factory.create(definition).unwrap();
//! assert_eq!(node.call("label", &[]).unwrap().as_str(), Some("Hello"));
//! ```

use crate::double::{Double, DoubleEnv, DoubleKind, DoubleParts};
use crate::resolver::behavior::Behavior;
use crate::resolver::entity::EntityResolverBuilder;
use crate::state::MutableState;
use double_core::{
    Capability, CapabilityDefinition, DoubleConfig, DoubleError, EntityDoubleDefinition,
    EntityDoubleDefinitionBuilder, Result, ResolverContext,
};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Creates entity doubles
#[derive(Debug, Clone)]
pub struct DoubleFactory {
    env: Arc<DoubleEnv>,
    config: DoubleConfig,
}

impl Default for DoubleFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl DoubleFactory {
    /// Factory with the standard catalog and default configuration
    pub fn new() -> Self {
        Self::with_config(DoubleConfig::default())
    }

    /// Factory with the standard catalog and the given defaults
    pub fn with_config(config: DoubleConfig) -> Self {
        Self {
            env: Arc::new(DoubleEnv::standard()),
            config,
        }
    }

    /// Factory with defaults read from a `doubles.toml` file
    pub fn from_config_file(path: &Path) -> Result<Self> {
        Ok(Self::with_config(DoubleConfig::from_file(path)?))
    }

    /// Configured defaults
    pub fn config(&self) -> &DoubleConfig {
        &self.config
    }

    /// Shared catalog, guardrails and behaviors
    pub fn env(&self) -> &Arc<DoubleEnv> {
        &self.env
    }

    /// Register a custom capability
    pub fn register_capability(&mut self, definition: CapabilityDefinition) {
        Arc::make_mut(&mut self.env).capabilities.register(definition);
    }

    /// Register a behavior, along with its capability if not yet known
    pub fn register_behavior(&mut self, behavior: impl Behavior + 'static) {
        let env = Arc::make_mut(&mut self.env);
        let capability = behavior.capability();
        if !env.capabilities.contains(&capability) {
            env.capabilities
                .register(CapabilityDefinition::new(capability));
        }
        env.behaviors.register(behavior);
    }

    /// Definition builder preloaded with the configured defaults
    pub fn definition(&self, entity_type: impl Into<String>) -> EntityDoubleDefinitionBuilder {
        EntityDoubleDefinition::builder(entity_type).with_config(&self.config)
    }

    /// Create an entity double
    ///
    /// Each call gets its own state container and caches, even for the
    /// same definition.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the definition names an
    /// unregistered capability or trait, or when a trait's required field
    /// is not declared.
    pub fn create(&self, definition: impl Into<Arc<EntityDoubleDefinition>>) -> Result<Arc<Double>> {
        let definition = definition.into();
        let behaviors = self.check(&definition)?;

        let state = definition
            .is_mutable()
            .then(|| Arc::new(MutableState::new()));
        let context = ResolverContext::new(Arc::clone(&definition));
        let builder = EntityResolverBuilder::new(context.clone(), state, Arc::clone(&self.env));

        let mut resolvers = builder.resolvers();
        let mut capabilities = definition.interfaces().to_vec();
        for behavior in &behaviors {
            resolvers.extend(behavior.resolvers(builder.fields()));
            let capability = behavior.capability();
            if !capabilities.contains(&capability) {
                capabilities.push(capability);
            }
        }

        let name = format!("{}:{}", definition.entity_type(), definition.bundle());
        debug!(
            double = %name,
            mutable = definition.is_mutable(),
            lenient = definition.is_lenient(),
            resolvers = resolvers.len(),
            "created entity double"
        );

        Ok(Arc::new(Double::new(DoubleParts {
            kind: DoubleKind::Entity,
            name,
            capabilities,
            primary: definition.primary_interface().cloned(),
            overrides: definition.methods().clone(),
            resolvers,
            context,
            env: Arc::clone(&self.env),
        })))
    }

    fn check(&self, definition: &EntityDoubleDefinition) -> Result<Vec<Arc<dyn Behavior>>> {
        for capability in definition.interfaces() {
            if !self.env.capabilities.contains(capability) {
                return Err(DoubleError::configuration(format!(
                    "capability '{}' is not registered",
                    capability
                )));
            }
        }

        definition
            .traits()
            .iter()
            .map(|tag| {
                let behavior = self.env.behaviors.get(tag).ok_or_else(|| {
                    DoubleError::configuration(format!("no behavior registered for trait '{}'", tag))
                })?;
                if let Some(missing) = behavior
                    .required_fields()
                    .iter()
                    .find(|field| definition.field(field).is_none())
                {
                    return Err(DoubleError::configuration(format!(
                        "trait '{}' needs field '{}' on entity type '{}'",
                        tag,
                        missing,
                        definition.entity_type()
                    )));
                }
                Ok(Arc::clone(behavior))
            })
            .collect()
    }
}
