//! Core types for entity doubles
//!
//! This crate defines the foundational types used by the resolution engine:
//! - Value: dynamic value model for field data, arguments and results
//! - Identifier / EntityHandle: what relational field values point at
//! - Capability: named interfaces and the method catalog
//! - Definition layer: EntityDoubleDefinition, FieldDoubleDefinition, builder
//! - ResolverContext: context threaded to every resolver
//! - DoubleError: error type hierarchy
//! - DoubleConfig / IdSequence: configuration defaults and injected id state

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod capability;
pub mod config;
pub mod context;
pub mod definition;
pub mod error;
pub mod handle;
pub mod sequence;
pub mod value;

pub use capability::{Capability, CapabilityDefinition, CapabilityRegistry, ValueKind};
pub use config::{DoubleConfig, CONFIG_FILE_NAME};
pub use context::{ResolverContext, DEFINITION_CONTEXT_KEY};
pub use definition::{
    EntityDoubleDefinition, EntityDoubleDefinitionBuilder, FieldDoubleDefinition, FieldGenerator,
    FieldKind, FieldValue, MethodOverride,
};
pub use error::{DoubleError, Result};
pub use handle::{EntityHandle, EntityLike, EntityStub};
pub use sequence::IdSequence;
pub use value::{DoubleObject, DoubleRef, Identifier, Value};
