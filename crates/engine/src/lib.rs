//! Resolution engine for entity doubles
//!
//! This crate turns definitions into working doubles:
//! - reference: canonicalizes relational field input
//! - state: per-double write ledger for mutable doubles
//! - guardrail: operations no double can honestly perform
//! - resolver: entity, field-list and field-item builders plus behaviors
//! - double: the dispatcher applying the resolution order
//! - factory: catalog, behaviors and defaults; creates entity doubles
//!
//! Definitions are read-only templates; every double created from one owns
//! its state container and identity caches.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod double;
pub mod factory;
pub mod guardrail;
pub mod reference;
pub mod resolver;
pub mod state;

pub use double::{Double, DoubleEnv, DoubleKind, ResolutionStage};
pub use factory::DoubleFactory;
pub use guardrail::Guardrails;
pub use reference::{
    contains_references, extract_handles, has_unresolved_references, normalize, ReferenceTuple,
    ENTITY_KEY, TARGET_ID_KEY,
};
pub use resolver::behavior::{
    Behavior, BehaviorRegistry, ChangedBehavior, OwnerBehavior, PublishedBehavior,
};
pub use resolver::entity::{EntityFields, EntityResolverBuilder};
pub use resolver::field_item::VALUE_PROPERTY;
pub use resolver::field_list::FieldListBuilder;
pub use resolver::{Resolver, ResolverMap, PROPERTY_GET, PROPERTY_SET};
pub use state::MutableState;
