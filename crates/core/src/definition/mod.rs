//! Definition layer
//!
//! Immutable value objects describing what a double should look like:
//! entity identity, field values, supported capabilities, method
//! overrides, contextual data and the mutability/leniency flags.
//!
//! ## Usage
//!
//! ```
//! use double_core::{Capability, EntityDoubleDefinition, EntityHandle};
//!
//! let definition = EntityDoubleDefinition::builder("node")
//!     .bundle("article")
//!     .id(1)
//!     .label("Hello")
//!     .interface(Capability::FIELDABLE)
//!     .field("title", "Hello")
//!     .field("uid", EntityHandle::stub("user", 42))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(definition.bundle(), "article");
//! assert!(definition.fields().contains_key("uid"));
//! ```

pub mod builder;
pub mod entity;
pub mod field;

use crate::error::Result;
use crate::value::Value;
use std::sync::Arc;

pub use builder::EntityDoubleDefinitionBuilder;
pub use entity::EntityDoubleDefinition;
pub use field::{FieldDoubleDefinition, FieldGenerator, FieldKind, FieldValue};

/// Explicit method override
///
/// Called with the call arguments only; it bypasses the resolver context,
/// core resolvers and guardrails.
pub type MethodOverride = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;
