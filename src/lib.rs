//! Entity doubles - declarative test doubles for entity models
//!
//! Describe an entity (identity, fields, capabilities, overrides) once and
//! get back an object that answers calls through a fixed resolution order,
//! without a mocking framework.
//!
//! # Quick Start
//!
//! ```
//! use entity_doubles::{DoubleFactory, Value};
//!
//! let factory = DoubleFactory::new();
//! let definition = factory
//!     .definition("node")
//!     .bundle("article")
//!     .id(42)
//!     .fieldable()
//!     .field("title", "Hello")
//!     .build()
//!     .unwrap();
//!
//! let node = factory.create(definition).unwrap();
//! assert_eq!(node.call("id", &[]).unwrap(), Value::Int(42));
//!
//! let title = node.property("title").unwrap();
//! let title = title.as_double().unwrap();
//! assert_eq!(title.property("value").unwrap(), Value::from("Hello"));
//! ```
//!
//! # Architecture
//!
//! `double-core` holds the value model and the definition layer;
//! `double-engine` holds the normalizer, state, guardrails, resolver
//! builders and the dispatcher. Both are re-exported here.

pub use double_core::*;
pub use double_engine::*;
