//! Entity handles
//!
//! An [`EntityHandle`] is what relational field values point at: either an
//! [`EntityStub`] built in a test, or another produced entity double. The
//! engine only needs the entity type and identifier of a handle, so both
//! sides meet at the [`EntityLike`] trait.

use crate::value::Identifier;
use std::fmt;
use std::sync::Arc;

/// Minimal surface of an entity that can be referenced
pub trait EntityLike: Send + Sync {
    /// Entity type id (`node`, `user`, ...)
    fn entity_type(&self) -> &str;

    /// Identifier, `None` for not-yet-saved entities
    fn id(&self) -> Option<Identifier>;

    /// Bundle, when known
    fn bundle(&self) -> Option<String> {
        None
    }

    /// Human label, when known
    fn label(&self) -> Option<String> {
        None
    }
}

/// Shared handle to an entity
///
/// Cloning shares the same entity; equality is object identity.
#[derive(Clone)]
pub struct EntityHandle(Arc<dyn EntityLike>);

impl EntityHandle {
    /// Wrap an entity
    pub fn new(entity: Arc<dyn EntityLike>) -> Self {
        EntityHandle(entity)
    }

    /// Create a handle backed by an [`EntityStub`]
    pub fn stub(entity_type: impl Into<String>, id: impl Into<Identifier>) -> Self {
        EntityHandle(Arc::new(EntityStub::new(entity_type, Some(id.into()))))
    }

    /// Create a handle for an entity that has no identifier yet
    pub fn unsaved(entity_type: impl Into<String>) -> Self {
        EntityHandle(Arc::new(EntityStub::new(entity_type, None)))
    }

    /// Entity type id
    pub fn entity_type(&self) -> &str {
        self.0.entity_type()
    }

    /// Identifier of the referenced entity
    pub fn id(&self) -> Option<Identifier> {
        self.0.id()
    }

    /// Bundle of the referenced entity
    pub fn bundle(&self) -> Option<String> {
        self.0.bundle()
    }

    /// Label of the referenced entity
    pub fn label(&self) -> Option<String> {
        self.0.label()
    }

    /// True if both handles point at the same entity object
    pub fn ptr_eq(&self, other: &EntityHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for EntityHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "EntityHandle({}:{})", self.entity_type(), id),
            None => write!(f, "EntityHandle({}:new)", self.entity_type()),
        }
    }
}

/// Plain entity handle with a fixed type and identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityStub {
    entity_type: String,
    id: Option<Identifier>,
    bundle: Option<String>,
    label: Option<String>,
}

impl EntityStub {
    /// Create a stub
    pub fn new(entity_type: impl Into<String>, id: Option<Identifier>) -> Self {
        Self {
            entity_type: entity_type.into(),
            id,
            bundle: None,
            label: None,
        }
    }

    /// Set the bundle
    pub fn with_bundle(mut self, bundle: impl Into<String>) -> Self {
        self.bundle = Some(bundle.into());
        self
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Convert into a shared handle
    pub fn into_handle(self) -> EntityHandle {
        EntityHandle::new(Arc::new(self))
    }
}

impl EntityLike for EntityStub {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn id(&self) -> Option<Identifier> {
        self.id.clone()
    }

    fn bundle(&self) -> Option<String> {
        self.bundle.clone()
    }

    fn label(&self) -> Option<String> {
        self.label.clone()
    }
}
