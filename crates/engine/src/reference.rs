//! Reference normalizer
//!
//! Relational field values arrive in several shapes. This module detects
//! them and canonicalizes every shape into [`ReferenceTuple`]s.
//!
//! ## Accepted input
//!
//! | Input | Result |
//! |-------|--------|
//! | bare handle | one tuple, `target_id` taken from the handle |
//! | `{entity: null}` | nothing (explicit empty reference) |
//! | `{entity: h}` / `{entity: h, target_id: X}` | one tuple; `X` must match `h`'s id |
//! | `{target_id: X}` | passed through unresolved |
//! | array of the above | element-wise, explicit empties skipped |
//! | `null` | nothing |
//!
//! Anything else is an invalid-reference error.

use double_core::{DoubleError, EntityHandle, Identifier, Result, Value};
use std::collections::BTreeMap;

/// Key holding the referenced entity
pub const ENTITY_KEY: &str = "entity";
/// Key holding the referenced entity's identifier
pub const TARGET_ID_KEY: &str = "target_id";

/// One normalized relational reference
///
/// `entity == None` is the target-id-only form: the reference names an
/// entity by id but no handle has been resolved for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTuple {
    /// Referenced entity, when resolved
    pub entity: Option<EntityHandle>,
    /// Identifier of the referenced entity
    pub target_id: Option<Identifier>,
}

impl ReferenceTuple {
    /// Tuple for a resolved handle
    pub fn resolved(entity: EntityHandle) -> Self {
        let target_id = entity.id();
        Self {
            entity: Some(entity),
            target_id,
        }
    }

    /// Target-id-only tuple
    pub fn unresolved(target_id: Option<Identifier>) -> Self {
        Self {
            entity: None,
            target_id,
        }
    }

    /// True if a handle is present
    pub fn is_resolved(&self) -> bool {
        self.entity.is_some()
    }

    /// Render in canonical map form, which is valid normalizer input
    ///
    /// Target-id-only tuples keep their original shape (no `entity` key).
    pub fn to_value(&self) -> Value {
        let mut map = BTreeMap::new();
        if let Some(entity) = &self.entity {
            map.insert(ENTITY_KEY.to_string(), Value::Entity(entity.clone()));
        }
        map.insert(
            TARGET_ID_KEY.to_string(),
            self.target_id
                .as_ref()
                .map(Identifier::to_value)
                .unwrap_or(Value::Null),
        );
        Value::Map(map)
    }
}

/// Detect whether a raw value plausibly encodes relational references
///
/// Does not validate: `{entity: null}` is detected even though it
/// normalizes to nothing.
pub fn contains_references(value: &Value) -> bool {
    match value {
        Value::Entity(_) => true,
        Value::Map(map) => map.contains_key(ENTITY_KEY) || map.contains_key(TARGET_ID_KEY),
        Value::Array(items) => items.iter().any(contains_references),
        _ => false,
    }
}

/// Canonicalize relational input into reference tuples
pub fn normalize(value: &Value) -> Result<Vec<ReferenceTuple>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if matches!(item, Value::Array(_)) {
                    return Err(DoubleError::invalid_reference(
                        "nested sequences are not a reference shape",
                    ));
                }
                out.extend(normalize_one(item)?);
            }
            Ok(out)
        }
        other => Ok(normalize_one(other)?.into_iter().collect()),
    }
}

/// Normalize a single element; `None` is the explicit empty reference
fn normalize_one(value: &Value) -> Result<Option<ReferenceTuple>> {
    match value {
        Value::Entity(handle) => Ok(Some(ReferenceTuple::resolved(handle.clone()))),
        Value::Map(map) => normalize_map(map),
        Value::Null => Ok(None),
        other => Err(DoubleError::invalid_reference(format!(
            "{} value is not a reference; expected an entity handle or a map with '{}' or '{}'",
            other.type_name(),
            ENTITY_KEY,
            TARGET_ID_KEY
        ))),
    }
}

fn normalize_map(map: &BTreeMap<String, Value>) -> Result<Option<ReferenceTuple>> {
    let target_id = match map.get(TARGET_ID_KEY) {
        None | Some(Value::Null) => None,
        Some(raw) => Some(Identifier::from_value(raw).ok_or_else(|| {
            DoubleError::invalid_reference(format!(
                "'{}' must be an integer or string, got {}",
                TARGET_ID_KEY,
                raw.type_name()
            ))
        })?),
    };

    match map.get(ENTITY_KEY) {
        None if map.contains_key(TARGET_ID_KEY) => Ok(Some(ReferenceTuple::unresolved(target_id))),
        None => Err(DoubleError::invalid_reference(format!(
            "map carries neither '{}' nor '{}'",
            ENTITY_KEY, TARGET_ID_KEY
        ))),
        Some(Value::Null) => Ok(None),
        Some(Value::Entity(handle)) => {
            let actual = handle.id();
            if let Some(provided) = &target_id {
                let matches = actual
                    .as_ref()
                    .map(|actual| provided.matches(actual))
                    .unwrap_or(false);
                if !matches {
                    return Err(DoubleError::identifier_mismatch(provided, actual));
                }
            }
            Ok(Some(ReferenceTuple::resolved(handle.clone())))
        }
        Some(other) => Err(DoubleError::invalid_reference(format!(
            "'{}' must be an entity handle or null, got {}",
            ENTITY_KEY,
            other.type_name()
        ))),
    }
}

/// Resolved handles keyed by their position in `items`
///
/// Target-id-only positions are omitted.
pub fn extract_handles(items: &[ReferenceTuple]) -> BTreeMap<usize, EntityHandle> {
    items
        .iter()
        .enumerate()
        .filter_map(|(delta, item)| item.entity.clone().map(|entity| (delta, entity)))
        .collect()
}

/// True if any item carries a `target_id` without an entity
///
/// Callers check this before handle-dependent operations, which would
/// otherwise under-report silently.
pub fn has_unresolved_references(items: &[ReferenceTuple]) -> bool {
    items
        .iter()
        .any(|item| item.entity.is_none() && item.target_id.is_some())
}
