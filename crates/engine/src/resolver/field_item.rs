//! Field-item builder
//!
//! Plain items expose `value` for scalars, or their keys for map values.
//! Reference items expose `entity` and `target_id`. Reads go through the
//! list's source, so a write recorded in the state container is visible
//! to every later read of the same field and delta.

use super::field_list::FieldSource;
use super::{arg, arg_str, ResolverMap, PROPERTY_GET, PROPERTY_SET};
use crate::double::{Double, DoubleEnv, DoubleKind, DoubleParts};
use crate::reference::{ENTITY_KEY, TARGET_ID_KEY};
use double_core::{
    Capability, DoubleError, EntityHandle, Identifier, Result, ResolverContext, Value,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Property holding a plain item's scalar value
pub const VALUE_PROPERTY: &str = "value";

/// Builds the double for one item of a field list
pub(crate) struct FieldItemBuilder {
    name: String,
    source: Arc<FieldSource>,
    ctx: ResolverContext,
    env: Arc<DoubleEnv>,
}

impl FieldItemBuilder {
    pub(crate) fn new(
        name: String,
        source: Arc<FieldSource>,
        ctx: ResolverContext,
        env: Arc<DoubleEnv>,
    ) -> Self {
        Self {
            name,
            source,
            ctx,
            env,
        }
    }

    fn delta(&self) -> usize {
        self.ctx.delta().unwrap_or(0)
    }

    pub(crate) fn resolvers(&self) -> ResolverMap {
        let delta = self.delta();
        let mut map = ResolverMap::new();

        let source = Arc::clone(&self.source);
        map.insert("getValue", move |_, _| Ok(source.item(delta)));

        let source = Arc::clone(&self.source);
        map.insert("setValue", move |ctx, args| {
            source.write_item(ctx, delta, arg("setValue", args, 0)?)?;
            Ok(Value::Null)
        });

        let source = Arc::clone(&self.source);
        map.insert("isEmpty", move |_, _| {
            Ok(Value::Bool(source.item(delta).is_empty_like()))
        });

        let source = Arc::clone(&self.source);
        map.insert("get", move |_, args| {
            let name = arg_str("get", args, 0)?;
            Ok(read_property(source.is_reference(), &source.item(delta), name))
        });
        map.alias(PROPERTY_GET, "get");

        let source = Arc::clone(&self.source);
        map.insert("set", move |ctx, args| {
            let name = arg_str("set", args, 0)?;
            let value = arg("set", args, 1)?;
            source.writable(ctx)?;
            let next = if source.is_reference() {
                reference_property(&source.item(delta), name, value)?
            } else {
                plain_property(source.item(delta), name, value.clone())
            };
            source.write_item(ctx, delta, &next)?;
            Ok(Value::Null)
        });
        map.alias(PROPERTY_SET, "set");

        map
    }

    pub(crate) fn build(self) -> Arc<Double> {
        let mut capabilities = vec![Capability::FIELD_ITEM];
        if self.source.is_reference() {
            capabilities.push(Capability::REFERENCE_ITEM);
        }
        let resolvers = self.resolvers();
        Arc::new(Double::new(DoubleParts {
            kind: DoubleKind::FieldItem,
            name: self.name,
            capabilities,
            primary: Some(Capability::FIELD_ITEM),
            overrides: BTreeMap::new(),
            resolvers,
            context: self.ctx,
            env: self.env,
        }))
    }
}

fn read_property(reference: bool, item: &Value, name: &str) -> Value {
    match item {
        Value::Map(map) => map.get(name).cloned().unwrap_or(Value::Null),
        scalar if !reference && name == VALUE_PROPERTY => scalar.clone(),
        _ => Value::Null,
    }
}

fn plain_property(current: Value, name: &str, value: Value) -> Value {
    match current {
        Value::Map(mut map) => {
            map.insert(name.to_string(), value);
            Value::Map(map)
        }
        _ if name == VALUE_PROPERTY => value,
        Value::Null => Value::map([(name, value)]),
        scalar => Value::map([(VALUE_PROPERTY, scalar), (name, value)]),
    }
}

/// Raw reference input for a property write, normalized by the source
///
/// A `target_id` matching the current entity's id keeps the entity.
fn reference_property(current: &Value, name: &str, value: &Value) -> Result<Value> {
    match name {
        ENTITY_KEY => Ok(match value {
            Value::Null => Value::Null,
            Value::Entity(_) => Value::map([(ENTITY_KEY, value.clone())]),
            other => other.clone(),
        }),
        TARGET_ID_KEY => Ok(match (value, current_entity(current)) {
            (Value::Null, _) => Value::Null,
            (other, Some(entity)) if same_id(&entity, other) => Value::map([
                (ENTITY_KEY, Value::Entity(entity)),
                (TARGET_ID_KEY, other.clone()),
            ]),
            (other, _) => Value::map([(TARGET_ID_KEY, other.clone())]),
        }),
        other => Err(DoubleError::invalid_argument(
            "set",
            format!(
                "reference items expose '{}' and '{}', not '{}'",
                ENTITY_KEY, TARGET_ID_KEY, other
            ),
        )),
    }
}

fn current_entity(current: &Value) -> Option<EntityHandle> {
    current
        .as_map()
        .and_then(|map| map.get(ENTITY_KEY))
        .and_then(Value::as_entity)
        .cloned()
}

fn same_id(entity: &EntityHandle, value: &Value) -> bool {
    match (entity.id(), Identifier::from_value(value)) {
        (Some(actual), Some(provided)) => provided.matches(&actual),
        _ => false,
    }
}
