//! Entity-level builder
//!
//! Identity accessors for every entity double; field access when the
//! definition declares `fieldable`. Field lists are cached per field name
//! for the lifetime of the entity double, so `get("title")` and the
//! `title` property return the same list object every time.

use super::field_list::FieldListBuilder;
use super::{arg, arg_str, ResolverMap, PROPERTY_GET, PROPERTY_SET};
use crate::double::{Double, DoubleEnv, DoubleKind, DoubleParts};
use crate::state::MutableState;
use double_core::{
    Capability, EntityDoubleDefinition, Identifier, Result, ResolverContext, Value,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::trace;

/// Field lists of one entity double, built on first access
pub struct EntityFields {
    ctx: ResolverContext,
    state: Option<Arc<MutableState>>,
    env: Arc<DoubleEnv>,
    cache: Mutex<HashMap<String, Arc<Double>>>,
}

impl EntityFields {
    /// Empty cache over the entity's context and state
    pub fn new(ctx: ResolverContext, state: Option<Arc<MutableState>>, env: Arc<DoubleEnv>) -> Self {
        Self {
            ctx,
            state,
            env,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Definition the entity was built from
    pub fn definition(&self) -> &Arc<EntityDoubleDefinition> {
        self.ctx.definition()
    }

    /// The list double for a field
    ///
    /// Fails with an unknown-field error for undeclared fields.
    pub fn field(&self, name: &str) -> Result<Arc<Double>> {
        let mut cache = self.cache.lock();
        if let Some(list) = cache.get(name) {
            trace!(field = name, "field cache hit");
            return Ok(Arc::clone(list));
        }
        let list = FieldListBuilder::new(
            &self.ctx,
            name,
            self.state.clone(),
            Arc::clone(&self.env),
        )?
        .build();
        cache.insert(name.to_string(), Arc::clone(&list));
        Ok(list)
    }

    /// Raw value of the first item's property, `Null` when absent
    pub fn first_property(&self, field: &str, property: &str) -> Result<Value> {
        self.field(field)?
            .call(PROPERTY_GET, &[Value::from(property)])
    }

    /// Whole-field write
    pub fn set(&self, field: &str, value: Value) -> Result<()> {
        self.field(field)?.call("setValue", &[value])?;
        Ok(())
    }
}

/// Builds the entity-level resolvers
pub struct EntityResolverBuilder {
    fields: Arc<EntityFields>,
}

impl EntityResolverBuilder {
    /// Builder over a fresh field cache
    pub fn new(ctx: ResolverContext, state: Option<Arc<MutableState>>, env: Arc<DoubleEnv>) -> Self {
        Self {
            fields: Arc::new(EntityFields::new(ctx, state, env)),
        }
    }

    /// Field cache shared with behavior resolvers
    pub fn fields(&self) -> &Arc<EntityFields> {
        &self.fields
    }

    /// Core resolvers of the entity
    pub fn resolvers(&self) -> ResolverMap {
        let definition = Arc::clone(self.fields.definition());
        let mut map = ResolverMap::new();

        let id = definition.id().map(Identifier::to_value).unwrap_or(Value::Null);
        map.insert("id", move |_, _| Ok(id.clone()));

        let uuid = Value::from(definition.uuid().map(str::to_string));
        map.insert("uuid", move |_, _| Ok(uuid.clone()));

        let label = Value::from(definition.label().map(str::to_string));
        map.insert("label", move |_, _| Ok(label.clone()));

        let bundle = Value::from(definition.bundle());
        map.insert("bundle", move |_, _| Ok(bundle.clone()));

        let entity_type = Value::from(definition.entity_type());
        map.insert("getEntityTypeId", move |_, _| Ok(entity_type.clone()));

        let is_new = definition.id().is_none();
        map.insert("isNew", move |_, _| Ok(Value::Bool(is_new)));

        if definition.supports(&Capability::FIELDABLE) {
            self.fieldable(&mut map);
        }
        map
    }

    fn fieldable(&self, map: &mut ResolverMap) {
        map.insert("hasField", |ctx, args| {
            let name = arg_str("hasField", args, 0)?;
            Ok(Value::Bool(ctx.definition().field(name).is_some()))
        });

        let env = Arc::clone(&self.fields.env);
        map.insert("getFieldDefinition", move |ctx, args| {
            let name = arg_str("getFieldDefinition", args, 0)?;
            if ctx.definition().field(name).is_none() {
                return Ok(Value::Null);
            }
            Ok(field_definition(ctx, name, Arc::clone(&env)).to_value())
        });

        map.insert("getFieldDefinitions", |ctx, _| {
            Ok(Value::Array(
                ctx.definition()
                    .fields()
                    .keys()
                    .map(|name| Value::from(name.as_str()))
                    .collect(),
            ))
        });

        let fields = Arc::clone(&self.fields);
        map.insert("get", move |_, args| {
            Ok(fields.field(arg_str("get", args, 0)?)?.to_value())
        });
        map.alias(PROPERTY_GET, "get");

        let fields = Arc::clone(&self.fields);
        map.insert("set", move |_, args| {
            let name = arg_str("set", args, 0)?;
            fields.set(name, arg("set", args, 1)?.clone())?;
            Ok(Value::Null)
        });
        map.alias(PROPERTY_SET, "set");

        let fields = Arc::clone(&self.fields);
        map.insert("toArray", move |ctx, _| {
            let mut out = BTreeMap::new();
            for name in ctx.definition().fields().keys() {
                out.insert(name.clone(), fields.field(name)?.call("getValue", &[])?);
            }
            Ok(Value::Map(out))
        });
    }
}

/// Minimal field definition double carrying only the name
fn field_definition(ctx: &ResolverContext, name: &str, env: Arc<DoubleEnv>) -> Arc<Double> {
    let field_name = Value::from(name);
    let mut resolvers = ResolverMap::new();
    resolvers.insert("getName", move |_, _| Ok(field_name.clone()));
    Arc::new(Double::new(DoubleParts {
        kind: DoubleKind::FieldDefinition,
        name: format!("{}.{} definition", ctx.definition().entity_type(), name),
        capabilities: vec![Capability::FIELD_DEFINITION],
        primary: Some(Capability::FIELD_DEFINITION),
        overrides: BTreeMap::new(),
        resolvers,
        context: ctx.for_field(name),
        env,
    }))
}
