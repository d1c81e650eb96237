//! Field-list builder
//!
//! A field list wraps one field of an entity double. Its items are built
//! lazily and cached by delta, so the same delta always yields the same
//! item double. The underlying value is classified once, when the list is
//! built: reference-like values produce entity-reference items, anything
//! else plain-value items.

use super::field_item::FieldItemBuilder;
use super::{arg, arg_delta, ResolverMap, PROPERTY_GET, PROPERTY_SET};
use crate::double::{Double, DoubleEnv, DoubleKind, DoubleParts};
use crate::reference::{
    contains_references, extract_handles, has_unresolved_references, normalize, ReferenceTuple,
};
use crate::state::MutableState;
use double_core::{
    Capability, DoubleError, FieldKind, MethodOverride, Result, ResolverContext, Value,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::trace;

/// Raw items of one field, overlaid with the double's recorded writes
#[derive(Debug)]
pub(crate) struct FieldSource {
    field: String,
    reference: bool,
    original: Vec<Value>,
    state: Option<Arc<MutableState>>,
}

impl FieldSource {
    fn new(field: &str, kind: FieldKind, value: &Value, state: Option<Arc<MutableState>>) -> Result<Self> {
        let reference = match kind {
            FieldKind::Auto => contains_references(value),
            FieldKind::Plain => false,
            FieldKind::Reference => true,
        };
        let original = to_items(reference, value)?;
        Ok(Self {
            field: field.to_string(),
            reference,
            original,
            state,
        })
    }

    pub(crate) fn field(&self) -> &str {
        &self.field
    }

    pub(crate) fn is_reference(&self) -> bool {
        self.reference
    }

    fn base(&self) -> Vec<Value> {
        self.state
            .as_ref()
            .and_then(|state| state.read(&self.field, None))
            .and_then(|written| written.as_array().map(<[Value]>::to_vec))
            .unwrap_or_else(|| self.original.clone())
    }

    /// Number of items, counting items written past the end
    pub(crate) fn len(&self) -> usize {
        let written = self
            .state
            .as_ref()
            .and_then(|state| state.max_delta(&self.field))
            .map(|delta| delta + 1)
            .unwrap_or(0);
        self.base().len().max(written)
    }

    /// Current raw value of one item; `Null` past the end
    pub(crate) fn item(&self, delta: usize) -> Value {
        if let Some(written) = self
            .state
            .as_ref()
            .and_then(|state| state.read(&self.field, Some(delta)))
        {
            return written;
        }
        self.base().get(delta).cloned().unwrap_or(Value::Null)
    }

    /// Current raw values of all items
    pub(crate) fn items(&self) -> Vec<Value> {
        (0..self.len()).map(|delta| self.item(delta)).collect()
    }

    fn references(&self) -> Result<Vec<ReferenceTuple>> {
        normalize(&Value::Array(self.items()))
    }

    /// State to record into, or the immutability error for this field
    pub(crate) fn writable(&self, ctx: &ResolverContext) -> Result<&MutableState> {
        if !ctx.definition().is_mutable() {
            return Err(DoubleError::immutable(&self.field));
        }
        self.state
            .as_deref()
            .ok_or_else(|| DoubleError::immutable(&self.field))
    }

    /// Replace one item
    pub(crate) fn write_item(&self, ctx: &ResolverContext, delta: usize, value: &Value) -> Result<()> {
        let state = self.writable(ctx)?;
        let item = if self.reference {
            single_reference(value)?
        } else {
            value.clone()
        };
        state.write(&self.field, Some(delta), item);
        Ok(())
    }

    /// Replace every item
    pub(crate) fn write_all(&self, ctx: &ResolverContext, value: &Value) -> Result<()> {
        let state = self.writable(ctx)?;
        let items = to_items(self.reference, value)?;
        state.write(&self.field, None, Value::Array(items));
        Ok(())
    }
}

fn to_items(reference: bool, value: &Value) -> Result<Vec<Value>> {
    if reference {
        return Ok(normalize(value)?.iter().map(ReferenceTuple::to_value).collect());
    }
    Ok(match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    })
}

fn single_reference(value: &Value) -> Result<Value> {
    let mut tuples = normalize(value)?;
    match tuples.len() {
        0 => Ok(Value::Null),
        1 => Ok(tuples.remove(0).to_value()),
        n => Err(DoubleError::invalid_argument(
            "setValue",
            format!("a single item holds one reference, got {}", n),
        )),
    }
}

/// Item doubles of one list, cached by delta
pub(crate) struct FieldItems {
    name: String,
    source: Arc<FieldSource>,
    ctx: ResolverContext,
    env: Arc<DoubleEnv>,
    cache: Mutex<HashMap<usize, Arc<Double>>>,
}

impl FieldItems {
    pub(crate) fn item(&self, delta: usize) -> Arc<Double> {
        let mut cache = self.cache.lock();
        if let Some(item) = cache.get(&delta) {
            trace!(list = %self.name, delta, "item cache hit");
            return Arc::clone(item);
        }
        let item = FieldItemBuilder::new(
            format!("{}[{}]", self.name, delta),
            Arc::clone(&self.source),
            self.ctx.for_delta(delta),
            Arc::clone(&self.env),
        )
        .build();
        cache.insert(delta, Arc::clone(&item));
        item
    }
}

/// Builds the list double for one field of an entity
pub struct FieldListBuilder {
    name: String,
    source: Arc<FieldSource>,
    items: Arc<FieldItems>,
    ctx: ResolverContext,
    overrides: BTreeMap<String, MethodOverride>,
    env: Arc<DoubleEnv>,
}

impl FieldListBuilder {
    /// Prepare the list for `field`, evaluating its value once
    ///
    /// `ctx` is the entity-level context. Fails for fields the definition
    /// does not declare and for reference values that do not normalize.
    pub fn new(
        ctx: &ResolverContext,
        field: &str,
        state: Option<Arc<MutableState>>,
        env: Arc<DoubleEnv>,
    ) -> Result<Self> {
        let definition = ctx.definition();
        let field_definition = definition
            .field(field)
            .ok_or_else(|| DoubleError::unknown_field(definition.entity_type(), field))?;

        let ctx = ctx.for_field(field);
        let value = field_definition.evaluate(&ctx);
        let source = Arc::new(FieldSource::new(field, field_definition.kind(), &value, state)?);
        let name = format!("{}.{}", definition.entity_type(), field);
        let items = Arc::new(FieldItems {
            name: name.clone(),
            source: Arc::clone(&source),
            ctx: ctx.clone(),
            env: Arc::clone(&env),
            cache: Mutex::new(HashMap::new()),
        });

        Ok(Self {
            name,
            source,
            items,
            overrides: field_definition.methods().clone(),
            ctx,
            env,
        })
    }

    /// True if the list holds entity-reference items
    pub fn is_reference(&self) -> bool {
        self.source.is_reference()
    }

    /// Core resolvers of the list
    pub fn resolvers(&self) -> ResolverMap {
        let mut map = ResolverMap::new();

        let items = Arc::clone(&self.items);
        map.insert("first", move |_, _| Ok(items.item(0).to_value()));

        let (source, items) = (Arc::clone(&self.source), Arc::clone(&self.items));
        map.insert("get", move |_, args| {
            let delta = arg_delta("get", args, 0)?;
            if delta >= source.len() {
                return Ok(Value::Null);
            }
            Ok(items.item(delta).to_value())
        });

        let source = Arc::clone(&self.source);
        map.insert("isEmpty", move |_, _| {
            Ok(Value::Bool(source.items().iter().all(Value::is_empty_like)))
        });

        let source = Arc::clone(&self.source);
        map.insert("getValue", move |_, _| Ok(Value::Array(source.items())));

        let source = Arc::clone(&self.source);
        map.insert("setValue", move |ctx, args| {
            source.write_all(ctx, arg("setValue", args, 0)?)?;
            Ok(Value::Null)
        });

        let (source, items) = (Arc::clone(&self.source), Arc::clone(&self.items));
        map.insert("appendItem", move |ctx, args| {
            let value = args.first().cloned().unwrap_or(Value::Null);
            let delta = source.len();
            source.write_item(ctx, delta, &value)?;
            Ok(items.item(delta).to_value())
        });

        let source = Arc::clone(&self.source);
        map.insert("count", move |_, _| Ok(Value::from(source.len())));

        let source = Arc::clone(&self.source);
        map.insert("getName", move |_, _| Ok(Value::from(source.field())));

        let items = Arc::clone(&self.items);
        map.insert(PROPERTY_GET, move |_, args| items.item(0).call(PROPERTY_GET, args));

        let items = Arc::clone(&self.items);
        map.insert(PROPERTY_SET, move |_, args| items.item(0).call(PROPERTY_SET, args));

        if self.source.is_reference() {
            let source = Arc::clone(&self.source);
            map.insert("referencedEntities", move |_, _| {
                let references = source.references()?;
                if has_unresolved_references(&references) {
                    return Err(DoubleError::unresolved_reference(source.field()));
                }
                Ok(Value::Array(
                    extract_handles(&references)
                        .into_values()
                        .map(Value::Entity)
                        .collect(),
                ))
            });
        }

        map
    }

    /// Assemble the list double
    pub fn build(self) -> Arc<Double> {
        let mut capabilities = vec![Capability::FIELD_LIST];
        if self.source.is_reference() {
            capabilities.push(Capability::REFERENCE_LIST);
        }
        let resolvers = self.resolvers();
        Arc::new(Double::new(DoubleParts {
            kind: DoubleKind::FieldList,
            name: self.name,
            capabilities,
            primary: Some(Capability::FIELD_LIST),
            overrides: self.overrides,
            resolvers,
            context: self.ctx,
            env: self.env,
        }))
    }
}
