//! Field definitions

use super::MethodOverride;
use crate::context::ResolverContext;
use crate::error::Result;
use crate::handle::EntityHandle;
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Lazily evaluated field value
pub type FieldGenerator = Arc<dyn Fn(&ResolverContext) -> Value + Send + Sync>;

/// Modeled value of a field
#[derive(Clone)]
pub enum FieldValue {
    /// Single value
    Scalar(Value),
    /// Ordered list of values, one per item
    List(Vec<Value>),
    /// Generator evaluated once per access context
    Generator(FieldGenerator),
}

impl FieldValue {
    /// Evaluate into a raw value
    pub fn evaluate(&self, ctx: &ResolverContext) -> Value {
        match self {
            FieldValue::Scalar(v) => v.clone(),
            FieldValue::List(items) => Value::Array(items.clone()),
            FieldValue::Generator(generate) => generate(ctx),
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Scalar(v) => f.debug_tuple("Scalar").field(v).finish(),
            FieldValue::List(items) => f.debug_tuple("List").field(items).finish(),
            FieldValue::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

/// How the field's items are built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    /// Classify the evaluated value with reference detection
    #[default]
    Auto,
    /// Always plain-value items
    Plain,
    /// Always entity-reference items
    Reference,
}

/// A single field's modeled value
#[derive(Clone, Default)]
pub struct FieldDoubleDefinition {
    value: Option<FieldValue>,
    kind: FieldKind,
    methods: BTreeMap<String, MethodOverride>,
}

impl FieldDoubleDefinition {
    /// Field holding a single value
    pub fn value(value: impl Into<Value>) -> Self {
        Self {
            value: Some(FieldValue::Scalar(value.into())),
            ..Self::default()
        }
    }

    /// Field holding an ordered list of values
    pub fn list<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Self {
            value: Some(FieldValue::List(items.into_iter().map(Into::into).collect())),
            ..Self::default()
        }
    }

    /// Field computed when first accessed on a double
    pub fn generator<F>(generate: F) -> Self
    where
        F: Fn(&ResolverContext) -> Value + Send + Sync + 'static,
    {
        Self {
            value: Some(FieldValue::Generator(Arc::new(generate))),
            ..Self::default()
        }
    }

    /// Field with no value
    pub fn empty() -> Self {
        Self::default()
    }

    /// Force entity-reference items, e.g. for an empty reference field
    pub fn references(mut self) -> Self {
        self.kind = FieldKind::Reference;
        self
    }

    /// Force plain-value items
    pub fn plain(mut self) -> Self {
        self.kind = FieldKind::Plain;
        self
    }

    /// Override a method on this field's list double
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    /// Modeled value, if any
    pub fn field_value(&self) -> Option<&FieldValue> {
        self.value.as_ref()
    }

    /// Evaluate into a raw value (`Null` when the field has no value)
    pub fn evaluate(&self, ctx: &ResolverContext) -> Value {
        self.value
            .as_ref()
            .map(|v| v.evaluate(ctx))
            .unwrap_or(Value::Null)
    }

    /// Item classification
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// List-level overrides
    pub fn methods(&self) -> &BTreeMap<String, MethodOverride> {
        &self.methods
    }
}

impl fmt::Debug for FieldDoubleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDoubleDefinition")
            .field("value", &self.value)
            .field("kind", &self.kind)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl From<Value> for FieldDoubleDefinition {
    fn from(v: Value) -> Self {
        match v {
            Value::Array(items) => FieldDoubleDefinition::list(items),
            other => FieldDoubleDefinition::value(other),
        }
    }
}

impl From<&str> for FieldDoubleDefinition {
    fn from(s: &str) -> Self {
        FieldDoubleDefinition::value(s)
    }
}

impl From<String> for FieldDoubleDefinition {
    fn from(s: String) -> Self {
        FieldDoubleDefinition::value(s)
    }
}

impl From<i64> for FieldDoubleDefinition {
    fn from(i: i64) -> Self {
        FieldDoubleDefinition::value(i)
    }
}

impl From<i32> for FieldDoubleDefinition {
    fn from(i: i32) -> Self {
        FieldDoubleDefinition::value(i)
    }
}

impl From<bool> for FieldDoubleDefinition {
    fn from(b: bool) -> Self {
        FieldDoubleDefinition::value(b)
    }
}

impl From<EntityHandle> for FieldDoubleDefinition {
    fn from(h: EntityHandle) -> Self {
        FieldDoubleDefinition::value(h)
    }
}

impl From<Vec<Value>> for FieldDoubleDefinition {
    fn from(items: Vec<Value>) -> Self {
        FieldDoubleDefinition::list(items)
    }
}

impl From<serde_json::Value> for FieldDoubleDefinition {
    fn from(v: serde_json::Value) -> Self {
        FieldDoubleDefinition::from(Value::from(v))
    }
}
