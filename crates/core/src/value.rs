//! Value types for entity doubles
//!
//! This module defines:
//! - Value: the dynamic value passed to and returned from resolvers
//! - Identifier: an entity identifier (integer or string)
//! - DoubleObject / DoubleRef: the object-safe surface of a produced double
//!
//! ## Equality
//!
//! Data variants compare structurally; `Int(1) != Float(1.0)` and different
//! variants are never equal. `Entity` and `Double` compare by object
//! identity, since callers rely on getting back the exact same object.

use crate::error::Result;
use crate::handle::EntityHandle;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Dynamic value model for field data, call arguments and results
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Ordered sequence of values
    Array(Vec<Value>),
    /// String-keyed map, ordered by key
    Map(BTreeMap<String, Value>),
    /// Handle to an entity (a stub or another double)
    Entity(EntityHandle),
    /// A produced double (field list, field item, field definition)
    Double(DoubleRef),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Entity(a), Value::Entity(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Build a map value from key/value pairs
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Array(_) => "Array",
            Value::Map(_) => "Map",
            Value::Entity(_) => "Entity",
            Value::Double(_) => "Double",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Empty in the field-item sense: null, empty string, empty array, or a
    /// map whose values are all empty
    pub fn is_empty_like(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(a) => a.is_empty(),
            Value::Map(m) => m.values().all(Value::is_empty_like),
            _ => false,
        }
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as &[Value] if this is an Array value
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as map if this is a Map value
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Get the entity handle if this is an Entity value
    pub fn as_entity(&self) -> Option<&EntityHandle> {
        match self {
            Value::Entity(h) => Some(h),
            _ => None,
        }
    }

    /// Get the double if this is a Double value
    pub fn as_double(&self) -> Option<&DoubleRef> {
        match self {
            Value::Double(d) => Some(d),
            _ => None,
        }
    }

    /// Loose truthiness, used by boolean-flavored fields such as `status`
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty() && s != "0",
            Value::Array(a) => !a.is_empty(),
            Value::Map(m) => !m.is_empty(),
            Value::Entity(_) | Value::Double(_) => true,
        }
    }

    /// Render for diagnostics
    ///
    /// Entities become `{entity_type, id}` objects and doubles their kind
    /// label; non-finite floats become null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(a) => serde_json::Value::Array(a.iter().map(Value::to_json).collect()),
            Value::Map(m) => serde_json::Value::Object(
                m.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::Entity(h) => serde_json::json!({
                "entity_type": h.entity_type(),
                "id": h.id().map(|id| id.to_value().to_json()),
            }),
            Value::Double(d) => serde_json::Value::String(format!("<{} double>", d.kind())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Value::Array(a)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(m: BTreeMap<String, Value>) -> Self {
        Value::Map(m)
    }
}

impl From<EntityHandle> for Value {
    fn from(h: EntityHandle) -> Self {
        Value::Entity(h)
    }
}

impl From<Identifier> for Value {
    fn from(id: Identifier) -> Self {
        id.to_value()
    }
}

impl From<DoubleRef> for Value {
    fn from(d: DoubleRef) -> Self {
        Value::Double(d)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    // u64 beyond i64 range lands here too
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Map(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

// ============================================================================
// Identifier
// ============================================================================

/// Entity identifier
///
/// Matching is loose: `Int(42)` matches `String("42")`, the way identifiers
/// arrive from forms and routes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    /// Numeric identifier
    Int(i64),
    /// String identifier (machine names, external ids)
    String(String),
}

impl Identifier {
    /// Read an identifier from a value
    ///
    /// Returns `None` for anything that is not an integer or string.
    pub fn from_value(value: &Value) -> Option<Identifier> {
        match value {
            Value::Int(i) => Some(Identifier::Int(*i)),
            Value::String(s) => Some(Identifier::String(s.clone())),
            _ => None,
        }
    }

    /// Convert into a value
    pub fn to_value(&self) -> Value {
        match self {
            Identifier::Int(i) => Value::Int(*i),
            Identifier::String(s) => Value::String(s.clone()),
        }
    }

    /// Loose comparison across representations
    pub fn matches(&self, other: &Identifier) -> bool {
        match (self, other) {
            (Identifier::Int(a), Identifier::Int(b)) => a == b,
            (Identifier::String(a), Identifier::String(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Int(i) => write!(f, "{}", i),
            Identifier::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(i: i64) -> Self {
        Identifier::Int(i)
    }
}

impl From<i32> for Identifier {
    fn from(i: i32) -> Self {
        Identifier::Int(i as i64)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier::String(s.to_string())
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Identifier::String(s)
    }
}

// ============================================================================
// Produced doubles as values
// ============================================================================

/// Object-safe surface of a produced double
///
/// Implemented by the engine's dispatcher. Lets resolvers hand doubles back
/// as plain values while preserving object identity.
pub trait DoubleObject: Send + Sync + fmt::Debug {
    /// Kind label (`entity`, `field_list`, ...)
    fn kind(&self) -> &'static str;

    /// Invoke a method through the double's resolution order
    fn call(&self, method: &str, args: &[Value]) -> Result<Value>;

    /// Downcast support
    fn as_any(&self) -> &dyn Any;
}

/// Shared reference to a produced double
///
/// Equality is object identity.
#[derive(Debug, Clone)]
pub struct DoubleRef(Arc<dyn DoubleObject>);

impl DoubleRef {
    /// Wrap a double
    pub fn new(double: Arc<dyn DoubleObject>) -> Self {
        DoubleRef(double)
    }

    /// Kind label of the wrapped double
    pub fn kind(&self) -> &'static str {
        self.0.kind()
    }

    /// Invoke a method on the wrapped double
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        self.0.call(method, args)
    }

    /// Property-style read, sugar for `__get`
    pub fn property(&self, name: &str) -> Result<Value> {
        self.0.call("__get", &[Value::from(name)])
    }

    /// Property-style write, sugar for `__set`
    pub fn set_property(&self, name: &str, value: impl Into<Value>) -> Result<Value> {
        self.0.call("__set", &[Value::from(name), value.into()])
    }

    /// True if both refer to the same double
    pub fn ptr_eq(&self, other: &DoubleRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Downcast to a concrete double type
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Access the shared pointer
    pub fn inner(&self) -> &Arc<dyn DoubleObject> {
        &self.0
    }
}

impl PartialEq for DoubleRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}
