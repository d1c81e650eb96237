//! Resolution layer
//!
//! Builders that turn a definition into a [`ResolverMap`]: method name to
//! a resolver of shape `(context, args) -> result`. The map is the only
//! thing a dispatcher (or an external mock adapter) needs to wire a double.
//!
//! - [`entity`]: identity, field presence and cached field access
//! - [`field_list`]: positional access, raw values, referenced entities
//! - [`field_item`]: property reads and state-checked writes
//! - [`behavior`]: mixins applied after base resolution

pub mod behavior;
pub mod entity;
pub mod field_item;
pub mod field_list;

use double_core::{DoubleError, Result, ResolverContext, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Method implementation wired onto a double
pub type Resolver = Arc<dyn Fn(&ResolverContext, &[Value]) -> Result<Value> + Send + Sync>;

/// Method used for property-style reads
pub const PROPERTY_GET: &str = "__get";
/// Method used for property-style writes
pub const PROPERTY_SET: &str = "__set";

/// Method name to resolver mapping
#[derive(Clone, Default)]
pub struct ResolverMap {
    resolvers: BTreeMap<String, Resolver>,
}

impl ResolverMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resolver
    pub fn insert<F>(&mut self, method: impl Into<String>, f: F)
    where
        F: Fn(&ResolverContext, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.resolvers.insert(method.into(), Arc::new(f));
    }

    /// Register an already shared resolver
    pub fn insert_resolver(&mut self, method: impl Into<String>, resolver: Resolver) {
        self.resolvers.insert(method.into(), resolver);
    }

    /// Register `alias` as the same resolver as `method`
    ///
    /// Property-style access uses this so it never becomes a separate
    /// code path. Does nothing if `method` is not registered.
    pub fn alias(&mut self, alias: impl Into<String>, method: &str) {
        if let Some(resolver) = self.resolvers.get(method).cloned() {
            self.resolvers.insert(alias.into(), resolver);
        }
    }

    /// Merge another map; its resolvers win on conflicts
    pub fn extend(&mut self, other: ResolverMap) {
        self.resolvers.extend(other.resolvers);
    }

    /// Look up a resolver
    pub fn get(&self, method: &str) -> Option<&Resolver> {
        self.resolvers.get(method)
    }

    /// True if the method has a resolver
    pub fn contains(&self, method: &str) -> bool {
        self.resolvers.contains_key(method)
    }

    /// Registered method names, sorted
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.resolvers.keys().map(String::as_str)
    }

    /// Number of resolvers
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// True if no resolver is registered
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl fmt::Debug for ResolverMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.resolvers.keys()).finish()
    }
}

pub(crate) fn arg<'a>(method: &str, args: &'a [Value], index: usize) -> Result<&'a Value> {
    args.get(index).ok_or_else(|| {
        DoubleError::invalid_argument(method, format!("expected an argument at position {}", index))
    })
}

pub(crate) fn arg_str<'a>(method: &str, args: &'a [Value], index: usize) -> Result<&'a str> {
    let value = arg(method, args, index)?;
    value.as_str().ok_or_else(|| {
        DoubleError::invalid_argument(
            method,
            format!("argument {} must be a string, got {}", index, value.type_name()),
        )
    })
}

pub(crate) fn arg_delta(method: &str, args: &[Value], index: usize) -> Result<usize> {
    match arg(method, args, index)? {
        Value::Int(i) if *i >= 0 => Ok(*i as usize),
        other => Err(DoubleError::invalid_argument(
            method,
            format!("argument {} must be a non-negative integer, got {}", index, other),
        )),
    }
}
