//! Identifier sequences
//!
//! Auto-incrementing ids for doubles that need distinct identifiers. A
//! sequence is created by the test that uses it and passed in explicitly,
//! so parallel tests never share a counter.

use crate::value::Identifier;
use std::sync::atomic::{AtomicI64, Ordering};

/// Monotonic integer id generator
#[derive(Debug)]
pub struct IdSequence {
    next: AtomicI64,
}

impl IdSequence {
    /// Sequence starting at 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Sequence starting at `start`
    pub fn starting_at(start: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
        }
    }

    /// Take the next identifier
    pub fn next_id(&self) -> Identifier {
        Identifier::Int(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Identifier the next call will return
    pub fn peek(&self) -> Identifier {
        Identifier::Int(self.next.load(Ordering::Relaxed))
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
