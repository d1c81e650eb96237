//! Error types for entity doubles
//!
//! Every failure raised by a definition, the reference normalizer or a
//! produced double is a [`DoubleError`]. We use `thiserror` for automatic
//! `Display` and `Error` trait implementations.
//!
//! # Categories
//!
//! | Category | Variants | Raised when |
//! |----------|----------|-------------|
//! | Construction | `Configuration` | A definition or config is invalid |
//! | References | `IdentifierMismatch`, `InvalidReference`, `UnresolvedReference` | Relational input is inconsistent |
//! | Writes | `Immutable` | A field write hits a non-mutable double |
//! | Dispatch | `Unsupported`, `MissingResolver`, `InvalidArgument`, `UnknownField` | A call cannot be answered |

use thiserror::Error;

/// Result type alias for double operations
pub type Result<T> = std::result::Result<T, DoubleError>;

/// Error types for entity doubles
///
/// Errors are raised synchronously at the offending call. Lenient doubles
/// soften `MissingResolver` only; every other variant always propagates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DoubleError {
    /// Invalid definition, capability set or configuration file
    #[error("configuration error: {reason}")]
    Configuration {
        /// What was wrong
        reason: String,
    },

    /// Explicit `target_id` disagrees with the referenced entity's own id
    #[error("identifier mismatch: target_id {provided} does not match the referenced entity id {actual}")]
    IdentifierMismatch {
        /// The `target_id` the caller supplied
        provided: String,
        /// The entity's own identifier (`null` if it has none)
        actual: String,
    },

    /// Write attempted on a double built with `mutable = false`
    #[error("field '{field}' is immutable: build the double with mutable(true) to allow writes")]
    Immutable {
        /// Field the write targeted
        field: String,
    },

    /// Guardrail-matched method invoked without an override
    #[error("unsupported operation '{method}': {reason}")]
    Unsupported {
        /// Method that was called
        method: String,
        /// Registered human-readable reason
        reason: String,
    },

    /// No override, resolver, guardrail or leniency applied
    #[error("no resolver for method '{method}' declared by capability '{capability}'")]
    MissingResolver {
        /// Method that was called
        method: String,
        /// Capability declaring the method, or `unknown`
        capability: String,
    },

    /// Handle-dependent access on items that only carry a `target_id`
    #[error("field '{field}' holds references without a loaded entity (target_id only)")]
    UnresolvedReference {
        /// Field whose items are unresolved
        field: String,
    },

    /// Field access for a name the definition does not model
    #[error("field '{field}' is unknown on entity type '{entity_type}'")]
    UnknownField {
        /// Entity type of the double
        entity_type: String,
        /// Requested field name
        field: String,
    },

    /// Value that cannot be read as a relational reference
    #[error("invalid reference: {reason}")]
    InvalidReference {
        /// What was wrong with the input
        reason: String,
    },

    /// Call arguments do not fit the method
    #[error("invalid argument for '{method}': {reason}")]
    InvalidArgument {
        /// Method that was called
        method: String,
        /// What was wrong with the arguments
        reason: String,
    },
}

impl DoubleError {
    /// Create a configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        DoubleError::Configuration {
            reason: reason.into(),
        }
    }

    /// Create an identifier mismatch error
    pub fn identifier_mismatch(provided: impl ToString, actual: Option<impl ToString>) -> Self {
        DoubleError::IdentifierMismatch {
            provided: provided.to_string(),
            actual: actual
                .map(|id| id.to_string())
                .unwrap_or_else(|| "null".to_string()),
        }
    }

    /// Create an immutability error
    pub fn immutable(field: impl Into<String>) -> Self {
        DoubleError::Immutable {
            field: field.into(),
        }
    }

    /// Create an unsupported-operation error
    pub fn unsupported(method: impl Into<String>, reason: impl Into<String>) -> Self {
        DoubleError::Unsupported {
            method: method.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing-resolver error
    pub fn missing_resolver(method: impl Into<String>, capability: impl Into<String>) -> Self {
        DoubleError::MissingResolver {
            method: method.into(),
            capability: capability.into(),
        }
    }

    /// Create an unresolved-reference error
    pub fn unresolved_reference(field: impl Into<String>) -> Self {
        DoubleError::UnresolvedReference {
            field: field.into(),
        }
    }

    /// Create an unknown-field error
    pub fn unknown_field(entity_type: impl Into<String>, field: impl Into<String>) -> Self {
        DoubleError::UnknownField {
            entity_type: entity_type.into(),
            field: field.into(),
        }
    }

    /// Create an invalid-reference error
    pub fn invalid_reference(reason: impl Into<String>) -> Self {
        DoubleError::InvalidReference {
            reason: reason.into(),
        }
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(method: impl Into<String>, reason: impl Into<String>) -> Self {
        DoubleError::InvalidArgument {
            method: method.into(),
            reason: reason.into(),
        }
    }
}
