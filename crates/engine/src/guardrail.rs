//! Guardrail enforcer
//!
//! Operations that no double can honestly perform, because they need a
//! live persistence layer, routing, access control or other services.
//! Calling one without an explicit override fails loudly with the reason
//! instead of silently returning a default, even on lenient doubles.

/// Guarded methods and the reason each is unsupported
const GUARDED_METHODS: &[(&str, &str)] = &[
    ("save", "saving requires a live entity storage backend"),
    ("delete", "deleting requires a live entity storage backend"),
    (
        "createDuplicate",
        "duplicating requires entity storage and a UUID generator service",
    ),
    ("access", "access checks require the entity access control handler"),
    ("toUrl", "URL generation requires the routing system"),
    ("toLink", "link generation requires the routing system"),
    ("getTranslation", "translations require the language manager"),
    (
        "validate",
        "validation requires the typed data manager and constraint plugins",
    ),
];

/// Classifies method names as guarded or not
#[derive(Debug, Clone, Copy, Default)]
pub struct Guardrails;

impl Guardrails {
    /// The fixed guardrail table
    pub fn new() -> Self {
        Guardrails
    }

    /// True if the method is deliberately unsupported
    pub fn is_guarded(&self, method: &str) -> bool {
        self.reason_for(method).is_some()
    }

    /// Human-readable reason the method is unsupported
    pub fn reason_for(&self, method: &str) -> Option<&'static str> {
        GUARDED_METHODS
            .iter()
            .find(|(name, _)| *name == method)
            .map(|(_, reason)| *reason)
    }

    /// All guarded methods with their reasons
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        GUARDED_METHODS.iter().copied()
    }
}
