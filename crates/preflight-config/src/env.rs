//! Immutable snapshot of the process environment.
//!
//! # Design
//! - Captured once at startup and passed by reference into every consumer, so
//!   configuration decisions never read the live process environment ad hoc.
//! - Test suites build snapshots from literal pairs instead of mutating the
//!   real environment.

use std::collections::BTreeMap;

/// Read-only name → value view of the process environment.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Capture the current process environment. Variables whose name or value
    /// is not valid Unicode are skipped.
    #[must_use]
    pub fn from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    /// Build a snapshot from literal pairs.
    #[must_use]
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let vars = pairs
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        Self { vars }
    }

    /// Value of `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Whether `name` is present with a non-blank value.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(|value| !value.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_exposes_values() {
        let env = Environment::from_pairs([("PORT", "8080"), ("RENDER", "1")]);
        assert_eq!(env.get("PORT"), Some("8080"));
        assert_eq!(env.get("MISSING"), None);
    }

    #[test]
    fn is_set_requires_non_blank_value() {
        let env = Environment::from_pairs([("RENDER", "1"), ("VERCEL", "  ")]);
        assert!(env.is_set("RENDER"));
        assert!(!env.is_set("VERCEL"));
        assert!(!env.is_set("RAILWAY_ENVIRONMENT"));
    }
}
