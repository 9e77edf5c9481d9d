//! Environment variable layer.
//!
//! Configuration overrides are read from an [`EnvLayer`] rather than from
//! `std::env` directly, so tests can supply their own variables.

use std::collections::HashMap;

/// A named set of environment variables.
///
/// # Example
///
/// ```
/// use rigup::config::EnvLayer;
///
/// let mut layer = EnvLayer::new("ci");
/// layer.set("RIGUP_DRY_RUN", "true");
///
/// assert_eq!(layer.get("RIGUP_DRY_RUN"), Some("true"));
/// assert_eq!(layer.source, "ci");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvLayer {
    /// Variables in this layer.
    pub vars: HashMap<String, String>,
    /// Source of this layer (for debugging).
    pub source: String,
}

impl EnvLayer {
    /// Create a new layer with the given source name.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            vars: HashMap::new(),
            source: source.into(),
        }
    }

    /// Capture the `RIGUP_*` variables of the current process.
    pub fn from_system() -> Self {
        let mut layer = Self::new("process environment");
        for (key, value) in std::env::vars() {
            if key.starts_with("RIGUP_") {
                layer.set(key, value);
            }
        }
        layer
    }

    /// Add a variable to this layer.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Get a variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Check if this layer has a variable.
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_contains_check() {
        let mut layer = EnvLayer::new("test");
        layer.set("KEY", "value");

        assert!(layer.contains("KEY"));
        assert!(!layer.contains("OTHER"));
    }

    #[test]
    fn layer_len_and_is_empty() {
        let mut layer = EnvLayer::new("test");
        assert!(layer.is_empty());
        assert_eq!(layer.len(), 0);

        layer.set("KEY", "value");
        assert!(!layer.is_empty());
        assert_eq!(layer.len(), 1);
    }

    #[test]
    fn later_set_replaces_value() {
        let mut layer = EnvLayer::new("test");
        layer.set("KEY", "one");
        layer.set("KEY", "two");
        assert_eq!(layer.get("KEY"), Some("two"));
    }

    #[test]
    fn system_layer_only_keeps_prefixed_vars() {
        let layer = EnvLayer::from_system();
        assert!(layer.vars.keys().all(|k| k.starts_with("RIGUP_")));
    }
}
