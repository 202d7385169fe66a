//! Rule registry boundary
//!
//! The resolver never knows which rules exist. It asks a [`RuleRegistry`]
//! whether a name is valid and which options a bare severity should carry.

use serde_json::Value;

/// Lookup of known rules and their defaults
pub trait RuleRegistry: Send + Sync {
    /// Whether `name` is a known rule
    fn contains(&self, name: &str) -> bool;

    /// Options applied when a rule is configured with a bare severity
    fn default_options(&self, _name: &str) -> Vec<Value> {
        Vec::new()
    }

    /// Closest known rule name, used in "did you mean" hints
    fn suggest(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Registry that accepts every rule name and supplies no defaults
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveRegistry;

impl RuleRegistry for PermissiveRegistry {
    fn contains(&self, _name: &str) -> bool {
        true
    }
}
