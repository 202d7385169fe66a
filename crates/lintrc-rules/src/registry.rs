//! Rule registry backed by the built-in catalog

use lintrc_core::RuleRegistry;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::catalog::{BuiltinRules, RuleMetadata};
use crate::plugins::{KNOWN_PLUGINS, plugin_rules};
use crate::util::find_best_match_for_name;

/// Registry of core rules plus the rule tables of registered plugins
#[derive(Debug, Clone)]
pub struct BuiltinRegistry {
    rules: BTreeMap<String, RuleMetadata>,
    plugins: Vec<String>,
}

impl BuiltinRegistry {
    /// Registry with the core rules only
    pub fn new() -> Self {
        let rules = BuiltinRules::all_rules()
            .into_iter()
            .map(|rule| (rule.id.clone(), rule))
            .collect();
        Self {
            rules,
            plugins: Vec::new(),
        }
    }

    /// Registry with the core rules and every known plugin
    pub fn with_all_plugins() -> Self {
        KNOWN_PLUGINS
            .iter()
            .fold(Self::new(), |registry, plugin| registry.with_plugin(plugin))
    }

    /// Add the rule table of `plugin`; unknown plugins are skipped
    pub fn with_plugin(mut self, plugin: &str) -> Self {
        self.register_plugin(plugin);
        self
    }

    /// Add the rule table of `plugin`, returning whether it is known
    pub fn register_plugin(&mut self, plugin: &str) -> bool {
        if self.plugins.iter().any(|known| known == plugin) {
            return true;
        }
        let Some(rules) = plugin_rules(plugin) else {
            debug!("No rule table for plugin '{}'", plugin);
            return false;
        };
        debug!("Registered {} rule(s) from plugin '{}'", rules.len(), plugin);
        self.rules
            .extend(rules.into_iter().map(|rule| (rule.id.clone(), rule)));
        self.plugins.push(plugin.to_string());
        true
    }

    pub fn get(&self, name: &str) -> Option<&RuleMetadata> {
        self.rules.get(name)
    }

    /// Every registered rule, ordered by id
    pub fn rules(&self) -> impl Iterator<Item = &RuleMetadata> {
        self.rules.values()
    }

    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleRegistry for BuiltinRegistry {
    fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    fn default_options(&self, name: &str) -> Vec<Value> {
        self.rules
            .get(name)
            .map(|rule| rule.default_options.clone())
            .unwrap_or_default()
    }

    fn suggest(&self, name: &str) -> Option<String> {
        find_best_match_for_name(self.rules.keys().map(String::as_str), name).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_core_rules() {
        let registry = BuiltinRegistry::new();
        assert!(registry.contains("semi"));
        assert!(!registry.contains("import/no-cycle"));
        assert_eq!(registry.default_options("semi"), vec![json!("always")]);
        assert!(registry.default_options("no-debugger").is_empty());
        assert!(registry.default_options("not-a-rule").is_empty());
    }

    #[test]
    fn test_plugins_extend_registry() {
        let mut registry = BuiltinRegistry::new();
        assert!(registry.register_plugin("import"));
        assert!(registry.register_plugin("import"));
        assert!(!registry.register_plugin("vue"));
        assert!(registry.contains("import/no-cycle"));
        assert_eq!(registry.plugins(), &["import"]);

        let all = BuiltinRegistry::with_all_plugins();
        assert!(all.contains("@typescript-eslint/no-unused-vars"));
        assert!(all.contains("prettier/prettier"));
        assert_eq!(all.plugins().len(), KNOWN_PLUGINS.len());
    }

    #[test]
    fn test_suggestions() {
        let registry = BuiltinRegistry::with_all_plugins();
        assert_eq!(registry.suggest("no-vra").as_deref(), Some("no-var"));
        assert_eq!(registry.suggest("import/no-cylce").as_deref(), Some("import/no-cycle"));
        assert_eq!(registry.suggest("zzzzzzzzzzzz"), None);
    }
}
