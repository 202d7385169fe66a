//! The resolved, file-specific policy

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::{GlobalAccess, RuleSetting, Severity};
use crate::diagnostics::ConfigDiagnostic;

/// Final rule set for one file after every applicable layer was merged
///
/// Only ordered containers are used, so compiling the same inputs twice
/// yields equal values and identical serialized output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectivePolicy {
    pub(crate) path: String,
    pub(crate) rules: BTreeMap<String, RuleSetting>,
    pub(crate) env: BTreeSet<String>,
    pub(crate) globals: BTreeMap<String, GlobalAccess>,
    pub(crate) plugins: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) parser: Option<String>,
    pub(crate) parser_options: Map<String, Value>,
    pub(crate) settings: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) diagnostics: Vec<ConfigDiagnostic>,
}

impl EffectivePolicy {
    /// Path the policy was compiled for, relative to the document root
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Every configured rule, disabled ones included
    pub fn rules(&self) -> &BTreeMap<String, RuleSetting> {
        &self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&RuleSetting> {
        self.rules.get(name)
    }

    /// Severity of `name`, `off` when it is not configured
    pub fn severity(&self, name: &str) -> Severity {
        self.rules
            .get(name)
            .map(|setting| setting.severity)
            .unwrap_or(Severity::Off)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.severity(name).is_enabled()
    }

    pub fn enabled_rules(&self) -> impl Iterator<Item = (&str, &RuleSetting)> {
        self.rules
            .iter()
            .filter(|(_, setting)| setting.is_enabled())
            .map(|(name, setting)| (name.as_str(), setting))
    }

    pub fn env(&self) -> &BTreeSet<String> {
        &self.env
    }

    pub fn has_env(&self, name: &str) -> bool {
        self.env.contains(name)
    }

    pub fn globals(&self) -> &BTreeMap<String, GlobalAccess> {
        &self.globals
    }

    pub fn global(&self, name: &str) -> Option<GlobalAccess> {
        self.globals.get(name).copied()
    }

    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    pub fn parser(&self) -> Option<&str> {
        self.parser.as_deref()
    }

    pub fn parser_options(&self) -> &Map<String, Value> {
        &self.parser_options
    }

    pub fn settings(&self) -> &Map<String, Value> {
        &self.settings
    }

    /// Problems tolerated while compiling (unknown rules or environments)
    pub fn diagnostics(&self) -> &[ConfigDiagnostic] {
        &self.diagnostics
    }

    /// Copy of this policy without disabled rules
    pub fn only_enabled(&self) -> Self {
        let mut policy = self.clone();
        policy.rules.retain(|_, setting| setting.is_enabled());
        policy
    }
}
