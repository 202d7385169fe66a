//! Built-in presets addressable from `extends` as `lintrc:<name>`

use indexmap::IndexMap;
use lintrc_core::config::{DocumentResolver, OverrideBlock, PRESET_PREFIX, ResolvedDocument};
use lintrc_core::{DocumentSource, LintrcError, PolicyDocument, Result};
use serde_json::json;
use std::sync::Arc;

use crate::catalog::{BuiltinRules, RuleCategory};
use crate::plugins::{all_plugin_rules, plugin_rules};

/// Resolver for the built-in presets
#[derive(Debug, Clone)]
pub struct Presets {
    documents: IndexMap<&'static str, Arc<PolicyDocument>>,
}

impl Presets {
    pub fn new() -> Self {
        let mut documents = IndexMap::new();
        documents.insert("recommended", Arc::new(recommended()));
        documents.insert("all", Arc::new(all()));
        documents.insert("typescript", Arc::new(typescript()));
        documents.insert("jest", Arc::new(jest()));
        documents.insert("prettier", Arc::new(prettier()));
        Self { documents }
    }

    /// Preset names without the `lintrc:` prefix
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.documents.keys().copied()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<PolicyDocument>> {
        self.documents.get(name)
    }
}

impl Default for Presets {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentResolver for Presets {
    fn resolve(&self, reference: &str, from: &DocumentSource) -> Result<ResolvedDocument> {
        let unresolved = |reason: String| LintrcError::UnresolvedExtends {
            reference: reference.to_string(),
            source_doc: from.clone(),
            reason,
        };

        let name = reference
            .strip_prefix(PRESET_PREFIX)
            .ok_or_else(|| unresolved(format!("presets are referenced as {PRESET_PREFIX}<name>")))?;
        let document = self.documents.get(name).ok_or_else(|| {
            let known: Vec<_> = self.names().collect();
            unresolved(format!("unknown preset (available: {})", known.join(", ")))
        })?;

        Ok(ResolvedDocument {
            source: DocumentSource::preset(name),
            document: Arc::clone(document),
        })
    }
}

/// Core rules marked recommended, as errors
fn recommended() -> PolicyDocument {
    BuiltinRules::recommended_rules()
        .into_iter()
        .fold(PolicyDocument::new(), |doc, rule| doc.with_rule(rule.id, "error"))
}

/// Every core rule, as errors
fn all() -> PolicyDocument {
    BuiltinRules::all_rules()
        .into_iter()
        .fold(PolicyDocument::new(), |doc, rule| doc.with_rule(rule.id, "error"))
}

/// TypeScript parser and recommended `@typescript-eslint` rules
fn typescript() -> PolicyDocument {
    let doc = PolicyDocument::new()
        .with_extends(format!("{PRESET_PREFIX}recommended"))
        .with_plugin("@typescript-eslint")
        .with_parser_option("sourceType", "module")
        .with_rule("no-undef", "off")
        .with_rule("no-unused-vars", "off");
    let mut doc = plugin_rules("@typescript-eslint")
        .unwrap_or_default()
        .into_iter()
        .filter(|rule| rule.recommended)
        .fold(doc, |doc, rule| doc.with_rule(rule.id, "error"));
    doc.parser = Some("@typescript-eslint/parser".to_string());
    doc
}

/// Jest globals and recommended rules for test files
fn jest() -> PolicyDocument {
    let block = OverrideBlock::new([
        "**/*.test.{js,jsx,ts,tsx}",
        "**/*.spec.{js,jsx,ts,tsx}",
        "**/__tests__/**",
    ])
    .with_env("jest", true)
    .with_plugin("jest");
    let block = plugin_rules("jest")
        .unwrap_or_default()
        .into_iter()
        .filter(|rule| rule.recommended)
        .fold(block, |block, rule| block.with_rule(rule.id, "error"));
    PolicyDocument::new().with_override(block)
}

/// Turns off every layout rule and reports formatting through `prettier/prettier`
fn prettier() -> PolicyDocument {
    let doc = PolicyDocument::new()
        .with_plugin("prettier")
        .with_rule("prettier/prettier", json!(["error"]));
    BuiltinRules::layout_rules()
        .into_iter()
        .chain(all_plugin_rules())
        .filter(|rule| rule.category == RuleCategory::Layout && rule.id != "prettier/prettier")
        .fold(doc, |doc, rule| doc.with_rule(rule.id, "off"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BuiltinRegistry;
    use lintrc_core::{PolicyCompiler, Severity};

    fn compiler() -> PolicyCompiler {
        PolicyCompiler::new(Arc::new(BuiltinRegistry::with_all_plugins()))
            .with_resolver(Arc::new(Presets::new()))
            .strict(true)
    }

    #[test]
    fn test_resolve_preset() {
        let presets = Presets::new();
        let resolved = presets
            .resolve("lintrc:recommended", &DocumentSource::Inline)
            .unwrap();
        assert_eq!(resolved.source, DocumentSource::preset("recommended"));
        assert_eq!(resolved.source.to_string(), "lintrc:recommended");

        assert!(presets.resolve("lintrc:nope", &DocumentSource::Inline).is_err());
        assert!(presets.resolve("recommended", &DocumentSource::Inline).is_err());
    }

    #[test]
    fn test_presets_compile_strictly() {
        let compiler = compiler();
        for name in Presets::new().names() {
            let doc = PolicyDocument::new().with_extends(format!("lintrc:{name}"));
            let policy = compiler.compile(&doc, "src/app.test.ts");
            assert!(policy.is_ok(), "lintrc:{name}: {:?}", policy.err());
        }
    }

    #[test]
    fn test_typescript_builds_on_recommended() {
        let doc = PolicyDocument::new().with_extends("lintrc:typescript");
        let policy = compiler().compile(&doc, "src/app.ts").unwrap();

        assert_eq!(policy.severity("no-debugger"), Severity::Error);
        assert_eq!(policy.severity("no-unused-vars"), Severity::Off);
        assert_eq!(
            policy.severity("@typescript-eslint/no-unused-vars"),
            Severity::Error
        );
        assert_eq!(policy.parser(), Some("@typescript-eslint/parser"));
        assert_eq!(policy.plugins(), &["@typescript-eslint"]);
    }

    #[test]
    fn test_prettier_disables_layout_rules() {
        let doc = PolicyDocument::new()
            .with_extends("lintrc:all")
            .with_extends("lintrc:prettier");
        let policy = compiler().compile(&doc, "src/app.js").unwrap();

        assert_eq!(policy.severity("semi"), Severity::Off);
        assert_eq!(policy.severity("indent"), Severity::Off);
        assert_eq!(policy.severity("eqeqeq"), Severity::Error);
        assert!(policy.is_enabled("prettier/prettier"));
    }

    #[test]
    fn test_jest_applies_to_test_files_only() {
        let doc = PolicyDocument::new().with_extends("lintrc:jest");
        let compiler = compiler();

        let test = compiler.compile(&doc, "src/app.test.ts").unwrap();
        assert!(test.has_env("jest"));
        assert!(test.is_enabled("jest/no-focused-tests"));

        let source = compiler.compile(&doc, "src/app.ts").unwrap();
        assert!(!source.has_env("jest"));
        assert!(source.rules().is_empty());
    }
}
