//! Effective-policy compiler
//!
//! Folds the layers of a [`PolicyTree`] that apply to a file, in tree order,
//! into one [`EffectivePolicy`]:
//!
//! - rules: last writer wins per rule name, whole value replaced
//! - env: flags union across layers, a later `false` disables
//! - globals: env bundles (ecmaVersion bundle, then envs by name), then explicit globals
//! - plugins: concatenated without duplicates
//! - parserOptions and settings: deep-merged

use rayon::prelude::*;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::config::{
    DocumentResolver, GlobalAccess, NoExtends, PolicyDocument, RuleEntry, RuleSetting, merge_json,
};
use crate::diagnostics::ConfigDiagnostic;
use crate::environments;
use crate::error::LintrcError;
use crate::policy::EffectivePolicy;
use crate::registry::RuleRegistry;
use crate::result::Result;
use crate::source::DocumentSource;
use crate::tree::{Layer, PolicyTree};

/// Compilation switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Fail on unknown rules and environments instead of recording diagnostics
    pub strict: bool,
}

/// Compiles policy documents into per-file effective policies
#[derive(Clone)]
pub struct PolicyCompiler {
    registry: Arc<dyn RuleRegistry>,
    resolver: Arc<dyn DocumentResolver>,
    options: CompileOptions,
}

impl PolicyCompiler {
    /// Compiler whose documents may not use `extends`
    pub fn new(registry: Arc<dyn RuleRegistry>) -> Self {
        Self {
            registry,
            resolver: Arc::new(NoExtends),
            options: CompileOptions::default(),
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn DocumentResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.options.strict = strict;
        self
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    pub fn registry(&self) -> &dyn RuleRegistry {
        self.registry.as_ref()
    }

    /// Flatten `document` and its `extends` chain using this compiler's resolver
    pub fn build_tree(&self, document: &PolicyDocument, source: DocumentSource) -> Result<PolicyTree> {
        PolicyTree::build(document, source, self.resolver.as_ref())
    }

    /// Effective policy of `path` under `document`
    ///
    /// Builds the tree on every call; use [`compile_tree`](Self::compile_tree)
    /// to compile many files against one document.
    pub fn compile(&self, document: &PolicyDocument, path: impl AsRef<Path>) -> Result<EffectivePolicy> {
        let tree = self.build_tree(document, DocumentSource::Inline)?;
        self.compile_tree(&tree, path)
    }

    /// Effective policy of `path` under an already built tree
    pub fn compile_tree(&self, tree: &PolicyTree, path: impl AsRef<Path>) -> Result<EffectivePolicy> {
        let path = path.as_ref();
        let relative = tree.relative_path(path);
        let mut fold = Fold::new(self);

        let mut matched = 0usize;
        for scoped in tree.layers_for(path) {
            fold.apply(&scoped.layer, &relative)?;
            if !scoped.scope.is_global() {
                matched += 1;
            }
        }

        let policy = fold.finish(relative);
        debug!(
            "Compiled policy for {}: {} rule(s), {} override(s) matched, {} diagnostic(s)",
            policy.path,
            policy.rules.len(),
            matched,
            policy.diagnostics.len()
        );
        Ok(policy)
    }

    /// Validate rule and environment names in every layer of `tree`
    ///
    /// Unlike [`compile_tree`](Self::compile_tree) this also visits override
    /// blocks no particular file matches. Strict mode fails on the first
    /// unknown name; otherwise the tolerated problems are returned.
    pub fn check_tree(&self, tree: &PolicyTree) -> Result<Vec<ConfigDiagnostic>> {
        let mut fold = Fold::new(self);
        for scoped in tree.layers() {
            fold.apply(&scoped.layer, "<all files>")?;
        }
        Ok(fold.diagnostics)
    }

    /// Compile independent files in parallel, results in input order
    pub fn compile_many<P>(&self, tree: &PolicyTree, paths: &[P]) -> Vec<Result<EffectivePolicy>>
    where
        P: AsRef<Path> + Sync,
    {
        paths
            .par_iter()
            .map(|path| self.compile_tree(tree, path))
            .collect()
    }
}

struct Fold<'c> {
    compiler: &'c PolicyCompiler,
    rules: BTreeMap<String, RuleSetting>,
    env: BTreeMap<String, bool>,
    globals: BTreeMap<String, GlobalAccess>,
    plugins: Vec<String>,
    parser: Option<String>,
    parser_options: Map<String, Value>,
    settings: Map<String, Value>,
    diagnostics: Vec<ConfigDiagnostic>,
}

impl<'c> Fold<'c> {
    fn new(compiler: &'c PolicyCompiler) -> Self {
        Self {
            compiler,
            rules: BTreeMap::new(),
            env: BTreeMap::new(),
            globals: BTreeMap::new(),
            plugins: Vec::new(),
            parser: None,
            parser_options: Map::new(),
            settings: Map::new(),
            diagnostics: Vec::new(),
        }
    }

    fn apply(&mut self, layer: &Layer, path: &str) -> Result<()> {
        trace!("Applying {} ({}) to {}", layer.source, layer.location, path);

        for (name, enabled) in &layer.env {
            if environments::lookup(name).is_none() {
                self.unknown_environment(name, layer)?;
                continue;
            }
            self.env.insert(name.clone(), *enabled);
        }

        for (name, access) in &layer.globals {
            self.globals.insert(name.clone(), *access);
        }

        for plugin in &layer.plugins {
            if !self.plugins.contains(plugin) {
                self.plugins.push(plugin.clone());
            }
        }

        if let Some(parser) = &layer.parser {
            self.parser = Some(parser.clone());
        }
        merge_json(&mut self.parser_options, &layer.parser_options);
        merge_json(&mut self.settings, &layer.settings);

        let compiler = self.compiler;
        let registry = compiler.registry.as_ref();
        for (name, entry) in &layer.rules {
            if !registry.contains(name) {
                self.unknown_rule(name, layer)?;
                continue;
            }
            let setting = match entry {
                RuleEntry::Bare(severity) => {
                    RuleSetting::new(*severity, registry.default_options(name))
                }
                RuleEntry::Configured(severity, options) => {
                    RuleSetting::new(*severity, options.clone())
                }
            };
            self.rules.insert(name.clone(), setting);
        }

        Ok(())
    }

    fn unknown_rule(&mut self, name: &str, layer: &Layer) -> Result<()> {
        let suggestion = self.compiler.registry.suggest(name);
        if self.compiler.options.strict {
            return Err(LintrcError::UnknownRule {
                rule: name.to_string(),
                source_doc: layer.source.clone(),
                location: layer.location,
                suggestion,
            });
        }
        warn!("Ignoring unknown rule '{}' in {} ({})", name, layer.source, layer.location);
        self.diagnostics.push(ConfigDiagnostic::unknown_rule(
            name,
            suggestion.as_deref(),
            &layer.source,
            layer.location,
        ));
        Ok(())
    }

    fn unknown_environment(&mut self, name: &str, layer: &Layer) -> Result<()> {
        if self.compiler.options.strict {
            return Err(LintrcError::UnknownEnvironment {
                env: name.to_string(),
                source_doc: layer.source.clone(),
                location: layer.location,
            });
        }
        warn!(
            "Ignoring unknown environment '{}' in {} ({})",
            name, layer.source, layer.location
        );
        self.diagnostics.push(ConfigDiagnostic::unknown_environment(
            name,
            &layer.source,
            layer.location,
        ));
        Ok(())
    }

    fn finish(self, path: String) -> EffectivePolicy {
        let env: BTreeSet<String> = self
            .env
            .into_iter()
            .filter_map(|(name, enabled)| enabled.then_some(name))
            .collect();

        let mut globals = BTreeMap::new();
        let bundles = self
            .parser_options
            .get("ecmaVersion")
            .and_then(environments::for_ecma_version)
            .into_iter()
            .chain(env.iter().filter_map(|name| environments::lookup(name)));
        for bundle in bundles {
            for (name, access) in bundle.all_globals() {
                globals.insert(name.to_string(), access);
            }
        }
        for (name, access) in self.globals {
            match access {
                GlobalAccess::Off => {
                    globals.remove(&name);
                }
                access => {
                    globals.insert(name, access);
                }
            }
        }

        EffectivePolicy {
            path,
            rules: self.rules,
            env,
            globals,
            plugins: self.plugins,
            parser: self.parser,
            parser_options: self.parser_options,
            settings: self.settings,
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InMemoryDocuments, OverrideBlock, Severity};
    use crate::diagnostics::DiagnosticCode;
    use crate::registry::PermissiveRegistry;
    use serde_json::json;

    struct FixedRegistry;

    impl RuleRegistry for FixedRegistry {
        fn contains(&self, name: &str) -> bool {
            matches!(name, "semi" | "quotes" | "no-var" | "eqeqeq")
        }

        fn default_options(&self, name: &str) -> Vec<Value> {
            match name {
                "semi" => vec![json!("always")],
                "quotes" => vec![json!("double")],
                _ => Vec::new(),
            }
        }

        fn suggest(&self, name: &str) -> Option<String> {
            (name == "no-vra").then(|| "no-var".to_string())
        }
    }

    fn permissive() -> PolicyCompiler {
        PolicyCompiler::new(Arc::new(PermissiveRegistry))
    }

    fn fixed() -> PolicyCompiler {
        PolicyCompiler::new(Arc::new(FixedRegistry))
    }

    #[test]
    fn test_test_files_turn_rule_off() {
        let doc = PolicyDocument::new()
            .with_rule("semi", "error")
            .with_override(OverrideBlock::new(["*.test.ts"]).with_rule("semi", "off"));
        let compiler = permissive();

        let app = compiler.compile(&doc, "app.ts").unwrap();
        assert_eq!(app.severity("semi"), Severity::Error);

        let test = compiler.compile(&doc, "app.test.ts").unwrap();
        assert_eq!(test.severity("semi"), Severity::Off);
        assert!(!test.is_enabled("semi"));
        assert!(test.rule("semi").is_some());
    }

    #[test]
    fn test_later_override_wins() {
        let doc = PolicyDocument::new()
            .with_override(OverrideBlock::new(["**/*.ts"]).with_rule("quotes", json!(["warn", "single"])))
            .with_override(OverrideBlock::new(["src/**"]).with_rule("quotes", json!(["error", "double"])));

        let policy = permissive().compile(&doc, "src/a.ts").unwrap();
        assert_eq!(
            policy.rule("quotes"),
            Some(&RuleSetting::new(Severity::Error, vec![json!("double")]))
        );
    }

    #[test]
    fn test_local_rule_beats_inherited_override() {
        let docs = InMemoryDocuments::new().with(
            "base",
            PolicyDocument::new()
                .with_override(OverrideBlock::new(["*.ts"]).with_rule("semi", "error")),
        );
        let local = PolicyDocument::new().with_extends("base").with_rule("semi", "off");
        let compiler = permissive().with_resolver(Arc::new(docs));

        assert_eq!(compiler.compile(&local, "a.ts").unwrap().severity("semi"), Severity::Off);
    }

    #[test]
    fn test_local_rule_beats_override_inherited_from_grandparent() {
        let docs = InMemoryDocuments::new()
            .with(
                "grandparent",
                PolicyDocument::new()
                    .with_rule("quotes", "warn")
                    .with_override(OverrideBlock::new(["**/*.ts"]).with_rule("semi", "error")),
            )
            .with(
                "parent",
                PolicyDocument::new().with_extends("grandparent").with_rule("semi", "warn"),
            );
        let local = PolicyDocument::new()
            .with_extends("parent")
            .with_rule("semi", "off")
            .with_override(OverrideBlock::new(["src/**"]).with_rule("quotes", "error"));
        let compiler = permissive().with_resolver(Arc::new(docs));

        let policy = compiler.compile(&local, "src/a.ts").unwrap();
        assert_eq!(policy.severity("semi"), Severity::Off);
        assert_eq!(policy.severity("quotes"), Severity::Error);

        let without_local = compiler
            .compile(&PolicyDocument::new().with_extends("parent"), "src/a.ts")
            .unwrap();
        assert_eq!(without_local.severity("semi"), Severity::Warn);
    }

    #[test]
    fn test_override_extends_apply_before_block_settings() {
        let docs = InMemoryDocuments::new().with(
            "testing",
            PolicyDocument::new()
                .with_env("jest", true)
                .with_rule("semi", "warn")
                .with_rule("quotes", "warn"),
        );
        let local = PolicyDocument::new().with_rule("quotes", "error").with_override(
            OverrideBlock::new(["*.test.ts?(x)"])
                .with_extends("testing")
                .with_rule("semi", "off"),
        );
        let compiler = permissive().with_resolver(Arc::new(docs));

        let app = compiler.compile(&local, "app.ts").unwrap();
        assert!(!app.has_env("jest"));
        assert_eq!(app.rule("semi"), None);

        for path in ["app.test.ts", "app.test.tsx"] {
            let test = compiler.compile(&local, path).unwrap();
            assert!(test.has_env("jest"), "{path}");
            assert_eq!(test.severity("semi"), Severity::Off);
            assert_eq!(test.severity("quotes"), Severity::Warn);
        }
    }

    #[test]
    fn test_options_replace_whole_value() {
        let doc = PolicyDocument::new()
            .with_rule("quotes", json!(["error", "single", {"avoidEscape": true}]))
            .with_override(OverrideBlock::new(["*.js"]).with_rule("quotes", json!(["warn", "double"])));

        let policy = permissive().compile(&doc, "a.js").unwrap();
        assert_eq!(
            policy.rule("quotes"),
            Some(&RuleSetting::new(Severity::Warn, vec![json!("double")]))
        );
    }

    #[test]
    fn test_bare_severity_takes_registry_defaults() {
        let doc = PolicyDocument::new()
            .with_rule("semi", "error")
            .with_rule("quotes", json!(["warn", "single"]))
            .with_rule("eqeqeq", "warn");

        let policy = fixed().compile(&doc, "a.js").unwrap();
        assert_eq!(policy.rule("semi").unwrap().options, vec![json!("always")]);
        assert_eq!(policy.rule("quotes").unwrap().options, vec![json!("single")]);
        assert!(policy.rule("eqeqeq").unwrap().options.is_empty());
    }

    #[test]
    fn test_environments_union_and_explicit_false() {
        let doc = PolicyDocument::new()
            .with_env("browser", true)
            .with_env("node", true)
            .with_override(OverrideBlock::new(["*.test.js"]).with_env("jest", true))
            .with_override(OverrideBlock::new(["server/**"]).with_env("browser", false));
        let compiler = permissive();

        let test = compiler.compile(&doc, "a.test.js").unwrap();
        assert_eq!(
            test.env().iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["browser", "jest", "node"]
        );
        assert_eq!(test.global("describe"), Some(GlobalAccess::Readonly));

        let server = compiler.compile(&doc, "server/main.js").unwrap();
        assert!(!server.has_env("browser"));
        assert!(server.has_env("node"));
        assert_eq!(server.global("window"), None);
    }

    #[test]
    fn test_globals_layering() {
        let doc = PolicyDocument::new()
            .with_env("browser", true)
            .with_global("window", GlobalAccess::Off)
            .with_global("MY_APP", GlobalAccess::Readonly)
            .with_override(
                OverrideBlock::new(["legacy/**"]).with_global("MY_APP", GlobalAccess::Writable),
            );
        let compiler = permissive();

        let policy = compiler.compile(&doc, "src/a.js").unwrap();
        assert_eq!(policy.global("window"), None);
        assert_eq!(policy.global("document"), Some(GlobalAccess::Readonly));
        assert_eq!(policy.global("MY_APP"), Some(GlobalAccess::Readonly));

        let legacy = compiler.compile(&doc, "legacy/a.js").unwrap();
        assert_eq!(legacy.global("MY_APP"), Some(GlobalAccess::Writable));
    }

    #[test]
    fn test_ecma_version_implies_globals() {
        let doc = PolicyDocument::new().with_parser_option("ecmaVersion", 2020);
        let policy = permissive().compile(&doc, "a.js").unwrap();
        assert_eq!(policy.global("BigInt"), Some(GlobalAccess::Readonly));
        assert_eq!(policy.global("Promise"), Some(GlobalAccess::Readonly));
        assert!(policy.env().is_empty());

        let es5 = PolicyDocument::new().with_parser_option("ecmaVersion", 5);
        assert!(permissive().compile(&es5, "a.js").unwrap().globals().is_empty());
    }

    #[test]
    fn test_parser_options_and_settings_deep_merge() {
        let doc = PolicyDocument::new()
            .with_parser_option("ecmaVersion", 2018)
            .with_parser_option("ecmaFeatures", json!({ "jsx": true }))
            .with_override(
                OverrideBlock::new(["*.ts"])
                    .with_parser_option("ecmaFeatures", json!({ "globalReturn": true }))
                    .with_parser_option("sourceType", "module"),
            );

        let policy = permissive().compile(&doc, "a.ts").unwrap();
        assert_eq!(
            Value::Object(policy.parser_options().clone()),
            json!({
                "ecmaVersion": 2018,
                "ecmaFeatures": { "jsx": true, "globalReturn": true },
                "sourceType": "module"
            })
        );
    }

    #[test]
    fn test_plugins_deduplicated_in_layer_order() {
        let doc = PolicyDocument::new()
            .with_plugin("import")
            .with_plugin("react")
            .with_override(
                OverrideBlock::new(["*.ts"])
                    .with_plugin("@typescript-eslint")
                    .with_plugin("import"),
            );

        let policy = permissive().compile(&doc, "a.ts").unwrap();
        assert_eq!(policy.plugins(), &["import", "react", "@typescript-eslint"]);
    }

    #[test]
    fn test_unknown_rule_is_a_diagnostic_when_lenient() {
        let doc = PolicyDocument::new()
            .with_rule("no-vra", "error")
            .with_rule("semi", "error");

        let policy = fixed().compile(&doc, "a.js").unwrap();
        assert!(policy.rule("no-vra").is_none());
        assert!(policy.is_enabled("semi"));
        assert_eq!(policy.diagnostics().len(), 1);
        assert_eq!(policy.diagnostics()[0].code, DiagnosticCode::UnknownRule);
        assert!(policy.diagnostics()[0].message.contains("no-var"));
    }

    #[test]
    fn test_unknown_rule_fails_when_strict() {
        let doc = PolicyDocument::new().with_rule("no-vra", "error");

        let err = fixed().strict(true).compile(&doc, "a.js").unwrap_err();
        match err {
            LintrcError::UnknownRule { rule, suggestion, .. } => {
                assert_eq!(rule, "no-vra");
                assert_eq!(suggestion.as_deref(), Some("no-var"));
            }
            other => panic!("expected unknown rule, got {other}"),
        }
    }

    #[test]
    fn test_unknown_environment() {
        let doc = PolicyDocument::new().with_env("brwoser", true);

        let lenient = permissive().compile(&doc, "a.js").unwrap();
        assert!(lenient.env().is_empty());
        assert_eq!(
            lenient.diagnostics()[0].code,
            DiagnosticCode::UnknownEnvironment
        );

        assert!(matches!(
            permissive().strict(true).compile(&doc, "a.js"),
            Err(LintrcError::UnknownEnvironment { .. })
        ));
    }

    #[test]
    fn test_unknown_rule_in_unmatched_override_is_silent() {
        let doc = PolicyDocument::new()
            .with_override(OverrideBlock::new(["*.ts"]).with_rule("no-vra", "error"));
        let policy = fixed().strict(true).compile(&doc, "a.js").unwrap();
        assert!(policy.diagnostics().is_empty());
    }

    #[test]
    fn test_compile_is_deterministic() {
        let doc = PolicyDocument::new()
            .with_env("browser", true)
            .with_rule("semi", "error")
            .with_rule("quotes", json!(["warn", "single"]))
            .with_override(OverrideBlock::new(["**/*.ts"]).with_env("node", true));
        let compiler = permissive();

        let first = compiler.compile(&doc, "src/a.ts").unwrap();
        let second = compiler.compile(&doc, "src/a.ts").unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_compile_many_preserves_input_order() {
        let docs = InMemoryDocuments::new().with("base", PolicyDocument::new().with_rule("semi", "warn"));
        let doc = PolicyDocument::new()
            .with_extends("base")
            .with_override(OverrideBlock::new(["*.ts"]).with_rule("semi", "error"));
        let compiler = permissive().with_resolver(Arc::new(docs));
        let tree = compiler.build_tree(&doc, DocumentSource::Inline).unwrap();

        let paths: Vec<String> = (0..32)
            .map(|i| if i % 2 == 0 { format!("f{i}.ts") } else { format!("f{i}.js") })
            .collect();
        let results = compiler.compile_many(&tree, &paths);

        assert_eq!(results.len(), paths.len());
        for (path, result) in paths.iter().zip(results) {
            let policy = result.unwrap();
            assert_eq!(policy.path(), path.as_str());
            let expected = if path.ends_with(".ts") { Severity::Error } else { Severity::Warn };
            assert_eq!(policy.severity("semi"), expected);
        }
    }

    #[test]
    fn test_check_tree_visits_every_override() {
        let doc = PolicyDocument::new()
            .with_rule("semi", "error")
            .with_override(OverrideBlock::new(["legacy/**"]).with_rule("no-vra", "warn"))
            .with_override(OverrideBlock::new(["*.test.js"]).with_env("jasmin", true));
        let tree = fixed().build_tree(&doc, DocumentSource::Inline).unwrap();

        let diagnostics = fixed().check_tree(&tree).unwrap();
        let codes: Vec<_> = diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![DiagnosticCode::UnknownRule, DiagnosticCode::UnknownEnvironment]
        );
        assert!(diagnostics[0].message.contains("Did you mean 'no-var'?"));

        assert!(matches!(
            fixed().strict(true).check_tree(&tree),
            Err(LintrcError::UnknownRule { .. })
        ));
    }
}
