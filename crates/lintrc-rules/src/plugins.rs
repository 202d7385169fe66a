//! Rule tables of well-known plugins
//!
//! Plugin rules are addressed as `<plugin>/<rule>`, e.g. `import/no-cycle`.

use serde_json::json;

use crate::catalog::{RuleCategory, RuleMetadata};

/// Names of the plugins with a built-in rule table
pub const KNOWN_PLUGINS: &[&str] = &["@typescript-eslint", "import", "react", "jest", "prettier"];

/// Rule table of `plugin`, or `None` when the plugin is unknown
pub fn plugin_rules(plugin: &str) -> Option<Vec<RuleMetadata>> {
    let (name, rules) = match plugin {
        "@typescript-eslint" => ("@typescript-eslint", typescript_eslint()),
        "import" => ("import", import()),
        "react" => ("react", react()),
        "jest" => ("jest", jest()),
        "prettier" => ("prettier", prettier()),
        _ => return None,
    };
    Some(rules.into_iter().map(|rule| rule.in_plugin(name)).collect())
}

/// Rules of every known plugin
pub fn all_plugin_rules() -> Vec<RuleMetadata> {
    KNOWN_PLUGINS
        .iter()
        .filter_map(|plugin| plugin_rules(plugin))
        .flatten()
        .collect()
}

fn typescript_eslint() -> Vec<RuleMetadata> {
    use RuleCategory::{Layout, Problem, Suggestion};
    vec![
        RuleMetadata::new("ban-ts-comment", "Disallow `@ts-<directive>` comments", Problem).recommended(),
        RuleMetadata::new("explicit-function-return-type", "Require explicit return types on functions and class methods", Suggestion)
            .with_defaults(vec![json!({ "allowExpressions": false, "allowTypedFunctionExpressions": true })]),
        RuleMetadata::new("explicit-member-accessibility", "Require explicit accessibility modifiers on class properties and methods", Suggestion)
            .with_defaults(vec![json!({ "accessibility": "explicit" })]),
        RuleMetadata::new("explicit-module-boundary-types", "Require explicit return and argument types on exported functions", Suggestion),
        RuleMetadata::new("no-empty-function", "Disallow empty functions", Suggestion).recommended(),
        RuleMetadata::new("no-explicit-any", "Disallow the `any` type", Suggestion).recommended(),
        RuleMetadata::new("no-inferrable-types", "Disallow explicit types where they can be easily inferred", Suggestion).recommended(),
        RuleMetadata::new("no-namespace", "Disallow TypeScript namespaces", Suggestion).recommended(),
        RuleMetadata::new("no-non-null-assertion", "Disallow non-null assertions using the `!` postfix operator", Problem).recommended(),
        RuleMetadata::new("no-unused-vars", "Disallow unused variables", Problem)
            .recommended()
            .with_defaults(vec![json!({ "vars": "all", "args": "after-used" })]),
        RuleMetadata::new("prefer-namespace-keyword", "Require using `namespace` keyword over `module` keyword", Suggestion).recommended(),
        RuleMetadata::new("quotes", "Enforce the consistent use of either backticks, double, or single quotes", Layout)
            .with_defaults(vec![json!("double")]),
    ]
}

fn import() -> Vec<RuleMetadata> {
    use RuleCategory::{Problem, Suggestion};
    vec![
        RuleMetadata::new("default", "Ensure a default export is present, given a default import", Problem).recommended(),
        RuleMetadata::new("named", "Ensure named imports correspond to a named export in the remote file", Problem).recommended(),
        RuleMetadata::new("namespace", "Ensure imported namespaces contain dereferenced properties as they are dereferenced", Problem).recommended(),
        RuleMetadata::new("no-cycle", "Forbid a module from importing a module with a dependency path back to itself", Problem)
            .with_defaults(vec![json!({ "maxDepth": "∞" })]),
        RuleMetadata::new("no-duplicates", "Forbid repeated import of the same module in multiple places", Problem).recommended(),
        RuleMetadata::new("no-unresolved", "Ensure imports point to a file/module that can be resolved", Problem).recommended(),
        RuleMetadata::new("order", "Enforce a convention in module import order", Suggestion)
            .with_defaults(vec![json!({ "groups": ["builtin", "external", "parent", "sibling", "index"] })]),
    ]
}

fn react() -> Vec<RuleMetadata> {
    use RuleCategory::{Problem, Suggestion};
    vec![
        RuleMetadata::new("display-name", "Disallow missing displayName in a React component definition", Suggestion).recommended(),
        RuleMetadata::new("jsx-key", "Disallow missing `key` props in iterators/collection literals", Problem).recommended(),
        RuleMetadata::new("jsx-no-undef", "Disallow undeclared variables in JSX", Problem).recommended(),
        RuleMetadata::new("no-unknown-property", "Disallow usage of unknown DOM property", Problem).recommended(),
        RuleMetadata::new("prop-types", "Disallow missing props validation in a React component definition", Suggestion).recommended(),
        RuleMetadata::new("react-in-jsx-scope", "Disallow missing React when using JSX", Problem).recommended(),
    ]
}

fn jest() -> Vec<RuleMetadata> {
    use RuleCategory::{Problem, Suggestion};
    vec![
        RuleMetadata::new("expect-expect", "Enforce assertion to be made in a test body", Suggestion).recommended(),
        RuleMetadata::new("no-disabled-tests", "Disallow disabled tests", Suggestion).recommended(),
        RuleMetadata::new("no-focused-tests", "Disallow focused tests", Suggestion).recommended(),
        RuleMetadata::new("no-identical-title", "Disallow identical titles", Problem).recommended(),
        RuleMetadata::new("valid-expect", "Enforce valid `expect()` usage", Problem).recommended(),
    ]
}

fn prettier() -> Vec<RuleMetadata> {
    vec![RuleMetadata::new(
        "prettier",
        "Report differences from Prettier formatting as lint issues",
        RuleCategory::Layout,
    )]
}
