//! Built-in rule catalog

use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

/// Kind of issue a rule reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Code that is probably wrong
    Problem,
    /// Better ways of writing working code
    Suggestion,
    /// Whitespace and formatting
    Layout,
}

impl RuleCategory {
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Problem => "problem",
            Self::Suggestion => "suggestion",
            Self::Layout => "layout",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "problem" | "problems" => Some(Self::Problem),
            "suggestion" | "suggestions" => Some(Self::Suggestion),
            "layout" => Some(Self::Layout),
            _ => None,
        }
    }

    pub fn all() -> [Self; 3] {
        [Self::Problem, Self::Suggestion, Self::Layout]
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Static description of a rule
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMetadata {
    /// Full rule name, plugin prefix included (`import/no-cycle`)
    pub id: String,
    pub description: &'static str,
    pub category: RuleCategory,
    /// Enabled by the `lintrc:recommended` preset
    pub recommended: bool,
    /// Options used when the rule is configured with a bare severity
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub default_options: Vec<Value>,
    /// Plugin that provides the rule, `None` for core rules
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin: Option<&'static str>,
}

impl RuleMetadata {
    pub fn new(id: &str, description: &'static str, category: RuleCategory) -> Self {
        Self {
            id: id.to_string(),
            description,
            category,
            recommended: false,
            default_options: Vec::new(),
            plugin: None,
        }
    }

    pub fn recommended(mut self) -> Self {
        self.recommended = true;
        self
    }

    pub fn with_defaults(mut self, options: Vec<Value>) -> Self {
        self.default_options = options;
        self
    }

    pub(crate) fn in_plugin(mut self, plugin: &'static str) -> Self {
        self.id = format!("{plugin}/{}", self.id);
        self.plugin = Some(plugin);
        self
    }
}

/// Core JavaScript rules shipped with lintrc
pub struct BuiltinRules;

impl BuiltinRules {
    /// Every core rule
    pub fn all_rules() -> Vec<RuleMetadata> {
        let mut rules = Self::problem_rules();
        rules.extend(Self::suggestion_rules());
        rules.extend(Self::layout_rules());
        rules
    }

    /// Rules enabled by `lintrc:recommended`
    pub fn recommended_rules() -> Vec<RuleMetadata> {
        Self::all_rules()
            .into_iter()
            .filter(|rule| rule.recommended)
            .collect()
    }

    pub fn problem_rules() -> Vec<RuleMetadata> {
        use RuleCategory::Problem;
        vec![
            RuleMetadata::new("constructor-super", "Require `super()` calls in constructors", Problem).recommended(),
            RuleMetadata::new("for-direction", "Enforce a `for` loop update clause that moves the counter toward its bound", Problem).recommended(),
            RuleMetadata::new("getter-return", "Enforce `return` statements in getters", Problem).recommended(),
            RuleMetadata::new("no-async-promise-executor", "Disallow async functions as Promise executors", Problem).recommended(),
            RuleMetadata::new("no-class-assign", "Disallow reassigning class members", Problem).recommended(),
            RuleMetadata::new("no-compare-neg-zero", "Disallow comparing against `-0`", Problem).recommended(),
            RuleMetadata::new("no-cond-assign", "Disallow assignment operators in conditional expressions", Problem)
                .recommended()
                .with_defaults(vec![json!("except-parens")]),
            RuleMetadata::new("no-const-assign", "Disallow reassigning `const` variables", Problem).recommended(),
            RuleMetadata::new("no-constant-condition", "Disallow constant expressions in conditions", Problem)
                .recommended()
                .with_defaults(vec![json!({ "checkLoops": true })]),
            RuleMetadata::new("no-control-regex", "Disallow control characters in regular expressions", Problem).recommended(),
            RuleMetadata::new("no-debugger", "Disallow the use of `debugger`", Problem).recommended(),
            RuleMetadata::new("no-dupe-args", "Disallow duplicate arguments in function definitions", Problem).recommended(),
            RuleMetadata::new("no-dupe-keys", "Disallow duplicate keys in object literals", Problem).recommended(),
            RuleMetadata::new("no-duplicate-case", "Disallow duplicate case labels", Problem).recommended(),
            RuleMetadata::new("no-empty-pattern", "Disallow empty destructuring patterns", Problem).recommended(),
            RuleMetadata::new("no-ex-assign", "Disallow reassigning exceptions in `catch` clauses", Problem).recommended(),
            RuleMetadata::new("no-fallthrough", "Disallow fallthrough of `case` statements", Problem).recommended(),
            RuleMetadata::new("no-func-assign", "Disallow reassigning `function` declarations", Problem).recommended(),
            RuleMetadata::new("no-inner-declarations", "Disallow declarations in nested blocks", Problem)
                .with_defaults(vec![json!("functions")]),
            RuleMetadata::new("no-irregular-whitespace", "Disallow irregular whitespace", Problem).recommended(),
            RuleMetadata::new("no-self-assign", "Disallow assignments where both sides are exactly the same", Problem).recommended(),
            RuleMetadata::new("no-sparse-arrays", "Disallow sparse arrays", Problem).recommended(),
            RuleMetadata::new("no-template-curly-in-string", "Disallow template literal placeholder syntax in regular strings", Problem),
            RuleMetadata::new("no-this-before-super", "Disallow `this`/`super` before calling `super()` in constructors", Problem).recommended(),
            RuleMetadata::new("no-undef", "Disallow the use of undeclared variables", Problem).recommended(),
            RuleMetadata::new("no-unreachable", "Disallow unreachable code after `return`, `throw`, `continue` and `break`", Problem).recommended(),
            RuleMetadata::new("no-unsafe-finally", "Disallow control flow statements in `finally` blocks", Problem).recommended(),
            RuleMetadata::new("no-unsafe-negation", "Disallow negating the left operand of relational operators", Problem).recommended(),
            RuleMetadata::new("no-unused-vars", "Disallow unused variables", Problem)
                .recommended()
                .with_defaults(vec![json!({ "vars": "all", "args": "after-used" })]),
            RuleMetadata::new("use-isnan", "Require calls to `isNaN()` when checking for `NaN`", Problem).recommended(),
            RuleMetadata::new("valid-typeof", "Enforce comparing `typeof` expressions against valid strings", Problem).recommended(),
        ]
    }

    pub fn suggestion_rules() -> Vec<RuleMetadata> {
        use RuleCategory::Suggestion;
        vec![
            RuleMetadata::new("accessor-pairs", "Enforce getter and setter pairs in objects and classes", Suggestion)
                .with_defaults(vec![json!({ "setWithoutGet": true })]),
            RuleMetadata::new("arrow-body-style", "Require braces around arrow function bodies", Suggestion)
                .with_defaults(vec![json!("as-needed")]),
            RuleMetadata::new("camelcase", "Enforce camelcase naming convention", Suggestion),
            RuleMetadata::new("complexity", "Enforce a maximum cyclomatic complexity allowed in a program", Suggestion)
                .with_defaults(vec![json!(20)]),
            RuleMetadata::new("curly", "Enforce consistent brace style for all control statements", Suggestion)
                .with_defaults(vec![json!("all")]),
            RuleMetadata::new("default-case-last", "Enforce default clauses in switch statements to be last", Suggestion),
            RuleMetadata::new("default-param-last", "Enforce default parameters to be last", Suggestion),
            RuleMetadata::new("dot-notation", "Enforce dot notation whenever possible", Suggestion),
            RuleMetadata::new("eqeqeq", "Require the use of `===` and `!==`", Suggestion)
                .with_defaults(vec![json!("always")]),
            RuleMetadata::new("func-names", "Require or disallow named `function` expressions", Suggestion)
                .with_defaults(vec![json!("always")]),
            RuleMetadata::new("grouped-accessor-pairs", "Require grouped accessor pairs in object literals and classes", Suggestion)
                .with_defaults(vec![json!("anyOrder")]),
            RuleMetadata::new("guard-for-in", "Require `for-in` loops to include an `if` statement", Suggestion),
            RuleMetadata::new("max-depth", "Enforce a maximum depth that blocks can be nested", Suggestion)
                .with_defaults(vec![json!(4)]),
            RuleMetadata::new("max-params", "Enforce a maximum number of parameters in function definitions", Suggestion)
                .with_defaults(vec![json!(3)]),
            RuleMetadata::new("no-console", "Disallow the use of `console`", Suggestion),
            RuleMetadata::new("no-empty", "Disallow empty block statements", Suggestion).recommended(),
            RuleMetadata::new("no-eval", "Disallow the use of `eval()`", Suggestion),
            RuleMetadata::new("no-unused-expressions", "Disallow unused expressions", Suggestion),
            RuleMetadata::new("no-useless-escape", "Disallow unnecessary escape characters", Suggestion).recommended(),
            RuleMetadata::new("no-var", "Require `let` or `const` instead of `var`", Suggestion),
            RuleMetadata::new("prefer-const", "Require `const` declarations for variables that are never reassigned", Suggestion)
                .with_defaults(vec![json!({ "destructuring": "any" })]),
        ]
    }

    pub fn layout_rules() -> Vec<RuleMetadata> {
        use RuleCategory::Layout;
        vec![
            RuleMetadata::new("brace-style", "Enforce consistent brace style for blocks", Layout)
                .with_defaults(vec![json!("1tbs")]),
            RuleMetadata::new("comma-dangle", "Require or disallow trailing commas", Layout)
                .with_defaults(vec![json!("never")]),
            RuleMetadata::new("eol-last", "Require or disallow newline at the end of files", Layout)
                .with_defaults(vec![json!("always")]),
            RuleMetadata::new("indent", "Enforce consistent indentation", Layout)
                .with_defaults(vec![json!(4)]),
            RuleMetadata::new("linebreak-style", "Enforce consistent linebreak style", Layout)
                .with_defaults(vec![json!("unix")]),
            RuleMetadata::new("max-len", "Enforce a maximum line length", Layout)
                .with_defaults(vec![json!({ "code": 80 })]),
            RuleMetadata::new("no-trailing-spaces", "Disallow trailing whitespace at the end of lines", Layout),
            RuleMetadata::new("quotes", "Enforce the consistent use of either backticks, double, or single quotes", Layout)
                .with_defaults(vec![json!("double")]),
            RuleMetadata::new("semi", "Require or disallow semicolons instead of ASI", Layout)
                .with_defaults(vec![json!("always")]),
            RuleMetadata::new("space-before-function-paren", "Enforce consistent spacing before `function` definition opening parenthesis", Layout)
                .with_defaults(vec![json!("always")]),
        ]
    }
}
