//! Policy document model
//!
//! A [`PolicyDocument`] is the deserialized form of one configuration file
//! (or preset). It is loaded once and never mutated by the resolver; the
//! `extends` chain is flattened separately into a [`PolicyTree`].
//!
//! ```jsonc
//! {
//!   "root": true,
//!   "extends": ["lintrc:recommended", "./base.json"],
//!   "env": { "browser": true },
//!   "rules": { "semi": ["error", "always"], "no-console": "warn" },
//!   "overrides": [
//!     { "files": ["*.test.ts"], "env": { "jest": true }, "rules": { "no-console": "off" } }
//!   ]
//! }
//! ```
//!
//! [`PolicyTree`]: crate::tree::PolicyTree

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PolicyDocument {
    /// Editor schema hint, ignored by the resolver
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    #[schemars(skip)]
    pub schema: Option<String>,

    /// Stop configuration discovery at this document
    #[serde(default, skip_serializing_if = "is_false")]
    #[schemars(description = "Stop looking for configuration files in parent directories")]
    pub root: bool,

    /// Documents applied before this one, earliest first
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    #[schemars(
        with = "Vec<String>",
        description = "Configurations to inherit from (paths or lintrc:<preset>)"
    )]
    pub extends: Vec<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    #[schemars(description = "Environments to enable (true) or disable (false)")]
    pub env: IndexMap<String, bool>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    #[schemars(description = "Additional global variables and their access")]
    pub globals: IndexMap<String, GlobalAccess>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schemars(description = "Plugins whose rules may be configured")]
    pub plugins: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Parser module used for matching files")]
    pub parser: Option<String>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    #[schemars(description = "Options passed to the parser")]
    pub parser_options: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    #[schemars(description = "Shared settings passed to every rule")]
    pub settings: Map<String, Value>,

    /// Rule values as written, validated when the tree is built
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    #[schemars(description = "Rule severities: \"off\" | \"warn\" | \"error\" or [severity, ...options]")]
    pub rules: IndexMap<String, Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schemars(description = "Glob patterns for files the linter should skip")]
    pub ignore_patterns: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schemars(description = "Path-scoped settings, later blocks win")]
    pub overrides: Vec<OverrideBlock>,
}

/// A path-scoped partial document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OverrideBlock {
    /// Globs selecting files; entries starting with `!` exclude
    #[serde(deserialize_with = "one_or_many")]
    #[schemars(with = "Vec<String>")]
    pub files: Vec<String>,

    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    #[schemars(with = "Vec<String>")]
    pub excluded_files: Vec<String>,

    /// Documents applied to matching files before this block's own settings
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    #[schemars(with = "Vec<String>")]
    pub extends: Vec<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, bool>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub globals: IndexMap<String, GlobalAccess>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parser_options: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub settings: Map<String, Value>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub rules: IndexMap<String, Value>,
}

/// Access mode of a global variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum GlobalAccess {
    Readonly,
    Writable,
    Off,
}

impl GlobalAccess {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Readonly => "readonly",
            Self::Writable => "writable",
            Self::Off => "off",
        }
    }
}

impl<'de> Deserialize<'de> for GlobalAccess {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(bool),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Flag(true) => Ok(Self::Writable),
            Repr::Flag(false) => Ok(Self::Readonly),
            Repr::Name(name) => match name.as_str() {
                "readonly" | "readable" => Ok(Self::Readonly),
                "writable" | "writeable" => Ok(Self::Writable),
                "off" => Ok(Self::Off),
                other => Err(serde::de::Error::custom(format!(
                    "unknown global access '{other}' (expected readonly, writable or off)"
                ))),
            },
        }
    }
}

impl PolicyDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON Schema describing the document format
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(PolicyDocument)
    }

    pub fn with_root(mut self, root: bool) -> Self {
        self.root = root;
        self
    }

    pub fn with_extends(mut self, reference: impl Into<String>) -> Self {
        self.extends.push(reference.into());
        self
    }

    pub fn with_env(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.env.insert(name.into(), enabled);
        self
    }

    pub fn with_global(mut self, name: impl Into<String>, access: GlobalAccess) -> Self {
        self.globals.insert(name.into(), access);
        self
    }

    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugins.push(plugin.into());
        self
    }

    pub fn with_rule(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.rules.insert(name.into(), value.into());
        self
    }

    pub fn with_parser_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parser_options.insert(key.into(), value.into());
        self
    }

    pub fn with_ignore_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.ignore_patterns.push(pattern.into());
        self
    }

    pub fn with_override(mut self, block: OverrideBlock) -> Self {
        self.overrides.push(block);
        self
    }
}

impl OverrideBlock {
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_excluded(mut self, pattern: impl Into<String>) -> Self {
        self.excluded_files.push(pattern.into());
        self
    }

    pub fn with_extends(mut self, reference: impl Into<String>) -> Self {
        self.extends.push(reference.into());
        self
    }

    pub fn with_env(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.env.insert(name.into(), enabled);
        self
    }

    pub fn with_global(mut self, name: impl Into<String>, access: GlobalAccess) -> Self {
        self.globals.insert(name.into(), access);
        self
    }

    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugins.push(plugin.into());
        self
    }

    pub fn with_rule(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.rules.insert(name.into(), value.into());
        self
    }

    pub fn with_parser_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parser_options.insert(key.into(), value.into());
        self
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Accept either `"x"` or `["x", "y"]`
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}
