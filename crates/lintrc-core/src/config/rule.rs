//! Rule severities and rule entries

use schemars::JsonSchema;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use super::merge::integral;
use crate::error::LintrcError;
use crate::result::Result;
use crate::source::{ConfigLocation, DocumentSource};

/// Rule severity levels
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Disable the rule
    Off,
    /// Warning (doesn't fail the run)
    Warn,
    /// Error (fails the run)
    Error,
}

impl Severity {
    /// Read a severity token: `off|warn|warning|error`, `0|1|2`, or `"0"|"1"|"2"`
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(token) => Self::from_token(token),
            Value::Number(number) => match integral(number)? {
                0 => Some(Self::Off),
                1 => Some(Self::Warn),
                2 => Some(Self::Error),
                _ => None,
            },
            _ => None,
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "off" | "0" => Some(Self::Off),
            "warn" | "warning" | "1" => Some(Self::Warn),
            "error" | "2" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Off)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule value as written under `rules`
///
/// `"error"` is bare; `["error", "always"]` carries options. A one-element
/// array (`["error"]`) is the same as the bare form.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleEntry {
    Bare(Severity),
    Configured(Severity, Vec<Value>),
}

impl RuleEntry {
    pub fn severity(&self) -> Severity {
        match self {
            Self::Bare(severity) | Self::Configured(severity, _) => *severity,
        }
    }

    /// Parse a raw rule value, returning `None` when it has no usable severity
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => {
                let (first, options) = items.split_first()?;
                let severity = Severity::from_value(first)?;
                if options.is_empty() {
                    Some(Self::Bare(severity))
                } else {
                    Some(Self::Configured(severity, options.to_vec()))
                }
            }
            other => Severity::from_value(other).map(Self::Bare),
        }
    }

    /// Parse a raw rule value, reporting where a malformed entry was declared
    pub fn parse(
        rule: &str,
        value: &Value,
        source: &DocumentSource,
        location: ConfigLocation,
    ) -> Result<Self> {
        Self::from_value(value).ok_or_else(|| LintrcError::InvalidRuleSetting {
            rule: rule.to_string(),
            value: value.clone(),
            source_doc: source.clone(),
            location,
        })
    }
}

impl Serialize for RuleEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Bare(severity) => severity.serialize(serializer),
            Self::Configured(severity, options) => {
                let mut seq = serializer.serialize_seq(Some(options.len() + 1))?;
                seq.serialize_element(severity)?;
                for option in options {
                    seq.serialize_element(option)?;
                }
                seq.end()
            }
        }
    }
}

/// A resolved rule: one severity plus its ordered options
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSetting {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Value>,
}

impl RuleSetting {
    pub fn new(severity: Severity, options: Vec<Value>) -> Self {
        Self { severity, options }
    }

    pub fn is_enabled(&self) -> bool {
        self.severity.is_enabled()
    }
}
