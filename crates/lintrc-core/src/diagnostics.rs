//! Non-fatal findings recorded while compiling a policy

use serde::Serialize;
use std::fmt;

use crate::source::{ConfigLocation, DocumentSource};

/// How serious a configuration diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

/// What a configuration diagnostic is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    UnknownRule,
    UnknownEnvironment,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownRule => "unknown-rule",
            Self::UnknownEnvironment => "unknown-environment",
        }
    }
}

/// A problem that was tolerated instead of failing compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigDiagnostic {
    pub level: DiagnosticLevel,
    pub code: DiagnosticCode,
    pub message: String,
    pub source: DocumentSource,
    pub location: ConfigLocation,
}

impl ConfigDiagnostic {
    /// Warning for a rule the registry does not know
    pub fn unknown_rule(
        rule: &str,
        suggestion: Option<&str>,
        source: &DocumentSource,
        location: ConfigLocation,
    ) -> Self {
        let message = match suggestion {
            Some(candidate) => {
                format!("Unknown rule '{rule}' was ignored. Did you mean '{candidate}'?")
            }
            None => format!("Unknown rule '{rule}' was ignored"),
        };
        Self {
            level: DiagnosticLevel::Warning,
            code: DiagnosticCode::UnknownRule,
            message,
            source: source.clone(),
            location,
        }
    }

    /// Warning for an environment with no globals bundle
    pub fn unknown_environment(
        env: &str,
        source: &DocumentSource,
        location: ConfigLocation,
    ) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            code: DiagnosticCode::UnknownEnvironment,
            message: format!("Unknown environment '{env}' was ignored"),
            source: source.clone(),
            location,
        }
    }
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {} [{}]",
            self.source,
            self.location,
            self.message,
            self.code.as_str()
        )
    }
}
