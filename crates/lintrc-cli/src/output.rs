//! Output formatting and reporting
//!
//! Renders effective policies as colored text or JSON

use colored::*;
use lintrc_core::{ConfigDiagnostic, EffectivePolicy, LintrcError, Result, RuleSetting, Severity};
use serde::Serialize;
use std::path::PathBuf;

use crate::OutputFormat;

/// One compiled file as reported by `lintrc resolve`
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    pub policy: EffectivePolicy,
    /// Matched by `ignorePatterns`; the policy is still reported
    pub ignored: bool,
}

/// Summary statistics for a resolve run
#[derive(Debug, Clone, Serialize)]
pub struct ResolveSummary {
    #[serde(skip)]
    pub configs: Vec<PathBuf>,
    pub files: usize,
    pub ignored: usize,
    pub diagnostics: usize,
}

impl ResolveSummary {
    pub fn new(configs: Vec<PathBuf>, resolved: &[ResolvedFile]) -> Self {
        Self {
            configs,
            files: resolved.len(),
            ignored: resolved.iter().filter(|file| file.ignored).count(),
            diagnostics: resolved
                .iter()
                .map(|file| file.policy.diagnostics().len())
                .sum(),
        }
    }
}

/// Output formatter for different formats
pub struct OutputFormatter {
    format: OutputFormat,
    use_colors: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, use_colors: bool) -> Self {
        Self { format, use_colors }
    }

    /// Format and print compiled policies
    pub fn print_policies(&self, resolved: &[ResolvedFile], summary: &ResolveSummary) -> Result<()> {
        match self.format {
            OutputFormat::Human => self.print_human_format(resolved, summary),
            OutputFormat::Json => self.print_json_format(resolved, summary),
        }
    }

    fn print_human_format(&self, resolved: &[ResolvedFile], summary: &ResolveSummary) -> Result<()> {
        for file in resolved {
            let policy = &file.policy;
            if file.ignored {
                println!("{} {}", policy.path().bold(), "(ignored)".dimmed());
            } else {
                println!("{}", policy.path().bold());
            }

            let env: Vec<_> = policy.env().iter().map(String::as_str).collect();
            println!("  env: {}", list_or_none(&env));
            if let Some(parser) = policy.parser() {
                println!("  parser: {parser}");
            }
            let plugins: Vec<_> = policy.plugins().iter().map(String::as_str).collect();
            println!("  plugins: {}", list_or_none(&plugins));
            if !policy.parser_options().is_empty() {
                println!(
                    "  parserOptions: {}",
                    serde_json::Value::Object(policy.parser_options().clone())
                );
            }
            if !policy.settings().is_empty() {
                println!(
                    "  settings: {}",
                    serde_json::Value::Object(policy.settings().clone())
                );
            }

            if policy.rules().is_empty() {
                println!("  rules: none");
            } else {
                println!("  rules:");
                let width = policy.rules().keys().map(String::len).max().unwrap_or(0);
                for (name, setting) in policy.rules() {
                    println!("    {}", self.format_rule(name, setting, width));
                }
            }

            for diagnostic in policy.diagnostics() {
                println!("  {}", self.format_diagnostic(diagnostic));
            }
            println!();
        }

        self.print_summary_human(summary);
        Ok(())
    }

    fn format_rule(&self, name: &str, setting: &RuleSetting, width: usize) -> String {
        let severity = format!("{:<5}", setting.severity.as_str());
        let severity = if !self.use_colors {
            severity
        } else {
            match setting.severity {
                Severity::Error => severity.red().to_string(),
                Severity::Warn => severity.yellow().to_string(),
                Severity::Off => severity.dimmed().to_string(),
            }
        };

        if setting.options.is_empty() {
            format!("{name:<width$}  {severity}").trim_end().to_string()
        } else {
            format!(
                "{name:<width$}  {severity}  {}",
                serde_json::Value::from(setting.options.clone())
            )
        }
    }

    fn format_diagnostic(&self, diagnostic: &ConfigDiagnostic) -> String {
        let label = if self.use_colors {
            "warning:".yellow().bold().to_string()
        } else {
            "warning:".to_string()
        };
        format!("{label} {diagnostic}")
    }

    fn print_summary_human(&self, summary: &ResolveSummary) {
        println!("{}", "Summary:".bold());
        for config in &summary.configs {
            println!("  Config: {}", config.display());
        }
        println!("  Files resolved: {}", summary.files);
        if summary.ignored > 0 {
            println!("  Ignored by ignorePatterns: {}", summary.ignored);
        }
        if summary.diagnostics > 0 {
            println!(
                "  Configuration warnings: {}",
                summary.diagnostics.to_string().yellow()
            );
        }
    }

    fn print_json_format(&self, resolved: &[ResolvedFile], summary: &ResolveSummary) -> Result<()> {
        let report = JsonReport {
            configs: summary
                .configs
                .iter()
                .map(|config| config.display().to_string())
                .collect(),
            files: resolved
                .iter()
                .map(|file| JsonFile {
                    policy: &file.policy,
                    ignored: file.ignored,
                })
                .collect(),
            summary,
        };

        println!(
            "{}",
            serde_json::to_string_pretty(&report).map_err(|e| LintrcError::Serialization {
                message: format!("Failed to serialize JSON: {e}"),
            })?
        );
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    configs: Vec<String>,
    files: Vec<JsonFile<'a>>,
    summary: &'a ResolveSummary,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    #[serde(flatten)]
    policy: &'a EffectivePolicy,
    ignored: bool,
}

fn list_or_none(items: &[&str]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

/// Utility functions for output formatting
pub mod utils {
    /// Format duration in human-readable format
    pub fn format_duration(duration: std::time::Duration) -> String {
        let total_ms = duration.as_millis();

        if total_ms < 1000 {
            format!("{total_ms}ms")
        } else {
            format!("{:.1}s", total_ms as f64 / 1000.0)
        }
    }
}
