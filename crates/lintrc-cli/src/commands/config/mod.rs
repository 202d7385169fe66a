//! Configuration management subcommands
//!
//! - init: Create a new configuration file
//! - validate: Check a configuration and everything it extends
//! - show: Display the configuration as written or after resolving extends

use colored::*;
use lintrc_core::{LintrcError, OverrideBlock, PolicyDocument, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, error};

use super::{load_policy_tree, policy_compiler};
use crate::ConfigFormat;

fn serialize_document(document: &PolicyDocument, format: ConfigFormat) -> Result<String> {
    let serialized = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(document).map_err(|e| e.to_string()),
        ConfigFormat::Yaml => serde_yaml::to_string(document).map_err(|e| e.to_string()),
        ConfigFormat::Toml => toml::to_string_pretty(document).map_err(|e| e.to_string()),
    };
    serialized.map_err(|message| LintrcError::Serialization {
        message: format!("Failed to serialize {format:?} config: {message}"),
    })
}

/// Config init command implementation
pub fn init_command(format: ConfigFormat, force: bool, with_examples: bool) -> Result<()> {
    debug!("Initializing configuration file with format: {:?}", format);

    let filename = match format {
        ConfigFormat::Json => ".lintrc.json",
        ConfigFormat::Yaml => ".lintrc.yaml",
        ConfigFormat::Toml => ".lintrc.toml",
    };
    let config_path = PathBuf::from(filename);

    if config_path.exists() && !force {
        error!(
            "Configuration file '{}' already exists. Use --force to overwrite.",
            filename
        );
        return Err(LintrcError::config_error(format!(
            "Configuration file '{filename}' already exists"
        )));
    }

    let document = if with_examples {
        create_example_config()
    } else {
        create_minimal_config()
    };
    let content = serialize_document(&document, format)?;
    std::fs::write(&config_path, content)
        .map_err(|e| LintrcError::read_failed(&config_path, e))?;

    println!("✅ Created configuration file: {filename}");
    if with_examples {
        println!("   The file includes example rules, environments and overrides.");
    }
    println!("   Edit the file to customize your lint policy.");

    Ok(())
}

/// Config validate command implementation
pub fn validate_command(path: Option<PathBuf>, strict: bool) -> Result<()> {
    debug!("Validating configuration file: {:?}", path);

    let checked = load_policy_tree(path.as_deref()).and_then(|(path, tree)| {
        let diagnostics = policy_compiler(strict).check_tree(&tree)?;
        Ok((path, tree, diagnostics))
    });

    let (path, tree, diagnostics) = match checked {
        Ok(checked) => checked,
        Err(e) => {
            error!("❌ Configuration validation failed: {}", e);
            return Err(e);
        }
    };

    println!("✅ Configuration is valid: {}", path.display());
    println!("   Documents: {}", tree.sources().len());
    for source in tree.sources() {
        println!("     - {source}");
    }
    println!("   Base rules: {}", tree.base_rules().len());
    println!("   Overrides: {}", tree.overrides().count());

    if !diagnostics.is_empty() {
        println!();
        for diagnostic in &diagnostics {
            println!("{} {}", "warning:".yellow().bold(), diagnostic);
        }
        println!(
            "   {} warning(s); run with --strict to treat them as errors",
            diagnostics.len()
        );
    }

    Ok(())
}

/// Config show command implementation
pub fn show_command(resolved: bool, config_path: Option<PathBuf>) -> Result<()> {
    debug!("Showing configuration (resolved: {})", resolved);

    let value = if resolved {
        let (path, tree) = load_policy_tree(config_path.as_deref())?;
        let overrides: Vec<_> = tree
            .overrides()
            .map(|scoped| {
                let rules: BTreeMap<_, _> = scoped
                    .layer
                    .rules
                    .iter()
                    .map(|(name, entry)| (name, entry))
                    .collect();
                serde_json::json!({
                    "source": scoped.layer.source,
                    "location": scoped.layer.location,
                    "files": scoped
                        .scope
                        .selectors()
                        .iter()
                        .map(|selector| selector.patterns())
                        .collect::<Vec<_>>(),
                    "rules": rules,
                })
            })
            .collect();

        println!("Resolved Configuration ({}):", path.display());
        println!("======================");
        serde_json::json!({
            "sources": tree.sources(),
            "env": tree.base_env(),
            "rules": tree.base_rules(),
            "overrides": overrides,
        })
    } else {
        let (path, document) = lintrc_core::ConfigLoader::load(config_path.as_deref(), None)?;
        println!("Configuration ({}):", path.display());
        println!("==============");
        serde_json::to_value(&document).map_err(|e| LintrcError::Serialization {
            message: format!("Failed to serialize config: {e}"),
        })?
    };

    let json = serde_json::to_string_pretty(&value).map_err(|e| LintrcError::Serialization {
        message: format!("Failed to serialize config: {e}"),
    })?;
    println!("{json}");

    Ok(())
}

/// Create a minimal default configuration
fn create_minimal_config() -> PolicyDocument {
    PolicyDocument::new()
        .with_root(true)
        .with_extends("lintrc:recommended")
        .with_env("es2022", true)
        .with_parser_option("ecmaVersion", 2022)
        .with_parser_option("sourceType", "module")
}

/// Create an example configuration with sample rules
fn create_example_config() -> PolicyDocument {
    create_minimal_config()
        .with_env("browser", true)
        .with_env("node", true)
        .with_rule("semi", serde_json::json!(["error", "always"]))
        .with_rule("quotes", serde_json::json!(["warn", "double"]))
        .with_rule("eqeqeq", "error")
        .with_rule("no-console", "warn")
        .with_ignore_pattern("dist/**")
        .with_ignore_pattern("node_modules/**")
        .with_override(
            OverrideBlock::new(["**/*.test.js", "**/*.spec.js"])
                .with_env("jest", true)
                .with_rule("no-console", "off"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintrc_core::ConfigLoader;
    use std::path::Path;

    #[test]
    fn test_generated_configs_load_back() {
        for format in [ConfigFormat::Json, ConfigFormat::Yaml, ConfigFormat::Toml] {
            let document = create_example_config();
            let content = serialize_document(&document, format).unwrap();
            let path = match format {
                ConfigFormat::Json => Path::new(".lintrc.json"),
                ConfigFormat::Yaml => Path::new(".lintrc.yaml"),
                ConfigFormat::Toml => Path::new(".lintrc.toml"),
            };
            let parsed = ConfigLoader::parse_str(
                &content,
                lintrc_core::config::ConfigFormat::from_path(path),
                path,
            )
            .unwrap();
            assert_eq!(parsed, document, "{format:?} round trip");
        }
    }

    #[test]
    fn test_example_config_compiles_strictly() {
        let compiler = policy_compiler(true)
            .with_resolver(std::sync::Arc::new(lintrc_rules::Presets::new()));
        let policy = compiler
            .compile(&create_example_config(), "src/app.test.js")
            .unwrap();
        assert!(policy.has_env("jest"));
        assert!(!policy.is_enabled("no-console"));
        assert!(policy.is_enabled("no-debugger"));
    }
}
