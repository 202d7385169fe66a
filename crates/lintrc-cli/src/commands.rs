//! CLI command implementations
//!
//! Commands are organized hierarchically:
//! - Top-level commands (resolve, rules, schema) are implemented in this file
//! - commands/config/ holds configuration management (init, validate, show)

pub mod config;

use lintrc_core::{
    ConfigLoader, DocumentResolver, LintrcError, PolicyCompiler, PolicyDocument, PolicyTree,
    Result, RuleRegistry,
};
use lintrc_rules::{BuiltinRegistry, Presets, RuleCategory, RuleMetadata};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::OutputFormat;
use crate::output::{OutputFormatter, ResolveSummary, ResolvedFile, utils};

/// Compiler backed by the built-in catalog with every known plugin
pub(crate) fn policy_compiler(strict: bool) -> PolicyCompiler {
    PolicyCompiler::new(Arc::new(BuiltinRegistry::with_all_plugins())).strict(strict)
}

/// Locate the configuration file and flatten its `extends` chain
pub(crate) fn load_policy_tree(config_path: Option<&Path>) -> Result<(PathBuf, PolicyTree)> {
    let path = ConfigLoader::locate(config_path, None)?;
    info!("Using configuration {}", path.display());
    let presets: Arc<dyn DocumentResolver> = Arc::new(Presets::new());
    let tree = ConfigLoader::load_tree(&path, Some(presets))?;
    Ok((path, tree))
}

/// Every config from `dir` up to the nearest `root: true`, as one tree
pub(crate) fn load_cascade(dir: &Path) -> Result<(Vec<PathBuf>, PolicyTree)> {
    let presets: Arc<dyn DocumentResolver> = Arc::new(Presets::new());
    let (paths, tree) = ConfigLoader::load_cascade(dir, Some(presets))?;
    info!("Using {} configuration(s) for {}", paths.len(), dir.display());
    Ok((paths, tree))
}

/// Absolute form of a target path so it can be made relative to the config directory
fn target_path(path: &Path) -> Result<PathBuf> {
    if let Ok(canonical) = path.canonicalize() {
        return Ok(canonical);
    }
    std::path::absolute(path).map_err(|e| LintrcError::read_failed(path, e))
}

/// Nearest existing directory holding `target`, where config lookup starts
fn search_dir(target: &Path) -> PathBuf {
    target
        .ancestors()
        .skip(1)
        .find(|dir| dir.is_dir())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Targets sharing one policy tree, with their positions on the command line
struct TargetGroup {
    tree: PolicyTree,
    targets: Vec<(usize, PathBuf)>,
}

/// Group targets by the tree that applies to them
///
/// With an explicit config every target shares it. Otherwise each directory
/// gets the cascade of configs above it.
fn group_targets(
    targets: Vec<PathBuf>,
    config_path: Option<&Path>,
    configs: &mut Vec<PathBuf>,
) -> Result<Vec<TargetGroup>> {
    if let Some(path) = config_path {
        let (path, tree) = load_policy_tree(Some(path))?;
        configs.push(path);
        return Ok(vec![TargetGroup {
            tree,
            targets: targets.into_iter().enumerate().collect(),
        }]);
    }

    let mut by_dir: BTreeMap<PathBuf, Vec<(usize, PathBuf)>> = BTreeMap::new();
    for (index, target) in targets.into_iter().enumerate() {
        by_dir.entry(search_dir(&target)).or_default().push((index, target));
    }

    let mut groups = Vec::with_capacity(by_dir.len());
    for (dir, targets) in by_dir {
        let (paths, tree) = load_cascade(&dir)?;
        for path in paths.into_iter().rev() {
            if !configs.contains(&path) {
                configs.push(path);
            }
        }
        groups.push(TargetGroup { tree, targets });
    }
    Ok(groups)
}

/// Resolve command implementation
pub fn resolve_command(
    files: Vec<PathBuf>,
    format: OutputFormat,
    only_enabled: bool,
    strict: bool,
    config_path: Option<PathBuf>,
    use_colors: bool,
) -> Result<()> {
    let start = Instant::now();
    let targets = files
        .iter()
        .map(|file| target_path(file))
        .collect::<Result<Vec<_>>>()?;

    let mut configs = Vec::new();
    let groups = group_targets(targets, config_path.as_deref(), &mut configs)?;
    debug!(
        "Resolving against {} tree(s) built from {} config file(s)",
        groups.len(),
        configs.len()
    );

    let compiler = policy_compiler(strict);
    let mut slots: Vec<Option<ResolvedFile>> = Vec::new();
    slots.resize_with(files.len(), || None);
    for group in groups {
        let paths: Vec<&PathBuf> = group.targets.iter().map(|(_, target)| target).collect();
        let results = compiler.compile_many(&group.tree, &paths);
        for ((index, target), result) in group.targets.iter().zip(results) {
            let policy = result?;
            let policy = if only_enabled {
                policy.only_enabled()
            } else {
                policy
            };
            slots[*index] = Some(ResolvedFile {
                ignored: group.tree.is_ignored(target),
                policy,
            });
        }
    }
    let resolved: Vec<ResolvedFile> = slots.into_iter().flatten().collect();

    let summary = ResolveSummary::new(configs, &resolved);
    info!(
        "Resolved {} file(s) in {}",
        summary.files,
        utils::format_duration(start.elapsed())
    );

    OutputFormatter::new(format, use_colors).print_policies(&resolved, &summary)
}

fn rule_matches_category(rule: &RuleMetadata, category: Option<RuleCategory>) -> bool {
    category.is_none_or(|category| rule.category == category)
}

fn parse_category(category: Option<String>) -> Result<Option<RuleCategory>> {
    let Some(slug) = category else {
        return Ok(None);
    };
    RuleCategory::from_slug(&slug).map(Some).ok_or_else(|| {
        let known: Vec<_> = RuleCategory::all().iter().map(|c| c.slug()).collect();
        LintrcError::config_error(format!(
            "Unknown rule category '{slug}' (expected one of: {})",
            known.join(", ")
        ))
    })
}

/// Rules list command implementation
pub fn rules_list_command(detailed: bool, category: Option<String>) -> Result<()> {
    debug!("Listing available rules");

    let category = parse_category(category)?;
    let registry = BuiltinRegistry::with_all_plugins();

    println!("Available Rules:");
    println!("================");

    let mut count = 0;
    for rule in registry
        .rules()
        .filter(|rule| rule_matches_category(rule, category))
    {
        count += 1;

        if detailed {
            println!("\n{}", rule.id);
            println!("  Description: {}", rule.description);
            println!("  Category: {}", rule.category);
            println!(
                "  Source: {}",
                rule.plugin.map_or("core".to_string(), |p| format!("plugin {p}"))
            );
            if rule.recommended {
                println!("  Recommended: yes");
            }
            if !rule.default_options.is_empty() {
                println!(
                    "  Default options: {}",
                    serde_json::Value::from(rule.default_options.clone())
                );
            }
        } else {
            println!("  {} - {}", rule.id, rule.description);
        }
    }

    if count == 0 {
        println!("\nNo rules found matching the specified filters.");
    } else {
        println!("\nTotal: {count} rules");
    }

    Ok(())
}

/// Rules explain command implementation
pub fn rules_explain_command(rule_id: String) -> Result<()> {
    debug!("Explaining rule: {}", rule_id);

    let registry = BuiltinRegistry::with_all_plugins();

    match registry.get(&rule_id) {
        Some(rule) => {
            println!("Rule: {}", rule.id);
            println!("{}", "=".repeat(rule.id.len() + 6));
            println!();
            println!("Category: {}", rule.category);
            println!("Description: {}", rule.description);
            match rule.plugin {
                Some(plugin) => println!("Plugin: {plugin} (add \"{plugin}\" to plugins)"),
                None => println!("Plugin: none (core rule)"),
            }
            println!(
                "Recommended: {}",
                if rule.recommended { "yes" } else { "no" }
            );
            println!();
            if rule.default_options.is_empty() {
                println!("Default options: none");
            } else {
                let options = serde_json::to_string_pretty(&rule.default_options).map_err(|e| {
                    LintrcError::Serialization {
                        message: format!("Failed to serialize options: {e}"),
                    }
                })?;
                println!("Default options (used for a bare severity):");
                println!("{options}");
            }
        }
        None => {
            println!("Rule '{rule_id}' not found.");
            if let Some(candidate) = registry.suggest(&rule_id) {
                println!("Did you mean '{candidate}'?");
            }
            println!();
            println!("Use 'lintrc rules' to list all available rules.");
        }
    }

    Ok(())
}

/// Rules search command implementation
pub fn rules_search_command(query: String) -> Result<()> {
    debug!("Searching rules for: {}", query);

    let registry = BuiltinRegistry::with_all_plugins();
    let query_lower = query.to_lowercase();

    let matches: Vec<_> = registry
        .rules()
        .filter(|rule| {
            rule.id.to_lowercase().contains(&query_lower)
                || rule.description.to_lowercase().contains(&query_lower)
        })
        .collect();

    if matches.is_empty() {
        println!("No rules found matching '{query}'");
    } else {
        println!("Rules matching '{query}':");
        println!("{}", "=".repeat(18 + query.len()));
        println!();
        for rule in matches {
            println!("  {} - {} ({})", rule.id, rule.description, rule.category);
        }
    }

    Ok(())
}

/// Schema command implementation
pub fn schema_command() -> Result<()> {
    let schema = PolicyDocument::json_schema();
    let json = serde_json::to_string_pretty(&schema).map_err(|e| LintrcError::Serialization {
        message: format!("Failed to serialize schema: {e}"),
    })?;
    println!("{json}");
    Ok(())
}
