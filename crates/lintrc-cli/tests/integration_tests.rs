//! Integration tests for the lintrc CLI
//!
//! These tests verify the CLI behavior end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper function to create a test CLI command
#[allow(deprecated)]
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("lintrc").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("LINTRC_CONFIG");
    cmd
}

fn cli_in(dir: &Path) -> Command {
    let mut cmd = cli();
    cmd.current_dir(dir).arg("--no-color");
    cmd
}

/// Helper function to create a temporary project with a layered configuration
fn create_test_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::create_dir_all(root.join("src")).unwrap();
    fs::create_dir_all(root.join("config")).unwrap();
    fs::write(root.join("src/app.ts"), "export const answer = 42;\n").unwrap();
    fs::write(root.join("src/app.test.ts"), "test('answer', () => {});\n").unwrap();

    let config_content = r#"
{
  // project policy
  "root": true,
  "extends": ["lintrc:recommended", "./config/style.yaml"],
  "env": { "node": true },
  "rules": {
    "semi": ["error", "always"],
    "no-console": "warn",
  },
  "ignorePatterns": ["dist/**"],
  "overrides": [
    {
      "files": ["**/*.test.ts"],
      "env": { "jest": true },
      "rules": { "no-console": "off" }
    }
  ]
}
"#;
    fs::write(root.join(".lintrc.json"), config_content).unwrap();
    fs::write(
        root.join("config/style.yaml"),
        "rules:\n  quotes: [warn, single]\n  semi: off\n",
    )
    .unwrap();

    temp_dir
}

fn resolve_json(dir: &Path, files: &[&str]) -> Value {
    let output = cli_in(dir)
        .args(["resolve", "--format", "json"])
        .args(files)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "lintrc composes policy documents",
        ))
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_version_detailed() {
    cli()
        .args(["version", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Build information"))
        .stdout(predicate::str::contains("lintrc:recommended"));
}

#[test]
fn test_resolve_json_applies_overrides() {
    let project = create_test_project();
    let result = resolve_json(project.path(), &["src/app.ts", "src/app.test.ts"]);

    let files = result["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);

    let app = &files[0];
    assert_eq!(app["path"], "src/app.ts");
    assert_eq!(app["rules"]["semi"]["severity"], "error");
    assert_eq!(app["rules"]["semi"]["options"][0], "always");
    assert_eq!(app["rules"]["quotes"]["options"][0], "single");
    assert_eq!(app["rules"]["no-console"]["severity"], "warn");
    assert_eq!(app["rules"]["no-debugger"]["severity"], "error");
    assert_eq!(app["env"], serde_json::json!(["node"]));

    let test = &files[1];
    assert_eq!(test["path"], "src/app.test.ts");
    assert_eq!(test["rules"]["no-console"]["severity"], "off");
    assert_eq!(test["env"], serde_json::json!(["jest", "node"]));
    assert_eq!(test["globals"]["describe"], "readonly");
    assert_eq!(test["ignored"], false);
}

#[test]
fn test_resolve_only_enabled() {
    let project = create_test_project();
    let output = cli_in(project.path())
        .args(["resolve", "--format", "json", "--only-enabled", "src/app.test.ts"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    let rules = result["files"][0]["rules"].as_object().unwrap();
    assert!(!rules.contains_key("no-console"));
    assert!(rules.contains_key("semi"));
}

#[test]
fn test_resolve_human_output() {
    let project = create_test_project();
    cli_in(project.path())
        .args(["resolve", "src/app.test.ts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("src/app.test.ts"))
        .stdout(predicate::str::contains("env: jest, node"))
        .stdout(predicate::str::contains("Files resolved: 1"));
}

#[test]
fn test_resolve_marks_ignored_files() {
    let project = create_test_project();
    let result = resolve_json(project.path(), &["dist/bundle.js"]);
    assert_eq!(result["files"][0]["ignored"], true);
    assert_eq!(result["summary"]["ignored"], 1);
}

#[test]
fn test_resolve_unknown_rule_lenient_and_strict() {
    let project = create_test_project();
    fs::write(
        project.path().join(".lintrc.json"),
        r#"{ "root": true, "rules": { "no-consle": "error" } }"#,
    )
    .unwrap();

    let result = resolve_json(project.path(), &["src/app.ts"]);
    let diagnostics = result["files"][0]["diagnostics"].as_array().unwrap();
    assert_eq!(diagnostics[0]["code"], "unknown-rule");
    assert!(
        diagnostics[0]["message"]
            .as_str()
            .unwrap()
            .contains("Did you mean 'no-console'?")
    );

    cli_in(project.path())
        .args(["--strict", "resolve", "src/app.ts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown rule 'no-consle'"));
}

#[test]
fn test_resolve_cascades_nested_configs() {
    let project = create_test_project();
    let root = project.path();
    fs::create_dir_all(root.join("packages/web/src")).unwrap();
    fs::write(
        root.join("packages/web/.lintrc.yml"),
        "env:\n  browser: true\nrules:\n  semi: warn\n",
    )
    .unwrap();

    let result = resolve_json(root, &["packages/web/src/main.ts", "src/app.ts"]);
    assert_eq!(result["configs"].as_array().unwrap().len(), 2);

    let web = &result["files"][0];
    assert_eq!(web["path"], "packages/web/src/main.ts");
    assert_eq!(web["env"], serde_json::json!(["browser", "node"]));
    assert_eq!(web["rules"]["semi"]["severity"], "warn");
    assert_eq!(web["rules"]["quotes"]["options"][0], "single");

    let app = &result["files"][1];
    assert_eq!(app["path"], "src/app.ts");
    assert_eq!(app["env"], serde_json::json!(["node"]));
    assert_eq!(app["rules"]["semi"]["severity"], "error");

    let output = cli_in(root)
        .args(["-c", ".lintrc.json", "resolve", "--format", "json", "packages/web/src/main.ts"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let explicit: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(explicit["files"][0]["env"], serde_json::json!(["node"]));
}

#[test]
fn test_resolve_with_explicit_config() {
    let project = create_test_project();
    let other = project.path().join("config/only-semi.toml");
    fs::write(&other, "root = true\n\n[rules]\nsemi = \"warn\"\n").unwrap();

    let output = cli_in(project.path())
        .args(["-c", "config/only-semi.toml", "resolve", "--format", "json", "config/x.js"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    let policy = &result["files"][0];
    assert_eq!(policy["path"], "x.js");
    assert_eq!(policy["rules"]["semi"]["severity"], "warn");
    assert_eq!(policy["rules"]["semi"]["options"][0], "always");
}

#[test]
fn test_resolve_missing_config() {
    let project = create_test_project();
    cli_in(project.path())
        .args(["-c", "nope.json", "resolve", "src/app.ts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_config_validate_success() {
    let project = create_test_project();
    cli_in(project.path())
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("lintrc:recommended"))
        .stdout(predicate::str::contains("Overrides: 1"));
}

#[test]
fn test_config_validate_reports_cycle() {
    let project = create_test_project();
    let root = project.path();
    fs::write(root.join("a.json"), r#"{ "extends": "./b.json" }"#).unwrap();
    fs::write(root.join("b.json"), r#"{ "extends": "./a.json" }"#).unwrap();

    cli_in(root)
        .args(["config", "validate", "a.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration cycle detected"));
}

#[test]
fn test_config_validate_checks_unmatched_overrides() {
    let project = create_test_project();
    fs::write(
        project.path().join(".lintrc.yaml"),
        "root: true\noverrides:\n  - files: ['legacy/**']\n    rules:\n      no-vra: error\n",
    )
    .unwrap();

    cli_in(project.path())
        .args(["config", "validate", ".lintrc.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Did you mean 'no-var'?"));

    cli_in(project.path())
        .args(["--strict", "config", "validate", ".lintrc.yaml"])
        .assert()
        .failure();
}

#[test]
fn test_config_init_and_force() {
    let temp_dir = TempDir::new().unwrap();

    cli_in(temp_dir.path())
        .args(["config", "init", "--with-examples"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".lintrc.json"));
    assert!(temp_dir.path().join(".lintrc.json").exists());

    cli_in(temp_dir.path())
        .args(["config", "init"])
        .assert()
        .failure();

    cli_in(temp_dir.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();

    cli_in(temp_dir.path())
        .args(["--strict", "config", "validate"])
        .assert()
        .success();
}

#[test]
fn test_config_init_toml_resolves() {
    let temp_dir = TempDir::new().unwrap();

    cli_in(temp_dir.path())
        .args(["config", "init", "--format", "toml", "--with-examples"])
        .assert()
        .success();

    let result = resolve_json(temp_dir.path(), &["src/app.spec.js"]);
    let policy = &result["files"][0];
    assert_eq!(policy["rules"]["no-console"]["severity"], "off");
    assert_eq!(policy["parserOptions"]["ecmaVersion"], 2022);
}

#[test]
fn test_config_show() {
    let project = create_test_project();
    cli_in(project.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ignorePatterns\""));

    cli_in(project.path())
        .args(["config", "show", "--resolved"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved Configuration"))
        .stdout(predicate::str::contains("style.yaml"))
        .stdout(predicate::str::contains("overrides[0]"));
}

#[test]
fn test_rules_list() {
    cli()
        .args(["rules", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no-console"))
        .stdout(predicate::str::contains("import/no-cycle"))
        .stdout(predicate::str::contains("Total:"));
}

#[test]
fn test_rules_list_by_category() {
    cli()
        .args(["rules", "--category", "layout", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("semi"))
        .stdout(predicate::str::contains("Category: layout"))
        .stdout(predicate::str::contains("no-debugger").not());

    cli()
        .args(["rules", "--category", "style"])
        .assert()
        .failure();
}

#[test]
fn test_rules_explain() {
    cli()
        .args(["rules", "explain", "semi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rule: semi"))
        .stdout(predicate::str::contains("\"always\""));
}

#[test]
fn test_rules_explain_nonexistent() {
    cli()
        .args(["rules", "explain", "no-debuger"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not found"))
        .stdout(predicate::str::contains("Did you mean 'no-debugger'?"));
}

#[test]
fn test_rules_search() {
    cli()
        .args(["rules", "search", "cycle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("import/no-cycle"));
}

#[test]
fn test_schema_command() {
    cli()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"overrides\""))
        .stdout(predicate::str::contains("\"ignorePatterns\""));
}

#[test]
fn test_generate_completion() {
    cli()
        .args(["--generate-completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lintrc"));
}
