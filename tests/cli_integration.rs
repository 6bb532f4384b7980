//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end. Only the template generator
//! is exercised here since it never contacts a model.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Get the binary to test.
fn tenderdoc() -> Command {
    let mut cmd = Command::cargo_bin("tenderdoc").unwrap();
    cmd.env_remove("TENDERDOC_TEMPLATES_DIR").env_remove("TENDERDOC_GENERATOR");
    cmd
}

const BRIDGE_TEMPLATE: &str = r#"{
    "id": "bridge-proposal",
    "document_type": "proposal",
    "title": "{{title}} - {{organization_name}}",
    "structure": [
        {"name": "Summary", "required": true, "description": "Opening", "content": "We bid for {{tender_title}}."},
        {"name": "Price", "description": "Offer", "content": "{% if estimated_value %}Budget noted: {{estimated_value}} {{currency}}{% endif %}"}
    ],
    "style_guide": {"tone": "formal"}
}"#;

const REQUEST: &str = r#"{
    "title": "Bridge repair offer",
    "document_type": "proposal",
    "content_requirements": {"warranty": "5 years"}
}"#;

const TENDER: &str = r#"{
    "title": "Bridge repair 2026",
    "organization_name": "Roads Agency",
    "estimated_value": 90000
}"#;

fn workspace() -> assert_fs::TempDir {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("templates/bridge.json").write_str(BRIDGE_TEMPLATE).unwrap();
    temp.child("request.json").write_str(REQUEST).unwrap();
    temp.child("tender.json").write_str(TENDER).unwrap();
    temp
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    tenderdoc()
        .arg("--help")
        .assert()
        .success()
        // `about` comes from the package description
        .stdout(predicate::str::contains("Procurement document generator"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_version_flag() {
    tenderdoc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_generate_help() {
    tenderdoc()
        .args(["generate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--tender"))
        .stdout(predicate::str::contains("--generator"));
}

// ============================================================================
// Templates Command Tests
// ============================================================================

#[test]
fn test_templates_list_empty_dir() {
    let temp = assert_fs::TempDir::new().unwrap();

    tenderdoc()
        .current_dir(temp.path())
        .args(["templates", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No templates in"));
}

#[test]
fn test_templates_list_text() {
    let temp = workspace();

    tenderdoc()
        .current_dir(temp.path())
        .args(["templates", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bridge-proposal"))
        .stdout(predicate::str::contains("2 sections"));
}

#[test]
fn test_templates_list_json() {
    let temp = workspace();

    tenderdoc()
        .current_dir(temp.path())
        .args(["templates", "list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["))
        .stdout(predicate::str::contains("\"id\": \"bridge-proposal\""));
}

#[test]
fn test_templates_list_from_flag() {
    let temp = workspace();
    let other = assert_fs::TempDir::new().unwrap();

    tenderdoc()
        .current_dir(other.path())
        .args(["--templates", temp.child("templates").path().to_str().unwrap()])
        .args(["templates", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bridge-proposal"));
}

#[test]
fn test_templates_show() {
    let temp = workspace();

    tenderdoc()
        .current_dir(temp.path())
        .args(["templates", "show", "bridge-proposal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Summary"))
        .stdout(predicate::str::contains("2. Price (optional)"))
        .stdout(predicate::str::contains("tone=formal"));
}

#[test]
fn test_templates_show_missing() {
    let temp = workspace();

    tenderdoc()
        .current_dir(temp.path())
        .args(["templates", "show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template not found: nope"));
}

// ============================================================================
// Generate Command Tests
// ============================================================================

#[test]
fn test_generate_template_json() {
    let temp = workspace();

    tenderdoc()
        .current_dir(temp.path())
        .args(["generate", "--request", "request.json", "--tender", "tender.json"])
        .args(["--generator", "template"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Bridge repair offer - Roads Agency\""))
        .stdout(predicate::str::contains("We bid for Bridge repair 2026."))
        .stdout(predicate::str::contains("Budget noted: 90000 KRW"))
        .stdout(predicate::str::contains("\"template_id\": \"bridge-proposal\""))
        .stdout(predicate::str::contains("\"template_based\": true"));
}

#[test]
fn test_generate_markdown_to_file() {
    let temp = workspace();
    let output = temp.child("out.md");

    tenderdoc()
        .current_dir(temp.path())
        .args(["generate", "--request", "request.json", "--generator", "template"])
        .args(["--format", "markdown", "--output", "out.md"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote 2 sections"));

    output.assert(predicate::str::starts_with("# Bridge repair offer - \n"));
    output.assert(predicate::str::contains("## Summary\n\nWe bid for ."));
    output.assert(predicate::str::contains("## Price\n"));
}

#[test]
fn test_generate_builtin_template_when_none_match() {
    let temp = workspace();
    temp.child("contract.json")
        .write_str(r#"{"title": "Maintenance", "document_type": "contract"}"#)
        .unwrap();

    tenderdoc()
        .current_dir(temp.path())
        .args(["generate", "--request", "contract.json", "--generator", "template"])
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("This concludes the contract for Maintenance."));
}

#[test]
fn test_generate_generator_hint_in_request() {
    let temp = workspace();
    temp.child("hinted.json")
        .write_str(
            r#"{"title": "Hinted", "document_type": "proposal",
                "content_requirements": {"generator_type": "template"}}"#,
        )
        .unwrap();

    tenderdoc()
        .current_dir(temp.path())
        .args(["generate", "--request", "hinted.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"template_based\": true"))
        .stdout(predicate::str::contains("is_hybrid_generated").not());
}

#[test]
fn test_generate_rejects_invalid_request() {
    let temp = workspace();
    temp.child("bad.json")
        .write_str(r#"{"title": "Bad", "document_type": "proposal", "max_tokens": 0}"#)
        .unwrap();

    tenderdoc()
        .current_dir(temp.path())
        .args(["generate", "--request", "bad.json", "--generator", "template"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_tokens must be positive"));
}

#[test]
fn test_generate_unknown_document_type() {
    let temp = workspace();
    temp.child("odd.json")
        .write_str(r#"{"title": "Odd", "document_type": "poem"}"#)
        .unwrap();

    tenderdoc()
        .current_dir(temp.path())
        .args(["generate", "--request", "odd.json", "--generator", "template"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid request"));
}

#[test]
fn test_generate_missing_request_file() {
    let temp = assert_fs::TempDir::new().unwrap();

    tenderdoc()
        .current_dir(temp.path())
        .args(["generate", "--request", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read request"));
}

// ============================================================================
// Config & Completions Tests
// ============================================================================

#[test]
fn test_config_reads_local_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(".tenderdoc.toml")
        .write_str("[generation]\ndefault_generator = \"template\"\n")
        .unwrap();

    tenderdoc()
        .current_dir(temp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("default_generator = \"template\""))
        .stdout(predicate::str::contains("[ai.ollama]"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_config_save_writes_global_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(".tenderdoc.toml")
        .write_str("[generation]\ndefault_generator = \"template\"\n")
        .unwrap();
    let xdg = temp.child("xdg");
    let elsewhere = temp.child("elsewhere");
    elsewhere.create_dir_all().unwrap();

    tenderdoc()
        .current_dir(temp.path())
        .env("XDG_CONFIG_HOME", xdg.path())
        .args(["config", "--save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved configuration to"));

    xdg.child("tenderdoc/config.toml")
        .assert(predicate::str::contains("default_generator = \"template\""));

    // Without a local file the saved global file is picked up
    tenderdoc()
        .current_dir(elsewhere.path())
        .env("XDG_CONFIG_HOME", xdg.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("default_generator = \"template\""));
}

#[test]
fn test_config_path() {
    tenderdoc().args(["config", "--path"]).assert().success();
}

#[test]
fn test_completions_bash() {
    tenderdoc()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tenderdoc"));
}
