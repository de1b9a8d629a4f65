//! Integration tests for the rtrack CLI
//!
//! These tests run the built binary end-to-end.

use std::path::Path;
use std::process::Command;

/// Get the path to the rtrack binary
fn rtrack_binary() -> std::path::PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test executable name
    path.pop(); // Remove deps directory

    path.push("rtrack");

    if cfg!(windows) {
        path.set_extension("exe");
    }

    path
}

/// Run rtrack in `dir` with no ambient config
fn run_rtrack_in(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(rtrack_binary())
        .args(args)
        .current_dir(dir)
        .env_remove("RTRACK_CONFIG")
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .output()
        .expect("Failed to execute rtrack")
}

fn run_rtrack(args: &[&str]) -> std::process::Output {
    let dir = tempfile::tempdir().unwrap();
    run_rtrack_in(dir.path(), args)
}

fn write_exports(dir: &Path) {
    let exports = dir.join("exports");
    std::fs::create_dir_all(&exports).unwrap();

    std::fs::write(
        exports.join("grants_to_roles.jsonl"),
        [
            r#"{"GRANTED_ON": "WAREHOUSE", "GRANTED_TO": "ROLE", "NAME": "COMPUTE_WH", "PRIVILEGE": "USAGE", "GRANTEE_NAME": "ANALYST", "GRANT_OPTION": "False", "DELETED_ON": null}"#,
            r#"{"GRANTED_ON": "WAREHOUSE", "GRANTED_TO": "ROLE", "NAME": "COMPUTE_WH", "PRIVILEGE": "USAGE", "GRANTEE_NAME": "LOADER", "GRANT_OPTION": "False", "DELETED_ON": null}"#,
        ]
        .join("\n"),
    )
    .unwrap();
    std::fs::write(
        exports.join("warehouse.jsonl"),
        r#"{"name": "COMPUTE_WH", "warehouse_size": "XSMALL", "auto_suspend": "60"}"#,
    )
    .unwrap();
}

#[test]
fn test_rtrack_version() {
    let output = run_rtrack(&["--version"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rtrack"));
}

#[test]
fn test_rtrack_help() {
    let output = run_rtrack(&["--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("render"));
    assert!(stdout.contains("consolidate"));
    assert!(stdout.contains("schema"));
}

#[test]
fn test_rtrack_render_help() {
    let output = run_rtrack(&["render", "--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--input"));
    assert!(stdout.contains("--output"));
    assert!(stdout.contains("--config"));
}

#[test]
fn test_rtrack_render_requires_input() {
    let output = run_rtrack(&["render", "--output", "out"]);

    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--input"));
}

#[test]
fn test_rtrack_schema_list() {
    let output = run_rtrack(&["schema", "list"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("database_grant"));
    assert!(stdout.contains("role_grants"));
    assert!(stdout.contains("imported by default"));
}

#[test]
fn test_rtrack_render() {
    let dir = tempfile::tempdir().unwrap();
    write_exports(dir.path());

    let output = run_rtrack_in(dir.path(), &["render", "--input", "exports", "--output", "tf"]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let grants = std::fs::read_to_string(dir.path().join("tf/warehouse_grant.tf")).unwrap();
    assert_eq!(grants.matches("resource \"snowflake_warehouse_grant\"").count(), 1);
    assert!(grants.contains("roles = [\"ANALYST\",\"LOADER\"]"));

    let warehouses = std::fs::read_to_string(dir.path().join("tf/warehouse.tf")).unwrap();
    assert!(warehouses.contains("resource \"snowflake_warehouse\" \"COMPUTE_WH\" {"));
    assert!(warehouses.contains("auto_suspend = 60"));

    let script = std::fs::read_to_string(dir.path().join("tf/import.sh")).unwrap();
    assert!(script.contains("terraform import 'snowflake_warehouse.COMPUTE_WH' 'COMPUTE_WH'"));
    assert!(script.contains("' 'COMPUTE_WH|USAGE|false|ANALYST,LOADER'"));
}

#[test]
fn test_rtrack_render_with_config_env() {
    let dir = tempfile::tempdir().unwrap();
    write_exports(dir.path());
    std::fs::write(
        dir.path().join("custom.yaml"),
        "resource_types: [warehouse]\nimport_script: warehouses.sh\n",
    )
    .unwrap();

    let output = Command::new(rtrack_binary())
        .args(["render", "--input", "exports", "--output", "tf"])
        .current_dir(dir.path())
        .env("RTRACK_CONFIG", "custom.yaml")
        .output()
        .expect("Failed to execute rtrack");

    assert!(output.status.success());
    assert!(dir.path().join("tf/warehouses.sh").exists());
    assert!(!dir.path().join("tf/warehouse_grant.tf").exists());
}

#[test]
fn test_rtrack_consolidate() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("grants.jsonl"),
        [
            r#"{"database_name": "A", "privilege": "USAGE", "roles": ["X"]}"#,
            r#"{"database_name": "A", "privilege": "USAGE", "roles": ["Y"]}"#,
            r#"{"database_name": "B", "privilege": "USAGE", "roles": ["Z"]}"#,
        ]
        .join("\n"),
    )
    .unwrap();

    let output = run_rtrack_in(
        dir.path(),
        &["consolidate", "grants.jsonl", "--resource-type", "database_grant"],
    );

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            r#"{"database_name":"A","privilege":"USAGE","roles":["X","Y"]}"#,
            r#"{"database_name":"B","privilege":"USAGE","roles":["Z"]}"#,
        ]
    );
}
