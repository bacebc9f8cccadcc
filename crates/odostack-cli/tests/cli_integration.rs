//! CLI subprocess integration tests.
//!
//! These tests invoke the `odostack` binary as a subprocess with the mock
//! runner and verify exit codes, generated files, and JSON output.

use std::process::Command;

fn odostack_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_odostack"));
    cmd.args(["--runner", "mock"]);
    cmd
}

fn write_manifest(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("odostack.toml");
    std::fs::write(
        &path,
        r#"manifest_version = 1

[app]
name = "odoo"
image = "moutazmuhammad/odoo"

[stacks]
"11" = "11.3.7-14"
"#,
    )
    .unwrap();
    path
}

#[test]
fn cli_version_exits_zero() {
    let output = odostack_bin().arg("--version").output().unwrap();
    assert!(output.status.success(), "odostack --version must exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("odostack"),
        "version output must contain 'odostack': {stdout}"
    );
}

#[test]
fn cli_help_lists_commands() {
    let output = odostack_bin().arg("--help").output().unwrap();
    assert!(output.status.success(), "odostack --help must exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("up"), "help must list 'up' command");
    assert!(stdout.contains("down"), "help must list 'down' command");
}

#[test]
fn cli_up_generates_layout_and_artifacts() {
    let project = tempfile::tempdir().unwrap();
    let work_root = tempfile::tempdir().unwrap();
    let manifest = write_manifest(project.path());

    let output = odostack_bin()
        .args([
            "up",
            &manifest.to_string_lossy(),
            "--work-root",
            &work_root.path().to_string_lossy(),
        ])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "up must exit 0. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let root = work_root.path().join("odoo11");
    assert!(root.join("addons").is_dir());
    assert!(root.join("config").is_dir());
    assert!(root.join("docker-compose.yaml").is_file());
    assert!(root.join("config").join("odoo.conf").is_file());
}

#[test]
fn cli_up_json_reports_stacks() {
    let project = tempfile::tempdir().unwrap();
    let work_root = tempfile::tempdir().unwrap();
    let manifest = write_manifest(project.path());

    let output = odostack_bin()
        .args([
            "--json",
            "up",
            &manifest.to_string_lossy(),
            "--work-root",
            &work_root.path().to_string_lossy(),
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["stacks"][0]["app_container"], "odoo11");
    assert_eq!(payload["stacks"][0]["web_port"], "1169");
}

#[test]
fn cli_up_bad_manifest_exits_with_manifest_code() {
    let project = tempfile::tempdir().unwrap();
    let path = project.path().join("odostack.toml");
    std::fs::write(&path, "manifest_version = 2\n").unwrap();

    let output = odostack_bin()
        .args(["up", &path.to_string_lossy()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("manifest error"), "stderr: {stderr}");
}

#[test]
fn cli_down_removes_work_dir() {
    let search_root = tempfile::tempdir().unwrap();
    let stack_dir = search_root.path().join("odostack-work").join("odoo11");
    std::fs::create_dir_all(&stack_dir).unwrap();
    std::fs::write(stack_dir.join("docker-compose.yaml"), "---\n").unwrap();

    let output = odostack_bin()
        .args([
            "down",
            "does-not-exist.toml",
            "--search-root",
            &search_root.path().to_string_lossy(),
            "--yes",
        ])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "down must exit 0. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(!search_root.path().join("odostack-work").exists());
}

#[test]
fn cli_down_json_reports_stopped_dirs() {
    let search_root = tempfile::tempdir().unwrap();
    let stack_dir = search_root.path().join("odostack-work").join("odoo11");
    std::fs::create_dir_all(&stack_dir).unwrap();
    std::fs::write(stack_dir.join("docker-compose.yaml"), "---\n").unwrap();

    let output = odostack_bin()
        .args([
            "--json",
            "down",
            "does-not-exist.toml",
            "--search-root",
            &search_root.path().to_string_lossy(),
            "--yes",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["stopped"].as_array().unwrap().len(), 1);
    assert_eq!(payload["work_dir_removed"], true);
}
