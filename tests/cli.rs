//! Integration tests for top-level CLI behavior.

use std::path::Path;
use std::process::Command;

fn rosport(args: &[&str], cwd: &Path) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_rosport");
    Command::new(bin)
        .args(args)
        .current_dir(cwd)
        .env_remove("GITEE_TOKEN")
        .env_remove("GITEE_USERNAME")
        .env_remove("GITEE_ORG")
        .env_remove("ROSPORT_CONFIG")
        .env_remove("ROSPORT_RECORD")
        .output()
        .expect("failed to run rosport binary")
}

#[test]
fn help_lists_every_stage() {
    let dir = tempfile::tempdir().unwrap();
    let output = rosport(&["--help"], dir.path());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    for command in ["resolve", "fetch", "manifest", "submit", "publicize", "stage"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[test]
fn unknown_subcommand_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = rosport(&["plan"], dir.path());
    assert!(!output.status.success());
}

#[test]
fn resolve_without_input_manifest_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = rosport(&["resolve", "--input", "missing.yaml"], dir.path());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("missing.yaml"));
    assert!(!dir.path().join("base_openeuler.yaml").exists());
}

#[test]
fn resolve_leaves_already_resolved_keys_alone() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("base.yaml"),
        "acl:\n  fedora: [libacl-devel]\n  openeuler: [libacl-devel]\n",
    )
    .unwrap();

    let output = rosport(&["resolve"], dir.path());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("0 updated, 0 failed"));
    assert_eq!(std::fs::read_to_string(dir.path().join("fail_list.txt")).unwrap(), "");
    assert!(dir.path().join("base_openeuler.yaml").exists());
}

#[test]
fn publicize_without_token_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = rosport(&["publicize", "--dry-run"], dir.path());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("GITEE_TOKEN"));
}

#[test]
fn submit_without_farm_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("copr");
    let output = Command::new(env!("CARGO_BIN_EXE_rosport"))
        .arg("submit")
        .current_dir(dir.path())
        .env("COPR_CONFIG", &missing)
        .env_remove("ROSPORT_RECORD")
        .output()
        .expect("failed to run rosport binary");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("build-farm configuration"));
}
