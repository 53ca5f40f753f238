//! End-to-end tests for the zen binary.

use std::fs;
use std::process::{Command, Output};

use tempfile::tempdir;

fn zen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_zen"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run zen")
}

#[test]
fn test_render_with_set() {
    let dir = tempdir().unwrap();
    let stub = dir.path().join("stub.txt");
    fs::write(&stub, "Hello, {{name}}!").unwrap();
    let destination = dir.path().join("output/generated.txt");

    let output = zen(&[
        "render",
        stub.to_str().unwrap(),
        destination.to_str().unwrap(),
        "--set",
        "name=Zenigata",
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(fs::read_to_string(&destination).unwrap(), "Hello, Zenigata!");
}

#[test]
fn test_render_dry_run_prints_without_writing() {
    let dir = tempdir().unwrap();
    let stub = dir.path().join("stub.txt");
    fs::write(&stub, "Hello, {{name}}!").unwrap();
    let destination = dir.path().join("out.txt");

    let output = zen(&[
        "render",
        stub.to_str().unwrap(),
        destination.to_str().unwrap(),
        "-s",
        "name=Lupin",
        "--dry-run",
    ]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hello, Lupin!");
    assert!(!destination.exists());
}

#[test]
fn test_render_dry_run_keeps_binary_content() {
    let dir = tempdir().unwrap();
    let stub = dir.path().join("blob.stub");
    fs::write(&stub, b"\xff\xfe{{name}}\x00").unwrap();
    let destination = dir.path().join("blob.bin");

    let output = zen(&[
        "render",
        stub.to_str().unwrap(),
        destination.to_str().unwrap(),
        "--set",
        "name=Zenigata",
        "--dry-run",
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(output.stdout, b"\xff\xfeZenigata\x00".to_vec());
    assert!(!destination.exists());
}

#[test]
fn test_render_writes_binary_content_unchanged() {
    let dir = tempdir().unwrap();
    let stub = dir.path().join("blob.stub");
    fs::write(&stub, b"\xff{{name}}").unwrap();
    let destination = dir.path().join("out/blob.bin");

    let output = zen(&[
        "render",
        stub.to_str().unwrap(),
        destination.to_str().unwrap(),
        "--set",
        "name=x",
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(fs::read(&destination).unwrap(), b"\xffx".to_vec());
}

#[test]
fn test_render_missing_stub_exit_code() {
    let dir = tempdir().unwrap();
    let destination = dir.path().join("out.txt");

    let output = zen(&[
        "render",
        dir.path().join("missing.txt").to_str().unwrap(),
        destination.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist or is not a readable"));
    assert!(!destination.exists());
}

#[test]
fn test_render_strict_fails_on_leftover_tokens() {
    let dir = tempdir().unwrap();
    let stub = dir.path().join("stub.txt");
    fs::write(&stub, "{{greeting}}, {{name}}!").unwrap();
    let destination = dir.path().join("out.txt");

    let output = zen(&[
        "render",
        stub.to_str().unwrap(),
        destination.to_str().unwrap(),
        "--set",
        "greeting=Hi",
        "--strict",
    ]);

    assert_eq!(output.status.code(), Some(6));
    assert!(String::from_utf8_lossy(&output.stderr).contains("{{name}}"));
    assert!(!destination.exists());
}

#[test]
fn test_render_with_vars_file() {
    let dir = tempdir().unwrap();
    let stub = dir.path().join("stub.txt");
    fs::write(&stub, "{{name}} ({{year}})").unwrap();
    let vars = dir.path().join("vars.yaml");
    fs::write(&vars, "name: Zenigata\nyear: 1971\n").unwrap();
    let destination = dir.path().join("out.txt");

    let output = zen(&[
        "render",
        stub.to_str().unwrap(),
        destination.to_str().unwrap(),
        "--vars",
        vars.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(fs::read_to_string(&destination).unwrap(), "Zenigata (1971)");
}

#[test]
fn test_render_dir() {
    let dir = tempdir().unwrap();
    let stubs = dir.path().join("stubs");
    fs::create_dir_all(stubs.join("src")).unwrap();
    fs::write(stubs.join("src/{{module}}.rs.stub"), "// {{module}}").unwrap();
    let target = dir.path().join("out");

    let output = zen(&[
        "render-dir",
        stubs.to_str().unwrap(),
        target.to_str().unwrap(),
        "--strip-suffix",
        ".stub",
        "--set",
        "module=billing",
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        fs::read_to_string(target.join("src/billing.rs")).unwrap(),
        "// billing"
    );
}

#[test]
fn test_invalid_assignment_rejected() {
    let dir = tempdir().unwrap();
    let output = zen(&[
        "render",
        dir.path().join("a").to_str().unwrap(),
        dir.path().join("b").to_str().unwrap(),
        "--set",
        "novalue",
    ]);

    assert_eq!(output.status.code(), Some(2));
}
