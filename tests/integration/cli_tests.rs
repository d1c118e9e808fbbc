//! CLI integration tests
//!
//! These tests verify that the CLI works correctly with various options.

mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use support::{write_class_dir, write_jar, ClassWriter};
use tempfile::TempDir;

/// A project using `okhttp`, declaring an unused `gson`
fn sample_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    write_class_dir(
        &temp.path().join("build/classes/java/main"),
        &[ClassWriter::new("com/app/Main").uses("okhttp3/OkHttpClient")],
    );
    write_jar(
        &temp.path().join("libs/okhttp.jar"),
        &[ClassWriter::new("okhttp3/OkHttpClient").uses("okio/Buffer")],
        &[],
    );
    write_jar(&temp.path().join("libs/okio.jar"), &[ClassWriter::new("okio/Buffer")], &[]);
    write_jar(
        &temp.path().join("libs/gson.jar"),
        &[ClassWriter::new("com/google/gson/Gson")],
        &[],
    );
    temp
}

/// depusage command with the sample project's dependencies declared on the command line
fn depusage(root: &Path) -> Command {
    let mut cmd = depusage_verbose(root);
    cmd.arg("--quiet");
    cmd
}

/// Like [`depusage`], with status output left on
fn depusage_verbose(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("depusage").unwrap();
    cmd.arg(root)
        .arg("--implementation")
        .arg("com.squareup.okhttp3:okhttp:4.12.0=libs/okhttp.jar")
        .arg("--implementation")
        .arg("com.google.code.gson:gson:2.10.1=libs/gson.jar")
        .arg("--transitive")
        .arg("com.squareup.okio:okio:3.6.0=libs/okio.jar");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_help() {
    Command::cargo_bin("depusage")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--implementation"));
}

#[test]
fn test_version() {
    Command::cargo_bin("depusage")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_invalid_dependency_argument() {
    Command::cargo_bin("depusage")
        .unwrap()
        .args(["--implementation", "com.example:lib=libs/lib.jar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid dependency coordinate"));

    Command::cargo_bin("depusage")
        .unwrap()
        .args(["--api", "com.example:lib:1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("group:name:version=PATH"));
}

#[test]
fn test_no_project_output() {
    let temp = TempDir::new().unwrap();

    Command::cargo_bin("depusage")
        .unwrap()
        .arg(temp.path())
        .arg("--quiet")
        .assert()
        .success()
        .stderr(predicate::str::contains("No project class directories or jars found"));
}

// ============================================================================
// Analysis Output Tests
// ============================================================================

#[test]
fn test_terminal_output() {
    let project = sample_project();

    depusage(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("com.google.code.gson/gson:2.10.1"))
        .stdout(predicate::str::contains("DU001"))
        .stdout(predicate::str::contains("declared but never used"));
}

#[test]
fn test_json_output() {
    let project = sample_project();

    let output = depusage(project.path())
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["usage"]["unused_direct_dependencies"][0], "com.google.code.gson/gson:2.10.1");
    assert_eq!(value["usage"]["used_direct_dependencies"][0], "com.squareup.okhttp3/okhttp:4.12.0");

    let required: Vec<&str> = value["usage"]["required_dependencies"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(
        required,
        vec!["com.squareup.okhttp3/okhttp:4.12.0", "com.squareup.okio/okio:3.6.0"]
    );
}

#[test]
fn test_json_stdout_stays_parseable_with_status_output() {
    let project = sample_project();
    let baseline = project.path().join("baseline.json");

    for parallel in [false, true] {
        let mut cmd = depusage_verbose(project.path());
        cmd.args(["--format", "json", "--generate-baseline"]).arg(&baseline);
        if parallel {
            cmd.arg("--parallel");
        }
        let output = cmd.output().unwrap();
        assert!(output.status.success());

        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value["total_findings"], 1);
        assert!(String::from_utf8_lossy(&output.stderr).contains("Baseline generated"));
    }

    let output = depusage_verbose(project.path())
        .args(["--format", "json", "--baseline"])
        .arg(&baseline)
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["total_findings"], 0);
}

#[test]
fn test_sarif_output_file() {
    let project = sample_project();
    let sarif_path = project.path().join("report.sarif");

    depusage(project.path())
        .args(["--format", "sarif", "--output"])
        .arg(&sarif_path)
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&sarif_path).unwrap()).unwrap();
    assert_eq!(value["version"], "2.1.0");
    assert_eq!(value["runs"][0]["results"][0]["ruleId"], "DU001");
}

#[test]
fn test_parallel_mode() {
    let project = sample_project();

    depusage(project.path())
        .args(["--parallel", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("com.google.code.gson/gson:2.10.1"));
}

// ============================================================================
// Exit Code, Retain and Baseline Tests
// ============================================================================

#[test]
fn test_fail_on_unused() {
    let project = sample_project();

    depusage(project.path())
        .arg("--fail-on-unused")
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 unused direct dependencies"));
}

#[test]
fn test_retain_suppresses_findings() {
    let project = sample_project();

    depusage(project.path())
        .args(["--fail-on-unused", "--retain", "com.google.code.gson/*"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No dependency issues found!"));
}

#[test]
fn test_baseline_round_trip() {
    let project = sample_project();
    let baseline = project.path().join("baseline.json");

    depusage(project.path())
        .arg("--generate-baseline")
        .arg(&baseline)
        .assert()
        .success();
    assert!(baseline.exists());

    depusage(project.path())
        .arg("--baseline")
        .arg(&baseline)
        .arg("--fail-on-unused")
        .assert()
        .success()
        .stdout(predicate::str::contains("No dependency issues found!"));
}

#[test]
fn test_missing_baseline_fails() {
    let project = sample_project();

    depusage(project.path())
        .arg("--baseline")
        .arg(project.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load baseline"));
}

#[test]
fn test_unwritable_baseline_fails() {
    let project = sample_project();
    // parent is a regular file
    let baseline = project.path().join("libs/gson.jar/baseline.json");

    depusage(project.path())
        .arg("--generate-baseline")
        .arg(&baseline)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to generate baseline"));
}

#[test]
fn test_project_class_inside_dependency() {
    let project = sample_project();
    write_jar(
        &project.path().join("libs/fat.jar"),
        &[ClassWriter::new("com/app/Main")],
        &[],
    );

    depusage(project.path())
        .arg("--implementation")
        .arg("com.example:fat:1.0=libs/fat.jar")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project classes clash with dependency classes"));

    std::fs::write(project.path().join("depusage.yml"), "duplicate_classes: first-wins\n").unwrap();

    depusage(project.path())
        .arg("--implementation")
        .arg("com.example:fat:1.0=libs/fat.jar")
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("com.example/fat:1.0"));
}

#[test]
fn test_config_file_in_project_root() {
    let project = sample_project();
    std::fs::write(
        project.path().join("depusage.yml"),
        r#"
project:
  - build/classes/java/main
dependencies:
  - coordinate: com.squareup.okhttp3:okhttp:4.12.0
    path: libs/okhttp.jar
    scope: api
  - coordinate: com.squareup.okio:okio:3.6.0
    path: libs/okio.jar
    scope: transitive
report:
  format: json
"#,
    )
    .unwrap();

    let output = Command::cargo_bin("depusage")
        .unwrap()
        .arg(project.path())
        .arg("--quiet")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["usage"]["unused_direct_dependencies"]
        .as_array()
        .unwrap()
        .is_empty());
    // okhttp is api but never exposed by a public signature
    assert_eq!(value["findings"][0]["code"], "DU003");
}
