//! End-to-end tests for the buildpatch-android binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const BUILD_GRADLE: &str = r#"buildscript {
    repositories {
        jcenter()
    }
    dependencies {
        classpath 'com.android.tools.build:gradle:3.3.0'
    }
}

allprojects {
    repositories {
        jcenter()
    }
}
"#;

fn project_with_gradle(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let android_dir = dir.path().join("platforms").join("android");
    fs::create_dir_all(&android_dir).unwrap();
    let gradle_file = android_dir.join("build.gradle");
    fs::write(&gradle_file, contents).unwrap();
    (dir, gradle_file)
}

fn cmd() -> Command {
    Command::cargo_bin("buildpatch-android").unwrap()
}

#[test]
fn modify_then_restore_round_trips() {
    let (dir, gradle_file) = project_with_gradle(BUILD_GRADLE);

    cmd()
        .args(["modify", "--project-dir"])
        .arg(dir.path())
        .assert()
        .success();

    let patched = fs::read_to_string(&gradle_file).unwrap();
    assert!(patched.contains("google-services:4.1.0' // Marketo SDK"));
    assert!(patched.contains("google() // Marketo SDK"));

    cmd()
        .args(["restore", "--project-dir"])
        .arg(dir.path())
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&gradle_file).unwrap(), BUILD_GRADLE);
}

#[test]
fn missing_build_file_exits_zero() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["--no-color", "modify", "--project-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to modify"));

    cmd()
        .args(["--no-color", "restore", "--project-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to restore"));

    assert!(!dir.path().join("platforms").exists());
}

#[test]
fn strict_modify_fails_without_anchor() {
    let (dir, gradle_file) = project_with_gradle("dependencies {\n}\n");

    cmd()
        .args(["--no-color", "modify", "--project-dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("com.android.tools.build"));

    // file untouched on failure
    assert_eq!(fs::read_to_string(&gradle_file).unwrap(), "dependencies {\n}\n");
}

#[test]
fn lenient_modify_seeds_dependency_block() {
    let (_dir, gradle_file) = project_with_gradle("dependencies {\n}\n");

    cmd()
        .args(["modify", "--lenient", "--gradle-file"])
        .arg(&gradle_file)
        .assert()
        .success();

    let patched = fs::read_to_string(&gradle_file).unwrap();
    assert!(patched.contains("com.android.tools.build:gradle:3.1.4' // Marketo SDK"));
    assert!(patched.contains("google-services:4.1.0' // Marketo SDK"));
}

#[test]
fn modify_json_emits_report() {
    let (dir, _gradle_file) = project_with_gradle(BUILD_GRADLE);

    cmd()
        .args(["modify", "--json", "--project-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dependency\": \"after_anchor\""))
        .stdout(predicate::str::contains("\"repositories_added\": 2"));
}

#[test]
fn restore_json_reports_lines_removed() {
    let (dir, _gradle_file) = project_with_gradle(BUILD_GRADLE);

    cmd()
        .args(["modify", "--project-dir"])
        .arg(dir.path())
        .assert()
        .success();

    cmd()
        .args(["restore", "--json", "--project-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"lines_removed\": 3"));
}
