//! CLI tests: exit codes, progress output and end-to-end runs.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

use crate::helpers::{fake_sdk, read_jar, sample_entries, Project};

/// Command with an isolated environment rooted in `project`.
fn dexstrip(project: &Project, scratch: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dexstrip"));
    cmd.current_dir(project.path())
        .env("HOME", project.path())
        .env("TMPDIR", scratch)
        .env_remove("ANDROID_HOME")
        .env_remove("ANDROID_SDK_ROOT")
        .env_remove("DEXSTRIP_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).unwrap().next().is_none()
}

// ============================================================================
// Help Output Tests
// ============================================================================

#[test]
fn help_lists_subcommands() {
    Command::new(env!("CARGO_BIN_EXE_dexstrip"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("strip"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn unknown_flag_is_usage_error() {
    Command::new(env!("CARGO_BIN_EXE_dexstrip"))
        .arg("--bogus")
        .assert()
        .code(2);
}

// ============================================================================
// Precondition Failures
// ============================================================================

#[test]
fn missing_inputs_exit_1_and_leave_nothing_behind() {
    let project = Project::new(sample_entries());
    fs::remove_file(project.jar()).unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let config = project.write_config(&["a/B"]);

    dexstrip(&project, scratch.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("JAR file not found"));

    assert!(is_empty_dir(scratch.path()));
    assert_eq!(fs::read(project.dex()).unwrap(), Project::ORIGINAL_DEX);
}

#[test]
fn missing_dex_exit_1() {
    let project = Project::new(sample_entries());
    fs::remove_file(project.dex()).unwrap();
    let scratch = tempfile::tempdir().unwrap();

    dexstrip(&project, scratch.path())
        .arg("--config")
        .arg(project.write_config(&["a/B"]))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("DEX file not found"));

    assert!(!project.dex().exists());
}

#[test]
fn explicit_config_must_exist() {
    let project = Project::new(sample_entries());
    let scratch = tempfile::tempdir().unwrap();

    dexstrip(&project, scratch.path())
        .args(["--config", "does-not-exist.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does-not-exist.toml"));
}

#[test]
#[cfg(unix)]
fn no_sdk_anywhere_exit_1() {
    let project = Project::new(sample_entries());
    let scratch = tempfile::tempdir().unwrap();

    dexstrip(&project, scratch.path())
        .arg("--config")
        .arg(project.write_config(&["a/B"]))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Android SDK not found"));

    assert!(is_empty_dir(scratch.path()));
}

#[test]
fn no_compiler_exit_1() {
    let project = Project::new(sample_entries());
    let scratch = tempfile::tempdir().unwrap();
    let sdk = tempfile::tempdir().unwrap();
    fake_sdk(sdk.path(), "33.0.0", &[]);

    dexstrip(&project, scratch.path())
        .env("ANDROID_HOME", sdk.path())
        .arg("--config")
        .arg(project.write_config(&["a/B"]))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Neither d8 nor dx"));

    assert!(is_empty_dir(scratch.path()));
    assert_eq!(fs::read(project.dex()).unwrap(), Project::ORIGINAL_DEX);
}

// ============================================================================
// SDK discovery order
// ============================================================================

#[test]
#[cfg(unix)]
fn android_home_wins_over_android_sdk_root() {
    let project = Project::new(sample_entries());
    let scratch = tempfile::tempdir().unwrap();
    let home_sdk = tempfile::tempdir().unwrap();
    let root_sdk = tempfile::tempdir().unwrap();
    fake_sdk(home_sdk.path(), "33.0.0", &[]);
    fake_sdk(root_sdk.path(), "33.0.0", &[]);

    dexstrip(&project, scratch.path())
        .env("ANDROID_HOME", home_sdk.path())
        .env("ANDROID_SDK_ROOT", root_sdk.path())
        .arg("--config")
        .arg(project.write_config(&["a/B"]))
        .assert()
        .code(1)
        .stdout(predicate::str::contains(format!(
            "Using Android SDK: {}",
            home_sdk.path().display()
        )))
        .stdout(predicate::str::contains(root_sdk.path().display().to_string()).not());
}

#[test]
#[cfg(unix)]
fn android_sdk_root_wins_over_home_default() {
    let project = Project::new(sample_entries());
    let scratch = tempfile::tempdir().unwrap();
    let home_default = project.path().join("Android/Sdk");
    fake_sdk(&home_default, "33.0.0", &[]);
    let root_sdk = tempfile::tempdir().unwrap();
    fake_sdk(root_sdk.path(), "33.0.0", &[]);

    dexstrip(&project, scratch.path())
        .env("ANDROID_SDK_ROOT", root_sdk.path())
        .arg("--config")
        .arg(project.write_config(&["a/B"]))
        .assert()
        .code(1)
        .stdout(predicate::str::contains(format!(
            "Using Android SDK: {}",
            root_sdk.path().display()
        )))
        .stdout(predicate::str::contains("Android/Sdk").not());
}

#[test]
#[cfg(unix)]
fn home_default_is_used_without_environment() {
    let project = Project::new(sample_entries());
    let scratch = tempfile::tempdir().unwrap();
    let home_default = project.path().join("Android/Sdk");
    fake_sdk(&home_default, "33.0.0", &[]);

    dexstrip(&project, scratch.path())
        .arg("--config")
        .arg(project.write_config(&["a/B"]))
        .assert()
        .code(1)
        .stdout(predicate::str::contains(format!(
            "Using Android SDK: {}",
            home_default.display()
        )));
}

// ============================================================================
// End-to-end with a scripted compiler
// ============================================================================

/// Install an executable `d8` that copies its input JAR to classes.dex.
#[cfg(unix)]
fn scripted_sdk(root: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    let dir = fake_sdk(root, "33.0.0", &[]);
    let d8 = dir.join("d8");
    fs::write(&d8, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&d8, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
#[cfg(unix)]
fn strip_replaces_dex_and_reports() {
    let project = Project::new(sample_entries());
    let scratch = tempfile::tempdir().unwrap();
    let sdk = tempfile::tempdir().unwrap();
    // d8 --output <dir> <jar>
    scripted_sdk(sdk.path(), r#"cp "$3" "$2/classes.dex""#);

    dexstrip(&project, scratch.path())
        .env("ANDROID_HOME", sdk.path())
        .arg("--config")
        .arg(project.write_config(&["a/B"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("Removing class: a/B"))
        .stdout(predicate::str::contains("Using d8 tool..."))
        .stdout(predicate::str::contains("Successfully modified"))
        .stdout(predicate::str::contains("Modified DEX file size:"))
        .stdout(predicate::str::contains("Keeping class").not());

    let rebuilt = read_jar(&project.dex());
    assert!(!rebuilt.contains_key("a/B.class"));
    assert!(rebuilt.contains_key("a/C.class"));
    assert!(rebuilt.contains_key("META-INF/MANIFEST.MF"));
    assert!(is_empty_dir(scratch.path()));
}

#[test]
#[cfg(unix)]
fn failing_compiler_keeps_original() {
    let project = Project::new(sample_entries());
    let scratch = tempfile::tempdir().unwrap();
    let sdk = tempfile::tempdir().unwrap();
    scripted_sdk(sdk.path(), "echo 'd8 exploded' >&2\nexit 1");

    dexstrip(&project, scratch.path())
        .env("ANDROID_HOME", sdk.path())
        .arg("--config")
        .arg(project.write_config(&["a/B"]))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("d8 exploded"));

    assert_eq!(fs::read(project.dex()).unwrap(), Project::ORIGINAL_DEX);
    assert!(is_empty_dir(scratch.path()));
}

// ============================================================================
// Other subcommands
// ============================================================================

#[test]
fn plan_lists_removals_without_changes() {
    let project = Project::new(sample_entries());
    let scratch = tempfile::tempdir().unwrap();

    dexstrip(&project, scratch.path())
        .arg("plan")
        .arg("--config")
        .arg(project.write_config(&["a/B", "x/Missing"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("remove  a/B"))
        .stdout(predicate::str::contains("1 of 3 classes would be removed"))
        .stdout(predicate::str::contains("Not found in JAR: x/Missing"));

    assert_eq!(fs::read(project.dex()).unwrap(), Project::ORIGINAL_DEX);
}

#[test]
fn config_show_prints_defaults() {
    let project = Project::new(sample_entries());
    let scratch = tempfile::tempdir().unwrap();

    dexstrip(&project, scratch.path())
        .args(["config", "show"])
        .env("XDG_CONFIG_HOME", project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[remove]"))
        .stdout(predicate::str::contains("com/mojang/minecraftpe/MainActivity"));
}

#[test]
fn config_path_follows_config_flag() {
    let project = Project::new(sample_entries());
    let scratch = tempfile::tempdir().unwrap();

    dexstrip(&project, scratch.path())
        .args(["config", "path", "--config", "custom.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
#[cfg(unix)]
fn config_edit_opens_the_flagged_file() {
    let project = Project::new(sample_entries());
    let scratch = tempfile::tempdir().unwrap();

    dexstrip(&project, scratch.path())
        .args(["config", "edit", "--config", "custom.toml"])
        .env("EDITOR", "true")
        .env("XDG_CONFIG_HOME", project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));

    let written = fs::read_to_string(project.path().join("custom.toml")).unwrap();
    assert!(written.contains("[remove]"));
    assert!(!project.path().join("dexstrip/config.toml").exists());
}

#[test]
fn completions_generate_for_bash() {
    Command::new(env!("CARGO_BIN_EXE_dexstrip"))
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dexstrip"));
}
