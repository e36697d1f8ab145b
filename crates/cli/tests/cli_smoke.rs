//! CLI smoke tests for myks.
//!
//! These tests run the `myks` binary against temporary environment trees and
//! check exit codes, printed targets and rendered output.

mod common;

use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

use common::{committed_repo, sample_globe, write};

/// Get a Command for the myks binary running in `dir`.
fn myks_cmd(dir: &Path) -> Command {
  let mut cmd = cargo_bin_cmd!("myks");
  cmd.current_dir(dir);
  cmd.env_remove("RUST_LOG");
  for key in [
    "MYKS_LOG_LEVEL",
    "MYKS_ASYNC",
    "MYKS_SMART_MODE_BASE_REVISION",
    "MYKS_SMART_MODE_ONLY_PRINT",
  ] {
    cmd.env_remove(key);
  }
  cmd
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  let temp = TempDir::new().unwrap();
  myks_cmd(temp.path())
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"))
    .stdout(predicate::str::contains("Smart Mode"));
}

#[test]
fn version_flag_works() {
  let temp = TempDir::new().unwrap();
  myks_cmd(temp.path())
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("myks"))
    .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn subcommand_help_works() {
  let temp = TempDir::new().unwrap();
  for cmd in &["render", "cleanup"] {
    myks_cmd(temp.path())
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

// =============================================================================
// Argument handling
// =============================================================================

#[test]
fn too_many_positional_arguments_fail() {
  let temp = sample_globe();

  myks_cmd(temp.path())
    .args(["render", "envs/dev", "web", "extra"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("too many positional arguments"));

  assert!(!temp.path().join("rendered").exists());
}

#[test]
fn print_only_lists_targets_without_rendering() {
  let temp = sample_globe();

  myks_cmd(temp.path())
    .args(["render", "--smart-mode.only-print", "envs/prod,envs/dev", "web"])
    .assert()
    .success()
    .stdout(predicate::str::contains(
      "Smart Mode detected:\n→ envs/dev\n    web\n→ envs/prod\n    web\n",
    ));

  assert!(!temp.path().join("rendered").exists());
}

#[test]
fn print_only_all_prints_wildcard() {
  let temp = sample_globe();

  myks_cmd(temp.path())
    .args(["render", "--smart-mode.only-print", "ALL"])
    .assert()
    .success()
    .stdout(predicate::str::contains("→ ALL"));
}

// =============================================================================
// render
// =============================================================================

#[test]
fn render_explicit_environment() {
  let temp = sample_globe();

  myks_cmd(temp.path())
    .args(["render", "envs/prod"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Rendered 2 application(s)"));

  assert!(temp.path().join("rendered/envs/prod/web/manifest.yaml").is_file());
  assert!(temp.path().join("rendered/envs/prod/db/manifest.yaml").is_file());
  assert!(!temp.path().join("rendered/envs/dev").exists());
}

#[test]
fn render_with_parallelism_limit() {
  let temp = sample_globe();

  myks_cmd(temp.path())
    .args(["render", "--async", "1", "ALL", "web"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Rendered 2 application(s)"));

  assert!(temp.path().join("rendered/envs/dev/web/manifest.yaml").is_file());
  assert!(!temp.path().join("rendered/envs/prod/db").exists());
}

#[test]
fn render_unknown_environment_fails() {
  let temp = sample_globe();

  myks_cmd(temp.path())
    .args(["render", "envs/staging"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("no environment found for 'envs/staging'"));
}

#[test]
fn render_outside_myks_root_fails() {
  let temp = TempDir::new().unwrap();

  myks_cmd(temp.path())
    .args(["render", "ALL"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("missing envs directory"));
}

#[test]
fn smart_mode_without_repository_renders_everything() {
  let temp = sample_globe();

  myks_cmd(temp.path())
    .arg("render")
    .assert()
    .success()
    .stdout(predicate::str::contains("Rendered 3 application(s)"))
    .stderr(predicate::str::contains("Unable to run Smart Mode"));
}

#[test]
fn smart_mode_without_changes_exits_cleanly() {
  let temp = committed_repo();

  myks_cmd(temp.path())
    .arg("render")
    .assert()
    .success()
    .stderr(predicate::str::contains("Smart Mode did not find any changes"));

  assert!(!temp.path().join("rendered").exists());
}

#[test]
fn smart_mode_after_deleting_an_environment_succeeds() {
  let temp = committed_repo();
  std::fs::remove_dir_all(temp.path().join("envs/dev")).unwrap();
  write(temp.path(), "envs/prod/notes/owners.yaml", "team: platform\n");

  myks_cmd(temp.path())
    .arg("render")
    .assert()
    .success()
    .stdout(predicate::str::contains("Rendered 2 application(s)"));

  assert!(temp.path().join("rendered/envs/prod/web/manifest.yaml").is_file());
  assert!(!temp.path().join("rendered/envs/dev").exists());
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn only_print_from_environment_variable() {
  let temp = sample_globe();

  myks_cmd(temp.path())
    .args(["render", "envs/dev"])
    .env("MYKS_SMART_MODE_ONLY_PRINT", "true")
    .assert()
    .success()
    .stdout(predicate::str::contains("→ envs/dev\n    ALL"));

  assert!(!temp.path().join("rendered").exists());
}

#[test]
fn only_print_from_config_file() {
  let temp = sample_globe();
  write(temp.path(), ".myks.yaml", "smart-mode:\n  only-print: true\n");

  myks_cmd(temp.path())
    .args(["render", "envs/dev"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Smart Mode detected:"));

  assert!(!temp.path().join("rendered").exists());
}

#[test]
fn environment_overrides_config_file() {
  let temp = sample_globe();
  write(temp.path(), ".myks.yaml", "smart-mode:\n  only-print: true\n");

  myks_cmd(temp.path())
    .args(["render", "envs/dev"])
    .env("MYKS_SMART_MODE_ONLY_PRINT", "false")
    .assert()
    .success()
    .stdout(predicate::str::contains("Rendered 1 application(s)"));
}

#[test]
fn missing_explicit_config_fails() {
  let temp = sample_globe();

  myks_cmd(temp.path())
    .args(["render", "--config", "missing.yaml", "envs/dev"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn invalid_log_level_fails() {
  let temp = sample_globe();

  myks_cmd(temp.path())
    .args(["render", "-l", "loud", "envs/dev"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("invalid value 'loud'"));
}

#[test]
fn disabled_log_level_silences_warnings() {
  let temp = sample_globe();

  myks_cmd(temp.path())
    .args(["render", "--log-level", "disabled"])
    .assert()
    .success()
    .stderr(predicate::str::contains("Unable to run Smart Mode").not());
}

// =============================================================================
// cleanup
// =============================================================================

#[test]
fn cleanup_removes_stale_output() {
  let temp = sample_globe();
  write(temp.path(), "rendered/envs/dev/web/manifest.yaml", "kind: Service\n");
  write(temp.path(), "rendered/envs/old/web/manifest.yaml", "kind: Service\n");

  myks_cmd(temp.path())
    .arg("cleanup")
    .assert()
    .success()
    .stdout(predicate::str::contains("Removed 1 stale output(s)"));

  assert!(temp.path().join("rendered/envs/dev/web/manifest.yaml").is_file());
  assert!(!temp.path().join("rendered/envs/old").exists());
}

#[test]
fn cleanup_rejects_positional_arguments() {
  let temp = sample_globe();

  myks_cmd(temp.path())
    .args(["cleanup", "envs/dev"])
    .assert()
    .failure();
}
