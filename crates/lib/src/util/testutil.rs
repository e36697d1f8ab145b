//! Test utilities for myks-lib.
//!
//! Helpers for building throwaway git repositories and myks directory trees.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run git in `dir`, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
  let output = Command::new("git")
    .args(["-c", "user.name=myks", "-c", "user.email=myks@example.com", "-c", "commit.gpgsign=false"])
    .args(args)
    .current_dir(dir)
    .output()
    .expect("failed to spawn git");
  assert!(
    output.status.success(),
    "git {:?} failed: {}",
    args,
    String::from_utf8_lossy(&output.stderr)
  );
  String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Create an empty git repository in a temp directory.
pub fn init_repo() -> TempDir {
  let temp = TempDir::new().unwrap();
  git(temp.path(), &["init", "--quiet"]);
  temp
}

/// Stage everything and commit.
pub fn commit_all(dir: &Path, message: &str) {
  git(dir, &["add", "--all"]);
  git(dir, &["commit", "--quiet", "--allow-empty", "-m", message]);
}

/// Write `content` to `rel` below `root`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
  let path = root.join(rel);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(path, content).unwrap();
}

/// Create an environment directory with its data file.
pub fn create_env(root: &Path, env: &str) {
  write_file(root, &format!("{}/{}", env, crate::consts::ENV_DATA_FILE), "environment: {}\n");
}

/// Create an application with a single manifest.
pub fn create_app(root: &Path, env: &str, app: &str, manifest: &str) {
  write_file(
    root,
    &format!("{}/{}/{}/{}.yaml", env, crate::consts::APPS_DIR, app, app),
    manifest,
  );
}
