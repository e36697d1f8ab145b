//! Shared fixtures for myks-lib integration tests.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run git in `dir`, panicking on failure.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) {
  let status = Command::new("git")
    .args(["-c", "user.name=myks", "-c", "user.email=myks@example.com", "-c", "commit.gpgsign=false"])
    .args(args)
    .current_dir(dir)
    .status()
    .unwrap();
  assert!(status.success(), "git {:?} failed", args);
}

/// Write `content` to `rel` below `root`, creating parent directories.
#[allow(dead_code)]
pub fn write(root: &Path, rel: &str, content: &str) {
  let path = root.join(rel);
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, content).unwrap();
}

/// An environment tree with `envs/dev` (web) and `envs/prod` (web, db).
#[allow(dead_code)]
pub fn sample_globe() -> TempDir {
  let temp = TempDir::new().unwrap();
  write(temp.path(), "envs/dev/env-data.ytt.yaml", "environment: {}\n");
  write(temp.path(), "envs/dev/_apps/web/web.yaml", "kind: Service\n");
  write(temp.path(), "envs/prod/env-data.ytt.yaml", "environment: {}\n");
  write(temp.path(), "envs/prod/_apps/web/web.yaml", "kind: Service\n");
  write(temp.path(), "envs/prod/_apps/db/db.yaml", "kind: StatefulSet\n");
  temp
}

/// [`sample_globe`] committed to a fresh git repository.
#[allow(dead_code)]
pub fn committed_repo() -> TempDir {
  let temp = sample_globe();
  write(temp.path(), ".gitignore", "rendered/\n");
  git(temp.path(), &["init", "--quiet"]);
  git(temp.path(), &["add", "--all"]);
  git(temp.path(), &["commit", "--quiet", "-m", "init"]);
  temp
}
