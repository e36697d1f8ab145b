use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::detect::{ChangeDetector, DetectError, map_changed_paths};
use crate::target::TargetMap;

/// Detects changed environments and applications from a git working tree.
#[derive(Debug, Clone)]
pub struct GitChangeDetector {
  root: PathBuf,
}

impl GitChangeDetector {
  /// Create a detector for the myks root directory `root`.
  ///
  /// `root` may be any directory inside the repository's working tree.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// List files (relative to the root) that differ from `base_revision`,
  /// including untracked files.
  pub fn changed_files(&self, base_revision: &str) -> Result<Vec<String>, DetectError> {
    let repo = gix::discover(&self.root).map_err(|e| DetectError::NotARepository {
      path: self.root.clone(),
      source: Box::new(e),
    })?;

    let workdir = repo
      .workdir()
      .ok_or_else(|| DetectError::BareRepository(repo.git_dir().to_path_buf()))?;
    debug!(workdir = %workdir.display(), "opened repository");

    let rev = if base_revision.is_empty() {
      "HEAD".to_string()
    } else {
      let id = repo
        .rev_parse_single(base_revision)
        .map_err(|e| DetectError::RevisionNotFound {
          rev: base_revision.to_string(),
          source: Box::new(e),
        })?;
      id.detach().to_string()
    };

    info!(base = %base_revision, rev = %rev, "detecting changes");

    let mut files = split_nul(&self.git(&["diff", "--name-only", "--no-renames", "--relative", "-z", &rev])?);
    for untracked in split_nul(&self.git(&["ls-files", "--others", "--exclude-standard", "-z"])?) {
      if !files.contains(&untracked) {
        files.push(untracked);
      }
    }

    debug!(count = files.len(), "collected changed files");
    Ok(files)
  }

  /// Run git in the root directory and return its stdout.
  fn git(&self, args: &[&str]) -> Result<String, DetectError> {
    debug!(args = ?args, root = %self.root.display(), "running git");

    let output = Command::new("git").args(args).current_dir(&self.root).output()?;

    if !output.status.success() {
      return Err(DetectError::GitCommand {
        args: args.join(" "),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
  }
}

impl ChangeDetector for GitChangeDetector {
  fn detect_changes(&self, base_revision: &str) -> Result<TargetMap, DetectError> {
    let files = self.changed_files(base_revision)?;
    map_changed_paths(&self.root, &files)
  }
}

fn split_nul(output: &str) -> Vec<String> {
  output
    .split('\0')
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect()
}
