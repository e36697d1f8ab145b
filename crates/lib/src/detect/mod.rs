//! Change detection for Smart Mode.
//!
//! A [`ChangeDetector`] reports which environments and applications changed
//! relative to a base revision. [`GitChangeDetector`] answers that from a git
//! working tree; [`map_changed_paths`] turns a list of changed files into a
//! [`TargetMap`](crate::target::TargetMap).

mod changes;
mod git;

use std::path::PathBuf;

use thiserror::Error;

use crate::target::TargetMap;

pub use changes::map_changed_paths;
pub use git::GitChangeDetector;

/// Errors that prevent change detection from producing a result.
#[derive(Debug, Error)]
pub enum DetectError {
  /// The root directory is not inside a git repository.
  #[error("not a git repository: {path}: {source}")]
  NotARepository {
    path: PathBuf,
    #[source]
    source: Box<gix::discover::Error>,
  },

  /// The repository has no working tree to compare.
  #[error("repository at '{0}' has no working tree")]
  BareRepository(PathBuf),

  /// The base revision could not be resolved.
  #[error("revision '{rev}' not found in repository: {source}")]
  RevisionNotFound {
    rev: String,
    #[source]
    source: Box<gix::revision::spec::parse::single::Error>,
  },

  /// A git command exited unsuccessfully.
  #[error("git {args} failed with exit code {code:?}: {stderr}")]
  GitCommand {
    args: String,
    code: Option<i32>,
    stderr: String,
  },

  /// I/O error while running git or scanning the tree.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// Failed to walk the environment tree.
  #[error("failed to scan directory: {0}")]
  Walk(#[from] walkdir::Error),
}

/// Source of the changed environments and applications.
pub trait ChangeDetector {
  /// Return the environments/applications that differ from `base_revision`.
  ///
  /// An empty `base_revision` compares the working tree against `HEAD` only.
  fn detect_changes(&self, base_revision: &str) -> Result<TargetMap, DetectError>;
}
