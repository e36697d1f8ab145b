//! Removal of rendered output that no longer has a source.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::consts::MANIFEST_FILE;
use crate::globe::types::{Application, GlobeError};
use crate::util::relative_id;

/// Delete rendered application directories below `output_root` that do not
/// belong to any of `existing`, then prune empty directories.
///
/// Returns the number of removed application directories.
pub fn remove_stale_output(output_root: &Path, existing: &[Application]) -> Result<usize, GlobeError> {
  if !output_root.is_dir() {
    debug!(path = %output_root.display(), "nothing to clean up");
    return Ok(0);
  }

  let expected: HashSet<String> = existing.iter().map(Application::output_id).collect();

  let mut stale: Vec<PathBuf> = Vec::new();
  for entry in WalkDir::new(output_root) {
    let entry = entry?;
    if !entry.file_type().is_file() || entry.file_name() != MANIFEST_FILE {
      continue;
    }
    let Some(app_dir) = entry.path().parent() else {
      continue;
    };
    match relative_id(output_root, app_dir) {
      Some(id) if expected.contains(&id) => {}
      _ => stale.push(app_dir.to_path_buf()),
    }
  }

  for dir in &stale {
    info!(path = %dir.display(), "removing stale rendered output");
    fs::remove_dir_all(dir).map_err(|e| GlobeError::io(dir, e))?;
  }

  prune_empty_dirs(output_root)?;
  Ok(stale.len())
}

fn prune_empty_dirs(root: &Path) -> Result<(), GlobeError> {
  for entry in WalkDir::new(root).min_depth(1).contents_first(true) {
    let entry = entry?;
    if !entry.file_type().is_dir() {
      continue;
    }
    let path = entry.path();
    let is_empty = fs::read_dir(path)
      .map_err(|e| GlobeError::io(path, e))?
      .next()
      .is_none();
    if is_empty {
      fs::remove_dir(path).map_err(|e| GlobeError::io(path, e))?;
    }
  }
  Ok(())
}
