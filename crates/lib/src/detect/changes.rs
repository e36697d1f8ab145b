use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::consts::{APPS_DIR, ENV_DATA_FILE, ENVS_DIR, PROTOTYPES_DIR};
use crate::detect::DetectError;
use crate::target::TargetMap;
use crate::util::relative_id;

/// Map changed files (relative to `root`, `/`-separated) to the environments
/// and applications they affect.
///
/// - `envs/<env...>/_apps/<app>/...` selects `app` in `envs/<env...>`
/// - any other file under `envs/` selects every application of the nearest
///   environment at or above its directory, or of `envs` as a whole when no
///   such environment exists
/// - `prototypes/<proto>/...` selects `proto` in every environment that
///   defines an application directory of that name
///
/// Changes inside directories that no longer exist (a deleted environment)
/// and files outside these trees are ignored.
pub fn map_changed_paths<S: AsRef<str>>(root: &Path, files: &[S]) -> Result<TargetMap, DetectError> {
  let mut map = TargetMap::new();
  let mut prototypes: Vec<String> = Vec::new();

  for file in files {
    let file = file.as_ref().trim_end_matches('/');
    let parts: Vec<&str> = file.split('/').filter(|p| !p.is_empty()).collect();

    match parts.first() {
      Some(&ENVS_DIR) if parts.len() > 1 => {
        let apps_idx = parts.iter().position(|p| *p == APPS_DIR);
        let dir = match apps_idx {
          Some(idx) => &parts[..idx],
          None => &parts[..parts.len() - 1],
        };

        let Some(env) = owning_env(root, dir) else {
          debug!(file, "ignoring change in a directory that no longer exists");
          continue;
        };

        match apps_idx {
          // a file directly in `_apps/` belongs to no single application
          Some(idx) if idx + 2 < parts.len() && env == dir.join("/") => map.add_app(env, parts[idx + 1]),
          _ => map.add_env(env),
        }
      }
      Some(&PROTOTYPES_DIR) if parts.len() > 2 => {
        let proto = parts[1].to_string();
        if !prototypes.contains(&proto) {
          prototypes.push(proto);
        }
      }
      _ => trace!(file, "ignoring change outside of environments and prototypes"),
    }
  }

  if !prototypes.is_empty() {
    for (env, app) in apps_using_prototypes(root, &prototypes)? {
      map.add_app(env, app);
    }
  }

  debug!(changed = files.len(), targets = map.len(), "mapped changed files");
  Ok(map)
}

/// The environment owning the directory `dir` (path segments below `root`,
/// starting with `envs`).
///
/// That is the nearest directory at or above `dir` holding the environment
/// data file, or `envs` when there is none. Returns `None` when `dir` is not
/// on disk.
fn owning_env(root: &Path, dir: &[&str]) -> Option<String> {
  if !join_parts(root, dir).is_dir() {
    return None;
  }

  let env = (1..=dir.len())
    .rev()
    .map(|n| &dir[..n])
    .find(|parts| join_parts(root, parts).join(ENV_DATA_FILE).is_file())
    .map(|parts| parts.join("/"))
    .unwrap_or_else(|| ENVS_DIR.to_string());
  Some(env)
}

fn join_parts(root: &Path, parts: &[&str]) -> PathBuf {
  parts.iter().fold(root.to_path_buf(), |path, part| path.join(part))
}

/// Find `(env, app)` pairs whose application directory is named after one of
/// `prototypes`.
fn apps_using_prototypes(root: &Path, prototypes: &[String]) -> Result<Vec<(String, String)>, DetectError> {
  let envs_root = root.join(ENVS_DIR);
  if !envs_root.is_dir() {
    return Ok(Vec::new());
  }

  let mut found = Vec::new();
  for entry in WalkDir::new(&envs_root).sort_by_file_name() {
    let entry = entry?;
    if !entry.file_type().is_dir() || entry.file_name() != APPS_DIR {
      continue;
    }
    let Some(env_dir) = entry.path().parent() else {
      continue;
    };
    if !env_dir.join(ENV_DATA_FILE).is_file() {
      continue;
    }
    let Some(env) = relative_id(root, env_dir) else {
      continue;
    };

    for proto in prototypes {
      if entry.path().join(proto).is_dir() {
        found.push((env.clone(), proto.clone()));
      }
    }
  }

  Ok(found)
}
