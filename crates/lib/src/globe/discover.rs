//! Discovery of environments and selection of applications.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::consts::{APPS_DIR, ENV_DATA_FILE, ENVS_DIR};
use crate::globe::types::{Application, Environment, GlobeError};
use crate::target::{AppSelector, Targets};
use crate::util::relative_id;

/// Find every environment below `root/envs`.
///
/// An environment is a directory holding the environment data file; its
/// applications are the subdirectories of its `_apps` directory.
pub fn discover_environments(root: &Path) -> Result<Vec<Environment>, GlobeError> {
  let envs_root = root.join(ENVS_DIR);
  let mut envs = Vec::new();

  let walker = WalkDir::new(&envs_root)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|e| e.file_name() != APPS_DIR);

  for entry in walker {
    let entry = entry?;
    if !entry.file_type().is_file() || entry.file_name() != ENV_DATA_FILE {
      continue;
    }
    let Some(dir) = entry.path().parent() else {
      continue;
    };
    let Some(id) = relative_id(root, dir) else {
      continue;
    };

    let apps = list_apps(&dir.join(APPS_DIR))?;
    debug!(env = %id, apps = apps.len(), "discovered environment");
    envs.push(Environment {
      id,
      dir: dir.to_path_buf(),
      apps,
    });
  }

  Ok(envs)
}

fn list_apps(apps_dir: &Path) -> Result<Vec<String>, GlobeError> {
  if !apps_dir.is_dir() {
    return Ok(Vec::new());
  }

  let mut apps = Vec::new();
  for entry in fs::read_dir(apps_dir).map_err(|e| GlobeError::io(apps_dir, e))? {
    let entry = entry.map_err(|e| GlobeError::io(apps_dir, e))?;
    if entry.path().is_dir() {
      apps.push(entry.file_name().to_string_lossy().into_owned());
    }
  }
  apps.sort();
  Ok(apps)
}

/// Whether the search path `key` selects the environment `env_id`.
fn matches_env(key: &str, env_id: &str) -> bool {
  let key = key.trim_end_matches('/');
  env_id == key || env_id.strip_prefix(key).is_some_and(|rest| rest.starts_with('/'))
}

/// Pick the applications named by `targets` out of `envs`.
///
/// Each key of a selection is a search path: it selects the environment with
/// that id and every environment below it. A key selecting nothing is an
/// error; application names missing from a selected environment are skipped.
pub fn select_applications(envs: &[Environment], targets: &Targets) -> Result<Vec<Application>, GlobeError> {
  let chosen: BTreeMap<&str, AppSelector> = match targets {
    Targets::All => envs.iter().map(|env| (env.id.as_str(), AppSelector::All)).collect(),
    Targets::Selected(map) => {
      let mut chosen: BTreeMap<&str, AppSelector> = BTreeMap::new();
      for (key, selector) in map {
        let mut found = false;
        for env in envs.iter().filter(|env| matches_env(key, &env.id)) {
          found = true;
          chosen
            .entry(env.id.as_str())
            .and_modify(|existing| existing.merge(selector.clone()))
            .or_insert_with(|| selector.clone());
        }
        if !found {
          return Err(GlobeError::EnvironmentNotFound(key.clone()));
        }
      }
      chosen
    }
  };

  let mut apps = Vec::new();
  for env in envs {
    let Some(selector) = chosen.get(env.id.as_str()) else {
      continue;
    };

    if let AppSelector::Only(names) = selector {
      for missing in names.iter().filter(|name| !env.apps.contains(name)) {
        debug!(env = %env.id, app = %missing, "application not defined in environment");
      }
    }

    for app in env.apps.iter().filter(|app| selector.includes(app)) {
      apps.push(Application {
        env_id: env.id.clone(),
        name: app.clone(),
        dir: env.dir.join(APPS_DIR).join(app),
      });
    }
  }

  Ok(apps)
}
