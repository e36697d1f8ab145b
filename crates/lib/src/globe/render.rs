//! Rendering of selected applications.
//!
//! Every `*.yaml`/`*.yml` file of an application is parsed as multi-document
//! YAML and the documents are written, normalized, to
//! `rendered/<env id>/<app>/manifest.yaml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::consts::MANIFEST_FILE;
use crate::globe::types::{Application, GlobeError};

/// Render `apps` into `output_root`, at most `async_level` at a time
/// (0 means no limit). Returns the number of rendered applications.
pub async fn render_applications(
  apps: Vec<Application>,
  output_root: PathBuf,
  async_level: usize,
) -> Result<usize, GlobeError> {
  let permits = if async_level == 0 { apps.len().max(1) } else { async_level };
  info!(apps = apps.len(), parallelism = permits, "rendering applications");

  let semaphore = Arc::new(Semaphore::new(permits));
  let mut join_set = JoinSet::new();

  for app in apps {
    let semaphore = semaphore.clone();
    let output_root = output_root.clone();

    join_set.spawn(async move {
      let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|e| GlobeError::Runtime(e.to_string()))?;

      let id = app.output_id();
      let result = tokio::task::spawn_blocking(move || render_application(&app, &output_root))
        .await
        .map_err(|e| GlobeError::Runtime(e.to_string()))?;

      Ok::<_, GlobeError>((id, result))
    });
  }

  let mut rendered = 0;
  let mut failures: Vec<String> = Vec::new();

  while let Some(join_result) = join_set.join_next().await {
    match join_result {
      Ok(Ok((id, Ok(path)))) => {
        debug!(app = %id, path = %path.display(), "rendered application");
        rendered += 1;
      }
      Ok(Ok((id, Err(e)))) => {
        error!(app = %id, error = %e, "failed to render application");
        failures.push(format!("{}: {}", id, e));
      }
      Ok(Err(e)) => {
        error!(error = %e, "unexpected error in render task");
        failures.push(e.to_string());
      }
      Err(e) => {
        error!(error = %e, "render task panicked");
        failures.push(e.to_string());
      }
    }
  }

  if let Some(first) = failures.first() {
    return Err(GlobeError::RenderFailed {
      failed: failures.len(),
      first: first.clone(),
    });
  }

  Ok(rendered)
}

/// Render a single application and return the written manifest path.
pub fn render_application(app: &Application, output_root: &Path) -> Result<PathBuf, GlobeError> {
  let mut documents = Vec::new();

  for entry in WalkDir::new(&app.dir).sort_by_file_name() {
    let entry = entry?;
    if !entry.file_type().is_file() || !is_yaml(entry.path()) {
      continue;
    }
    let path = entry.path();
    let content = fs::read_to_string(path).map_err(|e| GlobeError::io(path, e))?;
    documents.extend(parse_documents(path, &content)?);
  }

  let out_dir = output_root.join(&app.env_id).join(&app.name);
  fs::create_dir_all(&out_dir).map_err(|e| GlobeError::io(&out_dir, e))?;

  let out_file = out_dir.join(MANIFEST_FILE);
  fs::write(&out_file, documents.join("---\n")).map_err(|e| GlobeError::io(&out_file, e))?;

  Ok(out_file)
}

fn is_yaml(path: &Path) -> bool {
  matches!(path.extension().and_then(|e| e.to_str()), Some("yaml" | "yml"))
}

/// Parse every non-empty YAML document of `content` and re-serialize it.
fn parse_documents(path: &Path, content: &str) -> Result<Vec<String>, GlobeError> {
  let invalid = |source| GlobeError::InvalidManifest {
    path: path.to_path_buf(),
    source,
  };

  let mut documents = Vec::new();
  for document in serde_yaml::Deserializer::from_str(content) {
    let value = serde_yaml::Value::deserialize(document).map_err(invalid)?;
    if value.is_null() {
      continue;
    }
    documents.push(serde_yaml::to_string(&value).map_err(invalid)?);
  }
  Ok(documents)
}
