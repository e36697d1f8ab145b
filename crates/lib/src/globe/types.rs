//! Types shared by discovery, rendering and cleanup.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the render orchestrator.
#[derive(Debug, Error)]
pub enum GlobeError {
  /// The root directory has no environment tree.
  #[error("root directory '{0}' is not suitable for myks: missing envs directory")]
  UnsuitableRoot(PathBuf),

  /// A requested environment search path matched no environment.
  #[error("no environment found for '{0}'")]
  EnvironmentNotFound(String),

  /// Rendering was requested before targets were selected.
  #[error("globe is not initialized")]
  NotInitialized,

  /// A manifest file is not valid YAML.
  #[error("invalid manifest '{path}': {source}")]
  InvalidManifest {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  /// Filesystem error on a specific path.
  #[error("io error on '{path}': {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// Failed to walk a directory tree.
  #[error("failed to scan directory: {0}")]
  Walk(#[from] walkdir::Error),

  /// The async runtime could not run render tasks.
  #[error("render runtime error: {0}")]
  Runtime(String),

  /// One or more applications failed to render.
  #[error("{failed} application(s) failed to render, first error: {first}")]
  RenderFailed { failed: usize, first: String },
}

impl GlobeError {
  pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    GlobeError::Io {
      path: path.into(),
      source,
    }
  }
}

/// An environment found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
  /// Path relative to the root, e.g. `envs/prod`.
  pub id: String,
  pub dir: PathBuf,
  /// Application names, sorted.
  pub apps: Vec<String>,
}

/// One application of one environment, selected for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
  pub env_id: String,
  pub name: String,
  pub dir: PathBuf,
}

impl Application {
  /// Identifier of the rendered output, `<env id>/<app>`.
  pub fn output_id(&self) -> String {
    format!("{}/{}", self.env_id, self.name)
  }
}
