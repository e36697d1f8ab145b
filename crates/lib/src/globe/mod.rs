//! The render orchestrator.
//!
//! A [`Globe`] is the universe of environments and applications found below a
//! root directory. It selects applications for a set of [`Targets`], renders
//! them, and removes output left behind by deleted environments or
//! applications.
//!
//! # Layout
//!
//! ```text
//! envs/
//!   prod/
//!     env-data.ytt.yaml
//!     _apps/
//!       web/*.yaml
//!     eu/
//!       env-data.ytt.yaml
//! rendered/
//!   envs/prod/web/manifest.yaml
//! ```

mod cleanup;
mod discover;
mod render;
mod types;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::consts::{ENVS_DIR, RENDERED_DIR};
use crate::target::Targets;

pub use cleanup::remove_stale_output;
pub use discover::{discover_environments, select_applications};
pub use render::{render_application, render_applications};
pub use types::{Application, Environment, GlobeError};

/// Consumer of resolved targets.
pub trait Orchestrator {
  /// Prepare the applications selected by `targets`.
  fn init(&mut self, targets: &Targets) -> Result<(), GlobeError>;

  /// Render the prepared applications, at most `async_level` in parallel
  /// (0 means no limit). Returns the number of rendered applications.
  fn render(&mut self, async_level: usize) -> Result<usize, GlobeError>;

  /// Remove output that no longer corresponds to an application. Returns the
  /// number of removed application outputs.
  fn cleanup(&mut self) -> Result<usize, GlobeError>;
}

/// Filesystem-backed [`Orchestrator`].
#[derive(Debug)]
pub struct Globe {
  root: PathBuf,
  environments: Vec<Environment>,
  selected: Option<Vec<Application>>,
}

impl Globe {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      environments: Vec::new(),
      selected: None,
    }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn output_dir(&self) -> PathBuf {
    self.root.join(RENDERED_DIR)
  }

  /// Check that the root directory has an environment tree.
  pub fn validate_root_dir(&self) -> Result<(), GlobeError> {
    if self.root.join(ENVS_DIR).is_dir() {
      Ok(())
    } else {
      Err(GlobeError::UnsuitableRoot(self.root.clone()))
    }
  }

  pub fn environments(&self) -> &[Environment] {
    &self.environments
  }

  /// Applications selected by the last [`Orchestrator::init`] call.
  pub fn selected(&self) -> Option<&[Application]> {
    self.selected.as_deref()
  }

  fn all_applications(&self) -> Result<Vec<Application>, GlobeError> {
    select_applications(&self.environments, &Targets::All)
  }
}

impl Orchestrator for Globe {
  fn init(&mut self, targets: &Targets) -> Result<(), GlobeError> {
    self.validate_root_dir()?;
    self.environments = discover_environments(&self.root)?;
    let selected = select_applications(&self.environments, targets)?;

    info!(
      environments = self.environments.len(),
      selected = selected.len(),
      targets = %targets,
      "initialized globe"
    );

    self.selected = Some(selected);
    Ok(())
  }

  fn render(&mut self, async_level: usize) -> Result<usize, GlobeError> {
    let apps = self.selected.clone().ok_or(GlobeError::NotInitialized)?;
    if apps.is_empty() {
      info!("no applications selected, nothing to render");
      return Ok(0);
    }

    let rt = tokio::runtime::Runtime::new().map_err(|e| GlobeError::Runtime(e.to_string()))?;
    rt.block_on(render_applications(apps, self.output_dir(), async_level))
  }

  fn cleanup(&mut self) -> Result<usize, GlobeError> {
    if self.selected.is_none() {
      return Err(GlobeError::NotInitialized);
    }

    let existing = self.all_applications()?;
    let removed = remove_stale_output(&self.output_dir(), &existing)?;
    debug!(removed, "cleanup complete");
    Ok(removed)
  }
}
