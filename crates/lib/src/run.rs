//! Command pipeline: resolve targets, then hand them to an orchestrator.

use thiserror::Error;
use tracing::{info, warn};

use crate::detect::ChangeDetector;
use crate::globe::{GlobeError, Orchestrator};
use crate::target::{Resolution, ResolveError, ResolveOptions, SmartMode, Targets, resolve_targets};

#[derive(Debug, Error)]
pub enum RunError {
  #[error("unable to parse positional arguments: {0}")]
  Resolve(#[from] ResolveError),

  #[error(transparent)]
  Globe(#[from] GlobeError),
}

/// How a render run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// Smart Mode found no changes; nothing was rendered.
  NoChanges,
  /// Print-only mode: the targets to report. Nothing was rendered.
  PrintOnly(Targets),
  /// Applications were rendered. `cleaned` is set when cleanup ran, which
  /// only happens for a full render.
  Rendered { rendered: usize, cleaned: Option<usize> },
}

/// Resolve `args` and render the resulting targets with `orchestrator`.
pub fn run_render(
  mode: SmartMode,
  args: &[String],
  options: &ResolveOptions,
  async_level: usize,
  detector: &dyn ChangeDetector,
  orchestrator: &mut dyn Orchestrator,
) -> Result<Outcome, RunError> {
  let targets = match resolve_targets(mode, args, options, detector)? {
    Resolution::NoChanges => {
      warn!("Smart Mode did not find any changes. Exiting.");
      return Ok(Outcome::NoChanges);
    }
    Resolution::PrintOnly(targets) => return Ok(Outcome::PrintOnly(targets)),
    Resolution::Proceed(targets) => targets,
  };

  orchestrator.init(&targets)?;
  let rendered = orchestrator.render(async_level)?;

  let cleaned = if targets.is_all() {
    Some(orchestrator.cleanup()?)
  } else {
    None
  };

  info!(rendered, cleaned = ?cleaned, "render complete");
  Ok(Outcome::Rendered { rendered, cleaned })
}

/// Initialize every environment and remove stale output.
pub fn run_cleanup(orchestrator: &mut dyn Orchestrator) -> Result<usize, RunError> {
  orchestrator.init(&Targets::All)?;
  let removed = orchestrator.cleanup()?;
  info!(removed, "cleanup complete");
  Ok(removed)
}
