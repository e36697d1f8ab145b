//! Resolution of positional arguments into render targets.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::consts::{ALL_TOKEN, ENVS_DIR};
use crate::detect::ChangeDetector;
use crate::target::types::{AppSelector, TargetMap, Targets};

/// Whether a command takes part in target resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmartMode {
  /// Positional arguments (or change detection) select the targets.
  Supported,
  /// The command always works on every environment and application.
  Unsupported,
}

/// Inputs to [`resolve_targets`] besides the positional arguments.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
  /// Revision Smart Mode compares against; empty means local changes only.
  pub base_revision: String,
  /// Report the resolved targets instead of rendering them.
  pub only_print: bool,
  /// Key used when all environments are combined with an application list.
  pub envs_root: String,
}

impl Default for ResolveOptions {
  fn default() -> Self {
    Self {
      base_revision: String::new(),
      only_print: false,
      envs_root: ENVS_DIR.to_string(),
    }
  }
}

/// What the caller should do after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  /// Hand the targets to the render orchestrator.
  Proceed(Targets),
  /// Smart Mode found nothing to render; exit successfully.
  NoChanges,
  /// Print the targets and exit successfully without rendering.
  PrintOnly(Targets),
}

/// Errors that abort target resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// More positional arguments than `[environments] [applications]`.
  #[error("too many positional arguments: expected at most 2, got {count}")]
  ArgumentCount { count: usize },
}

/// Resolve the positional arguments of a command into render targets.
///
/// - no arguments: Smart Mode, asks `detector` what changed since
///   `options.base_revision`; a detector failure falls back to rendering
///   everything
/// - one argument: comma-separated environments, or `ALL`
/// - two arguments: environments (or `ALL`) and comma-separated
///   applications (or `ALL`)
///
/// Nothing is resolved for commands without Smart Mode support. The function
/// never exits the process; early exits are reported as [`Resolution`] variants.
pub fn resolve_targets(
  mode: SmartMode,
  args: &[String],
  options: &ResolveOptions,
  detector: &dyn ChangeDetector,
) -> Result<Resolution, ResolveError> {
  if mode == SmartMode::Unsupported {
    debug!("Smart Mode is not supported for this command");
    return Ok(Resolution::Proceed(Targets::All));
  }

  let targets = match args {
    [] => match detector.detect_changes(&options.base_revision) {
      Ok(changed) if changed.is_empty() => return Ok(Resolution::NoChanges),
      Ok(changed) => {
        info!(targets = %Targets::Selected(changed.clone()), "Smart Mode detected changes");
        Targets::Selected(changed)
      }
      Err(e) => {
        warn!(error = %e, "Unable to run Smart Mode. Rendering everything.");
        Targets::All
      }
    },
    [envs] => match parse_list(envs) {
      None => Targets::All,
      Some(envs) => Targets::Selected(envs.into_iter().map(|env| (env, AppSelector::All)).collect()),
    },
    [envs, apps] => {
      let apps = match parse_list(apps) {
        None => AppSelector::All,
        Some(apps) => AppSelector::from_names(apps),
      };

      let mut map = TargetMap::new();
      match parse_list(envs) {
        // TODO: derive the key from the discovered environment roots once
        // more than one root is supported
        None => map.insert(options.envs_root.clone(), apps),
        Some(envs) => {
          for env in envs {
            map.insert(env, apps.clone());
          }
        }
      }
      Targets::Selected(map)
    }
    _ => return Err(ResolveError::ArgumentCount { count: args.len() }),
  };

  if targets.selected().is_some_and(TargetMap::is_empty) {
    warn!("No environments selected by the positional arguments");
  }

  debug!(targets = ?targets, "parsed arguments");

  if options.only_print {
    return Ok(Resolution::PrintOnly(targets));
  }

  Ok(Resolution::Proceed(targets))
}

/// Split a comma-separated argument. `None` means the `ALL` wildcard.
fn parse_list(arg: &str) -> Option<Vec<String>> {
  let items: Vec<String> = arg
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect();

  if items.iter().any(|item| item == ALL_TOKEN) {
    return None;
  }

  Some(items)
}
