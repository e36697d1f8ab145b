//! Render command implementation.
//!
//! Resolves the positional arguments (or Smart Mode changes) into targets and
//! renders the selected applications below the current directory.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use myks_lib::config::Settings;
use myks_lib::detect::GitChangeDetector;
use myks_lib::globe::Globe;
use myks_lib::run::{Outcome, run_render};
use myks_lib::target::{ResolveOptions, SmartMode};

use crate::output::{format_duration, format_targets, print_info, print_success};

pub fn cmd_render(root: &Path, args: &[String], settings: &Settings) -> Result<()> {
  let start = Instant::now();

  let options = ResolveOptions {
    base_revision: settings.base_revision.clone(),
    only_print: settings.only_print,
    ..Default::default()
  };
  let detector = GitChangeDetector::new(root);
  let mut globe = Globe::new(root);

  let outcome = run_render(
    SmartMode::Supported,
    args,
    &options,
    settings.async_level,
    &detector,
    &mut globe,
  )
  .context("Unable to render applications")?;

  match outcome {
    Outcome::NoChanges => {}
    Outcome::PrintOnly(targets) => print!("{}", format_targets(&targets)),
    Outcome::Rendered { rendered, cleaned } => {
      print_success(&format!(
        "Rendered {} application(s) in {}",
        rendered,
        format_duration(start.elapsed())
      ));
      if let Some(removed) = cleaned.filter(|&n| n > 0) {
        print_info(&format!("Removed {} stale output(s)", removed));
      }
    }
  }

  Ok(())
}
