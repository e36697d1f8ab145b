use std::path::Path;

use anyhow::{Context, Result};

use myks_lib::globe::Globe;
use myks_lib::run::run_cleanup;

use crate::output::{print_info, print_success};

pub fn cmd_cleanup(root: &Path) -> Result<()> {
  let mut globe = Globe::new(root);
  let removed = run_cleanup(&mut globe).context("Unable to clean up rendered output")?;

  if removed == 0 {
    print_info("Nothing to clean up");
  } else {
    print_success(&format!("Removed {} stale output(s)", removed));
  }

  Ok(())
}
