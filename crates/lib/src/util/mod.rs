//! Shared utilities.
//!
//! Path helpers used across the crate, plus test helpers.

use std::path::Path;

#[cfg(test)]
pub mod testutil;

/// Render `path` relative to `base` as a `/`-separated identifier.
///
/// Returns `None` when `path` is not below `base`.
pub fn relative_id(base: &Path, path: &Path) -> Option<String> {
  let rel = path.strip_prefix(base).ok()?;
  let parts: Vec<String> = rel
    .components()
    .map(|c| c.as_os_str().to_string_lossy().into_owned())
    .collect();
  Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn relative_id_joins_with_slashes() {
    let base = Path::new("/repo");
    assert_eq!(
      relative_id(base, &base.join("envs").join("eu").join("prod")),
      Some("envs/eu/prod".to_string())
    );
    assert_eq!(relative_id(base, base), Some(String::new()));
    assert_eq!(relative_id(base, Path::new("/other")), None);
  }
}
