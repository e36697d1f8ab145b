//! Environment variable overrides (`MYKS_*`).

use crate::config::{Config, ConfigError};
use crate::consts::ENV_PREFIX;

pub const KEY_LOG_LEVEL: &str = "log-level";
pub const KEY_ASYNC: &str = "async";
pub const KEY_BASE_REVISION: &str = "smart-mode.base-revision";
pub const KEY_ONLY_PRINT: &str = "smart-mode.only-print";

/// Environment variable name for a config key.
///
/// `smart-mode.base-revision` becomes `MYKS_SMART_MODE_BASE_REVISION`.
pub fn env_key(key: &str) -> String {
  format!("{}_{}", ENV_PREFIX, key.replace(['.', '-'], "_").to_ascii_uppercase())
}

/// Apply `MYKS_*` environment variables on top of `config`.
pub fn with_env_overrides(mut config: Config) -> Result<Config, ConfigError> {
  if let Some(level) = lookup(KEY_LOG_LEVEL) {
    config.log_level = Some(level);
  }

  if let Some(value) = lookup(KEY_ASYNC) {
    let level = value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidValue {
      key: env_key(KEY_ASYNC),
      value: value.clone(),
      expected: "a non-negative integer",
    })?;
    config.async_level = Some(level);
  }

  if let Some(rev) = lookup(KEY_BASE_REVISION) {
    config.smart_mode.base_revision = Some(rev);
  }

  if let Some(value) = lookup(KEY_ONLY_PRINT) {
    let flag = parse_bool(&value).ok_or_else(|| ConfigError::InvalidValue {
      key: env_key(KEY_ONLY_PRINT),
      value: value.clone(),
      expected: "a boolean",
    })?;
    config.smart_mode.only_print = Some(flag);
  }

  Ok(config)
}

fn lookup(key: &str) -> Option<String> {
  std::env::var(env_key(key)).ok()
}

/// Parse a boolean the way Go's `strconv.ParseBool` does.
pub fn parse_bool(value: &str) -> Option<bool> {
  match value.trim() {
    "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
    "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
    _ => None,
  }
}
