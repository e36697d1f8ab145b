//! Configuration loading.
//!
//! Settings come from four layers, highest priority first: command-line
//! flags, `MYKS_*` environment variables, the `.myks.yaml` config file, and
//! built-in defaults. Each layer is a [`Config`] with optional fields;
//! [`Config::layer`] stacks them and [`Config::into_settings`] fills the gaps.

mod env;
mod level;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::consts::CONFIG_FILENAME;

pub use env::{KEY_ASYNC, KEY_BASE_REVISION, KEY_LOG_LEVEL, KEY_ONLY_PRINT, env_key, parse_bool, with_env_overrides};
pub use level::LogLevel;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// An explicitly requested config file does not exist.
  #[error("config file not found: {0}")]
  NotFound(PathBuf),

  /// The config file could not be read.
  #[error("failed to read config file '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The config file is not valid YAML or has unknown keys.
  #[error("failed to parse config file '{path}': {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  /// A setting has a value of the wrong shape.
  #[error("invalid value '{value}' for {key}: expected {expected}")]
  InvalidValue {
    key: String,
    value: String,
    expected: &'static str,
  },
}

/// One layer of configuration. Unset fields defer to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
  pub log_level: Option<String>,
  #[serde(rename = "async")]
  pub async_level: Option<usize>,
  pub smart_mode: SmartModeConfig,
}

/// The `smart-mode` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct SmartModeConfig {
  pub base_revision: Option<String>,
  pub only_print: Option<bool>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
  pub log_level: LogLevel,
  /// Applications rendered in parallel; 0 means no limit.
  pub async_level: usize,
  pub base_revision: String,
  pub only_print: bool,
}

impl Config {
  /// Parse a config file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
      path: path.to_path_buf(),
      source: e,
    })?;

    if content.trim().is_empty() {
      return Ok(Config::default());
    }

    serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
      path: path.to_path_buf(),
      source: e,
    })
  }

  /// Stack `higher` on top of `self`: every field set in `higher` wins.
  pub fn layer(self, higher: Config) -> Config {
    Config {
      log_level: higher.log_level.or(self.log_level),
      async_level: higher.async_level.or(self.async_level),
      smart_mode: SmartModeConfig {
        base_revision: higher.smart_mode.base_revision.or(self.smart_mode.base_revision),
        only_print: higher.smart_mode.only_print.or(self.smart_mode.only_print),
      },
    }
  }

  /// Fill unset fields with defaults and validate values.
  pub fn into_settings(self) -> Result<Settings, ConfigError> {
    let log_level = match self.log_level {
      Some(level) => level.parse()?,
      None => LogLevel::default(),
    };

    Ok(Settings {
      log_level,
      async_level: self.async_level.unwrap_or(0),
      base_revision: self.smart_mode.base_revision.unwrap_or_default(),
      only_print: self.smart_mode.only_print.unwrap_or(false),
    })
  }
}

/// Find the first `.myks.yaml` in `start` or any of its ancestors.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
  start
    .ancestors()
    .map(|dir| dir.join(CONFIG_FILENAME))
    .find(|candidate| candidate.is_file())
}

/// Load the config file layer.
///
/// An explicit path must exist. Without one, the file is discovered from
/// `cwd` upwards and its absence yields an empty layer. Returns the layer and
/// the path it was read from.
pub fn load_config_file(explicit: Option<&Path>, cwd: &Path) -> Result<(Config, Option<PathBuf>), ConfigError> {
  let path = match explicit {
    Some(path) if !path.is_file() => return Err(ConfigError::NotFound(path.to_path_buf())),
    Some(path) => path.to_path_buf(),
    None => match find_config_file(cwd) {
      Some(path) => path,
      None => {
        debug!(cwd = %cwd.display(), "no {} found", CONFIG_FILENAME);
        return Ok((Config::default(), None));
      }
    },
  };

  let config = Config::load(&path)?;
  Ok((config, Some(path)))
}
