use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

/// Verbosity of log output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
  Trace,
  Debug,
  #[default]
  Info,
  Warn,
  Error,
  Disabled,
}

impl LogLevel {
  /// Directive understood by `tracing_subscriber::EnvFilter`.
  pub fn as_filter(self) -> &'static str {
    match self {
      LogLevel::Trace => "trace",
      LogLevel::Debug => "debug",
      LogLevel::Info => "info",
      LogLevel::Warn => "warn",
      LogLevel::Error => "error",
      LogLevel::Disabled => "off",
    }
  }
}

impl FromStr for LogLevel {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "trace" => Ok(LogLevel::Trace),
      "debug" => Ok(LogLevel::Debug),
      "" | "info" => Ok(LogLevel::Info),
      "warn" | "warning" => Ok(LogLevel::Warn),
      // fatal and panic have no tracing counterpart
      "error" | "fatal" | "panic" => Ok(LogLevel::Error),
      "disabled" | "off" => Ok(LogLevel::Disabled),
      _ => Err(ConfigError::InvalidValue {
        key: "log-level".to_string(),
        value: s.to_string(),
        expected: "one of trace, debug, info, warn, error, fatal, panic, disabled",
      }),
    }
  }
}

impl fmt::Display for LogLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      LogLevel::Disabled => "disabled",
      other => other.as_filter(),
    };
    f.write_str(name)
  }
}
