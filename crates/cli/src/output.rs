//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output: colored status
//! messages, duration formatting, and the Smart Mode target listing.

use std::time::Duration;

use myks_lib::consts::ALL_TOKEN;
use myks_lib::target::{AppSelector, Targets};
use owo_colors::{OwoColorize, Stream};

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

/// Indentation of application names below their environment.
const APP_INDENT: &str = "    ";

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

/// Render the targets Smart Mode would process, as printed in print-only mode.
///
/// ```text
///
/// Smart Mode detected:
/// → envs/dev
///     ALL
/// → envs/prod
///     web
/// ```
pub fn format_targets(targets: &Targets) -> String {
  let mut lines = vec![
    String::new(),
    "Smart Mode detected:"
      .if_supports_color(Stream::Stdout, |s| s.bold())
      .to_string(),
  ];

  match targets {
    Targets::All => {
      lines.push(format!(
        "{} {}",
        symbols::ARROW,
        ALL_TOKEN.if_supports_color(Stream::Stdout, |s| s.bold())
      ));
    }
    Targets::Selected(map) => {
      for (env, selector) in map {
        lines.push(format!("{} {}", symbols::ARROW, env));
        match selector {
          AppSelector::All => lines.push(format!(
            "{}{}",
            APP_INDENT,
            ALL_TOKEN.if_supports_color(Stream::Stdout, |s| s.bold())
          )),
          AppSelector::Only(apps) => {
            lines.extend(apps.iter().map(|app| format!("{}{}", APP_INDENT, app)));
          }
        }
      }
    }
  }

  let mut out = lines.join("\n");
  out.push('\n');
  out
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}
