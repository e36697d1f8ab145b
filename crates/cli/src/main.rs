use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use myks_lib::config::{Config, LogLevel, Settings, SmartModeConfig, load_config_file, with_env_overrides};
use myks_lib::consts::APP_NAME;

mod cmd;
mod output;

use cmd::{cmd_cleanup, cmd_render};
use output::print_error;

const ABOUT: &str = "Manage (e)xternal (y)aml for (k)ubernetes (s)ecurely";

const LONG_ABOUT: &str = "\
Manage (e)xternal (y)aml for (k)ubernetes (s)ecurely

Commands that take [environments] [applications] run in Smart Mode when no
positional arguments are given: the environments and applications affected by
changes in the git working tree are detected and processed.

Both arguments are comma-separated lists. ALL selects everything.";

/// myks - render Kubernetes manifests for many environments
#[derive(Parser)]
#[command(name = APP_NAME, author, version, about = ABOUT, long_about = LONG_ABOUT)]
struct Cli {
  /// Log level: trace, debug, info, warn, error, fatal, panic or disabled
  #[arg(short, long, global = true, value_name = "LEVEL")]
  log_level: Option<String>,

  /// Number of applications processed in parallel (0 for no limit)
  #[arg(short = 'a', long = "async", global = true, value_name = "N")]
  async_level: Option<usize>,

  /// Base revision to compare against in Smart Mode (local changes only if unset)
  #[arg(long = "smart-mode.base-revision", global = true, value_name = "REV")]
  base_revision: Option<String>,

  /// Only print the list of environments and applications to process
  #[arg(long = "smart-mode.only-print", global = true)]
  only_print: bool,

  /// Path to the config file (default: .myks.yaml, searched upwards)
  #[arg(long, global = true, value_name = "FILE")]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Render manifests for the selected environments and applications
  Render {
    /// [environments] [applications], each a comma-separated list or ALL
    #[arg(value_name = "ARGS")]
    args: Vec<String>,
  },

  /// Remove rendered output of deleted environments and applications
  Cleanup,
}

impl Cli {
  /// The configuration layer set by command-line flags.
  fn flag_layer(&self) -> Config {
    Config {
      log_level: self.log_level.clone(),
      async_level: self.async_level,
      smart_mode: SmartModeConfig {
        base_revision: self.base_revision.clone(),
        only_print: self.only_print.then_some(true),
      },
    }
  }
}

fn long_version() -> String {
  format!(
    "{}\n  commit: {}\n  date:   {}",
    env!("CARGO_PKG_VERSION"),
    option_env!("MYKS_BUILD_COMMIT").unwrap_or("unknown"),
    option_env!("MYKS_BUILD_DATE").unwrap_or("unknown"),
  )
}

fn parse_cli() -> Cli {
  let matches = Cli::command().long_version(long_version()).get_matches();
  Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn init_logging(level: LogLevel) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn load_settings(cli: &Cli, cwd: &Path) -> Result<(Settings, Option<PathBuf>)> {
  let (file_layer, path) = load_config_file(cli.config.as_deref(), cwd)?;
  let settings = with_env_overrides(file_layer)?
    .layer(cli.flag_layer())
    .into_settings()?;
  Ok((settings, path))
}

fn run(cli: Cli) -> Result<()> {
  let cwd = std::env::current_dir().context("Failed to determine current directory")?;
  let (settings, config_path) = load_settings(&cli, &cwd)?;

  init_logging(settings.log_level);
  debug!(level = %settings.log_level, "log level set");
  match &config_path {
    Some(path) => info!(path = %path.display(), "Using config file"),
    None => debug!("No config file used"),
  }

  match cli.command {
    Commands::Render { args } => cmd_render(&cwd, &args, &settings),
    Commands::Cleanup => cmd_cleanup(&cwd),
  }
}

fn main() -> ExitCode {
  let cli = parse_cli();

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
