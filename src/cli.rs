//! Command-line interface definitions and command implementations.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use prettify::callback::config::PrettifyConfig;
use prettify::callback::factory;
use prettify::callback::types::CallbackEvent;
use prettify::setup::{configure_host, SetupOptions, SetupOutcome, DEFAULT_PLUGIN_DIR};
use prettify::traits::ExecutionCallback;

/// Command-line arguments for the prettify binary.
#[derive(Debug, Parser)]
#[command(name = "prettify")]
#[command(author = "Prettify Contributors")]
#[command(version)]
#[command(about = "Compact, Artisan-style console output for playbook execution", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a prettify configuration file (TOML or YAML)
    #[arg(short = 'c', long, global = true, env = "PRETTIFY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    /// Parse arguments from the process command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level.
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    /// Load the display configuration honoring global flags.
    pub fn display_config(&self) -> Result<PrettifyConfig> {
        let mut config = PrettifyConfig::load(self.config.as_deref())
            .context("failed to load prettify configuration")?;
        if self.no_color {
            config.use_colors = false;
        }
        Ok(config)
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a recorded event stream (JSONL, one event per line)
    Replay(ReplayArgs),
    /// Write the stdout_callback keys into the host configuration file
    Setup(SetupArgs),
    /// List available callback plugins
    Plugins,
}

/// Arguments for the `replay` command.
#[derive(Debug, clap::Args)]
pub struct ReplayArgs {
    /// Path to the recorded event stream
    pub events: PathBuf,

    /// Callback plugin to render with
    #[arg(long, default_value = "prettify")]
    pub callback: String,
}

impl ReplayArgs {
    /// Decode the event stream and feed it through the callback.
    pub async fn execute(&self, config: &PrettifyConfig) -> Result<i32> {
        let callback: Arc<dyn ExecutionCallback> = factory::create(&self.callback, config)?;

        let file = File::open(&self.events)
            .with_context(|| format!("failed to open '{}'", self.events.display()))?;
        let reader = BufReader::new(file);

        let mut failures = 0usize;
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let event: CallbackEvent =
                serde_json::from_str(&line).map_err(|e| prettify::Error::EventDecode {
                    line: index + 1,
                    message: e.to_string(),
                })?;
            if event.is_failure() {
                failures += 1;
            }
            event.dispatch(callback.as_ref()).await;
        }

        debug!(failures, "Replay finished");
        Ok(if failures > 0 { 2 } else { 0 })
    }
}

/// Arguments for the `setup` command.
#[derive(Debug, clap::Args)]
pub struct SetupArgs {
    /// Configuration file to edit (default: resolved like the engine does)
    #[arg(long = "config-file")]
    pub config_file: Option<PathBuf>,

    /// Value for the callback_plugins key
    #[arg(long, default_value = DEFAULT_PLUGIN_DIR)]
    pub plugin_dir: String,

    /// Resolve and report, but do not write anything
    #[arg(long = "no-auto")]
    pub no_auto: bool,
}

impl SetupArgs {
    /// Run the auto-configuration step.
    pub fn execute(&self) -> Result<i32> {
        let mut options = SetupOptions::new()
            .with_auto_configure(!self.no_auto)
            .with_plugin_dir(&self.plugin_dir);
        if let Some(path) = &self.config_file {
            options = options.with_config_path(path);
        }

        match configure_host(&options)? {
            SetupOutcome::Written { path } => {
                println!("Configured prettify in {}", path.display());
            }
            SetupOutcome::Unchanged { path } => {
                println!("{} already selects prettify", path.display());
            }
            SetupOutcome::Skipped => {
                println!("Auto-configuration disabled, nothing written");
            }
        }
        Ok(0)
    }
}

/// List the available callback plugins.
pub fn list_plugins() -> i32 {
    for name in factory::available_plugin_names() {
        println!("{name}");
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_replay_defaults() {
        let cli = Cli::parse_from(["prettify", "replay", "events.jsonl"]);
        match cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.events, PathBuf::from("events.jsonl"));
                assert_eq!(args.callback, "prettify");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_setup_flags() {
        let cli = Cli::parse_from(["prettify", "setup", "--no-auto", "--plugin-dir", "/x"]);
        match cli.command {
            Commands::Setup(args) => {
                assert!(args.no_auto);
                assert_eq!(args.plugin_dir, "/x");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
