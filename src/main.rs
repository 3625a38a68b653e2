//! Prettify - compact playbook output.
//!
//! This is the main entry point for the prettify CLI. It can replay
//! recorded event streams through the renderer, write the callback keys
//! into the host configuration file, and list available plugins.

mod cli;

use anyhow::Result;
use cli::{Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(cli.verbosity());

    let exit_code = match &cli.command {
        Commands::Replay(args) => {
            let config = cli.display_config()?;
            args.execute(&config).await?
        }
        Commands::Setup(args) => args.execute()?,
        Commands::Plugins => cli::list_plugins(),
    };

    std::process::exit(exit_code);
}

/// Initialize logging based on verbosity level.
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(verbosity >= 3))
        .with(env_filter)
        .init();
}
