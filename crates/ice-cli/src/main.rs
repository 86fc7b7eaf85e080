use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ice_cli::commands::{batch, fetch, game_ids, overlaps, reconcile};
use ice_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match command {
        Commands::Reconcile { input, json } => {
            reconcile::run(&mut out, input, &config.reconcile_config(), *json)?;
        }
        Commands::Overlaps {
            input,
            totals,
            json,
        } => {
            overlaps::run(&mut out, input, &config.reconcile_config(), *totals, *json)?;
        }
        Commands::Batch { inputs, totals } => {
            batch::run(&mut out, inputs, &config.reconcile_config(), *totals)?;
        }
        Commands::Fetch { game_id, output } => {
            fetch::run(&mut out, game_id, output.as_deref(), &config.endpoints())?;
        }
        Commands::GameIds { season, count } => {
            game_ids::run(&mut out, *season, *count, &config.endpoints())?;
        }
    }
    out.flush()?;

    Ok(())
}
