//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Shift reconciliation and shared ice time.
///
/// Reconciles raw shift charts into game-elapsed intervals and reports how
/// long each pair of teammates was on the ice together.
#[derive(Debug, Parser)]
#[command(name = "ice", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reconcile a game's raw shifts into game-elapsed intervals.
    Reconcile {
        /// Raw shift chart JSON file, or `-` for stdin.
        input: PathBuf,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Compute teammate overlaps for a single game.
    Overlaps {
        /// Raw shift chart JSON file, or `-` for stdin.
        input: PathBuf,

        /// Sum overlaps per teammate pair.
        #[arg(long)]
        totals: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Process every game found in the inputs, one JSON line per game.
    Batch {
        /// Raw shift chart JSON files.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Sum overlaps per teammate pair.
        #[arg(long)]
        totals: bool,
    },

    /// Download a game's raw shift chart.
    Fetch {
        /// Provider game id (e.g. 2013020001).
        game_id: String,

        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the regular-season game ids of a season.
    GameIds {
        /// Starting year of the season (e.g. 2013 for 2013-2014).
        season: u32,

        /// Number of games; fetched from the schedule when omitted.
        #[arg(long)]
        count: Option<u32>,
    },
}
