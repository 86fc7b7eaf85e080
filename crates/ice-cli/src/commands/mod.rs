//! CLI subcommand implementations.

pub mod batch;
pub mod fetch;
pub mod game_ids;
pub mod overlaps;
pub mod reconcile;
mod util;
