//! Implementation of the `ice game-ids` command.

use std::io::Write;

use anyhow::{Context, Result};
use ice_api::{Endpoints, ShiftClient};
use ice_core::{season_game_ids, validate_season};

/// Prints every regular-season game id of `season`, one per line.
///
/// When `count` is not given the number of games is looked up from the
/// schedule API. The season is checked first, so an unsupported season
/// never reaches the network.
pub fn run<W: Write>(
    out: &mut W,
    season: u32,
    count: Option<u32>,
    endpoints: &Endpoints,
) -> Result<()> {
    validate_season(season)
        .with_context(|| format!("cannot enumerate games for season {season}"))?;

    let count = match count {
        Some(count) => count,
        None => fetch_game_count(season, endpoints)?,
    };

    let ids = season_game_ids(season, count)
        .with_context(|| format!("cannot enumerate games for season {season}"))?;
    for id in ids {
        writeln!(out, "{id}")?;
    }
    Ok(())
}

fn fetch_game_count(season: u32, endpoints: &Endpoints) -> Result<u32> {
    let client = ShiftClient::new(endpoints).context("failed to build HTTP client")?;
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let count = runtime
        .block_on(client.season_game_count(season))
        .with_context(|| format!("failed to fetch schedule for season {season}"))?;
    tracing::info!(season, count, "fetched season game count");
    Ok(count)
}
