//! Implementation of the `ice fetch` command.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use ice_api::{Endpoints, ShiftClient};
use ice_core::{GameId, RawShift, validate_season};
use serde::Serialize;

#[derive(Serialize)]
struct Envelope<'a> {
    data: &'a [RawShift],
}

/// Downloads a game's raw shift chart and writes it in the provider's
/// `{"data": [...]}` envelope, so the file feeds straight back into
/// `ice reconcile`.
pub fn run<W: Write>(
    out: &mut W,
    game_id: &str,
    output: Option<&Path>,
    endpoints: &Endpoints,
) -> Result<()> {
    let game_id: GameId = game_id
        .parse()
        .with_context(|| format!("invalid game id: {game_id}"))?;
    let game_type = game_id
        .game_type()
        .with_context(|| format!("invalid game id: {game_id}"))?;
    validate_season(game_id.season()).with_context(|| format!("invalid game id: {game_id}"))?;
    tracing::info!(
        %game_id,
        season = game_id.season(),
        %game_type,
        number = game_id.number(),
        "fetching shift chart"
    );

    let client = ShiftClient::new(endpoints).context("failed to build HTTP client")?;

    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let shifts = runtime
        .block_on(client.game_shifts(game_id))
        .with_context(|| format!("failed to fetch shifts for game {game_id}"))?;

    let envelope = Envelope { data: &shifts };
    match output {
        Some(path) => {
            let json =
                serde_json::to_string_pretty(&envelope).context("failed to serialize shifts")?;
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            writeln!(
                out,
                "Wrote {} shifts for game {game_id} to {}",
                shifts.len(),
                path.display()
            )?;
        }
        None => {
            serde_json::to_writer_pretty(&mut *out, &envelope)
                .context("failed to serialize shifts")?;
            writeln!(out)?;
        }
    }
    Ok(())
}
