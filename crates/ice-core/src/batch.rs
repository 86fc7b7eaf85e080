//! Multi-game processing.
//!
//! Games share no state, so each one is reconciled and paired on its own
//! rayon task. Within a game the work stays sequential.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::game::GameId;
use crate::overlap::{OverlapError, OverlapRecord, compute_overlaps};
use crate::reconcile::{ReconcileConfig, Reconciliation, reconcile_shifts};
use crate::shift::RawShift;

/// Outcome of processing one game.
#[derive(Debug, Clone)]
pub struct GameReport {
    pub game_id: GameId,
    pub reconciliation: Reconciliation,
    pub overlaps: Result<Vec<OverlapRecord>, OverlapError>,
}

/// Reconciles one game's raw shifts and computes its overlaps.
pub fn process_game(game_id: GameId, raw: &[RawShift], config: &ReconcileConfig) -> GameReport {
    let reconciliation = reconcile_shifts(raw, config);
    let overlaps = compute_overlaps(&reconciliation.shifts);
    if let Err(e) = &overlaps {
        tracing::warn!(game_id = %game_id, error = %e, "overlap computation failed");
    }
    GameReport {
        game_id,
        reconciliation,
        overlaps,
    }
}

/// Splits raw shifts by game and processes every game in parallel.
///
/// Records without a game id cannot be attributed and are skipped. Reports
/// are sorted by game id.
pub fn process_games(raw: Vec<RawShift>, config: &ReconcileConfig) -> Vec<GameReport> {
    let mut games: BTreeMap<GameId, Vec<RawShift>> = BTreeMap::new();
    let mut unattributed = 0usize;
    for record in raw {
        match record.game_id {
            Some(game_id) => games.entry(game_id).or_default().push(record),
            None => unattributed += 1,
        }
    }
    if unattributed > 0 {
        tracing::warn!(count = unattributed, "skipping shift records without a game id");
    }

    let games: Vec<(GameId, Vec<RawShift>)> = games.into_iter().collect();
    let mut reports: Vec<GameReport> = games
        .par_iter()
        .map(|(game_id, records)| process_game(*game_id, records, config))
        .collect();

    reports.sort_by_key(|r| r.game_id);
    reports
}
