//! Per-pair totals of shared ice time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::GameId;
use crate::overlap::OverlapRecord;
use crate::shift::PlayerId;

/// Total shared ice time for one unordered teammate pair.
///
/// `player_id < player_id2` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairTotal {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub player_id2: PlayerId,
    pub seconds: u64,
    /// Number of overlap records folded into this total.
    pub shifts: u32,
}

/// Sums overlap records per unordered pair.
///
/// The direction a record was reported in does not matter. Output is sorted
/// by game, then pair.
pub fn aggregate_pairs(records: &[OverlapRecord]) -> Vec<PairTotal> {
    let mut totals: BTreeMap<(GameId, PlayerId, PlayerId), (u64, u32)> = BTreeMap::new();

    for record in records {
        let low = record.player_id.min(record.player_id2);
        let high = record.player_id.max(record.player_id2);
        let (seconds, shifts) = totals.entry((record.game_id, low, high)).or_insert((0, 0));
        *seconds += u64::from(record.seconds);
        *shifts += 1;
    }

    totals
        .into_iter()
        .map(|((game_id, player_id, player_id2), (seconds, shifts))| PairTotal {
            game_id,
            player_id,
            player_id2,
            seconds,
            shifts,
        })
        .collect()
}
