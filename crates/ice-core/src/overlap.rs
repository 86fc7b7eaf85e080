//! Pairwise teammate overlap.
//!
//! For one game, finds every pair of teammate shifts that share ice time and
//! emits one [`OverlapRecord`] per overlapping shift pair.
//!
//! # Deduplication
//!
//! Players are visited in `(team_id, player_id)` order. Once a player's
//! shifts have been compared against every teammate, the player joins the
//! resolved set and is never a comparison target again. Each unordered pair
//! of overlapping shift instances is therefore reported exactly once, on the
//! side of whichever player is visited first.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::GameId;
use crate::shift::{PlayerId, Shift, TeamId};

/// Overlap engine errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OverlapError {
    /// Shifts from more than one game were passed in.
    #[error("shifts span more than one game: expected {expected}, found {found}")]
    CrossGameInput { expected: GameId, found: GameId },
    /// A shift does not satisfy the reconciled-shift invariants.
    #[error("invalid shift for player {player_id} in game {game_id}: {reason}")]
    InvalidShift {
        game_id: GameId,
        player_id: PlayerId,
        reason: &'static str,
    },
}

/// Seconds two teammates spent on the ice together during one pair of shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapRecord {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub player_id2: PlayerId,
    pub seconds: u32,
}

/// A half-open interval `[start, end)` of game-elapsed seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub const fn of(shift: &Shift) -> Self {
        Self::new(shift.start_time, shift.end_time)
    }

    /// Whether the two intervals share any point.
    ///
    /// A zero-length interval strictly inside the other one intersects it
    /// with zero magnitude. Touching endpoints do not intersect.
    pub const fn intersects(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Length of the intersection, zero when disjoint.
    pub fn overlap_seconds(&self, other: &Self) -> u32 {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        end.saturating_sub(start)
    }
}

/// Overlap between two shifts, if they are teammates whose intervals
/// intersect.
pub fn shift_overlap(a: &Shift, b: &Shift) -> Option<u32> {
    if a.team_id != b.team_id || a.player_id == b.player_id {
        return None;
    }
    let (a, b) = (Interval::of(a), Interval::of(b));
    a.intersects(&b).then(|| a.overlap_seconds(&b))
}

type PlayerKey = (TeamId, PlayerId);

/// Computes teammate overlaps for the shifts of a single game.
///
/// Records are ordered by the visiting player, then the partner, then the
/// visiting player's shift start. Returns an empty list for empty input.
pub fn compute_overlaps(shifts: &[Shift]) -> Result<Vec<OverlapRecord>, OverlapError> {
    let Some(first) = shifts.first() else {
        return Ok(Vec::new());
    };
    let game_id = first.game_id;
    for shift in shifts {
        validate(shift, game_id)?;
    }

    let players = group_by_player(shifts);
    let mut resolved: BTreeSet<PlayerId> = BTreeSet::new();
    let mut records = Vec::new();

    for (&(team_id, player_id), own_shifts) in &players {
        let teammates = players
            .range((team_id, PlayerId::MIN)..=(team_id, PlayerId::MAX))
            .filter(|&(&(_, other), _)| other != player_id && !resolved.contains(&other));

        for (&(_, other), other_shifts) in teammates {
            records.extend(pair_overlaps(game_id, player_id, own_shifts, other, other_shifts));
        }

        resolved.insert(player_id);
    }

    tracing::debug!(
        game_id = %game_id,
        players = players.len(),
        records = records.len(),
        "computed overlaps"
    );
    Ok(records)
}

fn validate(shift: &Shift, game_id: GameId) -> Result<(), OverlapError> {
    if shift.game_id != game_id {
        return Err(OverlapError::CrossGameInput {
            expected: game_id,
            found: shift.game_id,
        });
    }
    let invalid = |reason| OverlapError::InvalidShift {
        game_id: shift.game_id,
        player_id: shift.player_id,
        reason,
    };
    if shift.end_time < shift.start_time {
        return Err(invalid("end time precedes start time"));
    }
    if shift.duration != shift.end_time - shift.start_time {
        return Err(invalid("duration does not match boundaries"));
    }
    Ok(())
}

fn group_by_player(shifts: &[Shift]) -> BTreeMap<PlayerKey, Vec<Interval>> {
    let mut players: BTreeMap<PlayerKey, Vec<Interval>> = BTreeMap::new();
    for shift in shifts {
        players
            .entry((shift.team_id, shift.player_id))
            .or_default()
            .push(Interval::of(shift));
    }
    for intervals in players.values_mut() {
        intervals.sort_by_key(|i| (i.start, i.end));
    }
    players
}

fn pair_overlaps(
    game_id: GameId,
    player_id: PlayerId,
    own: &[Interval],
    other: PlayerId,
    other_shifts: &[Interval],
) -> Vec<OverlapRecord> {
    own.iter()
        .flat_map(|a| {
            other_shifts
                .iter()
                .filter(|b| a.intersects(b))
                .map(|b| OverlapRecord {
                    game_id,
                    player_id,
                    player_id2: other,
                    seconds: a.overlap_seconds(b),
                })
        })
        .collect()
}
