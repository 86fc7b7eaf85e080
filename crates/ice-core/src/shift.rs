//! Shift records, raw and reconciled.

use serde::{Deserialize, Serialize};

use crate::game::GameId;

pub type PlayerId = u64;
pub type TeamId = u64;

/// Column names of the canonical shift table, in output order.
pub const SHIFT_COLUMNS: [&str; 8] = [
    "gameId",
    "playerId",
    "startTime",
    "period",
    "endTime",
    "duration",
    "teamId",
    "teamName",
];

/// A shift record as delivered by the provider.
///
/// Every field may be `null`. Time fields are period-local `mm:ss` strings
/// and use the empty string when the provider did not record them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawShift {
    pub game_id: Option<GameId>,
    pub player_id: Option<PlayerId>,
    pub start_time: Option<String>,
    pub period: Option<u32>,
    pub end_time: Option<String>,
    pub duration: Option<String>,
    pub team_id: Option<TeamId>,
    pub team_name: Option<String>,
}

/// A reconciled shift with game-elapsed boundaries in seconds.
///
/// `duration == end_time - start_time` always holds for shifts produced by
/// the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub start_time: u32,
    pub period: u32,
    pub end_time: u32,
    pub duration: u32,
    pub team_id: TeamId,
    pub team_name: String,
}

/// Reconciled shifts together with their column set.
///
/// The column list is carried explicitly so that an empty table still
/// describes its shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftTable {
    pub columns: [&'static str; 8],
    pub rows: Vec<Shift>,
}

impl ShiftTable {
    pub const fn new(rows: Vec<Shift>) -> Self {
        Self {
            columns: SHIFT_COLUMNS,
            rows,
        }
    }

    pub const fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

impl Default for ShiftTable {
    fn default() -> Self {
        Self::empty()
    }
}

/// Accepted shapes of a provider payload.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Envelope { data: Vec<RawShift> },
    Records(Vec<RawShift>),
}

/// Parses raw shifts from a provider response.
///
/// Accepts either the `{"data": [...]}` envelope or a bare array.
pub fn parse_raw_shifts(json: &str) -> Result<Vec<RawShift>, serde_json::Error> {
    let payload: Payload = serde_json::from_str(json)?;
    Ok(match payload {
        Payload::Envelope { data } => data,
        Payload::Records(records) => records,
    })
}
