//! Core domain logic for shift reconciliation and shared ice time.
//!
//! This crate contains the fundamental types and logic for:
//! - Reconciliation: turning raw provider shifts into game-elapsed intervals
//! - Overlap: computing teammate ice time shared per pair of shifts
//! - Aggregation: folding overlap records into per-pair totals
//! - Game ids: decoding and enumerating provider game identifiers

mod aggregate;
mod batch;
pub mod clock;
pub mod game;
mod overlap;
mod reconcile;
pub mod shift;

pub use aggregate::{PairTotal, aggregate_pairs};
pub use batch::{GameReport, process_game, process_games};
pub use game::{GameId, GameIdError, GameType, season_game_ids, validate_season};
pub use overlap::{Interval, OverlapError, OverlapRecord, compute_overlaps, shift_overlap};
pub use reconcile::{
    AnomalyKind, EndFallback, ReconcileConfig, Reconciliation, ShiftAnomaly, TimeField,
    reconcile_shifts,
};
pub use shift::{PlayerId, RawShift, SHIFT_COLUMNS, Shift, ShiftTable, TeamId, parse_raw_shifts};
