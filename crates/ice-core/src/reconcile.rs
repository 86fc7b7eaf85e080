//! Shift time reconciliation.
//!
//! Turns raw provider shifts into [`Shift`]s with game-elapsed boundaries.
//!
//! # Algorithm Summary
//!
//! For each record with all fields present:
//!
//! 1. If the end is missing and the shift began in the final minutes of a
//!    period, close it at the period boundary
//! 2. Backfill a missing start as `end - duration`
//! 3. Backfill a missing end as `start + duration`
//! 4. Offset both boundaries by the elapsed time of earlier periods
//! 5. If the end now precedes the start, it wrapped past the period
//!    boundary: add one period
//! 6. Recompute `duration` from the boundaries
//!
//! Records with a `null` field (goals, empty rows) are dropped. Records that
//! cannot be resolved become [`ShiftAnomaly`] values and do not stop the
//! rest of the game from reconciling.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::ClockTime;
use crate::game::GameId;
use crate::shift::{PlayerId, RawShift, Shift, ShiftTable, TeamId};

/// Number of regulation periods in a game.
pub const REGULATION_PERIODS: u32 = 3;

/// Which periods may close a missing end time at the period boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EndFallback {
    /// Any period, including overtime.
    #[default]
    AnyPeriod,
    /// Only the last regulation period.
    FinalRegulation,
}

/// Configuration for shift reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Length of a period in seconds.
    /// Default: 1200 (20 minutes).
    pub period_seconds: u32,

    /// A shift whose start minute is at least this value and whose end is
    /// missing is closed at the period boundary.
    /// Default: 18.
    pub final_minutes_threshold: u32,

    /// Periods the boundary fallback applies to.
    pub end_fallback: EndFallback,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            period_seconds: 1200,
            final_minutes_threshold: 18,
            end_fallback: EndFallback::AnyPeriod,
        }
    }
}

impl ReconcileConfig {
    const fn closes_at_boundary(&self, period: u32, start: ClockTime) -> bool {
        let period_applies = match self.end_fallback {
            EndFallback::AnyPeriod => true,
            EndFallback::FinalRegulation => period == REGULATION_PERIODS,
        };
        period_applies && start.minutes() >= self.final_minutes_threshold
    }
}

/// A raw time-bearing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeField {
    StartTime,
    EndTime,
    Duration,
    Period,
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::StartTime => "startTime",
            Self::EndTime => "endTime",
            Self::Duration => "duration",
            Self::Period => "period",
        };
        f.write_str(s)
    }
}

/// Why a single record could not be reconciled.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum AnomalyKind {
    /// A field could not be parsed or resolved by the backfill rules.
    #[error("malformed {field} {value:?}: {reason}")]
    MalformedTimeField {
        field: TimeField,
        value: String,
        reason: String,
    },
    /// The end still precedes the start after the period-crossing correction.
    #[error("end time {end_time} precedes start time {start_time}")]
    InconsistentInterval { start_time: u32, end_time: u32 },
}

impl AnomalyKind {
    fn malformed(field: TimeField, value: &str, reason: impl Into<String>) -> Self {
        Self::MalformedTimeField {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// A per-record reconciliation fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftAnomaly {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub period: u32,
    #[serde(flatten)]
    pub kind: AnomalyKind,
}

/// Result of reconciling one game's raw shifts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub shifts: Vec<Shift>,
    pub anomalies: Vec<ShiftAnomaly>,
    /// Records dropped because a field was absent.
    pub dropped: usize,
}

impl Reconciliation {
    pub fn into_table(self) -> ShiftTable {
        ShiftTable::new(self.shifts)
    }
}

/// A raw record with every field present.
struct CompleteRecord<'a> {
    game_id: GameId,
    player_id: PlayerId,
    start_time: &'a str,
    period: u32,
    end_time: &'a str,
    duration: &'a str,
    team_id: TeamId,
    team_name: &'a str,
}

impl<'a> CompleteRecord<'a> {
    fn from_raw(raw: &'a RawShift) -> Option<Self> {
        Some(Self {
            game_id: raw.game_id?,
            player_id: raw.player_id?,
            start_time: raw.start_time.as_deref()?,
            period: raw.period?,
            end_time: raw.end_time.as_deref()?,
            duration: raw.duration.as_deref()?,
            team_id: raw.team_id?,
            team_name: raw.team_name.as_deref()?,
        })
    }
}

/// Reconciles raw shifts into shifts with game-elapsed boundaries.
///
/// Output order follows input order. An input with no usable records yields
/// an empty [`Reconciliation`].
pub fn reconcile_shifts(raw: &[RawShift], config: &ReconcileConfig) -> Reconciliation {
    let mut result = Reconciliation::default();

    for record in raw {
        let Some(record) = CompleteRecord::from_raw(record) else {
            result.dropped += 1;
            continue;
        };

        match resolve(&record, config) {
            Ok(shift) => result.shifts.push(shift),
            Err(kind) => {
                let anomaly = ShiftAnomaly {
                    game_id: record.game_id,
                    player_id: record.player_id,
                    period: record.period,
                    kind,
                };
                tracing::warn!(
                    game_id = %anomaly.game_id,
                    player_id = anomaly.player_id,
                    period = anomaly.period,
                    error = %anomaly.kind,
                    "skipping unresolvable shift"
                );
                result.anomalies.push(anomaly);
            }
        }
    }

    if result.shifts.is_empty() {
        tracing::debug!(dropped = result.dropped, "no usable shift rows");
    }
    tracing::debug!(
        shifts = result.shifts.len(),
        anomalies = result.anomalies.len(),
        dropped = result.dropped,
        "reconciled shifts"
    );

    result
}

fn parse_field(field: TimeField, value: &str) -> Result<Option<ClockTime>, AnomalyKind> {
    ClockTime::parse_optional(value)
        .map_err(|err| AnomalyKind::malformed(field, value, err.to_string()))
}

fn parse_duration(value: &str) -> Result<ClockTime, AnomalyKind> {
    parse_field(TimeField::Duration, value)?
        .ok_or_else(|| AnomalyKind::malformed(TimeField::Duration, value, "missing duration"))
}

fn resolve(record: &CompleteRecord<'_>, config: &ReconcileConfig) -> Result<Shift, AnomalyKind> {
    let period = record.period;
    if period == 0 {
        return Err(AnomalyKind::malformed(
            TimeField::Period,
            "0",
            "period must be at least 1",
        ));
    }

    let start = parse_field(TimeField::StartTime, record.start_time)?;
    let mut end = parse_field(TimeField::EndTime, record.end_time)?;

    if end.is_none() && start.is_some_and(|s| config.closes_at_boundary(period, s)) {
        end = Some(ClockTime::from_seconds(config.period_seconds));
    }

    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        (None, Some(end)) => {
            let duration = parse_duration(record.duration)?;
            let start = end.checked_sub(duration).ok_or_else(|| {
                AnomalyKind::malformed(
                    TimeField::Duration,
                    record.duration,
                    format!("backfilled start precedes the period (end {end})"),
                )
            })?;
            (start, end)
        }
        (Some(start), None) => {
            let duration = parse_duration(record.duration)?;
            (start, start.saturating_add(duration))
        }
        (None, None) => {
            return Err(AnomalyKind::malformed(
                TimeField::StartTime,
                record.start_time,
                "start and end are both missing",
            ));
        }
    };

    let offset = (period - 1)
        .checked_mul(config.period_seconds)
        .ok_or_else(|| {
            AnomalyKind::malformed(TimeField::Period, &period.to_string(), "period too large")
        })?;
    let start_time = offset.saturating_add(start.seconds());
    let mut end_time = offset.saturating_add(end.seconds());

    if end_time < start_time {
        end_time = end_time.saturating_add(config.period_seconds);
    }
    if end_time < start_time {
        return Err(AnomalyKind::InconsistentInterval {
            start_time,
            end_time,
        });
    }
    if start.seconds() >= config.period_seconds {
        return Err(AnomalyKind::malformed(
            TimeField::StartTime,
            &start.to_string(),
            "start lies outside the period",
        ));
    }

    Ok(Shift {
        game_id: record.game_id,
        player_id: record.player_id,
        start_time,
        period,
        end_time,
        duration: end_time - start_time,
        team_id: record.team_id,
        team_name: record.team_name.to_string(),
    })
}
