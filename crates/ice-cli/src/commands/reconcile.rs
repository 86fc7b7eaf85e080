//! Implementation of the `ice reconcile` command.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use ice_core::{ReconcileConfig, Reconciliation, ShiftAnomaly, ShiftTable, reconcile_shifts};
use serde::Serialize;

use super::util::{format_seconds, load_raw_shifts};

/// JSON shape of a reconciled game.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileOutput {
    pub generated_at: DateTime<Utc>,
    pub table: ShiftTable,
    pub anomalies: Vec<ShiftAnomaly>,
    pub dropped: usize,
}

impl ReconcileOutput {
    pub fn new(reconciliation: Reconciliation, generated_at: DateTime<Utc>) -> Self {
        let Reconciliation {
            shifts,
            anomalies,
            dropped,
        } = reconciliation;
        Self {
            generated_at,
            table: ShiftTable::new(shifts),
            anomalies,
            dropped,
        }
    }
}

/// Run the reconcile command.
pub fn run<W: Write>(out: &mut W, input: &Path, config: &ReconcileConfig, json: bool) -> Result<()> {
    let raw = load_raw_shifts(input)?;
    let output = ReconcileOutput::new(reconcile_shifts(&raw, config), Utc::now());

    if json {
        serde_json::to_writer_pretty(&mut *out, &output).context("failed to serialize shifts")?;
        writeln!(out)?;
    } else {
        out.write_all(format_text(&output).as_bytes())?;
    }
    Ok(())
}

/// Formats reconciled shifts as a human-readable table.
pub fn format_text(output: &ReconcileOutput) -> String {
    let mut text = String::new();

    let _ = writeln!(
        text,
        "{:<12}{:<10}{:<8}{:>8}{:>8}{:>10}  team",
        "game", "player", "period", "start", "end", "duration"
    );
    for shift in &output.table.rows {
        let _ = writeln!(
            text,
            "{:<12}{:<10}{:<8}{:>8}{:>8}{:>10}  {}",
            shift.game_id.to_string(),
            shift.player_id,
            shift.period,
            format_seconds(u64::from(shift.start_time)),
            format_seconds(u64::from(shift.end_time)),
            format_seconds(u64::from(shift.duration)),
            shift.team_name,
        );
    }

    let _ = writeln!(
        text,
        "\n{} shifts, {} anomalies, {} dropped",
        output.table.len(),
        output.anomalies.len(),
        output.dropped
    );
    for anomaly in &output.anomalies {
        let _ = writeln!(
            text,
            "  player {} period {}: {}",
            anomaly.player_id, anomaly.period, anomaly.kind
        );
    }

    text
}
