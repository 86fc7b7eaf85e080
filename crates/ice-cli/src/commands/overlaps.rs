//! Implementation of the `ice overlaps` command.
//!
//! Reconciles one game's raw shifts and reports shared teammate ice time,
//! either per overlapping shift pair or summed per teammate pair.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use ice_core::{
    OverlapError, OverlapRecord, PairTotal, ReconcileConfig, aggregate_pairs, compute_overlaps,
    reconcile_shifts,
};

use super::util::{format_seconds, load_raw_shifts};

/// Run the overlaps command.
pub fn run<W: Write>(
    out: &mut W,
    input: &Path,
    config: &ReconcileConfig,
    totals: bool,
    json: bool,
) -> Result<()> {
    let raw = load_raw_shifts(input)?;
    let reconciliation = reconcile_shifts(&raw, config);
    if !reconciliation.anomalies.is_empty() {
        tracing::info!(
            count = reconciliation.anomalies.len(),
            "some shifts could not be reconciled; run `ice reconcile` for details"
        );
    }

    let records = compute_overlaps(&reconciliation.shifts).map_err(describe_overlap_error)?;

    if totals {
        let totals = aggregate_pairs(&records);
        if json {
            serde_json::to_writer_pretty(&mut *out, &totals)
                .context("failed to serialize totals")?;
            writeln!(out)?;
        } else {
            out.write_all(format_totals(&totals).as_bytes())?;
        }
    } else if json {
        serde_json::to_writer_pretty(&mut *out, &records).context("failed to serialize overlaps")?;
        writeln!(out)?;
    } else {
        out.write_all(format_records(&records).as_bytes())?;
    }
    Ok(())
}

fn describe_overlap_error(err: OverlapError) -> anyhow::Error {
    let hint = match &err {
        OverlapError::CrossGameInput { .. } => {
            "input must contain a single game; use `ice batch` for several"
        }
        OverlapError::InvalidShift { .. } => "failed to compute overlaps",
    };
    anyhow::Error::new(err).context(hint)
}

fn format_records(records: &[OverlapRecord]) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{:<12}{:<10}{:<10}{:>8}", "game", "player", "player2", "shared");
    for r in records {
        let _ = writeln!(
            text,
            "{:<12}{:<10}{:<10}{:>8}",
            r.game_id.to_string(),
            r.player_id,
            r.player_id2,
            format_seconds(u64::from(r.seconds)),
        );
    }
    text
}

fn format_totals(totals: &[PairTotal]) -> String {
    let mut text = String::new();
    let _ = writeln!(
        text,
        "{:<12}{:<10}{:<10}{:>8}{:>8}",
        "game", "player", "player2", "shared", "shifts"
    );
    for t in totals {
        let _ = writeln!(
            text,
            "{:<12}{:<10}{:<10}{:>8}{:>8}",
            t.game_id.to_string(),
            t.player_id,
            t.player_id2,
            format_seconds(t.seconds),
            t.shifts,
        );
    }
    text
}
