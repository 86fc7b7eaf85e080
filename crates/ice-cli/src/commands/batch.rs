//! Implementation of the `ice batch` command.

use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use ice_core::{
    GameId, GameReport, OverlapRecord, PairTotal, ReconcileConfig, ShiftAnomaly, aggregate_pairs,
    process_games,
};
use serde::Serialize;

use super::util::load_raw_shifts;

/// One output line of the batch command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLine {
    pub game_id: GameId,
    pub shifts: usize,
    pub dropped: usize,
    pub anomalies: Vec<ShiftAnomaly>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlaps: Option<Vec<OverlapRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<Vec<PairTotal>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GameLine {
    fn from_report(report: GameReport, totals: bool) -> Self {
        let GameReport {
            game_id,
            reconciliation,
            overlaps,
        } = report;
        let mut line = Self {
            game_id,
            shifts: reconciliation.shifts.len(),
            dropped: reconciliation.dropped,
            anomalies: reconciliation.anomalies,
            overlaps: None,
            totals: None,
            error: None,
        };
        match overlaps {
            Ok(records) if totals => line.totals = Some(aggregate_pairs(&records)),
            Ok(records) => line.overlaps = Some(records),
            Err(e) => line.error = Some(e.to_string()),
        }
        line
    }
}

/// Run the batch command.
pub fn run<W: Write>(
    out: W,
    inputs: &[PathBuf],
    config: &ReconcileConfig,
    totals: bool,
) -> Result<()> {
    let mut raw = Vec::new();
    for input in inputs {
        raw.extend(load_raw_shifts(input)?);
    }

    let reports = process_games(raw, config);
    tracing::info!(games = reports.len(), "processed games");

    let mut out = BufWriter::new(out);
    for report in reports {
        let line = GameLine::from_report(report, totals);
        serde_json::to_writer(&mut out, &line)
            .with_context(|| format!("failed to serialize game {}", line.game_id))?;
        writeln!(out)?;
    }
    out.flush().context("failed to flush output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_input(dir: &tempfile::TempDir, name: &str, json: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, json).unwrap();
        path
    }

    fn lines(out: &[u8]) -> Vec<serde_json::Value> {
        String::from_utf8(out.to_vec())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_one_line_per_game_across_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_input(
            &dir,
            "a.json",
            r#"[
                {"gameId":2013020002,"playerId":1,"startTime":"00:00","period":1,"endTime":"01:00","duration":"01:00","teamId":15,"teamName":"A"},
                {"gameId":2013020002,"playerId":2,"startTime":"00:30","period":1,"endTime":"01:30","duration":"01:00","teamId":15,"teamName":"A"}
            ]"#,
        );
        let b = write_input(
            &dir,
            "b.json",
            r#"{"data":[
                {"gameId":2013020001,"playerId":3,"startTime":"00:00","period":1,"endTime":"00:40","duration":"00:40","teamId":16,"teamName":"B"},
                {"gameId":2013020001,"playerId":4,"startTime":"00:20","period":1,"endTime":"oops","duration":"00:20","teamId":16,"teamName":"B"}
            ]}"#,
        );

        let mut out = Vec::new();
        run(&mut out, &[a, b], &ReconcileConfig::default(), false).unwrap();
        let lines = lines(&out);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["gameId"], 2_013_020_001_u64);
        assert_eq!(lines[0]["shifts"], 1);
        assert_eq!(lines[0]["anomalies"].as_array().unwrap().len(), 1);
        assert_eq!(lines[0]["overlaps"], serde_json::json!([]));

        assert_eq!(lines[1]["gameId"], 2_013_020_002_u64);
        assert_eq!(lines[1]["overlaps"][0]["seconds"], 30);
        assert!(lines[1].get("totals").is_none());
        assert!(lines[1].get("error").is_none());
    }

    #[test]
    fn test_totals_replace_records() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_input(
            &dir,
            "a.json",
            r#"[
                {"gameId":2013020002,"playerId":1,"startTime":"00:00","period":1,"endTime":"01:00","duration":"01:00","teamId":15,"teamName":"A"},
                {"gameId":2013020002,"playerId":2,"startTime":"00:30","period":1,"endTime":"01:30","duration":"01:00","teamId":15,"teamName":"A"}
            ]"#,
        );

        let mut out = Vec::new();
        run(&mut out, &[a], &ReconcileConfig::default(), true).unwrap();
        let lines = lines(&out);

        assert!(lines[0].get("overlaps").is_none());
        assert_eq!(lines[0]["totals"][0]["seconds"], 30);
        assert_eq!(lines[0]["totals"][0]["shifts"], 1);
    }
}
