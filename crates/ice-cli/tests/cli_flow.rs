//! End-to-end tests for the `ice` binary.
//!
//! Each test runs the real binary against shift chart files in a temp
//! directory, with HOME pointed at the temp directory so no user config leaks
//! in.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn ice_binary() -> String {
    env!("CARGO_BIN_EXE_ice").to_string()
}

fn ice(home: &Path, args: &[&str]) -> Output {
    Command::new(ice_binary())
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .args(args)
        .output()
        .expect("failed to run ice")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "ice should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

const SECOND_PERIOD_GAME: &str = r#"{"data":[
    {"gameId":2013020001,"playerId":8471214,"startTime":"00:00","period":2,"endTime":"00:45","duration":"00:45","teamId":15,"teamName":"Washington Capitals"},
    {"gameId":2013020001,"playerId":8474590,"startTime":"00:30","period":2,"endTime":"01:20","duration":"00:50","teamId":15,"teamName":"Washington Capitals"},
    {"gameId":2013020001,"playerId":8475200,"startTime":"00:00","period":2,"endTime":"01:00","duration":"01:00","teamId":16,"teamName":"Chicago Blackhawks"},
    {"gameId":2013020001,"playerId":8471215,"startTime":"18:30","period":2,"endTime":"","duration":"00:40","teamId":15,"teamName":"Washington Capitals"}
]}"#;

#[test]
fn test_reconcile_json_applies_period_offset() {
    let temp = TempDir::new().unwrap();
    let input = write_file(temp.path(), "game.json", SECOND_PERIOD_GAME);

    let output = ice(temp.path(), &["reconcile", "--json", input.to_str().unwrap()]);
    assert_success(&output);

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = value["table"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(value["table"]["columns"][0], "gameId");

    let first = &rows[0];
    assert_eq!(first["startTime"], 1200);
    assert_eq!(first["endTime"], 1245);
    assert_eq!(first["duration"], 45);

    // Missing end late in the period closes at the boundary.
    let late = &rows[3];
    assert_eq!(late["startTime"], 2310);
    assert_eq!(late["endTime"], 2400);
    assert_eq!(late["duration"], 90);
    assert!(value["anomalies"].as_array().unwrap().is_empty());
}

#[test]
fn test_overlaps_only_pairs_teammates() {
    let temp = TempDir::new().unwrap();
    let input = write_file(temp.path(), "game.json", SECOND_PERIOD_GAME);

    let output = ice(temp.path(), &["overlaps", "--json", input.to_str().unwrap()]);
    assert_success(&output);

    let records: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["playerId"], 8_471_214_u64);
    assert_eq!(records[0]["playerId2"], 8_474_590_u64);
    assert_eq!(records[0]["seconds"], 15);
}

#[test]
fn test_config_file_restricts_end_fallback() {
    let temp = TempDir::new().unwrap();
    let input = write_file(temp.path(), "game.json", SECOND_PERIOD_GAME);
    let config = write_file(
        temp.path(),
        "config.toml",
        "end_fallback = \"final_regulation\"\n",
    );

    let late_shift = |args: &[&str]| {
        let output = ice(temp.path(), args);
        assert_success(&output);
        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert!(value["anomalies"].as_array().unwrap().is_empty());
        let late = &value["table"]["rows"][3];
        (
            late["startTime"].as_u64().unwrap(),
            late["endTime"].as_u64().unwrap(),
        )
    };

    // Default: the open shift closes at the end of period 2.
    let input = input.to_str().unwrap();
    assert_eq!(late_shift(&["reconcile", "--json", input]), (2310, 2400));

    // Period 2 no longer qualifies, so the end is backfilled from the
    // 00:40 duration instead.
    assert_eq!(
        late_shift(&[
            "--config",
            config.to_str().unwrap(),
            "reconcile",
            "--json",
            input,
        ]),
        (2310, 2350)
    );
}

#[test]
fn test_overlaps_rejects_several_games() {
    let temp = TempDir::new().unwrap();
    let input = write_file(
        temp.path(),
        "games.json",
        r#"[
            {"gameId":2013020001,"playerId":1,"startTime":"00:00","period":1,"endTime":"00:40","duration":"00:40","teamId":15,"teamName":"A"},
            {"gameId":2013020002,"playerId":2,"startTime":"00:00","period":1,"endTime":"00:40","duration":"00:40","teamId":15,"teamName":"A"}
        ]"#,
    );

    let output = ice(temp.path(), &["overlaps", input.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ice batch"), "unexpected stderr: {stderr}");
}

#[test]
fn test_batch_writes_one_line_per_game() {
    let temp = TempDir::new().unwrap();
    let first = write_file(temp.path(), "first.json", SECOND_PERIOD_GAME);
    let second = write_file(
        temp.path(),
        "second.json",
        r#"[
            {"gameId":2013020002,"playerId":1,"startTime":"05:00","period":1,"endTime":"06:00","duration":"01:00","teamId":15,"teamName":"A"},
            {"gameId":2013020002,"playerId":2,"startTime":"05:20","period":1,"endTime":"06:40","duration":"01:20","teamId":15,"teamName":"A"}
        ]"#,
    );

    let output = ice(
        temp.path(),
        &[
            "batch",
            "--totals",
            first.to_str().unwrap(),
            second.to_str().unwrap(),
        ],
    );
    assert_success(&output);

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["gameId"], 2_013_020_001_u64);
    assert_eq!(lines[0]["shifts"], 4);
    assert_eq!(lines[1]["gameId"], 2_013_020_002_u64);
    assert_eq!(lines[1]["totals"][0]["seconds"], 40);
}

#[test]
fn test_game_ids_with_explicit_count() {
    let temp = TempDir::new().unwrap();

    let output = ice(temp.path(), &["game-ids", "2015", "--count", "2"]);
    assert_success(&output);

    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "2015020001\n2015020002\n"
    );
}

#[test]
fn test_no_subcommand_prints_help() {
    let temp = TempDir::new().unwrap();

    let output = ice(temp.path(), &[]);
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage"));
}

#[test]
fn test_game_ids_rejects_out_of_range_season() {
    let temp = TempDir::new().unwrap();

    for season in ["2009", "4294967295"] {
        let output = ice(temp.path(), &["game-ids", season]);
        assert!(!output.status.success(), "season {season} should fail");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("cannot enumerate games"), "{stderr}");
        assert!(!stderr.contains("panicked"), "{stderr}");
        assert!(output.stdout.is_empty());
    }
}
