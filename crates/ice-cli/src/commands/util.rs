//! Shared utilities for CLI commands.

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use ice_core::RawShift;

/// Reads raw shifts from a file, or from stdin when the path is `-`.
pub fn load_raw_shifts(path: &Path) -> Result<Vec<RawShift>> {
    let json = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read shifts from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };

    let shifts = ice_core::parse_raw_shifts(&json)
        .with_context(|| format!("failed to parse shift chart {}", path.display()))?;
    tracing::debug!(path = %path.display(), records = shifts.len(), "loaded raw shifts");
    Ok(shifts)
}

/// Formats seconds as `m:ss`.
pub fn format_seconds(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
