
use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::process::Command;

/// Single-shot worker mode the indexer is driven in; shared with the
/// generated verification script.
pub const WORKER_MODE: &str = "compdb";

/// Run the indexer against a one-entry compilation database and report
/// whether its combined output matches the failure pattern.
///
/// The exit status is deliberately ignored: the indexer may exit nonzero
/// for unrelated reasons, or exit zero while still printing a diagnosable
/// defect. Only the pattern match decides reproduction.
pub fn reproduces(indexer: &Path, compdb_path: &Path, pattern: &Regex) -> Result<bool> {
    let output = Command::new(indexer)
        .arg(format!("--compdb-path={}", compdb_path.display()))
        .arg(format!("--worker-mode={WORKER_MODE}"))
        .output()
        .with_context(|| format!("Failed to run indexer {}", indexer.display()))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if pattern.is_match(&stdout) {
        return Ok(true);
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Ok(pattern.is_match(&stderr))
}
