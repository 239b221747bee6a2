//! Collection summary rendering.
//!
//! Writes a machine-readable JSON summary next to the collected
//! artifacts so the invoking layer (or an operator) can see what was
//! gathered, what was skipped and why, without parsing logs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde_json::json;
use walkdir::WalkDir;

use crate::models::CollectionReport;

pub const SUMMARY_FILE_NAME: &str = "collection-summary.json";

/// Render the report as pretty-printed JSON.
pub fn create_collection_summary(report: &CollectionReport) -> Result<String> {
    let hostname = hostname::get()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let summary = json!({
        "collection_id": report.collection_id,
        "hostname": hostname,
        "collector_version": env!("CARGO_PKG_VERSION"),
        "target": report.target,
        "target_kind": report.target_kind,
        "started": report.started,
        "finished": report.finished,
        "collectors": report.entries,
        "collected_count": report.collected_count(),
        "total_bytes_collected": directory_size(&report.output_dir),
    });

    serde_json::to_string_pretty(&summary).context("Failed to serialize collection summary")
}

/// Write the summary into the output directory and return its path.
pub fn write_collection_summary(report: &CollectionReport) -> Result<PathBuf> {
    let summary = create_collection_summary(report)?;
    let path = report.output_dir.join(SUMMARY_FILE_NAME);
    fs::write(&path, summary)
        .context(format!("Failed to write summary to {}", path.display()))?;
    Ok(path)
}

fn directory_size(dir: &Path) -> u64 {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.metadata().ok())
        .filter(|metadata| metadata.is_file())
        .map(|metadata| metadata.len())
        .sum()
}
