//! CSV summary of the files in a folder

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use polars::prelude::*;
use tempfile::NamedTempFile;

use crate::pipeline::{enumerate, TypeFilter};

pub const REPORT_FILE_NAME: &str = "file_report.csv";

/// One row of the report
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub name: String,
    pub size_kb: f64,
    pub modified: DateTime<Utc>,
}

/// Gather name, size and modification time for every regular file in `dir`.
///
/// A previous report in the same folder is left out.
pub fn collect_entries(dir: &Path) -> Result<Vec<FileEntry>> {
    let mut entries = Vec::new();
    for path in enumerate(dir, TypeFilter::RegularFiles)? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if name == REPORT_FILE_NAME {
            continue;
        }
        let metadata = fs::metadata(&path)
            .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
        let modified = metadata
            .modified()
            .with_context(|| format!("No modification time for {}", path.display()))?;
        entries.push(FileEntry {
            name,
            size_kb: round_kb(metadata.len()),
            modified: DateTime::<Utc>::from(modified),
        });
    }
    Ok(entries)
}

/// Write `file_report.csv` into `dir`.
///
/// Returns `None` without writing anything when the folder has no files.
pub fn generate_report(dir: &Path) -> Result<Option<PathBuf>> {
    let entries = collect_entries(dir)?;
    if entries.is_empty() {
        return Ok(None);
    }

    let names: Vec<String> = entries.iter().map(|e| e.name.clone()).collect();
    let sizes: Vec<f64> = entries.iter().map(|e| e.size_kb).collect();
    let modified: Vec<String> = entries
        .iter()
        .map(|e| e.modified.format("%Y-%m-%d %H:%M:%S").to_string())
        .collect();

    let mut df = df! {
        "File Name" => names,
        "Size (KB)" => sizes,
        "Modified" => modified,
    }
    .context("Failed to build report table")?;

    let report_path = dir.join(REPORT_FILE_NAME);
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create report in {}", dir.display()))?;
    CsvWriter::new(&mut file)
        .finish(&mut df)
        .with_context(|| format!("Failed to write CSV file: {}", report_path.display()))?;
    file.persist(&report_path)
        .with_context(|| format!("Failed to save {}", report_path.display()))?;

    tracing::info!(path = %report_path.display(), rows = entries.len(), "file report written");
    Ok(Some(report_path))
}

fn round_kb(bytes: u64) -> f64 {
    (bytes as f64 / 1024.0 * 100.0).round() / 100.0
}
