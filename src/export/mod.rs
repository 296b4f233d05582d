//! Timing export of tracked highlight records.
//!
//! The pure builders ([`table::to_table`], [`structured::to_structured`],
//! [`stats::statistics`]) never fail. The file writers catch their own errors, log them and
//! report a boolean, leaving it to the caller whether a failed export is fatal.

use std::io::Write as _;
use std::path::Path;

use crate::foundation::error::{ArabsubError, ArabsubResult};
use crate::markup::parser::HighlightedWord;

/// Aggregate statistics over tracked records.
pub mod stats;
/// Nested document export.
pub mod structured;
/// Row-oriented export.
pub mod table;

pub use table::TimeFormat;

/// Write the selected columns of `records` as CSV. Returns `false` on failure (logged).
pub fn export_csv_file<S: AsRef<str>>(
    path: &Path,
    records: &[HighlightedWord],
    columns: &[S],
    time_format: TimeFormat,
) -> bool {
    let rows = table::to_table(records, columns, time_format);
    match write_csv_file(path, &rows) {
        Ok(()) => {
            tracing::info!(path = %path.display(), rows = records.len(), "exported csv");
            true
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "csv export failed");
            false
        }
    }
}

/// Write the structured document for `records` as pretty JSON. Returns `false` on failure
/// (logged).
pub fn export_json_file(
    path: &Path,
    records: &[HighlightedWord],
    settings: Option<serde_json::Value>,
) -> bool {
    let doc = structured::to_structured(records, settings);
    match write_json_file(path, &doc) {
        Ok(()) => {
            tracing::info!(path = %path.display(), words = records.len(), "exported json");
            true
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "json export failed");
            false
        }
    }
}

fn create_file(path: &Path) -> ArabsubResult<std::io::BufWriter<std::fs::File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ArabsubError::export(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    let f = std::fs::File::create(path).map_err(|e| {
        ArabsubError::export(format!("failed to create '{}': {e}", path.display()))
    })?;
    Ok(std::io::BufWriter::new(f))
}

fn write_csv_file(path: &Path, rows: &[Vec<String>]) -> ArabsubResult<()> {
    let mut w = create_file(path)?;
    w.write_all(table::to_csv(rows).as_bytes())
        .map_err(|e| ArabsubError::export(format!("failed to write '{}': {e}", path.display())))?;
    w.flush()
        .map_err(|e| ArabsubError::export(format!("failed to flush '{}': {e}", path.display())))?;
    Ok(())
}

fn write_json_file<T: serde::Serialize>(path: &Path, doc: &T) -> ArabsubResult<()> {
    let mut w = create_file(path)?;
    serde_json::to_writer_pretty(&mut w, doc)
        .map_err(|e| ArabsubError::serde(format!("failed to serialize export: {e}")))?;
    w.flush()
        .map_err(|e| ArabsubError::export(format!("failed to flush '{}': {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/files.rs"]
mod tests;
