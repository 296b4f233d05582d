use serde::Serialize;

use crate::markup::parser::HighlightedWord;

/// Run-level aggregates embedded in the structured export.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExportSummary {
    /// Number of records exported.
    pub total_words: usize,
    /// RFC 3339 local time of the export.
    pub export_timestamp: String,
    /// Mean duration over fully timed records; `None` when no record is timed.
    pub average_duration: Option<f64>,
}

/// Full export document: every record, a summary, and optionally the settings used.
#[derive(Clone, Debug, Serialize)]
pub struct StructuredExport<'a> {
    /// Per-word records with all fields.
    pub yellow_words: &'a [HighlightedWord],
    /// Aggregates.
    pub summary: ExportSummary,
    /// Settings the run was performed with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_settings: Option<serde_json::Value>,
}

/// Build the structured export stamped with the current local time.
pub fn to_structured(
    records: &[HighlightedWord],
    settings: Option<serde_json::Value>,
) -> StructuredExport<'_> {
    to_structured_at(records, settings, chrono::Local::now().to_rfc3339())
}

/// Build the structured export with an explicit timestamp.
pub fn to_structured_at(
    records: &[HighlightedWord],
    settings: Option<serde_json::Value>,
    export_timestamp: String,
) -> StructuredExport<'_> {
    let durations: Vec<f64> = records.iter().filter_map(HighlightedWord::duration).collect();
    let average_duration = if durations.is_empty() {
        None
    } else {
        Some(durations.iter().sum::<f64>() / durations.len() as f64)
    };
    StructuredExport {
        yellow_words: records,
        summary: ExportSummary {
            total_words: records.len(),
            export_timestamp,
            average_duration,
        },
        export_settings: settings,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/structured.rs"]
mod tests;
