use serde::{Deserialize, Serialize};

use crate::markup::parser::HighlightedWord;

/// Columns accepted by [`to_table`], in their default order.
pub const ALLOWED_COLUMNS: [&str; 6] = [
    "sequence",
    "word",
    "start_time",
    "end_time",
    "source_line_index",
    "confidence",
];

/// How `start_time`/`end_time` cells are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    /// Seconds with three decimals, e.g. `5.000`.
    #[default]
    Seconds,
    /// `HH:MM:SS.mmm`.
    Timecode,
}

impl TimeFormat {
    /// Format `secs` in this mode.
    pub fn format(self, secs: f64) -> String {
        match self {
            Self::Seconds => format!("{secs:.3}"),
            Self::Timecode => format_timecode(secs),
        }
    }
}

/// `HH:MM:SS.mmm`, rounding to the nearest millisecond. Negative inputs clamp to zero.
pub fn format_timecode(secs: f64) -> String {
    let total_ms = (secs.max(0.0) * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_sec = total_ms / 1000;
    let s = total_sec % 60;
    let total_min = total_sec / 60;
    let m = total_min % 60;
    let h = total_min / 60;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

/// Header row of `columns` followed by one row per record, cells in the same order.
///
/// Unset fields and column names outside [`ALLOWED_COLUMNS`] render as empty cells.
pub fn to_table<S: AsRef<str>>(
    records: &[HighlightedWord],
    columns: &[S],
    time_format: TimeFormat,
) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(columns.iter().map(|c| c.as_ref().to_owned()).collect());
    for r in records {
        rows.push(
            columns
                .iter()
                .map(|c| cell(r, c.as_ref(), time_format))
                .collect(),
        );
    }
    rows
}

fn cell(r: &HighlightedWord, column: &str, time_format: TimeFormat) -> String {
    match column {
        "sequence" => r.sequence().to_string(),
        "word" => r.word().to_owned(),
        "start_time" => r.start_time().map(|t| time_format.format(t)).unwrap_or_default(),
        "end_time" => r.end_time().map(|t| time_format.format(t)).unwrap_or_default(),
        "source_line_index" => r
            .source_line_index()
            .map(|i| i.to_string())
            .unwrap_or_default(),
        "confidence" => r.confidence().map(|c| c.to_string()).unwrap_or_default(),
        _ => String::new(),
    }
}

/// RFC 4180 CSV text with `\n` line endings.
pub fn to_csv(rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in rows {
        let line: Vec<String> = row.iter().map(|f| escape_csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/table.rs"]
mod tests;
