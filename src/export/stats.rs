use serde::Serialize;

use crate::markup::parser::HighlightedWord;

/// Aggregate statistics over tracked records.
///
/// `average_duration` is `0` when nothing is timed, unlike the structured export summary which
/// reports `None` for the same case. Both conventions are part of the output contract.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Statistics {
    /// Number of records.
    pub total_words: usize,
    /// Records with both timing bounds set.
    pub words_with_timing: usize,
    /// Sum of durations over timed records.
    pub total_duration: f64,
    /// `total_duration / words_with_timing`, or `0`.
    pub average_duration: f64,
    /// Mean confidence over records that have one.
    pub average_confidence: Option<f64>,
    /// Smallest confidence.
    pub min_confidence: Option<f64>,
    /// Largest confidence.
    pub max_confidence: Option<f64>,
}

/// Compute [`Statistics`] for `records`.
pub fn statistics(records: &[HighlightedWord]) -> Statistics {
    let durations: Vec<f64> = records.iter().filter_map(HighlightedWord::duration).collect();
    let total_duration: f64 = durations.iter().sum();
    let average_duration = if durations.is_empty() {
        0.0
    } else {
        total_duration / durations.len() as f64
    };

    let confidences: Vec<f64> = records.iter().filter_map(HighlightedWord::confidence).collect();
    let (average_confidence, min_confidence, max_confidence) = if confidences.is_empty() {
        (None, None, None)
    } else {
        let sum: f64 = confidences.iter().sum();
        (
            Some(sum / confidences.len() as f64),
            confidences.iter().copied().reduce(f64::min),
            confidences.iter().copied().reduce(f64::max),
        )
    };

    Statistics {
        total_words: records.len(),
        words_with_timing: durations.len(),
        total_duration,
        average_duration,
        average_confidence,
        min_confidence,
        max_confidence,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/stats.rs"]
mod tests;
