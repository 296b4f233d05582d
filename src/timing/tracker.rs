use std::collections::HashSet;

use crate::markup::parser::{HighlightedWord, WordId};
use crate::timing::distribute::distribute_timing;

/// Run-scoped owner of every highlight record seen during one pipeline run.
///
/// Membership is by [`WordId`], not by value: two records with identical fields from different
/// parse calls are both retained. Call [`HighlightTracker::clear`] between independent runs.
#[derive(Debug, Default, Clone)]
pub struct HighlightTracker {
    records: Vec<HighlightedWord>,
    seen: HashSet<WordId>,
}

impl HighlightTracker {
    /// Empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `word`. Returns `false` (and drops it) when a record with the same
    /// identity is already tracked.
    pub fn add_word_timing(&mut self, word: HighlightedWord) -> bool {
        if !self.seen.insert(word.id()) {
            return false;
        }
        self.records.push(word);
        true
    }

    /// Time `highlighted` against the segment and hand every record to the tracker.
    pub fn distribute_timing<S: AsRef<str>>(
        &mut self,
        words: &[S],
        positions: &[usize],
        segment_start: f64,
        segment_end: f64,
        mut highlighted: Vec<HighlightedWord>,
    ) {
        distribute_timing(
            words,
            positions,
            segment_start,
            segment_end,
            &mut highlighted,
        );
        for hw in highlighted {
            self.add_word_timing(hw);
        }
    }

    /// Tracked records in insertion order.
    pub fn records(&self) -> &[HighlightedWord] {
        &self.records
    }

    /// Look up a tracked record by identity.
    pub fn get(&self, id: WordId) -> Option<&HighlightedWord> {
        if !self.seen.contains(&id) {
            return None;
        }
        self.records.iter().find(|w| w.id() == id)
    }

    /// Number of tracked records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
        self.seen.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/tracker.rs"]
mod tests;
