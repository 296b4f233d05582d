use std::collections::BTreeSet;

use crate::markup::parser::HighlightedWord;

/// Confidence attached to equal-partition timing. No forced alignment backs these values.
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Equal partition of a segment's time span across its clean words.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentClock {
    /// Absolute segment start in seconds.
    pub start: f64,
    /// Absolute segment end in seconds.
    pub end: f64,
    /// Number of clean words in the segment.
    pub word_count: usize,
}

impl SegmentClock {
    /// Clock for `word_count` words over `[start, end]`.
    pub fn new(start: f64, end: f64, word_count: usize) -> Self {
        Self {
            start,
            end,
            word_count,
        }
    }

    /// Duration of one word slot, `0` when there are no words.
    pub fn word_duration(&self) -> f64 {
        if self.word_count == 0 {
            return 0.0;
        }
        (self.end - self.start) / self.word_count as f64
    }

    /// Absolute `[start, end]` of word `index`.
    pub fn word_window(&self, index: usize) -> (f64, f64) {
        let d = self.word_duration();
        let start = self.start + index as f64 * d;
        (start, start + d)
    }

    /// Words considered spoken at `t`. Both window bounds are inclusive, so on a boundary the two
    /// adjacent words are active together.
    pub fn active_at(&self, t: f64) -> BTreeSet<usize> {
        (0..self.word_count)
            .filter(|&i| {
                let (s, e) = self.word_window(i);
                s <= t && t <= e
            })
            .collect()
    }
}

fn normalized(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Position of each highlighted word in the clean word list.
///
/// A word resolves to its first case-insensitive exact match, so repeated words all resolve to
/// the same index. Highlights absent from `words` are dropped.
pub fn find_highlight_positions<S: AsRef<str>>(
    words: &[S],
    highlighted: &[HighlightedWord],
) -> Vec<usize> {
    let normalized_words: Vec<String> = words.iter().map(|w| normalized(w.as_ref())).collect();
    highlighted
        .iter()
        .filter_map(|hw| {
            let needle = normalized(hw.word());
            normalized_words.iter().position(|w| *w == needle)
        })
        .collect()
}

/// Attach absolute timing to `highlighted` in place.
///
/// Walks word indices in order; each index listed in `positions` consumes the next untimed record
/// in array order. Records left over once positions run out stay untimed. Empty `words` or
/// `positions` is a no-op.
pub fn distribute_timing<S: AsRef<str>>(
    words: &[S],
    positions: &[usize],
    segment_start: f64,
    segment_end: f64,
    highlighted: &mut [HighlightedWord],
) {
    if words.is_empty() || positions.is_empty() {
        return;
    }

    let clock = SegmentClock::new(segment_start, segment_end, words.len());
    let mut next = highlighted.iter_mut();
    for index in 0..words.len() {
        if !positions.contains(&index) {
            continue;
        }
        let Some(hw) = next.next() else {
            break;
        };
        let (start, end) = clock.word_window(index);
        hw.attach_timing(start, end, DEFAULT_CONFIDENCE);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/distribute.rs"]
mod tests;
