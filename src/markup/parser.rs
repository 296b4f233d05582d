use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

use regex::Regex;
use serde::Serialize;

/// Highlight patterns in declaration order. Matches of an earlier pattern are numbered before
/// matches of a later one.
static HIGHLIGHT_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)\[\[y\]\](.*?)\[\[/y\]\]").expect("double-bracket pattern is valid"),
        Regex::new(r"(?i)<y>(.*?)</y>").expect("angle-bracket pattern is valid"),
        Regex::new(r"(?i)\{y\}(.*?)\{/y\}").expect("curly-brace pattern is valid"),
    ]
});

/// Any single opening or closing delimiter of the three syntaxes.
static DELIMITER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[\[/?y\]\]|</?y>|\{/?y\}").expect("delimiter pattern is valid")
});

const SUPPORTED_PATTERNS: [&str; 3] = ["[[y]]word[[/y]]", "<y>word</y>", "{y}word{/y}"];

static NEXT_WORD_ID: AtomicU64 = AtomicU64::new(1);

/// Identity handle of one parsed highlight record.
///
/// Every record produced by [`MarkupParser::parse_text`] gets a fresh handle, so two records with
/// equal field values are still distinct. Clones share the handle of their source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordId(u64);

impl WordId {
    fn next() -> Self {
        Self(NEXT_WORD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// One highlighted ("yellow") word extracted from markup.
///
/// Core fields are fixed at parse time. Timing is attached later, once, through
/// [`HighlightedWord::attach_timing`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HighlightedWord {
    #[serde(skip)]
    id: WordId,
    word: String,
    original_markup: String,
    start_time: Option<f64>,
    end_time: Option<f64>,
    sequence: u32,
    source_line_index: Option<usize>,
    confidence: Option<f64>,
}

impl HighlightedWord {
    /// Build an untimed record. Mostly useful for tests and for callers assembling records by hand.
    pub fn new(word: impl Into<String>, original_markup: impl Into<String>, sequence: u32) -> Self {
        Self {
            id: WordId::next(),
            word: word.into(),
            original_markup: original_markup.into(),
            start_time: None,
            end_time: None,
            sequence,
            source_line_index: None,
            confidence: None,
        }
    }

    /// Set the 0-based line of the source text the tag was found on.
    pub fn with_source_line(mut self, line: usize) -> Self {
        self.source_line_index = Some(line);
        self
    }

    /// Identity handle.
    pub fn id(&self) -> WordId {
        self.id
    }

    /// Highlighted text with surrounding whitespace trimmed.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// The full tag span as it appeared in the input.
    pub fn original_markup(&self) -> &str {
        &self.original_markup
    }

    /// 1-based assignment order within one parse call.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// 0-based line index in the parsed text where the tag starts.
    pub fn source_line_index(&self) -> Option<usize> {
        self.source_line_index
    }

    /// Absolute start time in seconds, once timed.
    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    /// Absolute end time in seconds, once timed.
    pub fn end_time(&self) -> Option<f64> {
        self.end_time
    }

    /// Timing confidence in `[0, 1]`, once timed.
    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    /// `end_time - start_time` when both are set.
    pub fn duration(&self) -> Option<f64> {
        match (self.start_time, self.end_time) {
            (Some(s), Some(e)) => Some(e - s),
            _ => None,
        }
    }

    /// Whether both timing bounds are set.
    pub fn is_timed(&self) -> bool {
        self.start_time.is_some() && self.end_time.is_some()
    }

    /// Attach absolute timing. `end` is raised to `start` if it is smaller and `confidence` is
    /// clamped to `[0, 1]`.
    pub fn attach_timing(&mut self, start: f64, end: f64, confidence: f64) {
        self.start_time = Some(start);
        self.end_time = Some(end.max(start));
        self.confidence = Some(confidence.clamp(0.0, 1.0));
    }
}

/// Extracts highlighted words from inline markup and produces clean text.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupParser;

impl MarkupParser {
    /// Create a parser.
    pub fn new() -> Self {
        Self
    }

    /// Extract all highlighted words in pattern declaration order.
    ///
    /// Unterminated or empty tags produce nothing. `sequence` restarts at 1 for each call.
    pub fn parse_text(&self, text: &str) -> Vec<HighlightedWord> {
        let mut out = Vec::new();
        let mut sequence = 0u32;
        for pattern in HIGHLIGHT_PATTERNS.iter() {
            for caps in pattern.captures_iter(text) {
                let (Some(full), Some(inner)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                let word = inner.as_str().trim();
                if word.is_empty() {
                    continue;
                }
                sequence += 1;
                let line = text[..full.start()].matches('\n').count();
                out.push(HighlightedWord::new(word, full.as_str(), sequence).with_source_line(line));
            }
        }
        tracing::debug!(count = out.len(), "parsed highlight markup");
        out
    }

    /// Strip every tag delimiter of all three syntaxes, keeping the inner words.
    ///
    /// Runs until no delimiter remains, so the result is a fixed point.
    pub fn remove_markup(&self, text: &str) -> String {
        let mut current = text.to_owned();
        while DELIMITER.is_match(&current) {
            current = DELIMITER.replace_all(&current, "").into_owned();
        }
        current
    }

    /// Literal tag templates, for display.
    pub fn supported_patterns(&self) -> &'static [&'static str] {
        &SUPPORTED_PATTERNS
    }
}

#[cfg(test)]
#[path = "../../tests/unit/markup/parser.rs"]
mod tests;
