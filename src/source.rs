//! Timed caption segments: SRT files, plain-text files and free text split by sentence.

use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{ArabsubError, ArabsubResult};

/// Duration assigned to free text when no video duration is known.
pub const DEFAULT_TEXT_DURATION_SECS: f64 = 10.0;

/// One timed caption block. Text may still carry highlight markup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start in seconds.
    pub start: f64,
    /// End in seconds.
    pub end: f64,
    /// Caption text, lines joined by `\n`.
    pub text: String,
}

impl Segment {
    /// Build a segment.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Half-open containment used for frame selection.
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }
}

/// Parse SRT subtitle content. Blocks without a valid timing line are skipped.
pub fn parse_srt(content: &str) -> Vec<Segment> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let normalized = normalized.trim_start_matches('\u{feff}');

    let mut segments = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    for line in normalized.lines().chain(std::iter::once("")) {
        if line.trim().is_empty() {
            if let Some(seg) = parse_block(&block) {
                segments.push(seg);
            } else if !block.is_empty() {
                tracing::warn!(first_line = block[0], "skipping malformed srt block");
            }
            block.clear();
        } else {
            block.push(line);
        }
    }
    segments
}

fn parse_block(lines: &[&str]) -> Option<Segment> {
    let timing_at = lines.iter().position(|l| l.contains("-->"))?;
    let (start, end) = parse_srt_timestamp(lines[timing_at])?;
    let text = lines[timing_at + 1..].join("\n").trim().to_owned();
    Some(Segment { start, end, text })
}

fn parse_srt_timestamp(line: &str) -> Option<(f64, f64)> {
    let (a, b) = line.split_once("-->")?;
    // Trailing SRT position hints ("X1:.. Y1:..") follow the end time.
    let b = b.split_whitespace().next()?;
    Some((parse_srt_time(a)?, parse_srt_time(b)?))
}

/// `HH:MM:SS,mmm` (a `.` separator is tolerated) to seconds.
pub fn parse_srt_time(time_str: &str) -> Option<f64> {
    let (hms, millis) = time_str.trim().split_once([',', '.'])?;
    let mut parts = hms.split(':');
    let hours: u64 = parts.next()?.trim().parse().ok()?;
    let minutes: u64 = parts.next()?.trim().parse().ok()?;
    let seconds: u64 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let millis: u64 = millis.trim().parse().ok()?;
    let whole = hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)?;
    Some(whole as f64 + millis as f64 / 1000.0)
}

/// Load captions from a file: `.srt` is parsed as SRT, anything else becomes one segment
/// spanning `[0, DEFAULT_TEXT_DURATION_SECS)`.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_captions(path: &Path) -> ArabsubResult<Vec<Segment>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read captions '{}'", path.display()))?;
    let is_srt = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("srt"));

    let segments = if is_srt {
        parse_srt(&content)
    } else {
        vec![Segment::new(
            0.0,
            DEFAULT_TEXT_DURATION_SECS,
            content.trim(),
        )]
    };
    tracing::info!(segments = segments.len(), "loaded captions");
    Ok(segments)
}

/// Split free text on `.` into sentences and partition `duration` equally across them.
pub fn text_to_segments(text: &str, duration: f64) -> Vec<Segment> {
    let mut sentences: Vec<&str> = text
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if sentences.is_empty() {
        sentences.push(text.trim());
    }

    let each = duration / sentences.len() as f64;
    sentences
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let start = i as f64 * each;
            Segment::new(start, start + each, s)
        })
        .collect()
}

/// Where segments come from for one run.
#[derive(Clone, Debug)]
pub enum SegmentSource<'a> {
    /// Caption file on disk.
    Captions(&'a Path),
    /// Free text, split by sentence across `duration` seconds.
    Text {
        /// Text possibly containing several sentences.
        text: &'a str,
        /// Total duration shared by the sentences, in seconds.
        duration: f64,
    },
}

/// Resolve a source into segments. `None` is a validation error.
pub fn resolve_segments(source: Option<SegmentSource<'_>>) -> ArabsubResult<Vec<Segment>> {
    match source {
        Some(SegmentSource::Captions(path)) => load_captions(path),
        Some(SegmentSource::Text { text, duration }) => Ok(text_to_segments(text, duration)),
        None => Err(ArabsubError::validation(
            "no segment source: provide captions or text",
        )),
    }
}

#[cfg(test)]
#[path = "../tests/unit/source.rs"]
mod tests;
