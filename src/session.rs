use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

use crate::config::RunConfig;
use crate::encode::ffmpeg::VideoInfo;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::export::stats::{Statistics, statistics};
use crate::export::{export_csv_file, export_json_file};
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{ArabsubError, ArabsubResult};
use crate::layout::wrap::{LineLayout, wrap_text};
use crate::markup::parser::{HighlightedWord, MarkupParser, WordId};
use crate::render::compositor::render_overlay;
use crate::render::frame::FrameRGBA;
use crate::source::Segment;
use crate::text::shaper::TextShaper;
use crate::timing::distribute::{SegmentClock, find_highlight_positions};
use crate::timing::tracker::HighlightTracker;

/// One caption segment after markup extraction, timing and wrapping.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PreparedSegment {
    /// Start in seconds.
    pub start: f64,
    /// End in seconds.
    pub end: f64,
    /// Text with all highlight delimiters removed.
    pub clean_text: String,
    /// Whitespace-split words of `clean_text`.
    pub words: Vec<String>,
    /// Flat word indices drawn in the highlight color. Empty in track-only mode.
    pub highlighted: BTreeSet<usize>,
    /// Wrapped lines of `clean_text`.
    pub layout: LineLayout,
    /// Tracker handles of this segment's highlight records.
    #[serde(skip)]
    pub highlight_ids: Vec<WordId>,
}

impl PreparedSegment {
    /// Flat indices of the words spoken at `t`.
    pub fn active_at(&self, t: f64) -> BTreeSet<usize> {
        SegmentClock::new(self.start, self.end, self.words.len()).active_at(t)
    }

    /// Half-open containment used for frame selection.
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }
}

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    /// Total frames pushed to the sink.
    pub frames_total: u64,
    /// Frames actually rasterized.
    pub frames_rendered: u64,
    /// Frames reused because segment and active words matched the previous frame.
    pub frames_elided: u64,
    /// Frames with no segment on screen.
    pub frames_empty: u64,
}

/// Processing summary of one run.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    /// Segments prepared.
    pub segments_processed: usize,
    /// Highlight records tracked.
    pub highlighted_words_found: usize,
    /// Timing statistics over the tracked records.
    pub statistics: Statistics,
    /// Configuration the run used.
    pub settings: serde_json::Value,
    /// Base video metadata, when a video was probed.
    pub video_info: Option<VideoInfo>,
    /// RFC 3339 local time the summary was built.
    pub processing_timestamp: String,
}

/// Run-scoped subtitle pipeline.
///
/// Owns the markup parser and the highlight tracker for one run, so independent runs never share
/// tracked records. Segments are prepared once, then any instant can be rendered.
#[derive(Debug)]
pub struct SubtitleRun {
    cfg: RunConfig,
    parser: MarkupParser,
    tracker: HighlightTracker,
    segments: Vec<PreparedSegment>,
    video: Option<VideoInfo>,
}

impl SubtitleRun {
    /// Create a run with a validated configuration.
    pub fn new(cfg: RunConfig) -> ArabsubResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            parser: MarkupParser::new(),
            tracker: HighlightTracker::new(),
            segments: Vec::new(),
            video: None,
        })
    }

    /// Run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.cfg
    }

    /// Tracked highlight records across all prepared segments.
    pub fn tracker(&self) -> &HighlightTracker {
        &self.tracker
    }

    /// Tracked records in insertion order.
    pub fn records(&self) -> &[HighlightedWord] {
        self.tracker.records()
    }

    /// Prepared segments in input order.
    pub fn segments(&self) -> &[PreparedSegment] {
        &self.segments
    }

    /// Attach base video metadata for the summary.
    pub fn set_video_info(&mut self, info: VideoInfo) {
        self.video = Some(info);
    }

    /// Parse, time and wrap `segments` for a `canvas`-sized overlay. Appends to earlier
    /// preparations; returns the number of highlight records tracked by this call.
    #[tracing::instrument(skip_all, fields(segments = segments.len()))]
    pub fn prepare(
        &mut self,
        segments: &[Segment],
        canvas: Canvas,
        shaper: &mut dyn TextShaper,
    ) -> usize {
        let before = self.tracker.len();
        let max_width = self.cfg.max_width_px(canvas.width);
        for seg in segments {
            let prepared = self.prepare_one(seg, max_width, shaper);
            self.segments.push(prepared);
        }
        let added = self.tracker.len() - before;
        tracing::info!(
            segments = self.segments.len(),
            highlights = added,
            "segments prepared"
        );
        added
    }

    fn prepare_one(
        &mut self,
        seg: &Segment,
        max_width: u32,
        shaper: &mut dyn TextShaper,
    ) -> PreparedSegment {
        let highlights = self.parser.parse_text(&seg.text);
        let clean_text = self.parser.remove_markup(&seg.text);
        let words: Vec<String> = clean_text.split_whitespace().map(str::to_owned).collect();
        let positions = find_highlight_positions(&words, &highlights);
        if positions.len() < highlights.len() {
            tracing::debug!(
                found = positions.len(),
                highlighted = highlights.len(),
                "some highlights have no matching word"
            );
        }

        let highlighted = if self.cfg.recolors_highlights() {
            positions.iter().copied().collect()
        } else {
            BTreeSet::new()
        };
        let highlight_ids = highlights.iter().map(HighlightedWord::id).collect();
        self.tracker
            .distribute_timing(&words, &positions, seg.start, seg.end, highlights);

        let layout = wrap_text(
            &clean_text,
            shaper,
            Some(max_width),
            self.cfg.max_words_per_line,
        );

        PreparedSegment {
            start: seg.start,
            end: seg.end,
            clean_text,
            words,
            highlighted,
            layout,
            highlight_ids,
        }
    }

    /// Segment on screen at `t`: the latest-starting prepared segment whose `[start, end)`
    /// contains `t`. Among equal starts the later one in input order wins.
    pub fn segment_at(&self, t: f64) -> Option<&PreparedSegment> {
        self.segment_index_at(t).map(|i| &self.segments[i])
    }

    fn segment_index_at(&self, t: f64) -> Option<usize> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.contains(t))
            .max_by(|(ia, a), (ib, b)| a.start.total_cmp(&b.start).then(ia.cmp(ib)))
            .map(|(i, _)| i)
    }

    /// Render the overlay for instant `t`. No segment on screen yields a transparent frame.
    pub fn render_at(
        &self,
        t: f64,
        canvas: Canvas,
        shaper: &mut dyn TextShaper,
    ) -> ArabsubResult<FrameRGBA> {
        match self.segment_at(t) {
            Some(seg) => self.render_segment(seg, &seg.active_at(t), canvas, shaper),
            None => Ok(FrameRGBA::transparent(canvas.width, canvas.height)),
        }
    }

    fn render_segment(
        &self,
        seg: &PreparedSegment,
        active: &BTreeSet<usize>,
        canvas: Canvas,
        shaper: &mut dyn TextShaper,
    ) -> ArabsubResult<FrameRGBA> {
        render_overlay(
            canvas,
            &seg.layout.lines,
            active,
            &seg.highlighted,
            shaper,
            &self.cfg.style,
        )
    }

    /// Render `[0, duration)` at `fps` and stream the overlay frames into `sink`.
    ///
    /// Frame `i` samples `t = i / fps`. Consecutive frames showing the same segment with the same
    /// active words reuse the previous raster.
    #[tracing::instrument(skip(self, shaper, sink), fields(fps = fps.as_f64()))]
    pub fn render_range(
        &self,
        fps: Fps,
        duration: f64,
        canvas: Canvas,
        shaper: &mut dyn TextShaper,
        sink: &mut dyn FrameSink,
    ) -> ArabsubResult<RenderStats> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(ArabsubError::validation(
                "render_range duration must be finite and > 0",
            ));
        }
        let total = fps.secs_to_frames_ceil(duration);
        if total == 0 {
            return Err(ArabsubError::validation(
                "render_range range must be non-empty",
            ));
        }

        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps,
        })?;

        let mut stats = RenderStats::default();
        let mut last: Option<((Option<usize>, BTreeSet<usize>), FrameRGBA)> = None;
        for i in 0..total {
            let t = fps.frames_to_secs(i);
            let seg_idx = self.segment_index_at(t);
            let active = seg_idx
                .map(|s| self.segments[s].active_at(t))
                .unwrap_or_default();
            let key = (seg_idx, active);

            let reuse = matches!(&last, Some((k, _)) if *k == key);
            if reuse {
                stats.frames_elided += 1;
            } else {
                let frame = match key.0 {
                    Some(s) => self.render_segment(&self.segments[s], &key.1, canvas, shaper)?,
                    None => FrameRGBA::transparent(canvas.width, canvas.height),
                };
                stats.frames_rendered += 1;
                last = Some((key, frame));
            }

            if let Some(((seg, _), frame)) = &last {
                if seg.is_none() {
                    stats.frames_empty += 1;
                }
                sink.push_frame(FrameIndex(i), frame)?;
            }
            stats.frames_total += 1;
        }

        sink.end()?;
        tracing::info!(
            frames = stats.frames_total,
            rendered = stats.frames_rendered,
            elided = stats.frames_elided,
            "range rendered"
        );
        Ok(stats)
    }

    /// Summary of the run so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            segments_processed: self.segments.len(),
            highlighted_words_found: self.tracker.len(),
            statistics: statistics(self.tracker.records()),
            settings: self.cfg.to_settings_value(),
            video_info: self.video.clone(),
            processing_timestamp: chrono::Local::now().to_rfc3339(),
        }
    }

    /// Write the tracked records as CSV using the configured columns and time format.
    pub fn export_csv(&self, path: &Path) -> bool {
        export_csv_file(
            path,
            self.tracker.records(),
            &self.cfg.export.columns,
            self.cfg.export.time_format,
        )
    }

    /// Write the structured export, embedding settings when configured to.
    pub fn export_json(&self, path: &Path) -> bool {
        let settings = self
            .cfg
            .export
            .include_settings
            .then(|| self.cfg.to_settings_value());
        export_json_file(path, self.tracker.records(), settings)
    }

    /// Drop all prepared segments and tracked records.
    pub fn clear(&mut self) {
        self.tracker.clear();
        self.segments.clear();
        self.video = None;
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
