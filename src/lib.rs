//! Arabsub renders right-to-left Arabic subtitle overlays with word-level timing.
//!
//! The public API is run-oriented:
//!
//! - Load [`Segment`]s from captions or free text
//! - Create a [`SubtitleRun`] from a [`RunConfig`] and prepare the segments
//! - Render single instants or stream a range into a [`FrameSink`]
//! - Export the tracked highlight timing as a table or a structured document
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Application configuration.
pub mod config;
/// Overlay encoding sinks.
pub mod encode;
/// Timing export and statistics.
pub mod export;
/// Line wrapping.
pub mod layout;
/// Highlight markup parsing.
pub mod markup;
/// Overlay rendering.
pub mod render;
/// The subtitle run pipeline.
pub mod session;
/// Caption segment sources.
pub mod source;
/// Text shaping and fonts.
pub mod text;
/// Highlight timing.
pub mod timing;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgba8};
pub use crate::foundation::error::{ArabsubError, ArabsubResult};

pub use crate::config::{ExportConfig, HighlightMode, RunConfig};
pub use crate::encode::ffmpeg::{
    FfmpegOverlayOpts, FfmpegOverlaySink, VideoInfo, is_ffmpeg_on_path, probe_video,
};
pub use crate::encode::png::PngSequenceSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::export::table::TimeFormat;
pub use crate::layout::wrap::{LineLayout, wrap_text};
pub use crate::markup::parser::{HighlightedWord, MarkupParser, WordId};
pub use crate::render::compositor::{OverlayStyle, Placement, render_overlay, render_preview};
pub use crate::render::frame::FrameRGBA;
pub use crate::session::{PreparedSegment, RenderStats, RunSummary, SubtitleRun};
pub use crate::source::{Segment, SegmentSource, load_captions, parse_srt, text_to_segments};
pub use crate::text::fonts::FontRegistry;
pub use crate::text::shaper::{MonospaceShaper, ParleyShaper, TextShaper};
pub use crate::timing::tracker::HighlightTracker;
