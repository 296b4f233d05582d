//! Overlay encoding sinks.
//!
//! Sinks consume rendered overlay frames in timeline order and are driven by
//! `SubtitleRun::render_range`.

/// `ffmpeg`-based overlay sink and `ffprobe` metadata probing.
pub mod ffmpeg;
/// PNG image-sequence sink.
pub mod png;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
