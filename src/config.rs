use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::export::table::{ALLOWED_COLUMNS, TimeFormat};
use crate::foundation::error::{ArabsubError, ArabsubResult};
use crate::render::compositor::OverlayStyle;

/// Whether highlighted words are recolored or only tracked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightMode {
    /// Track timing and draw highlighted words in the highlight color.
    #[default]
    TrackHighlight,
    /// Track and export timing; draw every word in the base color.
    TrackOnly,
}

/// Timing export options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Rendering of time cells in the table export.
    pub time_format: TimeFormat,
    /// Table columns in output order.
    pub columns: Vec<String>,
    /// Embed the run configuration as `export_settings` in the structured export.
    pub include_settings: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            time_format: TimeFormat::Seconds,
            columns: ALLOWED_COLUMNS.iter().map(|c| (*c).to_owned()).collect(),
            include_settings: true,
        }
    }
}

/// Settings of one subtitle run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Registered font name (file stem) to shape with.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Word cap per line.
    pub max_words_per_line: usize,
    /// Line width budget as a fraction of the canvas width.
    pub max_width_fraction: f64,
    /// Recolor or only track.
    pub highlight_mode: HighlightMode,
    /// Overlay styling.
    pub style: OverlayStyle,
    /// Export options.
    pub export: ExportConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            font_family: "Cairo-Bold".to_owned(),
            font_size: 64.0,
            max_words_per_line: 3,
            max_width_fraction: 0.8,
            highlight_mode: HighlightMode::TrackHighlight,
            style: OverlayStyle::default(),
            export: ExportConfig::default(),
        }
    }
}

impl RunConfig {
    /// Parse a configuration from a JSON reader. Missing fields take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> ArabsubResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| ArabsubError::validation(format!("parse run config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ArabsubResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ArabsubError::validation(format!("open run config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject values no run could use.
    pub fn validate(&self) -> ArabsubResult<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(ArabsubError::validation("font_size must be finite and > 0"));
        }
        if !(self.max_width_fraction.is_finite()
            && self.max_width_fraction > 0.0
            && self.max_width_fraction <= 1.0)
        {
            return Err(ArabsubError::validation(
                "max_width_fraction must be in (0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.style.box_opacity) {
            return Err(ArabsubError::validation("box_opacity must be in [0, 1]"));
        }
        Ok(())
    }

    /// Pixel width budget for a canvas `canvas_width` pixels wide.
    pub fn max_width_px(&self, canvas_width: u32) -> u32 {
        (f64::from(canvas_width) * self.max_width_fraction) as u32
    }

    /// Whether highlighted words are recolored.
    pub fn recolors_highlights(&self) -> bool {
        self.highlight_mode == HighlightMode::TrackHighlight
    }

    /// Settings as a JSON value, for embedding in exports and summaries.
    pub fn to_settings_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
