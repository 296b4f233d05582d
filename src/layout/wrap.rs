use serde::Serialize;

use crate::text::shaper::TextShaper;

/// Inter-line spacing as a fraction of the font size.
pub const LINE_SPACING_EM: f32 = 0.2;

/// Wrapped display lines plus their aggregate shaped extent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LineLayout {
    /// Display rows in reading order. Each row is words joined with single spaces.
    pub lines: Vec<String>,
    /// Widest shaped line in pixels.
    pub max_line_width: u32,
    /// Sum of shaped line heights plus inter-line spacing, no trailing gap.
    pub total_height: u32,
}

impl LineLayout {
    /// All words flattened in wrap order (line 0 first). Indices into this sequence are the
    /// "flat" word indices used by the compositor.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().flat_map(|l| l.split_whitespace())
    }

    /// Number of flat words.
    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Split `text` into display lines.
///
/// A line closes when it already holds `max_words_per_line` words, or when appending a word makes
/// its shaped width exceed `max_width_px` and the line has more than one word (the word then opens
/// the next line). A single word wider than the budget keeps a line to itself. A budget of `0`
/// disables the width check and a word cap of `0` behaves as `1`.
pub fn wrap_text(
    text: &str,
    shaper: &mut dyn TextShaper,
    max_width_px: Option<u32>,
    max_words_per_line: usize,
) -> LineLayout {
    let max_words = max_words_per_line.max(1);
    let budget = max_width_px.filter(|w| *w > 0).map(|w| w as f32);

    let mut lines: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for word in text.split_whitespace() {
        if current.len() >= max_words {
            lines.push(current.join(" "));
            current = vec![word];
            continue;
        }

        current.push(word);
        let Some(budget) = budget else {
            continue;
        };
        let width = shaper.shape(&current.join(" ")).width;
        if width > budget && current.len() > 1 {
            current.pop();
            lines.push(current.join(" "));
            current = vec![word];
        }
    }
    if !current.is_empty() {
        lines.push(current.join(" "));
    }

    if lines.is_empty() {
        return LineLayout::default();
    }

    let spacing = shaper.font_size() * LINE_SPACING_EM;
    let mut max_width = 0.0f32;
    let mut total_height = 0.0f32;
    for line in &lines {
        let shaped = shaper.shape(line);
        max_width = max_width.max(shaped.width);
        total_height += shaped.height + spacing;
    }
    total_height -= spacing;

    tracing::trace!(lines = lines.len(), max_width, total_height, "wrapped text");
    LineLayout {
        lines,
        max_line_width: max_width.max(0.0) as u32,
        total_height: total_height.max(0.0) as u32,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
