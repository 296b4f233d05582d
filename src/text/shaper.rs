use crate::foundation::error::{ArabsubError, ArabsubResult};

/// One positioned glyph, relative to the top-left of its shaped text box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapedGlyph {
    /// Glyph id in the shaper's font.
    pub id: u32,
    /// Pen x position in pixels.
    pub x: f32,
    /// Baseline y position in pixels.
    pub y: f32,
}

/// Text after bidirectional reordering and contextual shaping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapedText {
    /// Rendered advance width in pixels.
    pub width: f32,
    /// Line box height (ascent + descent + leading) in pixels.
    pub height: f32,
    /// Font size the glyphs were shaped at.
    pub font_size: f32,
    /// Glyphs in visual (left-to-right screen) order.
    pub glyphs: Vec<ShapedGlyph>,
}

/// Measures and shapes text for one font at one size.
///
/// Implementations apply the bidi algorithm and cursive joining, so widths reflect what is drawn.
pub trait TextShaper {
    /// Font size in pixels.
    fn font_size(&self) -> f32;

    /// Shape `text` as a single unwrapped line.
    fn shape(&mut self, text: &str) -> ShapedText;

    /// Font data the glyph ids refer to. `None` means the shaper only measures.
    fn font(&self) -> Option<&vello_cpu::peniko::FontData>;
}

/// Parley-backed shaper for one font file.
pub struct ParleyShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
    size_px: f32,
}

impl std::fmt::Debug for ParleyShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyShaper")
            .field("family_name", &self.family_name)
            .field("size_px", &self.size_px)
            .finish_non_exhaustive()
    }
}

impl ParleyShaper {
    /// Register `font_bytes` and shape at `size_px`.
    pub fn from_font_bytes(font_bytes: Vec<u8>, size_px: f32) -> ArabsubResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ArabsubError::validation("font size must be finite and > 0"));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ArabsubError::layout("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ArabsubError::layout("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        tracing::debug!(family = %family_name, size_px, "registered font");

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
            size_px,
        })
    }

    /// Read a font file from disk.
    pub fn from_path(path: &std::path::Path, size_px: f32) -> ArabsubResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            ArabsubError::layout(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::from_font_bytes(bytes, size_px)
    }

    /// Family name reported by the registered font.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }
}

impl TextShaper for ParleyShaper {
    fn font_size(&self) -> f32 {
        self.size_px
    }

    fn shape(&mut self, text: &str) -> ShapedText {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut out = ShapedText {
            font_size: self.size_px,
            ..ShapedText::default()
        };
        for line in layout.lines() {
            let m = line.metrics();
            out.width = out.width.max(m.advance);
            out.height += m.ascent + m.descent + m.leading;
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                out.glyphs
                    .extend(run.positioned_glyphs().map(|g| ShapedGlyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    }));
            }
        }
        out
    }

    fn font(&self) -> Option<&vello_cpu::peniko::FontData> {
        Some(&self.font)
    }
}

/// Deterministic measuring shaper: every character advances by a fixed fraction of the font
/// size and no glyphs are produced.
///
/// Used for dry runs and tests where no font file is available.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceShaper {
    /// Font size in pixels.
    pub size_px: f32,
    /// Advance per character as a fraction of `size_px`.
    pub advance_em: f32,
}

impl MonospaceShaper {
    /// Half-em advance at `size_px`.
    pub fn new(size_px: f32) -> Self {
        Self {
            size_px,
            advance_em: 0.5,
        }
    }

    /// Advance of one character in pixels.
    pub fn advance_px(&self) -> f32 {
        self.size_px * self.advance_em
    }
}

impl TextShaper for MonospaceShaper {
    fn font_size(&self) -> f32 {
        self.size_px
    }

    fn shape(&mut self, text: &str) -> ShapedText {
        let chars = text.chars().count();
        ShapedText {
            width: chars as f32 * self.advance_px(),
            height: if chars == 0 { 0.0 } else { self.size_px },
            font_size: self.size_px,
            glyphs: Vec::new(),
        }
    }

    fn font(&self) -> Option<&vello_cpu::peniko::FontData> {
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/shaper.rs"]
mod tests;
