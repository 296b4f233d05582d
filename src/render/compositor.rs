use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{ArabsubError, ArabsubResult};
use crate::render::frame::FrameRGBA;
use crate::text::shaper::{ShapedText, TextShaper};

/// Distance kept from the canvas edge by the preset placements.
pub const EDGE_MARGIN_PX: i32 = 50;

/// Where the subtitle block is anchored on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// Horizontally centered, `EDGE_MARGIN_PX` above the bottom edge.
    #[default]
    BottomCenter,
    /// Left-aligned at the margin, above the bottom edge.
    BottomLeft,
    /// Right-aligned at the margin, above the bottom edge.
    BottomRight,
    /// Centered on both axes.
    Center,
    /// Horizontally centered, `EDGE_MARGIN_PX` below the top edge.
    TopCenter,
    /// Anchor at a percentage (0–100) of canvas width/height; lines start at the anchor.
    Custom {
        /// Horizontal anchor, percent of canvas width.
        x: f64,
        /// Vertical anchor, percent of canvas height.
        y: f64,
    },
}

impl Placement {
    /// Top-left anchor of the text block for a block `block_height` tall.
    pub fn anchor(self, canvas: Canvas, block_height: i32) -> (i32, i32) {
        let w = canvas.width as i32;
        let h = canvas.height as i32;
        let bottom = h - block_height - EDGE_MARGIN_PX;
        match self {
            Self::BottomCenter => (w / 2, bottom),
            Self::BottomLeft => (EDGE_MARGIN_PX, bottom),
            Self::BottomRight => (w - EDGE_MARGIN_PX, bottom),
            Self::Center => (w / 2, (h - block_height) / 2),
            Self::TopCenter => (w / 2, EDGE_MARGIN_PX),
            Self::Custom { x, y } => (
                (f64::from(w) * x / 100.0) as i32,
                (f64::from(h) * y / 100.0) as i32,
            ),
        }
    }

    /// Left edge of a line `line_width` wide relative to the anchor x.
    fn line_left(self, anchor_x: i32, line_width: i32) -> i32 {
        match self {
            Self::BottomCenter | Self::Center | Self::TopCenter => anchor_x - line_width / 2,
            Self::BottomRight => anchor_x - line_width,
            Self::BottomLeft | Self::Custom { .. } => anchor_x,
        }
    }
}

/// Visual styling of the overlay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Base glyph color.
    pub text_color: Rgba8,
    /// Outline color.
    pub stroke_color: Rgba8,
    /// Outline radius in pixels; `0` disables the outline.
    pub stroke_width: u32,
    /// Glyph color of highlighted words.
    pub highlight_color: Rgba8,
    /// Draw a box behind active words.
    pub word_box_enabled: bool,
    /// Active-word box color; its alpha is replaced by `box_opacity`.
    pub box_color: Rgba8,
    /// Active-word box opacity in `[0, 1]`.
    pub box_opacity: f64,
    /// Box corner radius in pixels.
    pub corner_radius: f64,
    /// Horizontal box padding in pixels.
    pub padding_x: f64,
    /// Vertical box padding in pixels.
    pub padding_y: f64,
    /// Gap between words in pixels.
    pub word_gap: i32,
    /// Extra line advance over the font size in pixels.
    pub line_gap: i32,
    /// Block anchor.
    pub placement: Placement,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            text_color: Rgba8::WHITE,
            stroke_color: Rgba8::BLACK,
            stroke_width: 2,
            highlight_color: Rgba8::YELLOW,
            word_box_enabled: true,
            box_color: Rgba8::BLACK,
            box_opacity: 0.7,
            corner_radius: 12.0,
            padding_x: 8.0,
            padding_y: 4.0,
            word_gap: 10,
            line_gap: 10,
            placement: Placement::BottomCenter,
        }
    }
}

impl OverlayStyle {
    fn box_paint(&self) -> Rgba8 {
        self.box_color.with_opacity(self.box_opacity)
    }
}

/// Screen position of one word for one layout.
#[derive(Clone, Debug, PartialEq)]
pub struct WordPlacement {
    /// Index into the layout's flattened word sequence.
    pub flat_index: usize,
    /// 0-based display line.
    pub line: usize,
    /// The word text.
    pub word: String,
    /// Glyph box (top-left origin, shaped width/height).
    pub rect: kurbo::Rect,
    shaped: ShapedText,
}

impl WordPlacement {
    /// Active-word background box: the glyph box grown by the style padding.
    pub fn box_rect(&self, style: &OverlayStyle) -> kurbo::Rect {
        self.rect.inflate(style.padding_x, style.padding_y)
    }
}

/// Lay out every word of `lines` on the canvas, right to left within each line.
///
/// The last word of a line sits at the line's right edge and each earlier word is placed to its
/// left, `word_gap` apart. Flat indices still follow reading order.
pub fn place_words(
    canvas: Canvas,
    lines: &[String],
    shaper: &mut dyn TextShaper,
    style: &OverlayStyle,
) -> Vec<WordPlacement> {
    let line_height = shaper.font_size() as i32 + style.line_gap;
    let block_height = lines.len() as i32 * line_height;
    let (anchor_x, anchor_y) = style.placement.anchor(canvas, block_height);

    let mut out = Vec::new();
    let mut y = anchor_y;
    let mut flat_index = 0usize;
    for (line_idx, line) in lines.iter().enumerate() {
        let words: Vec<&str> = line.split_whitespace().collect();
        let line_width = shaper.shape(line).width as i32;
        let mut cursor = style.placement.line_left(anchor_x, line_width) + line_width;

        let mut placed = Vec::with_capacity(words.len());
        for (rev_i, word) in words.iter().rev().enumerate() {
            let shaped = shaper.shape(word);
            let word_width = shaped.width as i32;
            let x = cursor - word_width;
            placed.push(WordPlacement {
                flat_index: flat_index + (words.len() - 1 - rev_i),
                line: line_idx,
                word: (*word).to_owned(),
                rect: kurbo::Rect::new(
                    f64::from(x),
                    f64::from(y),
                    f64::from(x + word_width),
                    f64::from(y) + f64::from(shaped.height),
                ),
                shaped,
            });
            cursor = x - style.word_gap;
        }
        // Draw order stays right-to-left; flat indices are reading order.
        out.extend(placed);
        flat_index += words.len();
        y += line_height;
    }
    out
}

/// Render one instant of a fixed layout into a transparent premultiplied RGBA layer.
///
/// `active` gets the background box (when enabled); `highlighted` switches the glyph color. Both
/// index the flattened word sequence of `lines`. Glyphs get a stamp outline: one stroke-colored
/// draw per offset of the `stroke_width` square neighbourhood, then the fill on top.
pub fn render_overlay(
    canvas: Canvas,
    lines: &[String],
    active: &BTreeSet<usize>,
    highlighted: &BTreeSet<usize>,
    shaper: &mut dyn TextShaper,
    style: &OverlayStyle,
) -> ArabsubResult<FrameRGBA> {
    if lines.is_empty() {
        return Ok(FrameRGBA::transparent(canvas.width, canvas.height));
    }
    let placements = place_words(canvas, lines, shaper, style);
    let (w, h) = surface_size(canvas)?;

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    for p in &placements {
        if style.word_box_enabled && active.contains(&p.flat_index) {
            fill_rounded_rect(&mut ctx, p.box_rect(style), style.corner_radius, style.box_paint());
        }
        let fill = if highlighted.contains(&p.flat_index) {
            style.highlight_color
        } else {
            style.text_color
        };
        if let Some(font) = shaper.font() {
            draw_stamped_text(
                &mut ctx,
                font,
                &p.shaped,
                (p.rect.x0, p.rect.y0),
                fill,
                style.stroke_color,
                style.stroke_width,
            );
        }
    }
    finish(ctx, canvas, w, h)
}

/// Opaque preview card: `text` wrapped to the card width minus 40 px and centered.
pub fn render_preview(
    text: &str,
    shaper: &mut dyn TextShaper,
    max_words_per_line: usize,
    canvas: Canvas,
) -> ArabsubResult<FrameRGBA> {
    const PREVIEW_BG: Rgba8 = Rgba8::rgb(50, 50, 50);

    let layout = crate::layout::wrap::wrap_text(
        text,
        shaper,
        Some(canvas.width.saturating_sub(40)),
        max_words_per_line,
    );
    let (w, h) = surface_size(canvas)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint(PREVIEW_BG.to_paint());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(canvas.width),
        f64::from(canvas.height),
    ));

    let line_height = shaper.font_size() as i32 + 10;
    let mut y = (canvas.height as i32 - layout.total_height as i32) / 2;
    for line in &layout.lines {
        let shaped = shaper.shape(line);
        let x = (canvas.width as i32 - shaped.width as i32) / 2;
        if let Some(font) = shaper.font() {
            draw_stamped_text(
                &mut ctx,
                font,
                &shaped,
                (f64::from(x), f64::from(y)),
                Rgba8::WHITE,
                Rgba8::BLACK,
                2,
            );
        }
        y += line_height;
    }
    finish(ctx, canvas, w, h)
}

fn surface_size(canvas: Canvas) -> ArabsubResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| ArabsubError::render("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| ArabsubError::render("canvas height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(ArabsubError::render("canvas width/height must be non-zero"));
    }
    Ok((w, h))
}

fn finish(
    mut ctx: vello_cpu::RenderContext,
    canvas: Canvas,
    w: u16,
    h: u16,
) -> ArabsubResult<FrameRGBA> {
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    })
}

fn fill_rounded_rect(
    ctx: &mut vello_cpu::RenderContext,
    rect: kurbo::Rect,
    radius: f64,
    color: Rgba8,
) {
    use vello_cpu::kurbo::Shape as _;

    let radius = radius.max(0.0).min(rect.width() / 2.0).min(rect.height() / 2.0);
    let rr = vello_cpu::kurbo::RoundedRect::new(rect.x0, rect.y0, rect.x1, rect.y1, radius);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(color.to_paint());
    ctx.fill_path(&rr.to_path(0.1));
}

fn draw_stamped_text(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    shaped: &ShapedText,
    origin: (f64, f64),
    fill: Rgba8,
    stroke: Rgba8,
    stroke_width: u32,
) {
    if shaped.glyphs.is_empty() {
        return;
    }
    let sw = stroke_width as i32;
    if sw > 0 {
        for dx in -sw..=sw {
            for dy in -sw..=sw {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let at = (origin.0 + f64::from(dx), origin.1 + f64::from(dy));
                draw_glyphs(ctx, font, shaped, at, stroke);
            }
        }
    }
    draw_glyphs(ctx, font, shaped, origin, fill);
}

fn draw_glyphs(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    shaped: &ShapedText,
    origin: (f64, f64),
    color: Rgba8,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate(origin));
    ctx.set_paint(color.to_paint());
    let glyphs = shaped.glyphs.iter().map(|g| vello_cpu::Glyph {
        id: g.id,
        x: g.x,
        y: g.y,
    });
    ctx.glyph_run(font)
        .font_size(shaped.font_size)
        .fill_glyphs(glyphs);
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
