//! Drawing a fitted layout onto a copy of the source image

use image::{DynamicImage, RgbaImage};

use annotate_core::{
    error::{AnnotateError, RenderError},
    metrics::{ppem, GlyphMetrics},
    traits::GlyphRasterizer,
    FillStyle, F26Dot6, Layout,
};

use crate::paint::composite_mask;

/// Everything needed to turn a [`Layout`] into pixels
///
/// The painter measures with the same [`GlyphMetrics`] the fitting engine
/// used, so pen positions match the widths that decided the wrapping.
pub struct TextPainter<'a> {
    pub metrics: &'a dyn GlyphMetrics,
    pub rasterizer: &'a dyn GlyphRasterizer,
    pub fill: &'a FillStyle,
    /// Resolution the layout was measured at
    pub dpi: f64,
}

impl TextPainter<'_> {
    /// Draws every line of `layout`
    ///
    /// Glyphs sit one font size below each layout baseline, so the first
    /// line's ascent lands inside the box instead of above its top edge.
    pub fn draw_layout(&self, canvas: &mut RgbaImage, layout: &Layout) -> Result<(), RenderError> {
        let drop = i32::try_from(layout.font_size).unwrap_or(i32::MAX);
        for line in &layout.lines {
            if line.is_empty() {
                continue;
            }
            let text = line.text();
            let baseline = line.y.saturating_add(drop);
            log::debug!(
                "{}: drawing {:?} at ({}, {}) size {}",
                self.rasterizer.name(),
                text,
                line.x,
                baseline,
                layout.font_size
            );
            self.draw_text(canvas, &text, line.x, baseline, layout.font_size)?;
        }
        Ok(())
    }

    /// Draws one run of text with its origin at (`x`, `baseline`) and
    /// returns the pen advance
    pub fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        x: i32,
        baseline: i32,
        size: u32,
    ) -> Result<F26Dot6, RenderError> {
        let ppem = ppem(size, self.dpi) as f32;
        let mut pen = F26Dot6::ZERO;
        let mut glyphs = text.chars().map(|ch| self.metrics.glyph_index(ch)).peekable();

        while let Some(glyph) = glyphs.next() {
            if let Some(mask) = self.rasterizer.rasterize(glyph, ppem)? {
                let left = x
                    .saturating_add(pen.to_int_round())
                    .saturating_add(mask.bearing_x);
                let top = baseline.saturating_sub(mask.bearing_y);
                composite_mask(canvas, &mask, left, top, self.fill);
            }

            pen += self.metrics.advance_width(glyph, size);
            if let Some(&next) = glyphs.peek() {
                pen += self.metrics.kerning(glyph, next, size);
            }
        }

        Ok(pen)
    }
}

/// Copies `source` to RGBA and draws `layout` on the copy
///
/// On failure the error carries the canvas as far as it got.
pub fn render(
    source: &DynamicImage,
    layout: &Layout,
    painter: &TextPainter<'_>,
) -> Result<RgbaImage, AnnotateError> {
    let mut canvas = source.to_rgba8();
    log::debug!(
        "rendering {} lines onto a {}x{} canvas",
        layout.lines.len(),
        canvas.width(),
        canvas.height()
    );

    match painter.draw_layout(&mut canvas, layout) {
        Ok(()) => Ok(canvas),
        Err(source) => {
            log::error!("rendering stopped: {}", source);
            Err(AnnotateError::Rendering {
                source,
                partial: Some(Box::new(canvas)),
            })
        },
    }
}
