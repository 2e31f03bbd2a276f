//! Metrics Provider: advance widths and kerning in pixels
//!
//! The fitting engine never touches font units. It asks a [`GlyphMetrics`]
//! for 26.6 pixel distances at a given point size, and the renderer asks the
//! same provider where to put the pen, so measured and drawn widths agree.

use crate::{
    fixed::F26Dot6,
    traits::FontRef,
    types::{GlyphId, NOTDEF},
};

/// Typographic points per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// Pixels per em for a point size at a given resolution
pub fn ppem(size: u32, dpi: f64) -> f64 {
    size as f64 * dpi / POINTS_PER_INCH
}

/// Pixel measurements of glyphs at a point size
pub trait GlyphMetrics {
    /// Glyph for a code point, `.notdef` when the font has none
    fn glyph_index(&self, ch: char) -> GlyphId;

    /// Horizontal advance of a glyph at `size` points
    fn advance_width(&self, glyph: GlyphId, size: u32) -> F26Dot6;

    /// Pair adjustment between `left` and the glyph that follows it
    fn kerning(&self, left: GlyphId, right: GlyphId, size: u32) -> F26Dot6;

    /// Width of a run of code points: every advance plus the kerning between
    /// each adjacent pair
    fn word_width(&self, word: &str, size: u32) -> F26Dot6 {
        let mut width = F26Dot6::ZERO;
        let mut glyphs = word.chars().map(|ch| self.glyph_index(ch)).peekable();
        while let Some(glyph) = glyphs.next() {
            width += self.advance_width(glyph, size);
            if let Some(&next) = glyphs.peek() {
                width += self.kerning(glyph, next, size);
            }
        }
        width
    }
}

/// A font bound to an output resolution
#[derive(Clone, Copy)]
pub struct ScaledFont<'a> {
    font: &'a dyn FontRef,
    dpi: f64,
}

impl<'a> ScaledFont<'a> {
    pub fn new(font: &'a dyn FontRef, dpi: f64) -> Self {
        Self { font, dpi }
    }

    pub fn font(&self) -> &'a dyn FontRef {
        self.font
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// Pixels per em at `size` points
    pub fn ppem(&self, size: u32) -> f64 {
        ppem(size, self.dpi)
    }
}

impl GlyphMetrics for ScaledFont<'_> {
    fn glyph_index(&self, ch: char) -> GlyphId {
        self.font.glyph_id(ch).unwrap_or(NOTDEF)
    }

    fn advance_width(&self, glyph: GlyphId, size: u32) -> F26Dot6 {
        F26Dot6::from_font_units(
            self.font.advance_width(glyph),
            self.ppem(size),
            self.font.units_per_em(),
        )
    }

    fn kerning(&self, left: GlyphId, right: GlyphId, size: u32) -> F26Dot6 {
        let units = self.font.kerning(left, right);
        if units == 0.0 {
            return F26Dot6::ZERO;
        }
        F26Dot6::from_font_units(units, self.ppem(size), self.font.units_per_em())
    }
}
