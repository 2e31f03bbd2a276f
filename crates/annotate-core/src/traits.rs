//! The seams between font data, measurement and rasterization
//!
//! - [`FontRef`] - raw font data and design-unit metrics
//! - [`GlyphRasterizer`] - turns one glyph into a coverage mask
//!
//! Pixel-level measurement lives in [`crate::metrics::GlyphMetrics`].

use crate::{error::RenderError, types::GlyphId};

/// Your window into a parsed font
///
/// Everything here is in font design units; scaling to pixels happens in
/// [`crate::metrics::ScaledFont`].
///
/// ```ignore
/// struct MyFont {
///     data: Vec<u8>,
/// }
///
/// impl FontRef for MyFont {
///     fn data(&self) -> &[u8] {
///         &self.data
///     }
///
///     fn units_per_em(&self) -> u16 {
///         2048
///     }
///
///     fn glyph_id(&self, ch: char) -> Option<GlyphId> {
///         Some(ch as u32)
///     }
///
///     fn advance_width(&self, _glyph_id: GlyphId) -> f32 {
///         1024.0
///     }
/// }
/// ```
pub trait FontRef: Send + Sync {
    /// Raw font bytes as they live in the file
    fn data(&self) -> &[u8];

    /// The font's internal coordinate system scale
    fn units_per_em(&self) -> u16;

    /// Find the glyph that represents this character
    ///
    /// Returns None when the font doesn't contain this character.
    fn glyph_id(&self, ch: char) -> Option<GlyphId>;

    /// Horizontal advance of this glyph in font units
    fn advance_width(&self, glyph_id: GlyphId) -> f32;

    /// Pair adjustment between two adjacent glyphs in font units
    fn kerning(&self, _left: GlyphId, _right: GlyphId) -> f32 {
        0.0
    }

    /// How many glyphs this font contains
    fn glyph_count(&self) -> Option<u32> {
        None
    }
}

/// An 8-bit coverage mask for one glyph, positioned relative to its origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphMask {
    pub width: u32,
    pub height: u32,
    /// Offset from the pen position to the left edge of the mask
    pub bearing_x: i32,
    /// Offset from the baseline up to the top edge of the mask
    pub bearing_y: i32,
    /// Row-major coverage, `width * height` bytes
    pub coverage: Vec<u8>,
}

impl GlyphMask {
    /// Coverage at mask pixel (x, y), zero outside the mask
    pub fn coverage_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.coverage[(y * self.width + x) as usize]
    }
}

/// Where glyphs become pixels
pub trait GlyphRasterizer: Send + Sync {
    /// Identify yourself in logs
    fn name(&self) -> &'static str;

    /// Rasterize one glyph at `ppem` pixels per em
    ///
    /// `Ok(None)` means the glyph has no ink (a space, an empty `.notdef`).
    fn rasterize(&self, glyph_id: GlyphId, ppem: f32) -> Result<Option<GlyphMask>, RenderError>;
}
