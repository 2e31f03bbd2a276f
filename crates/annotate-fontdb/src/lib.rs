//! Where fonts come to life: TrueType loading for Annotate
//!
//! A [`Font`] keeps the raw bytes and parses tables on demand with
//! `read-fonts`. Only the metrics the fitting engine needs are read here:
//! `cmap` for glyph lookup, `hmtx` for advances and the legacy `kern` table
//! for pair adjustments. Outlines are left to the renderer.
//!
//! TrueType collections load their first face.

use std::fs;
use std::path::Path;

use read_fonts::{
    tables::kern::{Kern, SubtableKind},
    types::GlyphId as ReadGlyphId,
    FontRef as ReadFontRef, TableProvider,
};

use annotate_core::{
    error::{FontLoadError, Result},
    traits::FontRef,
    types::GlyphId,
};

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// A parsed TrueType font, ready to be measured
pub struct Font {
    data: Vec<u8>,
    units_per_em: u16,
    glyph_count: Option<u32>,
    has_kerning: bool,
}

impl Font {
    /// Reads and parses a font file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        log::debug!("read {} bytes of font data from {}", data.len(), path.display());
        Self::from_data(data)
    }

    /// Parses raw TrueType or TrueType Collection bytes
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        let font_ref = ReadFontRef::from_index(&data, 0).map_err(|_| FontLoadError::InvalidData)?;

        let units_per_em = font_ref
            .head()
            .map(|head| head.units_per_em())
            .map_err(|_| FontLoadError::MissingTable("head"))?;
        font_ref
            .cmap()
            .map_err(|_| FontLoadError::MissingTable("cmap"))?;
        font_ref
            .hmtx()
            .map_err(|_| FontLoadError::MissingTable("hmtx"))?;

        let glyph_count = font_ref.maxp().ok().map(|maxp| maxp.num_glyphs() as u32);
        let kern_subtables = match font_ref.kern() {
            Ok(kern) => kern.subtables().count(),
            Err(_) => 0,
        };

        log::debug!(
            "font parsed: upem={} glyphs={:?} kern_subtables={}",
            units_per_em,
            glyph_count,
            kern_subtables
        );

        Ok(Font {
            data,
            units_per_em,
            glyph_count,
            has_kerning: kern_subtables > 0,
        })
    }

    /// Creates a FontRef on-demand for parsing operations
    fn font_ref(&self) -> Option<ReadFontRef<'_>> {
        ReadFontRef::from_index(&self.data, 0).ok()
    }

    /// Finds which glyph draws this character
    pub fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        self.font_ref()
            .and_then(|font| font.cmap().ok()?.map_codepoint(ch).map(|gid| gid.to_u32()))
    }

    /// Horizontal advance in font units
    pub fn advance_width(&self, glyph_id: GlyphId) -> f32 {
        self.font_ref()
            .and_then(|font| {
                let hmtx = font.hmtx().ok()?;
                let advance = hmtx.advance(ReadGlyphId::new(glyph_id))?;
                Some(advance as f32)
            })
            // Half an em when the metrics can't be read
            .unwrap_or(self.units_per_em as f32 / 2.0)
    }

    /// Pair adjustment in font units from the `kern` table
    ///
    /// Sums every horizontal, non cross-stream subtable in formats 0, 2 and
    /// 3, for both the OpenType and the Apple table headers. State machine
    /// subtables need shaping and are skipped.
    pub fn kerning(&self, left: GlyphId, right: GlyphId) -> f32 {
        if !self.has_kerning {
            return 0.0;
        }
        self.font_ref()
            .and_then(|font| font.kern().ok())
            .map(|kern| pair_kerning(&kern, ReadGlyphId::new(left), ReadGlyphId::new(right)))
            .unwrap_or(0) as f32
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn glyph_count(&self) -> Option<u32> {
        self.glyph_count
    }

    /// Whether the font carries a `kern` table with at least one subtable
    pub fn has_kerning(&self) -> bool {
        self.has_kerning
    }
}

fn pair_kerning(kern: &Kern<'_>, left: ReadGlyphId, right: ReadGlyphId) -> i32 {
    let mut total = 0i32;
    for (index, subtable) in kern.subtables().enumerate() {
        let subtable = match subtable {
            Ok(subtable) => subtable,
            Err(e) => {
                log::warn!("kern subtable {} unreadable, ignoring the rest: {}", index, e);
                break;
            },
        };
        if !subtable.is_horizontal() || subtable.is_cross_stream() || subtable.is_variable() {
            continue;
        }
        let value = match subtable.kind() {
            Ok(SubtableKind::Format0(pairs)) => pairs.kerning(left, right),
            Ok(SubtableKind::Format2(classes)) => classes.kerning(left, right),
            Ok(SubtableKind::Format3(classes)) => classes.kerning(left, right),
            Ok(SubtableKind::Format1(_)) => None,
            Err(e) => {
                log::debug!("skipping kern subtable {}: {}", index, e);
                None
            },
        };
        total = total.saturating_add(value.unwrap_or(0));
    }
    total
}

impl FontRef for Font {
    fn data(&self) -> &[u8] {
        &self.data
    }

    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        self.glyph_id(ch)
    }

    fn advance_width(&self, glyph_id: GlyphId) -> f32 {
        self.advance_width(glyph_id)
    }

    fn kerning(&self, left: GlyphId, right: GlyphId) -> f32 {
        self.kerning(left, right)
    }

    fn glyph_count(&self) -> Option<u32> {
        self.glyph_count
    }
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("bytes", &self.data.len())
            .field("units_per_em", &self.units_per_em)
            .field("glyph_count", &self.glyph_count)
            .field("has_kerning", &self.has_kerning)
            .finish()
    }
}
