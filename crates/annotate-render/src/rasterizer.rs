//! Skia rasterizer: glyph outlines to coverage masks via tiny-skia
//!
//! skrifa extracts the outline at the requested size, kurbo holds it long
//! enough to measure its bounds, and tiny-skia fills it with anti-aliasing.
//! Only the alpha channel survives; color comes from the fill style at
//! composite time.
//!
//! Outlines are unhinted unless [`SkiaRasterizer::with_hinting`] asks for
//! grid fitting. Hinting uses the font's own instructions when it has them
//! and skrifa's autohinter otherwise.

use std::sync::Arc;

use kurbo::{BezPath, PathEl, Shape};
use skrifa::{
    instance::{LocationRef, Size},
    outline::{DrawSettings, HintingInstance, HintingOptions},
    MetadataProvider,
};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

use annotate_core::{
    error::RenderError,
    traits::{FontRef, GlyphMask, GlyphRasterizer},
    types::GlyphId,
};

/// tiny-skia powered outline rasterizer
pub struct SkiaRasterizer {
    font: Arc<dyn FontRef>,
    /// Maximum mask dimension to prevent memory exhaustion
    max_size: u32,
    hinting: bool,
}

impl SkiaRasterizer {
    pub fn new(font: Arc<dyn FontRef>) -> Self {
        Self {
            font,
            max_size: 65535,
            hinting: false,
        }
    }

    /// Grid-fit outlines before filling them
    pub fn with_hinting(mut self, hinting: bool) -> Self {
        self.hinting = hinting;
        self
    }

    pub fn hinting(&self) -> bool {
        self.hinting
    }
}

impl GlyphRasterizer for SkiaRasterizer {
    fn name(&self) -> &'static str {
        "skia"
    }

    fn rasterize(&self, glyph_id: GlyphId, ppem: f32) -> Result<Option<GlyphMask>, RenderError> {
        let font_ref =
            skrifa::FontRef::from_index(self.font.data(), 0).map_err(|_| RenderError::InvalidFont)?;

        let outlines = font_ref.outline_glyphs();
        let glyph = outlines
            .get(skrifa::GlyphId::new(glyph_id))
            .ok_or(RenderError::GlyphNotFound(glyph_id))?;

        let mut path = BezPath::new();
        let mut pen = PathPen { path: &mut path };

        // Default instance at the exact size we need
        let size = Size::new(ppem);
        let instance = if self.hinting {
            match HintingInstance::new(
                &outlines,
                size,
                LocationRef::default(),
                HintingOptions::default(),
            ) {
                Ok(instance) => Some(instance),
                Err(e) => {
                    log::debug!(
                        "skia: hinting unavailable at {} ppem, drawing unhinted: {}",
                        ppem,
                        e
                    );
                    None
                },
            }
        } else {
            None
        };
        let settings = match &instance {
            Some(instance) => DrawSettings::hinted(instance, false),
            None => DrawSettings::unhinted(size, LocationRef::default()),
        };

        glyph
            .draw(settings, &mut pen)
            .map_err(|_| RenderError::OutlineExtractionFailed)?;

        if path.elements().is_empty() {
            return Ok(None);
        }

        let bbox = path.bounding_box();
        if bbox.x0.is_infinite()
            || bbox.y0.is_infinite()
            || bbox.x1.is_infinite()
            || bbox.y1.is_infinite()
        {
            return Err(RenderError::PathBuildingFailed);
        }
        if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return Ok(None);
        }

        // Snap the mask to whole pixels so bearings are exact
        let left = bbox.x0.floor();
        let top = bbox.y1.ceil();
        let width = ((bbox.x1.ceil() - left) as u32).max(1);
        let height = ((top - bbox.y0.floor()) as u32).max(1);
        if width > self.max_size || height > self.max_size {
            return Err(RenderError::BackendError(format!(
                "glyph {} is {}x{} px, larger than {}",
                glyph_id, width, height, self.max_size
            )));
        }

        log::trace!(
            "skia: glyph_id={} ppem={} bbox=({}, {}, {}, {}) mask={}x{}",
            glyph_id,
            ppem,
            bbox.x0,
            bbox.y0,
            bbox.x1,
            bbox.y1,
            width,
            height
        );

        let mut builder = PathBuilder::new();
        for element in path.elements() {
            match *element {
                PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
                PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
                PathEl::QuadTo(ctrl, end) => {
                    builder.quad_to(ctrl.x as f32, ctrl.y as f32, end.x as f32, end.y as f32)
                },
                PathEl::CurveTo(c1, c2, end) => builder.cubic_to(
                    c1.x as f32,
                    c1.y as f32,
                    c2.x as f32,
                    c2.y as f32,
                    end.x as f32,
                    end.y as f32,
                ),
                PathEl::ClosePath => builder.close(),
            }
        }
        let skia_path = builder.finish().ok_or(RenderError::PathBuildingFailed)?;

        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapCreationFailed)?;
        let paint = Paint {
            anti_alias: true,
            ..Default::default()
        };

        // Fonts are y-up, pixmaps y-down; shift the snapped box to the origin
        let transform =
            Transform::from_scale(1.0, -1.0).post_translate(-left as f32, top as f32);
        pixmap.fill_path(&skia_path, &paint, FillRule::Winding, transform, None);

        let coverage = pixmap.data().chunks_exact(4).map(|px| px[3]).collect();

        Ok(Some(GlyphMask {
            width,
            height,
            bearing_x: left as i32,
            bearing_y: top as i32,
            coverage,
        }))
    }
}

/// Bridge between skrifa's outline commands and kurbo's path format
struct PathPen<'a> {
    path: &'a mut BezPath,
}

impl skrifa::outline::OutlinePen for PathPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.path
            .quad_to((cx0 as f64, cy0 as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.path.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotate_fontdb::{testing, Font};

    fn sample_rasterizer() -> (SkiaRasterizer, Arc<Font>) {
        let font = Arc::new(Font::from_data(testing::sample_font()).expect("sample font"));
        (SkiaRasterizer::new(font.clone()), font)
    }

    #[test]
    fn test_rasterizer_name() {
        let (rasterizer, _) = sample_rasterizer();
        assert_eq!(rasterizer.name(), "skia");
    }

    #[test]
    fn test_box_glyph_mask() {
        let (rasterizer, font) = sample_rasterizer();
        let a = font.glyph_id('A').expect("A is mapped");

        // Outline (50, 0)-(450, 700) at 10 ppem is (0.5, 0)-(4.5, 7) px
        let mask = rasterizer
            .rasterize(a, 10.0)
            .expect("rasterizes")
            .expect("has ink");
        assert_eq!((mask.width, mask.height), (5, 7));
        assert_eq!((mask.bearing_x, mask.bearing_y), (0, 7));

        assert!(mask.coverage_at(2, 3) > 250, "interior should be solid");
        let edge = mask.coverage_at(0, 3);
        assert!(edge > 0 && edge < 255, "left column is half covered, got {}", edge);
    }

    #[test]
    fn test_hinted_box_glyph_mask() {
        let (unhinted, font) = sample_rasterizer();
        let hinted = SkiaRasterizer::new(font.clone()).with_hinting(true);
        assert!(hinted.hinting());
        assert!(!unhinted.hinting());
        let a = font.glyph_id('A').expect("A is mapped");

        let plain = unhinted.rasterize(a, 10.0).expect("rasterizes").expect("has ink");
        let fitted = hinted.rasterize(a, 10.0).expect("rasterizes").expect("has ink");

        // Grid fitting moves edges by at most a pixel
        assert!(fitted.width.abs_diff(plain.width) <= 1);
        assert!(fitted.height.abs_diff(plain.height) <= 1);
        assert!(fitted.coverage_at(2, 3) > 250, "interior should be solid");

        let space = font.glyph_id(' ').expect("space is mapped");
        assert!(hinted.rasterize(space, 24.0).expect("rasterizes").is_none());
    }

    #[test]
    fn test_space_has_no_ink() {
        let (rasterizer, font) = sample_rasterizer();
        let space = font.glyph_id(' ').expect("space is mapped");
        assert!(rasterizer.rasterize(space, 24.0).expect("rasterizes").is_none());
    }

    #[test]
    fn test_out_of_range_glyph_fails() {
        let (rasterizer, _) = sample_rasterizer();
        let result = rasterizer.rasterize(10_000, 12.0);
        assert!(matches!(result, Err(RenderError::GlyphNotFound(10_000))));
    }

    #[test]
    fn test_invalid_font_data_fails() {
        struct Hollow;

        impl FontRef for Hollow {
            fn data(&self) -> &[u8] {
                b"not a font"
            }

            fn units_per_em(&self) -> u16 {
                1000
            }

            fn glyph_id(&self, _ch: char) -> Option<GlyphId> {
                Some(1)
            }

            fn advance_width(&self, _glyph_id: GlyphId) -> f32 {
                500.0
            }
        }

        let rasterizer = SkiaRasterizer::new(Arc::new(Hollow));
        assert!(matches!(
            rasterizer.rasterize(1, 12.0),
            Err(RenderError::InvalidFont)
        ));
    }
}
