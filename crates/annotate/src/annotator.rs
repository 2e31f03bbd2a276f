//! Fit, then draw: the one-call path from text to annotated image

// this_file: crates/annotate/src/annotator.rs

use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;

use annotate_core::{
    error::Result, find_fitting_size, traits::GlyphRasterizer, BoundingBox, Fit, Layout,
    ScaledFont,
};
use annotate_render::{render, SkiaRasterizer, TextPainter};

use crate::{codec, config::AnnotateConfig};

/// Draws text into boxes on a configured source image
///
/// `write_text` takes `&self` and draws on a fresh canvas every call, so one
/// annotator can serve many threads.
pub struct Annotator {
    config: AnnotateConfig,
    rasterizer: Arc<dyn GlyphRasterizer>,
}

impl Annotator {
    /// Annotator that rasterizes the config's font with tiny-skia
    pub fn new(config: AnnotateConfig) -> Self {
        let rasterizer =
            Arc::new(SkiaRasterizer::new(config.font().clone()).with_hinting(config.hinting()));
        Self::with_rasterizer(config, rasterizer)
    }

    /// Annotator with a caller-supplied rasterizer
    pub fn with_rasterizer(config: AnnotateConfig, rasterizer: Arc<dyn GlyphRasterizer>) -> Self {
        log::debug!("annotator ready with {} rasterizer", rasterizer.name());
        Self { config, rasterizer }
    }

    pub fn config(&self) -> &AnnotateConfig {
        &self.config
    }

    /// Picks the font size and line breaks for `text` without drawing
    pub fn layout(&self, text: &str, bbox: &BoundingBox) -> Fit {
        let metrics = ScaledFont::new(self.config.font().as_ref(), self.config.dpi());
        find_fitting_size(text, bbox, &self.config.fit_params(), &metrics)
    }

    /// Fits `text` into `bbox` and draws it on a copy of the source image
    ///
    /// Text that does not fit even at size 1 is still drawn at size 1 and
    /// the returned [`Annotation`] is flagged as overflowing.
    pub fn write_text(&self, text: &str, bbox: &BoundingBox) -> Result<Annotation> {
        let metrics = ScaledFont::new(self.config.font().as_ref(), self.config.dpi());
        let fit = find_fitting_size(text, bbox, &self.config.fit_params(), &metrics);
        log::debug!(
            "write_text: size {} with {} lines after {} probes",
            fit.font_size(),
            fit.layout.lines.len(),
            fit.probes
        );

        let painter = TextPainter {
            metrics: &metrics,
            rasterizer: self.rasterizer.as_ref(),
            fill: self.config.fill(),
            dpi: self.config.dpi(),
        };
        let image = render(self.config.source(), &fit.layout, &painter)?;

        Ok(Annotation {
            image,
            layout: fit.layout,
            overflow: fit.overflow,
        })
    }
}

/// An annotated image and the layout that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub image: RgbaImage,
    pub layout: Layout,
    /// The text was taller than the box even at size 1
    pub overflow: bool,
}

impl Annotation {
    pub fn font_size(&self) -> u32 {
        self.layout.font_size
    }

    /// Writes the image as PNG or JPEG, chosen by extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        codec::save_image(&self.image, path)
    }
}
