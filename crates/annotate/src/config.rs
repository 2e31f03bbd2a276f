//! Annotation settings: built once, validated, then read-only

// this_file: crates/annotate/src/config.rs

use std::path::Path;
use std::sync::Arc;

use image::{DynamicImage, RgbaImage};

use annotate_core::{
    error::{AnnotateError, Result},
    traits::FontRef,
    Color, FillStyle, FitParams,
};
use annotate_fontdb::Font;

use crate::codec;

/// Output resolution assumed when none is set
pub const DEFAULT_DPI: f64 = 81.58;
/// Extra space between lines, in em
pub const DEFAULT_LINE_HEIGHT: f64 = 0.25;
/// Largest point size the fitting search will try
pub const DEFAULT_MAX_FONT_SIZE: u32 = 72;

/// Everything an [`crate::Annotator`] needs, validated
///
/// Cloning is cheap for the font and fill image, which are shared.
#[derive(Clone)]
pub struct AnnotateConfig {
    source: DynamicImage,
    font: Arc<dyn FontRef>,
    max_font_size: u32,
    dpi: f64,
    line_height: f64,
    fill: FillStyle,
    hinting: bool,
}

impl AnnotateConfig {
    pub fn builder() -> AnnotateConfigBuilder {
        AnnotateConfigBuilder::new()
    }

    /// The image text is drawn onto; never modified
    pub fn source(&self) -> &DynamicImage {
        &self.source
    }

    pub fn font(&self) -> &Arc<dyn FontRef> {
        &self.font
    }

    pub fn max_font_size(&self) -> u32 {
        self.max_font_size
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    pub fn fill(&self) -> &FillStyle {
        &self.fill
    }

    /// Whether glyph outlines are grid-fitted before drawing
    pub fn hinting(&self) -> bool {
        self.hinting
    }

    /// Search bounds for the fitting engine
    pub fn fit_params(&self) -> FitParams {
        FitParams {
            max_font_size: self.max_font_size,
            line_height: self.line_height,
        }
    }
}

impl std::fmt::Debug for AnnotateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotateConfig")
            .field("source", &(self.source.width(), self.source.height()))
            .field("units_per_em", &self.font.units_per_em())
            .field("max_font_size", &self.max_font_size)
            .field("dpi", &self.dpi)
            .field("line_height", &self.line_height)
            .field("fill", &self.fill)
            .field("hinting", &self.hinting)
            .finish()
    }
}

/// Collects settings for an [`AnnotateConfig`]
///
/// Setters take `&mut self` so a builder can be adjusted between builds.
/// Loaders that fail leave the builder exactly as it was.
///
/// ```ignore
/// let mut builder = AnnotateConfig::builder();
/// builder.source_path("photo.jpg")?;
/// builder.font_path("DejaVuSans.ttf")?;
/// builder.max_font_size(48).fill_color(Color::white());
/// let config = builder.build()?;
/// ```
#[derive(Clone)]
pub struct AnnotateConfigBuilder {
    source: Option<DynamicImage>,
    font: Option<Arc<dyn FontRef>>,
    max_font_size: u32,
    dpi: f64,
    line_height: f64,
    fill: FillStyle,
    hinting: bool,
}

impl AnnotateConfigBuilder {
    /// No source, no font, every other setting at its default
    pub fn new() -> Self {
        Self {
            source: None,
            font: None,
            max_font_size: DEFAULT_MAX_FONT_SIZE,
            dpi: DEFAULT_DPI,
            line_height: DEFAULT_LINE_HEIGHT,
            fill: FillStyle::default(),
            hinting: false,
        }
    }

    pub fn source_image(&mut self, image: DynamicImage) -> &mut Self {
        self.source = Some(image);
        self
    }

    /// Loads the source image from a `.png`, `.jpg` or `.jpeg` file
    pub fn source_path(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let image = codec::load_image(path)?;
        self.source = Some(image);
        Ok(self)
    }

    pub fn font(&mut self, font: Arc<dyn FontRef>) -> &mut Self {
        self.font = Some(font);
        self
    }

    /// Loads a TrueType font (or the first face of a collection) from disk
    pub fn font_path(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let font = Font::from_file(path)?;
        self.font = Some(Arc::new(font));
        Ok(self)
    }

    /// Parses TrueType font bytes already in memory
    pub fn font_data(&mut self, data: Vec<u8>) -> Result<&mut Self> {
        let font = Font::from_data(data)?;
        self.font = Some(Arc::new(font));
        Ok(self)
    }

    pub fn max_font_size(&mut self, size: u32) -> &mut Self {
        self.max_font_size = size;
        self
    }

    pub fn dpi(&mut self, dpi: f64) -> &mut Self {
        self.dpi = dpi;
        self
    }

    /// Extra space between lines as a fraction of the font size
    pub fn line_height(&mut self, ratio: f64) -> &mut Self {
        self.line_height = ratio;
        self
    }

    /// Paint text in one color
    pub fn fill_color(&mut self, color: Color) -> &mut Self {
        self.fill = FillStyle::Solid(color);
        self
    }

    /// Paint each text pixel with the same pixel of `image`
    pub fn fill_image(&mut self, image: RgbaImage) -> &mut Self {
        self.fill = FillStyle::from(image);
        self
    }

    pub fn fill(&mut self, fill: FillStyle) -> &mut Self {
        self.fill = fill;
        self
    }

    /// Grid-fit glyph outlines when drawing; off by default
    ///
    /// Measurement is unaffected: widths always come from unhinted advances.
    pub fn hinting(&mut self, hinting: bool) -> &mut Self {
        self.hinting = hinting;
        self
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Checks every setting and snapshots them into a config
    pub fn build(&self) -> Result<AnnotateConfig> {
        let source = self
            .source
            .clone()
            .ok_or_else(|| AnnotateError::Config("no source image set".into()))?;
        let font = self
            .font
            .clone()
            .ok_or_else(|| AnnotateError::Config("no font set".into()))?;

        if self.max_font_size == 0 {
            return Err(AnnotateError::Config(
                "max font size must be at least 1".into(),
            ));
        }
        if !self.dpi.is_finite() || self.dpi <= 0.0 {
            return Err(AnnotateError::Config(format!(
                "dpi must be a positive number, got {}",
                self.dpi
            )));
        }
        if !self.line_height.is_finite() || self.line_height < 0.0 {
            return Err(AnnotateError::Config(format!(
                "line height must be zero or more, got {}",
                self.line_height
            )));
        }

        log::debug!(
            "config: source {}x{}, max_font_size={} dpi={} line_height={} hinting={}",
            source.width(),
            source.height(),
            self.max_font_size,
            self.dpi,
            self.line_height,
            self.hinting
        );

        Ok(AnnotateConfig {
            source,
            font,
            max_font_size: self.max_font_size,
            dpi: self.dpi,
            line_height: self.line_height,
            fill: self.fill.clone(),
            hinting: self.hinting,
        })
    }
}

impl Default for AnnotateConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
