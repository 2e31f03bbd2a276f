//! Annotate: fit text into a box on an image and draw it
//!
//! Give it a source image, a TrueType font and a rectangle. It finds the
//! largest font size (up to a maximum) at which the word-wrapped text fits
//! the rectangle, then draws the text onto a copy of the image.
//!
//! ```no_run
//! use annotate::{AnnotateConfig, Annotator, BoundingBox, Color};
//!
//! # fn main() -> annotate::Result<()> {
//! let mut builder = AnnotateConfig::builder();
//! builder.source_path("photo.jpg")?;
//! builder.font_path("DejaVuSans.ttf")?;
//! builder.max_font_size(48).fill_color(Color::white());
//!
//! let annotator = Annotator::new(builder.build()?);
//! let annotation = annotator.write_text("Hello World", &BoundingBox::new(20, 20, 300, 80))?;
//! if annotation.overflow {
//!     eprintln!("text is taller than the box even at size 1");
//! }
//! annotation.save("annotated.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! The pieces underneath are public too: [`annotate_core`] holds the
//! fitting engine, [`annotate_fontdb`] loads fonts and [`annotate_render`]
//! rasterizes and composites.

pub mod annotator;
pub mod codec;
pub mod config;

pub use annotator::{Annotation, Annotator};
pub use config::{
    AnnotateConfig, AnnotateConfigBuilder, DEFAULT_DPI, DEFAULT_LINE_HEIGHT, DEFAULT_MAX_FONT_SIZE,
};

pub use annotate_core::{
    error::{AnnotateError, ExportError, FontLoadError, RenderError, Result},
    fit::{find_fitting_size, Fit, FitParams},
    layout::{Layout, Line},
    traits::{FontRef, GlyphMask, GlyphRasterizer},
    types::{BoundingBox, Color, FillStyle},
    F26Dot6, GlyphMetrics, ScaledFont,
};
pub use annotate_fontdb::Font;
pub use annotate_render::SkiaRasterizer;

pub use annotate_core;
pub use annotate_fontdb;
pub use annotate_render;
