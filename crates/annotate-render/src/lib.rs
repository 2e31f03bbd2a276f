//! Annotate Render: glyph coverage onto raster images
//!
//! Two pieces, each usable on its own:
//!
//! - [`SkiaRasterizer`] turns a glyph into an anti-aliased coverage mask
//!   using skrifa outlines and tiny-skia fills
//! - [`TextPainter`] walks a fitted layout, asks a rasterizer for each glyph
//!   and composites the masks with a [`annotate_core::FillStyle`]
//!
//! [`render`] ties them to a source image and leaves that image untouched.

pub mod paint;
pub mod painter;
pub mod rasterizer;

pub use paint::{blend, composite_mask};
pub use painter::{render, TextPainter};
pub use rasterizer::SkiaRasterizer;
