//! Annotate Core: fit text into a box, then hand it to a rasterizer
//!
//! Annotating an image takes three steps, and this crate owns the first two:
//!
//! 1. **Measure** - [`metrics::GlyphMetrics`] reports advances and kerning in
//!    26.6 fixed-point pixels
//! 2. **Fit** - [`fit::find_fitting_size`] wraps the text greedily and bisects
//!    for the largest size whose layout fits the box
//! 3. **Draw** - a [`traits::GlyphRasterizer`] turns glyphs into coverage,
//!    composited by `annotate-render`
//!
//! ```rust
//! use annotate_core::{
//!     find_fitting_size, BoundingBox, FitParams, GlyphMetrics, F26Dot6,
//!     types::GlyphId,
//! };
//!
//! struct Monospace;
//!
//! impl GlyphMetrics for Monospace {
//!     fn glyph_index(&self, ch: char) -> GlyphId { ch as u32 }
//!     fn advance_width(&self, _: GlyphId, _: u32) -> F26Dot6 { F26Dot6::from_int(10) }
//!     fn kerning(&self, _: GlyphId, _: GlyphId, _: u32) -> F26Dot6 { F26Dot6::ZERO }
//! }
//!
//! let bbox = BoundingBox::new(0, 0, 200, 50);
//! let params = FitParams { max_font_size: 40, line_height: 0.25 };
//! let fit = find_fitting_size("Hello World", &bbox, &params, &Monospace);
//! assert_eq!(fit.font_size(), 40);
//! assert_eq!(fit.layout.lines.len(), 1);
//! ```

pub mod error;
pub mod fit;
pub mod fixed;
pub mod layout;
pub mod metrics;
pub mod traits;

pub use error::{AnnotateError, ExportError, FontLoadError, RenderError, Result};
pub use fit::{find_fitting_size, Fit, FitParams};
pub use fixed::F26Dot6;
pub use layout::{layout_text, Layout, Line};
pub use metrics::{GlyphMetrics, ScaledFont};
pub use traits::{FontRef, GlyphMask, GlyphRasterizer};
pub use types::{BoundingBox, Color, FillStyle};

/// The data structures shared by every stage
pub mod types {
    use std::sync::Arc;

    use image::{Rgba, RgbaImage};

    /// Unique identifier for a glyph within a font
    pub type GlyphId = u32;

    /// The glyph every font draws for characters it lacks
    pub const NOTDEF: GlyphId = 0;

    /// The rectangle text must fit inside, in pixels
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BoundingBox {
        pub x: i32,
        pub y: i32,
        pub width: u32,
        pub height: u32,
    }

    impl BoundingBox {
        pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
            Self {
                x,
                y,
                width,
                height,
            }
        }
    }

    /// Straight (not premultiplied) RGBA color
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Color {
        pub r: u8,
        pub g: u8,
        pub b: u8,
        pub a: u8,
    }

    impl Color {
        pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
            Self { r, g, b, a }
        }

        pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
            Self::rgba(r, g, b, 255)
        }

        pub const fn black() -> Self {
            Self::rgb(0, 0, 0)
        }

        pub const fn white() -> Self {
            Self::rgb(255, 255, 255)
        }

        pub const fn transparent() -> Self {
            Self::rgba(0, 0, 0, 0)
        }
    }

    impl From<Color> for Rgba<u8> {
        fn from(c: Color) -> Self {
            Rgba([c.r, c.g, c.b, c.a])
        }
    }

    impl From<Rgba<u8>> for Color {
        fn from(px: Rgba<u8>) -> Self {
            let [r, g, b, a] = px.0;
            Self::rgba(r, g, b, a)
        }
    }

    /// What glyph coverage is painted with
    #[derive(Debug, Clone, PartialEq)]
    pub enum FillStyle {
        /// One color everywhere
        Solid(Color),
        /// Each covered pixel takes the color of the same pixel in this
        /// image; pixels outside it are not painted
        Image(Arc<RgbaImage>),
    }

    impl FillStyle {
        /// Paint color at canvas pixel (x, y)
        pub fn sample(&self, x: u32, y: u32) -> Color {
            match self {
                FillStyle::Solid(color) => *color,
                FillStyle::Image(image) => {
                    if x < image.width() && y < image.height() {
                        Color::from(*image.get_pixel(x, y))
                    } else {
                        Color::transparent()
                    }
                },
            }
        }
    }

    impl Default for FillStyle {
        fn default() -> Self {
            FillStyle::Solid(Color::black())
        }
    }

    impl From<Color> for FillStyle {
        fn from(color: Color) -> Self {
            FillStyle::Solid(color)
        }
    }

    impl From<RgbaImage> for FillStyle {
        fn from(image: RgbaImage) -> Self {
            FillStyle::Image(Arc::new(image))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_solid_fill_is_uniform() {
        let fill = FillStyle::from(Color::rgb(1, 2, 3));
        assert_eq!(fill.sample(0, 0), Color::rgb(1, 2, 3));
        assert_eq!(fill.sample(9999, 9999), Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_image_fill_samples_by_position() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 255, 128]));
        let fill = FillStyle::from(img);

        assert_eq!(fill.sample(0, 0), Color::rgb(255, 0, 0));
        assert_eq!(fill.sample(1, 0), Color::rgba(0, 0, 255, 128));
        assert_eq!(fill.sample(2, 0), Color::transparent());
        assert_eq!(fill.sample(0, 1), Color::transparent());
    }

    #[test]
    fn test_fill_styles_compare_by_value() {
        assert_eq!(FillStyle::default(), FillStyle::Solid(Color::black()));
        assert_ne!(
            FillStyle::Solid(Color::white()),
            FillStyle::from(RgbaImage::new(1, 1))
        );
        assert_eq!(
            FillStyle::from(RgbaImage::new(1, 1)),
            FillStyle::from(RgbaImage::new(1, 1))
        );
    }
}
