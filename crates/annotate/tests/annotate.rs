//! End-to-end annotation with the in-memory sample font

use std::path::PathBuf;
use std::sync::Arc;

use image::{DynamicImage, Rgba, RgbaImage};
use proptest::prelude::*;

use annotate::{
    annotate_core::{layout_text, types::GlyphId},
    codec, AnnotateConfig, AnnotateError, Annotator, BoundingBox, Color, F26Dot6, GlyphMask,
    GlyphRasterizer, RenderError, ScaledFont,
};
use annotate_fontdb::testing;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Sample font at 72 dpi, so ppem equals the point size: letters are half
/// an em wide, the space a quarter
fn sample_annotator(width: u32, height: u32) -> Annotator {
    let mut builder = AnnotateConfig::builder();
    builder
        .source_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width, height, WHITE,
        )))
        .dpi(72.0)
        .max_font_size(40);
    builder
        .font_data(testing::sample_font())
        .expect("sample font loads");
    Annotator::new(builder.build().expect("valid config"))
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("annotate-{}-{}", std::process::id(), name))
}

#[test]
fn test_hello_world_fits_on_one_line() {
    let annotator = sample_annotator(220, 60);
    let bbox = BoundingBox::new(0, 0, 200, 50);

    // 10 letters and a space before each word are 5.5 em: 36 is the largest
    // size within 200 px
    let annotation = annotator.write_text("Hello World", &bbox).expect("draws");
    assert_eq!(annotation.font_size(), 36);
    assert!(!annotation.overflow);
    assert_eq!(annotation.layout.lines.len(), 1);
    assert_eq!(annotation.layout.lines[0].text(), "Hello World");
    assert_eq!(annotation.layout.lines[0].width, F26Dot6::from_int(198));
    assert_eq!(annotation.layout.lines[0].y, 0);
    assert!(annotation.layout.height <= bbox.height);

    // Drawn on y=36: 'H' covers x 1.8..16.2 and the 25.2 px above it
    assert_eq!(*annotation.image.get_pixel(10, 25), BLACK);
    assert_eq!(*annotation.image.get_pixel(10, 5), WHITE);
    assert_eq!(*annotation.image.get_pixel(10, 45), WHITE);
    assert_eq!(annotation.image.dimensions(), (220, 60));
}

#[test]
fn test_layout_matches_what_is_drawn() {
    let annotator = sample_annotator(220, 100);
    let bbox = BoundingBox::new(5, 5, 100, 90);
    let text = "The quick brown fox\njumps";

    let fit = annotator.layout(text, &bbox);
    let annotation = annotator.write_text(text, &bbox).expect("draws");
    assert_eq!(annotation.layout, fit.layout);
    assert!(fit.layout.lines.len() >= 3);
    assert_eq!(fit.layout.lines.last().map(|l| l.text()), Some("jumps".into()));
}

#[test]
fn test_long_word_stays_on_one_line() {
    let annotator = sample_annotator(10, 10);
    let bbox = BoundingBox::new(0, 0, 50, 1000);

    let fit = annotator.layout("Supercalifragilisticexpialidocious", &bbox);
    assert_eq!(fit.font_size(), 40);
    assert_eq!(fit.layout.lines.len(), 1);
    assert!(fit.layout.lines[0].width > F26Dot6::from_int(50));
}

#[test]
fn test_huge_max_size_measures_without_overflowing() {
    let mut builder = AnnotateConfig::builder();
    builder
        .source_image(DynamicImage::ImageRgba8(RgbaImage::new(10, 10)))
        .max_font_size(100_000);
    builder.font_data(testing::sample_font()).expect("font");
    let annotator = Annotator::new(builder.build().expect("valid"));

    // The first probe measures 1000 glyphs at ~113k ppem, past i32 in 26.6
    let text = "a".repeat(1000);
    let fit = annotator.layout(&text, &BoundingBox::new(0, 0, 200, 50));
    assert!(!fit.overflow);
    assert_eq!(fit.font_size(), 40);
    assert_eq!(fit.layout.lines.len(), 1);
}

#[test]
fn test_overflow_is_drawn_and_flagged() {
    let annotator = sample_annotator(50, 20);
    let bbox = BoundingBox::new(0, 0, 100, 0);

    let annotation = annotator.write_text("AAAA", &bbox).expect("draws anyway");
    assert!(annotation.overflow);
    assert_eq!(annotation.font_size(), 1);
    assert!(annotation.layout.height > bbox.height);
}

#[test]
fn test_source_untouched_and_output_repeatable() {
    let annotator = sample_annotator(120, 40);
    let before = annotator.config().source().to_rgba8();
    let bbox = BoundingBox::new(4, 4, 110, 30);

    let first = annotator.write_text("AVA 42", &bbox).expect("draws");
    let second = annotator.write_text("AVA 42", &bbox).expect("draws");

    assert_eq!(first, second);
    assert_ne!(first.image, before);
    assert_eq!(annotator.config().source().to_rgba8(), before);
}

#[test]
fn test_shared_across_threads() {
    let annotator = Arc::new(sample_annotator(120, 40));
    let bbox = BoundingBox::new(0, 0, 120, 40);
    let expected = annotator.write_text("Threads", &bbox).expect("draws");

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let annotator = Arc::clone(&annotator);
                scope.spawn(move || annotator.write_text("Threads", &bbox))
            })
            .collect();
        for handle in handles {
            let annotation = handle.join().expect("thread finished").expect("draws");
            assert_eq!(annotation, expected);
        }
    });
}

#[test]
fn test_fill_image_colors_the_text() {
    let mut builder = AnnotateConfig::builder();
    builder
        .source_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(220, 60, WHITE)))
        .dpi(72.0)
        .max_font_size(40)
        .fill_image(RgbaImage::from_pixel(220, 60, Rgba([200, 30, 30, 255])));
    builder.font_data(testing::sample_font()).expect("font");
    let annotator = Annotator::new(builder.build().expect("valid"));

    let annotation = annotator
        .write_text("Hello World", &BoundingBox::new(0, 0, 200, 50))
        .expect("draws");
    assert_eq!(*annotation.image.get_pixel(10, 25), Rgba([200, 30, 30, 255]));
    assert_eq!(*annotation.image.get_pixel(10, 5), WHITE);
}

#[test]
fn test_fill_color_with_alpha_blends() {
    let mut builder = AnnotateConfig::builder();
    builder
        .source_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(220, 60, WHITE)))
        .dpi(72.0)
        .max_font_size(40)
        .fill_color(Color::rgba(0, 0, 0, 128));
    builder.font_data(testing::sample_font()).expect("font");
    let annotator = Annotator::new(builder.build().expect("valid"));

    let annotation = annotator
        .write_text("Hello World", &BoundingBox::new(0, 0, 200, 50))
        .expect("draws");
    let px = annotation.image.get_pixel(10, 25);
    assert!((126..=128).contains(&px[0]), "got {:?}", px);
    assert_eq!(px[3], 255);
}

#[test]
fn test_hinted_drawing_matches_the_layout() {
    let mut builder = AnnotateConfig::builder();
    builder
        .source_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(220, 60, WHITE)))
        .dpi(72.0)
        .max_font_size(40)
        .hinting(true);
    builder.font_data(testing::sample_font()).expect("font");
    let annotator = Annotator::new(builder.build().expect("valid"));
    let plain = sample_annotator(220, 60);
    let bbox = BoundingBox::new(0, 0, 200, 50);

    let hinted = annotator.write_text("Hello World", &bbox).expect("draws");
    let unhinted = plain.write_text("Hello World", &bbox).expect("draws");
    assert_eq!(hinted.layout, unhinted.layout);
    assert_eq!(*hinted.image.get_pixel(10, 25), BLACK);
    assert_eq!(*hinted.image.get_pixel(10, 45), WHITE);
}

/// Blocks for everything but 'Z', which fails
struct FailsOnZ;

impl GlyphRasterizer for FailsOnZ {
    fn name(&self) -> &'static str {
        "fails-on-z"
    }

    fn rasterize(&self, glyph_id: GlyphId, _ppem: f32) -> Result<Option<GlyphMask>, RenderError> {
        let z = testing::sample_builder().glyph_id('Z').map(u32::from);
        if Some(glyph_id) == z {
            return Err(RenderError::BackendError("no Z today".into()));
        }
        Ok(Some(GlyphMask {
            width: 2,
            height: 2,
            bearing_x: 0,
            bearing_y: 2,
            coverage: vec![255; 4],
        }))
    }
}

#[test]
fn test_render_failure_keeps_partial_canvas() {
    let mut builder = AnnotateConfig::builder();
    builder
        .source_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 40, WHITE)))
        .dpi(72.0)
        .max_font_size(20);
    builder.font_data(testing::sample_font()).expect("font");
    let annotator = Annotator::with_rasterizer(builder.build().expect("valid"), Arc::new(FailsOnZ));

    let err = annotator
        .write_text("AZ", &BoundingBox::new(0, 0, 100, 40))
        .expect_err("Z fails");
    assert_eq!(err.to_string(), "Rendering failed: Backend error: no Z today");

    let partial = err.into_partial().expect("partial canvas");
    assert_eq!(partial.dimensions(), (100, 40));
    // 'A' was drawn as a 2x2 block resting one font size below the box top
    assert_eq!(*partial.get_pixel(0, 18), BLACK);
    assert_eq!(*partial.get_pixel(11, 18), WHITE);
}

#[test]
fn test_config_from_files_and_save_round_trip() {
    let font_path = temp_path("sample.ttf");
    let source_path = temp_path("source.png");
    let out_png = temp_path("out.png");
    let out_jpg = temp_path("out.JPG");

    std::fs::write(&font_path, testing::sample_font()).expect("write font");
    codec::save_image(&RgbaImage::from_pixel(64, 32, WHITE), &source_path).expect("write source");

    let mut builder = AnnotateConfig::builder();
    builder.source_path(&source_path).expect("png loads");
    builder.font_path(&font_path).expect("font loads");
    builder.dpi(72.0);
    let annotator = Annotator::new(builder.build().expect("valid"));

    let annotation = annotator
        .write_text("Hi", &BoundingBox::new(2, 2, 60, 28))
        .expect("draws");
    annotation.save(&out_png).expect("saves png");
    annotation.save(&out_jpg).expect("saves jpeg");

    let reloaded = codec::load_image(&out_png).expect("reloads png");
    assert_eq!(reloaded.to_rgba8(), annotation.image);
    let reloaded = codec::load_image(&out_jpg).expect("reloads jpeg");
    assert_eq!((reloaded.width(), reloaded.height()), (64, 32));

    let err = annotation.save(temp_path("out.gif")).expect_err("gif is rejected");
    assert!(matches!(err, AnnotateError::UnsupportedFormat(ref ext) if ext == ".gif"));

    for path in [font_path, source_path, out_png, out_jpg] {
        let _ = std::fs::remove_file(path);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fitted_size_is_the_largest_that_fits(
        text in "[A-Za-z0-9]{1,8}( [A-Za-z0-9]{1,8}){0,8}",
        width in 1u32..300,
        height in 0u32..200,
    ) {
        let annotator = sample_annotator(1, 1);
        let config = annotator.config();
        let bbox = BoundingBox::new(0, 0, width, height);
        let fit = annotator.layout(&text, &bbox);

        if fit.overflow {
            prop_assert_eq!(fit.font_size(), 1);
            prop_assert!(fit.layout.height > height);
        } else {
            prop_assert!(fit.layout.height <= height);
            let size = fit.font_size();
            if size < config.max_font_size() {
                let metrics = ScaledFont::new(config.font().as_ref(), config.dpi());
                let next = layout_text(&text, &bbox, size + 1, config.line_height(), &metrics);
                prop_assert!(next.height > height);
            }
        }
    }
}
