//! Image codec boundary: PNG and JPEG in, PNG and JPEG out
//!
//! The container is chosen by file extension, case-insensitively. Anything
//! other than `.png`, `.jpg` or `.jpeg` is rejected before the filesystem is
//! touched.

// this_file: crates/annotate/src/codec.rs

use std::fs;
use std::path::Path;

use image::{
    codecs::{
        jpeg::JpegEncoder,
        png::{CompressionType, FilterType, PngEncoder},
    },
    DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, Rgb, RgbImage, RgbaImage,
};

use annotate_core::error::{AnnotateError, ExportError, Result};

/// Quality used when writing JPEG output
pub const JPEG_QUALITY: u8 = 90;

/// Picks the codec for `path` from its extension
pub fn format_for_path(path: &Path) -> Result<ImageFormat> {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();

    match ext.to_ascii_lowercase().as_str() {
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        _ if ext.is_empty() => Err(AnnotateError::UnsupportedFormat(String::new())),
        _ => Err(AnnotateError::UnsupportedFormat(format!(".{}", ext))),
    }
}

/// Reads and decodes a PNG or JPEG file
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref();
    let format = format_for_path(path)?;
    let bytes = fs::read(path)?;

    let image = image::load_from_memory_with_format(&bytes, format)
        .map_err(|e| AnnotateError::ImageDecode(format!("{}: {}", path.display(), e)))?;
    log::debug!(
        "decoded {} as {:?}: {}x{}",
        path.display(),
        format,
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Decodes an in-memory image, guessing the container from its bytes
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| AnnotateError::ImageDecode(e.to_string()))
}

/// Encodes an RGBA image as PNG
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut png_data = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut png_data, CompressionType::Default, FilterType::Sub);

    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| ExportError::EncodingFailed(format!("PNG encoding failed: {}", e)))?;

    Ok(png_data)
}

/// Encodes an RGBA image as baseline JPEG, dropping alpha
pub fn encode_jpeg(image: &RgbaImage) -> Result<Vec<u8>> {
    let rgb = RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, _] = image.get_pixel(x, y).0;
        Rgb([r, g, b])
    });

    let mut jpeg_data = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg_data, JPEG_QUALITY)
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| ExportError::EncodingFailed(format!("JPEG encoding failed: {}", e)))?;

    Ok(jpeg_data)
}

/// Writes `image` to `path` in the format its extension names
pub fn save_image(image: &RgbaImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = match format_for_path(path)? {
        ImageFormat::Jpeg => encode_jpeg(image)?,
        _ => encode_png(image)?,
    };
    fs::write(path, &bytes)?;
    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
