//! Error types for Annotate

use image::RgbaImage;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnnotateError>;

/// Main error type for Annotate
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// The path's extension names a container we don't decode or encode.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Image decoding failed: {0}")]
    ImageDecode(String),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Drawing stopped part way through. `partial` holds the canvas as it
    /// was when the failure happened, if one had been allocated.
    #[error("Rendering failed: {source}")]
    Rendering {
        source: RenderError,
        partial: Option<Box<RgbaImage>>,
    },
}

impl AnnotateError {
    /// Takes the partially drawn canvas out of a rendering failure
    pub fn into_partial(self) -> Option<RgbaImage> {
        match self {
            AnnotateError::Rendering { partial, .. } => partial.map(|canvas| *canvas),
            _ => None,
        }
    }
}

impl From<RenderError> for AnnotateError {
    fn from(source: RenderError) -> Self {
        AnnotateError::Rendering {
            source,
            partial: None,
        }
    }
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Invalid font data")]
    InvalidData,

    #[error("Required table missing: {0}")]
    MissingTable(&'static str),
}

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Font data could not be parsed for outlines")]
    InvalidFont,

    #[error("Glyph {0} not found")]
    GlyphNotFound(u32),

    #[error("Outline extraction failed")]
    OutlineExtractionFailed,

    #[error("Path building failed")]
    PathBuildingFailed,

    #[error("Pixmap creation failed")]
    PixmapCreationFailed,

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}
