//! The boundary to the visual renderer and the system clipboard.
//!
//! Rendering a QR symbol (matrix construction, drawing, compositing the
//! logo) is done by an external component behind [`RenderAdapter`]. This
//! crate only decides *what* to draw and *how it should look*.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use serde::{Deserialize, Serialize};

use crate::config::RenderingConfiguration;
use crate::error::{ExportError, LogoError, ParseFormatError};

// ============================================================================
// ExportFormat
// ============================================================================

/// File format for downloads and raw exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ExportFormat {
    #[default]
    Png,
    Svg,
    #[serde(alias = "jpg")]
    #[cfg_attr(feature = "clap", value(alias = "jpg"))]
    Jpeg,
    Webp,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [Self::Png, Self::Svg, Self::Jpeg, Self::Webp];

    /// File extension, also the query-parameter token.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
        }
    }

    /// Raster format, `None` for SVG.
    pub fn image_format(self) -> Option<ImageFormat> {
        match self {
            Self::Png => Some(ImageFormat::Png),
            Self::Jpeg => Some(ImageFormat::Jpeg),
            Self::Webp => Some(ImageFormat::WebP),
            Self::Svg => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        self.image_format()
            .map_or("image/svg+xml", |format| format.to_mime_type())
    }

    /// `<name>.<extension>`
    pub fn file_name(self, name: &str) -> String {
        format!("{name}.{}", self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            _ => Err(ParseFormatError(s.to_owned())),
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// A component that draws QR symbols.
///
/// Callers always send the full configuration, never a diff. `update`
/// returns once the symbol reflecting the new input is ready, so an export
/// issued right after it sees the new state.
pub trait RenderAdapter {
    /// Replaces the rendered symbol.
    fn update(&mut self, payload: &str, configuration: &RenderingConfiguration) -> Result<(), ExportError>;

    /// Saves the current symbol as `<name>.<format>`.
    fn download(&mut self, name: &str, format: ExportFormat) -> Result<(), ExportError>;

    /// Encoded bytes of the current symbol.
    fn raw_data(&mut self, format: ExportFormat) -> Result<Vec<u8>, ExportError>;
}

/// Image-capable clipboard.
pub trait Clipboard {
    fn write_image(&mut self, mime_type: &str, bytes: &[u8]) -> Result<(), ExportError>;
}

impl<T: RenderAdapter + ?Sized> RenderAdapter for &mut T {
    fn update(&mut self, payload: &str, configuration: &RenderingConfiguration) -> Result<(), ExportError> {
        (**self).update(payload, configuration)
    }

    fn download(&mut self, name: &str, format: ExportFormat) -> Result<(), ExportError> {
        (**self).download(name, format)
    }

    fn raw_data(&mut self, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        (**self).raw_data(format)
    }
}

// ============================================================================
// Logo upload
// ============================================================================

/// Turns uploaded image bytes into a `data:` URL usable as a logo reference.
///
/// The MIME type comes from the bytes, not from a file name. SVG documents
/// are recognized by their markup; everything else must be a raster format
/// the `image` crate can identify.
pub fn logo_data_url(bytes: &[u8]) -> Result<String, LogoError> {
    if bytes.is_empty() {
        return Err(LogoError::Empty);
    }
    let mime = if looks_like_svg(bytes) {
        "image/svg+xml"
    } else {
        image::guess_format(bytes)
            .map_err(LogoError::UnrecognizedFormat)?
            .to_mime_type()
    };
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    (head.starts_with("<?xml") || head.starts_with("<svg")) && head.contains("<svg")
}

// ============================================================================
// Tests
// ============================================================================
