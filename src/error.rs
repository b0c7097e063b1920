//! Error types for the side-effecting edges of the crate.
//!
//! The payload encoder and the configuration resolver never fail; they
//! substitute defaults and report [`Issue`](crate::Issue)s instead. Errors
//! here only come from renderer exports, logo uploads and preference storage.

use thiserror::Error;

use crate::adapter::ExportFormat;

/// Returned when a string does not name a known intent kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown intent kind: {0:?}")]
pub struct ParseKindError(pub String);

/// Returned when a string does not name a known export format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown export format: {0:?}")]
pub struct ParseFormatError(pub String);

/// Returned when a string is not one of `L`, `M`, `Q`, `H`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error correction level: {0:?}")]
pub struct ParseLevelError(pub String);

/// Returned when a string is neither `light` nor `dark`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme: {0:?}")]
pub struct ParseThemeError(pub String);

/// Failures reported by a [`RenderAdapter`](crate::RenderAdapter) or a
/// [`Clipboard`](crate::Clipboard).
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("renderer rejected the update: {0}")]
    Render(String),

    #[error("failed to download {name}: {reason}")]
    Download { name: String, reason: String },

    #[error("renderer cannot produce {0} output")]
    UnsupportedFormat(ExportFormat),

    #[error("clipboard write failed: {0}")]
    Clipboard(String),
}

/// Failures turning uploaded bytes into a logo reference.
#[derive(Debug, Error)]
pub enum LogoError {
    #[error("logo upload is empty")]
    Empty,

    #[error("unrecognized logo image format")]
    UnrecognizedFormat(#[source] image::ImageError),
}

/// Failures reading or writing persisted preferences.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
