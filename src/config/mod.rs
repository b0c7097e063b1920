//! Serializable rendering configuration handed to the renderer.
//!
//! A [`RenderingConfiguration`] is always complete: every section has a
//! value, numbers are inside their bounds and colors are valid. Editors
//! change it through [`patch`] one top-level section at a time.
//!
//! # Example
//!
//! ```
//! use qrforge::{HexColor, RenderingConfiguration};
//!
//! let config = RenderingConfiguration::new()
//!     .with_size(512)
//!     .with_foreground("#1e3a8a".parse::<HexColor>().unwrap());
//!
//! let json = config.to_json().unwrap();
//! assert!(json.contains("\"dotsOptions\""));
//!
//! let restored = RenderingConfiguration::from_json(&json).unwrap();
//! assert_eq!(restored, config);
//! ```
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "width": 300,
//!   "height": 300,
//!   "margin": 10,
//!   "dotsOptions": { "color": "#000000", "type": "square" },
//!   "backgroundOptions": { "color": "#ffffff" },
//!   "cornersSquareOptions": { "color": "#000000", "type": "square" },
//!   "cornersDotOptions": { "color": "#000000", "type": "square" },
//!   "imageOptions": {
//!     "crossOrigin": "anonymous",
//!     "margin": 10,
//!     "imageSize": 0.4,
//!     "hideBackgroundDots": true
//!   },
//!   "qrOptions": { "errorCorrectionLevel": "M" }
//! }
//! ```

mod color;
mod patch;

pub use color::{HexColor, ParseColorError};
pub use patch::{merge_gradient, patch, patch_section, GradientPatch, PartialConfiguration, Section};

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseLevelError;

// ============================================================================
// Bounds
// ============================================================================

pub const DEFAULT_SIZE: u32 = 300;
pub const SIZE_RANGE: RangeInclusive<u32> = 50..=2000;

pub const DEFAULT_MARGIN: u32 = 10;
pub const MARGIN_RANGE: RangeInclusive<u32> = 0..=100;

/// Logo size as a fraction of the symbol.
pub const LOGO_SIZE_RANGE: RangeInclusive<f32> = 0.1..=0.5;
pub const DEFAULT_LOGO_SIZE: f32 = 0.4;

pub const LOGO_MARGIN_RANGE: RangeInclusive<u32> = 0..=30;
pub const DEFAULT_LOGO_MARGIN: u32 = 10;

/// Logo margin used when a logo arrives through query parameters.
pub const QUERY_LOGO_MARGIN: u32 = 5;

pub const DEFAULT_CROSS_ORIGIN: &str = "anonymous";

// ============================================================================
// Styles
// ============================================================================

/// Shape of the data modules.
///
/// Unknown tokens are kept as [`Custom`](Self::Custom) and passed to the
/// renderer verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DotStyle {
    #[default]
    Square,
    Dots,
    Rounded,
    ExtraRounded,
    Classy,
    ClassyRounded,
    Custom(String),
}

impl DotStyle {
    pub const KNOWN: [DotStyle; 6] = [
        Self::Square,
        Self::Dots,
        Self::Rounded,
        Self::ExtraRounded,
        Self::Classy,
        Self::ClassyRounded,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Square => "square",
            Self::Dots => "dots",
            Self::Rounded => "rounded",
            Self::ExtraRounded => "extra-rounded",
            Self::Classy => "classy",
            Self::ClassyRounded => "classy-rounded",
            Self::Custom(token) => token,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl From<&str> for DotStyle {
    fn from(token: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|style| style.as_str() == token)
            .unwrap_or_else(|| Self::Custom(token.to_owned()))
    }
}

/// Shape of the finder-pattern squares and their center dots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CornerStyle {
    #[default]
    Square,
    Dot,
    ExtraRounded,
    Custom(String),
}

impl CornerStyle {
    pub const KNOWN: [CornerStyle; 3] = [Self::Square, Self::Dot, Self::ExtraRounded];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Square => "square",
            Self::Dot => "dot",
            Self::ExtraRounded => "extra-rounded",
            Self::Custom(token) => token,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl From<&str> for CornerStyle {
    fn from(token: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|style| style.as_str() == token)
            .unwrap_or_else(|| Self::Custom(token.to_owned()))
    }
}

impl From<String> for DotStyle {
    fn from(token: String) -> Self {
        Self::from(token.as_str())
    }
}

impl From<DotStyle> for String {
    fn from(style: DotStyle) -> Self {
        style.as_str().to_owned()
    }
}

impl From<String> for CornerStyle {
    fn from(token: String) -> Self {
        Self::from(token.as_str())
    }
}

impl From<CornerStyle> for String {
    fn from(style: CornerStyle) -> Self {
        style.as_str().to_owned()
    }
}

impl fmt::Display for DotStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CornerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Error correction
// ============================================================================

/// QR error-correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ErrorCorrectionLevel {
    /// ~7% recovery.
    #[serde(rename = "L")]
    #[cfg_attr(feature = "clap", value(name = "L", alias = "l"))]
    Low,
    /// ~15% recovery.
    #[default]
    #[serde(rename = "M")]
    #[cfg_attr(feature = "clap", value(name = "M", alias = "m"))]
    Medium,
    /// ~25% recovery.
    #[serde(rename = "Q")]
    #[cfg_attr(feature = "clap", value(name = "Q", alias = "q"))]
    Quartile,
    /// ~30% recovery.
    #[serde(rename = "H")]
    #[cfg_attr(feature = "clap", value(name = "H", alias = "h"))]
    High,
}

impl ErrorCorrectionLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "L",
            Self::Medium => "M",
            Self::Quartile => "Q",
            Self::High => "H",
        }
    }
}

impl fmt::Display for ErrorCorrectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCorrectionLevel {
    type Err = ParseLevelError;

    /// Parses a level letter, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::Low),
            "M" => Ok(Self::Medium),
            "Q" => Ok(Self::Quartile),
            "H" => Ok(Self::High),
            _ => Err(ParseLevelError(s.to_owned())),
        }
    }
}

// ============================================================================
// Gradient
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ColorStop {
    /// Position along the gradient, 0.0 to 1.0.
    pub offset: f32,
    pub color: HexColor,
}

/// Two-stop gradient painted over the data modules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Gradient {
    #[serde(rename = "type")]
    pub kind: GradientKind,
    /// Degrees in `[0, 360)`; ignored by radial gradients.
    pub rotation: f32,
    pub color_stops: [ColorStop; 2],
}

impl Default for Gradient {
    /// Linear, black to indigo.
    fn default() -> Self {
        Self {
            kind: GradientKind::Linear,
            rotation: 0.0,
            color_stops: [
                ColorStop {
                    offset: 0.0,
                    color: HexColor::black(),
                },
                ColorStop {
                    offset: 1.0,
                    color: HexColor::new(0x4f, 0x46, 0xe5),
                },
            ],
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct DotsOptions {
    pub color: HexColor,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub style: DotStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
}

impl Default for DotsOptions {
    fn default() -> Self {
        Self {
            color: HexColor::black(),
            style: DotStyle::default(),
            gradient: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct BackgroundOptions {
    pub color: HexColor,
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self {
            color: HexColor::white(),
        }
    }
}

/// Style of the corner squares or of the dots inside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct CornerOptions {
    pub color: HexColor,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub style: CornerStyle,
}

impl Default for CornerOptions {
    fn default() -> Self {
        Self {
            color: HexColor::black(),
            style: CornerStyle::default(),
        }
    }
}

/// Placement of the logo image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ImageOptions {
    pub cross_origin: String,
    /// Pixels of clear space around the logo.
    pub margin: u32,
    /// Fraction of the symbol the logo may cover.
    pub image_size: f32,
    /// Whether modules behind the logo are left out.
    pub hide_background_dots: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            cross_origin: DEFAULT_CROSS_ORIGIN.to_owned(),
            margin: DEFAULT_LOGO_MARGIN,
            image_size: DEFAULT_LOGO_SIZE,
            hide_background_dots: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct QrOptions {
    pub error_correction_level: ErrorCorrectionLevel,
}

// ============================================================================
// RenderingConfiguration
// ============================================================================

/// Everything the renderer needs besides the payload.
///
/// `width` and `height` are always equal. Deserialized input is read as a
/// [`PartialConfiguration`] over the defaults, so it is clamped exactly like
/// a patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PartialConfiguration")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct RenderingConfiguration {
    pub width: u32,
    pub height: u32,
    pub margin: u32,

    /// Logo reference (URL or `data:` URL). `None` means no logo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    pub dots_options: DotsOptions,
    pub background_options: BackgroundOptions,
    pub corners_square_options: CornerOptions,
    pub corners_dot_options: CornerOptions,
    pub image_options: ImageOptions,
    pub qr_options: QrOptions,
}

impl Default for RenderingConfiguration {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            margin: DEFAULT_MARGIN,
            image: None,
            dots_options: DotsOptions::default(),
            background_options: BackgroundOptions::default(),
            corners_square_options: CornerOptions::default(),
            corners_dot_options: CornerOptions::default(),
            image_options: ImageOptions::default(),
            qr_options: QrOptions::default(),
        }
    }
}

impl RenderingConfiguration {
    /// Creates the default configuration: 300px, black on white, level M.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets width and height, clamped to [`SIZE_RANGE`].
    pub fn with_size(self, size: u32) -> Self {
        patch_section(&self, Section::Size(size))
    }

    /// Sets the quiet-zone margin, clamped to [`MARGIN_RANGE`].
    pub fn with_margin(self, margin: u32) -> Self {
        patch_section(&self, Section::Margin(margin))
    }

    /// Sets the logo reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Paints dots and both corner layers in `color`.
    pub fn with_foreground(mut self, color: HexColor) -> Self {
        self.dots_options.color = color;
        self.corners_square_options.color = color;
        self.corners_dot_options.color = color;
        self
    }

    pub fn with_background(mut self, color: HexColor) -> Self {
        self.background_options.color = color;
        self
    }

    pub fn with_error_correction(mut self, level: ErrorCorrectionLevel) -> Self {
        self.qr_options.error_correction_level = level;
        self
    }

    /// Side length in pixels.
    pub fn size(&self) -> u32 {
        self.width
    }

    /// Brings every value back inside its bounds. Width wins over a
    /// differing height.
    pub fn normalized(self) -> Self {
        Self::from(PartialConfiguration::from(self))
    }

    /// Serializes the configuration to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the configuration to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a configuration from a JSON string. Missing sections
    /// take their defaults and out-of-range values are clamped.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_json_format() {
        let json = RenderingConfiguration::new().to_json_pretty().unwrap();

        assert!(json.contains("\"cornersSquareOptions\""));
        assert!(json.contains("\"errorCorrectionLevel\": \"M\""));
        assert!(json.contains("\"hideBackgroundDots\": true"));
        assert!(json.contains("\"type\": \"square\""));
        assert!(!json.contains("\"image\""), "absent logo is not serialized");
        assert!(!json.contains("\"gradient\""));
    }

    #[test]
    fn configuration_roundtrip_keeps_custom_styles() {
        let mut config = RenderingConfiguration::new().with_image("https://logo.test/a.png");
        config.dots_options.style = DotStyle::from("hearts");
        config.dots_options.gradient = Some(Gradient::default());

        let restored = RenderingConfiguration::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(restored, config);
        assert_eq!(restored.dots_options.style, DotStyle::Custom("hearts".into()));
    }

    #[test]
    fn empty_json_is_the_default() {
        assert_eq!(
            RenderingConfiguration::from_json("{}").unwrap(),
            RenderingConfiguration::default()
        );
    }

    #[test]
    fn json_input_is_clamped_and_square() {
        let config = RenderingConfiguration::from_json(r#"{"width":5000,"height":10,"margin":900}"#).unwrap();
        assert_eq!((config.width, config.height), (2000, 2000));
        assert_eq!(config.margin, 100);
        assert_eq!(patch(&config, &PartialConfiguration::new()), config);

        let config = RenderingConfiguration::from_json(r#"{"height":10,"image":""}"#).unwrap();
        assert_eq!((config.width, config.height), (50, 50));
        assert_eq!(config.image, None);

        let config = RenderingConfiguration::from_json(
            r##"{"imageOptions":{"margin":99,"imageSize":0.9},"dotsOptions":{"gradient":{"type":"radial","rotation":-90,"colorStops":[{"offset":-1,"color":"#000000"},{"offset":2,"color":"#ffffff"}]}}}"##,
        )
        .unwrap();
        assert_eq!(config.image_options.margin, 30);
        assert_eq!(config.image_options.image_size, 0.5);
        let gradient = config.dots_options.gradient.unwrap();
        assert_eq!(gradient.rotation, 270.0);
        assert_eq!((gradient.color_stops[0].offset, gradient.color_stops[1].offset), (0.0, 1.0));
    }

    #[test]
    fn normalized_matches_patching_the_default() {
        let mut config = RenderingConfiguration::default();
        config.width = 10_000;
        config.height = 7;
        config.margin = 101;
        let normalized = config.normalized();
        assert_eq!((normalized.width, normalized.height, normalized.margin), (2000, 2000, 100));
    }

    #[test]
    fn builders_clamp_and_keep_square() {
        let config = RenderingConfiguration::new().with_size(99_999).with_margin(500);
        assert_eq!((config.width, config.height), (2000, 2000));
        assert_eq!(config.margin, 100);
    }

    #[test]
    fn style_tokens() {
        assert_eq!(DotStyle::from("extra-rounded"), DotStyle::ExtraRounded);
        assert_eq!(CornerStyle::from("dot"), CornerStyle::Dot);
        assert!(!CornerStyle::from("dots").is_known());
        for style in DotStyle::KNOWN {
            assert_eq!(DotStyle::from(style.as_str()), style);
        }
    }

    #[test]
    fn error_correction_letters() {
        assert_eq!("q".parse(), Ok(ErrorCorrectionLevel::Quartile));
        assert_eq!(ErrorCorrectionLevel::High.to_string(), "H");
        assert!("X".parse::<ErrorCorrectionLevel>().is_err());
        assert_eq!(
            serde_json::to_string(&ErrorCorrectionLevel::Low).unwrap(),
            "\"L\""
        );
    }

    #[test]
    fn default_gradient_is_black_to_indigo() {
        let gradient = Gradient::default();
        assert_eq!(gradient.kind, GradientKind::Linear);
        assert_eq!(gradient.color_stops[1].color.to_string(), "#4f46e5");
        let json = serde_json::to_string(&gradient).unwrap();
        assert!(json.contains("\"type\":\"linear\""));
        assert!(json.contains("\"colorStops\""));
    }
}
