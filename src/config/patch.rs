//! Section-wise updates to a [`RenderingConfiguration`].
//!
//! Merging is shallow: a section present in the update replaces the whole
//! section in the current configuration. Replacing `dotsOptions` therefore
//! drops an existing gradient unless the new section carries one. The
//! gradient has its own deep merge, [`merge_gradient`].

use serde::{Deserialize, Deserializer, Serialize};

use super::{
    BackgroundOptions, CornerOptions, DotsOptions, Gradient, GradientKind, HexColor, ImageOptions,
    QrOptions, RenderingConfiguration, DEFAULT_LOGO_SIZE, LOGO_MARGIN_RANGE, LOGO_SIZE_RANGE,
    MARGIN_RANGE, SIZE_RANGE,
};

// ============================================================================
// Section
// ============================================================================

/// One top-level section of a configuration, carrying its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// Width and height together.
    Size(u32),
    Margin(u32),
    /// Logo reference; `None` removes the logo.
    Image(Option<String>),
    Dots(DotsOptions),
    Background(BackgroundOptions),
    CornersSquare(CornerOptions),
    CornersDot(CornerOptions),
    ImageOptions(ImageOptions),
    Qr(QrOptions),
}

/// Returns `current` with one section replaced. Numeric values are clamped
/// to their bounds and the gradient rotation is normalized.
pub fn patch_section(current: &RenderingConfiguration, section: Section) -> RenderingConfiguration {
    let mut next = current.clone();
    match section {
        Section::Size(size) => {
            let size = size.clamp(*SIZE_RANGE.start(), *SIZE_RANGE.end());
            next.width = size;
            next.height = size;
        }
        Section::Margin(margin) => {
            next.margin = margin.clamp(*MARGIN_RANGE.start(), *MARGIN_RANGE.end());
        }
        Section::Image(image) => next.image = image.filter(|image| !image.is_empty()),
        Section::Dots(mut dots) => {
            dots.gradient = dots.gradient.map(normalize_gradient);
            next.dots_options = dots;
        }
        Section::Background(background) => next.background_options = background,
        Section::CornersSquare(corners) => next.corners_square_options = corners,
        Section::CornersDot(corners) => next.corners_dot_options = corners,
        Section::ImageOptions(options) => next.image_options = clamp_image_options(options),
        Section::Qr(qr) => next.qr_options = qr,
    }
    next
}

fn clamp_image_options(mut options: ImageOptions) -> ImageOptions {
    options.margin = options
        .margin
        .clamp(*LOGO_MARGIN_RANGE.start(), *LOGO_MARGIN_RANGE.end());
    options.image_size = if options.image_size.is_finite() {
        options
            .image_size
            .clamp(*LOGO_SIZE_RANGE.start(), *LOGO_SIZE_RANGE.end())
    } else {
        DEFAULT_LOGO_SIZE
    };
    options
}

fn normalize_gradient(mut gradient: Gradient) -> Gradient {
    let rotation = if gradient.rotation.is_finite() {
        gradient.rotation.rem_euclid(360.0)
    } else {
        0.0
    };
    // rem_euclid rounds tiny negative angles up to exactly 360.0
    gradient.rotation = if rotation >= 360.0 { 0.0 } else { rotation };
    for stop in &mut gradient.color_stops {
        stop.offset = if stop.offset.is_finite() {
            stop.offset.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }
    gradient
}

// ============================================================================
// PartialConfiguration
// ============================================================================

/// A configuration update where every top-level section is optional.
///
/// `image` distinguishes "leave as is" (absent) from "remove the logo"
/// (`null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct PartialConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<u32>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "jsonschema", schemars(with = "Option<String>"))]
    pub image: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dots_options: Option<DotsOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_options: Option<BackgroundOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corners_square_options: Option<CornerOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corners_dot_options: Option<CornerOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_options: Option<ImageOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_options: Option<QrOptions>,
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl PartialConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a partial from a single section.
    pub fn from_section(section: Section) -> Self {
        let mut partial = Self::default();
        match section {
            Section::Size(size) => {
                partial.width = Some(size);
                partial.height = Some(size);
            }
            Section::Margin(margin) => partial.margin = Some(margin),
            Section::Image(image) => partial.image = Some(image),
            Section::Dots(dots) => partial.dots_options = Some(dots),
            Section::Background(background) => partial.background_options = Some(background),
            Section::CornersSquare(corners) => partial.corners_square_options = Some(corners),
            Section::CornersDot(corners) => partial.corners_dot_options = Some(corners),
            Section::ImageOptions(options) => partial.image_options = Some(options),
            Section::Qr(qr) => partial.qr_options = Some(qr),
        }
        partial
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// The sections this partial replaces, in declaration order.
    ///
    /// Width and height collapse into one [`Section::Size`]; width wins
    /// when both are given and differ.
    pub fn sections(&self) -> Vec<Section> {
        let mut sections = Vec::new();
        if let Some(size) = self.width.or(self.height) {
            sections.push(Section::Size(size));
        }
        if let Some(margin) = self.margin {
            sections.push(Section::Margin(margin));
        }
        if let Some(image) = &self.image {
            sections.push(Section::Image(image.clone()));
        }
        if let Some(dots) = &self.dots_options {
            sections.push(Section::Dots(dots.clone()));
        }
        if let Some(background) = self.background_options {
            sections.push(Section::Background(background));
        }
        if let Some(corners) = &self.corners_square_options {
            sections.push(Section::CornersSquare(corners.clone()));
        }
        if let Some(corners) = &self.corners_dot_options {
            sections.push(Section::CornersDot(corners.clone()));
        }
        if let Some(options) = &self.image_options {
            sections.push(Section::ImageOptions(options.clone()));
        }
        if let Some(qr) = self.qr_options {
            sections.push(Section::Qr(qr));
        }
        sections
    }

    /// Deserializes a partial from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<RenderingConfiguration> for PartialConfiguration {
    /// Every section present, as a full replacement.
    fn from(configuration: RenderingConfiguration) -> Self {
        Self {
            width: Some(configuration.width),
            height: Some(configuration.height),
            margin: Some(configuration.margin),
            image: Some(configuration.image),
            dots_options: Some(configuration.dots_options),
            background_options: Some(configuration.background_options),
            corners_square_options: Some(configuration.corners_square_options),
            corners_dot_options: Some(configuration.corners_dot_options),
            image_options: Some(configuration.image_options),
            qr_options: Some(configuration.qr_options),
        }
    }
}

impl From<PartialConfiguration> for RenderingConfiguration {
    /// The defaults patched with `partial`.
    fn from(partial: PartialConfiguration) -> Self {
        patch(&RenderingConfiguration::default(), &partial)
    }
}

/// Returns `current` with every section present in `partial` replaced.
///
/// Patching with an empty partial returns `current` unchanged.
pub fn patch(current: &RenderingConfiguration, partial: &PartialConfiguration) -> RenderingConfiguration {
    partial
        .sections()
        .into_iter()
        .fold(current.clone(), |config, section| patch_section(&config, section))
}

// ============================================================================
// Gradient merge
// ============================================================================

/// A field-wise gradient update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GradientPatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<GradientKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<HexColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<HexColor>,
}

/// Deep-merges `update` into `current`, starting from the default gradient
/// when there is none. Untouched fields keep their value.
pub fn merge_gradient(current: Option<&Gradient>, update: &GradientPatch) -> Gradient {
    let mut gradient = current.copied().unwrap_or_default();
    if let Some(kind) = update.kind {
        gradient.kind = kind;
    }
    if let Some(rotation) = update.rotation {
        gradient.rotation = rotation;
    }
    if let Some(start) = update.start {
        gradient.color_stops[0].color = start;
    }
    if let Some(end) = update.end {
        gradient.color_stops[1].color = end;
    }
    normalize_gradient(gradient)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CornerStyle, DotStyle, ErrorCorrectionLevel};
    use proptest::prelude::*;

    #[test]
    fn empty_partial_is_identity() {
        let config = RenderingConfiguration::new().with_image("logo.png").with_size(640);
        assert!(PartialConfiguration::new().is_empty());
        assert_eq!(patch(&config, &PartialConfiguration::new()), config);
    }

    #[test]
    fn replacing_dots_drops_the_gradient() {
        let mut config = RenderingConfiguration::new();
        config.dots_options.gradient = Some(Gradient::default());

        let partial = PartialConfiguration {
            dots_options: Some(DotsOptions {
                style: DotStyle::Rounded,
                ..Default::default()
            }),
            ..Default::default()
        };
        let next = patch(&config, &partial);
        assert_eq!(next.dots_options.style, DotStyle::Rounded);
        assert_eq!(next.dots_options.gradient, None);
        assert_eq!(next.background_options, config.background_options);
    }

    #[test]
    fn size_keeps_width_and_height_equal() {
        let config = RenderingConfiguration::new();
        let partial = PartialConfiguration {
            height: Some(10),
            ..Default::default()
        };
        let next = patch(&config, &partial);
        assert_eq!((next.width, next.height), (50, 50));

        let next = patch_section(&config, Section::Size(4000));
        assert_eq!((next.width, next.height), (2000, 2000));
    }

    #[test]
    fn logo_options_are_clamped() {
        let config = patch_section(
            &RenderingConfiguration::new(),
            Section::ImageOptions(ImageOptions {
                margin: 90,
                image_size: 0.9,
                ..Default::default()
            }),
        );
        assert_eq!(config.image_options.margin, 30);
        assert_eq!(config.image_options.image_size, 0.5);

        let config = patch_section(
            &config,
            Section::ImageOptions(ImageOptions {
                image_size: f32::NAN,
                ..Default::default()
            }),
        );
        assert_eq!(config.image_options.image_size, DEFAULT_LOGO_SIZE);
    }

    #[test]
    fn image_null_removes_the_logo() {
        let config = RenderingConfiguration::new().with_image("logo.png");

        let keep = PartialConfiguration::from_json(r#"{"margin": 4}"#).unwrap();
        assert_eq!(keep.image, None);
        assert_eq!(patch(&config, &keep).image.as_deref(), Some("logo.png"));

        let remove = PartialConfiguration::from_json(r#"{"image": null}"#).unwrap();
        assert_eq!(remove.image, Some(None));
        assert_eq!(patch(&config, &remove).image, None);
    }

    #[test]
    fn partial_json_uses_camel_case_sections() {
        let partial = PartialConfiguration::from_json(
            r##"{"cornersDotOptions": {"color": "#ff0000", "type": "dot"},
                 "qrOptions": {"errorCorrectionLevel": "H"}}"##,
        )
        .unwrap();
        let next = patch(&RenderingConfiguration::new(), &partial);
        assert_eq!(next.corners_dot_options.style, CornerStyle::Dot);
        assert_eq!(next.corners_dot_options.color.to_string(), "#ff0000");
        assert_eq!(next.corners_square_options, CornerOptions::default());
        assert_eq!(next.qr_options.error_correction_level, ErrorCorrectionLevel::High);
    }

    #[test]
    fn from_section_roundtrips_through_patch() {
        let config = RenderingConfiguration::new();
        let section = Section::Background(BackgroundOptions {
            color: HexColor::new(1, 2, 3),
        });
        assert_eq!(
            patch(&config, &PartialConfiguration::from_section(section.clone())),
            patch_section(&config, section)
        );
    }

    #[test]
    fn gradient_merge_is_deep() {
        let start = merge_gradient(None, &GradientPatch::default());
        assert_eq!(start, Gradient::default());

        let rotated = merge_gradient(
            Some(&start),
            &GradientPatch {
                rotation: Some(-90.0),
                ..Default::default()
            },
        );
        assert_eq!(rotated.rotation, 270.0);
        assert_eq!(rotated.color_stops, start.color_stops);

        let recolored = merge_gradient(
            Some(&rotated),
            &GradientPatch {
                kind: Some(GradientKind::Radial),
                end: Some(HexColor::white()),
                ..Default::default()
            },
        );
        assert_eq!(recolored.kind, GradientKind::Radial);
        assert_eq!(recolored.rotation, 270.0);
        assert_eq!(recolored.color_stops[0].color, HexColor::black());
        assert_eq!(recolored.color_stops[1].color, HexColor::white());
    }

    proptest! {
        #[test]
        fn patched_sizes_stay_in_bounds(size in any::<u32>(), margin in any::<u32>()) {
            let config = patch(
                &RenderingConfiguration::new(),
                &PartialConfiguration {
                    width: Some(size),
                    margin: Some(margin),
                    ..Default::default()
                },
            );
            prop_assert!(SIZE_RANGE.contains(&config.width));
            prop_assert_eq!(config.width, config.height);
            prop_assert!(MARGIN_RANGE.contains(&config.margin));
        }

        #[test]
        fn gradient_rotation_is_normalized(rotation in -10_000.0f32..10_000.0) {
            let gradient = merge_gradient(None, &GradientPatch {
                rotation: Some(rotation),
                ..Default::default()
            });
            prop_assert!((0.0..360.0).contains(&gradient.rotation));
        }
    }
}
