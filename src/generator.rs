//! Editor session: the state behind an interactive QR editor.
//!
//! [`QrGenerator`] owns the intent being edited, the rendering
//! configuration and a [`RenderAdapter`]. Every piece of state carries a
//! version counter; [`sync`](QrGenerator::sync) pushes to the renderer only
//! when one of them moved since the last successful push.
//!
//! # Example
//!
//! ```no_run
//! use qrforge::{ExportFormat, IntentKind, QrGenerator, RenderAdapter};
//! # fn demo<A: RenderAdapter>(renderer: A) {
//! let mut generator = QrGenerator::new(renderer);
//!
//! generator.set_kind(IntentKind::Wifi);
//! generator.set_field("networkName", "Cafe");
//! generator.set_field("hidden", true);
//! generator.sync();
//!
//! generator.download(ExportFormat::Svg);
//! # }
//! ```

use crate::adapter::{logo_data_url, Clipboard, ExportFormat, RenderAdapter};
use crate::config::{
    merge_gradient, patch, patch_section, GradientPatch, PartialConfiguration, RenderingConfiguration,
    Section,
};
use crate::encode::Encoder;
use crate::error::LogoError;
use crate::intent::{FieldMap, FieldValue, IntentKind};

/// Pushed to the renderer while the editor's payload is empty.
pub const PLACEHOLDER_PAYLOAD: &str = "https://example.com";

/// Base file name for editor downloads.
pub const DOWNLOAD_NAME: &str = "qr-code";

// ============================================================================
// Tracked
// ============================================================================

/// A value with a version number that increments on every real change.
#[derive(Debug, Clone, Default)]
pub struct Tracked<T> {
    value: T,
    version: u64,
}

impl<T: PartialEq> Tracked<T> {
    pub fn new(value: T) -> Self {
        Self { value, version: 0 }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Returns the current version number.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replaces the value. Returns true if it changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.version = self.version.wrapping_add(1);
        true
    }

    /// Mutates the value in place, bumping the version when `edit` reports
    /// a change.
    pub fn edit(&mut self, edit: impl FnOnce(&mut T) -> bool) -> bool {
        let changed = edit(&mut self.value);
        if changed {
            self.version = self.version.wrapping_add(1);
        }
        changed
    }
}

// ============================================================================
// QrGenerator
// ============================================================================

/// Editor session over a renderer `A`.
pub struct QrGenerator<A: RenderAdapter> {
    encoder: Encoder,
    kind: Tracked<IntentKind>,
    fields: Tracked<FieldMap>,
    configuration: Tracked<RenderingConfiguration>,
    adapter: A,
    /// Combined version of the last state the renderer accepted.
    rendered: Option<u64>,
}

impl<A: RenderAdapter> QrGenerator<A> {
    /// Creates a session editing an empty link with the default configuration.
    pub fn new(adapter: A) -> Self {
        Self {
            encoder: Encoder::default(),
            kind: Tracked::new(IntentKind::default()),
            fields: Tracked::new(FieldMap::new()),
            configuration: Tracked::new(RenderingConfiguration::default()),
            adapter,
            rendered: None,
        }
    }

    /// Uses `encoder` for payloads (e.g. to read event dates in local time).
    pub fn with_encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = encoder;
        self.rendered = None;
        self
    }

    pub fn kind(&self) -> IntentKind {
        *self.kind.get()
    }

    pub fn fields(&self) -> &FieldMap {
        self.fields.get()
    }

    pub fn configuration(&self) -> &RenderingConfiguration {
        self.configuration.get()
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn into_adapter(self) -> A {
        self.adapter
    }

    // ---- Intent ----

    /// Switches the intent kind. Entered fields are kept, so switching back
    /// restores them.
    pub fn set_kind(&mut self, kind: IntentKind) -> bool {
        self.kind.set(kind)
    }

    /// Sets one field. Returns true if the stored value changed.
    pub fn set_field(&mut self, key: &str, value: impl Into<FieldValue>) -> bool {
        let value = value.into();
        self.fields.edit(|fields| fields.set(key, value))
    }

    pub fn clear_field(&mut self, key: &str) -> bool {
        self.fields.edit(|fields| fields.remove(key))
    }

    /// Replaces every field at once.
    pub fn set_fields(&mut self, fields: FieldMap) -> bool {
        self.fields.set(fields)
    }

    /// The payload for the current kind and fields. May be empty.
    pub fn payload(&self) -> String {
        self.encoder.encode_fields(self.kind(), self.fields())
    }

    // ---- Configuration ----

    /// Shallow-merges `partial` into the configuration.
    pub fn patch(&mut self, partial: &PartialConfiguration) -> bool {
        let next = patch(self.configuration.get(), partial);
        self.configuration.set(next)
    }

    pub fn patch_section(&mut self, section: Section) -> bool {
        let next = patch_section(self.configuration.get(), section);
        self.configuration.set(next)
    }

    /// Replaces the whole configuration, e.g. one restored from JSON.
    /// Values are brought back inside their bounds.
    pub fn set_configuration(&mut self, configuration: RenderingConfiguration) -> bool {
        self.configuration.set(configuration.normalized())
    }

    /// Turns the dots gradient on (with defaults) or off.
    pub fn set_gradient_enabled(&mut self, enabled: bool) -> bool {
        let mut dots = self.configuration().dots_options.clone();
        let current = dots.gradient.take();
        dots.gradient = enabled.then(|| merge_gradient(current.as_ref(), &GradientPatch::default()));
        self.patch_section(Section::Dots(dots))
    }

    /// Deep-merges a gradient change, enabling the gradient if needed.
    pub fn update_gradient(&mut self, update: &GradientPatch) -> bool {
        let mut dots = self.configuration().dots_options.clone();
        dots.gradient = Some(merge_gradient(dots.gradient.as_ref(), update));
        self.patch_section(Section::Dots(dots))
    }

    /// Uses uploaded image bytes as the logo.
    pub fn set_logo_bytes(&mut self, bytes: &[u8]) -> Result<bool, LogoError> {
        let url = logo_data_url(bytes)?;
        Ok(self.patch_section(Section::Image(Some(url))))
    }

    pub fn remove_logo(&mut self) -> bool {
        self.patch_section(Section::Image(None))
    }

    // ---- Rendering ----

    fn state_version(&self) -> u64 {
        [self.kind.version(), self.fields.version(), self.configuration.version()]
            .iter()
            .fold(0u64, |acc, v| acc.wrapping_add(*v))
    }

    /// Whether the renderer is behind the session state.
    pub fn is_dirty(&self) -> bool {
        self.rendered != Some(self.state_version())
    }

    /// Pushes payload and configuration to the renderer if anything changed.
    ///
    /// An empty payload is replaced by [`PLACEHOLDER_PAYLOAD`]. Returns
    /// false only when the renderer rejected the update.
    pub fn sync(&mut self) -> bool {
        if !self.is_dirty() {
            return true;
        }
        let payload = self.payload();
        let payload = if payload.is_empty() {
            PLACEHOLDER_PAYLOAD
        } else {
            payload.as_str()
        };
        match self.adapter.update(payload, self.configuration.get()) {
            Ok(()) => {
                self.rendered = Some(self.state_version());
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "renderer rejected update");
                false
            }
        }
    }

    /// Saves the current symbol as `qr-code.<format>`.
    pub fn download(&mut self, format: ExportFormat) -> bool {
        if !self.sync() {
            return false;
        }
        match self.adapter.download(DOWNLOAD_NAME, format) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, %format, "download failed");
                false
            }
        }
    }

    /// Copies the current symbol to `clipboard` as PNG.
    pub fn copy_to_clipboard(&mut self, clipboard: &mut dyn Clipboard) -> bool {
        if !self.sync() {
            return false;
        }
        let format = ExportFormat::Png;
        let copied = self
            .adapter
            .raw_data(format)
            .and_then(|bytes| clipboard.write_image(format.mime_type(), &bytes));
        match copied {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "failed to copy");
                false
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::tests::RecordingAdapter;
    use crate::config::{DotStyle, DotsOptions, GradientKind, HexColor};
    use crate::error::ExportError;

    #[derive(Default)]
    struct MemoryClipboard {
        written: Option<(String, Vec<u8>)>,
    }

    impl Clipboard for MemoryClipboard {
        fn write_image(&mut self, mime_type: &str, bytes: &[u8]) -> Result<(), ExportError> {
            self.written = Some((mime_type.to_owned(), bytes.to_vec()));
            Ok(())
        }
    }

    #[test]
    fn tracked_bumps_only_on_change() {
        let mut tracked = Tracked::new(1);
        assert!(!tracked.set(1));
        assert_eq!(tracked.version(), 0);
        assert!(tracked.set(2));
        assert_eq!(tracked.version(), 1);
        assert!(!tracked.edit(|_| false));
        assert_eq!(tracked.version(), 1);
    }

    #[test]
    fn empty_payload_renders_placeholder() {
        let mut generator = QrGenerator::new(RecordingAdapter::default());
        assert!(generator.sync());
        assert_eq!(generator.adapter().updates[0].0, PLACEHOLDER_PAYLOAD);
        assert_eq!(generator.payload(), "");
    }

    #[test]
    fn sync_skips_unchanged_state() {
        let mut generator = QrGenerator::new(RecordingAdapter::default());
        generator.set_field("url", "https://a.test");
        generator.sync();
        generator.sync();
        assert!(!generator.set_field("url", "https://a.test"));
        generator.sync();
        assert_eq!(generator.adapter().updates.len(), 1);

        generator.set_field("url", "https://b.test");
        assert!(generator.is_dirty());
        generator.sync();
        let updates = &generator.adapter().updates;
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1].0, "https://b.test");
    }

    #[test]
    fn switching_kind_keeps_fields() {
        let mut generator = QrGenerator::new(RecordingAdapter::default());
        generator.set_field("url", "https://a.test");
        generator.set_field("text", "hello");
        generator.set_kind(IntentKind::Text);
        assert_eq!(generator.payload(), "hello");
        generator.set_kind(IntentKind::Link);
        assert_eq!(generator.payload(), "https://a.test");
        assert!(generator.clear_field("url"));
        assert_eq!(generator.payload(), "");
    }

    #[test]
    fn every_update_carries_the_full_configuration() {
        let mut generator = QrGenerator::new(RecordingAdapter::default());
        generator.patch_section(Section::Size(640));
        generator.sync();
        generator.patch_section(Section::Margin(4));
        generator.sync();

        let last = &generator.adapter().updates.last().unwrap().1;
        assert_eq!(last.width, 640);
        assert_eq!(last.margin, 4);
    }

    #[test]
    fn replacing_dots_drops_gradient_but_gradient_updates_merge() {
        let mut generator = QrGenerator::new(RecordingAdapter::default());
        assert!(generator.set_gradient_enabled(true));
        generator.update_gradient(&GradientPatch {
            kind: Some(GradientKind::Radial),
            ..Default::default()
        });
        let gradient = generator.configuration().dots_options.gradient.unwrap();
        assert_eq!(gradient.kind, GradientKind::Radial);
        assert_eq!(gradient.color_stops[1].color, HexColor::new(0x4f, 0x46, 0xe5));

        generator.patch(&PartialConfiguration {
            dots_options: Some(DotsOptions {
                style: DotStyle::Dots,
                ..Default::default()
            }),
            ..Default::default()
        });
        assert_eq!(generator.configuration().dots_options.gradient, None);
        assert!(!generator.set_gradient_enabled(false));
    }

    #[test]
    fn logo_upload_and_removal() {
        let mut generator = QrGenerator::new(RecordingAdapter::default());
        assert!(generator.set_logo_bytes(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR").unwrap());
        let image = generator.configuration().image.clone().unwrap();
        assert!(image.starts_with("data:image/png;base64,"));
        assert!(generator.set_logo_bytes(b"").is_err());
        assert!(generator.remove_logo());
        assert_eq!(generator.configuration().image, None);
    }

    #[test]
    fn restored_configuration_is_clamped() {
        let mut generator = QrGenerator::new(RecordingAdapter::default());
        let mut restored = RenderingConfiguration::default();
        restored.width = 9000;
        restored.height = 12;
        restored.image_options.image_size = 3.0;
        assert!(generator.set_configuration(restored));
        let config = generator.configuration();
        assert_eq!((config.width, config.height), (2000, 2000));
        assert_eq!(config.image_options.image_size, 0.5);
    }

    #[test]
    fn download_uses_editor_name() {
        let mut generator = QrGenerator::new(RecordingAdapter::default());
        generator.set_field("url", "https://a.test");
        assert!(generator.download(ExportFormat::Svg));
        let adapter = generator.adapter();
        assert_eq!(adapter.updates.len(), 1, "download syncs first");
        assert_eq!(adapter.downloads, [(DOWNLOAD_NAME.to_owned(), ExportFormat::Svg)]);
    }

    #[test]
    fn failures_become_false() {
        let mut generator = QrGenerator::new(RecordingAdapter {
            fail_downloads: true,
            ..Default::default()
        });
        assert!(!generator.download(ExportFormat::Png));

        generator.adapter_mut().fail_updates = true;
        generator.set_field("url", "https://a.test");
        assert!(!generator.sync());
        assert!(generator.is_dirty());
    }

    #[test]
    fn copy_writes_png_to_clipboard() {
        let mut generator = QrGenerator::new(RecordingAdapter::default());
        let mut clipboard = MemoryClipboard::default();
        assert!(generator.copy_to_clipboard(&mut clipboard));
        let (mime, bytes) = clipboard.written.unwrap();
        assert_eq!(mime, "image/png");
        assert!(bytes.starts_with(b"\x89PNG"));
    }
}
