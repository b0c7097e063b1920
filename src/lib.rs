//! qrforge: QR payload encoding and rendering configuration
//!
//! This crate turns what a user wants to share (a link, a Wi-Fi network, a
//! contact card, a calendar event, ...) into the exact text stored in a QR
//! symbol, and resolves the visual configuration the symbol is drawn with.
//! Drawing itself is left to an external renderer behind [`RenderAdapter`].
//!
//! # Encoding payloads
//!
//! ```
//! use qrforge::{encode, FieldMap, IntentKind};
//!
//! let fields = FieldMap::new()
//!     .with("networkName", "Cafe")
//!     .with("password", "secret");
//! assert_eq!(encode(IntentKind::Wifi, &fields), "WIFI:T:WPA;S:Cafe;P:secret;H:false;;");
//! ```
//!
//! # Resolving query requests
//!
//! A request URL carries both the content and the styling. Invalid values
//! are replaced by defaults and reported as warnings; only missing content
//! blocks rendering.
//!
//! ```
//! use qrforge::{resolve, IssueCode, RawParameterBag};
//!
//! let resolution = resolve(&RawParameterBag::from_query("?type=sms&phone=555&message=hi&margin=abc"));
//! assert_eq!(resolution.payload.as_deref(), Some("sms:555?body=hi"));
//! assert!(resolution.warnings().any(|issue| issue.code == IssueCode::InvalidNumber));
//!
//! let empty = resolve(&RawParameterBag::from_query("type=url"));
//! assert!(empty.is_blocked());
//! ```
//!
//! # Patching configurations
//!
//! ```
//! use qrforge::{patch, PartialConfiguration, RenderingConfiguration};
//!
//! let current = RenderingConfiguration::default();
//! let partial = PartialConfiguration::from_json(r#"{"width": 5000, "margin": 4}"#).unwrap();
//! let next = patch(&current, &partial);
//! assert_eq!((next.width, next.height, next.margin), (2000, 2000, 4));
//! ```

mod adapter;
pub mod config;
pub mod encode;
mod endpoint;
mod error;
mod generator;
mod intent;
mod preferences;
mod resolve;

#[cfg(feature = "tsify")]
mod wasm;

pub use adapter::{logo_data_url, Clipboard, ExportFormat, RenderAdapter};
pub use config::{
    merge_gradient, patch, patch_section, BackgroundOptions, ColorStop, CornerOptions, CornerStyle,
    DotStyle, DotsOptions, ErrorCorrectionLevel, Gradient, GradientKind, GradientPatch, HexColor,
    ImageOptions, PartialConfiguration, QrOptions, RenderingConfiguration, Section,
};
pub use encode::{encode, encode_intent, Encoder};
pub use endpoint::{
    download as download_resolution, run_query, serve_query, EndpointOutcome, QueryEndpoint,
    AUTO_DOWNLOAD_SETTLE,
};
pub use error::{
    ExportError, LogoError, ParseFormatError, ParseKindError, ParseLevelError, ParseThemeError,
    PreferenceError,
};
pub use generator::{QrGenerator, Tracked, PLACEHOLDER_PAYLOAD};
pub use intent::{
    BitcoinFields, ContactFields, EmailFields, EventFields, FieldMap, FieldSource, FieldValue,
    GeoFields, Intent, IntentKind, MessageFields, PhoneFields, TextFields, TwitterFields,
    UrlFields, UsernameFields, Vocabulary, WifiFields,
};
pub use preferences::{
    find_locale, match_locale, negotiate_locale, JsonFileStore, Locale, MemoryStore,
    PreferenceStore, Preferences, TextDirection, Theme, LOCALES,
};
pub use resolve::{
    resolve, Issue, IssueCode, RawParameterBag, Resolution, Resolver, Severity, GENERATE_PATH,
    MISSING_DATA_MESSAGE,
};
