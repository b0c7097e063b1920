//! Payload encoding: the exact text placed into the QR symbol.
//!
//! Encoding is a pure read of an [`Intent`]. It never fails: absent fields
//! become empty strings or a documented default, and a blank payload is a
//! valid (if useless) result.
//!
//! Only values in a query-string position (subject, body, message, label,
//! tweet text) are percent-encoded. Path segments and structured fields
//! (names, dates, phone digits) are emitted verbatim.
//!
//! # Example
//!
//! ```
//! use qrforge::{encode, FieldMap, IntentKind};
//!
//! let fields = FieldMap::new()
//!     .with("email", "a@b.com")
//!     .with("subject", "Hi there");
//!
//! assert_eq!(encode(IntentKind::Email, &fields), "mailto:a@b.com?subject=Hi%20there");
//! ```

mod calendar;
mod contact;
mod uri;

pub use calendar::format_event_date;

use std::borrow::Cow;

use chrono::{FixedOffset, Offset, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::intent::{FieldMap, Intent, IntentKind, WifiFields};

/// Default WiFi authentication type when none is given.
pub const DEFAULT_WIFI_ENCRYPTION: &str = "WPA";

/// Platform home pages used when a profile-style URL is absent.
pub const FACEBOOK_HOME: &str = "https://facebook.com";
pub const YOUTUBE_HOME: &str = "https://youtube.com";
pub const LINKEDIN_HOME: &str = "https://linkedin.com";
pub const SPOTIFY_HOME: &str = "https://open.spotify.com";

// ============================================================================
// Encoder
// ============================================================================

/// Stateless payload encoder.
///
/// The only setting is the UTC offset used to interpret event dates entered
/// as local wall-clock time without an explicit offset. It defaults to UTC so
/// that output never depends on the machine the encoder runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoder {
    local_offset: FixedOffset,
}

impl Default for Encoder {
    fn default() -> Self {
        Self {
            local_offset: Utc.fix(),
        }
    }
}

impl Encoder {
    /// Creates an encoder that reads offset-less dates as UTC.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder that reads offset-less dates in `offset`.
    pub fn with_local_offset(offset: FixedOffset) -> Self {
        Self {
            local_offset: offset,
        }
    }

    pub fn local_offset(&self) -> FixedOffset {
        self.local_offset
    }

    /// Encodes a typed intent.
    pub fn encode(&self, intent: &Intent) -> String {
        match intent {
            Intent::Link(link) => link.url.clone(),
            Intent::Text(text) => text.text.clone(),
            Intent::Email(email) => uri::mailto(email),
            Intent::Phone(phone) => format!("tel:{}", phone.phone),
            Intent::Sms(sms) => uri::sms(sms),
            Intent::Wifi(wifi) => wifi_config(wifi),
            Intent::Vcard(card) => contact::vcard(card),
            Intent::Event(event) => calendar::vevent(event, self.local_offset),
            Intent::Geo(geo) => uri::geo(geo),
            Intent::Whatsapp(chat) => uri::whatsapp(chat),
            Intent::Bitcoin(payment) => uri::bitcoin(payment),
            Intent::Twitter(twitter) => uri::twitter(twitter),
            Intent::Instagram(profile) => uri::instagram(profile),
            Intent::Facebook(profile) => or_home(&profile.url, FACEBOOK_HOME),
            Intent::Youtube(video) => or_home(&video.url, YOUTUBE_HOME),
            Intent::Linkedin(profile) => or_home(&profile.url, LINKEDIN_HOME),
            Intent::Spotify(track) => or_home(&track.url, SPOTIFY_HOME),
        }
    }

    /// Encodes the editor's field map for `kind`.
    pub fn encode_fields(&self, kind: IntentKind, fields: &FieldMap) -> String {
        self.encode(&Intent::from_fields(kind, fields))
    }
}

/// Encodes the editor's field map for `kind` with the default encoder.
pub fn encode(kind: IntentKind, fields: &FieldMap) -> String {
    Encoder::default().encode_fields(kind, fields)
}

/// Encodes a typed intent with the default encoder.
pub fn encode_intent(intent: &Intent) -> String {
    Encoder::default().encode(intent)
}

// ============================================================================
// Shared rules
// ============================================================================

/// `WIFI:T:<auth>;S:<ssid>;P:<password>;H:<hidden>;;`
///
/// Field order and the trailing `;;` are fixed by the join-network format.
fn wifi_config(wifi: &WifiFields) -> String {
    let encryption = if wifi.encryption.is_empty() {
        DEFAULT_WIFI_ENCRYPTION
    } else {
        &wifi.encryption
    };
    format!(
        "WIFI:T:{};S:{};P:{};H:{};;",
        encryption, wifi.ssid, wifi.password, wifi.hidden
    )
}

fn or_home(url: &str, home: &str) -> String {
    if url.is_empty() {
        home.to_owned()
    } else {
        url.to_owned()
    }
}

/// Characters left alone by `encodeURIComponent`: alphanumerics plus
/// `- _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes a query value byte-for-byte like `encodeURIComponent`.
pub(crate) fn encode_component(value: &str) -> Cow<'_, str> {
    utf8_percent_encode(value, COMPONENT).into()
}

/// `key=value` pairs appended after `?`, present values only.
#[derive(Debug, Default)]
struct QueryTail(Vec<String>);

impl QueryTail {
    /// Adds a value verbatim.
    fn raw(mut self, key: &str, value: &str) -> Self {
        if !value.is_empty() {
            self.0.push(format!("{key}={value}"));
        }
        self
    }

    /// Adds a percent-encoded value.
    fn escaped(self, key: &str, value: &str) -> Self {
        if value.is_empty() {
            return self;
        }
        self.raw(key, &encode_component(value))
    }

    fn append_to(self, mut base: String) -> String {
        if !self.0.is_empty() {
            base.push('?');
            base.push_str(&self.0.join("&"));
        }
        base
    }
}

// ============================================================================
// Tests
// ============================================================================
