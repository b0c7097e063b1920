//! Intent kinds, field maps and the typed record each kind reads.
//!
//! An [`Intent`] is a tagged union: one variant per [`IntentKind`], each
//! carrying a record of named fields. Every field is optional and an empty
//! string means "absent". Records are built from a [`FieldSource`] through a
//! fixed table of per-kind readers, so the same encoding rules serve both the
//! editor's [`FieldMap`] and a raw query-parameter bag.
//!
//! # Example
//!
//! ```
//! use qrforge::{FieldMap, Intent, IntentKind};
//!
//! let fields = FieldMap::new()
//!     .with("networkName", "Home")
//!     .with("hidden", true);
//!
//! let intent = Intent::from_fields(IntentKind::Wifi, &fields);
//! assert_eq!(intent.kind(), IntentKind::Wifi);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseKindError;

// ============================================================================
// IntentKind
// ============================================================================

/// The closed set of things a QR payload can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
pub enum IntentKind {
    #[default]
    Link,
    Text,
    Email,
    Phone,
    Sms,
    Wifi,
    Vcard,
    Event,
    #[serde(rename = "location", alias = "geo")]
    #[cfg_attr(feature = "clap", value(name = "location", alias = "geo"))]
    Geo,
    Whatsapp,
    Bitcoin,
    Twitter,
    Facebook,
    Instagram,
    Youtube,
    Linkedin,
    Spotify,
}

impl IntentKind {
    /// Number of intent kinds.
    pub const COUNT: usize = 17;

    /// Every kind, in declaration order (the order of [`index`](Self::index)).
    pub const ALL: [IntentKind; Self::COUNT] = [
        Self::Link,
        Self::Text,
        Self::Email,
        Self::Phone,
        Self::Sms,
        Self::Wifi,
        Self::Vcard,
        Self::Event,
        Self::Geo,
        Self::Whatsapp,
        Self::Bitcoin,
        Self::Twitter,
        Self::Facebook,
        Self::Instagram,
        Self::Youtube,
        Self::Linkedin,
        Self::Spotify,
    ];

    /// Position of this kind in [`ALL`](Self::ALL) and in the reader table.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The external token for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Text => "text",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Sms => "sms",
            Self::Wifi => "wifi",
            Self::Vcard => "vcard",
            Self::Event => "event",
            Self::Geo => "location",
            Self::Whatsapp => "whatsapp",
            Self::Bitcoin => "bitcoin",
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::Youtube => "youtube",
            Self::Linkedin => "linkedin",
            Self::Spotify => "spotify",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentKind {
    type Err = ParseKindError;

    /// Parses a kind token. Accepts `url` for link, `tel` for phone and
    /// `geo` for location, ignoring ASCII case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        let kind = match token.as_str() {
            "link" | "url" => Self::Link,
            "phone" | "tel" => Self::Phone,
            "location" | "geo" => Self::Geo,
            other => Self::ALL
                .into_iter()
                .find(|kind| kind.as_str() == other)
                .ok_or_else(|| ParseKindError(s.to_owned()))?,
        };
        Ok(kind)
    }
}

// ============================================================================
// FieldMap
// ============================================================================

/// A single editor field value: free text or a switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    /// Text view of the value. A set flag reads as `"true"`, a cleared flag
    /// reads as absent.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Flag(true) => Some("true"),
            Self::Flag(false) => None,
        }
    }

    /// Switch view of the value. Text counts as set only when it is `"true"`.
    pub fn is_set(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Text(text) => text == "true",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// The editor's field-name to value map for the intent being edited.
///
/// Keys form an open vocabulary (`url`, `networkName`, `firstName`, ...);
/// unknown keys are kept but ignored by the encoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct FieldMap(BTreeMap<String, FieldValue>);

impl FieldMap {
    /// Creates an empty field map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a field. Returns true if the stored value changed.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> bool {
        let key = key.into();
        let value = value.into();
        if self.0.get(&key) == Some(&value) {
            return false;
        }
        self.0.insert(key, value);
        true
    }

    /// Removes a field. Returns true if it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.0.remove(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// Text value of a field, `""` when absent.
    pub fn text(&self, key: &str) -> &str {
        self.0.get(key).and_then(FieldValue::as_text).unwrap_or("")
    }

    /// Switch value of a field, `false` when absent.
    pub fn flag(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(FieldValue::is_set)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.set(key, value);
        }
        map
    }
}

// ============================================================================
// FieldSource
// ============================================================================

/// Anything intent fields can be read from.
pub trait FieldSource {
    /// Raw text stored under `key`, if any.
    fn lookup(&self, key: &str) -> Option<&str>;

    /// Whether the switch stored under `key` is on.
    fn is_flag_set(&self, key: &str) -> bool {
        self.lookup(key) == Some("true")
    }
}

impl FieldSource for FieldMap {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    fn is_flag_set(&self, key: &str) -> bool {
        self.flag(key)
    }
}

/// Which key names a [`FieldSource`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocabulary {
    /// Canonical editor keys (`networkName`, `zipCode`, `eventTitle`, ...).
    Editor,
    /// Query-string keys with fallback chains (`ssid`, `zip`, `title`, `data`, ...).
    Query,
}

impl Vocabulary {
    /// First non-empty value among the keys this vocabulary uses for a field.
    fn read(self, source: &dyn FieldSource, editor: &str, query: &[&str]) -> String {
        let keys: &[&str] = match self {
            Self::Editor => std::slice::from_ref(&editor),
            Self::Query => query,
        };
        keys.iter()
            .filter_map(|key| source.lookup(key))
            .find(|value| !value.is_empty())
            .unwrap_or_default()
            .to_owned()
    }
}

// ============================================================================
// Intent records
// ============================================================================

/// A single URL; used by link and the profile-style social kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UrlFields {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextFields {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmailFields {
    pub email: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhoneFields {
    pub phone: String,
}

/// Phone number plus optional message; used by SMS and WhatsApp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MessageFields {
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WifiFields {
    pub ssid: String,
    pub password: String,
    /// `WPA`, `WEP` or `nopass`; empty means `WPA`.
    pub encryption: String,
    pub hidden: bool,
}

/// Contact card fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactFields {
    pub first_name: String,
    pub last_name: String,
    pub organization: String,
    pub title: String,
    pub mobile: String,
    pub work_phone: String,
    pub home_phone: String,
    pub fax: String,
    pub work_email: String,
    pub home_email: String,
    pub website: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub note: String,
}

impl ContactFields {
    /// True if any of the five address parts is non-empty.
    pub fn has_address(&self) -> bool {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.zip_code,
            &self.country,
        ]
        .iter()
        .any(|part| !part.is_empty())
    }
}

/// Calendar event fields. Dates are kept as entered and converted at
/// encoding time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventFields {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeoFields {
    pub latitude: String,
    pub longitude: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BitcoinFields {
    pub address: String,
    /// Decimal BTC amount, emitted unescaped.
    pub amount: String,
    pub label: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TwitterFields {
    pub username: String,
    pub tweet_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UsernameFields {
    pub username: String,
}

// ============================================================================
// Intent
// ============================================================================

/// A typed, partially-filled description of what the QR symbol encodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Intent {
    Link(UrlFields),
    Text(TextFields),
    Email(EmailFields),
    Phone(PhoneFields),
    Sms(MessageFields),
    Wifi(WifiFields),
    Vcard(ContactFields),
    Event(EventFields),
    #[serde(rename = "location", alias = "geo")]
    Geo(GeoFields),
    Whatsapp(MessageFields),
    Bitcoin(BitcoinFields),
    Twitter(TwitterFields),
    Facebook(UrlFields),
    Instagram(UsernameFields),
    Youtube(UrlFields),
    Linkedin(UrlFields),
    Spotify(UrlFields),
}

type Reader = fn(&dyn FieldSource, Vocabulary) -> Intent;

/// Per-kind readers, indexed by [`IntentKind::index`].
const READERS: [Reader; IntentKind::COUNT] = [
    read_link,
    read_text,
    read_email,
    read_phone,
    read_sms,
    read_wifi,
    read_vcard,
    read_event,
    read_geo,
    read_whatsapp,
    read_bitcoin,
    read_twitter,
    read_facebook,
    read_instagram,
    read_youtube,
    read_linkedin,
    read_spotify,
];

impl Intent {
    /// Reads an intent of `kind` from the editor's field map.
    pub fn from_fields(kind: IntentKind, fields: &FieldMap) -> Self {
        Self::from_source(kind, fields, Vocabulary::Editor)
    }

    /// Reads an intent of `kind` from any source using the given vocabulary.
    pub fn from_source(kind: IntentKind, source: &dyn FieldSource, vocabulary: Vocabulary) -> Self {
        READERS[kind.index()](source, vocabulary)
    }

    /// An intent of `kind` with every field absent.
    pub fn empty(kind: IntentKind) -> Self {
        Self::from_fields(kind, &FieldMap::new())
    }

    pub fn kind(&self) -> IntentKind {
        match self {
            Self::Link(_) => IntentKind::Link,
            Self::Text(_) => IntentKind::Text,
            Self::Email(_) => IntentKind::Email,
            Self::Phone(_) => IntentKind::Phone,
            Self::Sms(_) => IntentKind::Sms,
            Self::Wifi(_) => IntentKind::Wifi,
            Self::Vcard(_) => IntentKind::Vcard,
            Self::Event(_) => IntentKind::Event,
            Self::Geo(_) => IntentKind::Geo,
            Self::Whatsapp(_) => IntentKind::Whatsapp,
            Self::Bitcoin(_) => IntentKind::Bitcoin,
            Self::Twitter(_) => IntentKind::Twitter,
            Self::Facebook(_) => IntentKind::Facebook,
            Self::Instagram(_) => IntentKind::Instagram,
            Self::Youtube(_) => IntentKind::Youtube,
            Self::Linkedin(_) => IntentKind::Linkedin,
            Self::Spotify(_) => IntentKind::Spotify,
        }
    }
}

// ============================================================================
// Readers
// ============================================================================

fn read_link(src: &dyn FieldSource, v: Vocabulary) -> Intent {
    Intent::Link(UrlFields {
        url: v.read(src, "url", &["data", "url"]),
    })
}

fn read_text(src: &dyn FieldSource, v: Vocabulary) -> Intent {
    Intent::Text(TextFields {
        text: v.read(src, "text", &["data", "text"]),
    })
}

fn read_email(src: &dyn FieldSource, v: Vocabulary) -> Intent {
    Intent::Email(EmailFields {
        email: v.read(src, "email", &["email", "data"]),
        subject: v.read(src, "subject", &["subject"]),
        body: v.read(src, "body", &["body"]),
    })
}

fn read_phone(src: &dyn FieldSource, v: Vocabulary) -> Intent {
    Intent::Phone(PhoneFields {
        phone: v.read(src, "phone", &["phone", "data"]),
    })
}

fn read_sms(src: &dyn FieldSource, v: Vocabulary) -> Intent {
    Intent::Sms(MessageFields {
        phone: v.read(src, "phone", &["phone", "data"]),
        message: v.read(src, "message", &["message"]),
    })
}

fn read_wifi(src: &dyn FieldSource, v: Vocabulary) -> Intent {
    Intent::Wifi(WifiFields {
        ssid: v.read(src, "networkName", &["ssid", "networkName", "data"]),
        password: v.read(src, "password", &["password"]),
        encryption: v.read(src, "encryption", &["encryption"]),
        hidden: src.is_flag_set("hidden"),
    })
}

fn read_vcard(src: &dyn FieldSource, v: Vocabulary) -> Intent {
    Intent::Vcard(ContactFields {
        first_name: v.read(src, "firstName", &["firstName"]),
        last_name: v.read(src, "lastName", &["lastName"]),
        organization: v.read(src, "organization", &["organization", "org"]),
        title: v.read(src, "title", &["title"]),
        mobile: v.read(src, "mobile", &["mobile"]),
        work_phone: v.read(src, "phone", &["phone"]),
        home_phone: v.read(src, "homePhone", &["homePhone"]),
        fax: v.read(src, "fax", &["fax"]),
        work_email: v.read(src, "email", &["email"]),
        home_email: v.read(src, "emailPersonal", &["emailPersonal"]),
        website: v.read(src, "website", &["website"]),
        street: v.read(src, "street", &["street"]),
        city: v.read(src, "city", &["city"]),
        state: v.read(src, "state", &["state"]),
        zip_code: v.read(src, "zipCode", &["zip", "zipCode"]),
        country: v.read(src, "country", &["country"]),
        note: v.read(src, "note", &["note"]),
    })
}

fn read_event(src: &dyn FieldSource, v: Vocabulary) -> Intent {
    Intent::Event(EventFields {
        title: v.read(src, "eventTitle", &["title", "data"]),
        description: v.read(src, "description", &["description"]),
        location: v.read(src, "location", &["location"]),
        start: v.read(src, "startDate", &["start", "startDate"]),
        end: v.read(src, "endDate", &["end", "endDate"]),
    })
}

fn read_geo(src: &dyn FieldSource, v: Vocabulary) -> Intent {
    Intent::Geo(GeoFields {
        latitude: v.read(src, "latitude", &["lat", "latitude"]),
        longitude: v.read(src, "longitude", &["lng", "longitude"]),
    })
}

fn read_whatsapp(src: &dyn FieldSource, v: Vocabulary) -> Intent {
    Intent::Whatsapp(MessageFields {
        phone: v.read(src, "whatsappNumber", &["phone", "whatsappNumber", "data"]),
        message: v.read(src, "message", &["message"]),
    })
}

fn read_bitcoin(src: &dyn FieldSource, v: Vocabulary) -> Intent {
    Intent::Bitcoin(BitcoinFields {
        address: v.read(src, "bitcoinAddress", &["address", "bitcoinAddress", "data"]),
        amount: v.read(src, "amount", &["amount"]),
        label: v.read(src, "label", &["label"]),
        message: v.read(src, "message", &["message"]),
    })
}

fn read_twitter(src: &dyn FieldSource, v: Vocabulary) -> Intent {
    Intent::Twitter(TwitterFields {
        username: v.read(src, "username", &["username", "data"]),
        tweet_text: v.read(src, "tweetText", &["tweetText", "text"]),
    })
}

fn read_instagram(src: &dyn FieldSource, v: Vocabulary) -> Intent {
    Intent::Instagram(UsernameFields {
        username: v.read(src, "username", &["username", "data"]),
    })
}

fn read_profile(src: &dyn FieldSource, v: Vocabulary) -> UrlFields {
    UrlFields {
        url: v.read(src, "profileUrl", &["profileUrl", "url", "data"]),
    }
}

fn read_facebook(src: &dyn FieldSource, v: Vocabulary) -> Intent {
    Intent::Facebook(read_profile(src, v))
}

fn read_linkedin(src: &dyn FieldSource, v: Vocabulary) -> Intent {
    Intent::Linkedin(read_profile(src, v))
}

fn read_youtube(src: &dyn FieldSource, v: Vocabulary) -> Intent {
    Intent::Youtube(UrlFields {
        url: v.read(src, "videoUrl", &["videoUrl", "url", "data"]),
    })
}

fn read_spotify(src: &dyn FieldSource, v: Vocabulary) -> Intent {
    Intent::Spotify(UrlFields {
        url: v.read(src, "trackUrl", &["trackUrl", "url", "data"]),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Pairs(Vec<(&'static str, &'static str)>);

    impl FieldSource for Pairs {
        fn lookup(&self, key: &str) -> Option<&str> {
            self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
        }
    }

    #[test]
    fn reader_table_matches_kind_order() {
        for kind in IntentKind::ALL {
            assert_eq!(Intent::empty(kind).kind(), kind, "reader for {kind}");
        }
    }

    #[test]
    fn kind_tokens_roundtrip() {
        for kind in IntentKind::ALL {
            assert_eq!(kind.as_str().parse::<IntentKind>(), Ok(kind));
        }
        assert_eq!("url".parse(), Ok(IntentKind::Link));
        assert_eq!("tel".parse(), Ok(IntentKind::Phone));
        assert_eq!(" GEO ".parse(), Ok(IntentKind::Geo));
        assert!("fax".parse::<IntentKind>().is_err());
    }

    #[test]
    fn kind_serializes_geo_as_location() {
        assert_eq!(serde_json::to_string(&IntentKind::Geo).unwrap(), "\"location\"");
        let parsed: IntentKind = serde_json::from_str("\"geo\"").unwrap();
        assert_eq!(parsed, IntentKind::Geo);
    }

    #[test]
    fn field_map_set_reports_changes() {
        let mut fields = FieldMap::new();
        assert!(fields.set("url", "https://a"));
        assert!(!fields.set("url", "https://a"));
        assert!(fields.set("url", "https://b"));
        assert!(fields.remove("url"));
        assert!(!fields.remove("url"));
        assert!(fields.is_empty());
    }

    #[test]
    fn flags_and_text_views() {
        let fields = FieldMap::new()
            .with("hidden", true)
            .with("shown", false)
            .with("textual", "true");
        assert!(fields.flag("hidden"));
        assert!(!fields.flag("shown"));
        assert!(fields.flag("textual"));
        assert!(!fields.flag("missing"));
        assert_eq!(fields.text("hidden"), "true");
        assert_eq!(fields.text("shown"), "");
    }

    #[test]
    fn editor_vocabulary_reads_canonical_keys() {
        let fields = FieldMap::new()
            .with("networkName", "Cafe")
            .with("ssid", "ignored")
            .with("hidden", true);
        let Intent::Wifi(wifi) = Intent::from_fields(IntentKind::Wifi, &fields) else {
            panic!("expected wifi");
        };
        assert_eq!(wifi.ssid, "Cafe");
        assert!(wifi.hidden);
    }

    #[test]
    fn query_vocabulary_follows_fallback_chain() {
        let src = Pairs(vec![("data", "fallback"), ("ssid", ""), ("hidden", "true")]);
        let Intent::Wifi(wifi) = Intent::from_source(IntentKind::Wifi, &src, Vocabulary::Query)
        else {
            panic!("expected wifi");
        };
        assert_eq!(wifi.ssid, "fallback", "empty ssid falls through to data");
        assert!(wifi.hidden);

        let src = Pairs(vec![("latitude", "1.5"), ("lng", "2.5")]);
        let Intent::Geo(geo) = Intent::from_source(IntentKind::Geo, &src, Vocabulary::Query) else {
            panic!("expected geo");
        };
        assert_eq!((geo.latitude.as_str(), geo.longitude.as_str()), ("1.5", "2.5"));
    }

    #[test]
    fn query_vocabulary_accepts_short_vcard_aliases() {
        let src = Pairs(vec![("org", "Acme"), ("zip", "10001")]);
        let Intent::Vcard(card) = Intent::from_source(IntentKind::Vcard, &src, Vocabulary::Query)
        else {
            panic!("expected vcard");
        };
        assert_eq!(card.organization, "Acme");
        assert_eq!(card.zip_code, "10001");
        assert!(card.has_address());
    }

    #[test]
    fn intent_json_is_tagged_by_kind() {
        let intent = Intent::Geo(GeoFields {
            latitude: "1".into(),
            longitude: "2".into(),
        });
        let json = serde_json::to_string(&intent).unwrap();
        assert!(json.contains("\"kind\":\"location\""));

        let parsed: Intent = serde_json::from_str(r#"{"kind":"sms","phone":"123"}"#).unwrap();
        assert_eq!(
            parsed,
            Intent::Sms(MessageFields {
                phone: "123".into(),
                message: String::new(),
            })
        );
    }
}
