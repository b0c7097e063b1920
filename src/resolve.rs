//! Query-parameter resolution.
//!
//! [`resolve`] turns an untrusted bag of string parameters (typically a URL
//! query string) into a payload and a complete, clamped
//! [`RenderingConfiguration`]. It never fails: bad values are replaced by
//! defaults and reported as warning [`Issue`]s. The only blocking condition
//! is an empty payload.
//!
//! # Example
//!
//! ```
//! use qrforge::{resolve, RawParameterBag};
//!
//! let bag = RawParameterBag::from_query("type=url&data=https%3A%2F%2Fx.test&size=99999&color=zz");
//! let resolution = resolve(&bag);
//!
//! assert_eq!(resolution.payload.as_deref(), Some("https://x.test"));
//! assert_eq!(resolution.configuration.width, 2000);
//! assert_eq!(resolution.configuration.dots_options.color.to_string(), "#000000");
//! assert!(!resolution.is_blocked());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::adapter::ExportFormat;
use crate::config::{
    patch_section, BackgroundOptions, CornerOptions, CornerStyle, DotStyle, DotsOptions,
    ErrorCorrectionLevel, HexColor, ImageOptions, QrOptions, RenderingConfiguration, Section,
    DEFAULT_MARGIN, DEFAULT_SIZE, MARGIN_RANGE, QUERY_LOGO_MARGIN, SIZE_RANGE,
};
use crate::encode::Encoder;
use crate::intent::{FieldSource, Intent, IntentKind, UrlFields, Vocabulary};

/// Text of the blocking issue raised when nothing can be encoded.
pub const MISSING_DATA_MESSAGE: &str = "No data provided. Please include data parameter.";

/// Path segment the URL builder appends to its base.
pub const GENERATE_PATH: &str = "generate";

/// Keys read, in order, when `type` names no known kind.
const UNKNOWN_KIND_KEYS: [&str; 3] = ["data", "url", "text"];

// ============================================================================
// RawParameterBag
// ============================================================================

/// Unordered string parameters. Unknown keys are carried but ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawParameterBag(BTreeMap<String, String>);

impl RawParameterBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` query, with or without
    /// the leading `?`. The first occurrence of a repeated key wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut bag = Self::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            bag.0.entry(key.into_owned()).or_insert_with(|| value.into_owned());
        }
        bag
    }

    /// Reads the query of a full URL.
    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or_default())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a parameter, replacing an earlier value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// First non-empty value among `keys`.
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        self.first_entry(keys).map(|(_, value)| value)
    }

    /// Like [`first_of`](Self::first_of), also naming the key that
    /// supplied the value.
    pub fn first_entry(&self, keys: &[&str]) -> Option<(&str, &str)> {
        keys.iter()
            .filter_map(|key| self.0.get_key_value(*key))
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .find(|(_, value)| !value.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Form-encodes the non-empty parameters.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.iter().filter(|(_, value)| !value.is_empty()) {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// `<base>/generate?<query>`: the request URL for these parameters.
    pub fn generate_url(&self, base: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(base)?;
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(GENERATE_PATH);
        let query = self.to_query_string();
        url.set_query((!query.is_empty()).then_some(query.as_str()));
        Ok(url)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawParameterBag {
    /// Later pairs replace earlier ones, like [`insert`](Self::insert).
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Self::new();
        for (key, value) in iter {
            bag.insert(key, value);
        }
        bag
    }
}

impl FieldSource for RawParameterBag {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key)
    }
}

// ============================================================================
// Issues
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum Severity {
    /// A value was replaced; rendering goes ahead.
    Warning,
    /// Nothing can be rendered.
    Blocking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum IssueCode {
    MissingData,
    UnknownKind,
    InvalidNumber,
    OutOfRange,
    InvalidColor,
    InvalidErrorCorrection,
    InvalidFormat,
}

/// A problem found while resolving parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Issue {
    pub severity: Severity,
    pub code: IssueCode,
    /// Parameter the issue is about, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub message: String,
}

impl Issue {
    pub fn warning(code: IssueCode, key: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            key: Some(key.to_owned()),
            message: message.into(),
        }
    }

    pub fn missing_data() -> Self {
        Self {
            severity: Severity::Blocking,
            code: IssueCode::MissingData,
            key: None,
            message: MISSING_DATA_MESSAGE.to_owned(),
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Blocking
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{key}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Outcome of resolving a parameter bag. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Resolution {
    pub kind: IntentKind,
    /// `None` exactly when a blocking issue was raised.
    pub payload: Option<String>,
    pub configuration: RenderingConfiguration,
    pub download_requested: bool,
    pub export_format: ExportFormat,
    pub issues: Vec<Issue>,
}

impl Resolution {
    pub fn is_blocked(&self) -> bool {
        self.issues.iter().any(Issue::is_blocking)
    }

    pub fn blocking_issue(&self) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.is_blocking())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| !issue.is_blocking())
    }

    /// Serializes the resolution to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the resolution to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Resolves parameter bags with a given payload encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    encoder: Encoder,
}

/// Resolves `bag` with the default encoder.
pub fn resolve(bag: &RawParameterBag) -> Resolution {
    Resolver::default().resolve(bag)
}

impl Resolver {
    pub fn new(encoder: Encoder) -> Self {
        Self { encoder }
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn resolve(&self, bag: &RawParameterBag) -> Resolution {
        let mut issues = Vec::new();

        let (kind, intent) = read_intent(bag, &mut issues);
        let payload = Some(self.encoder.encode(&intent)).filter(|payload| !payload.is_empty());
        if payload.is_none() {
            tracing::debug!(%kind, "no payload to encode");
            issues.push(Issue::missing_data());
        }

        let configuration = read_configuration(bag, &mut issues);
        let export_format = read_export_format(bag, &mut issues);
        let download_requested = matches!(bag.get("download"), Some("true" | "1"));

        tracing::debug!(
            %kind,
            size = configuration.width,
            format = %export_format,
            download_requested,
            issues = issues.len(),
            "resolved query parameters"
        );

        Resolution {
            kind,
            payload,
            configuration,
            download_requested,
            export_format,
            issues,
        }
    }
}

fn warn(issues: &mut Vec<Issue>, issue: Issue) {
    tracing::debug!(key = issue.key.as_deref(), code = ?issue.code, "{}", issue.message);
    issues.push(issue);
}

fn read_intent(bag: &RawParameterBag, issues: &mut Vec<Issue>) -> (IntentKind, Intent) {
    let Some(token) = bag.get("type").filter(|token| !token.is_empty()) else {
        return (IntentKind::Link, Intent::from_source(IntentKind::Link, bag, Vocabulary::Query));
    };

    match token.parse::<IntentKind>() {
        Ok(kind) => (kind, Intent::from_source(kind, bag, Vocabulary::Query)),
        Err(err) => {
            warn(
                issues,
                Issue::warning(IssueCode::UnknownKind, "type", format!("{err}; treated as a link")),
            );
            let url = bag.first_of(&UNKNOWN_KIND_KEYS).unwrap_or_default().to_owned();
            (IntentKind::Link, Intent::Link(UrlFields { url }))
        }
    }
}

fn read_configuration(bag: &RawParameterBag, issues: &mut Vec<Issue>) -> RenderingConfiguration {
    let size = read_bounded(bag, "size", DEFAULT_SIZE, (*SIZE_RANGE.start(), *SIZE_RANGE.end()), issues);
    let margin = read_bounded(
        bag,
        "margin",
        DEFAULT_MARGIN,
        (*MARGIN_RANGE.start(), *MARGIN_RANGE.end()),
        issues,
    );

    let foreground = read_color(bag, &["color", "fg"], HexColor::black(), issues);
    let background = read_color(bag, &["bg", "bgcolor"], HexColor::white(), issues);

    let level = match bag.first_entry(&["ec", "errorCorrection"]) {
        None => ErrorCorrectionLevel::default(),
        Some((key, token)) => token.parse().unwrap_or_else(|err| {
            warn(
                issues,
                Issue::warning(IssueCode::InvalidErrorCorrection, key, format!("{err}; using M")),
            );
            ErrorCorrectionLevel::default()
        }),
    };

    let dots = bag.get("dots").filter(|t| !t.is_empty()).map(DotStyle::from).unwrap_or_default();
    let corners = corner_style(bag.get("corners"));
    let corner_dots = corner_style(bag.get("cornerDots"));

    let mut sections = vec![
        Section::Size(size),
        Section::Margin(margin),
        Section::Dots(DotsOptions {
            color: foreground,
            style: dots,
            gradient: None,
        }),
        Section::Background(BackgroundOptions { color: background }),
        Section::CornersSquare(CornerOptions {
            color: foreground,
            style: corners,
        }),
        Section::CornersDot(CornerOptions {
            color: foreground,
            style: corner_dots,
        }),
        Section::Qr(QrOptions {
            error_correction_level: level,
        }),
    ];

    if let Some(logo) = bag.get("logo").filter(|logo| !logo.is_empty()) {
        sections.push(Section::Image(Some(logo.to_owned())));
        sections.push(Section::ImageOptions(ImageOptions {
            margin: QUERY_LOGO_MARGIN,
            ..ImageOptions::default()
        }));
    }

    sections
        .into_iter()
        .fold(RenderingConfiguration::default(), |config, section| patch_section(&config, section))
}

fn corner_style(token: Option<&str>) -> CornerStyle {
    token.filter(|t| !t.is_empty()).map(CornerStyle::from).unwrap_or_default()
}

fn read_bounded(
    bag: &RawParameterBag,
    key: &str,
    default: u32,
    (min, max): (u32, u32),
    issues: &mut Vec<Issue>,
) -> u32 {
    let Some(raw) = bag.get(key).filter(|raw| !raw.is_empty()) else {
        return default;
    };
    let Some(value) = parse_leading_int(raw) else {
        warn(
            issues,
            Issue::warning(IssueCode::InvalidNumber, key, format!("{raw:?} is not a number; using {default}")),
        );
        return default;
    };
    let clamped = value.clamp(i64::from(min), i64::from(max));
    if clamped != value {
        warn(
            issues,
            Issue::warning(IssueCode::OutOfRange, key, format!("{value} is outside {min}..={max}; using {clamped}")),
        );
    }
    // clamped lies inside a u32 range
    u32::try_from(clamped).unwrap_or(default)
}

/// Reads a leading decimal integer the way form inputs are usually read:
/// leading whitespace and a sign are allowed, trailing text is ignored.
/// Saturates instead of overflowing.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: Vec<i64> = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .map(|b| i64::from(b - b'0'))
        .collect();
    if digits.is_empty() {
        return None;
    }
    let magnitude = digits
        .into_iter()
        .fold(0i64, |acc, digit| acc.saturating_mul(10).saturating_add(digit));
    Some(if negative { -magnitude } else { magnitude })
}

fn read_color(bag: &RawParameterBag, keys: &[&str], default: HexColor, issues: &mut Vec<Issue>) -> HexColor {
    let Some((key, raw)) = bag.first_entry(keys) else {
        return default;
    };
    raw.parse().unwrap_or_else(|err| {
        warn(
            issues,
            Issue::warning(IssueCode::InvalidColor, key, format!("{err}; using {default}")),
        );
        default
    })
}

fn read_export_format(bag: &RawParameterBag, issues: &mut Vec<Issue>) -> ExportFormat {
    let Some((key, raw)) = bag.first_entry(&["format", "file"]) else {
        return ExportFormat::default();
    };
    raw.parse().unwrap_or_else(|err| {
        warn(
            issues,
            Issue::warning(IssueCode::InvalidFormat, key, format!("{err}; using png")),
        );
        ExportFormat::default()
    })
}

// ============================================================================
// Tests
// ============================================================================
