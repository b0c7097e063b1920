//! User preferences: color theme and interface locale.
//!
//! Preferences are an explicit value owned by the caller. They are read
//! once with [`Preferences::load`] and written back with
//! [`Preferences::save`] whenever they change.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseThemeError, PreferenceError};

pub const THEME_KEY: &str = "theme";
pub const LOCALE_KEY: &str = "i18nextLng";
pub const FALLBACK_LOCALE: &str = "en-US";

// ============================================================================
// Theme
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(ParseThemeError(s.to_owned())),
        }
    }
}

// ============================================================================
// Locales
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

/// A supported interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Locale {
    /// BCP 47 tag, e.g. `pt-BR`.
    pub code: &'static str,
    /// Name in the language itself.
    pub name: &'static str,
    pub direction: TextDirection,
}

impl Locale {
    const fn ltr(code: &'static str, name: &'static str) -> Self {
        Self {
            code,
            name,
            direction: TextDirection::Ltr,
        }
    }

    const fn rtl(code: &'static str, name: &'static str) -> Self {
        Self {
            code,
            name,
            direction: TextDirection::Rtl,
        }
    }

    /// Primary language subtag (`pt` for `pt-BR`).
    pub fn language(&self) -> &'static str {
        primary_subtag(self.code)
    }
}

/// Every supported locale, in menu order.
pub static LOCALES: [Locale; 43] = [
    Locale::rtl("ar-SA", "العربية"),
    Locale::ltr("ca", "Català"),
    Locale::ltr("zh-Hans", "简体中文"),
    Locale::ltr("zh-Hant", "繁體中文"),
    Locale::ltr("hr", "Hrvatski"),
    Locale::ltr("cs", "Čeština"),
    Locale::ltr("da", "Dansk"),
    Locale::ltr("nl-NL", "Nederlands"),
    Locale::ltr("en-AU", "English (Australia)"),
    Locale::ltr("en-CA", "English (Canada)"),
    Locale::ltr("en-GB", "English (UK)"),
    Locale::ltr("en-US", "English (US)"),
    Locale::ltr("fi", "Suomi"),
    Locale::ltr("fr-FR", "Français (France)"),
    Locale::ltr("fr-CA", "Français (Canada)"),
    Locale::ltr("de-DE", "Deutsch"),
    Locale::ltr("el", "Ελληνικά"),
    Locale::rtl("he", "עברית"),
    Locale::ltr("hi", "हिन्दी"),
    Locale::ltr("hu", "Magyar"),
    Locale::ltr("id", "Bahasa Indonesia"),
    Locale::ltr("it", "Italiano"),
    Locale::ltr("ja", "日本語"),
    Locale::ltr("ko", "한국어"),
    Locale::ltr("ms", "Bahasa Melayu"),
    Locale::ltr("no", "Norsk"),
    Locale::ltr("pl", "Polski"),
    Locale::ltr("sl", "Slovenščina"),
    Locale::ltr("pt", "Português"),
    Locale::rtl("fa", "فارسی"),
    Locale::ltr("pa", "ਪੰਜਾਬੀ"),
    Locale::ltr("pt-BR", "Português (Brasil)"),
    Locale::ltr("pt-PT", "Português (Portugal)"),
    Locale::ltr("ro", "Română"),
    Locale::ltr("ru", "Русский"),
    Locale::ltr("sk", "Slovenčina"),
    Locale::ltr("es-MX", "Español (México)"),
    Locale::ltr("es-ES", "Español (España)"),
    Locale::ltr("sv", "Svenska"),
    Locale::ltr("th", "ไทย"),
    Locale::ltr("tr", "Türkçe"),
    Locale::ltr("uk", "Українська"),
    Locale::ltr("vi", "Tiếng Việt"),
];

fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}

/// The locale with exactly this code.
pub fn find_locale(code: &str) -> Option<&'static Locale> {
    LOCALES.iter().find(|locale| locale.code == code)
}

fn fallback_locale() -> &'static Locale {
    // en-US is in LOCALES
    find_locale(FALLBACK_LOCALE).unwrap_or(&LOCALES[11])
}

/// Best supported locale for one requested tag, if any.
///
/// Tries an exact match, then a case-insensitive one (also accepting `_`
/// for `-`), then any locale with the same primary language, preferring
/// `en-US` among the English ones.
pub fn match_locale(requested: &str) -> Option<&'static Locale> {
    let requested = requested.trim();
    if requested.is_empty() {
        return None;
    }
    if let Some(locale) = find_locale(requested) {
        return Some(locale);
    }
    let normalized = requested.replace('_', "-");
    if let Some(locale) = LOCALES
        .iter()
        .find(|locale| locale.code.eq_ignore_ascii_case(&normalized))
    {
        return Some(locale);
    }
    let language = primary_subtag(&normalized);
    let mut candidates = LOCALES
        .iter()
        .filter(|locale| locale.language().eq_ignore_ascii_case(language))
        .peekable();
    let first = *candidates.peek()?;
    Some(
        candidates
            .find(|locale| locale.code == FALLBACK_LOCALE)
            .unwrap_or(first),
    )
}

/// Picks the first of `preferred` that matches a supported locale,
/// falling back to `en-US`.
pub fn negotiate_locale<'a>(preferred: impl IntoIterator<Item = &'a str>) -> &'static Locale {
    preferred
        .into_iter()
        .find_map(match_locale)
        .unwrap_or_else(fallback_locale)
}

// ============================================================================
// Stores
// ============================================================================

/// String key/value storage for preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// In-memory store, for tests and hosts that persist elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore(BTreeMap<String, String>);

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.0.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.0.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// A flat JSON object on disk. Every `set` rewrites the file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens `path`; a missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PreferenceError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_owned(), value.to_owned());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

// ============================================================================
// Preferences
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub locale: &'static Locale,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            locale: fallback_locale(),
        }
    }
}

impl Preferences {
    /// Reads preferences from `store`.
    ///
    /// An unknown or missing theme is `light`. The locale is the stored one
    /// if it is still supported, otherwise the best match among
    /// `preferred` (browser languages, then the document language), then
    /// `en-US`.
    pub fn load<'a>(
        store: &dyn PreferenceStore,
        preferred: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, PreferenceError> {
        let theme = match store.get(THEME_KEY)? {
            Some(raw) => raw.parse().unwrap_or_else(|err: ParseThemeError| {
                tracing::debug!(error = %err, "ignoring stored theme");
                Theme::default()
            }),
            None => Theme::default(),
        };

        let stored = store.get(LOCALE_KEY)?;
        let locale = match stored.as_deref().and_then(match_locale) {
            Some(locale) => locale,
            None => negotiate_locale(preferred),
        };

        Ok(Self { theme, locale })
    }

    /// Writes both preferences to `store`.
    pub fn save(&self, store: &mut dyn PreferenceStore) -> Result<(), PreferenceError> {
        store.set(THEME_KEY, self.theme.as_str())?;
        store.set(LOCALE_KEY, self.locale.code)
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Switches to the supported locale matching `code`. Returns false and
    /// keeps the current locale if nothing matches.
    pub fn set_locale(&mut self, code: &str) -> bool {
        match match_locale(code) {
            Some(locale) => {
                self.locale = locale;
                true
            }
            None => false,
        }
    }

    pub fn direction(&self) -> TextDirection {
        self.locale.direction
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_tokens() {
        assert_eq!("dark".parse(), Ok(Theme::Dark));
        assert_eq!(Theme::Light.to_string().parse(), Ok(Theme::Light));
        assert_eq!("sepia".parse::<Theme>(), Err(ParseThemeError("sepia".into())));
        assert_eq!(
            "Dark".parse::<Theme>().unwrap_err().to_string(),
            "unknown theme: \"Dark\""
        );
    }

    #[test]
    fn locale_table() {
        assert_eq!(LOCALES.len(), 43);
        assert_eq!(fallback_locale().code, FALLBACK_LOCALE);
        let rtl: Vec<_> = LOCALES
            .iter()
            .filter(|l| l.direction == TextDirection::Rtl)
            .map(|l| l.code)
            .collect();
        assert_eq!(rtl, ["ar-SA", "he", "fa"]);
    }

    #[test]
    fn matching_order() {
        assert_eq!(match_locale("pt").unwrap().code, "pt");
        assert_eq!(match_locale("PT-br").unwrap().code, "pt-BR");
        assert_eq!(match_locale("fr_CA").unwrap().code, "fr-CA");
        assert_eq!(match_locale("en-NZ").unwrap().code, "en-US");
        assert_eq!(match_locale("en").unwrap().code, "en-US");
        assert_eq!(match_locale("de-AT").unwrap().code, "de-DE");
        assert_eq!(match_locale("zh-CN").unwrap().code, "zh-Hans");
        assert_eq!(match_locale("xx"), None);
        assert_eq!(match_locale(""), None);
    }

    #[test]
    fn negotiation_falls_back_to_english() {
        assert_eq!(negotiate_locale(["tlh", "es-AR"]).code, "es-MX");
        assert_eq!(negotiate_locale(["tlh"]).code, FALLBACK_LOCALE);
        assert_eq!(negotiate_locale(std::iter::empty()).code, FALLBACK_LOCALE);
    }

    #[test]
    fn load_defaults_and_stored_values() {
        let store = MemoryStore::new();
        let prefs = Preferences::load(&store, ["he-IL"]).unwrap();
        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(prefs.locale.code, "he");
        assert_eq!(prefs.direction(), TextDirection::Rtl);

        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "dark").unwrap();
        store.set(LOCALE_KEY, "ja").unwrap();
        let prefs = Preferences::load(&store, ["he-IL"]).unwrap();
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.locale.code, "ja");

        store.set(THEME_KEY, "sepia").unwrap();
        store.set(LOCALE_KEY, "tlh").unwrap();
        let prefs = Preferences::load(&store, ["it-CH"]).unwrap();
        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(prefs.locale.code, "it");
    }

    #[test]
    fn save_writes_both_keys() {
        let mut prefs = Preferences::default();
        assert_eq!(prefs.toggle_theme(), Theme::Dark);
        assert!(prefs.set_locale("sv"));
        assert!(!prefs.set_locale("tlh"));

        let mut store = MemoryStore::new();
        prefs.save(&mut store).unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(store.get(LOCALE_KEY).unwrap().as_deref(), Some("sv"));
    }

    #[test]
    fn json_file_store_roundtrip() {
        let path = std::env::temp_dir()
            .join(format!("qrforge-prefs-{}", std::process::id()))
            .join("prefs.json");
        let _ = fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap(), None);
        store.set(THEME_KEY, "dark").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(PreferenceError::Json(_))));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
