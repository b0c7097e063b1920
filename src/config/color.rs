//! Hex colors as carried in rendering configurations.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

/// An opaque sRGB color written as `#rrggbb`.
///
/// Parsing accepts exactly six hex digits, with or without a leading `#`,
/// in either case. Formatting is always lowercase with the `#`.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(Srgb<u8>);

/// Returned when a string is not a six-digit hex color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a #rrggbb color: {0:?}")]
pub struct ParseColorError(pub String);

impl HexColor {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }

    pub fn white() -> Self {
        Self::new(0xff, 0xff, 0xff)
    }

    /// Parses `value`, falling back to `default` when it is not a color.
    pub fn parse_or(value: &str, default: HexColor) -> HexColor {
        value.parse().unwrap_or(default)
    }

    pub fn rgb(self) -> Srgb<u8> {
        self.0
    }

    pub fn components(self) -> (u8, u8, u8) {
        self.0.into_components()
    }
}

impl From<Srgb<u8>> for HexColor {
    fn from(rgb: Srgb<u8>) -> Self {
        Self(rgb)
    }
}

impl PartialEq for HexColor {
    fn eq(&self, other: &Self) -> bool {
        self.components() == other.components()
    }
}

impl Eq for HexColor {}

impl fmt::Debug for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexColor({self})")
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.components();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl FromStr for HexColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        // palette also takes the 3-digit short form; only 6 digits are valid here
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_owned()));
        }
        let rgb = digits
            .parse::<Srgb<u8>>()
            .map_err(|_| ParseColorError(s.to_owned()))?;
        Ok(Self(rgb))
    }
}

impl TryFrom<String> for HexColor {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for HexColor {
    fn schema_name() -> String {
        "HexColor".to_owned()
    }

    fn json_schema(_: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        schemars::schema::SchemaObject {
            instance_type: Some(schemars::schema::InstanceType::String.into()),
            string: Some(Box::new(schemars::schema::StringValidation {
                pattern: Some("^#?[0-9A-Fa-f]{6}$".to_owned()),
                ..Default::default()
            })),
            ..Default::default()
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_six_digits_with_or_without_hash() {
        assert_eq!("#3B82F6".parse::<HexColor>().unwrap().to_string(), "#3b82f6");
        assert_eq!("3b82f6".parse::<HexColor>().unwrap().to_string(), "#3b82f6");
        assert_eq!("#000000".parse::<HexColor>().unwrap(), HexColor::black());
    }

    #[test]
    fn rejects_everything_else() {
        for bad in ["", "zz", "#fff", "fff", "#12345g", "#1234567", "red", "# 12345"] {
            assert!(bad.parse::<HexColor>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn parse_or_substitutes_default() {
        assert_eq!(HexColor::parse_or("zz", HexColor::black()).to_string(), "#000000");
        assert_eq!(HexColor::parse_or("", HexColor::white()).to_string(), "#ffffff");
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&HexColor::new(0x4f, 0x46, 0xe5)).unwrap();
        assert_eq!(json, "\"#4f46e5\"");
        assert!(serde_json::from_str::<HexColor>("\"nope\"").is_err());
    }
}
