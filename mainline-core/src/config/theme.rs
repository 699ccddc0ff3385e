use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Colours of the interactive screens. Every field is optional in the file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Cursor, titles and the spinner
    pub accent: ThemeColor,
    /// Succeeded repositories and checked boxes
    pub success: ThemeColor,
    /// Failed repositories and the error bar
    pub error: ThemeColor,
    /// Paths, stage names and other secondary text
    pub muted: ThemeColor,
    /// Key hints in the footer
    pub hint: ThemeColor,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            accent: ThemeColor::Named(NamedColor::Magenta),
            success: ThemeColor::Named(NamedColor::Green),
            error: ThemeColor::Named(NamedColor::Red),
            muted: ThemeColor::Named(NamedColor::Gray),
            hint: ThemeColor::Named(NamedColor::Blue),
        }
    }
}

/// A terminal colour name or a `#rrggbb` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum ThemeColor {
    Named(NamedColor),
    Rgb(u8, u8, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
}

const NAMED_COLORS: [(&str, NamedColor); 9] = [
    ("black", NamedColor::Black),
    ("blue", NamedColor::Blue),
    ("cyan", NamedColor::Cyan),
    ("gray", NamedColor::Gray),
    ("green", NamedColor::Green),
    ("magenta", NamedColor::Magenta),
    ("red", NamedColor::Red),
    ("white", NamedColor::White),
    ("yellow", NamedColor::Yellow),
];

impl NamedColor {
    pub fn as_str(self) -> &'static str {
        NAMED_COLORS
            .iter()
            .find(|(_, color)| *color == self)
            .map_or("gray", |(name, _)| name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidColor(String);

impl fmt::Display for InvalidColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = NAMED_COLORS.iter().map(|(name, _)| *name).collect();
        write!(
            f,
            "invalid color '{}': expected one of {} (or grey) or #rrggbb",
            self.0,
            names.join(", ")
        )
    }
}

impl std::error::Error for InvalidColor {}

impl FromStr for ThemeColor {
    type Err = InvalidColor;

    /// Names are case-insensitive and `grey` is accepted for `gray`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidColor(s.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
            };
            return Ok(Self::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?));
        }

        let name = match s.to_ascii_lowercase().as_str() {
            "grey" => "gray".to_string(),
            other => other.to_string(),
        };
        NAMED_COLORS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, color)| Self::Named(*color))
            .ok_or_else(invalid)
    }
}

impl TryFrom<String> for ThemeColor {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ThemeColor> for String {
    fn from(color: ThemeColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(named) => f.write_str(named.as_str()),
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}
