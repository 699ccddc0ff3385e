use mainline_core::config::{NamedColor, ThemeColor, ThemeConfig};
use ratatui::style::Color;

/// Resolved terminal colours, built once from the config at startup.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub success: Color,
    pub error: Color,
    pub muted: Color,
    pub hint: Color,
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self {
            accent: terminal_color(config.accent),
            success: terminal_color(config.success),
            error: terminal_color(config.error),
            muted: terminal_color(config.muted),
            hint: terminal_color(config.hint),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

fn terminal_color(color: ThemeColor) -> Color {
    let named = match color {
        ThemeColor::Rgb(r, g, b) => return Color::Rgb(r, g, b),
        ThemeColor::Named(named) => named,
    };
    match named {
        NamedColor::Black => Color::Black,
        NamedColor::Red => Color::Red,
        NamedColor::Green => Color::Green,
        NamedColor::Yellow => Color::Yellow,
        NamedColor::Blue => Color::Blue,
        NamedColor::Magenta => Color::Magenta,
        NamedColor::Cyan => Color::Cyan,
        NamedColor::White => Color::White,
        // Terminal "gray" is too bright for dim text
        NamedColor::Gray => Color::DarkGray,
    }
}
