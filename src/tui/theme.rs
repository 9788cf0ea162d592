//! Colors resolved from the `[theme]` config section.

use ratatui::style::Color;
use std::str::FromStr;
use strictly_tictactoe::ThemeConfig;
use tracing::warn;

/// Resolved terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// X marks.
    pub x: Color,
    /// O marks.
    pub o: Color,
    /// Cursor background.
    pub highlight: Color,
    /// Title and borders.
    pub accent: Color,
}

impl Theme {
    /// Parses configured colors, keeping the default for any invalid name.
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self {
            x: parse_or(config.x_color(), Color::Blue),
            o: parse_or(config.o_color(), Color::Red),
            highlight: parse_or(config.highlight(), Color::Yellow),
            accent: parse_or(config.accent(), Color::Cyan),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

fn parse_or(name: &str, fallback: Color) -> Color {
    Color::from_str(name).unwrap_or_else(|_| {
        warn!(color = name, %fallback, "Unknown theme color, using default");
        fallback
    })
}
