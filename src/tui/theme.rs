//! Theme system for consistent UI colors across dark and light modes.

use ratatui::style::Color;

use crate::config::ThemeMode;

/// Semantic color theme for the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Accent color for highlights, selections, and focus states
    pub accent: Color,
    /// Success state color for confirmations and success messages
    pub success: Color,
    /// Error state color for errors and destructive actions
    pub error: Color,
    /// Primary text content color
    pub text: Color,
    /// Secondary text color for labels and less important content
    pub text_secondary: Color,
    /// Muted text color for help text, disabled items, and dim content
    pub text_muted: Color,
    /// Main background color
    pub background: Color,
    /// Highlight/selection background color
    pub highlight_bg: Color,
}

impl Theme {
    /// Resolves the configured theme mode to a concrete theme.
    #[must_use]
    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Auto => Self::detect(),
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Detects the OS theme and returns the appropriate Theme.
    #[must_use]
    pub fn detect() -> Self {
        match dark_light::detect() {
            dark_light::Mode::Light => Self::light(),
            // Fall back to dark theme for dark mode or unspecified
            dark_light::Mode::Dark | dark_light::Mode::Default => Self::dark(),
        }
    }

    /// Theme for dark terminal backgrounds.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            accent: Color::Cyan,
            success: Color::Green,
            error: Color::Red,
            text: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,
            background: Color::Reset,
            highlight_bg: Color::Rgb(60, 60, 90),
        }
    }

    /// Theme for light terminal backgrounds.
    #[must_use]
    pub fn light() -> Self {
        Self {
            accent: Color::Blue,
            success: Color::Rgb(0, 128, 0),
            error: Color::Rgb(180, 0, 0),
            text: Color::Black,
            text_secondary: Color::DarkGray,
            text_muted: Color::Gray,
            background: Color::Reset,
            highlight_bg: Color::Rgb(200, 210, 255),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mode_fixed_variants() {
        assert_eq!(Theme::from_mode(ThemeMode::Dark), Theme::dark());
        assert_eq!(Theme::from_mode(ThemeMode::Light), Theme::light());
    }
}
