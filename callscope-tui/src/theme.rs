//! Color palette for the TUI.
//!
//! The palette is built once from the configured [`ThemeMode`] and passed
//! down to every render function; nothing reads theme state ambiently.

use callscope_core::config::ThemeMode;
use ratatui::style::Color;

/// Resolved colors for one theme mode.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Default text
    pub text: Color,
    /// Secondary / muted text
    pub dim: Color,
    /// Block borders
    pub border: Color,
    /// Border of the focused block
    pub border_active: Color,
    /// Table header row
    pub header: Color,
    /// Selected row background
    pub selection_bg: Color,
    /// Selected row foreground
    pub selection_fg: Color,
    /// Positive values and healthy status
    pub good: Color,
    /// Warnings and abandoned counts
    pub warn: Color,
    /// Errors and unreachable stores
    pub bad: Color,
    /// Chart bars and sparklines
    pub chart: Color,
    /// Active filter values in the header bar
    pub accent: Color,
}

impl Theme {
    pub fn new(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    fn dark() -> Self {
        Self {
            text: Color::Rgb(220, 220, 220),
            dim: Color::Rgb(128, 128, 128),
            border: Color::Rgb(60, 60, 60),
            border_active: Color::Rgb(0, 180, 180),
            header: Color::Rgb(100, 180, 180),
            selection_bg: Color::Rgb(40, 70, 70),
            selection_fg: Color::Rgb(250, 250, 250),
            good: Color::Rgb(50, 205, 50),
            warn: Color::Rgb(220, 180, 0),
            bad: Color::Rgb(220, 80, 80),
            chart: Color::Rgb(0, 150, 150),
            accent: Color::Rgb(255, 180, 100),
        }
    }

    fn light() -> Self {
        Self {
            text: Color::Rgb(30, 30, 30),
            dim: Color::Rgb(110, 110, 110),
            border: Color::Rgb(180, 180, 180),
            border_active: Color::Rgb(0, 120, 120),
            header: Color::Rgb(0, 100, 100),
            selection_bg: Color::Rgb(200, 225, 225),
            selection_fg: Color::Rgb(10, 10, 10),
            good: Color::Rgb(0, 140, 0),
            warn: Color::Rgb(160, 120, 0),
            bad: Color::Rgb(180, 40, 40),
            chart: Color::Rgb(0, 120, 120),
            accent: Color::Rgb(180, 90, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_resolve_distinct_palettes() {
        let dark = Theme::new(ThemeMode::Dark);
        let light = Theme::new(ThemeMode::Light);
        assert_ne!(dark.text, light.text);
        assert_ne!(dark.selection_bg, light.selection_bg);
    }
}
