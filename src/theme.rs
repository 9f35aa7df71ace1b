//! Theme system

use ratatui::style::{Color, Modifier, Style};

/// Complete color palette for TUI rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    // Title bar
    pub title_fg: Color,
    pub title_bg: Color,

    // Section headers
    pub header_fg: Color,
    pub header_bg: Color,

    // Borders
    pub border_card: Color,
    pub border_chart: Color,

    // Text
    pub text_primary: Color,
    pub highlight: Color,
    pub text_muted: Color,

    // Status
    pub success: Color,
    pub error: Color,
    pub info: Color,
    pub prompt: Color,
}

impl ThemeColors {
    /// Default theme
    pub const DEFAULT: Self = Self {
        title_fg: Color::Rgb(250, 250, 250),
        title_bg: Color::Rgb(125, 86, 244),

        header_fg: Color::Rgb(250, 250, 250),
        header_bg: Color::Rgb(242, 93, 148),

        border_card: Color::Rgb(135, 75, 253),
        border_chart: Color::Rgb(4, 181, 117),

        text_primary: Color::Rgb(230, 233, 248),
        highlight: Color::Rgb(238, 111, 248),
        text_muted: Color::Rgb(98, 98, 98),

        success: Color::Rgb(110, 220, 120),
        error: Color::Rgb(250, 80, 90),
        info: Color::Rgb(110, 200, 245),
        prompt: Color::Rgb(235, 225, 120),
    };

    #[inline]
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.title_fg)
            .bg(self.title_bg)
            .add_modifier(Modifier::BOLD)
    }

    #[inline]
    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    #[inline]
    pub fn highlighted(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    #[inline]
    pub fn dim(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    #[inline]
    pub fn bold(&self, color: Color) -> Style {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Presentation settings handed to each screen instead of global styles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub colors: ThemeColors,
    /// `chrono` format string for visit timestamps in the Details view
    pub timestamp_format: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            colors: ThemeColors::DEFAULT,
            timestamp_format: "%b %-d, %H:%M".to_string(),
        }
    }
}
