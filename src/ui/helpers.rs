//! Helper functions shared by the view panels

use crate::bar::{filled_len, render_bar, truncate, FILLED};
use crate::theme::ThemeColors;
use ratatui::{
    style::Style,
    text::{Line, Span},
};

/// Title shown for entries without one
pub const UNTITLED: &str = "Untitled";

/// Helper: Section header line rendered on the header background
pub fn section_header(title: &str, colors: &ThemeColors) -> Line<'static> {
    Line::from(Span::styled(format!(" {} ", title), colors.header()))
}

/// Helper: `label: value` line with the value emphasised
pub fn stat_line(label: &str, value: String, colors: &ThemeColors) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(colors.text_primary)),
        Span::styled(value, colors.bold(colors.info)),
    ])
}

/// Helper: Magnitude bar split into a highlighted filled run and a dim empty run.
/// Same glyphs as [`render_bar`].
pub fn bar_spans(value: u64, max: u64, width: usize, colors: &ThemeColors) -> [Span<'static>; 2] {
    let bar = render_bar(value, max, width);
    let split = filled_len(value, max, width) * FILLED.len_utf8();
    let (filled, empty) = bar.split_at(split);
    [
        Span::styled(filled.to_string(), colors.highlighted()),
        Span::styled(empty.to_string(), colors.dim()),
    ]
}

/// Helper: Page title truncated to `max` chars, "Untitled" when blank
pub fn display_title(title: &str, max: usize) -> String {
    if title.trim().is_empty() {
        return UNTITLED.to_string();
    }
    truncate(title, max).into_owned()
}

/// Helper: Content shown in place of a view when there is nothing to show
pub fn placeholder(message: &str, colors: &ThemeColors) -> Vec<Line<'static>> {
    vec![
        Line::default(),
        Line::from(Span::styled(message.to_string(), colors.bold(colors.info))),
    ]
}
