//! Details: the most recent visits, newest first.

use super::helpers::{display_title, placeholder, section_header};
use crate::aggregate::sort_by_recency;
use ratatui::text::{Line, Span};

const RECENT_ENTRIES: usize = 20;
const TITLE_WIDTH: usize = 60;

impl super::App {
    pub(super) fn details_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.options.colors;
        if self.entries.is_empty() {
            return placeholder("No detailed data available", colors);
        }

        let mut lines = Vec::with_capacity(RECENT_ENTRIES * 4 + 2);
        lines.push(section_header("🔍 Recent History Details", colors));
        lines.push(Line::default());

        for entry in sort_by_recency(&self.entries).into_iter().take(RECENT_ENTRIES) {
            let time = entry
                .visit_time
                .format(&self.options.timestamp_format)
                .to_string();
            lines.push(Line::from(vec![
                Span::raw("🌐 "),
                Span::styled(display_title(&entry.title, TITLE_WIDTH), colors.highlighted()),
            ]));
            lines.push(Line::from(vec![
                Span::raw("   "),
                Span::styled(entry.url.clone(), colors.dim()),
            ]));
            lines.push(Line::from(vec![
                Span::raw("   "),
                Span::styled(time, colors.dim()),
                Span::raw(" • "),
                Span::styled(entry.visit_count.to_string(), colors.dim()),
                Span::raw(" visits"),
            ]));
            lines.push(Line::default());
        }

        lines
    }
}
