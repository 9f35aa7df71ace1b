//! Timeline: per-day activity for the most recent dates.

use super::helpers::{display_title, placeholder, section_header};
use crate::aggregate::group_by_date;
use crate::bar::render_activity_bar;
use ratatui::{
    style::Style,
    text::{Line, Span},
};

const SHOWN_DAYS: usize = 10;
const TITLE_WIDTH: usize = 50;

impl super::App {
    pub(super) fn timeline_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.options.colors;
        if self.entries.is_empty() {
            return placeholder("No timeline data available", colors);
        }

        let groups = group_by_date(&self.entries);
        // Scale against the busiest day overall, not just the visible window
        let busiest = groups.values().map(Vec::len).max().unwrap_or(0) as u64;
        let skip = groups.len().saturating_sub(SHOWN_DAYS);

        let mut lines = Vec::with_capacity(SHOWN_DAYS * 4 + 2);
        lines.push(section_header("📅 Timeline View", colors));
        lines.push(Line::default());

        for (date, day_entries) in groups.iter().skip(skip) {
            lines.push(Line::from(vec![
                Span::styled(format!("📅 {}", date), colors.highlighted()),
                Span::styled(
                    format!(" ({} visits)", day_entries.len()),
                    Style::default().fg(colors.text_primary),
                ),
            ]));
            lines.push(Line::from(Span::styled(
                format!("   {}", render_activity_bar(day_entries.len() as u64, busiest)),
                Style::default().fg(colors.border_chart),
            )));
            if let Some(first) = day_entries.first() {
                lines.push(Line::from(Span::styled(
                    format!("   🔝 {}", display_title(&first.title, TITLE_WIDTH)),
                    colors.dim(),
                )));
            }
            lines.push(Line::default());
        }

        lines
    }
}
