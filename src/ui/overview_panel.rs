//! Overview: headline totals and a top-domain bar chart.

use super::helpers::{bar_spans, placeholder, section_header, stat_line};
use crate::aggregate::compute_overview_stats;
use crate::bar::{pad_right, truncate};
use ratatui::text::{Line, Span};

const TOP_DOMAINS: usize = 8;
const DOMAIN_WIDTH: usize = 20;
const BAR_WIDTH: usize = 25;

impl super::App {
    pub(super) fn overview_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.options.colors;
        if self.entries.is_empty() {
            return placeholder("No browser history data found", colors);
        }

        let stats = compute_overview_stats(&self.entries);
        let top = stats.domain_frequency.top(TOP_DOMAINS);
        let max_count = top.first().map_or(0, |(_, c)| *c as u64);

        let mut lines = Vec::with_capacity(top.len() + 10);
        lines.push(section_header("📈 Statistics", colors));
        lines.push(Line::default());
        lines.push(stat_line("📊 Total Entries", stats.total_entries.to_string(), colors));
        lines.push(stat_line("🔄 Total Visits", stats.total_visit_count.to_string(), colors));
        lines.push(stat_line("🌐 Unique Domains", stats.domain_frequency.len().to_string(), colors));
        lines.push(Line::default());
        lines.push(section_header("🔝 Top Domains", colors));
        lines.push(Line::default());

        for (domain, count) in top {
            let [filled, empty] = bar_spans(count as u64, max_count, BAR_WIDTH, colors);
            lines.push(Line::from(vec![
                Span::raw(pad_right(&truncate(domain, DOMAIN_WIDTH), DOMAIN_WIDTH)),
                Span::raw(" "),
                filled,
                empty,
                Span::raw(format!(" {}", count)),
            ]));
        }

        lines
    }
}
