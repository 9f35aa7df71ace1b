//! Top sites: domains ranked by summed visit count.

use super::helpers::{bar_spans, placeholder, section_header};
use crate::aggregate::rank_domains;
use ratatui::{
    style::Style,
    text::{Line, Span},
};

const TOP_SITES: usize = 15;
const BAR_WIDTH: usize = 20;

impl super::App {
    pub(super) fn top_sites_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.options.colors;
        if self.entries.is_empty() {
            return placeholder("No sites data available", colors);
        }

        let ranks = rank_domains(&self.entries);
        let top_visits = ranks.first().map_or(0, |r| r.visits);

        let mut lines = Vec::with_capacity(TOP_SITES * 3 + 2);
        lines.push(section_header("🏆 Top Sites", colors));
        lines.push(Line::default());

        for (i, site) in ranks.iter().take(TOP_SITES).enumerate() {
            let [filled, empty] = bar_spans(site.visits, top_visits, BAR_WIDTH, colors);
            lines.push(Line::from(vec![
                Span::styled(format!("{:2}.", i + 1), colors.highlighted()),
                Span::raw(" "),
                filled,
                empty,
                Span::raw(" "),
                Span::styled(site.domain.clone(), Style::default().fg(colors.text_primary)),
            ]));
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(site.visits.to_string(), colors.dim()),
                Span::raw(" visits • "),
                Span::styled(site.entries.to_string(), colors.dim()),
                Span::raw(" entries"),
            ]));
            lines.push(Line::default());
        }

        lines
    }
}
