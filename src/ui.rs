//! History viewer: view state machine, event handling and frame layout.

mod details_panel;
mod helpers;
mod overview_panel;
mod sites_panel;
mod timeline_panel;

use crate::history::VisitEntry;
use crate::theme::RenderOptions;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use std::io;
use std::sync::Arc;

/// Size assumed until the terminal reports its own
pub const DEFAULT_WIDTH: u16 = 120;
pub const DEFAULT_HEIGHT: u16 = 40;

/// Rows taken by title, nav bar, footer and the content border
const CHROME_ROWS: u16 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Overview,
    Timeline,
    TopSites,
    Details,
}

impl View {
    pub const ALL: [View; 4] = [View::Overview, View::Timeline, View::TopSites, View::Details];

    pub const fn key(self) -> char {
        match self {
            View::Overview => '1',
            View::Timeline => '2',
            View::TopSites => '3',
            View::Details => '4',
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Timeline => "Timeline",
            View::TopSites => "Top Sites",
            View::Details => "Details",
        }
    }

    pub fn from_key(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.key() == c)
    }
}

/// Input the viewer reacts to; everything else is ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Switch(View),
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
    Quit,
}

impl Action {
    /// Map a key token such as `"1"`, `"k"`, `"down"` or `"ctrl+c"`.
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "up" | "k" => Action::Up,
            "down" | "j" => Action::Down,
            "pgup" => Action::PageUp,
            "pgdown" => Action::PageDown,
            "home" => Action::Top,
            "end" => Action::Bottom,
            "q" | "esc" | "ctrl+c" => Action::Quit,
            _ => {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Action::Switch(View::from_key(c)?),
                    _ => return None,
                }
            }
        })
    }

    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Action::Quit),
                _ => None,
            };
        }
        match key.code {
            KeyCode::Up => Some(Action::Up),
            KeyCode::Down => Some(Action::Down),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::Home => Some(Action::Top),
            KeyCode::End => Some(Action::Bottom),
            KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char(c) => Self::from_token(c.encode_utf8(&mut [0; 4])),
            _ => None,
        }
    }
}

pub struct App {
    entries: Arc<[VisitEntry]>,
    options: RenderOptions,
    current_view: View,
    /// Cursor into the record list. Clamped on navigation but not yet
    /// reflected in any view's output.
    selected_index: usize,
    width: u16,
    height: u16,
    content: Vec<Line<'static>>,
    scroll: u16,
    exit: bool,
}

impl App {
    pub fn new(
        entries: impl Into<Arc<[VisitEntry]>>,
        width: u16,
        height: u16,
        options: RenderOptions,
    ) -> Self {
        let mut app = Self {
            entries: entries.into(),
            options,
            current_view: View::Overview,
            selected_index: 0,
            width,
            height,
            content: Vec::new(),
            scroll: 0,
            exit: false,
        };
        app.refresh_content();
        app
    }
}

#[cfg(test)]
impl App {
    pub fn current_view(&self) -> View {
        self.current_view
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn viewport(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn should_exit(&self) -> bool {
        self.exit
    }

    /// Rendered lines of the active view
    pub fn content(&self) -> &[Line<'static>] {
        &self.content
    }
}

impl App {
    /// Build the content for any view from the current record set.
    pub fn render_view(&self, view: View) -> Vec<Line<'static>> {
        match view {
            View::Overview => self.overview_lines(),
            View::Timeline => self.timeline_lines(),
            View::TopSites => self.top_sites_lines(),
            View::Details => self.details_lines(),
        }
    }

    fn refresh_content(&mut self) {
        self.content = self.render_view(self.current_view);
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn content_height(&self) -> u16 {
        self.height.saturating_sub(CHROME_ROWS).max(1)
    }

    fn max_scroll(&self) -> u16 {
        let lines = u16::try_from(self.content.len()).unwrap_or(u16::MAX);
        lines.saturating_sub(self.content_height())
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Switch(view) => {
                log::debug!("Switching to {} view", view.label());
                self.current_view = view;
                self.scroll = 0;
                self.refresh_content();
            }
            Action::Up => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }
            Action::Down => {
                if self.selected_index + 1 < self.entries.len() {
                    self.selected_index += 1;
                }
            }
            Action::PageUp => {
                self.scroll = self.scroll.saturating_sub(self.content_height());
            }
            Action::PageDown => {
                self.scroll = self
                    .scroll
                    .saturating_add(self.content_height())
                    .min(self.max_scroll());
            }
            Action::Top => self.scroll = 0,
            Action::Bottom => self.scroll = self.max_scroll(),
            Action::Quit => self.exit = true,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        log::debug!("Viewport resized to {}x{}", width, height);
        self.width = width;
        self.height = height;
        self.refresh_content();
    }

    /// Feed one terminal event; returns whether a redraw is needed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match Action::from_key(*key) {
                Some(action) => {
                    self.apply(action);
                    true
                }
                None => false,
            },
            Event::Resize(w, h) => {
                self.resize(*w, *h);
                true
            }
            _ => false,
        }
    }

    pub fn run(&mut self, terminal: &mut ratatui::DefaultTerminal) -> io::Result<()> {
        if let Ok(size) = terminal.size() {
            self.resize(size.width, size.height);
        }
        let mut should_redraw = true;

        while !self.exit {
            if should_redraw {
                terminal.draw(|frame| self.render(frame))?;
            }
            should_redraw = self.handle_event(&event::read()?);
        }

        log::debug!("Viewer closed on {} view", self.current_view.label());
        Ok(())
    }

    pub fn render(&self, frame: &mut Frame) {
        let colors = &self.options.colors;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let title = Paragraph::new(Line::from(Span::styled(
            "🌐 Browser History Analyzer",
            colors.title(),
        )))
        .style(Style::default().bg(colors.title_bg))
        .alignment(Alignment::Center);
        frame.render_widget(title, chunks[0]);

        frame.render_widget(Paragraph::new(self.nav_line()), chunks[2]);
        self.render_content(frame, chunks[4]);

        let footer = Paragraph::new(Line::from(Span::styled(
            "Press 1-4 to switch views, ↑/↓ to navigate, PgUp/PgDn to scroll, q to quit",
            colors.dim(),
        )));
        frame.render_widget(footer, chunks[5]);
    }

    fn nav_line(&self) -> Line<'static> {
        let colors = &self.options.colors;
        let mut spans = Vec::with_capacity(View::ALL.len() * 2);
        for (i, view) in View::ALL.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", colors.dim()));
            }
            let style = if view == self.current_view {
                colors.highlighted()
            } else {
                colors.dim()
            };
            spans.push(Span::styled(format!("[{}] {}", view.key(), view.label()), style));
        }
        Line::from(spans)
    }

    fn render_content(&self, frame: &mut Frame, area: Rect) {
        let colors = &self.options.colors;
        let border = match self.current_view {
            View::Overview | View::Timeline => colors.border_chart,
            View::TopSites | View::Details => colors.border_card,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .title(
                Line::from(Span::styled(
                    format!(" {} ", self.current_view.label().to_uppercase()),
                    colors.bold(border),
                ))
                .alignment(Alignment::Center),
            );

        let paragraph = Paragraph::new(self.content.clone())
            .block(block)
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }
}
