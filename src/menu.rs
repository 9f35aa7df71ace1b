//! Browser selection prompt

use crate::history::Browser;
use crate::theme::RenderOptions;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, HighlightSpacing, List, ListItem, ListState},
    Frame,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    Selected(Browser),
    Cancelled,
}

pub struct BrowserMenu {
    options: RenderOptions,
    state: ListState,
}

impl BrowserMenu {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            state: ListState::default().with_selected(Some(0)),
        }
    }

    pub fn selected(&self) -> Browser {
        let i = self.state.selected().unwrap_or(0).min(Browser::ALL.len() - 1);
        Browser::ALL[i]
    }

    /// Returns an outcome once the user picks a browser or backs out.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<MenuOutcome> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(MenuOutcome::Cancelled);
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                let i = self.state.selected().unwrap_or(0);
                self.state.select(Some(i.saturating_sub(1)));
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let i = self.state.selected().unwrap_or(0);
                self.state.select(Some((i + 1).min(Browser::ALL.len() - 1)));
                None
            }
            KeyCode::Enter => Some(MenuOutcome::Selected(self.selected())),
            KeyCode::Char('q') | KeyCode::Esc => Some(MenuOutcome::Cancelled),
            _ => None,
        }
    }

    pub fn run(&mut self, terminal: &mut ratatui::DefaultTerminal) -> io::Result<MenuOutcome> {
        loop {
            terminal.draw(|frame| self.render(frame))?;
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(outcome) = self.handle_key(key) {
                    return Ok(outcome);
                }
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let colors = self.options.colors;
        let area = frame.area();
        let height = (Browser::ALL.len() as u16) * 3 + 4;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(height),
                Constraint::Min(0),
            ])
            .split(area);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(48u16.min(area.width)),
                Constraint::Min(0),
            ])
            .split(rows[1]);

        let items: Vec<ListItem> = Browser::ALL
            .iter()
            .map(|b| {
                ListItem::new(vec![
                    Line::from(Span::styled(b.name(), colors.bold(colors.text_primary))),
                    Line::from(Span::styled(b.description(), colors.dim())),
                    Line::default(),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(colors.border_card))
                    .title(
                        Line::from(Span::styled(" Choose your browser ", colors.header()))
                            .alignment(Alignment::Center),
                    )
                    .title_bottom(
                        Line::from(Span::styled(" ↑↓: move │ Enter: select │ q: quit ", colors.dim()))
                            .alignment(Alignment::Center),
                    ),
            )
            .highlight_style(
                Style::default()
                    .fg(colors.highlight)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("│ ")
            .highlight_spacing(HighlightSpacing::Always);

        frame.render_stateful_widget(list, cols[1], &mut self.state);
    }
}
