//! Fetch screen shown while history is read on a worker thread

use crate::history::{Browser, HistoryError, VisitEntry};
use crate::theme::RenderOptions;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};
use std::io;
use std::sync::{mpsc, Arc};
use std::time::Duration;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const TICK: Duration = Duration::from_millis(100);

/// Retrieval function run on the worker thread
pub type Fetch = Arc<dyn Fn(Browser) -> Result<Vec<VisitEntry>, HistoryError> + Send + Sync>;

pub enum LoadOutcome {
    Continue(Vec<VisitEntry>),
    Quit,
}

enum LoadState {
    Loading(mpsc::Receiver<Result<Vec<VisitEntry>, HistoryError>>),
    Loaded(Vec<VisitEntry>),
    Failed(HistoryError),
}

pub struct Loader {
    browser: Browser,
    fetch: Fetch,
    options: RenderOptions,
    state: LoadState,
    spinner_frame: usize,
}

impl Loader {
    /// Create the screen and immediately start fetching.
    pub fn new(browser: Browser, fetch: Fetch, options: RenderOptions) -> Self {
        let state = Self::spawn(browser, &fetch);
        Self {
            browser,
            fetch,
            options,
            state,
            spinner_frame: 0,
        }
    }

    fn spawn(browser: Browser, fetch: &Fetch) -> LoadState {
        log::info!("Fetching {} history", browser);
        let (tx, rx) = mpsc::channel();
        let fetch = Arc::clone(fetch);
        std::thread::spawn(move || {
            // Receiver may be gone if the user quit mid-fetch
            let _ = tx.send(fetch(browser));
        });
        LoadState::Loading(rx)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading(_))
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&HistoryError> {
        match &self.state {
            LoadState::Failed(e) => Some(e),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn loaded_count(&self) -> Option<usize> {
        match &self.state {
            LoadState::Loaded(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Pick up the worker's result if it has arrived; returns whether state changed.
    pub fn poll_result(&mut self) -> bool {
        let LoadState::Loading(rx) = &self.state else {
            return false;
        };
        let next = match rx.try_recv() {
            Ok(Ok(entries)) => LoadState::Loaded(entries),
            Ok(Err(e)) => {
                log::error!("Failed to load {} history: {}", self.browser, e);
                LoadState::Failed(e)
            }
            Err(mpsc::TryRecvError::Empty) => return false,
            Err(mpsc::TryRecvError::Disconnected) => {
                log::error!("{} history worker exited without a result", self.browser);
                LoadState::Failed(HistoryError::WorkerFailed {
                    browser: self.browser,
                })
            }
        };
        self.state = next;
        true
    }

    pub fn tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<LoadOutcome> {
        if (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
            || key.code == KeyCode::Char('q')
            || key.code == KeyCode::Esc
        {
            return Some(LoadOutcome::Quit);
        }
        if key.code != KeyCode::Enter {
            return None;
        }
        if let LoadState::Loaded(entries) = &mut self.state {
            return Some(LoadOutcome::Continue(std::mem::take(entries)));
        }
        if matches!(self.state, LoadState::Failed(_)) {
            self.state = Self::spawn(self.browser, &self.fetch);
        }
        None
    }

    pub fn run(&mut self, terminal: &mut ratatui::DefaultTerminal) -> io::Result<LoadOutcome> {
        loop {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if let Some(outcome) = self.handle_key(key) {
                            return Ok(outcome);
                        }
                    }
                }
            } else if self.is_loading() {
                self.tick();
            }
            self.poll_result();
        }
    }

    fn body(&self) -> Vec<Line<'static>> {
        let colors = &self.options.colors;
        match &self.state {
            LoadState::Loading(_) => vec![Line::from(vec![
                Span::styled(SPINNER[self.spinner_frame], colors.highlighted()),
                Span::styled(
                    format!(" Fetching {} history...", self.browser),
                    colors.highlighted(),
                ),
            ])],
            LoadState::Loaded(entries) => vec![
                Line::from(Span::styled(
                    format!("✅ Found {} history entries", entries.len()),
                    colors.bold(colors.success),
                )),
                Line::default(),
                Line::from(Span::styled(
                    format!("🚀 Starting {} History Visualizer...", self.browser),
                    colors.bold(colors.info),
                )),
                Line::default(),
                Line::from(Span::styled(
                    "Press 'enter' to continue or 'q' to quit",
                    colors.bold(colors.prompt),
                )),
            ],
            LoadState::Failed(e) => {
                let hint = if e.is_locked() {
                    "Your browser is holding the history database. Close it and retry."
                } else {
                    "Make sure your browser is closed and try again."
                };
                vec![
                    Line::from(Span::styled(format!("❌ Error: {}", e), colors.bold(colors.error))),
                    Line::default(),
                    Line::from(Span::styled(hint, colors.bold(colors.info))),
                    Line::default(),
                    Line::from(Span::styled(
                        "Press 'q' to quit or 'enter' to retry",
                        colors.bold(colors.prompt),
                    )),
                ]
            }
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let colors = &self.options.colors;
        let area = frame.area();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(9),
                Constraint::Min(0),
            ])
            .split(area);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(72u16.min(area.width)),
                Constraint::Min(0),
            ])
            .split(rows[1]);

        let card = Paragraph::new(self.body())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(colors.border_card))
                    .title_bottom(
                        Line::from(Span::styled(" ✨ Thanks for using Histograph! ", colors.dim()))
                            .alignment(Alignment::Center),
                    ),
            );
        frame.render_widget(card, cols[1]);
    }
}
