//! Application entry point

use std::io;
use std::sync::Arc;

mod aggregate;
mod bar;
mod config;
mod history;
mod loader;
mod menu;
mod theme;
mod ui;

use config::Config;
use history::Browser;
use loader::{LoadOutcome, Loader};
use menu::{BrowserMenu, MenuOutcome};
use theme::RenderOptions;

/// Restore terminal to normal mode.
fn cleanup_terminal() {
    use std::io::Write;
    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    );
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

/// Install panic hook to restore terminal before printing error.
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        cleanup_terminal();
        eprintln!("Application panicked!");
        if let Some(location) = panic_info.location() {
            eprintln!("Location: {}", location);
        }
        if let Some(payload) = panic_info.payload().downcast_ref::<&str>() {
            eprintln!("Message: {}", payload);
        } else if let Some(payload) = panic_info.payload().downcast_ref::<String>() {
            eprintln!("Message: {}", payload);
        }
        log::error!("Panic: {}", panic_info);
        original_hook(panic_info);
    }));
}

/// Drain all pending input events until silence.
fn drain_input_events_until_silence(silence_duration: std::time::Duration) {
    use crossterm::event::{poll, read};

    for _ in 0..3 {
        let mut events_drained = 0;
        while poll(silence_duration).unwrap_or(false) {
            let _ = read();
            events_drained += 1;
        }
        if events_drained == 0 {
            break;
        }
    }
}

/// Flush OS-level terminal input buffer.
#[cfg(unix)]
fn flush_stdin_buffer() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        libc::tcflush(std::io::stdin().as_raw_fd(), libc::TCIFLUSH);
    }
}

#[cfg(not(unix))]
fn flush_stdin_buffer() {}

/// Menu (unless preselected), then fetch, then the viewer.
fn run(terminal: &mut ratatui::DefaultTerminal, config: &Config) -> io::Result<()> {
    let options = RenderOptions::default();

    let browser = match config.browser {
        Some(browser) => browser,
        None => match BrowserMenu::new(options.clone()).run(terminal)? {
            MenuOutcome::Selected(browser) => browser,
            MenuOutcome::Cancelled => return Ok(()),
        },
    };
    log::info!("Selected browser: {}", browser);

    let fetch_config = config.clone();
    let fetch = Arc::new(move |browser: Browser| history::load_history(browser, &fetch_config));
    let entries = match Loader::new(browser, fetch, options.clone()).run(terminal)? {
        LoadOutcome::Continue(entries) => entries,
        LoadOutcome::Quit => return Ok(()),
    };

    ui::App::new(entries, ui::DEFAULT_WIDTH, ui::DEFAULT_HEIGHT, options)
        .run(terminal)
        .inspect_err(|e| log::error!("History viewer failed: {}", e))
}

fn main() -> io::Result<()> {
    let config = Config::from_env();
    config::init_logging(&config);
    log::debug!("Configuration: {:?}", config);

    setup_panic_hook();

    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::cursor::Hide
    )?;
    crossterm::terminal::enable_raw_mode()?;

    let backend = ratatui::backend::CrosstermBackend::new(std::io::stdout());
    let mut terminal = ratatui::Terminal::new(backend)?;

    let result = run(&mut terminal, &config);

    // Terminal cleanup sequence
    drain_input_events_until_silence(std::time::Duration::from_millis(50));
    flush_stdin_buffer();
    cleanup_terminal();

    if let Err(e) = &result {
        eprintln!("Error running program: {}", e);
    }
    result
}
