//! Runtime configuration read from the environment

use crate::history::Browser;
use std::env;
use std::path::PathBuf;

/// Default number of visit rows read from a history database
pub const DEFAULT_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Preselected browser; `None` shows the selection menu
    pub browser: Option<Browser>,
    pub chrome_history_path: Option<PathBuf>,
    pub firefox_history_path: Option<PathBuf>,
    pub limit: usize,
    pub debug: bool,
    pub log_file: PathBuf,
    /// Fallbacks taken while parsing, logged once the logger is up
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser: None,
            chrome_history_path: None,
            firefox_history_path: None,
            limit: DEFAULT_LIMIT,
            debug: false,
            log_file: default_log_file(None, None),
            warnings: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source so tests never touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut warnings = Vec::new();

        let browser = match non_empty("HISTOGRAPH_BROWSER") {
            Some(v) => {
                let parsed = Browser::parse(&v);
                if parsed.is_none() {
                    warnings.push(format!("Ignoring unknown HISTOGRAPH_BROWSER value: {}", v));
                }
                parsed
            }
            None => None,
        };

        let limit = match non_empty("HISTOGRAPH_LIMIT") {
            Some(v) => match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warnings.push(format!("Invalid HISTOGRAPH_LIMIT '{}', using {}", v, DEFAULT_LIMIT));
                    DEFAULT_LIMIT
                }
            },
            None => DEFAULT_LIMIT,
        };

        let log_file = non_empty("HISTOGRAPH_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_log_file(non_empty("XDG_CACHE_HOME"), non_empty("HOME")));

        Self {
            browser,
            chrome_history_path: non_empty("CHROME_HISTORY_PATH").map(PathBuf::from),
            firefox_history_path: non_empty("FIREFOX_HISTORY_PATH").map(PathBuf::from),
            limit,
            debug: non_empty("HISTOGRAPH_DEBUG").is_some_and(|v| v.trim() == "1"),
            log_file,
            warnings,
        }
    }

    /// Path override for a browser, if one was configured
    pub fn history_path_override(&self, browser: Browser) -> Option<&PathBuf> {
        match browser {
            Browser::Chrome => self.chrome_history_path.as_ref(),
            Browser::Firefox => self.firefox_history_path.as_ref(),
        }
    }
}

fn default_log_file(xdg_cache: Option<String>, home: Option<String>) -> PathBuf {
    let cache_dir = xdg_cache.unwrap_or_else(|| {
        let home = home.unwrap_or_else(|| ".".to_string());
        format!("{}/.cache", home)
    });
    PathBuf::from(cache_dir)
        .join("histograph")
        .join("histograph.log")
}

/// Route `log` records to a file when debugging is enabled, then replay
/// the configuration warnings collected before the logger existed.
///
/// Runs before the TUI takes the terminal, so setup failures go to stderr.
pub fn init_logging(config: &Config) {
    if !config.debug {
        return;
    }

    if let Some(parent) = config.log_file.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Failed to create log directory {}: {}", parent.display(), e);
        }
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!(
                "Debug logging disabled: cannot open {}: {}",
                config.log_file.display(),
                e
            );
            return;
        }
    };

    if let Err(e) = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
    {
        eprintln!("Debug logging disabled: {}", e);
        return;
    }

    log::info!("Logging to {}", config.log_file.display());
    for warning in &config.warnings {
        log::warn!("{}", warning);
    }
}
