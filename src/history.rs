//! Browser history retrieval.
//!
//! Reads the SQLite history databases kept by Chrome and Firefox and
//! normalises their rows into [`VisitEntry`] records. Browser timestamps are
//! converted to the local time zone before anything downstream sees them.

use crate::config::Config;
use chrono::{DateTime, FixedOffset, Local, Utc};
use rusqlite::{Connection, ErrorCode, OpenFlags};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Seconds between 1601-01-01 (WebKit epoch) and 1970-01-01
const WEBKIT_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;

const CHROME_QUERY: &str = r#"
    SELECT urls.url, urls.title, urls.visit_count, visits.visit_time
    FROM urls
    JOIN visits ON urls.id = visits.url
    ORDER BY visits.visit_time DESC
    LIMIT ?1
"#;

const FIREFOX_QUERY: &str = r#"
    SELECT p.url, p.title, p.visit_count, v.visit_date
    FROM moz_places p
    JOIN moz_historyvisits v ON p.id = v.place_id
    ORDER BY v.visit_date DESC
    LIMIT ?1
"#;

/// One browsing-history record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitEntry {
    pub url: String,
    pub title: String,
    pub visit_count: u64,
    pub visit_time: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Browser {
    Chrome,
    Firefox,
}

impl Browser {
    pub const ALL: [Browser; 2] = [Browser::Chrome, Browser::Firefox];

    pub const fn name(self) -> &'static str {
        match self {
            Browser::Chrome => "Chrome",
            Browser::Firefox => "Firefox",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Browser::Chrome => "Google Chrome history file",
            Browser::Firefox => "Mozilla Firefox history file",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "google-chrome" => Some(Browser::Chrome),
            "firefox" => Some(Browser::Firefox),
            _ => None,
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("{browser} history database not found at {}", .path.display())]
    NotFound { browser: Browser, path: PathBuf },
    #[error("{browser} history database is locked")]
    Locked { browser: Browser },
    #[error("failed to query history database: {0}")]
    Query(#[from] rusqlite::Error),
    #[error("could not find a {browser} default-release profile in {}", .dir.display())]
    NoProfile { browser: Browser, dir: PathBuf },
    #[error("home directory not found")]
    HomeDirNotFound,
    #[error("{browser} history is not supported on {os}")]
    UnsupportedPlatform { browser: Browser, os: String },
    #[error("no {browser} history found or unable to access {browser} history")]
    Empty { browser: Browser },
    #[error("{browser} history reader stopped without returning a result")]
    WorkerFailed { browser: Browser },
}

impl HistoryError {
    /// Whether closing the browser is likely to fix the failure
    pub fn is_locked(&self) -> bool {
        matches!(self, HistoryError::Locked { .. })
    }
}

/// Resolve the configured browser's database and read its recent visits.
///
/// A readable database with no visits is reported as [`HistoryError::Empty`].
pub fn load_history(browser: Browser, config: &Config) -> Result<Vec<VisitEntry>, HistoryError> {
    let path = match config.history_path_override(browser) {
        Some(path) => path.clone(),
        None => default_history_path(browser, std::env::consts::OS, &|key: &str| {
            std::env::var(key).ok()
        })?,
    };
    log::info!("Reading {} history from {}", browser, path.display());

    let entries = read_history(browser, &path, config.limit)?;
    if entries.is_empty() {
        return Err(HistoryError::Empty { browser });
    }
    log::info!("Loaded {} {} history entries", entries.len(), browser);
    Ok(entries)
}

/// Platform default location of a browser's history database
pub fn default_history_path(
    browser: Browser,
    os: &str,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<PathBuf, HistoryError> {
    let var = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);
    let home = || var("HOME").ok_or(HistoryError::HomeDirNotFound);

    match (browser, os) {
        (Browser::Chrome, "linux") => Ok(home()?
            .join(".config")
            .join("google-chrome")
            .join("Default")
            .join("History")),
        (Browser::Chrome, "macos") => Ok(home()?
            .join("Library")
            .join("Application Support")
            .join("Google")
            .join("Chrome")
            .join("Default")
            .join("History")),
        (Browser::Chrome, "windows") => {
            let base = var("LOCALAPPDATA").ok_or(HistoryError::HomeDirNotFound)?;
            Ok(base
                .join("Google")
                .join("Chrome")
                .join("User Data")
                .join("Default")
                .join("History"))
        }
        (Browser::Firefox, "linux") => find_firefox_profile(&home()?.join(".mozilla").join("firefox")),
        (Browser::Firefox, "macos") => find_firefox_profile(
            &home()?
                .join("Library")
                .join("Application Support")
                .join("Firefox")
                .join("Profiles"),
        ),
        (Browser::Firefox, "windows") => {
            let base = var("APPDATA").ok_or(HistoryError::HomeDirNotFound)?;
            find_firefox_profile(&base.join("Mozilla").join("Firefox").join("Profiles"))
        }
        (browser, os) => Err(HistoryError::UnsupportedPlatform {
            browser,
            os: os.to_string(),
        }),
    }
}

/// First `*.default-release` profile (by name) holding a `places.sqlite`
fn find_firefox_profile(profiles_dir: &Path) -> Result<PathBuf, HistoryError> {
    let no_profile = || HistoryError::NoProfile {
        browser: Browser::Firefox,
        dir: profiles_dir.to_path_buf(),
    };

    let mut candidates: Vec<PathBuf> = fs::read_dir(profiles_dir)
        .map_err(|_| no_profile())?
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .filter(|e| e.file_name().to_string_lossy().ends_with(".default-release"))
        .map(|e| e.path().join("places.sqlite"))
        .filter(|p| p.is_file())
        .collect();
    candidates.sort();

    candidates.into_iter().next().ok_or_else(no_profile)
}

/// Read up to `limit` most recent visits from a history database.
pub fn read_history(
    browser: Browser,
    path: &Path,
    limit: usize,
) -> Result<Vec<VisitEntry>, HistoryError> {
    if !path.is_file() {
        return Err(HistoryError::NotFound {
            browser,
            path: path.to_path_buf(),
        });
    }

    let conn = open_db_readonly(path).map_err(|e| classify(browser, e))?;
    let sql = match browser {
        Browser::Chrome => CHROME_QUERY,
        Browser::Firefox => FIREFOX_QUERY,
    };

    let mut stmt = conn.prepare(sql).map_err(|e| classify(browser, e))?;
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = stmt
        .query_map([limit], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<i64>>(2)?,
                row.get::<_, Option<i64>>(3)?,
            ))
        })
        .map_err(|e| classify(browser, e))?;

    let mut entries = Vec::new();
    let mut skipped = 0usize;
    for row in rows {
        let (url, title, visit_count, raw_time) = row.map_err(|e| classify(browser, e))?;
        let Some(url) = url.filter(|u| !u.is_empty()) else {
            skipped += 1;
            continue;
        };
        let utc = match browser {
            Browser::Chrome => chrome_time_to_utc(raw_time.unwrap_or(0)),
            Browser::Firefox => firefox_time_to_utc(raw_time.unwrap_or(0)),
        };
        entries.push(VisitEntry {
            url,
            title: title.unwrap_or_default(),
            visit_count: visit_count.unwrap_or(0).max(0) as u64,
            visit_time: utc.with_timezone(&Local).fixed_offset(),
        });
    }

    if skipped > 0 {
        log::debug!("Skipped {} history rows without a URL", skipped);
    }
    Ok(entries)
}

fn open_db_readonly(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    if let Err(e) = conn.busy_timeout(Duration::from_millis(250)) {
        log::warn!("Failed to set busy timeout on {}: {}", path.display(), e);
    }
    Ok(conn)
}

fn classify(browser: Browser, error: rusqlite::Error) -> HistoryError {
    match &error {
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(e.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) =>
        {
            log::warn!("{} history database is locked: {}", browser, error);
            HistoryError::Locked { browser }
        }
        _ => {
            log::error!("{} history query failed: {}", browser, error);
            HistoryError::Query(error)
        }
    }
}

/// Chrome stores microseconds since 1601-01-01 UTC
pub fn chrome_time_to_utc(micros: i64) -> DateTime<Utc> {
    let unix_micros = micros.saturating_sub(WEBKIT_EPOCH_OFFSET_SECS * 1_000_000);
    DateTime::<Utc>::from_timestamp_micros(unix_micros).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Firefox stores microseconds since the Unix epoch
pub fn firefox_time_to_utc(micros: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_micros(micros).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};
    use tempfile::TempDir;

    fn chrome_fixture(dir: &TempDir, rows: &[(&str, Option<&str>, i64, i64)]) -> PathBuf {
        let path = dir.path().join("History");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE urls (id INTEGER PRIMARY KEY, url TEXT, title TEXT, visit_count INTEGER);
             CREATE TABLE visits (id INTEGER PRIMARY KEY, url INTEGER, visit_time INTEGER);",
        )
        .unwrap();
        for (i, (url, title, count, time)) in rows.iter().enumerate() {
            let id = i as i64 + 1;
            conn.execute(
                "INSERT INTO urls (id, url, title, visit_count) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, url, title, count],
            )
            .unwrap();
            conn.execute(
                "INSERT INTO visits (url, visit_time) VALUES (?1, ?2)",
                rusqlite::params![id, time],
            )
            .unwrap();
        }
        path
    }

    fn firefox_fixture(path: &Path, rows: &[(&str, &str, i64, i64)]) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE moz_places (id INTEGER PRIMARY KEY, url TEXT, title TEXT, visit_count INTEGER);
             CREATE TABLE moz_historyvisits (id INTEGER PRIMARY KEY, place_id INTEGER, visit_date INTEGER);",
        )
        .unwrap();
        for (i, (url, title, count, time)) in rows.iter().enumerate() {
            let id = i as i64 + 1;
            conn.execute(
                "INSERT INTO moz_places (id, url, title, visit_count) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, url, title, count],
            )
            .unwrap();
            conn.execute(
                "INSERT INTO moz_historyvisits (place_id, visit_date) VALUES (?1, ?2)",
                rusqlite::params![id, time],
            )
            .unwrap();
        }
    }

    #[test]
    fn test_chrome_epoch_conversion() {
        // 2021-01-01T00:00:00Z in WebKit microseconds
        let webkit = (1_609_459_200 + WEBKIT_EPOCH_OFFSET_SECS) * 1_000_000;
        let t = chrome_time_to_utc(webkit);
        assert_eq!(t, Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_firefox_epoch_conversion() {
        let t = firefox_time_to_utc(1_609_459_200_000_000 + 1_500_000);
        assert_eq!(t.year(), 2021);
        assert_eq!(t.second(), 1);
        assert_eq!(t.timestamp_subsec_micros(), 500_000);
    }

    #[test]
    fn test_out_of_range_timestamp_clamps_to_epoch() {
        assert_eq!(firefox_time_to_utc(i64::MAX), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_read_chrome_history_newest_first() {
        let dir = TempDir::new().unwrap();
        let base = WEBKIT_EPOCH_OFFSET_SECS * 1_000_000;
        let path = chrome_fixture(
            &dir,
            &[
                ("https://old.example/", Some("Old"), 2, base + 1_000_000),
                ("https://new.example/", None, 7, base + 9_000_000),
                ("", Some("No url"), 1, base + 5_000_000),
            ],
        );

        let entries = read_history(Browser::Chrome, &path, 10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, "https://new.example/");
        assert_eq!(entries[0].title, "");
        assert_eq!(entries[0].visit_count, 7);
        assert_eq!(entries[1].url, "https://old.example/");
        assert_eq!(entries[1].visit_time.timestamp(), 1);
    }

    #[test]
    fn test_read_history_respects_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("places.sqlite");
        firefox_fixture(
            &path,
            &[
                ("https://a.example/", "A", 1, 1_000_000),
                ("https://b.example/", "B", 1, 2_000_000),
                ("https://c.example/", "C", 1, 3_000_000),
            ],
        );

        let entries = read_history(Browser::Firefox, &path, 2).unwrap();
        let urls: Vec<_> = entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["https://c.example/", "https://b.example/"]);
    }

    #[test]
    fn test_missing_database_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = read_history(Browser::Chrome, &dir.path().join("nope"), 10).unwrap_err();
        assert!(matches!(err, HistoryError::NotFound { browser: Browser::Chrome, .. }));
    }

    #[test]
    fn test_wrong_schema_is_query_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("History");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE other (x INTEGER);")
            .unwrap();
        let err = read_history(Browser::Chrome, &path, 10).unwrap_err();
        assert!(matches!(err, HistoryError::Query(_)));
        assert!(!err.is_locked());
    }

    #[test]
    fn test_load_history_reports_empty() {
        let dir = TempDir::new().unwrap();
        let path = chrome_fixture(&dir, &[]);
        let config = Config {
            chrome_history_path: Some(path),
            ..Config::default()
        };
        let err = load_history(Browser::Chrome, &config).unwrap_err();
        assert!(matches!(err, HistoryError::Empty { browser: Browser::Chrome }));
        assert_eq!(
            err.to_string(),
            "no Chrome history found or unable to access Chrome history"
        );
    }

    #[test]
    fn test_default_chrome_paths() {
        let lookup = |key: &str| match key {
            "HOME" => Some("/home/u".to_string()),
            "LOCALAPPDATA" => Some("C:/Users/u/AppData/Local".to_string()),
            _ => None,
        };
        assert_eq!(
            default_history_path(Browser::Chrome, "linux", &lookup).unwrap(),
            PathBuf::from("/home/u/.config/google-chrome/Default/History")
        );
        assert_eq!(
            default_history_path(Browser::Chrome, "windows", &lookup).unwrap(),
            PathBuf::from("C:/Users/u/AppData/Local")
                .join("Google")
                .join("Chrome")
                .join("User Data")
                .join("Default")
                .join("History")
        );
        let err = default_history_path(Browser::Chrome, "haiku", &lookup).unwrap_err();
        assert!(matches!(err, HistoryError::UnsupportedPlatform { .. }));
    }

    #[test]
    fn test_missing_home_is_reported() {
        let err = default_history_path(Browser::Chrome, "linux", &|_| None).unwrap_err();
        assert!(matches!(err, HistoryError::HomeDirNotFound));
    }

    #[test]
    fn test_firefox_profile_discovery() {
        let home = TempDir::new().unwrap();
        let profiles = home.path().join(".mozilla").join("firefox");
        fs::create_dir_all(profiles.join("zzz.default")).unwrap();
        fs::create_dir_all(profiles.join("b2.default-release")).unwrap();
        fs::create_dir_all(profiles.join("a1.default-release")).unwrap();
        fs::write(profiles.join("zzz.default").join("places.sqlite"), b"").unwrap();
        fs::write(profiles.join("b2.default-release").join("places.sqlite"), b"").unwrap();

        let home_str = home.path().to_string_lossy().to_string();
        let lookup = move |key: &str| (key == "HOME").then(|| home_str.clone());
        let path = default_history_path(Browser::Firefox, "linux", &lookup).unwrap();
        assert_eq!(path, profiles.join("b2.default-release").join("places.sqlite"));
    }

    #[test]
    fn test_firefox_without_profile() {
        let home = TempDir::new().unwrap();
        let home_str = home.path().to_string_lossy().to_string();
        let lookup = move |key: &str| (key == "HOME").then(|| home_str.clone());
        let err = default_history_path(Browser::Firefox, "linux", &lookup).unwrap_err();
        assert!(matches!(err, HistoryError::NoProfile { browser: Browser::Firefox, .. }));
    }

    #[test]
    fn test_browser_parse_and_display() {
        assert_eq!(Browser::parse(" Chrome "), Some(Browser::Chrome));
        assert_eq!(Browser::parse("FIREFOX"), Some(Browser::Firefox));
        assert_eq!(Browser::parse("edge"), None);
        assert_eq!(Browser::Firefox.to_string(), "Firefox");
    }
}
