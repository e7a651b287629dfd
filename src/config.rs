use std::env;
use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};

// Hours behind UTC for NBA schedule dates. Fixed offset; DST drift accepted.
const EASTERN_UTC_LAG_HOURS: i64 = 5;

/// Explicit run configuration, built once by the binary and passed down.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub output_html: PathBuf,
    pub report_path: PathBuf,
    pub audit_report_path: PathBuf,
    pub picks_path: PathBuf,
    /// Scoreboard date in `YYYYMMDD`, defaulting to today in Eastern time.
    pub schedule_date: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = match env::var("GEMINI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => key,
            _ => bail!("GEMINI_API_KEY is not set; export it or add it to .env"),
        };
        let schedule_date = env::var("NBA_DATE")
            .ok()
            .and_then(|raw| normalize_date(&raw))
            .unwrap_or_else(|| eastern_today().format("%Y%m%d").to_string());

        Ok(Self {
            api_key,
            output_html: path_env("NBA_OUTPUT_HTML", "index.html"),
            report_path: path_env("NBA_REPORT_FILE", "daily_report.txt"),
            audit_report_path: path_env("NBA_AUDIT_FILE", "audit_report.txt"),
            picks_path: path_env("NBA_PICKS_FILE", "picks.txt"),
            schedule_date,
        })
    }
}

/// Today's date shifted to US Eastern time by the fixed offset.
pub fn eastern_today() -> NaiveDate {
    (Utc::now() - ChronoDuration::hours(EASTERN_UTC_LAG_HOURS)).date_naive()
}

/// Human-readable form of a `YYYYMMDD` schedule date; unparseable input is
/// shown as-is rather than hidden.
pub fn date_label(schedule_date: &str) -> String {
    NaiveDate::parse_from_str(schedule_date.trim(), "%Y%m%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| schedule_date.trim().to_string())
}

fn normalize_date(raw: &str) -> Option<String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y%m%d")
        .ok()
        .map(|date| date.format("%Y%m%d").to_string())
}

fn path_env(key: &str, default: &str) -> PathBuf {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
