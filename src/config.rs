use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ticker: String,
    pub start_date: NaiveDate,
    /// Defaults to today when absent.
    pub end_date: Option<NaiveDate>,
    pub sma_fast_window: usize,
    pub sma_slow_window: usize,
    pub rsi_window: usize,
    pub stats_window: usize,
    pub chart_days: usize,
    pub request_timeout_seconds: u64,
    pub output: OutputFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ticker: "RELIANCE.NS".to_string(),
            start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            end_date: None,
            sma_fast_window: 50,
            sma_slow_window: 100,
            rsi_window: 14,
            stats_window: 90,
            chart_days: 30,
            request_timeout_seconds: 10,
            output: OutputFormat::Text,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} must be at least 1")]
    ZeroWindow(&'static str),
    #[error("start date {start} is not before end date {end}")]
    EmptyRange { start: NaiveDate, end: NaiveDate },
}

impl AppConfig {
    pub fn effective_end_date(&self) -> NaiveDate {
        self.end_date.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("sma_fast_window", self.sma_fast_window),
            ("sma_slow_window", self.sma_slow_window),
            ("rsi_window", self.rsi_window),
            ("stats_window", self.stats_window),
            ("chart_days", self.chart_days),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, w)| *w == 0) {
            return Err(ConfigError::ZeroWindow(*name));
        }
        validate_range(self.start_date, self.effective_end_date())
    }
}

pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<(), ConfigError> {
    if start >= end {
        return Err(ConfigError::EmptyRange { start, end });
    }
    Ok(())
}

/// Loads the config file, falling back to defaults when it does not exist.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    let config = match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str::<AppConfig>(&content)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("{} not found, using defaults", path.display());
            AppConfig::default()
        }
        Err(e) => return Err(e.into()),
    };
    config.validate()?;
    Ok(config)
}
