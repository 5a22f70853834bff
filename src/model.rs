// Core structs: PriceBar, PriceSeries, ReturnStats and error types
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One daily OHLC observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

impl PriceBar {
    /// Checks the OHLC invariants of a single bar.
    pub fn validate(&self) -> Result<(), SeriesError> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(SeriesError::InvalidBar {
                date: self.date,
                reason: "prices must be finite and non-negative".into(),
            });
        }
        if self.high < self.open.max(self.close).max(self.low) {
            return Err(SeriesError::InvalidBar {
                date: self.date,
                reason: format!("high {} below open/close/low", self.high),
            });
        }
        if self.low > self.open.min(self.close).min(self.high) {
            return Err(SeriesError::InvalidBar {
                date: self.date,
                reason: format!("low {} above open/close/high", self.low),
            });
        }
        Ok(())
    }
}

/// Date-ordered daily bars. Dates are strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Builds a series, rejecting out-of-order dates and bars that break OHLC invariants.
    /// An empty input is allowed here; the engines report it as `AnalysisError::EmptyInput`.
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        for (i, bar) in bars.iter().enumerate() {
            bar.validate()?;
            if i > 0 && bars[i - 1].date >= bar.date {
                return Err(SeriesError::OutOfOrder {
                    index: i,
                    previous: bars[i - 1].date,
                    current: bar.date,
                });
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}

/// A derived series aligned one-to-one with a `PriceSeries`; `None` marks undefined positions.
pub type DerivedSeries = Vec<Option<f64>>;

/// Mean and sample standard deviation of the trailing returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStats {
    pub window: usize,
    pub observations: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticker: String,
    pub start: NaiveDate,
    /// Exclusive.
    pub end: NaiveDate,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    HttpError(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected response status {0}")]
    InvalidResponse(u16),
    #[error("cannot build request URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::HttpError(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("malformed chart JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("data source error {code}: {description}")]
    Api { code: String, description: String },
    #[error("missing field: {0}")]
    MissingField(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("bar {index} dated {current} does not follow {previous}")]
    OutOfOrder {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },
    #[error("invalid bar on {date}: {reason}")]
    InvalidBar { date: NaiveDate, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("no price data")]
    EmptyInput,
    #[error("window length must be at least 1, got {0}")]
    InvalidWindow(usize),
}
