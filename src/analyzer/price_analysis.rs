use crate::analyzer::indicators::{percent_returns, relative_strength_index, simple_moving_average};
use crate::analyzer::statistics::stats_over_tail;
use crate::config::AppConfig;
use crate::model::{AnalysisError, DerivedSeries, PriceBar, PriceSeries, ReturnStats};
use serde::Serialize;
use tracing::debug;

/// Window lengths used for one analysis pass.
/// Defaults are the reference dashboard values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisParams {
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub rsi: usize,
    pub stats: usize,
    pub chart_days: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            sma_fast: 50,
            sma_slow: 100,
            rsi: 14,
            stats: 90,
            chart_days: 30,
        }
    }
}

impl From<&AppConfig> for AnalysisParams {
    fn from(cfg: &AppConfig) -> Self {
        // config.json names them *_window
        Self {
            sma_fast: cfg.sma_fast_window,
            sma_slow: cfg.sma_slow_window,
            rsi: cfg.rsi_window,
            stats: cfg.stats_window,
            chart_days: cfg.chart_days,
        }
    }
}

/// Everything derived from one `PriceSeries`. Each derived series has one entry per bar.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub ticker: String,
    pub series: PriceSeries,
    pub sma_fast_window: usize,
    pub sma_fast: DerivedSeries,
    pub sma_slow_window: usize,
    pub sma_slow: DerivedSeries,
    pub rsi_window: usize,
    pub rsi: DerivedSeries,
    pub returns: DerivedSeries,
    pub stats: ReturnStats,
    pub chart_days: usize,
}

impl Analysis {
    // Chart window helpers

    /// Index of the first bar shown in the candlestick window.
    pub fn chart_start(&self) -> usize {
        self.series.len().saturating_sub(self.chart_days)
    }

    /// The last `chart_days` bars.
    pub fn chart_bars(&self) -> &[PriceBar] {
        &self.series.bars()[self.chart_start()..]
    }

    pub fn latest_rsi(&self) -> Option<f64> {
        self.rsi.last().copied().flatten()
    }
}

/// Trait defining the interface for a price series analyzer.
pub trait Analyzer {
    fn analyze(&self, ticker: &str, series: PriceSeries) -> Result<Analysis, AnalysisError>;
}

/// Computes both moving averages, the RSI and the trailing return statistics.
pub struct AnalyzerImpl {
    params: AnalysisParams,
}

impl AnalyzerImpl {
    pub fn new(params: AnalysisParams) -> Self {
        Self { params }
    }
}

impl Analyzer for AnalyzerImpl {
    fn analyze(&self, ticker: &str, series: PriceSeries) -> Result<Analysis, AnalysisError> {
        // Nothing to compute without at least one bar
        if series.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        let p = self.params;
        // Every indicator works on closes only
        let closes = series.closes();

        // Moving averages use the full history, not just the chart window.
        let sma_fast = simple_moving_average(&closes, p.sma_fast)?;
        let sma_slow = simple_moving_average(&closes, p.sma_slow)?;

        // Momentum oscillator, undefined during warm-up
        let rsi = relative_strength_index(&closes, p.rsi)?;

        // Day-over-day returns and their trailing summary
        let returns = percent_returns(&closes)?;
        if p.stats == 0 {
            return Err(AnalysisError::InvalidWindow(0));
        }
        let stats = stats_over_tail(&returns, p.stats);

        debug!(
            "Analyzed {} bars of {}: {} SMA{} points, {} RSI points",
            closes.len(),
            ticker,
            sma_fast.iter().flatten().count(),
            p.sma_fast,
            rsi.iter().flatten().count()
        );

        // Bundle everything for the report; series keeps ownership of the bars
        Ok(Analysis {
            ticker: ticker.to_string(),
            series,
            sma_fast_window: p.sma_fast,
            sma_fast,
            sma_slow_window: p.sma_slow,
            sma_slow,
            rsi_window: p.rsi,
            rsi,
            returns,
            stats,
            chart_days: p.chart_days,
        })
    }
}
