use crate::analyzer::indicators::percent_returns;
use crate::model::{AnalysisError, PriceSeries, ReturnStats};

/// Mean and sample standard deviation of the returns in the last `window` rows of `series`.
///
/// The leading undefined return falls inside the slice when the series has no more than
/// `window` rows and is skipped, so such a slice holds `len - 1` observations.
pub fn trailing_return_stats(series: &PriceSeries, window: usize) -> Result<ReturnStats, AnalysisError> {
    if window == 0 {
        return Err(AnalysisError::InvalidWindow(window));
    }
    let returns = percent_returns(&series.closes())?;
    Ok(stats_over_tail(&returns, window))
}

/// Same as [`trailing_return_stats`] for an already computed return series.
pub fn stats_over_tail(returns: &[Option<f64>], window: usize) -> ReturnStats {
    let start = returns.len().saturating_sub(window);
    let tail = &returns[start..];
    let (mean, std_dev) = summarize(tail);
    ReturnStats {
        window,
        observations: tail.iter().flatten().count(),
        mean,
        std_dev,
    }
}

/// Mean and Bessel-corrected standard deviation of the defined values.
/// Mean needs one value, standard deviation needs two.
pub fn summarize(values: &[Option<f64>]) -> (Option<f64>, Option<f64>) {
    let defined: Vec<f64> = values.iter().flatten().copied().collect();
    let n = defined.len();
    if n == 0 {
        return (None, None);
    }
    let mean = defined.iter().sum::<f64>() / n as f64;
    if n < 2 {
        return (Some(mean), None);
    }
    let variance = defined.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    (Some(mean), Some(variance.sqrt()))
}
