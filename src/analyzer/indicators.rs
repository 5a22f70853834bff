use crate::model::{AnalysisError, DerivedSeries};

fn check_input(values: &[f64], window: usize) -> Result<(), AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    if window == 0 {
        return Err(AnalysisError::InvalidWindow(window));
    }
    Ok(())
}

/// Simple moving average aligned with `values`.
/// Position `i` is the mean of `values[i + 1 - window..=i]`; the first `window - 1`
/// positions are undefined. A window longer than the input leaves everything undefined.
pub fn simple_moving_average(values: &[f64], window: usize) -> Result<DerivedSeries, AnalysisError> {
    check_input(values, window)?;

    let mut out = vec![None; values.len()];
    if values.len() < window {
        return Ok(out);
    }
    for (offset, chunk) in values.windows(window).enumerate() {
        out[offset + window - 1] = Some(chunk.iter().sum::<f64>() / window as f64);
    }
    Ok(out)
}

/// Relative Strength Index over simple rolling means of gains and losses.
///
/// The first `window` positions are undefined since the differenced series starts
/// one step late. A window with no losses but some gains saturates at 100; a flat
/// window (no gains, no losses) carries no signal and stays undefined.
pub fn relative_strength_index(values: &[f64], window: usize) -> Result<DerivedSeries, AnalysisError> {
    check_input(values, window)?;

    let mut out = vec![None; values.len()];
    if values.len() <= window {
        return Ok(out);
    }

    // gains[k] / losses[k] belong to position k + 1 of `values`
    let (gains, losses): (Vec<f64>, Vec<f64>) = values
        .windows(2)
        .map(|w| {
            let delta = w[1] - w[0];
            (delta.max(0.0), (-delta).max(0.0))
        })
        .unzip();

    for i in window..values.len() {
        let range = i - window..i;
        let avg_gain = gains[range.clone()].iter().sum::<f64>() / window as f64;
        let avg_loss = losses[range].iter().sum::<f64>() / window as f64;
        out[i] = rsi_from_averages(avg_gain, avg_loss);
    }
    Ok(out)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { None } else { Some(100.0) };
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// Day-over-day percentage change: `close[i] / close[i - 1] - 1`.
/// Undefined at position 0 and wherever the previous close is zero.
pub fn percent_returns(values: &[f64]) -> Result<DerivedSeries, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    let mut out = Vec::with_capacity(values.len());
    out.push(None);
    out.extend(values.windows(2).map(|w| {
        if w[0] == 0.0 {
            None
        } else {
            Some(w[1] / w[0] - 1.0)
        }
    }));
    Ok(out)
}
