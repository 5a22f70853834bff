use crate::model::{PriceBar, PriceSeries, SeriesError};
use tracing::warn;

/// Orders raw bars by date, keeps the last record per date and drops bars that
/// break OHLC invariants, then builds the series.
pub fn normalize_all(mut bars: Vec<PriceBar>) -> Result<PriceSeries, SeriesError> {
    // stable sort keeps the source order within a date, so the later record wins below
    bars.sort_by_key(|b| b.date);

    let mut cleaned: Vec<PriceBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        if let Err(e) = bar.validate() {
            warn!("Dropping bar: {}", e);
            continue;
        }
        match cleaned.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => cleaned.push(bar),
        }
    }

    PriceSeries::new(cleaned)
}
