// Terminal rendering of an analysis pass
use crate::analyzer::Analysis;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Columns of the full-history RSI line.
pub const HISTORY_WIDTH: usize = 60;

pub const NO_DATA_MESSAGE: &str = "No data found. Please check the date range.";

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "n/a".to_string(),
    }
}

/// Maps RSI values onto block characters; undefined points become gaps.
pub fn rsi_sparkline(values: &[Option<f64>]) -> String {
    values
        .iter()
        .map(|v| match v {
            Some(v) => {
                let idx = ((v.clamp(0.0, 100.0) / 100.0) * (SPARK_LEVELS.len() - 1) as f64).round();
                SPARK_LEVELS[idx as usize]
            }
            None => ' ',
        })
        .collect()
}

/// Sparkline of at most `width` columns. Longer inputs are split into `width` consecutive
/// buckets, each drawn as the mean of its defined values (a gap if it has none).
pub fn rsi_sparkline_fit(values: &[Option<f64>], width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if values.len() <= width {
        return rsi_sparkline(values);
    }
    let buckets: Vec<Option<f64>> = (0..width)
        .map(|b| {
            let bucket = &values[b * values.len() / width..(b + 1) * values.len() / width];
            let defined: Vec<f64> = bucket.iter().flatten().copied().collect();
            if defined.is_empty() {
                None
            } else {
                Some(defined.iter().sum::<f64>() / defined.len() as f64)
            }
        })
        .collect();
    rsi_sparkline(&buckets)
}

/// Renders the candlestick window, the key statistics and the RSI section.
pub fn render_text(analysis: &Analysis) -> String {
    let ticker = analysis.ticker.to_uppercase();
    let series = &analysis.series;
    let start = analysis.chart_start();

    // Header
    let mut out = format!("Stock Price Analysis for {}\n", ticker);
    if let (Some(first), Some(last)) = (series.first_date(), series.last_date()) {
        out.push_str(&format!(
            "Daily prices from {} to {} ({} trading days)\n",
            first,
            last,
            series.len()
        ));
    }

    // Candles of the chart window with both moving averages
    out.push_str(&format!(
        "\nCandlestick Chart for {} (Last {} Days)\n",
        ticker, analysis.chart_days
    ));
    out.push_str(&format!(
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
        "Date",
        "Open",
        "High",
        "Low",
        "Close",
        format!("SMA {}", analysis.sma_fast_window),
        format!("SMA {}", analysis.sma_slow_window)
    ));
    for (i, bar) in analysis.chart_bars().iter().enumerate() {
        let idx = start + i;
        out.push_str(&format!(
            "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10} {:>10}\n",
            bar.date.format("%Y-%m-%d").to_string(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            fmt_opt(analysis.sma_fast[idx], 2),
            fmt_opt(analysis.sma_slow[idx], 2)
        ));
    }

    // Key statistics table
    let stats = &analysis.stats;
    out.push_str(&format!("\nKey Statistics (Last {} Days)\n", stats.window));
    out.push_str(&format!("{:<30} {:>10}\n", "Statistic", "Value"));
    out.push_str(&format!("{:<30} {:>10}\n", "Average Return", fmt_opt(stats.mean, 4)));
    out.push_str(&format!(
        "{:<30} {:>10}\n",
        "Standard Deviation of Return",
        fmt_opt(stats.std_dev, 4)
    ));

    // RSI: chart window and the full history
    out.push_str(&format!(
        "\nRelative Strength Index (RSI {})\n",
        analysis.rsi_window
    ));
    out.push_str(&format!("Latest: {}\n", fmt_opt(analysis.latest_rsi(), 2)));
    out.push_str(&format!(
        "Last {:<4} [{}]\n",
        analysis.chart_bars().len(),
        rsi_sparkline(&analysis.rsi[start..])
    ));
    out.push_str(&format!(
        "History  [{}]\n",
        rsi_sparkline_fit(&analysis.rsi, HISTORY_WIDTH)
    ));

    out
}

pub fn render_json(analysis: &Analysis) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{AnalysisParams, Analyzer, AnalyzerImpl};
    use crate::model::{PriceBar, PriceSeries};
    use chrono::{Days, NaiveDate};

    fn analysis(len: usize) -> Analysis {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..len)
            .map(|i| {
                let close = 100.0 + (i % 5) as f64;
                PriceBar {
                    date: start + Days::new(i as u64),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: None,
                }
            })
            .collect();
        let params = AnalysisParams {
            sma_fast: 3,
            sma_slow: 5,
            rsi: 4,
            stats: 10,
            chart_days: 6,
        };
        AnalyzerImpl::new(params)
            .analyze("reliance.ns", PriceSeries::new(bars).unwrap())
            .unwrap()
    }

    #[test]
    fn sparkline_maps_extremes_and_gaps() {
        assert_eq!(rsi_sparkline(&[Some(0.0), None, Some(100.0), Some(50.0)]), "▁ █▅");
    }

    #[test]
    fn fitted_sparkline_averages_buckets() {
        let mut values = vec![Some(0.0); 60];
        values.extend(vec![Some(100.0); 60]);
        let line = rsi_sparkline_fit(&values, 60);
        assert_eq!(line.chars().count(), 60);
        assert_eq!(line, format!("{}{}", "▁".repeat(30), "█".repeat(30)));
    }

    #[test]
    fn fitted_sparkline_keeps_gaps_and_short_input() {
        let mut values = vec![None; 10];
        values.extend(vec![Some(50.0); 10]);
        assert_eq!(rsi_sparkline_fit(&values, 4), "  ▅▅");
        assert_eq!(rsi_sparkline_fit(&[Some(100.0)], 60), "█");
    }

    #[test]
    fn history_line_covers_the_whole_series() {
        let text = render_text(&analysis(200));
        let history = text.lines().find(|l| l.starts_with("History")).unwrap();
        let inner = history
            .split_once('[')
            .and_then(|(_, rest)| rest.strip_suffix(']'))
            .unwrap();
        assert_eq!(inner.chars().count(), HISTORY_WIDTH);
        let window = text.lines().find(|l| l.starts_with("Last 6")).unwrap();
        assert_eq!(window.split_once('[').unwrap().1.chars().count(), 6 + 1);
    }

    #[test]
    fn text_report_has_all_sections() {
        let text = render_text(&analysis(20));
        assert!(text.contains("Stock Price Analysis for RELIANCE.NS"));
        assert!(text.contains("Candlestick Chart for RELIANCE.NS (Last 6 Days)"));
        assert!(text.contains("Key Statistics (Last 10 Days)"));
        assert!(text.contains("Standard Deviation of Return"));
        assert!(text.contains("RSI 4"));
        assert_eq!(text.lines().filter(|l| l.starts_with("2024-01-")).count(), 6);
    }

    #[test]
    fn undefined_values_show_as_na() {
        let text = render_text(&analysis(2));
        assert!(text.contains("n/a"));
        let std_line = text
            .lines()
            .find(|l| l.starts_with("Standard Deviation"))
            .unwrap();
        assert!(std_line.trim_end().ends_with("n/a"));
    }

    #[test]
    fn statistics_use_four_decimals() {
        let text = render_text(&analysis(20));
        let avg_line = text.lines().find(|l| l.starts_with("Average Return")).unwrap();
        let value = avg_line.split_whitespace().last().unwrap();
        assert_eq!(value.split('.').nth(1).map(str::len), Some(4));
    }

    #[test]
    fn json_report_carries_aligned_series() {
        let json = render_json(&analysis(20)).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["rsi"].as_array().unwrap().len(), 20);
        assert!(v["sma_fast"][0].is_null());
        assert_eq!(v["series"]["bars"].as_array().unwrap().len(), 20);
    }
}
