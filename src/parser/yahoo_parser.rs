// Yahoo Finance chart (v8) response parsing
use crate::model::{ParserError, PriceBar};
use crate::utils::local_date;
use serde::Deserialize;
use tracing::debug;

pub trait Parser {
    fn parse(&self, body: &str) -> Result<Vec<PriceBar>, ParserError>;
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Quote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

pub struct YahooChartParser;

impl YahooChartParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for YahooChartParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for YahooChartParser {
    /// Rows missing any of open/high/low/close are skipped. A response without
    /// timestamps means the range held no trading days and yields no bars.
    fn parse(&self, body: &str) -> Result<Vec<PriceBar>, ParserError> {
        let response: ChartResponse = serde_json::from_str(body)?;

        if let Some(err) = response.chart.error {
            return Err(ParserError::Api {
                code: err.code,
                description: err.description,
            });
        }

        let data = response
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| ParserError::MissingField("chart.result".into()))?;

        if data.timestamp.is_empty() {
            return Ok(Vec::new());
        }

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| ParserError::MissingField("indicators.quote".into()))?;

        let offset = data.meta.gmtoffset;
        let mut bars = Vec::with_capacity(data.timestamp.len());
        let mut skipped = 0usize;

        for (i, &ts) in data.timestamp.iter().enumerate() {
            let fields = (
                quote.open.get(i).copied().flatten(),
                quote.high.get(i).copied().flatten(),
                quote.low.get(i).copied().flatten(),
                quote.close.get(i).copied().flatten(),
                local_date(ts, offset),
            );
            if let (Some(open), Some(high), Some(low), Some(close), Some(date)) = fields {
                bars.push(PriceBar {
                    date,
                    open,
                    high,
                    low,
                    close,
                    volume: quote.volume.get(i).copied().flatten(),
                });
            } else {
                skipped += 1;
            }
        }

        if skipped > 0 {
            debug!("Skipped {} incomplete rows", skipped);
        }
        Ok(bars)
    }
}
