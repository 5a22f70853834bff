use chrono::NaiveDate;
use price_lens::analyzer::{AnalysisParams, AnalyzerImpl};
use price_lens::fetcher::PriceSource;
use price_lens::model::{AnalysisError, FetchError, FetchRequest, ParserError};
use price_lens::parser::YahooChartParser;
use price_lens::pipeline::{PipelineError, run_once};
use price_lens::report::render_text;
use serde_json::json;

/// Serves a canned chart response.
struct StubSource {
    body: Result<String, u16>,
}

#[async_trait::async_trait]
impl PriceSource for StubSource {
    async fn fetch(&self, _req: &FetchRequest) -> Result<String, FetchError> {
        self.body.clone().map_err(FetchError::InvalidResponse)
    }
}

const DAY: i64 = 86_400;
// 2022-01-03 03:45 UTC, market open in Kolkata
const FIRST_TS: i64 = 1_641_181_500;

fn chart_body(closes: &[f64]) -> String {
    let timestamps: Vec<i64> = (0..closes.len() as i64).map(|i| FIRST_TS + i * DAY).collect();
    let highs: Vec<f64> = closes.iter().map(|c| c + 2.0).collect();
    let lows: Vec<f64> = closes.iter().map(|c| c - 2.0).collect();
    json!({
        "chart": {
            "result": [{
                "meta": { "symbol": "RELIANCE.NS", "gmtoffset": 19800 },
                "timestamp": timestamps,
                "indicators": { "quote": [{
                    "open": closes,
                    "high": highs,
                    "low": lows,
                    "close": closes,
                    "volume": vec![1_000u64; closes.len()]
                }]}
            }],
            "error": null
        }
    })
    .to_string()
}

fn request() -> FetchRequest {
    FetchRequest {
        ticker: "RELIANCE.NS".into(),
        start: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
    }
}

#[tokio::test]
async fn full_history_produces_aligned_outputs() {
    let closes: Vec<f64> = (0..150)
        .map(|i| 2400.0 + 30.0 * ((i as f64) * 0.3).sin() + i as f64)
        .collect();
    let source = StubSource { body: Ok(chart_body(&closes)) };
    let analyzer = AnalyzerImpl::new(AnalysisParams::default());

    let analysis = run_once(&source, &YahooChartParser::new(), &analyzer, &request())
        .await
        .unwrap();

    assert_eq!(analysis.series.len(), 150);
    assert_eq!(analysis.series.first_date(), NaiveDate::from_ymd_opt(2022, 1, 3));
    assert_eq!(analysis.sma_fast.iter().flatten().count(), 101);
    assert_eq!(analysis.sma_slow.iter().flatten().count(), 51);
    assert_eq!(analysis.rsi.iter().flatten().count(), 136);
    assert_eq!(analysis.stats.observations, 90);
    assert!(analysis.stats.std_dev.unwrap() > 0.0);

    let expected_last_sma = closes[100..].iter().sum::<f64>() / 50.0;
    let last_sma = analysis.sma_fast.last().copied().flatten().unwrap();
    assert!((last_sma - expected_last_sma).abs() < 1e-6);

    let text = render_text(&analysis);
    assert!(text.contains("Key Statistics (Last 90 Days)"));
}

#[tokio::test]
async fn short_history_is_not_an_error() {
    let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
    let source = StubSource { body: Ok(chart_body(&closes)) };
    let analyzer = AnalyzerImpl::new(AnalysisParams::default());

    let analysis = run_once(&source, &YahooChartParser::new(), &analyzer, &request())
        .await
        .unwrap();

    assert!(analysis.sma_fast.iter().all(Option::is_none));
    assert!(analysis.sma_slow.iter().all(Option::is_none));
    assert!(analysis.rsi[..14].iter().all(Option::is_none));
    assert!(analysis.rsi[14..].iter().all(|v| *v == Some(100.0)));
    assert_eq!(analysis.stats.observations, 19);
}

#[tokio::test]
async fn empty_range_signals_no_data() {
    let source = StubSource { body: Ok(chart_body(&[])) };
    let analyzer = AnalyzerImpl::new(AnalysisParams::default());

    let err = run_once(&source, &YahooChartParser::new(), &analyzer, &request())
        .await
        .unwrap_err();

    assert!(err.is_no_data());
    assert!(matches!(err, PipelineError::Analysis(AnalysisError::EmptyInput)));
}

#[tokio::test]
async fn api_error_is_not_mistaken_for_no_data() {
    let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
    let source = StubSource { body: Ok(body.to_string()) };
    let analyzer = AnalyzerImpl::new(AnalysisParams::default());

    let err = run_once(&source, &YahooChartParser::new(), &analyzer, &request())
        .await
        .unwrap_err();

    assert!(!err.is_no_data());
    assert!(matches!(err, PipelineError::Parse(ParserError::Api { .. })));
}

#[tokio::test]
async fn http_failure_propagates() {
    let source = StubSource { body: Err(503) };
    let analyzer = AnalyzerImpl::new(AnalysisParams::default());

    let err = run_once(&source, &YahooChartParser::new(), &analyzer, &request())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Fetch(FetchError::InvalidResponse(503))));
}
