use crate::fetcher::traits::PriceSource;
use crate::model::{FetchError, FetchRequest};
use crate::utils::to_unix_start;

use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::{Url, form_urlencoded};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Fetches daily bars from the Yahoo Finance chart endpoint.
pub struct YahooFetcher {
    client: Client,
    base_url: String,
}

impl YahooFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) PriceLens/0.1")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Chart URL for the request; the ticker is percent-encoded (`^NSEI` -> `%5ENSEI`).
    pub fn build_url(&self, req: &FetchRequest) -> Result<Url, FetchError> {
        let ticker: String = form_urlencoded::byte_serialize(req.ticker.as_bytes()).collect();
        let mut url = Url::parse(&format!("{}/{}", self.base_url, ticker))
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("period1", &to_unix_start(req.start).to_string())
            .append_pair("period2", &to_unix_start(req.end).to_string())
            .append_pair("interval", "1d")
            .append_pair("events", "history");
        Ok(url)
    }
}

/// Keeps successful bodies and 404s that carry the chart error JSON (unknown ticker),
/// which the parser turns into `ParserError::Api`. Anything else keeps its status.
pub fn check_response(status: u16, body: String) -> Result<String, FetchError> {
    if (200..300).contains(&status) || (status == 404 && is_chart_body(&body)) {
        Ok(body)
    } else {
        Err(FetchError::InvalidResponse(status))
    }
}

fn is_chart_body(body: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body)
        .map(|v| v.get("chart").is_some())
        .unwrap_or(false)
}

#[async_trait::async_trait]
impl PriceSource for YahooFetcher {
    async fn fetch(&self, req: &FetchRequest) -> Result<String, FetchError> {
        let url = self.build_url(req)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        check_response(status, body)
    }
}
