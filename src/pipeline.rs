use crate::analyzer::{Analysis, Analyzer};
use crate::model::{AnalysisError, FetchError, FetchRequest, ParserError, SeriesError};
use crate::normalizer::normalize_all;
use crate::fetcher::PriceSource;
use crate::parser::Parser;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParserError),
    #[error(transparent)]
    Series(#[from] SeriesError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl PipelineError {
    /// True when the request succeeded but the range held no bars.
    pub fn is_no_data(&self) -> bool {
        matches!(self, PipelineError::Analysis(AnalysisError::EmptyInput))
    }
}

/// Fetches, parses, normalizes and analyzes one date range.
pub async fn run_once(
    source: &dyn PriceSource,
    parser: &dyn Parser,
    analyzer: &dyn Analyzer,
    request: &FetchRequest,
) -> Result<Analysis, PipelineError> {
    info!(
        "Fetching {} from {} to {}...",
        request.ticker, request.start, request.end
    );
    let body = source.fetch(request).await?;

    let raw = parser.parse(&body)?;
    info!("Parsed {} bars", raw.len());

    let series = normalize_all(raw)?;
    let analysis = analyzer.analyze(&request.ticker, series)?;

    info!(
        "Analysis done: {} bars, latest RSI {:?}",
        analysis.series.len(),
        analysis.latest_rsi()
    );
    Ok(analysis)
}
