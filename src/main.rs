use price_lens::analyzer::{AnalysisParams, AnalyzerImpl};
use price_lens::config::load_config;
use price_lens::fetcher::YahooFetcher;
use price_lens::model::FetchRequest;
use price_lens::parser::YahooChartParser;
use price_lens::shell::{Shell, spawn_line_reader};
use std::io::BufReader;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize logging; logs go to stderr, the report to stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    // Load configuration from file (first argument, default config.json)
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    // Create the fetcher, parser and analyzer
    let fetcher = match YahooFetcher::new(Duration::from_secs(config.request_timeout_seconds)) {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };
    let parser = YahooChartParser::new();
    let analyzer = AnalyzerImpl::new(AnalysisParams::from(&config));

    let request = FetchRequest {
        ticker: config.ticker.clone(),
        start: config.start_date,
        end: config.effective_end_date(),
    };

    // One Ctrl-C listener for the whole session, fetches included
    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    // Commands arrive from stdin through a reader thread
    let lines = spawn_line_reader(BufReader::new(std::io::stdin()));

    let mut shell = Shell::new(&fetcher, &parser, &analyzer, config.output, request);
    let exit = shell.run(lines, interrupted).await;

    // The reader thread may still sit in a blocking read; returning from main ends the process
    info!("Bye ({:?}).", exit);
}
