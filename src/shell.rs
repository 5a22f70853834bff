// Interactive shell: re-runs the pipeline for every command until quit, EOF or interrupt
use crate::analyzer::Analyzer;
use crate::command::{Command, HELP_TEXT, parse_command};
use crate::config::{OutputFormat, validate_range};
use crate::fetcher::PriceSource;
use crate::model::FetchRequest;
use crate::parser::Parser;
use crate::pipeline::run_once;
use crate::report::{NO_DATA_MESSAGE, render_json, render_text};
use std::future::Future;
use std::io::BufRead;
use std::pin::Pin;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellExit {
    Quit,
    InputClosed,
    Interrupted,
}

/// Reads lines on a plain thread so a pending read never blocks runtime shutdown.
pub fn spawn_line_reader<R: BufRead + Send + 'static>(reader: R) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    // receiver gone, the shell has exited
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

pub struct Shell<'a> {
    source: &'a dyn PriceSource,
    parser: &'a dyn Parser,
    analyzer: &'a dyn Analyzer,
    output: OutputFormat,
    request: FetchRequest,
}

impl<'a> Shell<'a> {
    pub fn new(
        source: &'a dyn PriceSource,
        parser: &'a dyn Parser,
        analyzer: &'a dyn Analyzer,
        output: OutputFormat,
        request: FetchRequest,
    ) -> Self {
        Self {
            source,
            parser,
            analyzer,
            output,
            request,
        }
    }

    pub fn request(&self) -> &FetchRequest {
        &self.request
    }

    /// Runs the configured range, then one pass per command.
    /// `shutdown` is polled for the whole session, including while a pass is in flight.
    pub async fn run<F>(&mut self, mut lines: mpsc::Receiver<String>, shutdown: F) -> ShellExit
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        // Initial pass over the configured range
        if !self.refresh(shutdown.as_mut()).await {
            info!("Interrupted.");
            return ShellExit::Interrupted;
        }
        eprintln!("{}", HELP_TEXT);

        loop {
            // Wait for the next command or Ctrl-C
            let line = tokio::select! {
                _ = shutdown.as_mut() => {
                    info!("Interrupted.");
                    return ShellExit::Interrupted;
                }
                line = lines.recv() => match line {
                    Some(line) => line,
                    None => return ShellExit::InputClosed,
                },
            };

            let (start, end) = match parse_command(&line) {
                Command::Range(start, end) => (start, end),
                Command::Start(start) => (start, self.request.end),
                Command::End(end) => (self.request.start, end),
                Command::Refresh => (self.request.start, self.request.end),
                Command::Help => {
                    eprintln!("{}", HELP_TEXT);
                    continue;
                }
                Command::Quit => return ShellExit::Quit,
                Command::Unknown(text) => {
                    warn!("Unknown command: {:?}", text);
                    eprintln!("{}", HELP_TEXT);
                    continue;
                }
            };
            if let Err(e) = validate_range(start, end) {
                warn!("{}", e);
                continue;
            }
            self.request.start = start;
            self.request.end = end;

            if !self.refresh(shutdown.as_mut()).await {
                info!("Interrupted.");
                return ShellExit::Interrupted;
            }
        }
    }

    /// One pass for the current range. Returns false if `shutdown` fired first.
    async fn refresh<F: Future<Output = ()>>(&self, shutdown: Pin<&mut F>) -> bool {
        tokio::select! {
            _ = shutdown => false,
            _ = self.run_and_print() => true,
        }
    }

    async fn run_and_print(&self) {
        match run_once(self.source, self.parser, self.analyzer, &self.request).await {
            Ok(analysis) => match self.output {
                OutputFormat::Text => println!("{}", render_text(&analysis)),
                OutputFormat::Json => match render_json(&analysis) {
                    Ok(json) => println!("{}", json),
                    Err(e) => error!("JSON rendering failed: {}", e),
                },
            },
            Err(e) if e.is_no_data() => {
                warn!("Empty price series for {}", self.request.ticker);
                println!("{}", NO_DATA_MESSAGE);
            }
            // Errors of one pass are reported; the session keeps going
            Err(e) => error!("Analysis run failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn line_reader_forwards_lines_then_closes() {
        let mut rx = spawn_line_reader(Cursor::new("refresh\nq\n"));
        assert_eq!(rx.recv().await.as_deref(), Some("refresh"));
        assert_eq!(rx.recv().await.as_deref(), Some("q"));
        assert_eq!(rx.recv().await, None);
    }
}
