// Analyzer module: indicator engine, return statistics and the pass that combines them.

pub mod indicators;
pub mod price_analysis;
pub mod statistics;

pub use price_analysis::{Analysis, AnalysisParams, Analyzer, AnalyzerImpl};
