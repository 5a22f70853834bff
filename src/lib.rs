pub mod analyzer;
pub mod command;
pub mod config;
pub mod fetcher;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod shell;
pub mod utils;
