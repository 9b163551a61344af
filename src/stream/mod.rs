//! Stream driver around the samplers
//!
//! Reads tab-separated edge records, feeds them to a sampler in file order,
//! reports progress through `tracing`, and writes the final estimates.

pub mod config;
pub mod driver;
pub mod output;
pub mod reader;

pub use config::{Mode, RunConfig};
pub use driver::{RunSummary, StreamDriver};
pub use output::{write_outputs, OutputPaths};
pub use reader::{parse_record, EdgeReader};

use tristream_sampling::SamplerError;

/// Errors raised while driving a stream
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record on line {line}: {reason}")]
    Parse { line: u64, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sampler error: {0}")]
    Sampler(#[from] SamplerError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type StreamResult<T> = Result<T, StreamError>;
