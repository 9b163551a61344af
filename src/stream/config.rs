//! Run configuration
//!
//! A run is described by the stream model, the sampler parameters and the
//! input/output locations. Configurations can be loaded from YAML; command
//! line flags override individual fields.

use super::{StreamError, StreamResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tristream_sampling::{
    FullyDynamicSampler, InsertionOnlySampler, SamplerConfig, SamplerResult, TriangleSampler,
};

/// Stream model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Edges are only inserted; records are `src<TAB>dst`
    #[default]
    Insertion,
    /// Edges are inserted and deleted; records are `src<TAB>dst<TAB>sign`
    Dynamic,
}

impl Mode {
    /// Suffix of the output files (`ins` / `del`)
    pub fn file_suffix(self) -> &'static str {
        match self {
            Mode::Insertion => "ins",
            Mode::Dynamic => "del",
        }
    }

    /// Build the sampler matching this stream model
    pub fn build_sampler(self, config: &SamplerConfig) -> SamplerResult<Box<dyn TriangleSampler>> {
        Ok(match self {
            Mode::Insertion => Box::new(InsertionOnlySampler::new(config.clone())?),
            Mode::Dynamic => Box::new(FullyDynamicSampler::new(config.clone())?),
        })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Insertion => write!(f, "Insertion-only"),
            Mode::Dynamic => write!(f, "Fully Dynamic"),
        }
    }
}

/// Full description of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Edge list to read
    pub input: Option<PathBuf>,
    /// Directory receiving the output files
    pub output_dir: Option<PathBuf>,
    pub mode: Mode,
    pub sampler: SamplerConfig,
    /// Field separator of the edge list
    pub delimiter: char,
    /// Log progress every this many records (0 disables)
    pub progress_interval: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: None,
            output_dir: None,
            mode: Mode::Insertion,
            sampler: SamplerConfig::default(),
            delimiter: '\t',
            progress_interval: 10_000,
        }
    }
}

impl RunConfig {
    /// Load a configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> StreamResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> StreamResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> StreamResult<()> {
        self.sampler.validate()?;
        if self.input.is_none() {
            return Err(StreamError::Config("No input path given".to_string()));
        }
        if self.output_dir.is_none() {
            return Err(StreamError::Config("No output directory given".to_string()));
        }
        if self.delimiter == '\n' || self.delimiter == '\r' {
            return Err(StreamError::Config(
                "Delimiter cannot be a line terminator".to_string(),
            ));
        }
        Ok(())
    }
}
