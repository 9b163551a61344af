//! Feeds edge records to a sampler

use super::config::{Mode, RunConfig};
use super::reader::EdgeReader;
use super::StreamResult;
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;
use tristream_sampling::{EdgeEvent, SampleStats, SamplerConfig, TriangleSampler};

/// Outcome of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Records fed to the sampler
    pub records: u64,
    pub global_estimate: f64,
    /// Nodes with a per-node estimate
    pub local_nodes: usize,
    pub sample: SampleStats,
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

/// Drives one sampler through one stream
pub struct StreamDriver {
    mode: Mode,
    sampler: Box<dyn TriangleSampler>,
    progress_interval: u64,
    processed: u64,
}

impl StreamDriver {
    pub fn new(mode: Mode, sampler: Box<dyn TriangleSampler>, progress_interval: u64) -> Self {
        StreamDriver {
            mode,
            sampler,
            progress_interval,
            processed: 0,
        }
    }

    /// Build the sampler matching `mode` and wrap it
    pub fn with_sampler_config(
        mode: Mode,
        config: &SamplerConfig,
        progress_interval: u64,
    ) -> StreamResult<Self> {
        let sampler = mode.build_sampler(config)?;
        Ok(Self::new(mode, sampler, progress_interval))
    }

    pub fn from_run_config(config: &RunConfig) -> StreamResult<Self> {
        Self::with_sampler_config(config.mode, &config.sampler, config.progress_interval)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn sampler(&self) -> &dyn TriangleSampler {
        self.sampler.as_ref()
    }

    /// Records processed so far
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Feed a single event
    pub fn feed(&mut self, event: EdgeEvent) {
        self.sampler.process(event);
        self.processed += 1;

        if self.progress_interval > 0 && self.processed % self.progress_interval == 0 {
            info!(
                "Number of edges processed: {}, estimated number of global triangles: {}",
                self.processed,
                self.sampler.global_triangle_estimate()
            );
        }
    }

    /// Feed every event, stopping at the first error
    pub fn run<I>(&mut self, events: I) -> StreamResult<RunSummary>
    where
        I: IntoIterator<Item = StreamResult<EdgeEvent>>,
    {
        let start = Instant::now();
        info!("Start running {} sampler...", self.sampler.name());

        for event in events {
            self.feed(event?);
        }

        let summary = self.summary(start.elapsed());
        info!("{} sampler terminated", self.sampler.name());
        info!("Estimated number of global triangles: {}", summary.global_estimate);
        Ok(summary)
    }

    /// Read and process an edge list file
    pub fn run_file(&mut self, path: impl AsRef<Path>, delimiter: char) -> StreamResult<RunSummary> {
        let path = path.as_ref();
        info!("Reading edges from {:?}", path);
        let reader = EdgeReader::open(path, delimiter, self.mode)?;
        self.run(reader)
    }

    pub fn summary(&self, elapsed: Duration) -> RunSummary {
        RunSummary {
            records: self.processed,
            global_estimate: self.sampler.global_triangle_estimate(),
            local_nodes: self.sampler.local_triangle_estimates().len(),
            sample: self.sampler.sample_stats(),
            elapsed,
        }
    }
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }
}
