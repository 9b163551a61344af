//! Tristream
//!
//! Bounded-memory estimation of global and per-node triangle counts over
//! graph edge streams, using waiting-room sampling.
//!
//! # Layout
//!
//! - `tristream-sampling`: the samplers themselves (no I/O)
//! - [`stream`]: edge list reader, stream driver with progress logging,
//!   output files and YAML run configuration
//!
//! # Stream models
//!
//! - Insertion-only: records are `src<TAB>dst`
//! - Fully dynamic: records are `src<TAB>dst<TAB>sign`, negative sign = deletion
//!
//! ## Example Usage
//!
//! ```rust
//! use tristream::{EdgeEvent, Mode, SamplerConfig, StreamDriver, StreamError};
//!
//! let config = SamplerConfig::new(1_000, 0.1).with_seed(42);
//! let mut driver = StreamDriver::with_sampler_config(Mode::Dynamic, &config, 10_000).unwrap();
//!
//! let events = vec![
//!     EdgeEvent::insert(1, 2),
//!     EdgeEvent::insert(2, 3),
//!     EdgeEvent::insert(1, 3),
//!     EdgeEvent::delete(1, 3),
//! ];
//! let summary = driver.run(events.into_iter().map(Ok::<_, StreamError>)).unwrap();
//! assert_eq!(summary.records, 4);
//! assert_eq!(summary.global_estimate, 0.0);
//! ```

#![warn(clippy::all)]

pub mod stream;

// Re-export main types for convenience
pub use stream::{
    parse_record, write_outputs, EdgeReader, Mode, OutputPaths, RunConfig, RunSummary,
    StreamDriver, StreamError, StreamResult,
};

pub use tristream_sampling::{
    EdgeEvent, EdgeKey, EdgeOp, FullyDynamicSampler, InsertionOnlySampler, NodeId, SampleStats,
    SamplerConfig, SamplerError, SamplerResult, TriangleSampler, Zone,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
