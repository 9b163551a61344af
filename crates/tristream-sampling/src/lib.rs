//! Bounded-memory triangle estimation over edge streams
//!
//! Implements waiting-room sampling: a budget of `k` sampled edges split into
//! a FIFO waiting room of the most recent edges and a uniform reservoir of
//! older ones. Triangles closed by each new edge are counted against the
//! sample and scaled by inverse inclusion probabilities.
//!
//! Two samplers share the [`TriangleSampler`] interface:
//! - [`InsertionOnlySampler`] for streams that only add edges
//! - [`FullyDynamicSampler`] for streams that also delete edges
//!
//! ```
//! use tristream_sampling::{InsertionOnlySampler, SamplerConfig};
//!
//! let mut sampler = InsertionOnlySampler::new(SamplerConfig::new(100, 0.1).with_seed(7)).unwrap();
//! sampler.process_edge(1, 2);
//! sampler.process_edge(2, 3);
//! sampler.process_edge(1, 3);
//! assert_eq!(sampler.global_triangle_estimate(), 1.0);
//! ```

pub mod adjacency;
pub mod common;
pub mod config;
pub mod dynamic;
pub mod estimator;
pub mod insertion;
pub mod sampler;
pub mod store;

pub use adjacency::AdjacencyIndex;
pub use common::{EdgeEvent, EdgeKey, EdgeOp, NodeId, Zone};
pub use config::{SamplerConfig, SamplerError, SamplerResult};
pub use dynamic::FullyDynamicSampler;
pub use estimator::{TriangleCounts, Weights};
pub use insertion::InsertionOnlySampler;
pub use sampler::{SampleStats, TriangleSampler};
pub use store::{OrderedWaitingRoom, Reservoir, RingWaitingRoom};

pub use rustc_hash::FxHashMap;
