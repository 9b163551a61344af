//! Common interface of the streaming triangle samplers

use super::common::{EdgeEvent, NodeId, Zone};
use rustc_hash::FxHashMap;

/// Occupancy and bookkeeping of a sampler at one point of the stream
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleStats {
    pub waiting_room_len: usize,
    pub waiting_room_capacity: usize,
    pub reservoir_len: usize,
    pub reservoir_capacity: usize,
    /// Edges that have competed for the reservoir (the `T` of the weights)
    pub eligible_edges: f64,
    /// Deletions that removed a reservoir edge and are not yet compensated
    pub pending_bad_deletions: u64,
    /// Deletions that missed the sample and are not yet compensated
    pub pending_good_deletions: u64,
}

impl SampleStats {
    pub fn sampled_edges(&self) -> usize {
        self.waiting_room_len + self.reservoir_len
    }
}

/// A bounded-memory triangle estimator fed one edge event at a time
pub trait TriangleSampler: Send {
    /// Short name used in logs and output file names
    fn name(&self) -> &'static str;

    /// Process one stream event. Self-loops are ignored.
    fn process(&mut self, event: EdgeEvent);

    /// Current estimate of the global triangle count
    fn global_triangle_estimate(&self) -> f64;

    /// Current per-node estimates, one entry per node ever touched by a triangle
    fn local_triangle_estimates(&self) -> &FxHashMap<NodeId, f64>;

    /// Zone of the edge `(src, dst)` if it is sampled
    fn zone_of(&self, src: NodeId, dst: NodeId) -> Option<Zone>;

    fn sample_stats(&self) -> SampleStats;
}
