//! Waiting-room sampling for fully dynamic edge streams
//!
//! Edges enter an insertion-ordered waiting room. When it overflows, the
//! oldest edge either moves to the reservoir or leaves the sample. Deletions
//! are not compensated immediately: each one leaves a credit (`nb` when it
//! removed a reservoir edge, `ng` when it missed the sample) that later
//! promotion decisions consume, keeping the reservoir a uniform sample of the
//! live edges.

use super::adjacency::AdjacencyIndex;
use super::common::{EdgeEvent, EdgeKey, EdgeOp, NodeId, Zone};
use super::config::{SamplerConfig, SamplerResult};
use super::estimator::{TriangleCounts, Weights};
use super::sampler::{SampleStats, TriangleSampler};
use super::store::{OrderedWaitingRoom, Reservoir};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// Triangle estimator for streams with insertions and deletions
#[derive(Debug, Clone)]
pub struct FullyDynamicSampler {
    waiting_room: OrderedWaitingRoom,
    reservoir: Reservoir,
    adjacency: AdjacencyIndex,
    counts: TriangleCounts,
    /// Edges that left the waiting room, minus deletions outside it. May go
    /// negative.
    er: i64,
    /// Uncompensated deletions of reservoir edges
    nb: u64,
    /// Uncompensated deletions of unsampled edges
    ng: u64,
    lower_bound: bool,
    rng: StdRng,
}

impl FullyDynamicSampler {
    pub fn new(config: SamplerConfig) -> SamplerResult<Self> {
        config.validate()?;
        let waiting_room = config.waiting_room_capacity();
        let reservoir = config.reservoir_capacity();
        let seed = config.resolve_seed();
        debug!(
            "Fully dynamic sampler: k={}, waiting room={}, reservoir={}, seed={}, lower bound={}",
            config.max_samples, waiting_room, reservoir, seed, config.lower_bound
        );

        Ok(FullyDynamicSampler {
            waiting_room: OrderedWaitingRoom::new(waiting_room),
            reservoir: Reservoir::new(reservoir),
            adjacency: AdjacencyIndex::new(),
            counts: TriangleCounts::new(),
            er: 0,
            nb: 0,
            ng: 0,
            lower_bound: config.lower_bound,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Process the insertion (`is_insertion == true`) or deletion of `(src, dst)`
    pub fn process_edge(&mut self, src: NodeId, dst: NodeId, is_insertion: bool) {
        if src == dst {
            return;
        }

        let op = if is_insertion { EdgeOp::Insert } else { EdgeOp::Delete };
        let weights = Weights::new(self.eligible(), self.reservoir.capacity());
        self.counts
            .record(&self.adjacency, src, dst, &weights, op, self.lower_bound);

        let key = EdgeKey::new(src, dst);
        match op {
            EdgeOp::Insert => self.insert(key),
            EdgeOp::Delete => self.delete(key),
        }
    }

    /// `ER + nb + ng`
    fn eligible(&self) -> f64 {
        self.er as f64 + self.nb as f64 + self.ng as f64
    }

    fn insert(&mut self, key: EdgeKey) {
        if self.adjacency.contains(key) {
            trace!("Edge {} already sampled, not re-admitted", key);
            return;
        }

        if self.waiting_room.capacity() == 0 {
            // no waiting room: the arriving edge is decided on immediately
            self.settle(key);
            return;
        }

        if self.waiting_room.is_full() {
            if let Some(oldest) = self.waiting_room.pop_oldest() {
                self.settle(oldest);
            }
        }
        self.waiting_room.insert(key);
        self.adjacency.insert(key, Zone::WaitingRoom);
    }

    /// Decide whether an edge leaving the waiting room enters the reservoir
    fn settle(&mut self, candidate: EdgeKey) {
        let promote = if self.nb + self.ng == 0 {
            if self.reservoir.has_room() {
                true
            } else if self.rng.gen::<f64>() < self.reservoir.capacity() as f64 / (self.er as f64 + 1.0) {
                let slot = self.rng.gen_range(0..self.reservoir.len());
                if let Some(evicted) = self.reservoir.get(slot) {
                    self.reservoir.remove(evicted);
                    self.adjacency.remove(evicted);
                    trace!("Edge {} evicted from reservoir by {}", evicted, candidate);
                }
                true
            } else {
                false
            }
        } else if self.rng.gen::<f64>() < self.nb as f64 / (self.nb + self.ng) as f64 {
            // refill a slot vacated by a deletion
            self.nb -= 1;
            true
        } else {
            self.ng -= 1;
            false
        };

        if promote && self.reservoir.push(candidate) {
            self.adjacency.insert(candidate, Zone::Reservoir);
        } else {
            self.adjacency.remove(candidate);
        }
        self.er += 1;
    }

    fn delete(&mut self, key: EdgeKey) {
        match self.adjacency.remove(key) {
            Some(Zone::WaitingRoom) => {
                self.waiting_room.remove(key);
            }
            Some(Zone::Reservoir) => {
                self.reservoir.remove(key);
                self.nb += 1;
                self.er -= 1;
                trace!("Reservoir edge {} deleted, nb={}", key, self.nb);
            }
            None => {
                self.ng += 1;
                self.er -= 1;
            }
        }
    }

    pub fn global_triangle_estimate(&self) -> f64 {
        self.counts.global()
    }

    pub fn local_triangle_estimates(&self) -> &FxHashMap<NodeId, f64> {
        self.counts.local()
    }

    pub fn zone_of(&self, src: NodeId, dst: NodeId) -> Option<Zone> {
        self.adjacency.zone_of(EdgeKey::new(src, dst))
    }

    pub fn sample_stats(&self) -> SampleStats {
        SampleStats {
            waiting_room_len: self.waiting_room.len(),
            waiting_room_capacity: self.waiting_room.capacity(),
            reservoir_len: self.reservoir.len(),
            reservoir_capacity: self.reservoir.capacity(),
            eligible_edges: self.eligible(),
            pending_bad_deletions: self.nb,
            pending_good_deletions: self.ng,
        }
    }

    #[cfg(test)]
    fn check_invariants(&self) -> Result<(), String> {
        use std::collections::HashSet;

        if self.waiting_room.len() > self.waiting_room.capacity() {
            return Err("waiting room over capacity".into());
        }
        if self.reservoir.len() > self.reservoir.capacity() {
            return Err("reservoir over capacity".into());
        }
        if self.reservoir.len() as u64 + self.nb > self.reservoir.capacity() as u64 {
            return Err("bad-deletion credits exceed vacated slots".into());
        }
        let waiting: HashSet<_> = self.waiting_room.iter().collect();
        let reservoir: HashSet<_> = self.reservoir.iter().collect();
        if reservoir.len() != self.reservoir.len() {
            return Err("duplicate edge in reservoir".into());
        }
        if let Some(key) = waiting.intersection(&reservoir).next() {
            return Err(format!("edge {} in both zones", key));
        }
        if self.adjacency.edge_count() != waiting.len() + reservoir.len() {
            return Err("adjacency size differs from sample size".into());
        }
        for (key, zone) in self.adjacency.edges() {
            let expected = if reservoir.contains(&key) {
                Zone::Reservoir
            } else if waiting.contains(&key) {
                Zone::WaitingRoom
            } else {
                return Err(format!("edge {} indexed but not sampled", key));
            };
            if zone != expected {
                return Err(format!("edge {} tagged {:?}, stored in {:?}", key, zone, expected));
            }
        }
        Ok(())
    }
}

impl TriangleSampler for FullyDynamicSampler {
    fn name(&self) -> &'static str {
        "fully-dynamic"
    }

    fn process(&mut self, event: EdgeEvent) {
        self.process_edge(event.src, event.dst, event.op.is_insert());
    }

    fn global_triangle_estimate(&self) -> f64 {
        FullyDynamicSampler::global_triangle_estimate(self)
    }

    fn local_triangle_estimates(&self) -> &FxHashMap<NodeId, f64> {
        FullyDynamicSampler::local_triangle_estimates(self)
    }

    fn zone_of(&self, src: NodeId, dst: NodeId) -> Option<Zone> {
        FullyDynamicSampler::zone_of(self, src, dst)
    }

    fn sample_stats(&self) -> SampleStats {
        FullyDynamicSampler::sample_stats(self)
    }
}
