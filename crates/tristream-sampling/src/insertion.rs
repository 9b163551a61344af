//! Waiting-room sampling for insertion-only edge streams
//!
//! The reservoir is filled first. Afterwards new edges enter a FIFO waiting
//! room, and every edge pushed out of it competes for the reservoir through
//! classic reservoir sampling over the delayed stream.

use super::adjacency::AdjacencyIndex;
use super::common::{EdgeEvent, EdgeKey, EdgeOp, NodeId, Zone};
use super::config::{SamplerConfig, SamplerResult};
use super::estimator::{TriangleCounts, Weights};
use super::sampler::{SampleStats, TriangleSampler};
use super::store::{Reservoir, RingWaitingRoom};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// Triangle estimator for streams without deletions
#[derive(Debug, Clone)]
pub struct InsertionOnlySampler {
    waiting_room: RingWaitingRoom,
    reservoir: Reservoir,
    adjacency: AdjacencyIndex,
    counts: TriangleCounts,
    /// Edges that have competed for the reservoir, including the ones that
    /// filled it directly
    eligible: u64,
    rng: StdRng,
}

impl InsertionOnlySampler {
    pub fn new(config: SamplerConfig) -> SamplerResult<Self> {
        config.validate()?;
        let waiting_room = config.waiting_room_capacity();
        let reservoir = config.reservoir_capacity();
        let seed = config.resolve_seed();
        debug!(
            "Insertion-only sampler: k={}, waiting room={}, reservoir={}, seed={}",
            config.max_samples, waiting_room, reservoir, seed
        );

        Ok(InsertionOnlySampler {
            waiting_room: RingWaitingRoom::new(waiting_room),
            reservoir: Reservoir::new(reservoir),
            adjacency: AdjacencyIndex::new(),
            counts: TriangleCounts::new(),
            eligible: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Process the insertion of edge `(src, dst)`
    pub fn process_edge(&mut self, src: NodeId, dst: NodeId) {
        if src == dst {
            return;
        }

        let weights = Weights::new(self.eligible as f64, self.reservoir.capacity());
        self.counts
            .record(&self.adjacency, src, dst, &weights, EdgeOp::Insert, false);

        let key = EdgeKey::new(src, dst);
        if self.adjacency.contains(key) {
            trace!("Edge {} already sampled, not re-admitted", key);
            return;
        }

        if self.reservoir.has_room() {
            self.eligible += 1;
            self.reservoir.push(key);
            self.adjacency.insert(key, Zone::Reservoir);
        } else if self.waiting_room.has_room() {
            self.waiting_room.push(key);
            self.adjacency.insert(key, Zone::WaitingRoom);
        } else if let Some(popped) = self.waiting_room.rotate(key) {
            self.adjacency.insert(key, Zone::WaitingRoom);
            if !self.offer_to_reservoir(popped) {
                self.adjacency.remove(popped);
            }
        } else {
            // no waiting room: the arriving edge competes directly
            self.offer_to_reservoir(key);
        }
    }

    /// Keep `candidate` with probability `R / eligible`, evicting a uniformly
    /// random reservoir member to make room
    fn offer_to_reservoir(&mut self, candidate: EdgeKey) -> bool {
        self.eligible += 1;
        let capacity = self.reservoir.capacity();
        if self.rng.gen::<f64>() >= capacity as f64 / self.eligible as f64 {
            return false;
        }

        let slot = self.rng.gen_range(0..capacity);
        if let Some(evicted) = self.reservoir.replace(slot, candidate) {
            self.adjacency.remove(evicted);
            trace!("Edge {} promoted, evicting {}", candidate, evicted);
        }
        self.adjacency.insert(candidate, Zone::Reservoir);
        true
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
            eligible_edges: self.eligible as f64,
            pending_bad_deletions: 0,
            pending_good_deletions: 0,
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
        let waiting: HashSet<_> = self.waiting_room.iter().collect();
        let reservoir: HashSet<_> = self.reservoir.iter().collect();
        if waiting.len() != self.waiting_room.len() || reservoir.len() != self.reservoir.len() {
            return Err("duplicate edge inside a zone".into());
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

impl TriangleSampler for InsertionOnlySampler {
    fn name(&self) -> &'static str {
        "insertion-only"
    }

    /// Every event is treated as an insertion
    fn process(&mut self, event: EdgeEvent) {
        self.process_edge(event.src, event.dst);
    }

    fn global_triangle_estimate(&self) -> f64 {
        InsertionOnlySampler::global_triangle_estimate(self)
    }

    fn local_triangle_estimates(&self) -> &FxHashMap<NodeId, f64> {
        InsertionOnlySampler::local_triangle_estimates(self)
    }

    fn zone_of(&self, src: NodeId, dst: NodeId) -> Option<Zone> {
        InsertionOnlySampler::zone_of(self, src, dst)
    }

    fn sample_stats(&self) -> SampleStats {
        InsertionOnlySampler::sample_stats(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sampler(k: usize, alpha: f64, seed: u64) -> InsertionOnlySampler {
        InsertionOnlySampler::new(SamplerConfig::new(k, alpha).with_seed(seed)).unwrap()
    }

    #[test]
    fn test_single_triangle_is_exact() {
        let mut s = sampler(3, 0.0, 7);
        s.process_edge(1, 2);
        s.process_edge(2, 3);
        s.process_edge(1, 3);

        assert_eq!(s.global_triangle_estimate(), 1.0);
        let local = s.local_triangle_estimates();
        assert_eq!(local.len(), 3);
        for node in [1, 2, 3] {
            assert_eq!(local[&node], 1.0);
        }
    }

    #[test]
    fn test_complete_graph_without_sampling_loss() {
        // K5 has 10 triangles, each node is in 6 of them
        let mut s = sampler(100, 0.1, 1);
        for u in 0..5 {
            for v in (u + 1)..5 {
                s.process_edge(u, v);
            }
        }
        assert_eq!(s.global_triangle_estimate(), 10.0);
        let local_sum: f64 = s.local_triangle_estimates().values().sum();
        assert_eq!(local_sum, 3.0 * s.global_triangle_estimate());
        assert!(s.local_triangle_estimates().values().all(|&v| v == 6.0));
    }

    #[test]
    fn test_fill_order_reservoir_then_waiting_room() {
        let mut s = sampler(4, 0.5, 3);
        s.process_edge(1, 2);
        s.process_edge(3, 4);
        assert_eq!(s.zone_of(1, 2), Some(Zone::Reservoir));
        assert_eq!(s.zone_of(4, 3), Some(Zone::Reservoir));

        s.process_edge(5, 6);
        s.process_edge(7, 8);
        assert_eq!(s.zone_of(5, 6), Some(Zone::WaitingRoom));
        assert_eq!(s.zone_of(7, 8), Some(Zone::WaitingRoom));

        // the oldest waiting-room edge is pushed out
        s.process_edge(9, 10);
        assert_eq!(s.zone_of(9, 10), Some(Zone::WaitingRoom));
        assert_ne!(s.zone_of(5, 6), Some(Zone::WaitingRoom));
        assert_eq!(s.sample_stats().eligible_edges, 3.0);
        s.check_invariants().unwrap();
    }

    #[test]
    fn test_self_loop_is_ignored() {
        let mut s = sampler(4, 0.5, 3);
        s.process_edge(1, 2);
        let before = s.sample_stats();
        s.process_edge(5, 5);
        assert_eq!(s.sample_stats(), before);
        assert_eq!(s.zone_of(5, 5), None);
        assert_eq!(s.global_triangle_estimate(), 0.0);
    }

    #[test]
    fn test_duplicate_edge_is_not_stored_twice() {
        let mut s = sampler(4, 0.5, 3);
        s.process_edge(1, 2);
        s.process_edge(2, 1);
        assert_eq!(s.sample_stats().sampled_edges(), 1);
        s.check_invariants().unwrap();
    }

    #[test]
    fn test_zero_waiting_room_is_plain_reservoir_sampling() {
        let mut s = sampler(5, 0.0, 11);
        for i in 0..200i32 {
            s.process_edge(i, i + 1000);
            s.check_invariants().unwrap();
        }
        let stats = s.sample_stats();
        assert_eq!(stats.waiting_room_len, 0);
        assert_eq!(stats.reservoir_len, 5);
        assert_eq!(stats.eligible_edges, 200.0);
    }

    #[test]
    fn test_same_seed_same_estimates() {
        let edges: Vec<(i32, i32)> = (0..400i32).map(|i| (i % 23, (i * 7 + 3) % 31)).collect();
        let run = |seed| {
            let mut s = sampler(40, 0.2, seed);
            for &(u, v) in &edges {
                s.process_edge(u, v);
            }
            let mut local: Vec<_> = s
                .local_triangle_estimates()
                .iter()
                .map(|(&n, &c)| (n, c.to_bits()))
                .collect();
            local.sort_unstable();
            (s.global_triangle_estimate().to_bits(), local)
        };
        assert_eq!(run(42), run(42));
    }

    proptest! {
        #[test]
        fn prop_sample_invariants_hold(
            edges in proptest::collection::vec((0i32..30, 0i32..30), 0..300),
            k in 2usize..40,
            alpha in 0.0f64..0.95,
            seed in any::<u64>(),
        ) {
            let mut s = sampler(k, alpha, seed);
            for (u, v) in edges {
                s.process_edge(u, v);
                prop_assert_eq!(s.check_invariants(), Ok(()));
            }
            let stats = s.sample_stats();
            prop_assert!(stats.waiting_room_len <= stats.waiting_room_capacity);
            prop_assert!(stats.reservoir_len <= stats.reservoir_capacity);
            prop_assert!(s.global_triangle_estimate() >= 0.0);
        }
    }
}
