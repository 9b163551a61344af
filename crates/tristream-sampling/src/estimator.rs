//! Weighted triangle estimation over the sampled graph
//!
//! Every edge event closes (or opens) one triangle per common sampled
//! neighbor of its endpoints. Each such triangle is scaled by the inverse
//! probability that its two sampled edges were kept together, which depends
//! on how many of them sit in the reservoir.

use super::adjacency::AdjacencyIndex;
use super::common::{EdgeOp, NodeId, Zone};
use rustc_hash::FxHashMap;

/// Inverse inclusion probabilities for one edge event.
///
/// `eligible` is the number of edges that have competed for the reservoir so
/// far and `reservoir` its capacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    /// One of the two sampled edges is in the reservoir
    pub one: f64,
    /// Both sampled edges are in the reservoir
    pub two: f64,
}

impl Weights {
    pub fn new(eligible: f64, reservoir: usize) -> Self {
        let r = reservoir as f64;
        let one = (eligible / r).max(1.0);
        // a single-slot reservoir can never hold both edges
        let two = if reservoir < 2 {
            1.0
        } else {
            (eligible / r * (eligible - 1.0) / (r - 1.0)).max(1.0)
        };
        Weights { one, two }
    }

    /// Weight of a triangle closed through edges tagged `a` and `b`
    pub fn for_zones(&self, a: Zone, b: Zone) -> f64 {
        match (a.is_reservoir(), b.is_reservoir()) {
            (true, true) => self.two,
            (true, false) | (false, true) => self.one,
            (false, false) => 1.0,
        }
    }
}

/// Running global and per-node triangle estimates
#[derive(Debug, Clone, Default)]
pub struct TriangleCounts {
    global: f64,
    local: FxHashMap<NodeId, f64>,
}

impl TriangleCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global(&self) -> f64 {
        self.global
    }

    pub fn local(&self) -> &FxHashMap<NodeId, f64> {
        &self.local
    }

    /// Count the triangles the edge `(src, dst)` forms with the current
    /// sample and apply them according to `op`.
    ///
    /// Must run before the sample is updated for the same event. Returns the
    /// summed weight of the triangles found.
    pub fn record(
        &mut self,
        adjacency: &AdjacencyIndex,
        src: NodeId,
        dst: NodeId,
        weights: &Weights,
        op: EdgeOp,
        lower_bound: bool,
    ) -> f64 {
        // an endpoint without sampled edges cannot close a triangle
        let (Some(src_map), Some(dst_map)) = (adjacency.neighbors(src), adjacency.neighbors(dst))
        else {
            return 0.0;
        };

        let (small, large) = if src_map.len() > dst_map.len() {
            (dst_map, src_map)
        } else {
            (src_map, dst_map)
        };

        let mut sum = 0.0;
        for (&neighbor, &zone) in small {
            let Some(&other) = large.get(&neighbor) else {
                continue;
            };
            let weight = weights.for_zones(zone, other);
            self.apply(neighbor, weight, op, lower_bound);
            sum += weight;
        }

        if sum > 0.0 {
            self.apply(src, sum, op, lower_bound);
            self.apply(dst, sum, op, lower_bound);
            match op {
                EdgeOp::Insert => self.global += sum,
                EdgeOp::Delete if lower_bound => self.global = (self.global - sum).max(0.0),
                EdgeOp::Delete => self.global -= sum,
            }
        }
        sum
    }

    fn apply(&mut self, node: NodeId, amount: f64, op: EdgeOp, lower_bound: bool) {
        let value = self.local.entry(node).or_insert(0.0);
        match op {
            EdgeOp::Insert => *value += amount,
            // a counter that cannot absorb the decrement drops to zero
            EdgeOp::Delete if lower_bound && *value < amount => *value = 0.0,
            EdgeOp::Delete => *value -= amount,
        }
    }
}
