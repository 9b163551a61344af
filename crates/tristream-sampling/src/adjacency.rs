//! Adjacency index over the sampled edges
//!
//! Every sampled edge is stored twice, once under each endpoint, tagged with
//! the zone the edge occupies. Nodes are dropped as soon as their last
//! sampled edge leaves.

use super::common::{EdgeKey, NodeId, Zone};
use rustc_hash::FxHashMap;

/// Neighbor -> zone of the connecting edge
pub type Neighbors = FxHashMap<NodeId, Zone>;

#[derive(Debug, Clone, Default)]
pub struct AdjacencyIndex {
    nodes: FxHashMap<NodeId, Neighbors>,
}

impl AdjacencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge (or retag it if already present)
    pub fn insert(&mut self, key: EdgeKey, zone: Zone) {
        let (u, v) = key.endpoints();
        self.nodes.entry(u).or_default().insert(v, zone);
        self.nodes.entry(v).or_default().insert(u, zone);
    }

    /// Remove an edge, returning the zone it was tagged with
    pub fn remove(&mut self, key: EdgeKey) -> Option<Zone> {
        let (u, v) = key.endpoints();
        let zone = self.unlink(u, v);
        self.unlink(v, u);
        zone
    }

    pub fn zone_of(&self, key: EdgeKey) -> Option<Zone> {
        let (u, v) = key.endpoints();
        self.nodes.get(&u)?.get(&v).copied()
    }

    pub fn contains(&self, key: EdgeKey) -> bool {
        self.zone_of(key).is_some()
    }

    pub fn neighbors(&self, node: NodeId) -> Option<&Neighbors> {
        self.nodes.get(&node)
    }

    /// Number of sampled edges
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.len()).sum::<usize>() / 2
    }

    /// Each sampled edge once, with its zone
    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, Zone)> + '_ {
        self.nodes.iter().flat_map(|(&u, neighbors)| {
            neighbors
                .iter()
                .filter(move |(&v, _)| u < v)
                .map(move |(&v, &zone)| (EdgeKey::new(u, v), zone))
        })
    }

    fn unlink(&mut self, from: NodeId, to: NodeId) -> Option<Zone> {
        let neighbors = self.nodes.get_mut(&from)?;
        let zone = neighbors.remove(&to);
        if neighbors.is_empty() {
            self.nodes.remove(&from);
        }
        zone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_symmetric() {
        let mut index = AdjacencyIndex::new();
        index.insert(EdgeKey::new(2, 1), Zone::WaitingRoom);

        assert_eq!(index.neighbors(1).unwrap().get(&2), Some(&Zone::WaitingRoom));
        assert_eq!(index.neighbors(2).unwrap().get(&1), Some(&Zone::WaitingRoom));
        assert_eq!(index.edge_count(), 1);

        index.insert(EdgeKey::new(1, 2), Zone::Reservoir);
        assert_eq!(index.zone_of(EdgeKey::new(2, 1)), Some(Zone::Reservoir));
        assert_eq!(index.edge_count(), 1);
    }

    #[test]
    fn test_remove_drops_isolated_nodes() {
        let mut index = AdjacencyIndex::new();
        index.insert(EdgeKey::new(1, 2), Zone::Reservoir);
        index.insert(EdgeKey::new(2, 3), Zone::WaitingRoom);

        assert_eq!(index.remove(EdgeKey::new(1, 2)), Some(Zone::Reservoir));
        assert!(index.neighbors(1).is_none());
        assert!(index.neighbors(2).is_some());
        assert_eq!(index.remove(EdgeKey::new(1, 2)), None);

        let edges: Vec<_> = index.edges().collect();
        assert_eq!(edges, vec![(EdgeKey::new(2, 3), Zone::WaitingRoom)]);
    }
}
