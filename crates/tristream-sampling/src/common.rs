//! Shared types for the streaming samplers
//!
//! Node identifiers, the edge key codec, zone tags and edge events.

use std::fmt;

/// Node Identifier type (signed 32-bit, as found in edge list files)
pub type NodeId = i32;

/// Canonical 64-bit key of an undirected edge.
///
/// The bits of the smaller endpoint occupy the high 32 bits, so `(u, v)` and
/// `(v, u)` encode to the same key and every pair of ids maps to a distinct key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(u64);

impl EdgeKey {
    /// Encode an edge between `u` and `v`
    pub fn new(u: NodeId, v: NodeId) -> Self {
        let (lo, hi) = if u <= v { (u, v) } else { (v, u) };
        EdgeKey(((lo as u32 as u64) << 32) | hi as u32 as u64)
    }

    /// Decode back to `(min, max)` endpoints
    pub fn endpoints(self) -> (NodeId, NodeId) {
        ((self.0 >> 32) as u32 as NodeId, self.0 as u32 as NodeId)
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (u, v) = self.endpoints();
        write!(f, "({}, {})", u, v)
    }
}

/// Which part of the sample an edge currently lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Zone {
    /// Recent admissions, never randomly evicted
    WaitingRoom,
    /// Uniform sample of edges that left the waiting room
    Reservoir,
}

impl Zone {
    pub fn is_reservoir(self) -> bool {
        matches!(self, Zone::Reservoir)
    }
}

/// Kind of stream event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeOp {
    Insert,
    Delete,
}

impl EdgeOp {
    /// Non-negative signs are insertions, negative signs deletions
    pub fn from_sign(sign: i64) -> Self {
        if sign >= 0 {
            EdgeOp::Insert
        } else {
            EdgeOp::Delete
        }
    }

    pub fn is_insert(self) -> bool {
        matches!(self, EdgeOp::Insert)
    }
}

/// A single edge event from the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeEvent {
    pub src: NodeId,
    pub dst: NodeId,
    pub op: EdgeOp,
}

impl EdgeEvent {
    pub fn insert(src: NodeId, dst: NodeId) -> Self {
        Self { src, dst, op: EdgeOp::Insert }
    }

    pub fn delete(src: NodeId, dst: NodeId) -> Self {
        Self { src, dst, op: EdgeOp::Delete }
    }
}
