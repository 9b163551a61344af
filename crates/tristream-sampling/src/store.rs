//! Sample storage
//!
//! The two disjoint zones holding sampled edges:
//! - [`Reservoir`]: dense slot array plus a key -> slot index, O(1) membership
//!   and O(1) removal by swapping with the last slot
//! - [`RingWaitingRoom`]: fixed ring buffer in arrival order (insertion-only streams)
//! - [`OrderedWaitingRoom`]: insertion-ordered set with arbitrary removal
//!   (fully dynamic streams)

use super::common::EdgeKey;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

/// Uniform reservoir of sampled edges
#[derive(Debug, Clone)]
pub struct Reservoir {
    capacity: usize,
    slots: Vec<EdgeKey>,
    index: FxHashMap<EdgeKey, usize>,
}

impl Reservoir {
    pub fn new(capacity: usize) -> Self {
        Reservoir {
            capacity,
            slots: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn has_room(&self) -> bool {
        self.slots.len() < self.capacity
    }

    pub fn contains(&self, key: EdgeKey) -> bool {
        self.index.contains_key(&key)
    }

    /// Edge stored at `slot`
    pub fn get(&self, slot: usize) -> Option<EdgeKey> {
        self.slots.get(slot).copied()
    }

    /// Append an edge to the next free slot. Returns false when full.
    pub fn push(&mut self, key: EdgeKey) -> bool {
        if !self.has_room() {
            return false;
        }
        self.index.insert(key, self.slots.len());
        self.slots.push(key);
        true
    }

    /// Overwrite `slot` with `key`, returning the edge it held
    pub fn replace(&mut self, slot: usize, key: EdgeKey) -> Option<EdgeKey> {
        let old = std::mem::replace(self.slots.get_mut(slot)?, key);
        self.index.remove(&old);
        self.index.insert(key, slot);
        Some(old)
    }

    /// Remove an edge, moving the last slot into the hole
    pub fn remove(&mut self, key: EdgeKey) -> bool {
        let Some(slot) = self.index.remove(&key) else {
            return false;
        };
        self.slots.swap_remove(slot);
        if let Some(&moved) = self.slots.get(slot) {
            self.index.insert(moved, slot);
        }
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.slots.iter().copied()
    }
}

/// Fixed-capacity ring of the most recent admissions
#[derive(Debug, Clone)]
pub struct RingWaitingRoom {
    capacity: usize,
    slots: Vec<EdgeKey>,
    /// Slot holding the oldest edge once the ring is full
    oldest: usize,
}

impl RingWaitingRoom {
    pub fn new(capacity: usize) -> Self {
        RingWaitingRoom {
            capacity,
            slots: Vec::with_capacity(capacity),
            oldest: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn has_room(&self) -> bool {
        self.slots.len() < self.capacity
    }

    /// Fill the next free slot. Returns false when full.
    pub fn push(&mut self, key: EdgeKey) -> bool {
        if !self.has_room() {
            return false;
        }
        self.slots.push(key);
        true
    }

    /// Replace the oldest edge with `key` and return the edge that left.
    ///
    /// Returns `None` (and stores nothing) while the ring is not full.
    pub fn rotate(&mut self, key: EdgeKey) -> Option<EdgeKey> {
        if self.capacity == 0 || self.has_room() {
            return None;
        }
        let popped = std::mem::replace(&mut self.slots[self.oldest], key);
        self.oldest = (self.oldest + 1) % self.capacity;
        Some(popped)
    }

    pub fn iter(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.slots.iter().copied()
    }
}

/// Insertion-ordered edge set for fully dynamic streams.
///
/// Removal marks the queued entry stale instead of searching for it; stale
/// entries are skipped when popping and compacted away once they outnumber
/// the live ones.
#[derive(Debug, Clone)]
pub struct OrderedWaitingRoom {
    capacity: usize,
    queue: VecDeque<(EdgeKey, u64)>,
    /// Live edge -> admission ticket of its queue entry
    live: FxHashMap<EdgeKey, u64>,
    next_ticket: u64,
}

impl OrderedWaitingRoom {
    pub fn new(capacity: usize) -> Self {
        OrderedWaitingRoom {
            capacity,
            queue: VecDeque::with_capacity(capacity),
            live: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            next_ticket: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.live.len() >= self.capacity
    }

    pub fn contains(&self, key: EdgeKey) -> bool {
        self.live.contains_key(&key)
    }

    /// Append as the newest member. Returns false if already present.
    pub fn insert(&mut self, key: EdgeKey) -> bool {
        if self.live.contains_key(&key) {
            return false;
        }
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.live.insert(key, ticket);
        self.queue.push_back((key, ticket));
        true
    }

    pub fn remove(&mut self, key: EdgeKey) -> bool {
        if self.live.remove(&key).is_none() {
            return false;
        }
        if self.queue.len() > 2 * self.live.len() + 16 {
            self.compact();
        }
        true
    }

    /// Remove and return the oldest live member
    pub fn pop_oldest(&mut self) -> Option<EdgeKey> {
        while let Some((key, ticket)) = self.queue.pop_front() {
            if self.live.get(&key) == Some(&ticket) {
                self.live.remove(&key);
                return Some(key);
            }
        }
        None
    }

    /// Live members, oldest first
    pub fn iter(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.queue
            .iter()
            .filter(|(key, ticket)| self.live.get(key) == Some(ticket))
            .map(|(key, _)| *key)
    }

    fn compact(&mut self) {
        let live = &self.live;
        self.queue.retain(|(key, ticket)| live.get(key) == Some(ticket));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(u: i32, v: i32) -> EdgeKey {
        EdgeKey::new(u, v)
    }

    #[test]
    fn test_reservoir_swap_remove_keeps_index() {
        let mut reservoir = Reservoir::new(3);
        assert!(reservoir.push(key(1, 2)));
        assert!(reservoir.push(key(2, 3)));
        assert!(reservoir.push(key(3, 4)));
        assert!(!reservoir.push(key(4, 5)));

        assert!(reservoir.remove(key(1, 2)));
        assert!(!reservoir.contains(key(1, 2)));
        assert_eq!(reservoir.get(0), Some(key(3, 4)));
        assert_eq!(reservoir.len(), 2);

        // moved entry must still be removable through the index
        assert!(reservoir.remove(key(3, 4)));
        assert_eq!(reservoir.iter().collect::<Vec<_>>(), vec![key(2, 3)]);
        assert!(!reservoir.remove(key(9, 10)));
    }

    #[test]
    fn test_reservoir_replace() {
        let mut reservoir = Reservoir::new(2);
        reservoir.push(key(1, 2));
        reservoir.push(key(2, 3));
        assert_eq!(reservoir.replace(1, key(5, 6)), Some(key(2, 3)));
        assert!(reservoir.contains(key(5, 6)));
        assert!(!reservoir.contains(key(2, 3)));
        assert_eq!(reservoir.replace(2, key(7, 8)), None);
    }

    #[test]
    fn test_ring_rotates_oldest_first() {
        let mut ring = RingWaitingRoom::new(2);
        assert_eq!(ring.rotate(key(0, 1)), None);
        ring.push(key(1, 2));
        ring.push(key(2, 3));
        assert_eq!(ring.rotate(key(3, 4)), Some(key(1, 2)));
        assert_eq!(ring.rotate(key(4, 5)), Some(key(2, 3)));
        assert_eq!(ring.rotate(key(5, 6)), Some(key(3, 4)));
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_ring_without_capacity() {
        let mut ring = RingWaitingRoom::new(0);
        assert!(!ring.push(key(1, 2)));
        assert_eq!(ring.rotate(key(1, 2)), None);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_ordered_waiting_room_pops_in_order_after_removal() {
        let mut room = OrderedWaitingRoom::new(3);
        room.insert(key(1, 2));
        room.insert(key(2, 3));
        room.insert(key(3, 4));
        assert!(room.is_full());

        assert!(room.remove(key(1, 2)));
        assert!(!room.is_full());
        assert_eq!(room.pop_oldest(), Some(key(2, 3)));

        // re-inserting a removed edge makes it the newest member
        room.insert(key(1, 2));
        assert_eq!(room.iter().collect::<Vec<_>>(), vec![key(3, 4), key(1, 2)]);
        assert_eq!(room.pop_oldest(), Some(key(3, 4)));
        assert_eq!(room.pop_oldest(), Some(key(1, 2)));
        assert_eq!(room.pop_oldest(), None);
    }

    #[test]
    fn test_ordered_waiting_room_compacts_stale_entries() {
        let mut room = OrderedWaitingRoom::new(4);
        for i in 0..1_000 {
            room.insert(key(i, i + 1));
            room.remove(key(i, i + 1));
        }
        assert!(room.is_empty());
        assert!(room.queue.len() <= 17);
        assert!(room.insert(key(5, 6)));
        assert_eq!(room.pop_oldest(), Some(key(5, 6)));
    }
}
