//! Zobrist-hash to node lookup.
//!
//! Every live node is reachable under exactly one key; the table is how two
//! move sequences converging on the same position end up sharing one node.
//! 64-bit key collisions between distinct positions are assumed negligible
//! and are not defended against.

use engine_core::ZobristHash;
use rustc_hash::FxHashMap;

use crate::graph::NodeId;

#[derive(Debug, Clone, Default)]
pub struct TranspositionTable {
    map: FxHashMap<ZobristHash, NodeId>,
}

impl TranspositionTable {
    /// `NodeId::INVALID` on a miss.
    #[inline]
    pub fn get(&self, key: ZobristHash) -> NodeId {
        self.map.get(&key).copied().unwrap_or(NodeId::INVALID)
    }

    /// Register `node` under `key`. Re-inserting an existing key keeps the
    /// first mapping: a key identifies one node for its whole lifetime.
    #[inline]
    pub fn insert(&mut self, key: ZobristHash, node: NodeId) {
        self.map.entry(key).or_insert(node);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ZobristHash, NodeId)> + '_ {
        self.map.iter().map(|(&k, &n)| (k, n))
    }

    /// Purge-and-remap for pruning: `remap` returns the node's id in the new
    /// graph, or `NodeId::INVALID` to drop the entry.
    pub fn retain_remap(&mut self, mut remap: impl FnMut(NodeId) -> NodeId) {
        self.map.retain(|_, node| {
            let new = remap(*node);
            if new.is_invalid() {
                false
            } else {
                *node = new;
                true
            }
        });
    }

    /// Inverse view: hash keyed by node slot, sized to `slot_capacity`.
    /// Slots without a table entry read as zero and must not be consulted.
    pub fn invert(&self, slot_capacity: usize) -> Vec<ZobristHash> {
        let mut inverse = vec![0; slot_capacity];
        for (&key, &node) in &self.map {
            inverse[node.0 as usize] = key;
        }
        inverse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_miss_is_invalid() {
        let table = TranspositionTable::default();
        assert!(table.get(0xfeed).is_invalid());
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut table = TranspositionTable::default();
        table.insert(0xfeed, NodeId(1));
        table.insert(0xfeed, NodeId(2));
        assert_eq!(table.get(0xfeed), NodeId(1));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_retain_remap() {
        let mut table = TranspositionTable::default();
        table.insert(1, NodeId(0));
        table.insert(2, NodeId(1));
        table.insert(3, NodeId(2));
        table.retain_remap(|node| {
            if node == NodeId(1) {
                NodeId::INVALID
            } else {
                NodeId(node.0 + 10)
            }
        });
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1), NodeId(10));
        assert!(table.get(2).is_invalid());
        assert_eq!(table.get(3), NodeId(12));
    }

    #[test]
    fn test_invert() {
        let mut table = TranspositionTable::default();
        table.insert(0xa, NodeId(0));
        table.insert(0xb, NodeId(2));
        let inverse = table.invert(3);
        assert_eq!(inverse[0], 0xa);
        assert_eq!(inverse[2], 0xb);
    }
}
