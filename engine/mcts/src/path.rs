//! The root-to-position path and its per-playout scratch suffix.
//!
//! One buffer serves two roles. The prefix of length `persistent` runs from
//! the original root to the current game position and survives across
//! `compute` calls, so back-propagation reaches the statistics of the whole
//! game history. The suffix beyond the watermark is scratch written during a
//! single playout and truncated away after back-propagation, which keeps the
//! inner loop free of allocations once the buffer has grown.

use crate::graph::{ArcId, Link, NodeId};

#[derive(Debug, Clone, Default)]
pub struct Path {
    links: Vec<Link>,
    persistent: usize,
}

impl Path {
    /// Drop everything and restart from a single (arc, node) entry.
    pub fn reset(&mut self, arc: ArcId, node: NodeId) {
        self.links.clear();
        self.links.push(Link::new(arc, node));
        self.persistent = 1;
    }

    #[inline]
    pub fn push(&mut self, link: Link) {
        self.links.push(link);
    }

    /// Last entry. Panics on an empty path (the path is never empty once the
    /// engine is initialized).
    #[inline]
    pub fn back(&self) -> Link {
        *self.links.last().expect("empty search path")
    }

    #[inline]
    pub fn get(&self, i: usize) -> Link {
        self.links[i]
    }

    /// Physical length, scratch suffix included.
    #[inline]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Length of the persistent prefix.
    #[inline]
    pub fn persistent_len(&self) -> usize {
        self.persistent
    }

    /// Grow the persistent prefix by one, claiming the entry just pushed.
    #[inline]
    pub fn advance_persistent(&mut self) {
        self.persistent += 1;
        debug_assert!(self.persistent <= self.links.len());
    }

    /// Throw away the playout scratch suffix.
    #[inline]
    pub fn truncate_to_persistent(&mut self) {
        self.links.truncate(self.persistent);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset() {
        let mut path = Path::default();
        path.push(Link::new(ArcId(9), NodeId(9)));
        path.reset(ArcId::INVALID, NodeId(0));
        assert_eq!(path.len(), 1);
        assert_eq!(path.persistent_len(), 1);
        assert_eq!(path.back(), Link::new(ArcId::INVALID, NodeId(0)));
    }

    #[test]
    fn test_scratch_suffix_truncates() {
        let mut path = Path::default();
        path.reset(ArcId::INVALID, NodeId(0));
        path.push(Link::new(ArcId(0), NodeId(1)));
        path.push(Link::new(ArcId(1), NodeId(2)));
        assert_eq!(path.len(), 3);
        path.truncate_to_persistent();
        assert_eq!(path.len(), 1);
        assert_eq!(path.back().target, NodeId(0));
    }

    #[test]
    fn test_advance_persistent_keeps_entry() {
        let mut path = Path::default();
        path.reset(ArcId::INVALID, NodeId(0));
        path.push(Link::new(ArcId(0), NodeId(1)));
        path.advance_persistent();
        path.push(Link::new(ArcId(1), NodeId(2)));
        path.truncate_to_persistent();
        assert_eq!(path.len(), 2);
        assert_eq!(path.back().target, NodeId(1));
    }
}
