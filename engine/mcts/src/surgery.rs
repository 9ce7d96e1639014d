//! Graph surgery: pruning to a new root and merging two engines.

use std::collections::VecDeque;
use std::mem;

use engine_core::GameState;
use tracing::debug;

use crate::graph::{ArcId, NodeId};
use crate::node::{ArcData, NodeData};
use crate::search::{Mcts, SearchGraph};

impl<G: GameState> Mcts<G> {
    /// Replace the engine with one whose graph is exactly the subtree
    /// reachable from the position `state`, statistics intact.
    ///
    /// No-op when the engine is uninitialized or the position is not in the
    /// transposition table. Node and arc identifiers are reassigned; the new
    /// path is the bare new root.
    pub fn prune(slot: &mut Self, state: &G) {
        if !slot.initialized || slot.table.get(state.zobrist()).is_invalid() {
            return;
        }
        let fresh = Self::with_config(slot.config.clone());
        let old = mem::replace(slot, fresh);
        *slot = old.into_pruned(state);
    }

    fn into_pruned(mut self, state: &G) -> Self {
        let nodes_before = self.tree.node_count();
        let old_root = self.table.get(state.zobrist());

        // New graph seeded with the new root's payload, moved out of the old
        // graph. `remap` stores new ids indexed by old node slot; slots that
        // stay INVALID are unreachable and get dropped.
        let root_data = mem::replace(self.tree.get_mut(old_root), NodeData::placeholder());
        let mut tree: SearchGraph<G> = SearchGraph::new(root_data);
        let mut remap = vec![NodeId::INVALID; self.tree.node_slot_capacity()];
        remap[old_root.0 as usize] = tree.root();

        let mut stack = vec![old_root];
        while let Some(parent) = stack.pop() {
            let out: Vec<ArcId> = self.tree.out_arcs(parent).to_vec();
            for arc in out {
                let child = self.tree.arc_target(arc);
                if remap[child.0 as usize].is_invalid() {
                    let data =
                        mem::replace(self.tree.get_mut(child), NodeData::placeholder());
                    remap[child.0 as usize] = tree.add_node(data);
                    stack.push(child);
                }
                // A back-edge into an already-visited node re-forms a
                // transposition arc in the new graph.
                let mv = self.tree.arc(arc).mv;
                tree.add_arc(
                    remap[parent.0 as usize],
                    remap[child.0 as usize],
                    ArcData { mv },
                );
            }
        }

        // Purge the table of dropped nodes and rebase survivors onto the new
        // ids, then carry it over wholesale.
        let mut table = self.table;
        table.retain_remap(|old| remap[old.0 as usize]);

        let mut path = crate::path::Path::default();
        path.reset(ArcId::INVALID, tree.root());

        debug!(
            nodes_before,
            nodes_after = tree.node_count(),
            "pruned search graph"
        );

        Self {
            tree,
            table,
            path,
            initialized: true,
            config: self.config,
            rng: self.rng,
        }
    }

    /// Fuse `source` into `target`, additively combining statistics at shared
    /// positions and grafting unshared subtrees.
    ///
    /// Precondition: both engines are initialized on the same root position.
    /// The larger graph is kept as the base (the engines swap first when
    /// `source` is bigger), so the work done is proportional to the smaller
    /// graph. `source` is consumed; `target`'s path collapses to its root.
    pub fn merge(target: &mut Self, mut source: Self) {
        assert!(
            target.initialized && source.initialized,
            "merge requires two initialized engines"
        );
        if target.tree.node_count() < source.tree.node_count() {
            mem::swap(target, &mut source);
        }
        let nodes_before = target.tree.node_count();

        let source_hashes = source.table.invert(source.tree.node_slot_capacity());
        let source_root = source.tree.root();
        let target_root = target.table.get(source_hashes[source_root.0 as usize]);
        assert!(
            target_root.is_valid(),
            "merge requires a shared root position"
        );
        target
            .tree
            .get_mut(target_root)
            .absorb(source.tree.get(source_root));

        // Breadth-first over the source graph. A parent's counterpart always
        // exists by the time it is popped: it was either found in the table
        // or grafted when first discovered.
        let mut visited = vec![false; source.tree.node_slot_capacity()];
        visited[source_root.0 as usize] = true;
        let mut queue = VecDeque::from([source_root]);
        while let Some(s_parent) = queue.pop_front() {
            let t_parent = target.table.get(source_hashes[s_parent.0 as usize]);
            let out: Vec<ArcId> = source.tree.out_arcs(s_parent).to_vec();
            for s_arc in out {
                let s_child = source.tree.arc_target(s_arc);
                let first_visit = !visited[s_child.0 as usize];
                if first_visit {
                    visited[s_child.0 as usize] = true;
                    queue.push_back(s_child);
                }
                let key = source_hashes[s_child.0 as usize];
                let t_child = target.table.get(key);
                let mv = source.tree.arc(s_arc).mv;
                if t_child.is_valid() {
                    // Shared position: make sure the arc exists, fold the
                    // statistics in on first contact.
                    if target.tree.link(t_parent, t_child).arc.is_invalid() {
                        target.tree.add_arc(t_parent, t_child, ArcData { mv });
                    }
                    if first_visit {
                        target
                            .tree
                            .get_mut(t_child)
                            .absorb(source.tree.get(s_child));
                    }
                } else {
                    // Unknown position: graft node and arc, payload moved.
                    let data = mem::replace(
                        source.tree.get_mut(s_child),
                        NodeData::placeholder(),
                    );
                    let grafted = target.tree.add_node(data);
                    target.tree.add_arc(t_parent, grafted, ArcData { mv });
                    target.table.insert(key, grafted);
                }
            }
        }

        let root_entry = target.path.get(0);
        target.path.reset(root_entry.arc, root_entry.target);

        debug!(
            nodes_before,
            nodes_merged = source.tree.node_count(),
            nodes_after = target.tree.node_count(),
            "merged search graphs"
        );
    }
}
