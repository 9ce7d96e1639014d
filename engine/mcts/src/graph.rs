//! Rooted directed graph with adjacency lists.
//!
//! The search graph is rooted at the first position the engine saw and is
//! acyclic in practice because positions are monotone in ply count. Nodes and
//! arcs live in pools and are referenced by index; each node keeps ordered
//! in/out lists of arc ids, so a transposition (two parents reaching the same
//! position) is simply a node with in-degree above one.

use crate::pool::{Pool, PoolIndex};

/// Index into the node pool. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// Index into the arc pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArcId(pub u32);

impl NodeId {
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_invalid(self) -> bool {
        self == Self::INVALID
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        !self.is_invalid()
    }
}

impl ArcId {
    pub const INVALID: ArcId = ArcId(u32::MAX);

    #[inline]
    pub fn is_invalid(self) -> bool {
        self == Self::INVALID
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        !self.is_invalid()
    }
}

impl PoolIndex for NodeId {
    const INVALID: NodeId = NodeId::INVALID;

    fn from_usize(i: usize) -> NodeId {
        NodeId(i as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl PoolIndex for ArcId {
    const INVALID: ArcId = ArcId::INVALID;

    fn from_usize(i: usize) -> ArcId {
        ArcId(i as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// An (arc, target-node) pair, the unit the search path is made of.
///
/// `arc` is `ArcId::INVALID` for the root entry of a path and for lookups
/// that found the node but no connecting arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub arc: ArcId,
    pub target: NodeId,
}

impl Link {
    pub const INVALID: Link = Link {
        arc: ArcId::INVALID,
        target: NodeId::INVALID,
    };

    #[inline]
    pub fn new(arc: ArcId, target: NodeId) -> Link {
        Link { arc, target }
    }
}

#[derive(Debug, Clone)]
struct Vertex<N> {
    in_arcs: Vec<ArcId>,
    out_arcs: Vec<ArcId>,
    data: N,
}

#[derive(Debug, Clone)]
struct Edge<A> {
    source: NodeId,
    target: NodeId,
    data: A,
}

/// Rooted directed graph over pooled nodes and arcs.
#[derive(Debug, Clone)]
pub struct RootedDag<A, N> {
    nodes: Pool<Vertex<N>, NodeId>,
    arcs: Pool<Edge<A>, ArcId>,
    root: NodeId,
}

impl<A, N> RootedDag<A, N> {
    /// A one-node graph whose root carries `data`.
    pub fn new(data: N) -> Self {
        let mut nodes = Pool::default();
        let root = nodes.insert(Vertex {
            in_arcs: Vec::new(),
            out_arcs: Vec::new(),
            data,
        });
        Self {
            nodes,
            arcs: Pool::default(),
            root,
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Rehang the graph on an existing node. Nothing is erased; nodes no
    /// longer reachable from the new root simply stop being visited.
    #[inline]
    pub fn set_root(&mut self, node: NodeId) {
        self.root = node;
    }

    pub fn add_node(&mut self, data: N) -> NodeId {
        self.nodes.insert(Vertex {
            in_arcs: Vec::new(),
            out_arcs: Vec::new(),
            data,
        })
    }

    pub fn add_arc(&mut self, source: NodeId, target: NodeId, data: A) -> ArcId {
        let arc = self.arcs.insert(Edge {
            source,
            target,
            data,
        });
        self.nodes.get_mut(source).out_arcs.push(arc);
        self.nodes.get_mut(target).in_arcs.push(arc);
        arc
    }

    /// Remove an arc from both incidence lists and return its payload.
    pub fn erase_arc(&mut self, arc: ArcId) -> A {
        let edge = self.arcs.remove(arc);
        self.nodes
            .get_mut(edge.source)
            .out_arcs
            .retain(|&a| a != arc);
        self.nodes
            .get_mut(edge.target)
            .in_arcs
            .retain(|&a| a != arc);
        edge.data
    }

    /// Remove a node together with all incident arcs.
    pub fn erase_node(&mut self, node: NodeId) -> N {
        let incident: Vec<ArcId> = {
            let v = self.nodes.get(node);
            v.in_arcs.iter().chain(v.out_arcs.iter()).copied().collect()
        };
        for arc in incident {
            self.erase_arc(arc);
        }
        self.nodes.remove(node).data
    }

    /// Scan `target`'s in-list for an arc originating at `source`.
    /// O(indegree); the arc is `ArcId::INVALID` when no such arc exists.
    pub fn link(&self, source: NodeId, target: NodeId) -> Link {
        for &arc in &self.nodes.get(target).in_arcs {
            if self.arcs.get(arc).source == source {
                return Link::new(arc, target);
            }
        }
        Link::new(ArcId::INVALID, target)
    }

    #[inline]
    pub fn link_of(&self, arc: ArcId) -> Link {
        Link::new(arc, self.arcs.get(arc).target)
    }

    #[inline]
    pub fn in_arcs(&self, node: NodeId) -> &[ArcId] {
        &self.nodes.get(node).in_arcs
    }

    #[inline]
    pub fn out_arcs(&self, node: NodeId) -> &[ArcId] {
        &self.nodes.get(node).out_arcs
    }

    #[inline]
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.nodes.get(node).in_arcs.len()
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.nodes.get(node).out_arcs.len()
    }

    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.nodes.get(node).out_arcs.is_empty()
    }

    #[inline]
    pub fn has_children(&self, node: NodeId) -> bool {
        !self.is_leaf(node)
    }

    /// Node payload.
    #[inline]
    pub fn get(&self, node: NodeId) -> &N {
        &self.nodes.get(node).data
    }

    #[inline]
    pub fn get_mut(&mut self, node: NodeId) -> &mut N {
        &mut self.nodes.get_mut(node).data
    }

    /// Arc payload.
    #[inline]
    pub fn arc(&self, arc: ArcId) -> &A {
        &self.arcs.get(arc).data
    }

    #[inline]
    pub fn arc_mut(&mut self, arc: ArcId) -> &mut A {
        &mut self.arcs.get_mut(arc).data
    }

    #[inline]
    pub fn arc_source(&self, arc: ArcId) -> NodeId {
        self.arcs.get(arc).source
    }

    #[inline]
    pub fn arc_target(&self, arc: ArcId) -> NodeId {
        self.arcs.get(arc).target
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Exclusive upper bound on node ids ever handed out; sizing for
    /// old-id-indexed scratch tables.
    #[inline]
    pub fn node_slot_capacity(&self) -> usize {
        self.nodes.slot_capacity()
    }

    /// All live nodes in slot order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> {
        self.nodes.iter().map(|(id, v)| (id, &v.data))
    }

    /// All live arcs in slot order, as (id, source, target, payload).
    pub fn arcs(&self) -> impl Iterator<Item = (ArcId, NodeId, NodeId, &A)> {
        self.arcs
            .iter()
            .map(|(id, e)| (id, e.source, e.target, &e.data))
    }
}
