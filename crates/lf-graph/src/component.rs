//! Component data model.
//!
//! # Data layout
//!
//! Nodes live in a dense `Vec<Node>`; edges in a flat row-major n×n
//! `Vec<Edge>`, so `edge(from, to)` is a single index computation.  Every
//! slot carries a distance (the demand calculator needs distances between
//! *all* pairs), but only slots with capacity belong to the link graph
//! proper.
//!
//! The non-empty outgoing edges of each node are threaded into a singly
//! linked list through the `next_edge` field, with the list head stored in
//! the node's diagonal self-edge slot.  The list preserves the order in
//! which edges were added, which pins down the relaxation order of the flow
//! solver's Dijkstra and with it every tie-break downstream.

use std::collections::BTreeMap;

use lf_core::{CargoId, ComponentId, ComponentSettings, NodeId, StationId};

// ── Node ─────────────────────────────────────────────────────────────────────

/// Per-node flow table: source station → via station → planned units.
///
/// Signed values: the flow mapper transiently subtracts over-counted local
/// consumption while folding multi-hop paths; final values are never
/// negative.
pub type FlowMap = BTreeMap<StationId, BTreeMap<StationId, i64>>;

/// A routing hypothesis left behind by the flow solver: `flow` units for
/// `origin` leave the owning node toward `next`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PathRecord {
    pub origin: NodeId,
    pub next: NodeId,
    pub flow: u32,
}

/// A station materialised as a component-local vertex.
#[derive(Clone, Debug, Default)]
pub struct Node {
    /// Back-reference to the station; may go stale while a job runs.
    pub station: StationId,
    /// Cargo units produced here in the last period.
    pub supply: u32,
    /// Supply not yet assigned to any destination by the demand calculator.
    pub undelivered_supply: u32,
    /// Sink weight of this node; positive iff the station accepts the cargo.
    pub demand: u32,
    /// Outstanding routing hypotheses, owned by the flow solver.
    pub paths: Vec<PathRecord>,
    /// Per-(source, via) flow table built by the flow mapper.
    pub flows: FlowMap,
}

impl Node {
    pub fn new(station: StationId, supply: u32, demand: u32) -> Self {
        Self {
            station,
            supply,
            undelivered_supply: supply,
            demand,
            paths: Vec::new(),
            flows: BTreeMap::new(),
        }
    }
}

// ── Edge ─────────────────────────────────────────────────────────────────────

/// A directed pair of nodes inside one component.
#[derive(Copy, Clone, Debug)]
pub struct Edge {
    /// Manhattan distance between the two stations; constant for the
    /// component's life.
    pub distance: u32,
    /// Capacity derived from the link statistics observed on this link.
    pub capacity: u32,
    /// Demand assigned by the demand calculator.
    pub demand: u32,
    /// Demand not yet covered by flow; starts equal to `demand`.
    pub unsatisfied_demand: u32,
    /// Units pushed through this edge in the current job.
    pub flow: u32,
    /// Next node in the owning row's out-edge list; the diagonal slot holds
    /// the list head.
    pub next_edge: NodeId,
}

impl Default for Edge {
    fn default() -> Self {
        Self {
            distance: 0,
            capacity: 0,
            demand: 0,
            unsatisfied_demand: 0,
            flow: 0,
            next_edge: NodeId::INVALID,
        }
    }
}

// ── Component ────────────────────────────────────────────────────────────────

/// One connected link graph for one cargo.
pub struct Component {
    cargo: CargoId,
    index: ComponentId,
    settings: ComponentSettings,
    n: usize,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    max_distance: u32,
}

impl Component {
    /// Assemble a component from parts.  `edges` must be a row-major n×n
    /// matrix matching `nodes`; `next_edge` threading is taken as given.
    pub fn new(
        cargo: CargoId,
        index: ComponentId,
        settings: ComponentSettings,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    ) -> Self {
        let n = nodes.len();
        debug_assert!(n >= 1);
        debug_assert_eq!(edges.len(), n * n);
        let max_distance = edges.iter().map(|e| e.distance).max().unwrap_or(0);
        Self { cargo, index, settings, n, nodes, edges, max_distance }
    }

    pub fn cargo(&self) -> CargoId {
        self.cargo
    }

    pub fn index(&self) -> ComponentId {
        self.index
    }

    pub fn settings(&self) -> &ComponentSettings {
        &self.settings
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Largest pairwise node distance; the demand calculator's
    /// normalization pivot.
    pub fn max_distance(&self) -> u32 {
        self.max_distance
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.n as u32).map(NodeId)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    fn edge_index(&self, from: NodeId, to: NodeId) -> usize {
        from.index() * self.n + to.index()
    }

    pub fn edge(&self, from: NodeId, to: NodeId) -> &Edge {
        &self.edges[self.edge_index(from, to)]
    }

    pub fn edge_mut(&mut self, from: NodeId, to: NodeId) -> &mut Edge {
        let idx = self.edge_index(from, to);
        &mut self.edges[idx]
    }

    /// Head of `from`'s out-edge list, or `NodeId::INVALID` if it has none.
    pub fn first_edge(&self, from: NodeId) -> NodeId {
        self.edge(from, from).next_edge
    }

    /// Iterate the targets of `from`'s non-empty out-edges in threading
    /// order.
    pub fn out_edges<'a>(&'a self, from: NodeId) -> impl Iterator<Item = NodeId> + 'a {
        let mut to = self.first_edge(from);
        std::iter::from_fn(move || {
            if to == NodeId::INVALID {
                return None;
            }
            let current = to;
            to = self.edge(from, current).next_edge;
            Some(current)
        })
    }

    /// The planned flow at `from` for `(source, via)` station pair, 0 if
    /// absent.
    pub fn node_flow(&self, from: NodeId, source: StationId, via: StationId) -> i64 {
        self.node(from)
            .flows
            .get(&source)
            .and_then(|m| m.get(&via))
            .copied()
            .unwrap_or(0)
    }

    /// Rebuild the `next_edge` threading from edge capacities, linking each
    /// row's non-empty out-edges in ascending target order.  Used when a
    /// component is reconstructed from persisted state, where the original
    /// discovery order is gone.
    pub fn thread_edges(&mut self) {
        let n = self.n;
        for from in 0..n {
            let mut head = NodeId::INVALID;
            let mut tail: Option<usize> = None;
            for to in 0..n {
                if to == from {
                    continue;
                }
                let idx = from * n + to;
                self.edges[idx].next_edge = NodeId::INVALID;
                if self.edges[idx].capacity == 0 {
                    continue;
                }
                match tail {
                    None => head = NodeId(to as u32),
                    Some(prev) => self.edges[prev].next_edge = NodeId(to as u32),
                }
                tail = Some(idx);
            }
            self.edges[from * n + from].next_edge = head;
        }
    }
}
