//! Component construction.
//!
//! [`ComponentBuilder`] accepts nodes and directed links in any order, then
//! `build()` lays out the dense edge matrix, computes all pairwise
//! distances, sums duplicate links, and threads each row's out-edge list in
//! link insertion order.
//!
//! [`build_component`] grows a component by breadth-first search over a
//! [`StationProvider`], starting from a seed station.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use lf_core::{CargoId, ComponentId, ComponentSettings, NodeId, StationId};
use lf_world::{MapPos, StationProvider};

use crate::component::{Component, Edge, Node};

// ── ComponentBuilder ──────────────────────────────────────────────────────────

struct RawNode {
    station: StationId,
    supply: u32,
    demand: u32,
    pos: MapPos,
}

struct RawLink {
    from: NodeId,
    to: NodeId,
    capacity: u32,
}

/// Construct a [`Component`] incrementally, then call [`build`](Self::build).
pub struct ComponentBuilder {
    cargo: CargoId,
    index: ComponentId,
    settings: ComponentSettings,
    nodes: Vec<RawNode>,
    links: Vec<RawLink>,
}

impl ComponentBuilder {
    pub fn new(cargo: CargoId, index: ComponentId, settings: ComponentSettings) -> Self {
        Self { cargo, index, settings, nodes: Vec::new(), links: Vec::new() }
    }

    /// Add a node and return its dense id (sequential from 0).
    pub fn add_node(&mut self, station: StationId, supply: u32, demand: u32, pos: MapPos) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(RawNode { station, supply, demand, pos });
        id
    }

    /// Add a directed link.  Self-loops are rejected; duplicate links
    /// between the same pair sum their capacities at build time.
    pub fn add_link(&mut self, from: NodeId, to: NodeId, capacity: u32) {
        if from == to {
            return;
        }
        self.links.push(RawLink { from, to, capacity });
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Consume the builder and produce a [`Component`].
    ///
    /// Distances are filled in for *every* pair — the demand calculator
    /// relies on their availability even between unlinked nodes.
    pub fn build(self) -> Component {
        let n = self.nodes.len();
        let mut edges = vec![Edge::default(); n * n];

        for from in 0..n {
            for to in 0..n {
                edges[from * n + to].distance =
                    self.nodes[from].pos.manhattan(self.nodes[to].pos);
            }
        }

        // Sum capacities and thread each row's out-edge list in insertion
        // order; the first occurrence of a pair fixes its list position.
        let mut threaded = vec![false; n * n];
        let mut tails: Vec<usize> = (0..n).map(|i| i * n + i).collect();
        for link in &self.links {
            let idx = link.from.index() * n + link.to.index();
            if !threaded[idx] {
                threaded[idx] = true;
                edges[tails[link.from.index()]].next_edge = link.to;
                tails[link.from.index()] = idx;
            }
            edges[idx].capacity = edges[idx].capacity.saturating_add(link.capacity);
        }

        let nodes = self
            .nodes
            .into_iter()
            .map(|raw| Node::new(raw.station, raw.supply, raw.demand))
            .collect();

        Component::new(self.cargo, self.index, self.settings, nodes, edges)
    }
}

// ── Breadth-first discovery ───────────────────────────────────────────────────

/// Grow a component from `seed` by breadth-first exploration of the
/// provider's link statistics.
///
/// Stations are assigned dense ids in discovery order.  Only links with
/// non-zero capacity discover new stations, but every observed link
/// between member stations becomes an edge — a fully decayed link still
/// belongs to the graph, it just carries no capacity.  Links to stations
/// that vanished between observation and inspection are skipped, and
/// self-loops are rejected.
pub fn build_component<P: StationProvider>(
    provider: &P,
    seed: StationId,
    cargo: CargoId,
    index: ComponentId,
    settings: ComponentSettings,
) -> Component {
    let mut builder = ComponentBuilder::new(cargo, index, settings);
    let mut node_of: FxHashMap<StationId, NodeId> = FxHashMap::default();
    let mut queue: VecDeque<StationId> = VecDeque::new();

    let seed_node = add_station(&mut builder, provider, seed, cargo);
    node_of.insert(seed, seed_node);
    queue.push_back(seed);

    while let Some(source) = queue.pop_front() {
        let source_node = node_of[&source];
        let links: Vec<(StationId, u32)> = provider.links(source, cargo).collect();
        for (target, capacity) in links {
            if target == source || !provider.is_valid(target) {
                continue;
            }
            let target_node = match node_of.get(&target) {
                Some(&node) => node,
                None if capacity > 0 => {
                    let node = add_station(&mut builder, provider, target, cargo);
                    node_of.insert(target, node);
                    queue.push_back(target);
                    node
                }
                None => continue,
            };
            builder.add_link(source_node, target_node, capacity);
        }
    }

    builder.build()
}

fn add_station<P: StationProvider>(
    builder: &mut ComponentBuilder,
    provider: &P,
    station: StationId,
    cargo: CargoId,
) -> NodeId {
    let demand = provider.accepts(station, cargo) as u32;
    builder.add_node(
        station,
        provider.supply(station, cargo),
        demand,
        provider.position(station),
    )
}
