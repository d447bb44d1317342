//! Multi-commodity-flow solver.
//!
//! The solver runs a modified Dijkstra from every source node.  Pass 1
//! scores paths by distance, artificially attenuates capacities by the
//! `short_path_saturation` setting, and alternates push rounds with cycle
//! elimination until nothing changes.  Pass 2 scores paths by free-capacity
//! ratio, only follows `(source, via)` pairs the first pass (via the flow
//! mapper) already established, and overloads those channels until all
//! remaining demand is absorbed.
//!
//! Flow accepted by a push is recorded three ways: on every traversed
//! edge's `flow`, on the origin edge's `unsatisfied_demand`, and — at
//! cleanup — as [`PathRecord`]s on the nodes a path passes through, which
//! is what cycle elimination and the flow mapper consume.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use lf_core::NodeId;
use lf_graph::{Component, PathRecord};

use crate::path::{AnnotationPolicy, CapacityPolicy, DistancePolicy, PathAnno, fork};

// ── Dijkstra ─────────────────────────────────────────────────────────────────

/// Run one Dijkstra from `source`, returning the annotation arena.
///
/// With `create_new_paths` the capacity of every edge is attenuated by the
/// saturation setting (to at least 1) and any edge may be used.  Without
/// it, only edges whose `(source, via)` station pair already carries
/// planned flow are considered, at their raw capacity.
fn dijkstra<A: AnnotationPolicy>(
    component: &Component,
    source: NodeId,
    create_new_paths: bool,
) -> Vec<PathAnno> {
    let n = component.len();
    let source_station = component.node(source).station;
    let saturation = component.settings().short_path_saturation as i64;

    let mut arena: Vec<PathAnno> = (0..n)
        .map(|i| PathAnno::new(NodeId(i as u32), NodeId(i as u32) == source))
        .collect();
    let mut frontier: std::collections::BTreeSet<(A::Rank, u32)> = arena
        .iter()
        .enumerate()
        .map(|(i, anno)| (A::rank(anno), i as u32))
        .collect();

    while let Some((_, from_raw)) = frontier.pop_first() {
        let from = NodeId(from_raw);
        let mut to = component.first_edge(from);
        while to != NodeId::INVALID {
            let edge = component.edge(from, to);
            let next = edge.next_edge;
            let allowed = create_new_paths
                || component.node_flow(from, source_station, component.node(to).station) > 0;
            if allowed {
                let mut capacity = edge.capacity as i64;
                if create_new_paths {
                    capacity = (capacity * saturation / 100).max(1);
                }
                let free_capacity = capacity - edge.flow as i64;
                // punish in-between stops a little
                let distance = edge.distance + 1;
                if A::is_better(
                    &arena[to.index()],
                    &arena[from.index()],
                    capacity,
                    free_capacity,
                    distance,
                ) {
                    frontier.remove(&(A::rank(&arena[to.index()]), to.0));
                    fork(&mut arena, to.index(), from.index(), capacity, free_capacity, distance);
                    frontier.insert((A::rank(&arena[to.index()]), to.0));
                }
            }
            to = next;
        }
    }
    arena
}

// ── Pushing flow ─────────────────────────────────────────────────────────────

/// Walk the parent chain of `arena[idx]` and add `flow` along it.
///
/// With `positive_cap`, every hop clamps the amount to its remaining
/// attenuated capacity and the push collapses to zero if any hop is full.
/// The amount actually accepted propagates back down the chain and is
/// booked on every traversed edge.
fn add_flow(
    component: &mut Component,
    arena: &mut [PathAnno],
    idx: usize,
    mut flow: u32,
    positive_cap: bool,
) -> u32 {
    let Some(parent) = arena[idx].parent else {
        arena[idx].flow += flow;
        return flow;
    };
    let parent = parent as usize;
    let from = arena[parent].node;
    let to = arena[idx].node;

    if positive_cap {
        let edge = component.edge(from, to);
        let saturation = component.settings().short_path_saturation as u64;
        let usable = (edge.capacity as u64 * saturation / 100).min(u32::MAX as u64) as u32;
        if usable > edge.flow {
            flow = flow.min(usable - edge.flow);
        } else {
            return 0;
        }
    }

    flow = add_flow(component, arena, parent, flow, positive_cap);
    component.edge_mut(from, to).flow += flow;
    arena[idx].flow += flow;
    flow
}

/// Push one demand increment from `source` toward `dest` along the path
/// tree, updating the origin edge's unsatisfied demand.
fn push_flow(
    component: &mut Component,
    arena: &mut [PathAnno],
    source: NodeId,
    dest: NodeId,
    accuracy: u32,
    positive_cap: bool,
) -> u32 {
    let edge = component.edge(source, dest);
    debug_assert!(edge.unsatisfied_demand > 0);
    let flow = (edge.demand / accuracy).clamp(1, edge.unsatisfied_demand);
    let flow = add_flow(component, arena, dest.index(), flow, positive_cap);
    component.edge_mut(source, dest).unsatisfied_demand -= flow;
    flow
}

/// Fold the arena's positive-flow paths into path records on the nodes
/// they depart from, then drop the arena.
fn cleanup_paths(component: &mut Component, arena: &[PathAnno]) {
    for anno in arena {
        let Some(parent) = anno.parent else { continue };
        if anno.flow == 0 {
            continue;
        }
        let from = arena[parent as usize].node;
        component.node_mut(from).paths.push(PathRecord {
            origin: anno.origin,
            next: anno.node,
            flow: anno.flow,
        });
    }
}

/// Whether `source` still has any uncovered demand toward anyone.
fn has_unsatisfied_demand(component: &Component, source: NodeId) -> bool {
    (0..component.len() as u32).any(|dest| {
        component.edge(source, NodeId(dest)).unsatisfied_demand > 0
    })
}

// ── Cycle elimination ────────────────────────────────────────────────────────

/// DFS bookkeeping: which out-record of a node the current search chain
/// follows.
#[derive(Copy, Clone, PartialEq)]
enum Trace {
    Unseen,
    Resolved,
    Active(usize),
}

/// Merge a node's records with the same origin by next hop, so parallel
/// paths are summarized into one record each.  Returns next hop → record
/// slot, in ascending hop order.
fn summarize_records(component: &mut Component, origin: NodeId, at: NodeId) -> BTreeMap<NodeId, usize> {
    let node = component.node_mut(at);
    let mut hops: BTreeMap<NodeId, usize> = BTreeMap::new();
    for slot in 0..node.paths.len() {
        let record = node.paths[slot];
        if record.origin != origin {
            continue;
        }
        match hops.entry(record.next) {
            Entry::Vacant(entry) => {
                entry.insert(slot);
            }
            Entry::Occupied(entry) => {
                let first = *entry.get();
                node.paths[first].flow += record.flow;
                node.paths[slot].flow = 0;
            }
        }
    }
    hops
}

/// Minimum record flow around the active cycle through `start`.
fn find_cycle_flow(component: &Component, trace: &[Trace], start: NodeId) -> u32 {
    let mut flow = u32::MAX;
    let mut at = start;
    loop {
        let Trace::Active(slot) = trace[at.index()] else { break };
        let record = component.node(at).paths[slot];
        flow = flow.min(record.flow);
        at = record.next;
        if at == start {
            break;
        }
    }
    flow
}

/// Subtract `flow` from every record and every edge on the active cycle
/// through `start`.
fn reduce_cycle(component: &mut Component, trace: &[Trace], start: NodeId, flow: u32) {
    let mut at = start;
    loop {
        let Trace::Active(slot) = trace[at.index()] else { return };
        let next = {
            let record = &mut component.node_mut(at).paths[slot];
            record.flow -= flow;
            record.next
        };
        component.edge_mut(at, next).flow -= flow;
        at = next;
        if at == start {
            return;
        }
    }
}

fn eliminate_from(
    component: &mut Component,
    trace: &mut [Trace],
    origin: NodeId,
    next_id: NodeId,
) -> bool {
    match trace[next_id.index()] {
        Trace::Resolved => false,
        Trace::Active(_) => {
            // Arrived at a node on the current chain: a cycle.
            let flow = find_cycle_flow(component, trace, next_id);
            if flow > 0 {
                reduce_cycle(component, trace, next_id, flow);
                true
            } else {
                false
            }
        }
        Trace::Unseen => {
            let hops = summarize_records(component, origin, next_id);
            let mut found = false;
            for (&hop, &slot) in &hops {
                if component.node(next_id).paths[slot].flow > 0 {
                    trace[next_id.index()] = Trace::Active(slot);
                    found |= eliminate_from(component, trace, origin, hop);
                }
            }
            // A branch that yielded cycles may hide further ones; leave it
            // open for re-inspection.
            trace[next_id.index()] = if found { Trace::Unseen } else { Trace::Resolved };
            found
        }
    }
}

/// One cycle-elimination sweep over all origins.  Returns whether any
/// cycle was found and removed.
pub(crate) fn eliminate_cycles(component: &mut Component) -> bool {
    let mut found = false;
    for origin in 0..component.len() as u32 {
        let origin = NodeId(origin);
        let mut trace = vec![Trace::Unseen; component.len()];
        found |= eliminate_from(component, &mut trace, origin, origin);
    }
    found
}

// ── Passes ───────────────────────────────────────────────────────────────────

/// Pass 1: saturate shortest paths under attenuated capacities.
pub fn run_pass1(component: &mut Component) {
    let size = component.len() as u32;
    let accuracy = component.settings().accuracy.max(1);
    let mut more_loops = true;

    while more_loops {
        more_loops = false;
        for source in (0..size).map(NodeId) {
            if !has_unsatisfied_demand(component, source) {
                continue;
            }
            let mut arena = dijkstra::<DistancePolicy>(component, source, true);
            for dest in (0..size).map(NodeId) {
                if component.edge(source, dest).unsatisfied_demand == 0 {
                    continue;
                }
                if arena[dest.index()].free_capacity > 0
                    && push_flow(component, &mut arena, source, dest, accuracy, true) > 0
                {
                    // More of this edge's demand may fit in a later round.
                    if component.edge(source, dest).unsatisfied_demand > 0 {
                        more_loops = true;
                    }
                } else if component.edge(source, dest).unsatisfied_demand
                    == component.edge(source, dest).demand
                    && arena[dest.index()].reachable()
                {
                    // No capacity anywhere, and nothing assigned yet: force
                    // one path so the pair is not starved entirely.
                    push_flow(component, &mut arena, source, dest, accuracy, false);
                }
            }
            cleanup_paths(component, &arena);
        }
        if !more_loops {
            more_loops = eliminate_cycles(component);
        }
    }
}

/// Pass 2: absorb residual demand into already-established channels,
/// overload permitted.
pub fn run_pass2(component: &mut Component) {
    let size = component.len() as u32;
    let accuracy = component.settings().accuracy.max(1);
    let mut demand_left = true;

    while demand_left {
        demand_left = false;
        for source in (0..size).map(NodeId) {
            if !has_unsatisfied_demand(component, source) {
                continue;
            }
            let mut arena = dijkstra::<CapacityPolicy>(component, source, false);
            for dest in (0..size).map(NodeId) {
                if component.edge(source, dest).unsatisfied_demand > 0
                    && arena[dest.index()].reachable()
                {
                    push_flow(component, &mut arena, source, dest, accuracy, false);
                    if component.edge(source, dest).unsatisfied_demand > 0 {
                        demand_left = true;
                    }
                }
            }
            cleanup_paths(component, &arena);
        }
    }
}
