//! Init handler.
//!
//! Resets the per-job annotations so a component can be solved regardless
//! of what state it was restored or rebuilt with: undelivered supply back
//! to full supply, all demand and flow annotations to zero, path records
//! and flow tables cleared.  Structure (distances, capacities, edge
//! threading) is left untouched.

use lf_core::NodeId;
use lf_graph::Component;

pub fn run(component: &mut Component) {
    let size = component.len() as u32;
    for id in (0..size).map(NodeId) {
        let node = component.node_mut(id);
        node.undelivered_supply = node.supply;
        node.paths.clear();
        node.flows.clear();
    }
    for from in (0..size).map(NodeId) {
        for to in (0..size).map(NodeId) {
            let edge = component.edge_mut(from, to);
            edge.demand = 0;
            edge.unsatisfied_demand = 0;
            edge.flow = 0;
        }
    }
}
