//! Flow mapper.
//!
//! Folds the solver's path records into per-node `(source, via)` flow
//! tables.  A record `{origin, next, flow}` at node `prev` contributes:
//!
//! - `flow` to `next.flows[origin][next]` — provisionally booked as local
//!   consumption at the path's endpoint;
//! - `flow` to `prev.flows[origin][next]` — what `prev` must forward;
//! - `-flow` to `prev.flows[origin][prev]` (unless `prev` is the origin) —
//!   cancelling the local-consumption booking the previous hop made at
//!   `prev`.
//!
//! After the fold every record is dropped, so the solver's pass 2 sees
//! only the aggregated tables.

use lf_core::NodeId;
use lf_graph::Component;

/// Fold and clear all path records of the component.
pub fn run(component: &mut Component) {
    for prev_id in (0..component.len() as u32).map(NodeId) {
        let records = std::mem::take(&mut component.node_mut(prev_id).paths);
        let prev_station = component.node(prev_id).station;
        for record in records {
            if record.flow == 0 {
                continue;
            }
            let via_id = record.next;
            let via = component.node(via_id).station;
            let origin = component.node(record.origin).station;
            debug_assert_ne!(prev_station, via);
            debug_assert_ne!(via, origin);
            let flow = record.flow as i64;

            *component
                .node_mut(via_id)
                .flows
                .entry(origin)
                .or_default()
                .entry(via)
                .or_insert(0) += flow;
            let prev_flows = component.node_mut(prev_id).flows.entry(origin).or_default();
            *prev_flows.entry(via).or_insert(0) += flow;
            if prev_station != origin {
                *prev_flows.entry(prev_station).or_insert(0) -= flow;
            }
        }
    }
}
