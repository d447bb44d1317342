//! Demand calculator.
//!
//! Distributes every node's supply over the other nodes as per-edge
//! demand.  Supply and demand nodes rotate through FIFO lists; each supply
//! node offers a share to every demand node in turn, sized by the
//! distribution shape and damped by distance, until its supply is spoken
//! for.  A shared "chance" counter lets far-away pairs that keep losing the
//! divisor test eventually receive a single unit, so nothing is starved
//! forever merely for being distant.

use std::collections::VecDeque;

use lf_core::{DistributionShape, NodeId};
use lf_graph::Component;

/// Assign per-edge demand across the component according to its settings
/// snapshot.
pub fn run(component: &mut Component) {
    let settings = component.settings().clone();
    let mut mod_size = settings.mod_size as i64;
    let mut mod_dist = settings.mod_distance as i64;
    if mod_dist > 100 {
        // increase the effect of mod_dist > 100
        let over = mod_dist - 100;
        mod_dist = 100 + over * over;
    }

    match settings.shape {
        DistributionShape::Manual => return,
        DistributionShape::Antisymmetric => mod_size = 0,
        DistributionShape::Symmetric => {}
    }

    calc_demand(component, settings.accuracy.max(1) as i64, mod_size, mod_dist);
}

fn calc_demand(component: &mut Component, accuracy: i64, mod_size: i64, mod_dist: i64) {
    let mut supplies: VecDeque<NodeId> = VecDeque::new();
    let mut demands: VecDeque<NodeId> = VecDeque::new();
    let mut supply_sum: u64 = 0;
    let mut num_supplies: u64 = 0;
    let mut num_demands: u64 = 0;

    for id in (0..component.len() as u32).map(NodeId) {
        let node = component.node(id);
        if node.supply > 0 {
            supplies.push_back(id);
            supply_sum += node.supply as u64;
            num_supplies += 1;
        }
        if node.demand > 0 {
            demands.push_back(id);
            num_demands += 1;
        }
    }

    if supply_sum == 0 || num_demands == 0 {
        return;
    }

    let demand_per_node = (supply_sum / num_demands).max(1) as i64;
    let max_distance = component.max_distance().max(1) as i64;
    let mut chance: u64 = 0;

    while !supplies.is_empty() && !demands.is_empty() {
        let Some(node1) = supplies.pop_front() else { break };

        let mut i = 0;
        while i < num_demands {
            i += 1;
            debug_assert!(!demands.is_empty());
            let Some(node2) = demands.pop_front() else { break };

            if node1 == node2 {
                if demands.is_empty() && supplies.is_empty() {
                    // only one node with both supply and demand left
                    return;
                }
                demands.push_back(node2);
                continue;
            }

            let from_supply = component.node(node1).supply as i64;
            let mut supply = from_supply;
            if mod_size > 0 {
                let to_supply = component.node(node2).supply as i64;
                supply = (from_supply
                    .saturating_mul(to_supply)
                    .saturating_mul(mod_size)
                    / 100
                    / demand_per_node)
                    .max(1);
            }

            // Scale the distance by mod_dist around max_distance, then the
            // divisor by distance around accuracy / 2.
            let forward_dist = component.edge(node1, node2).distance as i64;
            let distance = max_distance - (max_distance - forward_dist) * mod_dist / 100;
            let divisor = (accuracy * (mod_dist - 50) / 100
                + accuracy * distance / max_distance
                + 1)
                .max(1);

            let mut demand_forw: u32 = 0;
            if divisor < supply {
                demand_forw = (supply / divisor).min(u32::MAX as i64) as u32;
            } else {
                chance += 1;
                if chance > accuracy as u64 * num_demands * num_supplies {
                    // after some trying, give distant pairs one unit too
                    demand_forw = 1;
                }
            }

            demand_forw = demand_forw.min(component.node(node1).undelivered_supply);

            if mod_size > 0 && component.node(node1).demand > 0 {
                let mut demand_back =
                    ((demand_forw as i64 * mod_size / 100).min(u32::MAX as i64)) as u32;
                let to_undelivered = component.node(node2).undelivered_supply;
                if demand_back > to_undelivered {
                    demand_back = to_undelivered;
                    demand_forw = (demand_back as i64 * 100 / mod_size) as u32;
                }
                let backward = component.edge_mut(node2, node1);
                backward.demand = backward.demand.saturating_add(demand_back);
                backward.unsatisfied_demand =
                    backward.unsatisfied_demand.saturating_add(demand_back);
                component.node_mut(node2).undelivered_supply -= demand_back;
            }

            let forward = component.edge_mut(node1, node2);
            forward.demand = forward.demand.saturating_add(demand_forw);
            forward.unsatisfied_demand = forward.unsatisfied_demand.saturating_add(demand_forw);
            component.node_mut(node1).undelivered_supply -= demand_forw;

            if mod_size == 0 || component.node(node2).undelivered_supply > 0 {
                demands.push_back(node2);
            } else {
                num_demands -= 1;
            }

            if component.node(node1).undelivered_supply == 0 {
                break;
            }
        }

        if component.node(node1).undelivered_supply != 0 {
            supplies.push_back(node1);
        }
    }
}
