//! Publishing job results into station routing tables.
//!
//! This is the single point where engine code mutates simulator-visible
//! state, and it runs on the simulation thread at job join.  For every
//! surviving source a *fresh* entry set is built and swapped into the
//! station's table, so a reader iterating a set observes either the old
//! entries or the new ones, never a blend.
//!
//! Stale references are handled here, silently: sources and vias whose
//! station vanished while the job ran are dropped, as are vias the station
//! no longer has a direct link to.

use std::collections::BTreeMap;

use lf_core::{CargoId, NodeId, StationId};
use lf_graph::Component;
use lf_world::{FlowStat, FlowStatMap, FlowStatSet, MapPos, StationProvider, World};

/// Merge a finished component's per-node flow tables into the world's
/// routing tables.
pub(crate) fn publish_component(mut component: Component, world: &mut World) {
    let cargo = component.cargo();
    for id in (0..component.len() as u32).map(NodeId) {
        let station = component.node(id).station;
        let flows = std::mem::take(&mut component.node_mut(id).flows);
        if world.is_valid(station) {
            export_flows(world, station, cargo, flows);
        }
    }
}

/// Merge one node's flow table into its station's routing table.
fn export_flows(
    world: &mut World,
    station: StationId,
    cargo: CargoId,
    mut flows: BTreeMap<StationId, BTreeMap<StationId, i64>>,
) {
    let station_pos = world.position(station);
    let old: FlowStatMap = match world.goods_mut(station, cargo) {
        Some(goods) => std::mem::take(&mut goods.flows),
        None => return,
    };

    let mut result = FlowStatMap::new();

    // Update entries for sources the station already knew, preserving the
    // mover's shipped counters.
    for (source, via_set) in old {
        let Some(mut source_flows) = flows.remove(&source) else { continue };
        if !world.is_valid(source) {
            continue;
        }
        let mut new_set = FlowStatSet::new();
        for stat in via_set {
            if let Some(planned) = source_flows.remove(&stat.via) {
                if planned > 0 && world.is_valid(stat.via) {
                    new_set.insert(FlowStat {
                        length: stat.length,
                        via: stat.via,
                        planned: clamp_units(planned),
                        shipped: stat.shipped,
                    });
                }
            }
        }
        export_new_flows(world, station, station_pos, cargo, source, source_flows, &mut new_set);
        if !new_set.is_empty() {
            result.insert(source, new_set);
        }
    }

    // Entirely new sources.
    for (source, source_flows) in flows {
        let mut new_set = FlowStatSet::new();
        export_new_flows(world, station, station_pos, cargo, source, source_flows, &mut new_set);
        if !new_set.is_empty() {
            result.insert(source, new_set);
        }
    }

    if let Some(goods) = world.goods_mut(station, cargo) {
        goods.flows = result;
    }
}

/// Append freshly planned vias for one source, dropping anything the
/// station cannot actually reach any more.
fn export_new_flows(
    world: &World,
    station: StationId,
    station_pos: MapPos,
    cargo: CargoId,
    source: StationId,
    entries: BTreeMap<StationId, i64>,
    out: &mut FlowStatSet,
) {
    if !world.is_valid(source) {
        return;
    }
    for (via, planned) in entries {
        if planned <= 0 || !world.is_valid(via) {
            continue;
        }
        if via != station {
            let linked = world
                .goods(station, cargo)
                .is_some_and(|goods| goods.link_stats.contains_key(&via));
            if !linked {
                continue;
            }
        }
        out.insert(FlowStat {
            length: station_pos.manhattan(world.position(via)),
            via,
            planned: clamp_units(planned),
            shipped: 0,
        });
    }
}

fn clamp_units(planned: i64) -> u32 {
    debug_assert!(planned >= 0);
    planned.clamp(0, u32::MAX as i64) as u32
}
