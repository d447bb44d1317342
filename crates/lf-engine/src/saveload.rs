//! Persistence.
//!
//! The save tree is a plain serde structure with a fixed field layout:
//! per cargo the registry cursor, colouring, and in-flight jobs (each as
//! its captured *input* component — nodes with supply/demand/station,
//! edges with distance/capacity, in dense row-major order); per station
//! the routing tables, with each via encoded as a packed integer whose low
//! byte is a destination-kind tag.
//!
//! Loading validates everything before touching any state: unknown cargo
//! indices, malformed edge matrices, unpackable vias, and destinations
//! that no longer exist all fail fast with a corrupt-save error and leave
//! the world and engine untouched.

use lf_core::{CargoId, ComponentId, ComponentSettings, FlowError, FlowResult, StationId};
use lf_graph::{Component, Edge, Node};
use lf_world::{FlowStat, FlowStatMap, FlowStatSet, StationProvider, World};

// ── Packed destinations ──────────────────────────────────────────────────────

/// Destination-kind tag for stations; other kinds are reserved.
const DEST_KIND_STATION: u32 = 0;

/// Sentinel for "no destination".
pub const PACKED_INVALID: u32 = u32::MAX;

/// Pack a station destination into a single integer: kind in the low
/// byte, id above it.
pub fn pack_station(id: StationId) -> u32 {
    DEST_KIND_STATION | ((id.0 as u32) << 8)
}

/// Unpack a packed destination, rejecting sentinels and unknown kinds.
pub fn unpack_station(packed: u32) -> FlowResult<StationId> {
    if packed == PACKED_INVALID {
        return Err(FlowError::CorruptSave("destination is the invalid sentinel".into()));
    }
    if packed & 0xFF != DEST_KIND_STATION {
        return Err(FlowError::CorruptSave(format!(
            "unknown destination kind {}",
            packed & 0xFF
        )));
    }
    let id = packed >> 8;
    if id >= u16::MAX as u32 {
        return Err(FlowError::CorruptSave(format!("destination id {id} out of range")));
    }
    Ok(StationId(id as u16))
}

// ── Save tree ────────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct NodeSave {
    pub supply: u32,
    pub demand: u32,
    pub station: u16,
}

#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct EdgeSave {
    pub distance: u32,
    pub capacity: u32,
}

/// A component's persisted input: everything a job needs to start over.
#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct ComponentSave {
    pub index: u16,
    pub settings: ComponentSettings,
    pub nodes: Vec<NodeSave>,
    /// Dense row-major n×n edge matrix.
    pub edges: Vec<EdgeSave>,
}

#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct JobSave {
    pub join_date: u32,
    pub component: ComponentSave,
}

#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct RegistrySave {
    pub cargo: u8,
    pub current_station: u16,
    pub current_component: u16,
    /// Station colouring, sorted by station id.
    pub visited: Vec<(u16, u16)>,
    pub jobs: Vec<JobSave>,
}

#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct ViaSave {
    /// Packed destination (see [`pack_station`]).
    pub dest: u32,
    pub length: u32,
    pub planned: u32,
    pub shipped: u32,
}

#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct SourceFlowsSave {
    pub source: u16,
    pub vias: Vec<ViaSave>,
}

#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct CargoFlowsSave {
    pub cargo: u8,
    pub sources: Vec<SourceFlowsSave>,
}

#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct StationFlowsSave {
    pub station: u16,
    pub cargos: Vec<CargoFlowsSave>,
}

/// The engine's complete persisted state.
#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct EngineSave {
    pub cargos: Vec<RegistrySave>,
    pub stations: Vec<StationFlowsSave>,
}

// ── Component capture / restore ──────────────────────────────────────────────

impl ComponentSave {
    /// Snapshot a component's input state.
    pub fn capture(component: &Component) -> Self {
        let n = component.len();
        let nodes = component
            .nodes()
            .iter()
            .map(|node| NodeSave {
                supply: node.supply,
                demand: node.demand,
                station: node.station.0,
            })
            .collect();
        let mut edges = Vec::with_capacity(n * n);
        for from in (0..n as u32).map(lf_core::NodeId) {
            for to in (0..n as u32).map(lf_core::NodeId) {
                let edge = component.edge(from, to);
                edges.push(EdgeSave { distance: edge.distance, capacity: edge.capacity });
            }
        }
        Self {
            index: component.index().0,
            settings: component.settings().clone(),
            nodes,
            edges,
        }
    }

    /// Rebuild a runnable component from the snapshot.  Assumes
    /// [`validate`](Self::validate) has passed (or the snapshot was just
    /// captured from a live component).
    pub fn restore(&self, cargo: CargoId) -> Component {
        let nodes: Vec<Node> = self
            .nodes
            .iter()
            .map(|save| Node::new(StationId(save.station), save.supply, save.demand))
            .collect();
        let edges: Vec<Edge> = self
            .edges
            .iter()
            .map(|save| Edge { distance: save.distance, capacity: save.capacity, ..Edge::default() })
            .collect();
        let mut component =
            Component::new(cargo, ComponentId(self.index), self.settings.clone(), nodes, edges);
        component.thread_edges();
        component
    }

    pub fn validate(&self) -> FlowResult<()> {
        let n = self.nodes.len();
        if n == 0 {
            return Err(FlowError::CorruptSave("component with no nodes".into()));
        }
        if self.edges.len() != n * n {
            return Err(FlowError::CorruptSave(format!(
                "component edge matrix has {} entries for {} nodes",
                self.edges.len(),
                n
            )));
        }
        if self.settings.accuracy == 0 {
            return Err(FlowError::CorruptSave("component snapshot with zero accuracy".into()));
        }
        Ok(())
    }
}

// ── Routing-table capture / restore ──────────────────────────────────────────

/// Collect every station's routing tables in ascending station order.
pub(crate) fn capture_station_flows(world: &World, num_cargos: usize) -> Vec<StationFlowsSave> {
    let mut stations = Vec::new();
    for raw in 0..world.station_bound() {
        let station = StationId(raw);
        let mut cargos = Vec::new();
        for cargo_idx in 0..num_cargos {
            let cargo = CargoId(cargo_idx as u8);
            let Some(goods) = world.goods(station, cargo) else { continue };
            if goods.flows.is_empty() {
                continue;
            }
            let sources = goods
                .flows
                .iter()
                .map(|(source, set)| SourceFlowsSave {
                    source: source.0,
                    vias: set
                        .iter()
                        .map(|stat| ViaSave {
                            dest: pack_station(stat.via),
                            length: stat.length,
                            planned: stat.planned,
                            shipped: stat.shipped,
                        })
                        .collect(),
                })
                .collect();
            cargos.push(CargoFlowsSave { cargo: cargo_idx as u8, sources });
        }
        if !cargos.is_empty() {
            stations.push(StationFlowsSave { station: raw, cargos });
        }
    }
    stations
}

/// Validate persisted routing tables against the live world and rebuild
/// them.  Nothing is applied here; the caller installs the result only
/// after every table checked out.
pub(crate) fn restore_station_flows(
    world: &World,
    num_cargos: usize,
    saves: &[StationFlowsSave],
) -> FlowResult<Vec<(StationId, CargoId, FlowStatMap)>> {
    let mut tables = Vec::new();
    for station_save in saves {
        let station = StationId(station_save.station);
        if !world.is_valid(station) {
            return Err(FlowError::CorruptSave(format!(
                "routing table for missing station {}",
                station_save.station
            )));
        }
        for cargo_save in &station_save.cargos {
            if cargo_save.cargo as usize >= num_cargos {
                return Err(FlowError::CorruptSave(format!(
                    "routing table for out-of-range cargo {}",
                    cargo_save.cargo
                )));
            }
            let mut map = FlowStatMap::new();
            for source_save in &cargo_save.sources {
                let source = StationId(source_save.source);
                if !world.is_valid(source) {
                    return Err(FlowError::CorruptSave(format!(
                        "routing table source {} no longer exists",
                        source_save.source
                    )));
                }
                let mut set = FlowStatSet::new();
                for via_save in &source_save.vias {
                    let via = unpack_station(via_save.dest)?;
                    if !world.is_valid(via) {
                        return Err(FlowError::CorruptSave(format!(
                            "routing table destination {} no longer exists",
                            via.0
                        )));
                    }
                    set.insert(FlowStat {
                        length: via_save.length,
                        via,
                        planned: via_save.planned,
                        shipped: via_save.shipped,
                    });
                }
                map.insert(source, set);
            }
            tables.push((station, CargoId(cargo_save.cargo), map));
        }
    }
    Ok(tables)
}
