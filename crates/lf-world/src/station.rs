//! Station pool and the observation interface the engine builds graphs from.
//!
//! # Ownership
//!
//! The [`World`] owns stations; the engine only reads them through
//! [`StationProvider`] while building a component, and writes exactly one
//! thing back — the per-station [`FlowStatMap`] routing tables — when a job
//! is joined on the simulation thread.  Nothing here is shared with worker
//! threads.

use std::collections::BTreeMap;

use lf_core::{CargoId, StationId, TICKS_PER_DAY, Tick};

use crate::flows::FlowStatMap;
use crate::moving_average::MovingAverage;

// ── MapPos ────────────────────────────────────────────────────────────────────

/// A station's position on the map grid.  The engine only ever derives
/// manhattan distances from it.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct MapPos {
    pub x: u32,
    pub y: u32,
}

impl MapPos {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to `other`.
    #[inline]
    pub fn manhattan(self, other: MapPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

// ── Link statistics ───────────────────────────────────────────────────────────

/// Smoothed statistics of one directed link between two stations.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct LinkStat {
    /// Moving average of vehicle capacity observed on the link.
    pub capacity: u32,
    /// Moving average of cargo actually moved over the link.
    pub usage: u32,
}

// ── GoodsEntry ────────────────────────────────────────────────────────────────

/// Per-station, per-cargo state.
#[derive(Clone, Debug, Default)]
pub struct GoodsEntry {
    /// Cargo units produced here in the last period.
    pub supply: u32,
    /// Whether this station accepts the cargo for final delivery.
    pub accepts: bool,
    /// Outgoing links carrying this cargo, keyed by neighbour station.
    pub link_stats: BTreeMap<StationId, LinkStat>,
    /// The routing table the engine publishes at job join.
    pub flows: FlowStatMap,
}

// ── Station ───────────────────────────────────────────────────────────────────

/// A station in the pool.
#[derive(Clone, Debug)]
pub struct Station {
    pub pos: MapPos,
    goods: Vec<GoodsEntry>,
}

impl Station {
    fn new(pos: MapPos, num_cargos: usize) -> Self {
        Self { pos, goods: vec![GoodsEntry::default(); num_cargos] }
    }

    pub fn goods(&self, cargo: CargoId) -> &GoodsEntry {
        &self.goods[cargo.index()]
    }

    pub fn goods_mut(&mut self, cargo: CargoId) -> &mut GoodsEntry {
        &mut self.goods[cargo.index()]
    }
}

// ── StationProvider ───────────────────────────────────────────────────────────

/// What the engine needs to observe about stations.
///
/// Implementations are read-only from the engine's point of view; the world
/// may mutate freely between (but not during) engine calls.
pub trait StationProvider {
    /// One past the largest station id the registry cursor must consider.
    fn station_bound(&self) -> u16;

    /// Whether `id` currently names a live station.
    fn is_valid(&self, id: StationId) -> bool;

    /// Map position of a live station.
    fn position(&self, id: StationId) -> MapPos;

    /// Supply of `cargo` produced at `id` in the last period.
    fn supply(&self, id: StationId, cargo: CargoId) -> u32;

    /// Whether `id` accepts `cargo`.
    fn accepts(&self, id: StationId, cargo: CargoId) -> bool;

    /// The station's outgoing links for `cargo`, as `(neighbour, capacity)`
    /// pairs in ascending neighbour order.
    fn links(&self, id: StationId, cargo: CargoId) -> impl Iterator<Item = (StationId, u32)> + '_;
}

// ── World ─────────────────────────────────────────────────────────────────────

/// In-memory station pool.  Station ids are slot indices; removing a
/// station leaves a hole so ids stay stable.
pub struct World {
    stations: Vec<Option<Station>>,
    num_cargos: usize,
}

impl World {
    pub fn new(num_cargos: usize) -> Self {
        Self { stations: Vec::new(), num_cargos }
    }

    pub fn num_cargos(&self) -> usize {
        self.num_cargos
    }

    // ── Station management ────────────────────────────────────────────────

    pub fn add_station(&mut self, pos: MapPos) -> StationId {
        let id = StationId(self.stations.len() as u16);
        self.stations.push(Some(Station::new(pos, self.num_cargos)));
        id
    }

    /// Destroy a station.  Links other stations hold toward it stay behind
    /// as stale entries; the engine is expected to tolerate them.
    pub fn remove_station(&mut self, id: StationId) {
        if let Some(slot) = self.stations.get_mut(id.index()) {
            *slot = None;
        }
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(id.index()).and_then(|s| s.as_ref())
    }

    pub fn station_mut(&mut self, id: StationId) -> Option<&mut Station> {
        self.stations.get_mut(id.index()).and_then(|s| s.as_mut())
    }

    pub fn goods(&self, id: StationId, cargo: CargoId) -> Option<&GoodsEntry> {
        self.station(id).map(|s| s.goods(cargo))
    }

    pub fn goods_mut(&mut self, id: StationId, cargo: CargoId) -> Option<&mut GoodsEntry> {
        self.station_mut(id).map(|s| s.goods_mut(cargo))
    }

    // ── Convenience mutators (tests, demo, host loop) ─────────────────────

    pub fn set_supply(&mut self, id: StationId, cargo: CargoId, units: u32) {
        if let Some(goods) = self.goods_mut(id, cargo) {
            goods.supply = units;
        }
    }

    pub fn set_acceptance(&mut self, id: StationId, cargo: CargoId, accepts: bool) {
        if let Some(goods) = self.goods_mut(id, cargo) {
            goods.accepts = accepts;
        }
    }

    /// Overwrite the link `from → to` with an absolute capacity.
    pub fn set_link(&mut self, from: StationId, to: StationId, cargo: CargoId, capacity: u32) {
        if let Some(goods) = self.goods_mut(from, cargo) {
            goods.link_stats.insert(to, LinkStat { capacity, usage: 0 });
        }
    }

    /// Add a capacity observation on `from → to`, as a vehicle arrival
    /// would.  The observation stacks on top of the decayed average.
    pub fn record_capacity(&mut self, from: StationId, to: StationId, cargo: CargoId, cap: u32) {
        if let Some(goods) = self.goods_mut(from, cargo) {
            let stat = goods.link_stats.entry(to).or_default();
            stat.capacity = stat.capacity.saturating_add(cap);
        }
    }

    /// The routing table of `id` for `cargo`, if the station exists.
    pub fn routing_table(&self, id: StationId, cargo: CargoId) -> Option<&FlowStatMap> {
        self.goods(id, cargo).map(|g| &g.flows)
    }

    // ── Moving averages ───────────────────────────────────────────────────

    /// Decay the link statistics of all stations due this tick.  Each
    /// station is due once per day, staggered by its id, so the work is
    /// spread evenly across the day.
    pub fn run_link_averages(&mut self, tick: Tick, average_length: u32) {
        let avg = MovingAverage::new(average_length);
        let day_slot = tick.0 % TICKS_PER_DAY as u64;
        let mut id = day_slot as usize;
        while id < self.stations.len() {
            if let Some(station) = &mut self.stations[id] {
                for goods in &mut station.goods {
                    goods.link_stats.retain(|_, stat| {
                        stat.capacity = avg.decrease(stat.capacity);
                        stat.usage = avg.decrease(stat.usage);
                        stat.capacity > 0
                    });
                }
            }
            id += TICKS_PER_DAY as usize;
        }
    }
}

impl StationProvider for World {
    fn station_bound(&self) -> u16 {
        self.stations.len() as u16
    }

    fn is_valid(&self, id: StationId) -> bool {
        self.station(id).is_some()
    }

    fn position(&self, id: StationId) -> MapPos {
        self.station(id).map(|s| s.pos).unwrap_or_default()
    }

    fn supply(&self, id: StationId, cargo: CargoId) -> u32 {
        self.goods(id, cargo).map_or(0, |g| g.supply)
    }

    fn accepts(&self, id: StationId, cargo: CargoId) -> bool {
        self.goods(id, cargo).is_some_and(|g| g.accepts)
    }

    fn links(&self, id: StationId, cargo: CargoId) -> impl Iterator<Item = (StationId, u32)> + '_ {
        self.goods(id, cargo)
            .into_iter()
            .flat_map(|g| g.link_stats.iter().map(|(&to, stat)| (to, stat.capacity)))
    }
}
