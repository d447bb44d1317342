//! Per-cargo graph registry.
//!
//! The registry owns a rolling cursor over the station id space and the
//! cargo's in-flight jobs.  Component discovery is generational: every
//! full wrap of the cursor flips the parity of newly allocated component
//! ids, and a station whose last-seen component id has the *same* parity
//! as the current generation is known to have been visited this sweep.
//! That makes "seen this generation" an O(1) test without ever clearing
//! the colouring.
//!
//! Component ids grow monotonically within the id space while preserving
//! the generation's parity: +2 inside a generation, an odd step on wrap.

use rustc_hash::FxHashMap;

use lf_core::{CargoId, ComponentId, ComponentSettings, Date, StationId};
use lf_graph::{Component, build_component};
use lf_world::StationProvider;

use crate::job::Job;

/// Registry of one cargo's components and jobs.
pub struct CargoRegistry {
    cargo: CargoId,
    /// Rolling cursor over station ids.
    current_station: u16,
    /// Most recently allocated component id; `INVALID` before the first.
    current_component: ComponentId,
    /// Station colouring: the component each station was last seen in.
    visited: FxHashMap<StationId, ComponentId>,
    jobs: Vec<Job>,
}

impl std::fmt::Debug for CargoRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CargoRegistry")
            .field("cargo", &self.cargo)
            .field("current_station", &self.current_station)
            .field("current_component", &self.current_component)
            .field("visited", &self.visited)
            .field("jobs", &self.jobs.len())
            .finish()
    }
}

impl CargoRegistry {
    pub fn new(cargo: CargoId) -> Self {
        Self {
            cargo,
            current_station: 0,
            current_component: ComponentId::INVALID,
            visited: FxHashMap::default(),
            jobs: Vec::new(),
        }
    }

    /// Reassemble a registry from persisted state.
    pub(crate) fn from_parts(
        cargo: CargoId,
        current_station: u16,
        current_component: ComponentId,
        visited: FxHashMap<StationId, ComponentId>,
        jobs: Vec<Job>,
    ) -> Self {
        Self { cargo, current_station, current_component, visited, jobs }
    }

    pub fn cargo(&self) -> CargoId {
        self.cargo
    }

    pub(crate) fn current_station(&self) -> u16 {
        self.current_station
    }

    pub(crate) fn current_component(&self) -> ComponentId {
        self.current_component
    }

    pub(crate) fn visited(&self) -> &FxHashMap<StationId, ComponentId> {
        &self.visited
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn add_job(&mut self, job: Job) {
        self.jobs.push(job);
    }

    /// Remove and return all jobs due at `date`.
    pub fn take_due_jobs(&mut self, date: Date) -> Vec<Job> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.jobs.len() {
            if self.jobs[i].is_due(date) {
                due.push(self.jobs.remove(i));
            } else {
                i += 1;
            }
        }
        due
    }

    // ── Component discovery ───────────────────────────────────────────────

    /// Advance the cursor to the next station not yet visited in the
    /// current generation and build its component.
    ///
    /// Returns `None` when a full cursor loop finds nothing worth a job.
    /// Components of fewer than two nodes are discarded (their stations
    /// stay coloured for this generation) and the search continues.
    pub fn next_component<P: StationProvider>(
        &mut self,
        provider: &P,
        settings: &ComponentSettings,
    ) -> Option<Component> {
        let bound = provider.station_bound();
        if bound == 0 {
            return None;
        }
        let start = self.current_station;
        let mut parity = match self.current_component {
            ComponentId::INVALID => 0,
            id => id.parity(),
        };
        // Backstop against a persisted cursor beyond the current bound, in
        // which case the equal-to-start exit below would never trigger.
        let mut remaining = bound as u32 + 1;

        loop {
            let next = self.current_station.wrapping_add(1);
            if next == 0 || next >= bound {
                // Wrap around: a new generation begins with flipped parity,
                // so every station becomes eligible again.
                self.current_station = 0;
                parity ^= 1;
            } else {
                self.current_station = next;
            }

            let candidate = StationId(self.current_station);
            if provider.is_valid(candidate)
                && self.unvisited(candidate, parity)
                && provider.links(candidate, self.cargo).next().is_some()
            {
                let index = self.allocate_id(parity);
                let component =
                    build_component(provider, candidate, self.cargo, index, settings.clone());
                for node in component.nodes() {
                    self.visited.insert(node.station, index);
                }
                self.current_component = index;
                if component.len() > 1 {
                    return Some(component);
                }
            }

            remaining -= 1;
            if self.current_station == start || remaining == 0 {
                return None;
            }
        }
    }

    fn unvisited(&self, station: StationId, parity: u16) -> bool {
        match self.visited.get(&station) {
            None => true,
            Some(id) => id.parity() != parity,
        }
    }

    fn allocate_id(&self, parity: u16) -> ComponentId {
        let candidate = match self.current_component {
            ComponentId::INVALID => 2 + parity,
            prev => {
                let bumped = prev.0.saturating_add(1);
                if bumped % 2 == parity { bumped } else { bumped.saturating_add(1) }
            }
        };
        // Keep clear of the 0/1 seeds and the INVALID sentinel.
        if candidate >= u16::MAX - 1 { ComponentId(2 + parity) } else { ComponentId(candidate) }
    }
}
