//! The engine instance and its tick driver.

use rustc_hash::FxHashMap;

use lf_core::{
    CargoId, ComponentId, Date, DistributionShape, EngineConfig, FlowError, FlowResult,
    JOIN_TICK, SPAWN_TICK, StationId, Tick,
};
use lf_world::World;

use crate::job::Job;
use crate::observer::{EngineObserver, NoopObserver};
use crate::publish::publish_component;
use crate::registry::CargoRegistry;
use crate::saveload::{
    EngineSave, JobSave, RegistrySave, capture_station_flows, restore_station_flows,
};

/// The cargo distribution engine: one registry per cargo, driven once per
/// simulated tick.
pub struct DistributionEngine {
    config: EngineConfig,
    registries: Vec<CargoRegistry>,
}

impl std::fmt::Debug for DistributionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistributionEngine")
            .field("config", &self.config)
            .field("registries", &self.registries)
            .finish()
    }
}

impl DistributionEngine {
    pub fn new(config: EngineConfig) -> FlowResult<Self> {
        config.validate()?;
        let registries = (0..config.num_cargos())
            .map(|cargo| CargoRegistry::new(CargoId(cargo as u8)))
            .collect();
        Ok(Self { config, registries })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the configuration.  Running jobs are unaffected — they keep
    /// the snapshot their component was built with.
    pub fn update_config(&mut self, config: EngineConfig) -> FlowResult<()> {
        config.validate()?;
        if config.num_cargos() != self.registries.len() {
            return Err(FlowError::Config(format!(
                "cargo count changed from {} to {}",
                self.registries.len(),
                config.num_cargos()
            )));
        }
        self.config = config;
        Ok(())
    }

    pub fn registry(&self, cargo: CargoId) -> Option<&CargoRegistry> {
        self.registries.get(cargo.index())
    }

    // ── Tick driver ───────────────────────────────────────────────────────

    /// Entry point called once per simulated tick.
    pub fn on_tick(&mut self, tick: Tick, world: &mut World) {
        self.on_tick_with(tick, world, &mut NoopObserver);
    }

    /// [`on_tick`](Self::on_tick) with lifecycle callbacks.
    ///
    /// On the spawn offset of each day, every cargo whose turn it is gets a
    /// shot at starting one component; on the (earlier) join offset, its
    /// due jobs are merged back.  Turns are spread as
    /// `date % recalc_interval == cargo % recalc_interval`, so the work is
    /// distributed evenly over the recalculation cycle.
    pub fn on_tick_with<O: EngineObserver>(&mut self, tick: Tick, world: &mut World, observer: &mut O) {
        let fract = tick.day_fract();
        if fract != SPAWN_TICK && fract != JOIN_TICK {
            return;
        }
        let date = tick.date();
        let interval = self.config.settings.recalc_interval.max(1);

        let mut cargo = (date.0 % interval) as usize;
        while cargo < self.registries.len() {
            if self.config.shape(CargoId(cargo as u8)) != DistributionShape::Manual {
                if fract == SPAWN_TICK {
                    self.spawn_next(cargo, date, world, observer);
                } else {
                    self.join_due(cargo, date, world, observer);
                }
            }
            cargo += interval as usize;
        }
    }

    fn spawn_next<O: EngineObserver>(
        &mut self,
        cargo_idx: usize,
        date: Date,
        world: &World,
        observer: &mut O,
    ) {
        let cargo = CargoId(cargo_idx as u8);
        let snapshot = self.config.snapshot(cargo);
        let interval = self.config.settings.recalc_interval.max(1);
        let registry = &mut self.registries[cargo_idx];

        if let Some(component) = registry.next_component(world, &snapshot) {
            let index = component.index();
            let size = component.len();
            log::debug!(
                "cargo {}: spawning job for component {} ({} nodes) on {date}",
                cargo.0,
                index.0,
                size
            );
            observer.on_spawn(cargo, date, index, size);
            registry.add_job(Job::spawn(component, date + interval));
        }
    }

    fn join_due<O: EngineObserver>(
        &mut self,
        cargo_idx: usize,
        date: Date,
        world: &mut World,
        observer: &mut O,
    ) {
        let cargo = CargoId(cargo_idx as u8);
        for job in self.registries[cargo_idx].take_due_jobs(date) {
            let component = job.join();
            let index = component.index();
            log::debug!("cargo {}: joining component {} on {date}", cargo.0, index.0);
            observer.on_join(cargo, date, index);
            publish_component(component, world);
        }
    }

    // ── Persistence ───────────────────────────────────────────────────────

    /// Capture the engine's complete persisted state, including the
    /// world's routing tables.
    pub fn save(&self, world: &World) -> EngineSave {
        let cargos = self
            .registries
            .iter()
            .map(|registry| {
                let mut visited: Vec<(u16, u16)> = registry
                    .visited()
                    .iter()
                    .map(|(station, component)| (station.0, component.0))
                    .collect();
                visited.sort_unstable();
                RegistrySave {
                    cargo: registry.cargo().0,
                    current_station: registry.current_station(),
                    current_component: registry.current_component().0,
                    visited,
                    jobs: registry
                        .jobs()
                        .iter()
                        .map(|job| JobSave {
                            join_date: job.join_date().0,
                            component: job.input().clone(),
                        })
                        .collect(),
                }
            })
            .collect();
        EngineSave {
            cargos,
            stations: capture_station_flows(world, self.registries.len()),
        }
    }

    /// Rebuild an engine (and the world's routing tables) from persisted
    /// state.  Validation is all-or-nothing: on any corruption the world
    /// is left untouched and an error is returned.  In-flight jobs are
    /// re-spawned from their captured inputs.
    pub fn load(config: EngineConfig, save: EngineSave, world: &mut World) -> FlowResult<Self> {
        config.validate()?;
        if save.cargos.len() != config.num_cargos() {
            return Err(FlowError::CorruptSave(format!(
                "save has {} cargos, configuration has {}",
                save.cargos.len(),
                config.num_cargos()
            )));
        }
        for (idx, registry_save) in save.cargos.iter().enumerate() {
            if registry_save.cargo as usize != idx {
                return Err(FlowError::CorruptSave(format!(
                    "registry {} claims cargo {}",
                    idx, registry_save.cargo
                )));
            }
            for job_save in &registry_save.jobs {
                job_save.component.validate()?;
            }
        }
        let tables = restore_station_flows(world, config.num_cargos(), &save.stations)?;

        // Everything checked out; apply.
        let registries = save
            .cargos
            .into_iter()
            .map(|registry_save| {
                let cargo = CargoId(registry_save.cargo);
                let visited: FxHashMap<StationId, ComponentId> = registry_save
                    .visited
                    .into_iter()
                    .map(|(station, component)| (StationId(station), ComponentId(component)))
                    .collect();
                let jobs = registry_save
                    .jobs
                    .into_iter()
                    .map(|job_save| {
                        Job::spawn(job_save.component.restore(cargo), Date(job_save.join_date))
                    })
                    .collect();
                CargoRegistry::from_parts(
                    cargo,
                    registry_save.current_station,
                    ComponentId(registry_save.current_component),
                    visited,
                    jobs,
                )
            })
            .collect();
        for (station, cargo, map) in tables {
            if let Some(goods) = world.goods_mut(station, cargo) {
                goods.flows = map;
            }
        }
        Ok(Self { config, registries })
    }
}
