//! Engine configuration.
//!
//! Configuration exists at two altitudes:
//!
//! - [`EngineConfig`] is what the host owns and may change at any time:
//!   one [`DistributionShape`] per cargo plus the shared
//!   [`LinkGraphSettings`].
//! - [`ComponentSettings`] is the snapshot a component takes at
//!   construction time, with the shape already resolved for the component's
//!   cargo.  Background jobs only ever consult the snapshot, so a settings
//!   change mid-job cannot tear a running calculation.

use crate::{CargoId, FlowError, FlowResult};

// ── DistributionShape ─────────────────────────────────────────────────────────

/// How demand between stations is derived from supply, per cargo.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum DistributionShape {
    /// Demand roughly proportional to the product of both supplies, with a
    /// balancing return flow (passenger-like).
    Symmetric,
    /// Demand proportional to the source supply only; no return flow.
    Antisymmetric,
    /// The engine does not touch this cargo at all.
    Manual,
}

// ── LinkGraphSettings ─────────────────────────────────────────────────────────

/// Tunables shared by every cargo's link graph.
#[derive(Clone, PartialEq, Eq, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct LinkGraphSettings {
    /// Granularity of the demand calculation and of the per-edge push cap in
    /// the flow solver.  Must be ≥ 1; higher is finer (and slower).
    pub accuracy: u32,

    /// Percent weight of the destination's own supply when sizing demand.
    /// 0 means "ignore destination supply" (antisymmetric behaviour).
    pub mod_size: u32,

    /// Percent distance sensitivity of demand.  Values above 100 have the
    /// excess squared to sharpen the falloff.
    pub mod_distance: u32,

    /// Percent of an edge's capacity usable during pass 1 of the flow
    /// solver.  Attenuating capacity there biases flow onto short paths.
    pub short_path_saturation: u32,

    /// Days between two recalculations of the same cargo's link graph.
    pub recalc_interval: u32,

    /// Smoothing window, in days, applied to observed link capacities.
    pub moving_average_length: u32,
}

impl Default for LinkGraphSettings {
    fn default() -> Self {
        Self {
            accuracy: 16,
            mod_size: 100,
            mod_distance: 100,
            short_path_saturation: 80,
            recalc_interval: 8,
            moving_average_length: 30,
        }
    }
}

// ── ComponentSettings ─────────────────────────────────────────────────────────

/// The configuration snapshot carried by a component for its whole life,
/// with the distribution shape resolved for the component's cargo.
#[derive(Clone, PartialEq, Eq, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ComponentSettings {
    pub shape: DistributionShape,
    pub accuracy: u32,
    pub mod_size: u32,
    pub mod_distance: u32,
    pub short_path_saturation: u32,
}

// ── EngineConfig ──────────────────────────────────────────────────────────────

/// Top-level engine configuration, owned by the host.
#[derive(Clone, PartialEq, Eq, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct EngineConfig {
    /// Distribution shape per cargo; the vector length is the cargo count.
    pub shapes: Vec<DistributionShape>,

    /// Shared tunables.
    pub settings: LinkGraphSettings,
}

impl EngineConfig {
    /// A configuration with `num_cargos` cargos, all symmetric, default
    /// tunables.
    pub fn new(num_cargos: usize) -> Self {
        Self {
            shapes: vec![DistributionShape::Symmetric; num_cargos],
            settings: LinkGraphSettings::default(),
        }
    }

    pub fn num_cargos(&self) -> usize {
        self.shapes.len()
    }

    /// The distribution shape for `cargo`.  Out-of-range cargos are treated
    /// as manual, i.e. untouched.
    pub fn shape(&self, cargo: CargoId) -> DistributionShape {
        self.shapes
            .get(cargo.index())
            .copied()
            .unwrap_or(DistributionShape::Manual)
    }

    /// Take the settings snapshot a new component of `cargo` will carry.
    pub fn snapshot(&self, cargo: CargoId) -> ComponentSettings {
        ComponentSettings {
            shape: self.shape(cargo),
            accuracy: self.settings.accuracy,
            mod_size: self.settings.mod_size,
            mod_distance: self.settings.mod_distance,
            short_path_saturation: self.settings.short_path_saturation,
        }
    }

    pub fn validate(&self) -> FlowResult<()> {
        if self.shapes.is_empty() {
            return Err(FlowError::Config("at least one cargo is required".into()));
        }
        if self.shapes.len() > CargoId::INVALID.index() {
            return Err(FlowError::Config(format!(
                "cargo count {} exceeds the id space",
                self.shapes.len()
            )));
        }
        if self.settings.accuracy == 0 {
            return Err(FlowError::Config("accuracy must be at least 1".into()));
        }
        if self.settings.recalc_interval == 0 {
            return Err(FlowError::Config("recalc_interval must be at least 1".into()));
        }
        if self.settings.moving_average_length == 0 {
            return Err(FlowError::Config(
                "moving_average_length must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
