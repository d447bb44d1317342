//! `lf-core` — foundational types for the `linkflow` cargo distribution
//! engine.
//!
//! This crate is a dependency of every other `lf-*` crate.  It intentionally
//! has no `lf-*` dependencies and minimal external ones (only `thiserror`
//! and `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`ids`]      | `CargoId`, `StationId`, `NodeId`, `ComponentId`        |
//! | [`time`]     | `Tick`, `Date`, day geometry, spawn/join tick offsets  |
//! | [`settings`] | `DistributionShape`, `LinkGraphSettings`, snapshots    |
//! | [`error`]    | `FlowError`, `FlowResult`                              |

pub mod error;
pub mod ids;
pub mod settings;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{FlowError, FlowResult};
pub use ids::{CargoId, ComponentId, NodeId, StationId};
pub use settings::{ComponentSettings, DistributionShape, EngineConfig, LinkGraphSettings};
pub use time::{Date, JOIN_TICK, SPAWN_TICK, TICKS_PER_DAY, Tick};
