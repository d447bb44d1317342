//! `lf-engine` — the cargo distribution engine.
//!
//! One [`CargoRegistry`] per cargo discovers connected components of the
//! station graph and runs a background [`Job`] over each: the handler
//! pipeline from `lf-solver`, usually on its own worker thread.  The
//! [`DistributionEngine`] drives the registries from the host's tick loop
//! and merges finished jobs back into the stations' routing tables.
//!
//! ```text
//!  on_tick ─┬─ SPAWN_TICK ─→ registry.next_component() ─→ Job::spawn()
//!           └─ JOIN_TICK  ─→ job.join() ─→ publish into routing tables
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`engine`]   | `DistributionEngine`, the tick driver                 |
//! | [`registry`] | `CargoRegistry`: cursor, generations, job list        |
//! | [`job`]      | `Job`: worker thread per pipeline run                 |
//! | [`publish`]  | merging node flow tables into station routing tables  |
//! | [`observer`] | `EngineObserver` lifecycle hooks                      |
//! | [`saveload`] | serde save tree with fail-fast validation             |

pub mod engine;
pub mod job;
pub mod observer;
pub mod publish;
pub mod registry;
pub mod saveload;


pub use engine::DistributionEngine;
pub use job::Job;
pub use observer::{EngineObserver, NoopObserver};
pub use registry::CargoRegistry;
pub use saveload::{ComponentSave, EngineSave};
