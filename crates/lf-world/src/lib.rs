//! `lf-world` — the simulator-side station model.
//!
//! The distribution engine does not own stations; it observes them through
//! the [`StationProvider`] trait and publishes routing tables back into
//! them at job join.  This crate supplies both the trait and an in-memory
//! [`World`] implementing it, which the demo binary and the test suites
//! drive directly.
//!
//! # Crate layout
//!
//! | Module             | Contents                                          |
//! |--------------------|---------------------------------------------------|
//! | [`station`]        | `MapPos`, `LinkStat`, `GoodsEntry`, `Station`, `World`, `StationProvider` |
//! | [`flows`]          | `FlowStat`, `FlowStatSet`, `FlowStatMap` routing tables |
//! | [`moving_average`] | capacity smoothing applied to link statistics     |

pub mod flows;
pub mod moving_average;
pub mod station;

#[cfg(test)]
mod tests;

pub use flows::{FlowStat, FlowStatMap, FlowStatSet};
pub use moving_average::MovingAverage;
pub use station::{GoodsEntry, LinkStat, MapPos, Station, StationProvider, World};
