//! Routing-table entries published by the engine.
//!
//! Every station keeps, per cargo, a [`FlowStatMap`]: for each source
//! station, a sorted multiset of `(via, planned, shipped)` entries.  The
//! packet mover consults the multiset in iteration order, which — because
//! [`FlowStat`] orders by `(length, via)` — is "best via first".
//!
//! `shipped` is owned by the packet mover at run time; the engine preserves
//! it for surviving entries when it republishes and zeroes it for new ones.

use std::collections::{BTreeMap, BTreeSet};

use lf_core::StationId;

/// One planned flow at a station: `planned` cargo units per period for
/// `via`, of which the mover has already shipped `shipped`.
///
/// The derived ordering (length first, then via) is load-bearing: readers
/// iterate a [`FlowStatSet`] front to back and take the first acceptable
/// via.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct FlowStat {
    /// Manhattan distance from the owning station to `via`; the sort key.
    pub length: u32,
    /// Next-hop station, or the owning station itself for local consumption.
    pub via: StationId,
    /// Units per period the engine planned for this via.
    pub planned: u32,
    /// Units the packet mover has shipped against the plan.
    pub shipped: u32,
}

/// Sorted multiset of flow entries for one source station.
pub type FlowStatSet = BTreeSet<FlowStat>;

/// Routing table of one station for one cargo: source station → flow entries.
pub type FlowStatMap = BTreeMap<StationId, FlowStatSet>;

/// Total planned units across all entries of a routing table.
pub fn planned_sum(map: &FlowStatMap) -> u64 {
    map.values()
        .flat_map(|set| set.iter())
        .map(|stat| stat.planned as u64)
        .sum()
}
