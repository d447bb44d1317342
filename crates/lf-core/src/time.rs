//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  A simulated day is a
//! fixed number of ticks; the engine only ever cares about the current date
//! (`tick / TICKS_PER_DAY`) and the position inside the day
//! (`tick % TICKS_PER_DAY`).  Using an integer tick as the canonical unit
//! keeps all schedule arithmetic exact and comparisons O(1).
//!
//! Two fixed offsets inside each day matter to the engine: component jobs
//! are spawned at [`SPAWN_TICK`] and joined at [`JOIN_TICK`].  The join
//! offset deliberately precedes the spawn offset so that a cargo's previous
//! job is always merged back before its next component is started.

use std::fmt;

/// Ticks per simulated day.
pub const TICKS_PER_DAY: u32 = 74;

/// Day offset at which due link graph components are spawned.
pub const SPAWN_TICK: u32 = 58;

/// Day offset at which finished link graph jobs are joined.
pub const JOIN_TICK: u32 = 21;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// The simulated date this tick falls on.
    #[inline]
    pub fn date(self) -> Date {
        Date((self.0 / TICKS_PER_DAY as u64) as u32)
    }

    /// Position of this tick inside its day, `0..TICKS_PER_DAY`.
    #[inline]
    pub fn day_fract(self) -> u32 {
        (self.0 % TICKS_PER_DAY as u64) as u32
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── Date ─────────────────────────────────────────────────────────────────────

/// A simulated date, counted in whole days from the start of the run.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Date(pub u32);

impl Date {
    /// The first tick of this date.
    #[inline]
    pub fn first_tick(self) -> Tick {
        Tick(self.0 as u64 * TICKS_PER_DAY as u64)
    }

    /// The tick at the given offset inside this date.
    #[inline]
    pub fn at(self, day_fract: u32) -> Tick {
        debug_assert!(day_fract < TICKS_PER_DAY);
        Tick(self.0 as u64 * TICKS_PER_DAY as u64 + day_fract as u64)
    }
}

impl std::ops::Add<u32> for Date {
    type Output = Date;
    #[inline]
    fn add(self, rhs: u32) -> Date {
        Date(self.0 + rhs)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day {}", self.0)
    }
}
