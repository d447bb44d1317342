//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into dense `Vec`s via `id.0 as usize`, but callers should
//! prefer the `.index()` helpers for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[derive(serde::Serialize, serde::Deserialize)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — the inner type's MAX value.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }
    };
}

typed_id! {
    /// A kind of transportable cargo.  All engine state is partitioned by it.
    pub struct CargoId(u8);
}

typed_id! {
    /// Stable external identifier of a station.  Stations may disappear
    /// between engine runs; the engine tolerates stale `StationId`s.
    pub struct StationId(u16);
}

typed_id! {
    /// Dense index of a node inside one link graph component.
    pub struct NodeId(u32);
}

typed_id! {
    /// Identifier of a link graph component.  The parity of the identifier
    /// encodes the registry generation the component was built in.
    pub struct ComponentId(u16);
}

impl ComponentId {
    /// Generation parity of this component (0 or 1).  Two components belong
    /// to the same cursor generation iff their parities match.
    #[inline]
    pub fn parity(self) -> u16 {
        self.0 % 2
    }
}
