//! Path annotations for the modified Dijkstra.
//!
//! One [`PathAnno`] per node lives in an arena (`Vec<PathAnno>`) allocated
//! per Dijkstra call; parent links are indices into that arena, so the
//! whole tree is dropped wholesale when the call's flow has been folded
//! into path records.
//!
//! Two [`AnnotationPolicy`] implementations decide what "better" means:
//! [`DistancePolicy`] (pass 1) prefers short paths with free capacity,
//! [`CapacityPolicy`] (pass 2) prefers a large free-capacity ratio.  The
//! ratio is a fixed-point value shifted left by 4 bits so equal inputs
//! compare identically across platforms.

use std::cmp::Reverse;

use lf_core::NodeId;

// ── PathAnno ─────────────────────────────────────────────────────────────────

/// One node's annotation inside a single Dijkstra call.
#[derive(Clone, Debug)]
pub(crate) struct PathAnno {
    /// The node this annotation belongs to.
    pub node: NodeId,
    /// Source node of the path tree; `INVALID` until the node is reached.
    pub origin: NodeId,
    /// Arena index of the predecessor annotation.
    pub parent: Option<u32>,
    /// Path distance from the source; `u32::MAX` while unreached.
    pub distance: u32,
    /// Minimum (adjusted) capacity over the path; `i64::MIN` while
    /// unreached, `i64::MAX` at the source.
    pub capacity: i64,
    /// Minimum free capacity over the path; may go negative on overloaded
    /// edges in pass 2.
    pub free_capacity: i64,
    /// Flow the current solver pass has assigned along this path.
    pub flow: u32,
}

impl PathAnno {
    pub fn new(node: NodeId, source: bool) -> Self {
        Self {
            node,
            origin: if source { node } else { NodeId::INVALID },
            parent: None,
            distance: if source { 0 } else { u32::MAX },
            capacity: if source { i64::MAX } else { i64::MIN },
            free_capacity: if source { i64::MAX } else { i64::MIN },
            flow: 0,
        }
    }

    /// Whether any path has reached this node yet.
    #[inline]
    pub fn reachable(&self) -> bool {
        self.free_capacity > i64::MIN
    }

    /// Fixed-point free-capacity ratio of this path.
    #[inline]
    pub fn capacity_ratio(&self) -> i64 {
        capacity_ratio(self.free_capacity, self.capacity)
    }
}

/// `(free << 4) / (cap + 1)` with the unreached and source sentinels mapped
/// to the extremes, so the source is never displaced and unreached nodes
/// always are.
pub(crate) fn capacity_ratio(free: i64, cap: i64) -> i64 {
    if free == i64::MIN {
        i64::MIN
    } else if cap == i64::MAX {
        i64::MAX
    } else {
        (free << 4) / (cap + 1)
    }
}

/// Re-root `arena[dest]` onto `arena[base]` extended by an edge with the
/// given adjusted capacity, free capacity, and distance.
pub(crate) fn fork(
    arena: &mut [PathAnno],
    dest: usize,
    base: usize,
    capacity: i64,
    free_capacity: i64,
    distance: u32,
) {
    let (base_cap, base_free, base_dist, base_origin) = {
        let b = &arena[base];
        (b.capacity, b.free_capacity, b.distance, b.origin)
    };
    let d = &mut arena[dest];
    d.capacity = base_cap.min(capacity);
    d.free_capacity = base_free.min(free_capacity);
    d.distance = base_dist.saturating_add(distance);
    d.parent = Some(base as u32);
    d.origin = base_origin;
}

// ── Annotation policies ──────────────────────────────────────────────────────

/// Scoring strategy for one Dijkstra variant.
pub(crate) trait AnnotationPolicy {
    /// Frontier sort rank; the node id is appended as the final tie-break.
    type Rank: Ord + Copy;

    fn rank(anno: &PathAnno) -> Self::Rank;

    /// Would extending `base` by an edge `(capacity, free_capacity,
    /// distance)` beat the `current` annotation?
    fn is_better(
        current: &PathAnno,
        base: &PathAnno,
        capacity: i64,
        free_capacity: i64,
        distance: u32,
    ) -> bool;
}

/// Pass 1: plain path distance, smaller is better; a path with free
/// capacity always beats one without.
pub(crate) struct DistancePolicy;

impl AnnotationPolicy for DistancePolicy {
    type Rank = u32;

    fn rank(anno: &PathAnno) -> u32 {
        anno.distance
    }

    fn is_better(
        current: &PathAnno,
        base: &PathAnno,
        _capacity: i64,
        free_capacity: i64,
        distance: u32,
    ) -> bool {
        // An unreached base never wins; an unreached current always loses.
        if base.distance == u32::MAX {
            return false;
        }
        if current.distance == u32::MAX {
            return true;
        }
        let candidate = base.distance.saturating_add(distance);
        if free_capacity > 0 && base.free_capacity > 0 {
            if current.free_capacity > 0 { candidate < current.distance } else { true }
        } else if current.free_capacity > 0 {
            false
        } else {
            candidate < current.distance
        }
    }
}

/// Pass 2: free-capacity ratio, larger is better; equal ratios fall back to
/// path distance.
pub(crate) struct CapacityPolicy;

impl AnnotationPolicy for CapacityPolicy {
    type Rank = (Reverse<i64>, u32);

    fn rank(anno: &PathAnno) -> Self::Rank {
        (Reverse(anno.capacity_ratio()), anno.distance)
    }

    fn is_better(
        current: &PathAnno,
        base: &PathAnno,
        capacity: i64,
        free_capacity: i64,
        distance: u32,
    ) -> bool {
        if base.distance == u32::MAX {
            return false;
        }
        let candidate = capacity_ratio(
            base.free_capacity.min(free_capacity),
            base.capacity.min(capacity),
        );
        let this = current.capacity_ratio();
        if candidate == this {
            base.distance.saturating_add(distance) < current.distance
        } else {
            candidate > this
        }
    }
}
