//! Engine lifecycle observer.

use lf_core::{CargoId, ComponentId, Date};

/// Callbacks invoked by the engine at job lifecycle boundaries.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait EngineObserver {
    /// A component was discovered and its job started.
    fn on_spawn(&mut self, _cargo: CargoId, _date: Date, _component: ComponentId, _size: usize) {}

    /// A job finished and its results were published.
    fn on_join(&mut self, _cargo: CargoId, _date: Date, _component: ComponentId) {}
}

/// An [`EngineObserver`] that does nothing.
pub struct NoopObserver;

impl EngineObserver for NoopObserver {}
