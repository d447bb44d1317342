//! The handler pipeline.
//!
//! Handlers are a closed variant set, so they are a tagged enum with a
//! small match for dispatch rather than trait objects.

use lf_graph::Component;

use crate::{demand, flowmap, init, mcf};

/// One stage of the job pipeline.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ComponentHandler {
    /// Reset per-job annotations.
    Init,
    /// Assign per-edge demand from supplies and acceptance.
    Demand,
    /// Convert demand into flow along short paths, capacity-bound.
    McfPass1,
    /// Fold path records into per-node flow tables.
    FlowMapper,
    /// Absorb residual demand into existing channels, overload permitted.
    McfPass2,
}

impl ComponentHandler {
    pub fn run(self, component: &mut Component) {
        match self {
            ComponentHandler::Init => init::run(component),
            ComponentHandler::Demand => demand::run(component),
            ComponentHandler::McfPass1 => mcf::run_pass1(component),
            ComponentHandler::FlowMapper => flowmap::run(component),
            ComponentHandler::McfPass2 => mcf::run_pass2(component),
        }
    }
}

/// The standard job pipeline, in execution order.
pub fn standard_pipeline() -> [ComponentHandler; 6] {
    [
        ComponentHandler::Init,
        ComponentHandler::Demand,
        ComponentHandler::McfPass1,
        ComponentHandler::FlowMapper,
        ComponentHandler::McfPass2,
        ComponentHandler::FlowMapper,
    ]
}

/// Run the standard pipeline over a component and hand it back.
///
/// This is the whole of a job's work; the engine moves the component in,
/// possibly on a worker thread, and publishes the result at join.
pub fn run_pipeline(mut component: Component) -> Component {
    for handler in standard_pipeline() {
        handler.run(&mut component);
    }
    component
}
