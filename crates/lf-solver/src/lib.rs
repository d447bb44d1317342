//! `lf-solver` — the handler pipeline that turns a freshly built component
//! into per-node flow tables.
//!
//! A job runs the handlers strictly in sequence:
//!
//! ```text
//! Init → Demand → MCF pass 1 → FlowMapper → MCF pass 2 → FlowMapper
//! ```
//!
//! - **Init** resets the per-job annotations on nodes and edges.
//! - **Demand** distributes each node's supply over the other nodes as
//!   per-edge demand, shaped by the component's distribution settings.
//! - **MCF pass 1** converts demand into edge flows along shortest paths,
//!   respecting (attenuated) capacities, with a cycle elimination sweep
//!   between rounds.
//! - **FlowMapper** folds the solver's path records into per-node
//!   `(source, via)` flow tables.
//! - **MCF pass 2** absorbs residual demand into the channels pass 1
//!   opened, ranking paths by free-capacity ratio and permitting overload.
//!
//! Handlers are stateless across jobs; two jobs may run concurrently on
//! different components.

pub mod demand;
pub mod flowmap;
pub mod handler;
pub mod init;
pub mod mcf;

mod path;

#[cfg(test)]
mod tests;

pub use handler::{ComponentHandler, run_pipeline, standard_pipeline};
