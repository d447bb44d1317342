//! `lf-graph` — link graph components.
//!
//! A *component* is one connected subgraph of stations, for one cargo,
//! materialised with dense node indices and a full n×n edge matrix.  It is
//! the unit of work of the distribution engine: the registry discovers one,
//! a job runs the handler pipeline over it, and its results are published
//! back to the stations at join.
//!
//! # Crate layout
//!
//! | Module        | Contents                                             |
//! |---------------|------------------------------------------------------|
//! | [`component`] | `Node`, `Edge`, `PathRecord`, `Component`            |
//! | [`builder`]   | `ComponentBuilder`, [`build_component`] BFS discovery |

pub mod builder;
pub mod component;


pub use builder::{ComponentBuilder, build_component};
pub use component::{Component, Edge, FlowMap, Node, PathRecord};
