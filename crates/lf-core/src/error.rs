//! Engine error type.
//!
//! The engine absorbs almost everything it encounters at run time (stale
//! stations, starved demand, missing capacity); the only error it ever
//! raises to the host is a corrupt save on load.  Sub-crates share this
//! type rather than defining their own — the error surface is small enough
//! that one enum keeps all call sites uniform.

use thiserror::Error;

/// Errors surfaced by the `lf-*` crates.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("corrupt save: {0}")]
    CorruptSave(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `lf-*` crates.
pub type FlowResult<T> = Result<T, FlowError>;
