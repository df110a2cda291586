//! Error type shared by the rewriting engine and the turtle interpreter.

use crate::symbol::Symbol;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while configuring or running a generation pass.
#[derive(Debug, Error)]
pub enum Error {
    /// A Draw action was built without a mesh source bound to it.
    #[error("draw action requires a mesh source")]
    MissingMeshSource,

    /// A Restore was dispatched while only the initial frame was on the stack.
    #[error("stack underflow: restore `{symbol}` at index {index} has no matching save")]
    StackUnderflow { index: usize, symbol: Symbol },

    /// Bounded rewriting would produce more symbols than the configured ceiling.
    #[error("generation {iteration} would produce {length} symbols (limit {limit})")]
    GrowthLimitExceeded {
        iteration: usize,
        length: usize,
        limit: usize,
    },

    /// A Draw binding referenced a shape the registry never issued.
    #[error("unknown shape id {0}")]
    UnknownShape(u32),

    /// A string meant to hold exactly one symbol did not.
    #[error("expected exactly one symbol character, got {0:?}")]
    InvalidSymbolString(String),

    /// A custom action rejected the current interpreter state.
    #[error("custom action `{name}` failed: {message}")]
    CustomAction { name: String, message: String },
}
