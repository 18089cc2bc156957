use thiserror::Error;

use crate::infra::Position;

/// Failures of a single planning invocation. None of these are retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WumpusError {
    #[error("Malformed percept: {0}")]
    MalformedPercept(String),

    #[error("Malformed map: {0}")]
    MalformedMap(String),

    #[error("Unknown cell glyph {0:?}")]
    UnknownGlyph(String),

    #[error("Unknown action {0:?}")]
    UnknownAction(String),

    #[error("No feasible start position: {0}")]
    DegenerateBelief(String),

    #[error("Position {position} is outside the {rows}x{cols} map")]
    OutOfBounds {
        position: Position,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid time budget {0}")]
    InvalidTimeBudget(f64),

    #[error("Plan length {length} exceeds the limit of {limit}")]
    PlanSpaceTooLarge { length: usize, limit: usize },
}

pub type WumpusResult<T> = Result<T, WumpusError>;
