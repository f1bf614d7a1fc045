//! Error types for grid edits and search invocations.

use thiserror::Error;

use crate::cell::{CellKind, Position};

/// Errors raised at the grid boundary, before anything reaches the search engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("position {pos} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        pos: Position,
        rows: usize,
        cols: usize,
    },

    #[error("a {rows}x{cols} grid is too large to index")]
    TooLarge { rows: usize, cols: usize },

    #[error("grid text contains no cells")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("unknown cell symbol {symbol:?} at {pos}")]
    UnknownSymbol { symbol: char, pos: Position },

    /// A second start or target was found while parsing.
    #[error("grid text contains more than one {0} cell")]
    DuplicateEndpoint(CellKind),
}

/// Reasons a search refuses to run. An exhausted frontier is not an error; it is reported
/// through [SearchResult::found](crate::SearchResult::found).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("{pos} is classified {found}, expected {expected}")]
    InvalidEndpoint {
        pos: Position,
        expected: CellKind,
        found: CellKind,
    },

    #[error("no {0} cell has been placed")]
    MissingEndpoint(CellKind),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown search algorithm {0:?}")]
pub struct ParseAlgorithmError(pub String);
