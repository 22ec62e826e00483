use thiserror::Error;

use crate::grid::CellType;

/// Errors produced while building a world or moving a Q-table to and from disk
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("grid has no {0} cell")]
    MissingCell(CellType),

    #[error("grid has more than one {0} cell")]
    DuplicateCell(CellType),

    #[error("invalid layout at row {row}: {message}")]
    Layout { row: usize, message: String },

    #[error("cannot place teleporter at ({x}, {y}): {reason}")]
    Teleporter { x: i32, y: i32, reason: &'static str },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table file at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("table shape mismatch: expected {expected} cells, found {found}")]
    Shape { expected: usize, found: usize },

    #[error("invalid decay schedule: {0}")]
    Decay(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
