/// Implemented RL algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Error types
pub mod error;

/// Exploration policies
pub mod exploration;

/// Grid model: cell kinds, grids and text layouts
pub mod grid;

/// Testing environments
pub mod gym;

/// Transition records
pub mod memory;

/// Saving and loading Q-tables as plain text
pub mod persistence;

/// Coordinates and moves
pub mod space;

mod util;

pub use error::{Error, Result};
