use crate::space::{Action, Coord};

/// Represents a single experience or transition in the environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exp {
    /// The state of the agent before taking the action
    pub state: Coord,
    /// The action taken in the given state
    pub action: Action,
    /// The cell the action led to, after any teleport
    ///
    /// For a blocked move this is the wall or off-grid cell itself, the agent stays at `state`.
    pub next_state: Coord,
    /// The reward received after taking the action, `None` when nothing was learned
    pub reward: Option<f64>,
}
