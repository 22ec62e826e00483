pub mod q_table;
pub mod table;

pub use q_table::{select_action, Episode, Mode, Outcome, QTableAgent, QTableAgentConfig, Snapshot};
pub use table::QTable;
