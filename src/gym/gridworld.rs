use log::info;
use strum::VariantArray;

use crate::{
    error::{Error, Result},
    grid::{CellType, Grid, Layout},
    space::{step_dir, Action, Coord},
};

/// Reward given for moving onto an empty cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shaping {
    /// Empty cells are worth nothing, only goals and walls carry reward
    #[default]
    Sparse,
    /// Empty cells reward the normalized decrease in distance to each goal,
    /// weighted by that goal's reward
    Euclidean,
}

/// Configuration for the [`Gridworld`]
#[derive(Debug, Clone, Copy, Default)]
pub struct GridworldConfig {
    /// Enable the one-way teleporter from the entry marker to the exit marker
    ///
    /// **Default**: `false`
    pub teleporter: bool,
    /// **Default**: [`Shaping::Sparse`]
    pub shaping: Shaping,
}

/// A small grid with two goals, walls and an optional teleporter
///
/// Holds the episode state: the agent position, the fixed start and the number of steps
/// taken since the last goal.
#[derive(Debug, Clone)]
pub struct Gridworld {
    grid: Grid,
    start: Coord,
    agent: Coord,
    goal_1: Coord,
    goal_2: Coord,
    warp: Option<(Coord, Coord)>,
    shaping: Shaping,
    steps: u32,
}

impl Gridworld {
    /// Build the world described by `layout`
    ///
    /// Fails if either goal is missing or duplicated, or if the teleporter is enabled
    /// without both of its endpoints.
    pub fn new(layout: &Layout, config: GridworldConfig) -> Result<Self> {
        let grid = layout.build(config.teleporter)?;
        let goal_1 = unique_cell(&grid, CellType::Goal1)?;
        let goal_2 = unique_cell(&grid, CellType::Goal2)?;
        let start = layout.start();

        info!(
            "built {}x{} gridworld: start {}, goals {} and {}, teleporter {}, shaping {:?}",
            grid.width(),
            grid.height(),
            start,
            goal_1,
            goal_2,
            config.teleporter,
            config.shaping,
        );

        Ok(Self {
            warp: grid.teleporters(),
            grid,
            start,
            agent: start,
            goal_1,
            goal_2,
            shaping: config.shaping,
            steps: 0,
        })
    }

    /// The 6x6 reference world
    pub fn reference(config: GridworldConfig) -> Result<Self> {
        Self::new(&Layout::reference(), config)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    /// Current agent position
    pub fn agent(&self) -> Coord {
        self.agent
    }

    /// Steps taken since the last reset
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Where `action` leads from `state`, following the teleporter if it is enabled
    ///
    /// The result may lie on a wall or outside the grid.
    pub fn transition(&self, state: Coord, action: Action) -> Coord {
        let next = step_dir(state, action);
        match self.warp {
            Some((entry, exit)) if next == entry => exit,
            _ => next,
        }
    }

    /// Whether `action` keeps the agent on the grid
    pub fn is_valid(&self, state: Coord, action: Action) -> bool {
        self.grid.contains(self.transition(state, action))
    }

    /// Actions from `state` that stay on the grid, in column order
    pub fn valid_actions(&self, state: Coord) -> Vec<Action> {
        Action::VARIANTS
            .iter()
            .copied()
            .filter(|&a| self.is_valid(state, a))
            .collect()
    }

    /// Reward for taking `action` from `state`
    ///
    /// Determined by the cell the move lands on before any teleport.
    pub fn reward(&self, state: Coord, action: Action) -> f64 {
        match self.grid.lookup(step_dir(state, action)) {
            CellType::Empty => match self.shaping {
                Shaping::Sparse => CellType::Empty.reward(),
                Shaping::Euclidean => self.shaping_reward(state, self.transition(state, action)),
            },
            kind => kind.reward(),
        }
    }

    fn shaping_reward(&self, state: Coord, next: Coord) -> f64 {
        let diagonal = self.grid.diagonal();
        [
            (self.goal_1, CellType::Goal1.reward()),
            (self.goal_2, CellType::Goal2.reward()),
        ]
        .into_iter()
        .map(|(goal, weight)| (state.distance(goal) - next.distance(goal)) / diagonal * weight)
        .sum()
    }

    /// Whether standing on `pos` ends the episode
    pub fn is_terminal(&self, pos: Coord) -> bool {
        self.grid.lookup(pos).is_goal()
    }

    /// Move the agent to `next_state` unless it is a wall or off the grid, and count the step
    ///
    /// **Returns** `true` if the agent reached a goal
    pub fn commit(&mut self, next_state: Coord) -> bool {
        if !self.grid.lookup(next_state).is_blocking() {
            self.agent = next_state;
        }
        self.steps += 1;
        self.is_terminal(self.agent)
    }

    /// Put the agent back on the start cell and clear the step counter
    ///
    /// **Returns** the start position
    pub fn reset(&mut self) -> Coord {
        self.agent = self.start;
        self.steps = 0;
        self.agent
    }
}

fn unique_cell(grid: &Grid, kind: CellType) -> Result<Coord> {
    let pos = grid.find(kind).ok_or(Error::MissingCell(kind))?;
    if grid.count(kind) > 1 {
        return Err(Error::DuplicateCell(kind));
    }
    Ok(pos)
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    fn world(teleporter: bool, shaping: Shaping) -> Gridworld {
        Gridworld::reference(GridworldConfig {
            teleporter,
            shaping,
        })
        .unwrap()
    }

    #[test]
    fn missing_goal_is_fatal() {
        let layout = Layout::parse("S . G\n. . .").unwrap();
        let err = Gridworld::new(&layout, GridworldConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MissingCell(CellType::Goal2)), "{err}");
        assert_eq!(layout.build(false).unwrap().find(CellType::Goal2), None);
    }

    #[test]
    fn duplicate_goal_is_fatal() {
        let layout = Layout::parse("S G g G").unwrap();
        let err = Gridworld::new(&layout, GridworldConfig::default()).unwrap_err();
        assert!(matches!(err, Error::DuplicateCell(CellType::Goal1)), "{err}");
    }

    #[test]
    fn transition_is_pure() {
        let env = world(true, Shaping::Euclidean);
        for pos in env.grid().coords() {
            for action in Action::iter() {
                assert_eq!(env.transition(pos, action), env.transition(pos, action));
                assert_eq!(env.reward(pos, action), env.reward(pos, action));
            }
        }
    }

    #[test]
    fn teleporter_warps_to_exit() {
        let env = world(true, Shaping::Sparse);
        // entry at (3, 4) sits under a wall, reachable from below and from the right
        assert_eq!(env.transition(Coord::new(3, 5), Action::Up), Coord::new(4, 1));
        assert_eq!(env.transition(Coord::new(4, 4), Action::Left), Coord::new(4, 1));
        assert_eq!(env.reward(Coord::new(3, 5), Action::Up), 0.0);
    }

    #[test]
    fn teleporter_entry_earns_no_shaping() {
        let env = world(true, Shaping::Euclidean);
        assert_eq!(env.transition(Coord::new(3, 5), Action::Up), Coord::new(4, 1));
        assert_eq!(env.reward(Coord::new(3, 5), Action::Up), 0.0, "warp is not an approach");
        assert_ne!(env.reward(Coord::new(4, 5), Action::Left), 0.0, "empty cells are shaped");
    }

    #[test]
    fn teleporter_is_one_way() {
        let env = world(true, Shaping::Sparse);
        assert_eq!(env.transition(Coord::new(4, 2), Action::Up), Coord::new(4, 1));
    }

    #[test]
    fn disabled_teleporter_is_empty() {
        let env = world(false, Shaping::Sparse);
        assert_eq!(env.transition(Coord::new(3, 5), Action::Up), Coord::new(3, 4));
    }

    #[test]
    fn cell_rewards() {
        let env = world(false, Shaping::Sparse);
        assert_eq!(env.reward(Coord::new(4, 0), Action::Right), 1000.0, "goal 1");
        assert_eq!(env.reward(Coord::new(1, 1), Action::Left), 50.0, "goal 2");
        assert_eq!(env.reward(Coord::new(3, 2), Action::Down), -10.0, "wall");
        assert_eq!(env.reward(Coord::new(5, 5), Action::Left), 0.0, "empty");
    }

    #[test]
    fn euclidean_shaping_rewards_approach() {
        let env = world(false, Shaping::Euclidean);
        let diagonal = 50f64.sqrt();
        let (from, to) = (Coord::new(5, 5), Coord::new(5, 4));
        let expected = (5.0 - 4.0) / diagonal * 1000.0
            + (Coord::new(0, 1).distance(from) - Coord::new(0, 1).distance(to)) / diagonal * 50.0;
        let reward = env.reward(from, Action::Up);
        assert!((reward - expected).abs() < 1e-9, "{reward} != {expected}");
        assert!(reward > 0.0, "moving toward both goals is rewarded");
        assert!(env.reward(to, Action::Down) < 0.0, "moving away is penalized");
        assert_eq!(env.reward(Coord::new(3, 2), Action::Down), -10.0, "walls unaffected");
    }

    #[test]
    fn walls_and_edges_block_movement() {
        let mut env = world(false, Shaping::Sparse);
        env.agent = Coord::new(3, 2);
        assert!(!env.commit(Coord::new(3, 3)));
        assert_eq!(env.agent(), Coord::new(3, 2), "agent stays in front of the wall");
        assert!(!env.commit(Coord::new(3, -1)));
        assert_eq!(env.agent(), Coord::new(3, 2), "agent stays on the grid");
        assert_eq!(env.steps(), 2, "blocked moves still count as steps");
    }

    #[test]
    fn goals_end_the_episode() {
        let mut env = world(false, Shaping::Sparse);
        env.agent = Coord::new(5, 1);
        assert!(env.commit(Coord::new(5, 0)));
        assert_eq!(env.reset(), Coord::new(5, 5));
        assert_eq!(env.steps(), 0);
    }

    #[test]
    fn valid_actions_mask_edges() {
        let env = world(false, Shaping::Sparse);
        assert_eq!(env.valid_actions(Coord::new(0, 0)), [Action::Down, Action::Right]);
        assert_eq!(env.valid_actions(Coord::new(5, 5)), [Action::Up, Action::Left]);
        assert_eq!(env.valid_actions(Coord::new(2, 2)).len(), 4);
    }
}
