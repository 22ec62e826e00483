use std::path::Path;

use log::{debug, info, trace, warn};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use strum::VariantArray;

use crate::{
    assert_interval,
    decay::{self, Decay},
    error::{Error, Result},
    exploration::{Choice, EpsilonGreedy},
    grid::{CellType, Grid},
    gym::Gridworld,
    memory::Exp,
    persistence,
    space::{Action, Coord},
};

use super::table::QTable;

/// Whether the agent learns from its moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Explore with epsilon greedy and update the table after every step
    #[default]
    Train,
    /// Follow the greedy policy and leave the table untouched
    Test,
}

/// Configuration for the [`QTableAgent`]
#[derive(Debug, Clone)]
pub struct QTableAgentConfig<D: Decay = decay::Constant> {
    /// **Default**: constant epsilon of `0.01`
    pub exploration: EpsilonGreedy<D>,
    /// Learning rate
    ///
    /// **Default**: `0.1`
    pub alpha: f64,
    /// Discount factor
    ///
    /// **Default**: `0.9`
    pub gamma: f64,
    /// **Default**: [`Mode::Train`]
    pub mode: Mode,
    /// Give up on an episode after this many steps
    ///
    /// **Default**: `None`
    pub max_steps: Option<u32>,
    /// Seed for action tie-breaking and exploration, drawn from the OS when absent
    ///
    /// **Default**: `None`
    pub seed: Option<u64>,
}

impl Default for QTableAgentConfig {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::constant(0.01),
            alpha: 0.1,
            gamma: 0.9,
            mode: Mode::Train,
            max_steps: None,
            seed: None,
        }
    }
}

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The agent stood on a goal of the given kind
    Goal(CellType),
    /// The step cap was hit first
    Truncated,
}

/// Summary of one episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Episode {
    pub steps: u32,
    /// Sum of the rewards learned from, zero in test mode
    pub reward: f64,
    pub outcome: Outcome,
}

/// Read-only view of the learning state for renderers
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    pub agent: Coord,
    pub q_table: &'a QTable,
    pub steps: u32,
    pub epoch: u32,
}

/// A Q-learning agent with a dense Q-table over a [`Gridworld`]
pub struct QTableAgent<D: Decay = decay::Constant> {
    q_table: QTable,
    exploration: EpsilonGreedy<D>,
    alpha: f64,   // learning rate
    gamma: f64,   // discount factor
    mode: Mode,
    max_steps: Option<u32>,
    rng: StdRng,
    episode: u32, // completed training episodes
}

impl<D: Decay> QTableAgent<D> {
    /// Initialize a new agent with a zeroed table sized to `env`
    ///
    /// **Panics** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new(env: &Gridworld, config: QTableAgentConfig<D>) -> Self {
        assert_interval!(config.alpha, 0.0, 1.0);
        assert_interval!(config.gamma, 0.0, 1.0);
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            q_table: QTable::new(env.grid().width(), env.grid().height()),
            exploration: config.exploration,
            alpha: config.alpha,
            gamma: config.gamma,
            mode: config.mode,
            max_steps: config.max_steps,
            rng,
            episode: 0,
        }
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Completed training episodes
    pub fn epoch(&self) -> u32 {
        self.episode
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn snapshot<'a>(&'a self, env: &'a Gridworld) -> Snapshot<'a> {
        Snapshot {
            grid: env.grid(),
            agent: env.agent(),
            q_table: &self.q_table,
            steps: env.steps(),
            epoch: self.episode,
        }
    }

    /// Choose an action from `state` based on the table and, when training, the exploration policy
    pub fn act(&mut self, env: &Gridworld, state: Coord) -> Action {
        let exploration = match self.mode {
            Mode::Train => Some((&self.exploration, self.episode)),
            Mode::Test => None,
        };
        select_action(&self.q_table, env, state, exploration, &mut self.rng)
    }

    /// Apply the temporal difference update for an experience that carries a reward
    pub fn learn(&mut self, experience: &Exp) {
        let &Exp {
            state,
            action,
            next_state,
            reward,
        } = experience;
        let Some(reward) = reward else {
            return;
        };
        self.q_table
            .update(state, action, reward, next_state, self.alpha, self.gamma);
    }

    /// Advance the agent by one move
    ///
    /// In training mode the reward is computed and learned from before the agent moves.
    pub fn step(&mut self, env: &mut Gridworld) -> Exp {
        let state = env.agent();
        let action = self.act(env, state);
        let next_state = env.transition(state, action);
        let reward = match self.mode {
            Mode::Train => Some(env.reward(state, action)),
            Mode::Test => None,
        };

        let experience = Exp {
            state,
            action,
            next_state,
            reward,
        };
        self.learn(&experience);
        env.commit(next_state);

        trace!(
            "{} --{:?}--> {} reward {:?}",
            state,
            action,
            next_state,
            reward
        );
        experience
    }

    /// Run the agent from the start cell until it reaches a goal
    ///
    /// The environment is reset afterwards. Only completed training episodes advance the epoch.
    pub fn go(&mut self, env: &mut Gridworld) -> Episode {
        env.reset();
        let mut reward = 0.0;

        let outcome = loop {
            reward += self.step(env).reward.unwrap_or(0.0);

            let pos = env.agent();
            if env.is_terminal(pos) {
                break Outcome::Goal(env.grid().lookup(pos));
            }
            if self.max_steps.is_some_and(|max| env.steps() >= max) {
                warn!("episode truncated after {} steps", env.steps());
                break Outcome::Truncated;
            }
        };

        let episode = Episode {
            steps: env.steps(),
            reward,
            outcome,
        };
        if self.mode == Mode::Train && outcome != Outcome::Truncated {
            self.episode += 1;
        }
        env.reset();

        debug!(
            "epoch {}: {:?} in {} steps, reward {}",
            self.episode, episode.outcome, episode.steps, episode.reward
        );
        episode
    }

    /// Write the table and epoch counter to `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save(&self.q_table, self.episode, &path)?;
        info!(
            "saved Q-table at epoch {} to {}",
            self.episode,
            path.as_ref().display()
        );
        Ok(())
    }

    /// Replace the table and epoch counter with those stored at `path`
    ///
    /// Nothing is changed if the file cannot be read in full.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let (table, epoch) =
            persistence::load(&path, self.q_table.width(), self.q_table.height())?;
        self.q_table.overwrite(table).map_err(|table| Error::Shape {
            expected: self.q_table.width() * self.q_table.height(),
            found: table.width() * table.height(),
        })?;
        self.episode = epoch;
        info!(
            "loaded Q-table at epoch {} from {}",
            epoch,
            path.as_ref().display()
        );
        Ok(())
    }
}

/// Epsilon greedy action selection with random tie-breaking
///
/// The greedy choice is drawn uniformly among the actions that attain the maximum value at
/// `state` and stay on the grid. With `exploration` set, the policy may instead draw uniformly
/// among all actions that stay on the grid. The table is never modified.
pub fn select_action<D, R>(
    table: &QTable,
    env: &Gridworld,
    state: Coord,
    exploration: Option<(&EpsilonGreedy<D>, u32)>,
    rng: &mut R,
) -> Action
where
    D: Decay,
    R: Rng + ?Sized,
{
    let valid = env.valid_actions(state);
    let greedy = select_greedy(table, state, &valid, rng);

    match exploration.map(|(policy, t)| policy.choose(rng, t)) {
        Some(Choice::Explore) => valid.choose(rng).copied().unwrap_or(greedy),
        Some(Choice::Exploit) | None => greedy,
    }
}

fn select_greedy<R: Rng + ?Sized>(
    table: &QTable,
    state: Coord,
    valid: &[Action],
    rng: &mut R,
) -> Action {
    let value = |a: Action| table.get(state, a).unwrap_or(0.0);
    let max = table.max_value(state);

    let ties: Vec<Action> = valid.iter().copied().filter(|&a| value(a) == max).collect();
    if let Some(&action) = ties.choose(rng) {
        return action;
    }

    // the maximum is only attained off the grid, take the best move that stays on it
    let pool = if valid.is_empty() {
        Action::VARIANTS
    } else {
        valid
    };
    pool.iter()
        .copied()
        .max_by(|&a, &b| value(a).total_cmp(&value(b)))
        .expect("action set is not empty")
}
