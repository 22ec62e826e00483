use std::{error::Error, path::PathBuf, time::Instant};

use clap::Parser;
use gridq::{
    algo::tabular::{Mode, Outcome, QTableAgent, QTableAgentConfig},
    exploration::EpsilonGreedy,
    grid::{CellType, Grid},
    gym::{Gridworld, GridworldConfig, Shaping},
};
use log::{error, info, LevelFilter};

#[derive(Parser, Debug)]
#[command(version, about = "Train or test a Q-learning agent on the reference gridworld")]
struct Args {
    /// Number of epochs to run, negative for no limit
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    epochs: i64,
    /// Exploration rate
    #[arg(long, default_value_t = 0.01)]
    epsilon: f32,
    /// Learning rate
    #[arg(long, default_value_t = 0.1)]
    alpha: f64,
    /// Discount factor
    #[arg(long, default_value_t = 0.9)]
    gamma: f64,
    /// Reward empty cells by the distance gained toward the goals
    #[arg(long)]
    euclidean: bool,
    /// Enable the teleporter
    #[arg(long)]
    teleporter: bool,
    /// Follow the learned policy without updating it
    #[arg(long)]
    test: bool,
    /// Abandon an episode after this many steps
    #[arg(long)]
    max_steps: Option<u32>,
    /// Load a saved Q-table before running
    #[arg(long, value_name = "FILE")]
    load: Option<PathBuf>,
    /// Save the Q-table when done
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,
    /// Write steps per epoch to a CSV file
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,
    /// Seed for the agent's random choices
    #[arg(long)]
    seed: Option<u64>,
    /// Only log warnings and errors
    #[arg(long)]
    quiet: bool,
}

/// Whether another episode fits the epoch budget
///
/// Training stops on the agent's epoch counter, which a loaded table carries over. Test runs
/// never advance that counter, so they are counted by the caller.
fn within_budget(epochs: i64, mode: Mode, epoch: u32, runs: i64) -> bool {
    let done = match mode {
        Mode::Train => i64::from(epoch),
        Mode::Test => runs,
    };
    epochs < 0 || done < epochs
}

fn render(grid: &Grid) -> String {
    grid.rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    CellType::Empty => ".",
                    CellType::Wall => "#",
                    CellType::Goal1 => "G",
                    CellType::Goal2 => "g",
                    CellType::Teleporter1 => "T",
                    CellType::Teleporter2 => "t",
                    CellType::OutOfBounds => "?",
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let level = if args.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .init();
    info!("{args:?}");

    let mut env = Gridworld::reference(GridworldConfig {
        teleporter: args.teleporter,
        shaping: if args.euclidean {
            Shaping::Euclidean
        } else {
            Shaping::Sparse
        },
    })?;
    info!("layout:\n{}", render(env.grid()));

    let mode = if args.test { Mode::Test } else { Mode::Train };
    let mut agent = QTableAgent::new(
        &env,
        QTableAgentConfig {
            exploration: EpsilonGreedy::constant(args.epsilon),
            alpha: args.alpha,
            gamma: args.gamma,
            mode,
            max_steps: args.max_steps,
            seed: args.seed,
        },
    );

    if let Some(path) = &args.load {
        match agent.load(path) {
            Ok(()) => info!("resuming at epoch {}", agent.epoch()),
            Err(e) => error!("failed to load Q-table, starting from zero: {e}"),
        }
    }

    let mut wtr = args.csv.as_ref().map(csv::Writer::from_path).transpose()?;
    if let Some(wtr) = wtr.as_mut() {
        wtr.write_record(["run", "steps", "reward"])?;
    }

    let mut runs = 0;
    while within_budget(args.epochs, mode, agent.epoch(), runs) {
        let start = Instant::now();
        let episode = agent.go(&mut env);
        runs += 1;

        let label = match episode.outcome {
            Outcome::Goal(goal) => goal.to_string(),
            Outcome::Truncated => String::from("truncated"),
        };
        match mode {
            Mode::Test => info!("{} steps\t{label}", episode.steps),
            Mode::Train => info!(
                "Epoch {}/{}\t{} steps\t{} ms\t{label}",
                agent.epoch(),
                args.epochs,
                episode.steps,
                start.elapsed().as_millis()
            ),
        }

        if let Some(wtr) = wtr.as_mut() {
            wtr.write_record(&[
                runs.to_string(),
                episode.steps.to_string(),
                episode.reward.to_string(),
            ])?;
        }
    }

    if let Some(mut wtr) = wtr {
        wtr.flush()?;
    }

    if let Some(path) = &args.save {
        if let Err(e) = agent.save(path) {
            error!("failed to save Q-table: {e}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn training_budget_follows_loaded_epoch() {
        assert!(within_budget(3, Mode::Train, 0, 0));
        assert!(within_budget(3, Mode::Train, 2, 0));
        assert!(!within_budget(3, Mode::Train, 3, 0), "loaded epoch 3 runs nothing");
        assert!(!within_budget(3, Mode::Train, 5, 0));
    }

    #[test]
    fn test_budget_counts_runs() {
        assert!(within_budget(2, Mode::Test, 40, 1), "epoch ignored in test mode");
        assert!(!within_budget(2, Mode::Test, 0, 2));
    }

    #[test]
    fn negative_budget_is_unbounded() {
        assert!(within_budget(-1, Mode::Train, u32::MAX, 0));
        assert!(within_budget(-1, Mode::Test, 0, i64::MAX));
    }

    #[test]
    fn renders_reference_layout() {
        let env = Gridworld::reference(GridworldConfig {
            teleporter: true,
            ..Default::default()
        })
        .unwrap();
        let text = render(env.grid());
        assert_eq!(text.lines().next(), Some(". . . . . G"));
        assert_eq!(text.lines().nth(4), Some(". . # T . ."));
    }
}
