use tracing::info;

pub mod agent;
pub mod board;
pub mod config;
pub mod controller;
pub mod error;
pub mod players;
pub mod q_table;
pub mod training;
pub mod ui;

pub use agent::QLearningAgent;
pub use board::{Action, BoardState, Outcome};
pub use config::{AgentConfig, TrainingConfig};
pub use controller::{GameController, Phase};
pub use error::{Error, Result};
pub use players::Mark;
pub use q_table::QTable;
pub use training::{Trainer, TrainingSummary};

/// Builds an agent and trains it against the random opponent.
///
/// A training seed makes the whole run reproducible: it seeds the agent as
/// well as the opponent.
pub fn train_agent(
    agent_config: AgentConfig,
    training_config: TrainingConfig,
) -> Result<(QLearningAgent, TrainingSummary)> {
    let mut agent = QLearningAgent::new(agent_config)?;
    if let Some(seed) = training_config.seed {
        agent = agent.with_seed(seed);
    }
    info!(?agent_config, num_episodes = training_config.num_episodes, "training agent");
    let summary = Trainer::new(training_config)?.run(&mut agent)?;
    Ok((agent, summary))
}
