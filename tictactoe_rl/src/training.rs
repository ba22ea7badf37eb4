use crate::agent::{QLearningAgent, AGENT_MARK};
use crate::board::{BoardState, Outcome};
use crate::config::TrainingConfig;
use crate::error::Result;
use crate::players::{Mark, Player, RandomPlayer};
use tracing::{debug, info};

/// Tally of a training run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub agent_wins: usize,
    pub opponent_wins: usize,
    pub draws: usize,
}

/// Pre-trains an agent against a uniformly random opponent.
///
/// The agent opens every episode. The opponent never looks at the table.
#[derive(Debug)]
pub struct Trainer {
    config: TrainingConfig,
    opponent: RandomPlayer,
}

impl TrainingSummary {
    fn record(&mut self, outcome: Outcome) {
        self.episodes += 1;
        match outcome {
            Outcome::Winner(mark) if mark == AGENT_MARK => self.agent_wins += 1,
            Outcome::Winner(_) => self.opponent_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        let opponent_mark = AGENT_MARK.other();
        let opponent = match config.seed {
            Some(seed) => RandomPlayer::with_seed(opponent_mark, seed),
            None => RandomPlayer::new(opponent_mark),
        };
        Ok(Trainer { config, opponent })
    }

    /// Runs every configured episode to completion.
    pub fn run(&mut self, agent: &mut QLearningAgent) -> Result<TrainingSummary> {
        let num_episodes = self.config.num_episodes;
        let mut summary = TrainingSummary::default();
        for episode in 0..num_episodes {
            if (episode + 1) % self.config.log_every == 0 {
                info!(episode = episode + 1, num_episodes, "training episode");
            }
            let outcome = self.play_episode(agent)?;
            summary.record(outcome);
        }
        info!(
            num_episodes,
            agent_wins = summary.agent_wins,
            opponent_wins = summary.opponent_wins,
            draws = summary.draws,
            states = agent.q_table().len(),
            "finished training"
        );
        Ok(summary)
    }

    /// One game from the empty board. Terminal rewards are reported to the
    /// agent without the move that produced them.
    pub fn play_episode(&mut self, agent: &mut QLearningAgent) -> Result<Outcome> {
        let mut state = BoardState::new();
        loop {
            let (_, next_state) = agent.play(&state)?;
            state = next_state;
            if let Some(outcome) = report_outcome(agent, &state, AGENT_MARK)? {
                return Ok(outcome);
            }
            let (_, next_state) = self.opponent.play(&state)?;
            state = next_state;
            if let Some(outcome) = report_outcome(agent, &state, self.opponent.mark())? {
                return Ok(outcome);
            }
        }
    }
}

fn report_outcome(
    agent: &mut QLearningAgent,
    state: &BoardState,
    mover: Mark,
) -> Result<Option<Outcome>> {
    let Some(outcome) = state.outcome(mover) else {
        return Ok(None);
    };
    debug!(%state, ?outcome, "episode over");
    agent.update_q_value(state, None, outcome.reward_for(AGENT_MARK))?;
    Ok(Some(outcome))
}
