//! Tabular Q-learning agent.
//!
//! The agent always plays the second mark. Values live in a [`QTable`] that
//! the agent owns for its whole lifetime; it can be injected at construction
//! and taken back with [`QLearningAgent::into_table`].

use crate::board::{Action, BoardState};
use crate::config::AgentConfig;
use crate::error::{Error, Result};
use crate::players::{Mark, Player};
use crate::q_table::QTable;
use rand::prelude::SliceRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

pub const AGENT_MARK: Mark = Mark::Nought;

#[derive(Debug)]
pub struct QLearningAgent {
    q_table: QTable,
    config: AgentConfig,
    rng: StdRng,
}

impl QLearningAgent {
    pub fn new(config: AgentConfig) -> Result<Self> {
        Self::with_table(config, QTable::new())
    }

    pub fn with_table(config: AgentConfig, q_table: QTable) -> Result<Self> {
        config.validate()?;
        Ok(QLearningAgent {
            q_table,
            config,
            rng: StdRng::from_entropy(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn into_table(self) -> QTable {
        self.q_table
    }

    pub fn q_value(&self, state: &BoardState, action: Action) -> Option<f32> {
        self.q_table.value(&state.key(), action)
    }

    /// ε-greedy move selection.
    ///
    /// The first visit to a state seeds its entry with zeros and picks
    /// uniformly at random, whatever ε is.
    pub fn choose_move(&mut self, state: &BoardState, available_moves: &[Action]) -> Result<Action> {
        if available_moves.is_empty() {
            return Err(Error::NoMovesAvailable);
        }
        let key = state.key();
        if self.q_table.init_state(key, available_moves.to_vec()) {
            debug!(state = %key, "first visit, choosing at random");
            return self.random_move(available_moves);
        }
        if self.rng.gen::<f32>() < self.config.exploration_rate {
            debug!(state = %key, "exploring");
            return self.random_move(available_moves);
        }
        match self.q_table[&key].select_max_move(available_moves) {
            Some(mv) => {
                debug!(state = %key, ?mv, "exploiting");
                Ok(mv)
            }
            None => {
                warn!(state = %key, "no stored value for any available move");
                self.random_move(available_moves)
            }
        }
    }

    /// Q(s,a) ← (1-α)·Q(s,a) + α·(r + γ·max Q(s',·))
    ///
    /// An unseen `state` is only initialized. With `action == None` nothing
    /// beyond initialization happens. The successor is built by placing the
    /// agent's mark on `action`.
    pub fn update_q_value(
        &mut self,
        state: &BoardState,
        action: Option<Action>,
        reward: f32,
    ) -> Result<()> {
        let key = state.key();
        if self.q_table.init_state(key, state.available_moves()) {
            return Ok(());
        }
        let Some(action) = action else {
            return Ok(());
        };
        let next_state = state.apply_move(action, AGENT_MARK)?;
        let max_next_q = self
            .q_table
            .max_value(&next_state.key(), &next_state.available_moves());
        let AgentConfig {
            learning_rate,
            discount_factor,
            ..
        } = self.config;
        let value = self.q_table.value_mut(key, action);
        *value = (1.0 - learning_rate) * *value
            + learning_rate * (reward + discount_factor * max_next_q);
        debug!(state = %key, ?action, reward, value = *value, "updated move value");
        Ok(())
    }

    fn random_move(&mut self, available_moves: &[Action]) -> Result<Action> {
        available_moves
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::NoMovesAvailable)
    }
}

impl Player for QLearningAgent {
    fn mark(&self) -> Mark {
        AGENT_MARK
    }
    fn choose_move(&mut self, state: &BoardState) -> Result<Action> {
        let available_moves = state.available_moves();
        QLearningAgent::choose_move(self, state, &available_moves)
    }
}
