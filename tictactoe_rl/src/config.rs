use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub const NUM_EPISODES: usize = 10_000_usize;
pub const LOG_EVERY: usize = 1_000_usize;

pub const REWARD_WIN: f32 = 1.0;
pub const REWARD_LOSS: f32 = -1.0;
pub const REWARD_DRAW: f32 = 0.0;

/// Q-learning hyperparameters. Fixed for the lifetime of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// α
    pub learning_rate: f32,
    /// γ
    pub discount_factor: f32,
    /// ε, the chance of ignoring the table on a known state.
    pub exploration_rate: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub num_episodes: usize,
    /// Emit a progress event every this many episodes.
    pub log_every: usize,
    /// Seed for the random opponent. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            learning_rate: 0.5,
            discount_factor: 0.9,
            exploration_rate: 0.1,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("learning_rate", self.learning_rate),
            ("discount_factor", self.discount_factor),
            ("exploration_rate", self.exploration_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            num_episodes: NUM_EPISODES,
            log_every: LOG_EVERY,
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_episodes == 0 {
            return Err(Error::InvalidConfig("num_episodes must be > 0".into()));
        }
        if self.log_every == 0 {
            return Err(Error::InvalidConfig("log_every must be > 0".into()));
        }
        Ok(())
    }
}
