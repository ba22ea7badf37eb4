use crate::board::{Action, BoardState};
use crate::error::{Error, Result};
use rand::prelude::SliceRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;

/// The two symbols a player can place. Cross always moves first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Mark {
    Cross,
    Nought,
}

pub trait Player {
    fn mark(&self) -> Mark;
    fn choose_move(&mut self, state: &BoardState) -> Result<Action>;

    /// Chooses a move and returns the board with it applied.
    fn play(&mut self, state: &BoardState) -> Result<(Action, BoardState)> {
        let mv = self.choose_move(state)?;
        let next = state.apply_move(mv, self.mark())?;
        Ok((mv, next))
    }
}

impl Mark {
    pub fn other(self) -> Self {
        match self {
            Self::Cross => Mark::Nought,
            Self::Nought => Mark::Cross,
        }
    }
    pub fn as_char(self) -> char {
        match self {
            Self::Cross => 'X',
            Self::Nought => 'O',
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Picks uniformly among the legal moves. Used as the training opponent.
#[derive(Debug)]
pub struct RandomPlayer {
    mark: Mark,
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(mark: Mark) -> Self {
        RandomPlayer {
            mark,
            rng: StdRng::from_entropy(),
        }
    }
    pub fn with_seed(mark: Mark, seed: u64) -> Self {
        RandomPlayer {
            mark,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn mark(&self) -> Mark {
        self.mark
    }
    fn choose_move(&mut self, state: &BoardState) -> Result<Action> {
        state
            .available_moves()
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::NoMovesAvailable)
    }
}
