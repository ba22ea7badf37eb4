//! Turn-taking for one interactive game: a human plays crosses against the
//! trained agent. The controller owns the board; a UI only reads snapshots
//! and forwards cell activations.

use crate::agent::{QLearningAgent, AGENT_MARK};
use crate::board::{Action, BoardState, Outcome};
use crate::error::{Error, Result};
use crate::players::Mark;
use tracing::{debug, info};

pub const HUMAN_MARK: Mark = Mark::Cross;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingFirstPlayer,
    AwaitingSecondPlayer,
    GameOver(Outcome),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    board: BoardState,
    phase: Phase,
}

#[derive(Debug)]
pub struct GameController {
    agent: QLearningAgent,
    session: GameSession,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        GameSession {
            board: BoardState::new(),
            phase: Phase::AwaitingFirstPlayer,
        }
    }
    pub fn board(&self) -> &BoardState {
        &self.board
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }
}

impl GameController {
    pub fn new(agent: QLearningAgent) -> Self {
        GameController {
            agent,
            session: GameSession::new(),
        }
    }

    pub fn agent(&self) -> &QLearningAgent {
        &self.agent
    }

    pub fn into_agent(self) -> QLearningAgent {
        self.agent
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn renderable_state(&self) -> &BoardState {
        &self.session.board
    }

    pub fn result_text(&self) -> Option<String> {
        match self.session.phase {
            Phase::GameOver(outcome) => Some(outcome.to_string()),
            _ => None,
        }
    }

    /// Fresh board, human to move. Learned values are kept.
    pub fn reset_session(&mut self) {
        self.session = GameSession::new();
        debug!("session reset");
    }

    /// Plays the human's cross at (row, col) and, if the game goes on, the
    /// agent's reply. A rejected move leaves the session untouched.
    pub fn on_cell_activated(&mut self, row: usize, col: usize) -> Result<Phase> {
        if self.session.is_over() {
            return Err(Error::GameOver);
        }
        self.play_move(HUMAN_MARK, (row, col))?;
        if self.session.phase == Phase::AwaitingSecondPlayer {
            let available_moves = self.session.board.available_moves();
            let mv = self
                .agent
                .choose_move(&self.session.board, &available_moves)?;
            debug!(?mv, "agent move");
            self.play_move(AGENT_MARK, mv)?;
        }
        Ok(self.session.phase)
    }

    fn play_move(&mut self, mark: Mark, action: Action) -> Result<()> {
        self.session.board = self.session.board.apply_move(action, mark)?;
        match self.session.board.outcome(mark) {
            Some(outcome) => {
                info!(%outcome, board = %self.session.board, "game over");
                self.session.phase = Phase::GameOver(outcome);
                self.agent.update_q_value(
                    &self.session.board,
                    None,
                    outcome.reward_for(AGENT_MARK),
                )?;
            }
            None if mark == HUMAN_MARK => self.session.phase = Phase::AwaitingSecondPlayer,
            None => self.session.phase = Phase::AwaitingFirstPlayer,
        }
        Ok(())
    }
}
