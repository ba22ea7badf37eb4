use thiserror::Error;

/// Errors raised by the game engine, the agent and the table codecs.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid move ({row}, {col}): out of range or the square is taken")]
    InvalidMove { row: usize, col: usize },

    #[error("invalid board state: {0}")]
    InvalidState(String),

    #[error("game already over")]
    GameOver,

    #[error("no available moves")]
    NoMovesAvailable,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("pickle error: {0}")]
    Pickle(#[from] serde_pickle::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
