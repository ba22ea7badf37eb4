use crate::config::{REWARD_DRAW, REWARD_LOSS, REWARD_WIN};
use crate::error::{Error, Result};
use crate::players::Mark;
use itertools::Itertools;
use ndarray::prelude::*;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::{fmt, ops::Deref, str::FromStr};

pub const BOARD_SIZE: usize = 3;
pub const NUM_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// A move target: (row, column), both in `0..BOARD_SIZE`.
pub type Action = (usize, usize);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Cross,
    Nought,
}

#[derive(Debug, PartialEq)]
pub enum GameStatus {
    InPlay,
    Drawn,
    Win,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Mark),
    Draw,
}

/// A 3x3 grid of cells in row-major layout.
///
/// The grid is only reachable through `Deref`, so every state handed out is
/// built by `new`, `from_key` or `apply_move` and keeps the 9-cell invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    cells: Array2<Cell>,
}

/// Canonical fixed-length encoding of a board, used to index the Q-table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateKey([Cell; NUM_CELLS]);

impl Cell {
    pub fn as_char(self) -> char {
        match self {
            Self::Empty => '-',
            Self::Cross => 'X',
            Self::Nought => 'O',
        }
    }
    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '-' | ' ' => Some(Self::Empty),
            'X' | 'x' => Some(Self::Cross),
            'O' | 'o' | '0' => Some(Self::Nought),
            _ => None,
        }
    }
}

impl Outcome {
    /// Reward seen by the player holding `mark`.
    pub fn reward_for(self, mark: Mark) -> f32 {
        match self {
            Outcome::Winner(winner) if winner == mark => REWARD_WIN,
            Outcome::Winner(_) => REWARD_LOSS,
            Outcome::Draw => REWARD_DRAW,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Winner(mark) => write!(f, "{mark} wins!"),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Cross => Cell::Cross,
            Mark::Nought => Cell::Nought,
        }
    }
}

impl Deref for BoardState {
    type Target = Array2<Cell>;
    fn deref(&self) -> &Self::Target {
        &self.cells
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.iter().map(|c| c.as_char()).collect::<String>())
    }
}

impl FromStr for BoardState {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Ok(BoardState::from_key(&s.parse::<StateKey>()?))
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    pub fn new() -> Self {
        BoardState {
            cells: Array::from_elem((BOARD_SIZE, BOARD_SIZE), Cell::Empty),
        }
    }

    pub fn from_key(key: &StateKey) -> Self {
        BoardState {
            cells: Array::from_shape_fn((BOARD_SIZE, BOARD_SIZE), |(row, col)| {
                key.0[row * BOARD_SIZE + col]
            }),
        }
    }

    pub fn key(&self) -> StateKey {
        let mut cells = [Cell::Empty; NUM_CELLS];
        for ((row, col), &cell) in self.indexed_iter() {
            cells[row * BOARD_SIZE + col] = cell;
        }
        StateKey(cells)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.get((row, col)).copied()
    }

    /// Multi-line rendering for terminal display.
    pub fn pretty(&self) -> String {
        let mut out = String::from("* * * * *\n");
        self.to_string()
            .chars()
            .tuples::<(_, _, _)>()
            .for_each(|a| out.push_str(&format!("* {} {} {} *\n", a.0, a.1, a.2)));
        out.push_str("* * * * *");
        out
    }

    pub fn available_moves(&self) -> Vec<Action> {
        self.indexed_iter()
            .filter(|(_index, &value)| value == Cell::Empty)
            .map(|(index, _)| index)
            .collect()
    }

    /// Returns a copy of the board with `action` taken by `mark`.
    pub fn apply_move(&self, action: Action, mark: Mark) -> Result<BoardState> {
        let (row, col) = action;
        match self.cell(row, col) {
            Some(Cell::Empty) => {
                let mut next = self.clone();
                next.cells[[row, col]] = mark.into();
                Ok(next)
            }
            _ => Err(Error::InvalidMove { row, col }),
        }
    }

    pub fn check_win(&self, mark: Mark) -> bool {
        let cell = Cell::from(mark);
        let full = |line: ArrayView1<Cell>| line.iter().all(|&c| c == cell);
        self.rows().into_iter().any(full)
            || self.columns().into_iter().any(full)
            || full(self.diag())
            || (0..BOARD_SIZE).all(|i| self.cells[[i, BOARD_SIZE - 1 - i]] == cell)
    }

    /// True when no square is empty. Only meaningful once no winner is found.
    pub fn check_draw(&self) -> bool {
        self.iter().all(|&c| c != Cell::Empty)
    }

    /// Terminal outcome after `mark` has just moved, `None` while in play.
    pub fn outcome(&self, mark: Mark) -> Option<Outcome> {
        match self.status(mark) {
            GameStatus::Win => Some(Outcome::Winner(mark)),
            GameStatus::Drawn => Some(Outcome::Draw),
            GameStatus::InPlay => None,
        }
    }

    pub fn status(&self, mark: Mark) -> GameStatus {
        if self.check_win(mark) {
            GameStatus::Win
        } else if self.check_draw() {
            GameStatus::Drawn
        } else {
            GameStatus::InPlay
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.iter().map(|c| c.as_char()).collect::<String>())
    }
}

impl FromStr for StateKey {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let count = s.chars().count();
        if count != NUM_CELLS {
            return Err(Error::InvalidState(format!(
                "expected {NUM_CELLS} cells, got {count} in '{s}'"
            )));
        }
        let mut cells = [Cell::Empty; NUM_CELLS];
        for (position, c) in s.chars().enumerate() {
            cells[position] = Cell::from_char(c).ok_or_else(|| {
                Error::InvalidState(format!(
                    "invalid character '{c}' at position {position} in '{s}'"
                ))
            })?;
        }
        Ok(StateKey(cells))
    }
}

impl Serialize for StateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
