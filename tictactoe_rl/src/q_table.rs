use crate::board::{Action, StateKey, BOARD_SIZE};
use crate::error::Result;
use itertools::Itertools;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::{Read, Write};
use std::ops::Deref;

/// Action values for one state, kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Moves {
    #[serde(serialize_with = "serialize_moves")]
    #[serde(deserialize_with = "deserialize_moves")]
    moves: Vec<(Action, f32)>,
}

/// Sparse value table. Entries are created lazily and never removed.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct QTable {
    qtable: HashMap<StateKey, Moves>,
}

impl Deref for Moves {
    type Target = [(Action, f32)];
    fn deref(&self) -> &<Self as Deref>::Target {
        &self.moves
    }
}

impl Deref for QTable {
    type Target = HashMap<StateKey, Moves>;
    fn deref(&self) -> &<Self as Deref>::Target {
        &self.qtable
    }
}

impl From<Vec<Action>> for Moves {
    fn from(value: Vec<Action>) -> Self {
        Moves {
            moves: value.into_iter().map(|mv| (mv, 0.0)).collect(),
        }
    }
}

impl Moves {
    pub fn get(&self, action: Action) -> Option<f32> {
        self.iter()
            .find(|(mv, _)| *mv == action)
            .map(|(_, value)| *value)
    }

    /// Mutable slot for `action`, appended at 0.0 if it was never seen.
    pub fn entry(&mut self, action: Action) -> &mut f32 {
        let index = match self.moves.iter().position(|(mv, _)| *mv == action) {
            Some(index) => index,
            None => {
                self.moves.push((action, 0.0));
                self.moves.len() - 1
            }
        };
        &mut self.moves[index].1
    }

    /// Highest valued move among `available`, first one wins a tie.
    pub fn select_max_move(&self, available: &[Action]) -> Option<Action> {
        self.iter()
            .filter(|(mv, _)| available.contains(mv))
            .max_set_by(|(_, value1), (_, value2)| value1.total_cmp(value2))
            .first()
            .map(|entry| entry.0)
    }
}

impl QTable {
    pub fn new() -> Self {
        QTable {
            qtable: HashMap::with_capacity(6_000),
        }
    }

    /// Creates the entry for `key` with every move at 0.0.
    /// Returns false and leaves the table alone if the state is known.
    pub fn init_state(&mut self, key: StateKey, moves: Vec<Action>) -> bool {
        if self.qtable.contains_key(&key) {
            return false;
        }
        self.qtable.insert(key, Moves::from(moves));
        true
    }

    pub fn value(&self, key: &StateKey, action: Action) -> Option<f32> {
        self.get(key).and_then(|moves| moves.get(action))
    }

    pub fn value_mut(&mut self, key: StateKey, action: Action) -> &mut f32 {
        self.qtable.entry(key).or_default().entry(action)
    }

    /// Maximum stored value over `moves`; unknown entries count as 0.0 and
    /// an empty move list yields 0.0.
    pub fn max_value(&self, key: &StateKey, moves: &[Action]) -> f32 {
        moves
            .iter()
            .map(|&mv| self.value(key, mv).unwrap_or(0.0))
            .max_by(|value1, value2| value1.total_cmp(value2))
            .unwrap_or(0.0)
    }

    /// Number of (state, action) pairs stored.
    pub fn num_values(&self) -> usize {
        self.values().map(|moves| moves.len()).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(data: &str) -> Result<QTable> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn to_pickle<W: Write>(&self, writer: &mut W) -> Result<()> {
        serde_pickle::to_writer(writer, self, serde_pickle::SerOptions::new())?;
        Ok(())
    }

    pub fn from_pickle<R: Read>(reader: R) -> Result<QTable> {
        Ok(serde_pickle::from_reader(
            reader,
            serde_pickle::DeOptions::new(),
        )?)
    }
}

fn serialize_moves<S>(moves: &Vec<(Action, f32)>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(moves.len()))?;
    for (k, v) in moves {
        let key_str = format!("({}, {})", k.0, k.1);
        map.serialize_entry(&key_str, v)?;
    }
    map.end()
}

fn deserialize_moves<'de, D>(deserializer: D) -> std::result::Result<Vec<(Action, f32)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct MovesVisitor;
    impl<'de> Visitor<'de> for MovesVisitor {
        type Value = Vec<(Action, f32)>;
        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map from \"(row, col)\" to a move value")
        }
        fn visit_map<M>(self, mut access: M) -> std::result::Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut moves = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, f32>()? {
                let action: Action = key
                    .chars()
                    .filter_map(|r| r.to_digit(10))
                    .map(|d| d as usize)
                    .collect_tuple::<Action>()
                    .filter(|&(row, col)| row < BOARD_SIZE && col < BOARD_SIZE)
                    .ok_or_else(|| de::Error::custom(format!("invalid move key '{key}'")))?;
                moves.push((action, value));
            }
            Ok(moves)
        }
    }
    deserializer.deserialize_map(MovesVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardState;
    use crate::error::Error;

    fn key(s: &str) -> StateKey {
        s.parse().unwrap()
    }

    #[test]
    fn init_state_zeroes_every_move() {
        let mut q = QTable::new();
        let state: BoardState = "X---O----".parse().unwrap();
        assert!(q.init_state(state.key(), state.available_moves()));
        let moves = &q[&state.key()];
        assert_eq!(moves.len(), 7);
        assert!(moves.iter().all(|(_, value)| *value == 0.0));
    }

    #[test]
    fn init_state_keeps_known_values() {
        let mut q = QTable::new();
        let k = key("---------");
        q.init_state(k, vec![(0, 0), (1, 1)]);
        *q.value_mut(k, (1, 1)) = 0.75;
        assert!(!q.init_state(k, vec![(0, 0), (1, 1)]));
        assert_eq!(q.value(&k, (1, 1)), Some(0.75));
    }

    #[test]
    fn max_move_prefers_first_of_a_tie() {
        let mut moves = Moves::from(vec![(0, 0), (0, 1), (2, 2)]);
        *moves.entry((0, 1)) = 0.4;
        *moves.entry((2, 2)) = 0.4;
        let all = [(0, 0), (0, 1), (2, 2)];
        assert_eq!(moves.select_max_move(&all), Some((0, 1)));
        assert_eq!(moves.select_max_move(&[(0, 0), (2, 2)]), Some((2, 2)));
        assert_eq!(moves.select_max_move(&[(1, 1)]), None);
    }

    #[test]
    fn max_value_defaults_to_zero() {
        let mut q = QTable::new();
        let k = key("XO-------");
        assert_eq!(q.max_value(&k, &[]), 0.0);
        assert_eq!(q.max_value(&k, &[(0, 2)]), 0.0);
        q.init_state(k, vec![(0, 2), (1, 0)]);
        *q.value_mut(k, (0, 2)) = -0.5;
        *q.value_mut(k, (1, 0)) = -0.25;
        assert_eq!(q.max_value(&k, &[(0, 2), (1, 0)]), -0.25);
        assert_eq!(q.num_values(), 2);
    }

    #[test]
    fn json_keeps_move_order() {
        let mut q = QTable::new();
        let k = key("X-------O");
        q.init_state(k, vec![(2, 0), (0, 1), (1, 1)]);
        *q.value_mut(k, (0, 1)) = 0.5;
        let json = q.to_json().unwrap();
        assert!(json.contains(r#""X-------O":{"moves":{"(2, 0)":0.0,"(0, 1)":0.5,"(1, 1)":0.0}}"#));
        let decoded = QTable::from_json(&json).unwrap();
        assert_eq!(decoded, q);
    }

    #[test]
    fn pickle_restores_table() {
        let mut q = QTable::new();
        let state = BoardState::new();
        q.init_state(state.key(), state.available_moves());
        *q.value_mut(state.key(), (1, 1)) = 0.25;
        let mut buf: Vec<u8> = vec![];
        q.to_pickle(&mut buf).unwrap();
        let decoded = QTable::from_pickle(&buf[..]).unwrap();
        assert_eq!(decoded.value(&state.key(), (1, 1)), Some(0.25));
        assert_eq!(decoded[&state.key()].len(), 9);
    }

    #[test]
    fn corrupt_json_is_rejected() {
        let bad_state = r#"{"qtable":{"XX":{"moves":{}}}}"#;
        assert!(matches!(QTable::from_json(bad_state), Err(Error::Json(_))));
        let bad_move = r#"{"qtable":{"---------":{"moves":{"(4, 0)":0.0}}}}"#;
        assert!(matches!(QTable::from_json(bad_move), Err(Error::Json(_))));
    }
}
