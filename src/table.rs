use std::collections::HashMap;
use std::fmt;

use ahash::RandomState as AHasher;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Move, RADIX};

pub type Value = f64;

/// Expected final score of a state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Answer {
    /// Not memoized (yet).
    #[default]
    Unset,
    /// Malformed input or no legal continuation.
    Invalid,
    Computed { min: Value, avg: Value, max: Value },
}

impl Answer {
    #[inline]
    pub fn new(min: Value, avg: Value, max: Value) -> Self { Answer::Computed { min, avg, max } }

    /// Answer of a position whose outcome is already fixed.
    #[inline]
    pub fn exact(value: Value) -> Self { Answer::new(value, value, value) }

    #[inline]
    pub fn is_unset(&self) -> bool { matches!(self, Answer::Unset) }

    #[inline]
    pub fn is_computed(&self) -> bool { matches!(self, Answer::Computed { .. }) }

    /// The average, if computed.
    #[inline]
    pub fn avg(&self) -> Option<Value> {
        match *self {
            Answer::Computed { avg, .. } => Some(avg),
            _ => None,
        }
    }
}

/// `<min> <avg> <max>`, or `-1` when there is no computed value.
impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Computed { min, avg, max } => write!(f, "{min} {avg} {max}"),
            _ => f.write_str("-1"),
        }
    }
}

/// Running min / mean / max over branch answers. Branches without a computed
/// value are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Aggregate {
    min: Value,
    max: Value,
    sum: Value,
    count: u32,
}

impl Aggregate {
    pub(crate) fn push(&mut self, answer: Answer) {
        if let Answer::Computed { min, avg, max } = answer {
            if self.count == 0 {
                self.min = min;
                self.max = max;
            } else {
                self.min = self.min.min(min);
                self.max = self.max.max(max);
            }
            self.sum += avg;
            self.count += 1;
        }
    }

    /// Unset when no branch contributed.
    pub(crate) fn finish(&self) -> Answer {
        if self.count == 0 {
            Answer::Unset
        } else {
            Answer::new(self.min, self.sum / self.count as Value, self.max)
        }
    }
}

/// Packed table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey(u32);

/// Key of a before-state, or `None` if the board or hint cannot be stored.
///
/// ```
/// use threes_2x3::board::{Board, Move};
/// use threes_2x3::table::{after_key, before_key};
/// let b = Board::from_cells([1, 0, 0, 0, 0, 0]);
/// assert!(before_key(&b, 2).is_some());
/// assert!(before_key(&b, 0).is_none());
/// assert_ne!(after_key(&b, 2, Move::Up), after_key(&b, 2, Move::Left));
/// ```
#[inline]
pub fn before_key(board: &Board, hint: Cell) -> Option<StateKey> {
    if !(1..=3).contains(&hint) || board.cells().iter().any(|&t| t as u32 >= RADIX) {
        return None;
    }
    Some(StateKey(board.encode() * 3 + (hint as u32 - 1)))
}

/// Key of an after-state reached by `last`.
#[inline]
pub fn after_key(board: &Board, hint: Cell, last: Move) -> Option<StateKey> {
    before_key(board, hint).map(|StateKey(k)| StateKey(k * 4 + last.index() as u32))
}

/// Sparse memo of answers. Absent keys read as [`Answer::Unset`].
#[derive(Debug, Clone, Default)]
pub struct TranspositionTable {
    entries: HashMap<StateKey, Answer, AHasher>,
}

impl TranspositionTable {
    pub fn new() -> Self { Self::default() }

    #[inline]
    pub fn get(&self, key: StateKey) -> Answer { self.entries.get(&key).copied().unwrap_or_default() }

    /// Memoize `answer`. Unset answers are not stored.
    #[inline]
    pub fn insert(&mut self, key: StateKey, answer: Answer) {
        if !answer.is_unset() {
            self.entries.insert(key, answer);
        }
    }

    #[inline]
    pub fn len(&self) -> usize { self.entries.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// All entries, sorted by key.
    pub fn to_entries(&self) -> Vec<(StateKey, Answer)> {
        let mut out: Vec<_> = self.entries.iter().map(|(&k, &a)| (k, a)).collect();
        out.sort_unstable_by_key(|&(k, _)| k);
        out
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (StateKey, Answer)>) -> Self {
        let mut table = Self::new();
        for (key, answer) in entries {
            table.insert(key, answer);
        }
        table
    }
}
