//! Before/after state tags, the hint side channel and the textual query form.
//!
//! A query line reads `<type> <six face values> +<hint>`, for example
//! `b 1 2 0 0 3 0 +2` or `a 0 0 0 6 1 0 +x`.

use std::fmt;
use std::str::FromStr;

use crate::board::{face_to_rank, Board, Cell, CELLS};

/// Which side of a turn a board sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StateType {
    /// Awaiting a slide; the hint is the tile that will be placed next.
    Before,
    /// Awaiting placement of the hint tile after a slide.
    After,
    #[default]
    Illegal,
}

impl StateType {
    /// Classify a token by its first character: `b`, `a`, anything else is illegal.
    pub fn from_token(token: &str) -> Self {
        match token.chars().next() {
            Some('b') => StateType::Before,
            Some('a') => StateType::After,
            _ => StateType::Illegal,
        }
    }

    pub fn code(self) -> char {
        match self {
            StateType::Before => 'b',
            StateType::After => 'a',
            StateType::Illegal => 'i',
        }
    }

    #[inline]
    pub fn is_before(self) -> bool { self == StateType::Before }

    #[inline]
    pub fn is_after(self) -> bool { self == StateType::After }
}

impl fmt::Display for StateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.code()) }
}

/// The pending hint carried in a board's side channel; 0 means no hint.
#[inline]
pub fn hint(board: &Board) -> Cell { board.info() }

/// Copy of `board` carrying `hint` in its side channel.
#[inline]
pub fn with_hint(mut board: Board, hint: Cell) -> Board {
    board.set_info(hint);
    board
}

/// Textual form of a hint: `+<digit>`, or `+x` when absent.
pub struct HintToken(pub Cell);

impl fmt::Display for HintToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => f.write_str("+x"),
            h => write!(f, "+{h}"),
        }
    }
}

impl FromStr for HintToken {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_prefix('+').ok_or_else(|| ParseError::Hint(s.to_string()))?;
        let mut chars = body.chars();
        match (chars.next(), chars.next()) {
            (Some('x'), None) => Ok(HintToken(0)),
            (Some(c), None) => c
                .to_digit(10)
                .map(|d| HintToken(d as Cell))
                .ok_or_else(|| ParseError::Hint(s.to_string())),
            _ => Err(ParseError::Hint(s.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty query")]
    Empty,
    #[error("expected 6 cells, found {0}")]
    CellCount(usize),
    #[error("cell '{0}' is not a number")]
    NotANumber(String),
    #[error("no tile shows face value {0}")]
    Face(u32),
    #[error("bad hint token '{0}'")]
    Hint(String),
    #[error("missing hint token")]
    MissingHint,
    #[error("unexpected trailing input '{0}'")]
    Trailing(String),
}

/// One solver query: a tagged board with its hint in the side channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub kind: StateType,
    pub board: Board,
}

impl Query {
    #[inline]
    pub fn hint(&self) -> Cell { hint(&self.board) }
}

impl FromStr for Query {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let kind = StateType::from_token(tokens.next().ok_or(ParseError::Empty)?);

        let mut cells = [0 as Cell; CELLS];
        let mut hint_token = None;
        let mut count = 0;
        for token in tokens.by_ref() {
            if token.starts_with('+') {
                hint_token = Some(token);
                break;
            }
            if count == CELLS {
                return Err(ParseError::CellCount(count + 1));
            }
            let face: u32 = token.parse().map_err(|_| ParseError::NotANumber(token.to_string()))?;
            // Faces too large for a cell still parse; the solver rejects them as invalid.
            cells[count] = face_to_rank(face).ok_or(ParseError::Face(face))?;
            count += 1;
        }
        if count != CELLS {
            return Err(ParseError::CellCount(count));
        }
        let HintToken(hint) = hint_token.ok_or(ParseError::MissingHint)?.parse()?;
        if let Some(extra) = tokens.next() {
            return Err(ParseError::Trailing(extra.to_string()));
        }
        Ok(Query { kind, board: with_hint(Board::from_cells(cells), hint) })
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind, self.board, HintToken(self.hint()))
    }
}
