//! Exact expected-score solver for the 2x3 game.
//!
//! Two mutually recursive value functions cover the two halves of a turn:
//! - before-state: the player picks the slide whose after-state has the
//!   highest average;
//! - after-state: the hint tile lands in any free cell vacated by the slide,
//!   and the next hint is any rank left in the bag, all branches equally likely.
//!
//! Construction enumerates every opening placement, which fills both tables
//! for the whole reachable state space. Queries only read the tables.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::bag::TileBag;
use crate::board::{Board, Cell, Move, CELLS};
use crate::state::{self, StateType};
use crate::table::{after_key, before_key, Aggregate, Answer, TranspositionTable, Value};

/// Table answer for one slide from a before-state.
///
/// `legal` is false when the slide does not change the board; `answer` is
/// then [`Answer::Invalid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchEval {
    pub dir: Move,
    pub answer: Answer,
    pub legal: bool,
}

/// Number of memoized entries per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub before_entries: usize,
    pub after_entries: usize,
}

/// Final score of a board with no legal slide: `3^(rank - 2)` summed over
/// every tile of rank 3 or above.
///
/// ```
/// use threes_2x3::board::Board;
/// use threes_2x3::solver::calculate_expect;
/// assert_eq!(calculate_expect(&Board::from_cells([3, 0, 0, 0, 0, 0])), 3.0);
/// assert_eq!(calculate_expect(&Board::from_cells([1, 2, 4, 0, 0, 5])), 9.0 + 27.0);
/// ```
pub fn calculate_expect(board: &Board) -> Value {
    board.cells().iter().filter(|&&t| t >= 3).map(|&t| (3.0 as Value).powi(t as i32 - 2)).sum()
}

/// Memoized solver. Read-only once constructed.
pub struct Solver {
    before: TranspositionTable,
    after: TranspositionTable,
}

impl Solver {
    /// Enumerate the full state space. This is the only expensive call.
    pub fn new() -> Self {
        let started = Instant::now();
        let mut solver = Self::from_tables(TranspositionTable::new(), TranspositionTable::new());
        solver.populate();
        let stats = solver.stats();
        info!(
            before = stats.before_entries,
            after = stats.after_entries,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "solver is initialized"
        );
        solver
    }

    /// Wrap already-computed tables, e.g. from a snapshot.
    pub fn from_tables(before: TranspositionTable, after: TranspositionTable) -> Self { Self { before, after } }

    pub fn before_table(&self) -> &TranspositionTable { &self.before }

    pub fn after_table(&self) -> &TranspositionTable { &self.after }

    pub fn stats(&self) -> SolverStats {
        SolverStats { before_entries: self.before.len(), after_entries: self.after.len() }
    }

    /// Look up the answer of `board`; its hint rides in the board's side channel.
    ///
    /// After-states are found by scanning the last-move slots in opcode order
    /// and returning the first memoized one. Use [`Solver::solve_after`] to
    /// pick the slot explicitly.
    pub fn solve(&self, board: &Board, kind: StateType) -> Answer {
        if !board.is_valid() {
            warn!(?board, "illegal board");
            return Answer::Invalid;
        }
        let hint = state::hint(board);
        match kind {
            StateType::Before => before_key(board, hint).map_or(Answer::Invalid, |key| self.before.get(key)),
            StateType::After => {
                let mut slots = Move::ALL.iter().map(|&dir| self.solve_after(board, hint, dir)).filter(|a| !a.is_unset());
                let Some(first) = slots.next() else { return Answer::Unset };
                let others = slots.count();
                if others > 0 {
                    debug!(%board, hint, others, "after-state memoized under several last moves; using the first");
                }
                first
            }
            StateType::Illegal => Answer::Invalid,
        }
    }

    /// Look up the after-state reached from a slide in `last`.
    pub fn solve_after(&self, board: &Board, hint: Cell, last: Move) -> Answer {
        if !board.is_valid() {
            return Answer::Invalid;
        }
        after_key(board, hint, last).map_or(Answer::Invalid, |key| self.after.get(key))
    }

    /// Table answers for each slide from a before-state, in opcode order.
    pub fn branch_evals(&self, board: &Board, hint: Cell) -> [BranchEval; 4] {
        Move::ALL.map(|dir| match board.shift(dir) {
            Some((next, _)) => BranchEval { dir, answer: self.solve_after(&next, hint, dir), legal: true },
            None => BranchEval { dir, answer: Answer::Invalid, legal: false },
        })
    }

    /// The slide with the highest average, ties going to the first in opcode
    /// order. Falls back to the first legal slide when none is memoized, and
    /// returns `None` on a terminal board.
    pub fn best_move(&self, board: &Board, hint: Cell) -> Option<Move> {
        let branches = self.branch_evals(board, hint);
        let mut best: Option<(Move, Value)> = None;
        for branch in branches.iter().filter(|b| b.legal) {
            if let Some(avg) = branch.answer.avg() {
                if best.map_or(true, |(_, b)| avg > b) {
                    best = Some((branch.dir, avg));
                }
            }
        }
        best.map(|(dir, _)| dir).or_else(|| branches.iter().find(|b| b.legal).map(|b| b.dir))
    }

    fn populate(&mut self) {
        let mut opening = Aggregate::default();
        for pos in 0..CELLS {
            for tile in 1..=3 {
                let mut board = Board::EMPTY;
                board.place(pos, tile);
                let bag = TileBag::FULL.with(tile);
                for hint in (1..=3).filter(|&h| h != tile) {
                    opening.push(self.before_expect(board, hint, bag));
                }
            }
        }
        // The empty board is never reached by the recursion; answer queries on
        // it, either side of the turn, with the opening aggregate.
        let opening = opening.finish();
        for hint in 1..=3 {
            if let Some(key) = before_key(&Board::EMPTY, hint) {
                self.before.insert(key, opening);
            }
            for dir in Move::ALL {
                if let Some(key) = after_key(&Board::EMPTY, hint, dir) {
                    self.after.insert(key, opening);
                }
            }
        }
    }

    fn before_expect(&mut self, board: Board, hint: Cell, bag: TileBag) -> Answer {
        let Some(key) = before_key(&board, hint) else { return Answer::Invalid };
        let memo = self.before.get(key);
        if !memo.is_unset() {
            return memo;
        }

        let mut terminal = true;
        let mut best = Answer::Unset;
        for dir in Move::ALL {
            let Some((next, _)) = board.shift(dir) else { continue };
            terminal = false;
            let answer = self.after_expect(next, hint, dir, bag);
            if let Some(avg) = answer.avg() {
                if best.avg().map_or(true, |b| avg > b) {
                    best = answer;
                }
            }
        }

        let answer = if terminal {
            Answer::exact(calculate_expect(&board))
        } else if best.is_unset() {
            Answer::Invalid
        } else {
            best
        };
        self.before.insert(key, answer);
        answer
    }

    fn after_expect(&mut self, board: Board, hint: Cell, last: Move, bag: TileBag) -> Answer {
        let Some(key) = after_key(&board, hint, last) else { return Answer::Invalid };
        let memo = self.after.get(key);
        if !memo.is_unset() {
            return memo;
        }

        let bag = bag.with(hint);
        let mut branches = Aggregate::default();
        let mut placeable = false;
        for &pos in Board::placement_cells(last) {
            if board.cell(pos) != 0 {
                continue;
            }
            placeable = true;
            let mut placed = board;
            placed.place(pos, hint);
            for next_hint in bag.available() {
                branches.push(self.before_expect(placed, next_hint, bag));
            }
        }

        let answer = if placeable { branches.finish() } else { Answer::Invalid };
        self.after.insert(key, answer);
        answer
    }
}

impl Default for Solver {
    fn default() -> Self { Self::new() }
}
