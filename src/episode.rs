//! Self-play against a random environment.
//!
//! The environment deals tiles from a [`TileBag`]. The opening tile lands on
//! any cell; afterwards each tile lands on a random free cell vacated by the
//! player's last slide. The player always knows the next tile (the hint) and
//! follows [`Solver::best_move`].

use rand::seq::SliceRandom;
use rand::Rng;

use crate::bag::{tile_index, TileBag};
use crate::board::{Board, Cell, Move, CELLS};
use crate::solver::{calculate_expect, Solver};
use crate::table::Value;

/// Outcome of one played game.
#[derive(Debug, Clone, Copy)]
pub struct Episode {
    pub moves: u32,
    /// Sum of slide rewards.
    pub reward: u64,
    /// Final score of the terminal board.
    pub score: Value,
    pub final_board: Board,
}

/// Bag-driven tile dealer.
pub struct Environment<'r, R: Rng + ?Sized> {
    rng: &'r mut R,
    bag: TileBag,
}

impl<'r, R: Rng + ?Sized> Environment<'r, R> {
    pub fn new(rng: &'r mut R) -> Self { Self { rng, bag: TileBag::FULL } }

    /// Deal the opening tile onto a random cell, returning the board and the first hint.
    pub fn open(&mut self) -> (Board, Cell) {
        self.bag.reset();
        let tile = self.bag.draw(self.rng);
        let mut board = Board::EMPTY;
        board.place(self.rng.gen_range(0..CELLS), tile);
        (board, self.bag.peek(self.rng))
    }

    /// Place `hint` on a random free cell vacated by `last` and reveal the next hint.
    ///
    /// Returns `None` if no vacated cell is free.
    pub fn place(&mut self, board: Board, hint: Cell, last: Move) -> Option<(Board, Cell)> {
        let mut cells: Vec<usize> = Board::placement_cells(last).iter().copied().filter(|&p| board.cell(p) == 0).collect();
        cells.shuffle(self.rng);
        let &pos = cells.first()?;
        self.bag.set(tile_index(hint));
        let mut placed = board;
        placed.place(pos, hint);
        Some((placed, self.bag.peek(self.rng)))
    }
}

/// Play one game to completion.
pub fn play<R: Rng + ?Sized>(solver: &Solver, rng: &mut R) -> Episode {
    let mut env = Environment::new(rng);
    let (mut board, mut hint) = env.open();
    let mut moves = 0u32;
    let mut reward = 0u64;
    while let Some(dir) = solver.best_move(&board, hint) {
        let Some((slid, r)) = board.shift(dir) else { break };
        moves += 1;
        reward += r as u64;
        match env.place(slid, hint, dir) {
            Some((next, next_hint)) => {
                board = next;
                hint = next_hint;
            }
            None => {
                board = slid;
                break;
            }
        }
    }
    Episode { moves, reward, score: calculate_expect(&board), final_board: board }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::sync::OnceLock;

    fn solver() -> &'static Solver {
        static SOLVER: OnceLock<Solver> = OnceLock::new();
        SOLVER.get_or_init(Solver::new)
    }

    #[test]
    fn test_open_deals_one_tile_and_distinct_hint() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let mut env = Environment::new(&mut rng);
            let (board, hint) = env.open();
            assert_eq!(board.count_empty(), CELLS - 1);
            let tile = board.cells().into_iter().find(|&t| t != 0).unwrap();
            assert_ne!(tile, hint);
        }
    }

    #[test]
    fn test_place_uses_vacated_cells() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut env = Environment::new(&mut rng);
        let board = Board::from_cells([1, 2, 0, 3, 3, 0]);
        let (placed, _) = env.place(board, 1, Move::Left).unwrap();
        assert!(placed.cell(2) == 1 || placed.cell(5) == 1);
        assert_eq!(placed.count_empty(), 1);
        assert!(env.place(Board::from_cells([1, 1, 1, 2, 2, 2]), 1, Move::Left).is_none());
    }

    #[test]
    fn test_play_reaches_terminal_board() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            let ep = play(solver(), &mut rng);
            assert!(ep.moves > 0);
            assert!(ep.final_board.is_terminal());
            assert_eq!(ep.score, calculate_expect(&ep.final_board));
        }
    }

    #[test]
    fn test_play_is_deterministic_for_seed() {
        let a = play(solver(), &mut StdRng::seed_from_u64(9));
        let b = play(solver(), &mut StdRng::seed_from_u64(9));
        assert_eq!(a.final_board, b.final_board);
        assert_eq!(a.moves, b.moves);
        assert_eq!(a.reward, b.reward);
    }
}
