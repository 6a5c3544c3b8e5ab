//! threes-2x3: exact expected-score solver for a 2x3 "Threes" board
//!
//! This crate provides:
//! - A `Board` type with placement and one-step sliding (`board` module)
//! - The three-rank tile bag that constrains dealing (`bag` module)
//! - Before/after state tags and the textual query format (`state` module)
//! - Memo tables keyed by packed board encodings (`table` module)
//! - The solver, which enumerates every reachable state once (`solver` module)
//! - Seeded self-play against a random dealer (`episode` module)
//! - Table snapshots (`serialization` module)
//!
//! Quick start:
//! ```
//! use threes_2x3::board::Board;
//! use threes_2x3::solver::Solver;
//! use threes_2x3::state::{with_hint, StateType};
//!
//! // Enumerates the whole state space up front
//! let solver = Solver::new();
//!
//! // A lone 1 in the corner, and the next tile will be a 2
//! let mut board = Board::EMPTY;
//! board.place(0, 1);
//! let answer = solver.solve(&with_hint(board, 2), StateType::Before);
//! assert!(answer.is_computed());
//! ```
//!
//! Queries can also be parsed from their wire form:
//! ```
//! use threes_2x3::state::Query;
//! let q: Query = "b 1 2 0 0 3 0 +3".parse().unwrap();
//! assert_eq!(q.board.cells(), [1, 2, 0, 0, 3, 0]);
//! assert_eq!(q.hint(), 3);
//! ```
//!
pub mod bag;
pub mod board;
pub mod episode;
pub mod serialization;
pub mod solver;
pub mod state;
pub mod table;
