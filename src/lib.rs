//! A* solver for the 3x3 sliding-tile puzzle.
//!
//! Boards are immutable values, the search keeps its nodes in an arena and
//! hands back the solution as plain data for the caller to render.

pub mod batch;
pub mod board;
pub mod config;
pub mod error;
pub mod heuristic;
pub mod render;
pub mod search;

pub use board::{Board, Move};
pub use error::PuzzleError;
pub use heuristic::{heuristic, Manhattan};
pub use search::{solve, SearchOutcome, SearchReport, SearchStats, Solution, Solver, Step};
