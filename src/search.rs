//! A* search over boards.
//!
//! Nodes live in an arena and point at their parent by index. The frontier
//! is a min-heap keyed by `(f, arena index)`: since every push appends a new
//! node, the index doubles as an insertion sequence and equal-`f` entries pop
//! first-in first-out.
//!
//! A board may sit in the frontier several times under different parents.
//! The visited set filters children at generation time, and an entry whose
//! board got expanded through another parent in the meantime is dropped when
//! popped, so no board is ever expanded twice.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, trace};

use crate::board::{Board, Move};
use crate::heuristic::Manhattan;

/// One generated state. Never mutated after it is pushed to the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNode {
    pub board: Board,
    /// Moves from the start.
    pub g: u32,
    /// Estimated moves to the goal.
    pub h: u32,
    pub f: u32,
    /// Arena index of the node this one was expanded from.
    pub parent: Option<usize>,
    /// Move that produced this node; `None` for the start.
    pub mv: Option<Move>,
}

/// A board on the solution path and the move that reached it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub board: Board,
    pub mv: Option<Move>,
}

/// Ordered path from the start board to the goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub steps: Vec<Step>,
}

impl Solution {
    /// Number of moves, the `g` of the goal node.
    pub fn len(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.steps.iter().filter_map(|step| step.mv)
    }

    pub fn start(&self) -> Option<&Board> {
        self.steps.first().map(|step| &step.board)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Solved(Solution),
    /// Frontier ran dry without meeting the goal.
    NoSolution,
    /// The cancellation flag was raised.
    Cancelled,
    /// The expansion budget ran out.
    LimitReached,
}

impl SearchOutcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SearchOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            SearchOutcome::Solved(_) => "solved",
            SearchOutcome::NoSolution => "no_solution",
            SearchOutcome::Cancelled => "cancelled",
            SearchOutcome::LimitReached => "limit_reached",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes popped and expanded.
    pub expanded: usize,
    /// Nodes created, start included.
    pub generated: usize,
    /// Largest frontier seen.
    pub peak_frontier: usize,
    /// Frontier entries dropped because their board was already expanded.
    pub stale_pops: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

/// A* driver. Each call to [`Solver::solve`] owns a fresh frontier and
/// visited set, so one solver may be reused freely.
#[derive(Debug, Clone)]
pub struct Solver<'a> {
    goal: Board,
    heuristic: Manhattan,
    max_expansions: Option<usize>,
    cancel: Option<&'a AtomicBool>,
}

impl Default for Solver<'_> {
    fn default() -> Self {
        Self::new(Board::GOAL)
    }
}

impl<'a> Solver<'a> {
    pub fn new(goal: Board) -> Self {
        Self {
            goal,
            heuristic: Manhattan::new(&goal),
            max_expansions: None,
            cancel: None,
        }
    }

    pub fn with_max_expansions(mut self, limit: Option<usize>) -> Self {
        self.max_expansions = limit;
        self
    }

    /// Flag checked before every pop; raising it ends the search with
    /// [`SearchOutcome::Cancelled`].
    pub fn with_cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn goal(&self) -> &Board {
        &self.goal
    }

    pub fn solve(&self, start: Board) -> SearchReport {
        self.solve_with(start, |_| {})
    }

    /// Like [`Solver::solve`], calling `on_expand` for every expanded node.
    pub fn solve_with<F>(&self, start: Board, mut on_expand: F) -> SearchReport
    where
        F: FnMut(&SearchNode),
    {
        let h = self.heuristic.estimate(&start);
        info!(
            event = "solve_start",
            start = %start.packed(),
            goal = %self.goal.packed(),
            h,
        );

        let mut arena = vec![SearchNode {
            board: start,
            g: 0,
            h,
            f: h,
            parent: None,
            mv: None,
        }];
        let mut frontier = BinaryHeap::new();
        frontier.push(Reverse((h, 0usize)));
        let mut visited: HashSet<Board> = HashSet::new();
        let mut stats = SearchStats {
            generated: 1,
            peak_frontier: 1,
            ..SearchStats::default()
        };

        let outcome = loop {
            if self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                break SearchOutcome::Cancelled;
            }

            let Some(Reverse((_, idx))) = frontier.pop() else {
                break SearchOutcome::NoSolution;
            };

            let board = arena[idx].board;
            if board == self.goal {
                break SearchOutcome::Solved(reconstruct(&arena, idx));
            }

            if visited.contains(&board) {
                stats.stale_pops += 1;
                continue;
            }

            if self
                .max_expansions
                .is_some_and(|limit| stats.expanded >= limit)
            {
                break SearchOutcome::LimitReached;
            }

            visited.insert(board);
            stats.expanded += 1;
            on_expand(&arena[idx]);

            let g = arena[idx].g + 1;
            trace!(node = idx, board = %board.packed(), g = g - 1, f = arena[idx].f);

            for (mv, child) in board.neighbors() {
                if visited.contains(&child) {
                    continue;
                }
                let h = self.heuristic.estimate(&child);
                let child_idx = arena.len();
                arena.push(SearchNode {
                    board: child,
                    g,
                    h,
                    f: g + h,
                    parent: Some(idx),
                    mv: Some(mv),
                });
                frontier.push(Reverse((g + h, child_idx)));
                stats.generated += 1;
            }
            stats.peak_frontier = stats.peak_frontier.max(frontier.len());
        };

        match &outcome {
            SearchOutcome::Solved(solution) => info!(
                event = "solve_end",
                outcome = outcome.name(),
                moves = solution.len(),
                expanded = stats.expanded,
                generated = stats.generated,
            ),
            _ => info!(
                event = "solve_end",
                outcome = outcome.name(),
                expanded = stats.expanded,
                generated = stats.generated,
            ),
        }
        debug!(
            peak_frontier = stats.peak_frontier,
            stale_pops = stats.stale_pops,
            visited = visited.len(),
        );

        SearchReport { outcome, stats }
    }
}

/// Solves `start` towards [`Board::GOAL`] with no limits.
pub fn solve(start: Board) -> SearchReport {
    Solver::default().solve(start)
}

fn reconstruct(arena: &[SearchNode], goal_idx: usize) -> Solution {
    let mut steps = Vec::new();
    let mut cursor = Some(goal_idx);
    while let Some(idx) = cursor {
        let node = &arena[idx];
        steps.push(Step {
            board: node.board,
            mv: node.mv,
        });
        cursor = node.parent;
    }
    steps.reverse();
    Solution { steps }
}
