//! Solves many boards on independent worker threads.
//!
//! Workers share only the read-only input slice; every search owns its own
//! frontier and visited set.

use rand::{rngs::StdRng, SeedableRng};
use std::thread;
use std::time::{Duration, Instant};

use tracing::info;

use crate::board::Board;
use crate::search::{SearchReport, Solver};

#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub start: Board,
    pub report: SearchReport,
    pub elapsed: Duration,
}

/// `count` random solvable boards from a seeded generator.
pub fn random_boards(count: usize, seed: u64) -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| Board::shuffled(&mut rng)).collect()
}

/// Solves `boards` towards `goal` on up to `threads` workers. Results come
/// back in input order.
pub fn solve_all(boards: &[Board], goal: Board, threads: usize) -> Vec<BatchEntry> {
    let threads = threads.clamp(1, boards.len().max(1));
    info!(event = "batch_start", boards = boards.len(), threads);

    let mut slots: Vec<Option<BatchEntry>> = vec![None; boards.len()];
    thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|worker| {
                scope.spawn(move || {
                    let solver = Solver::new(goal);
                    boards
                        .iter()
                        .enumerate()
                        .skip(worker)
                        .step_by(threads)
                        .map(|(idx, &start)| {
                            let started = Instant::now();
                            let report = solver.solve(start);
                            let entry = BatchEntry {
                                start,
                                report,
                                elapsed: started.elapsed(),
                            };
                            (idx, entry)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(results) => {
                    for (idx, entry) in results {
                        slots[idx] = Some(entry);
                    }
                }
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
    });

    let entries: Vec<BatchEntry> = slots.into_iter().flatten().collect();
    let solved = entries
        .iter()
        .filter(|e| e.report.outcome.solution().is_some())
        .count();
    info!(event = "batch_end", solved);
    entries
}
