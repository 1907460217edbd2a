use crate::board::{Board, CELLS, SIZE};

/// Sum of per-tile Manhattan distances to a fixed goal, blank ignored.
///
/// Admissible and consistent for single-tile slides.
#[derive(Debug, Clone)]
pub struct Manhattan {
    /// Goal `(row, column)` of each tile value.
    goal_cells: [(usize, usize); CELLS],
}

impl Manhattan {
    pub fn new(goal: &Board) -> Self {
        let mut goal_cells = [(0, 0); CELLS];
        for (idx, &tile) in goal.cells().iter().enumerate() {
            if let Some(slot) = goal_cells.get_mut(tile as usize) {
                *slot = (idx / SIZE, idx % SIZE);
            }
        }
        Self { goal_cells }
    }

    pub fn estimate(&self, board: &Board) -> u32 {
        board
            .cells()
            .iter()
            .enumerate()
            .filter(|&(_, &tile)| tile != 0)
            .map(|(idx, &tile)| {
                let (goal_row, goal_col) = self.goal_cells[tile as usize];
                let row = idx / SIZE;
                let col = idx % SIZE;
                (row.abs_diff(goal_row) + col.abs_diff(goal_col)) as u32
            })
            .sum()
    }
}

impl Default for Manhattan {
    fn default() -> Self {
        Self::new(&Board::GOAL)
    }
}

/// Manhattan distance to [`Board::GOAL`].
pub fn heuristic(board: &Board) -> u32 {
    Manhattan::default().estimate(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Move;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn goal_scores_zero() {
        assert_eq!(heuristic(&Board::GOAL), 0);
    }

    #[test]
    fn reference_board_scores_three() {
        // tiles 2, 5 and 6 are each one cell away from home
        let board = Board::from_cells([1, 0, 3, 4, 2, 5, 7, 8, 6]);
        assert_eq!(heuristic(&board), 3);
    }

    #[test]
    fn custom_goal_scores_zero_on_itself() {
        let goal = Board::from_cells([0, 1, 2, 3, 4, 5, 6, 7, 8]);
        let h = Manhattan::new(&goal);
        assert_eq!(h.estimate(&goal), 0);
        assert_eq!(h.estimate(&Board::GOAL), 12);
    }

    #[test]
    fn one_slide_changes_estimate_by_one() {
        let h = Manhattan::default();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let board = Board::shuffled(&mut rng);
            for mv in Move::ALL.into_iter().filter(|&mv| board.is_legal(mv)) {
                let next = board.apply_move(mv).unwrap();
                assert_eq!(h.estimate(&board).abs_diff(h.estimate(&next)), 1);
            }
        }
    }
}
