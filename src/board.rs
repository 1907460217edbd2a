use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::PuzzleError;

/// Width and height of the grid.
pub const SIZE: usize = 3;
/// Number of cells, blank included.
pub const CELLS: usize = SIZE * SIZE;

/// Direction the blank slides in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Move {
    Right,
    Down,
    Left,
    Up,
}

impl Move {
    /// Candidate order used when expanding a board.
    pub const ALL: [Move; 4] = [Move::Right, Move::Down, Move::Left, Move::Up];

    /// `(row, column)` delta applied to the blank.
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Move::Right => (0, 1),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Up => (-1, 0),
        }
    }

    pub fn inverse(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Move::Right => "right",
            Move::Down => "down",
            Move::Left => "left",
            Move::Up => "up",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A 3x3 configuration, tiles stored row-major with 0 as the blank.
///
/// Boards are values: applying a move returns a new board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>")]
pub struct Board {
    cells: [u8; CELLS],
    blank: u8,
}

impl Board {
    /// Tiles 1..=8 in reading order, blank in the bottom-right corner.
    pub const GOAL: Board = Board {
        cells: [1, 2, 3, 4, 5, 6, 7, 8, 0],
        blank: 8,
    };

    /// Builds a board from raw cells without checking them.
    ///
    /// The search assumes a permutation of 0..=8; use [`Board::from_rows`] or
    /// [`str::parse`] for untrusted input.
    pub fn from_cells(cells: [u8; CELLS]) -> Self {
        let blank = cells.iter().position(|&t| t == 0).unwrap_or(0) as u8;
        Self { cells, blank }
    }

    /// Builds a board from nested rows, rejecting anything that is not a
    /// permutation of 0..=8 laid out 3x3.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, PuzzleError> {
        if rows.len() != SIZE {
            return Err(PuzzleError::WrongRowCount {
                expected: SIZE,
                got: rows.len(),
            });
        }

        let mut cells = [0u8; CELLS];
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != SIZE {
                return Err(PuzzleError::WrongRowWidth {
                    row: i,
                    expected: SIZE,
                    got: row.len(),
                });
            }
            cells[i * SIZE..(i + 1) * SIZE].copy_from_slice(row);
        }

        Self::checked(&cells)
    }

    fn checked(tiles: &[u8]) -> Result<Self, PuzzleError> {
        if tiles.len() != CELLS {
            return Err(PuzzleError::WrongCellCount {
                expected: CELLS,
                got: tiles.len(),
            });
        }

        let mut seen = [false; CELLS];
        for &tile in tiles {
            let slot = seen
                .get_mut(tile as usize)
                .ok_or(PuzzleError::TileOutOfRange { tile })?;
            if *slot {
                return Err(PuzzleError::DuplicateTile { tile });
            }
            *slot = true;
        }

        let mut cells = [0u8; CELLS];
        cells.copy_from_slice(tiles);
        Ok(Self::from_cells(cells))
    }

    pub fn cells(&self) -> &[u8; CELLS] {
        &self.cells
    }

    /// `(row, column)` of the blank.
    pub fn blank(&self) -> (usize, usize) {
        let idx = self.blank as usize;
        (idx / SIZE, idx % SIZE)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(SIZE)
    }

    /// Single-line form, rows joined by `/` (`"103/425/786"`).
    pub fn packed(&self) -> String {
        self.rows()
            .map(|row| row.iter().map(|t| t.to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn target(&self, mv: Move) -> Option<usize> {
        let (row, col) = self.blank();
        let (dr, dc) = mv.offset();
        let new_row = row as isize + dr;
        let new_col = col as isize + dc;

        if (0..SIZE as isize).contains(&new_row) && (0..SIZE as isize).contains(&new_col) {
            Some(new_row as usize * SIZE + new_col as usize)
        } else {
            None
        }
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.target(mv).is_some()
    }

    /// Moves that keep the blank on the grid, in [`Move::ALL`] order.
    pub fn legal_moves(&self) -> Vec<Move> {
        Move::ALL
            .into_iter()
            .filter(|&mv| self.is_legal(mv))
            .collect()
    }

    /// Swaps the blank with its neighbour in direction `mv`.
    pub fn apply_move(&self, mv: Move) -> Result<Self, PuzzleError> {
        let target = self.target(mv).ok_or_else(|| {
            let (row, col) = self.blank();
            PuzzleError::IllegalMove { mv, row, col }
        })?;

        let mut cells = self.cells;
        cells.swap(self.blank as usize, target);
        Ok(Self {
            cells,
            blank: target as u8,
        })
    }

    /// Successor boards paired with the move producing each.
    pub fn neighbors(&self) -> impl Iterator<Item = (Move, Board)> + '_ {
        Move::ALL
            .into_iter()
            .filter_map(move |mv| self.apply_move(mv).ok().map(|next| (mv, next)))
    }

    /// Pairs of tiles out of order, blank excluded.
    pub fn inversions(&self) -> usize {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &val)| val != 0)
            .map(|(i, &val)| {
                self.cells[i + 1..]
                    .iter()
                    .filter(|&&next| next != 0 && next < val)
                    .count()
            })
            .sum()
    }

    /// On an odd-width grid a slide never changes inversion parity, so two
    /// boards are mutually reachable iff their parities match.
    pub fn is_solvable_towards(&self, goal: &Board) -> bool {
        self.inversions() % 2 == goal.inversions() % 2
    }

    pub fn is_solvable(&self) -> bool {
        self.is_solvable_towards(&Self::GOAL)
    }

    /// Uniformly random board that can reach [`Board::GOAL`].
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cells = Self::GOAL.cells;
        loop {
            cells.shuffle(rng);
            let board = Self::from_cells(cells);
            if board.is_solvable() {
                return board;
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::GOAL
    }
}

impl TryFrom<Vec<Vec<u8>>> for Board {
    type Error = PuzzleError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

/// Accepts nine tiles separated by whitespace, commas or slashes
/// (`"1 0 3 4 2 5 7 8 6"`), or packed digits as one or three groups
/// (`"103425786"`, `"103/425/786"`).
impl FromStr for Board {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s
            .split(|c: char| c.is_whitespace() || c == ',' || c == '/')
            .filter(|t| !t.is_empty())
            .collect();

        let tiles = if tokens.len() == CELLS {
            tokens
                .iter()
                .map(|t| {
                    t.parse::<u8>().map_err(|_| PuzzleError::InvalidToken {
                        token: t.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?
        } else if tokens.len() == 1 || tokens.len() == SIZE {
            tokens
                .iter()
                .flat_map(|t| t.chars())
                .map(|c| {
                    c.to_digit(10)
                        .map(|d| d as u8)
                        .ok_or_else(|| PuzzleError::InvalidToken {
                            token: c.to_string(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?
        } else {
            return Err(PuzzleError::WrongCellCount {
                expected: CELLS,
                got: tokens.len(),
            });
        };

        Self::checked(&tiles)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: Vec<String> = row.iter().map(|t| t.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn reference() -> Board {
        Board::from_cells([1, 0, 3, 4, 2, 5, 7, 8, 6])
    }

    #[test]
    fn corner_blank_has_two_moves() {
        assert_eq!(Board::GOAL.legal_moves(), vec![Move::Left, Move::Up]);
    }

    #[test]
    fn edge_blank_has_three_moves() {
        assert_eq!(
            reference().legal_moves(),
            vec![Move::Right, Move::Down, Move::Left]
        );
    }

    #[test]
    fn center_blank_has_all_moves() {
        let board = Board::from_cells([1, 2, 3, 4, 0, 5, 6, 7, 8]);
        assert_eq!(board.legal_moves(), Move::ALL.to_vec());
    }

    #[test]
    fn apply_move_swaps_blank_and_keeps_original() {
        let start = reference();
        let next = start.apply_move(Move::Down).unwrap();
        assert_eq!(next.cells(), &[1, 2, 3, 4, 0, 5, 7, 8, 6]);
        assert_eq!(next.blank(), (1, 1));
        assert_eq!(start.cells(), &[1, 0, 3, 4, 2, 5, 7, 8, 6]);
    }

    #[test]
    fn illegal_move_is_an_error() {
        let err = reference().apply_move(Move::Up).unwrap_err();
        assert_eq!(
            err,
            PuzzleError::IllegalMove {
                mv: Move::Up,
                row: 0,
                col: 1
            }
        );
    }

    #[test]
    fn moves_are_invertible() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let board = Board::shuffled(&mut rng);
            for mv in board.legal_moves() {
                let back = board
                    .apply_move(mv)
                    .and_then(|b| b.apply_move(mv.inverse()))
                    .unwrap();
                assert_eq!(back, board);
            }
        }
    }

    #[test]
    fn legal_moves_stay_on_grid() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let board = Board::shuffled(&mut rng);
            let (row, col) = board.blank();
            for mv in board.legal_moves() {
                let (dr, dc) = mv.offset();
                let r = row as isize + dr;
                let c = col as isize + dc;
                assert!((0..3).contains(&r) && (0..3).contains(&c));
            }
        }
    }

    #[test]
    fn parses_separated_and_packed_forms() {
        let a: Board = "1 0 3 4 2 5 7 8 6".parse().unwrap();
        let b: Board = "103/425/786".parse().unwrap();
        let d: Board = "103425786".parse().unwrap();
        assert_eq!(d, reference());
        let c: Board = "1,0,3,4,2,5,7,8,6".parse().unwrap();
        assert_eq!(a, reference());
        assert_eq!(b, reference());
        assert_eq!(c, reference());
    }

    #[test]
    fn rejects_malformed_boards() {
        assert_eq!(
            "1 2 3".parse::<Board>().unwrap_err(),
            PuzzleError::WrongCellCount {
                expected: 9,
                got: 3
            }
        );
        assert_eq!(
            "1 1 3 4 2 5 7 8 6".parse::<Board>().unwrap_err(),
            PuzzleError::DuplicateTile { tile: 1 }
        );
        assert_eq!(
            "1 9 3 4 2 5 7 8 6".parse::<Board>().unwrap_err(),
            PuzzleError::TileOutOfRange { tile: 9 }
        );
        assert!(matches!(
            "1 x 3 4 2 5 7 8 6".parse::<Board>(),
            Err(PuzzleError::InvalidToken { .. })
        ));
        assert_eq!(
            Board::from_rows(&[vec![1u8, 2, 3], vec![4, 5], vec![6, 7, 8, 0]]).unwrap_err(),
            PuzzleError::WrongRowWidth {
                row: 1,
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn separated_list_with_wrong_count_is_not_read_as_packed() {
        assert_eq!(
            "10 3 4 2 5 7 8 6".parse::<Board>().unwrap_err(),
            PuzzleError::WrongCellCount {
                expected: 9,
                got: 8
            }
        );
        assert_eq!(
            "10/34/25/786".parse::<Board>().unwrap_err(),
            PuzzleError::WrongCellCount {
                expected: 9,
                got: 4
            }
        );
    }

    #[test]
    fn wrong_row_count_reports_rows() {
        let err = Board::from_rows(&[vec![1u8, 0, 3, 4, 2, 5, 7, 8, 6]]).unwrap_err();
        assert_eq!(
            err,
            PuzzleError::WrongRowCount {
                expected: 3,
                got: 1
            }
        );
        assert_eq!(err.to_string(), "board must have 3 rows, got 1");
    }

    #[test]
    fn parity_decides_solvability() {
        assert!(Board::GOAL.is_solvable());
        assert!(reference().is_solvable());
        let swapped = Board::from_cells([2, 1, 3, 4, 5, 6, 7, 8, 0]);
        assert!(!swapped.is_solvable());
        assert!(swapped.is_solvable_towards(&swapped));
    }

    #[test]
    fn shuffled_boards_are_solvable() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert!(Board::shuffled(&mut rng).is_solvable());
        }
    }

    #[test]
    fn packed_form_parses_back() {
        assert_eq!(reference().packed(), "103/425/786");
        assert_eq!(reference().packed().parse::<Board>().unwrap(), reference());
    }

    #[test]
    fn display_prints_rows() {
        assert_eq!(reference().to_string(), "1 0 3\n4 2 5\n7 8 6\n");
    }
}
