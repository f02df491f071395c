//! The board engine: a 15×15 grid that knows whose turn it is and when
//! the game is over.
//!
//! [`Board::place`] is the only mutating operation. It returns `None` for a
//! move it refuses (game over, off the board, occupied cell) and
//! `Some(winner)` for a move it accepts, where `winner` is
//! [`Winner::None`] while play continues.

use gobang_protocol::{Stone, Winner};

/// Width and height of the board.
pub const BOARD_SIZE: usize = 15;

/// Number of cells; placing this many stones without a line ends in a draw.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Stones in a row needed to win.
pub const WIN_LENGTH: usize = 5;

/// Axes probed from each stone: right, down, down-right, up-right.
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Grid state for one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Stone; BOARD_SIZE]; BOARD_SIZE],
    count: usize,
    playing: bool,
    turn: Stone,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board with black to move.
    pub fn new() -> Self {
        Self {
            cells: [[Stone::None; BOARD_SIZE]; BOARD_SIZE],
            count: 0,
            playing: true,
            turn: Stone::Black,
        }
    }

    /// The color that moves next.
    pub fn turn(&self) -> Stone {
        self.turn
    }

    /// `false` once a move has won or drawn the game.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn stone_count(&self) -> usize {
        self.count
    }

    /// The stone at `(x, y)`, or `None` if the coordinates are off the board.
    pub fn cell(&self, x: i32, y: i32) -> Option<Stone> {
        let (x, y) = index(x, y)?;
        Some(self.cells[x][y])
    }

    /// Places the current turn's stone at `(x, y)`.
    ///
    /// Returns `None` and leaves the board untouched if the game is over,
    /// the coordinates are off the board, or the cell is taken. Otherwise
    /// returns the outcome of the move: the mover's color on a win,
    /// [`Winner::Draw`] when the last cell fills, or [`Winner::None`] and
    /// the turn passes.
    pub fn place(&mut self, x: i32, y: i32) -> Option<Winner> {
        if !self.playing {
            return None;
        }
        let (cx, cy) = index(x, y)?;
        if self.cells[cx][cy] != Stone::None {
            return None;
        }

        let mover = self.turn;
        self.cells[cx][cy] = mover;
        self.count += 1;

        if self.has_line(mover) {
            self.playing = false;
            return Some(Winner::from(mover));
        }
        if self.count == CELL_COUNT {
            self.playing = false;
            return Some(Winner::Draw);
        }

        self.turn = mover.opponent();
        Some(Winner::None)
    }

    /// Scans every stone of `color` for a run of [`WIN_LENGTH`].
    fn has_line(&self, color: Stone) -> bool {
        for x in 0..BOARD_SIZE as i32 {
            for y in 0..BOARD_SIZE as i32 {
                if self.cell(x, y) != Some(color) {
                    continue;
                }
                for (dx, dy) in DIRECTIONS {
                    if self.run_length(color, x, y, dx, dy) >= WIN_LENGTH {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Consecutive `color` stones starting at `(x, y)` along `(dx, dy)`,
    /// looking at most `WIN_LENGTH - 1` cells past the start.
    fn run_length(&self, color: Stone, x: i32, y: i32, dx: i32, dy: i32) -> usize {
        let mut run = 1;
        for step in 1..WIN_LENGTH as i32 {
            if self.cell(x + dx * step, y + dy * step) == Some(color) {
                run += 1;
            } else {
                break;
            }
        }
        run
    }
}

fn index(x: i32, y: i32) -> Option<(usize, usize)> {
    let x = usize::try_from(x).ok()?;
    let y = usize::try_from(y).ok()?;
    (x < BOARD_SIZE && y < BOARD_SIZE).then_some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plays alternating moves; panics if any is refused.
    fn play(board: &mut Board, moves: &[(i32, i32)]) -> Winner {
        let mut last = Winner::None;
        for &(x, y) in moves {
            last = board.place(x, y).unwrap_or_else(|| panic!("move ({x}, {y}) refused"));
        }
        last
    }

    #[test]
    fn test_new_board_black_to_move() {
        let board = Board::new();
        assert_eq!(board.turn(), Stone::Black);
        assert!(board.is_playing());
        assert_eq!(board.stone_count(), 0);
    }

    #[test]
    fn test_place_accepts_once_per_cell() {
        let mut board = Board::new();
        assert_eq!(board.place(7, 7), Some(Winner::None));
        assert_eq!(board.cell(7, 7), Some(Stone::Black));

        let before = board.clone();
        assert_eq!(board.place(7, 7), None);
        assert_eq!(board, before);
    }

    #[test]
    fn test_turn_alternates_and_holds_on_rejection() {
        let mut board = Board::new();
        board.place(0, 0);
        assert_eq!(board.turn(), Stone::White);
        board.place(1, 0);
        assert_eq!(board.turn(), Stone::Black);

        assert_eq!(board.place(1, 0), None);
        assert_eq!(board.turn(), Stone::Black);
        assert_eq!(board.stone_count(), 2);
    }

    #[test]
    fn test_place_off_board_is_refused() {
        let mut board = Board::new();
        for (x, y) in [(-1, 0), (0, -1), (15, 0), (0, 15), (i32::MIN, i32::MAX)] {
            assert_eq!(board.place(x, y), None);
        }
        assert_eq!(board.stone_count(), 0);
        assert_eq!(board.cell(15, 15), None);
    }

    #[test]
    fn test_five_across_wins() {
        let mut board = Board::new();
        // Black on row y=0, white on row y=1.
        let winner = play(
            &mut board,
            &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1), (3, 0), (3, 1), (4, 0)],
        );
        assert_eq!(winner, Winner::Black);
        assert!(!board.is_playing());
    }

    #[test]
    fn test_five_down_wins_for_white() {
        let mut board = Board::new();
        let winner = play(
            &mut board,
            &[
                (0, 0), (5, 5),
                (0, 2), (5, 6),
                (0, 4), (5, 7),
                (0, 6), (5, 8),
                (0, 8), (5, 9),
            ],
        );
        assert_eq!(winner, Winner::White);
        assert!(!board.is_playing());
    }

    #[test]
    fn test_diagonals_win() {
        let mut board = Board::new();
        let winner = play(
            &mut board,
            &[(2, 2), (0, 14), (3, 3), (1, 14), (4, 4), (2, 14), (5, 5), (3, 14), (6, 6)],
        );
        assert_eq!(winner, Winner::Black);

        let mut board = Board::new();
        let winner = play(
            &mut board,
            &[(10, 4), (0, 0), (11, 3), (2, 0), (12, 2), (4, 0), (13, 1), (6, 0), (14, 0)],
        );
        assert_eq!(winner, Winner::Black);
    }

    #[test]
    fn test_completing_stone_in_the_middle_wins() {
        let mut board = Board::new();
        let winner = play(
            &mut board,
            &[(3, 7), (0, 0), (4, 7), (0, 2), (6, 7), (0, 4), (7, 7), (0, 6), (5, 7)],
        );
        assert_eq!(winner, Winner::Black);
    }

    #[test]
    fn test_gap_does_not_win() {
        let mut board = Board::new();
        let winner = play(
            &mut board,
            &[(0, 0), (0, 5), (1, 0), (1, 5), (2, 0), (2, 5), (3, 0), (3, 5), (5, 0)],
        );
        assert_eq!(winner, Winner::None);
        assert!(board.is_playing());
        assert_eq!(board.turn(), Stone::White);
    }

    #[test]
    fn test_no_moves_after_game_over() {
        let mut board = Board::new();
        play(
            &mut board,
            &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1), (3, 0), (3, 1), (4, 0)],
        );
        assert_eq!(board.place(10, 10), None);
        assert_eq!(board.cell(10, 10), Some(Stone::None));
        assert_eq!(board.stone_count(), 9);
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        // Pairs of columns alternate color row by row, so no color ever
        // gets more than two in a row along any axis.
        let color = |x: i32, y: i32| ((x / 2) + y) % 2;
        let mut black = Vec::new();
        let mut white = Vec::new();
        for x in 0..BOARD_SIZE as i32 {
            for y in 0..BOARD_SIZE as i32 {
                if color(x, y) == 0 {
                    black.push((x, y));
                } else {
                    white.push((x, y));
                }
            }
        }
        assert_eq!(black.len(), 113);
        assert_eq!(white.len(), 112);

        let mut board = Board::new();
        for i in 0..white.len() {
            assert_eq!(board.place(black[i].0, black[i].1), Some(Winner::None));
            assert_eq!(board.place(white[i].0, white[i].1), Some(Winner::None));
        }
        let last = black[112];
        assert_eq!(board.place(last.0, last.1), Some(Winner::Draw));
        assert!(!board.is_playing());
        assert_eq!(board.stone_count(), CELL_COUNT);
    }
}
