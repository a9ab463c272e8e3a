//! Terminal-state detection for any board size and run length.
//!
//! The full scan visits line families in a fixed order: rows, columns,
//! `\` diagonals, then `/` diagonals; within a family, window starts are
//! visited row-major. The first window of `win_count` identical marks wins
//! and is reported as the line. [`check_win_from_move`] walks only the lines
//! through one cell and reports the first window of the run in the same
//! family order, so both agree whenever every winning line passes through
//! that cell.

use crate::board::Board;
use crate::types::{GameStatus, Mark, Position, WinningLine};

/// Rows, columns, `\` diagonals, `/` diagonals.
pub const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

pub fn check_win(board: &Board, win_count: usize) -> Option<WinningLine> {
    let size = board.size();
    for (d_row, d_col) in DIRECTIONS {
        for row in 0..size {
            for col in 0..size {
                let start = Position::new(row, col);
                if let Some(line) = check_window(board, start, d_row, d_col, win_count) {
                    return Some(line);
                }
            }
        }
    }
    None
}

fn check_window(
    board: &Board,
    start: Position,
    d_row: isize,
    d_col: isize,
    win_count: usize,
) -> Option<WinningLine> {
    let mark = board[start];
    if mark == Mark::Empty {
        return None;
    }
    let size = board.size();
    let mut cells = Vec::with_capacity(win_count);
    for i in 0..win_count as isize {
        let pos = start.offset(d_row, d_col, i, size)?;
        if board[pos] != mark {
            return None;
        }
        cells.push(pos);
    }
    Some(WinningLine::new(mark, cells))
}

/// Checks only the four lines through `pos`, in O(win_count) per line.
pub fn check_win_from_move(board: &Board, pos: Position, win_count: usize) -> Option<WinningLine> {
    let mark = board.get(pos)?;
    if mark == Mark::Empty {
        return None;
    }
    let size = board.size();

    for (d_row, d_col) in DIRECTIONS {
        let mut start = pos;
        while let Some(prev) = start.offset(d_row, d_col, -1, size) {
            if board[prev] != mark {
                break;
            }
            start = prev;
        }

        let mut cells = Vec::with_capacity(win_count);
        let mut current = Some(start);
        while let Some(cell) = current {
            if board[cell] != mark || cells.len() == win_count {
                break;
            }
            cells.push(cell);
            current = cell.offset(d_row, d_col, 1, size);
        }

        if cells.len() == win_count {
            return Some(WinningLine::new(mark, cells));
        }
    }
    None
}

pub fn is_full(board: &Board) -> bool {
    board
        .rows()
        .iter()
        .all(|row| row.iter().all(|&cell| cell != Mark::Empty))
}

pub fn is_draw(board: &Board, win_count: usize) -> bool {
    is_full(board) && check_win(board, win_count).is_none()
}

pub fn game_status(board: &Board, win_count: usize) -> GameStatus {
    if let Some(line) = check_win(board, win_count) {
        return GameStatus::won_by(line.mark);
    }
    if is_full(board) {
        return GameStatus::Draw;
    }
    GameStatus::InProgress
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn cells(coords: &[(usize, usize)]) -> Vec<Position> {
        coords.iter().map(|&(r, c)| Position::new(r, c)).collect()
    }

    #[test]
    fn test_row_win() {
        let board = Board::parse("XXX/OO./...").unwrap();
        let line = check_win(&board, 3).unwrap();
        assert_eq!(line.mark, Mark::X);
        assert_eq!(line.cells, cells(&[(0, 0), (0, 1), (0, 2)]));
    }

    #[test]
    fn test_column_win() {
        let board = Board::parse("OX./OX./O..").unwrap();
        let line = check_win(&board, 3).unwrap();
        assert_eq!(line.mark, Mark::O);
        assert_eq!(line.cells, cells(&[(0, 0), (1, 0), (2, 0)]));
    }

    #[test]
    fn test_anti_diagonal_win() {
        let board = Board::parse("..X/.XO/XO.").unwrap();
        let line = check_win(&board, 3).unwrap();
        assert_eq!(line.cells, cells(&[(0, 2), (1, 1), (2, 0)]));
    }

    #[test]
    fn test_win_condition_smaller_than_board() {
        let board = Board::parse("...../.X.../..X../...X./.....").unwrap();
        let line = check_win(&board, 3).unwrap();
        assert_eq!(line.mark, Mark::X);
        assert_eq!(line.cells, cells(&[(1, 1), (2, 2), (3, 3)]));
        assert!(check_win(&board, 4).is_none());
    }

    #[test]
    fn test_rows_reported_before_columns() {
        let board = Board::parse("XXX/X../X..").unwrap();
        let line = check_win(&board, 3).unwrap();
        assert_eq!(line.cells, cells(&[(0, 0), (0, 1), (0, 2)]));
    }

    #[test]
    fn test_no_win_in_progress() {
        let board = Board::parse("XO./.X./..O").unwrap();
        assert!(check_win(&board, 3).is_none());
        assert_eq!(game_status(&board, 3), GameStatus::InProgress);
    }

    #[test]
    fn test_draw() {
        let board = Board::parse("XOX/XOO/OXX").unwrap();
        assert!(is_full(&board));
        assert!(is_draw(&board, 3));
        assert_eq!(game_status(&board, 3), GameStatus::Draw);
    }

    #[test]
    fn test_full_board_with_winner_is_not_draw() {
        let board = Board::parse("XXX/OOX/XOO").unwrap();
        assert!(is_full(&board));
        assert!(!is_draw(&board, 3));
        assert_eq!(game_status(&board, 3), GameStatus::XWon);
    }

    #[test]
    fn test_from_move_reports_run_start() {
        let board = Board::parse("...../OXXXX/...../...../O....").unwrap();
        let line = check_win_from_move(&board, Position::new(1, 3), 3).unwrap();
        assert_eq!(line.cells, cells(&[(1, 1), (1, 2), (1, 3)]));
        assert!(check_win_from_move(&board, Position::new(0, 0), 3).is_none());
    }

    #[test]
    fn test_from_move_matches_full_scan() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let size = rng.random_range(3..=7);
            let win_count = rng.random_range(3..=size);
            let mut board = Board::new(size).unwrap();
            let mut mark = Mark::X;
            loop {
                let moves = board.available_moves();
                if moves.is_empty() {
                    break;
                }
                let pos = moves[rng.random_range(0..moves.len())];
                board.place(pos, mark);

                let fast = check_win_from_move(&board, pos, win_count);
                let full = check_win(&board, win_count);
                assert_eq!(fast, full, "board {} after {:?}", board, pos);
                if full.is_some() {
                    break;
                }
                mark = mark.opponent().unwrap();
            }
        }
    }

    #[test]
    fn test_reported_cells_belong_to_winner() {
        let board = Board::parse("O.../.O../..O./...O").unwrap();
        let line = check_win(&board, 4).unwrap();
        assert!(line.cells.iter().all(|&pos| board[pos] == line.mark));
        assert_eq!(line.start(), Some(Position::new(0, 0)));
        assert_eq!(line.end(), Some(Position::new(3, 3)));
    }
}
