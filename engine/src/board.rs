use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::EngineError;
use crate::types::{Mark, Position};

pub const MIN_BOARD_SIZE: usize = 3;
pub const MAX_BOARD_SIZE: usize = 10;

/// Square grid of marks, rows outer and columns inner.
///
/// Searches borrow the board mutably and place/clear trial marks in place;
/// every placement is paired with a `clear` before control returns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Vec<Mark>>,
}

impl Board {
    pub fn new(size: usize) -> Result<Self, EngineError> {
        check_size(size)?;
        Ok(Self {
            size,
            cells: vec![vec![Mark::Empty; size]; size],
        })
    }

    pub fn from_rows(rows: Vec<Vec<Mark>>) -> Result<Self, EngineError> {
        let size = rows.len();
        check_size(size)?;
        if let Some(row) = rows.iter().find(|row| row.len() != size) {
            return Err(EngineError::InvalidBoardShape {
                size,
                reason: format!("row of length {} in a board with {} rows", row.len(), size),
            });
        }
        Ok(Self { size, cells: rows })
    }

    /// Parses rows separated by `/`, cells written as `X`, `O`, `.` or `_`.
    pub fn parse(text: &str) -> Result<Self, EngineError> {
        let mut rows = Vec::new();
        for row_text in text.trim().split('/') {
            let mut row = Vec::new();
            for symbol in row_text.trim().chars() {
                let mark = Mark::from_symbol(symbol).ok_or_else(|| EngineError::InvalidBoardShape {
                    size: rows.len(),
                    reason: format!("unknown cell symbol '{}'", symbol),
                })?;
                row.push(mark);
            }
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn rows(&self) -> &[Vec<Mark>] {
        &self.cells
    }

    pub fn get(&self, pos: Position) -> Option<Mark> {
        self.cells.get(pos.row).and_then(|row| row.get(pos.col)).copied()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos) == Some(Mark::Empty)
    }

    pub fn place(&mut self, pos: Position, mark: Mark) {
        self.cells[pos.row][pos.col] = mark;
    }

    pub fn clear(&mut self, pos: Position) {
        self.cells[pos.row][pos.col] = Mark::Empty;
    }

    /// Empty cells in row-major scan order.
    pub fn available_moves(&self) -> Vec<Position> {
        let mut moves = Vec::new();
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, &cell) in cells.iter().enumerate() {
                if cell == Mark::Empty {
                    moves.push(Position::new(row, col));
                }
            }
        }
        moves
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|&&cell| cell == mark).count())
            .sum()
    }

    pub fn empty_count(&self) -> usize {
        self.count(Mark::Empty)
    }

    pub fn move_count(&self) -> usize {
        self.size * self.size - self.empty_count()
    }

    pub fn is_blank(&self) -> bool {
        self.empty_count() == self.size * self.size
    }

    /// Geometric centre coordinate shared by both axes.
    pub fn center(&self) -> f64 {
        (self.size - 1) as f64 / 2.0
    }

    /// The single middle cell of odd boards, the upper-left middle cell of even ones.
    pub fn center_cell(&self) -> Position {
        Position::new(self.size / 2, self.size / 2)
    }

    pub fn center_distance(&self, pos: Position) -> f64 {
        let center = self.center();
        (pos.row as f64 - center).abs() + (pos.col as f64 - center).abs()
    }

    pub fn is_corner(&self, pos: Position) -> bool {
        let last = self.size - 1;
        (pos.row == 0 || pos.row == last) && (pos.col == 0 || pos.col == last)
    }

    pub fn is_edge(&self, pos: Position) -> bool {
        let last = self.size - 1;
        pos.row == 0 || pos.row == last || pos.col == 0 || pos.col == last
    }

    pub fn corners(&self) -> [Position; 4] {
        let last = self.size - 1;
        [
            Position::new(0, 0),
            Position::new(0, last),
            Position::new(last, 0),
            Position::new(last, last),
        ]
    }

    /// Copy with X and O exchanged.
    pub fn swapped(&self) -> Board {
        let cells = self
            .cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&cell| cell.opponent().unwrap_or(Mark::Empty))
                    .collect()
            })
            .collect();
        Board {
            size: self.size,
            cells,
        }
    }

    /// Canonical text form, identical to `Display`.
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    pub(crate) fn write_key_bytes(&self, out: &mut Vec<u8>) {
        for row in &self.cells {
            for &cell in row {
                out.push(cell.symbol() as u8);
            }
        }
    }
}

fn check_size(size: usize) -> Result<(), EngineError> {
    if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        return Err(EngineError::InvalidBoardShape {
            size,
            reason: format!(
                "size must be between {} and {}",
                MIN_BOARD_SIZE, MAX_BOARD_SIZE
            ),
        });
    }
    Ok(())
}

impl Index<Position> for Board {
    type Output = Mark;

    fn index(&self, pos: Position) -> &Mark {
        &self.cells[pos.row][pos.col]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::parse(s)
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
