//! Static scoring of non-terminal positions.
//!
//! Net score for `player`:
//! `line(player) - line(opponent) + 0.5 * (position(player) - position(opponent)) + 0.2 * mobility`.
//! Mobility counts empty cells and is the same for both players, so it is
//! the one term that does not flip sign when the perspective changes.

use serde::Serialize;

use crate::board::Board;
use crate::types::{Mark, Position};
use crate::win_detector::DIRECTIONS;

const WIN_WINDOW_SCORE: i32 = 100;
const NEAR_WIN_SCORE: i32 = 10;
const POTENTIAL_SCORE: i32 = 3;
const PRESENCE_SCORE: i32 = 1;

const POSITION_WEIGHT: f64 = 0.5;
const MOBILITY_WEIGHT: f64 = 0.2;
const CORNER_BONUS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatKind {
    Immediate,
}

/// A window holding `win_count - 1` marks of one player and a single empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Threat {
    pub kind: ThreatKind,
    pub mark: Mark,
    pub line: Vec<Position>,
    pub open_cell: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedEvaluation {
    pub line_score: i32,
    pub opponent_line_score: i32,
    pub position_score: f64,
    pub opponent_position_score: f64,
    pub mobility_score: usize,
    /// Opponent lines one move away from completion.
    pub threats: Vec<Threat>,
    /// Own lines one move away from completion.
    pub opportunities: Vec<Threat>,
}

/// Evaluator bound to one board geometry; the window list is built once.
#[derive(Debug, Clone)]
pub struct Evaluator {
    win_count: usize,
    windows: Vec<Vec<Position>>,
}

impl Evaluator {
    pub fn new(size: usize, win_count: usize) -> Self {
        Self {
            win_count,
            windows: build_windows(size, win_count),
        }
    }

    pub fn for_board(board: &Board, win_count: usize) -> Self {
        Self::new(board.size(), win_count)
    }

    pub fn win_count(&self) -> usize {
        self.win_count
    }

    pub fn windows(&self) -> &[Vec<Position>] {
        &self.windows
    }

    pub fn evaluate(&self, board: &Board, player: Mark) -> f64 {
        let Some(opponent) = player.opponent() else {
            return 0.0;
        };

        let mut score = f64::from(self.line_score(board, player));
        score -= f64::from(self.line_score(board, opponent));
        score += position_score(board, player) * POSITION_WEIGHT;
        score -= position_score(board, opponent) * POSITION_WEIGHT;
        score += mobility_score(board) as f64 * MOBILITY_WEIGHT;
        score
    }

    pub fn detailed(&self, board: &Board, player: Mark) -> DetailedEvaluation {
        let opponent = player.opponent().unwrap_or(Mark::Empty);
        DetailedEvaluation {
            line_score: self.line_score(board, player),
            opponent_line_score: self.line_score(board, opponent),
            position_score: position_score(board, player),
            opponent_position_score: position_score(board, opponent),
            mobility_score: mobility_score(board),
            threats: self.immediate_threats(board, opponent),
            opportunities: self.immediate_threats(board, player),
        }
    }

    /// Sum of window scores over every `win_count`-long window of every line.
    pub fn line_score(&self, board: &Board, player: Mark) -> i32 {
        let Some(opponent) = player.opponent() else {
            return 0;
        };
        self.windows
            .iter()
            .map(|window| self.window_score(board, window, player, opponent))
            .sum()
    }

    fn window_score(&self, board: &Board, window: &[Position], player: Mark, opponent: Mark) -> i32 {
        let mut own = 0;
        let mut other = 0;
        for &pos in window {
            let cell = board[pos];
            if cell == player {
                own += 1;
            } else if cell == opponent {
                other += 1;
            }
        }
        let empty = self.win_count - own - other;

        if own > 0 && other > 0 {
            return 0;
        }
        if own == self.win_count {
            WIN_WINDOW_SCORE
        } else if own + 1 == self.win_count && empty >= 1 {
            NEAR_WIN_SCORE
        } else if own + 2 == self.win_count && empty >= 2 {
            POTENTIAL_SCORE
        } else if own > 0 {
            PRESENCE_SCORE
        } else {
            0
        }
    }

    /// Windows where `mark` is one placement away from winning.
    pub fn immediate_threats(&self, board: &Board, mark: Mark) -> Vec<Threat> {
        if !mark.is_player() {
            return Vec::new();
        }
        let mut threats = Vec::new();
        for window in &self.windows {
            let mut own = 0;
            let mut open_cells = Vec::new();
            for &pos in window {
                match board[pos] {
                    Mark::Empty => open_cells.push(pos),
                    cell if cell == mark => own += 1,
                    _ => {}
                }
            }
            if own + 1 == self.win_count && open_cells.len() == 1 {
                threats.push(Threat {
                    kind: ThreatKind::Immediate,
                    mark,
                    line: window.clone(),
                    open_cell: open_cells[0],
                });
            }
        }
        threats
    }
}

/// Rewards cells near the centre (`size - manhattan distance`) plus a corner bonus.
pub fn position_score(board: &Board, player: Mark) -> f64 {
    if !player.is_player() {
        return 0.0;
    }
    let size = board.size() as f64;
    let mut score = 0.0;
    for (row, cells) in board.rows().iter().enumerate() {
        for (col, &cell) in cells.iter().enumerate() {
            if cell != player {
                continue;
            }
            let pos = Position::new(row, col);
            score += size - board.center_distance(pos);
            if board.is_corner(pos) {
                score += CORNER_BONUS;
            }
        }
    }
    score
}

pub fn mobility_score(board: &Board) -> usize {
    board.empty_count()
}

fn build_windows(size: usize, win_count: usize) -> Vec<Vec<Position>> {
    let mut windows = Vec::new();
    for (d_row, d_col) in DIRECTIONS {
        for row in 0..size {
            for col in 0..size {
                let start = Position::new(row, col);
                let window: Option<Vec<Position>> = (0..win_count as isize)
                    .map(|i| start.offset(d_row, d_col, i, size))
                    .collect();
                if let Some(window) = window {
                    windows.push(window);
                }
            }
        }
    }
    windows
}
