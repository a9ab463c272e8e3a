use std::fmt;

use crate::types::{Mark, Position};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    NoValidMoves,
    UnknownDifficulty(String),
    InvalidBoardShape { size: usize, reason: String },
    InvalidWinCondition { win_count: usize, size: usize },
    InvalidPlayer,
    InvalidMove { position: Position, reason: String },
    NotYourTurn { expected: Mark, found: Mark },
    GameOver,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::NoValidMoves => write!(f, "No valid moves available"),
            EngineError::UnknownDifficulty(label) => write!(f, "Unknown difficulty: {}", label),
            EngineError::InvalidBoardShape { size, reason } => {
                write!(f, "Invalid board shape (size {}): {}", size, reason)
            }
            EngineError::InvalidWinCondition { win_count, size } => write!(
                f,
                "Win condition {} must be between 3 and the board size {}",
                win_count, size
            ),
            EngineError::InvalidPlayer => write!(f, "Player must be X or O"),
            EngineError::InvalidMove { position, reason } => {
                write!(f, "Invalid move at ({}, {}): {}", position.row, position.col, reason)
            }
            EngineError::NotYourTurn { expected, found } => {
                write!(f, "Not your turn: expected {}, got {}", expected, found)
            }
            EngineError::GameOver => write!(f, "Game is already over"),
        }
    }
}

impl std::error::Error for EngineError {}
