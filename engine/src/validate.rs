//! Checks for inputs arriving from outside the engine.

use crate::board::{Board, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::error::EngineError;
use crate::types::{Mark, Position};

pub fn validate_game_config(size: usize, win_count: usize) -> Result<(), EngineError> {
    if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        return Err(EngineError::InvalidBoardShape {
            size,
            reason: format!(
                "Board size must be between {} and {}",
                MIN_BOARD_SIZE, MAX_BOARD_SIZE
            ),
        });
    }
    if win_count < 3 || win_count > size {
        return Err(EngineError::InvalidWinCondition { win_count, size });
    }
    Ok(())
}

/// X always opens, so X has either as many marks as O or one more.
pub fn validate_board_state(board: &Board) -> Result<(), EngineError> {
    let x_count = board.count(Mark::X);
    let o_count = board.count(Mark::O);
    if x_count < o_count || x_count > o_count + 1 {
        return Err(EngineError::InvalidBoardShape {
            size: board.size(),
            reason: format!("Invalid number of moves: {} X and {} O", x_count, o_count),
        });
    }
    Ok(())
}

/// Side to move on a consistent board.
pub fn player_to_move(board: &Board) -> Result<Mark, EngineError> {
    validate_board_state(board)?;
    if board.count(Mark::X) == board.count(Mark::O) {
        Ok(Mark::X)
    } else {
        Ok(Mark::O)
    }
}

pub fn validate_move(board: &Board, position: Position) -> Result<(), EngineError> {
    if !board.contains(position) {
        return Err(EngineError::InvalidMove {
            position,
            reason: "Position out of bounds".to_string(),
        });
    }
    if !board.is_empty_at(position) {
        return Err(EngineError::InvalidMove {
            position,
            reason: "Cell is already marked".to_string(),
        });
    }
    Ok(())
}
