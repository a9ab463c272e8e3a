use serde::Serialize;

use crate::board::Board;
use crate::error::EngineError;
use crate::strategy::BotInput;
use crate::types::{GameStatus, Mark, Position, WinningLine};
use crate::validate::{validate_game_config, validate_move};
use crate::win_detector::check_win_from_move;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlayedMove {
    pub mark: Mark,
    pub position: Position,
}

/// A game in progress: board, side to move, result and history. X opens.
#[derive(Debug, Clone, Serialize)]
pub struct Game {
    board: Board,
    win_count: usize,
    current_mark: Mark,
    status: GameStatus,
    winning_line: Option<WinningLine>,
    history: Vec<PlayedMove>,
}

impl Game {
    pub fn new(size: usize, win_count: usize) -> Result<Self, EngineError> {
        validate_game_config(size, win_count)?;
        Ok(Self {
            board: Board::new(size)?,
            win_count,
            current_mark: Mark::X,
            status: GameStatus::InProgress,
            winning_line: None,
            history: Vec::new(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn win_count(&self) -> usize {
        self.win_count
    }

    pub fn current_mark(&self) -> Mark {
        self.current_mark
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn winning_line(&self) -> Option<&WinningLine> {
        self.winning_line.as_ref()
    }

    pub fn history(&self) -> &[PlayedMove] {
        &self.history
    }

    /// Snapshot for a strategy to search from, with the side to move.
    pub fn bot_input(&self) -> Result<BotInput, EngineError> {
        BotInput::new(self.board.clone(), self.win_count, self.current_mark)
    }

    pub fn place_mark(&mut self, mark: Mark, position: Position) -> Result<GameStatus, EngineError> {
        if self.status.is_over() {
            return Err(EngineError::GameOver);
        }
        if mark != self.current_mark {
            return Err(EngineError::NotYourTurn {
                expected: self.current_mark,
                found: mark,
            });
        }
        validate_move(&self.board, position)?;

        self.board.place(position, mark);
        self.history.push(PlayedMove { mark, position });

        if let Some(line) = check_win_from_move(&self.board, position, self.win_count) {
            self.status = GameStatus::won_by(line.mark);
            self.winning_line = Some(line);
        } else if self.board.empty_count() == 0 {
            self.status = GameStatus::Draw;
        } else if let Some(next) = mark.opponent() {
            self.current_mark = next;
        }

        Ok(self.status)
    }

    /// Takes back the last move; the game is in progress again afterwards.
    pub fn undo_last(&mut self) -> Option<PlayedMove> {
        let last = self.history.pop()?;
        self.board.clear(last.position);
        self.current_mark = last.mark;
        self.status = GameStatus::InProgress;
        self.winning_line = None;
        Some(last)
    }
}
