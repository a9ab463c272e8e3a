//! Move-selection strategies, one per difficulty level.

mod alphabeta;
mod heuristic;
mod minimax;
mod perfect;
mod random;
mod transposition;

pub use alphabeta::AlphaBetaStrategy;
pub use heuristic::HeuristicStrategy;
pub use minimax::MinimaxStrategy;
pub use perfect::PerfectStrategy;
pub use random::RandomStrategy;
pub use transposition::{Bound, PositionKey, TTEntry, TranspositionTable};

use std::fmt;

use serde::Serialize;

use crate::board::Board;
use crate::error::EngineError;
use crate::evaluator::{DetailedEvaluation, Evaluator};
use crate::types::{Mark, Position};
use crate::win_detector::{check_win_from_move, is_full};

/// Everything a strategy needs to pick a move.
#[derive(Debug, Clone)]
pub struct BotInput {
    pub board: Board,
    pub win_count: usize,
    pub current_mark: Mark,
}

impl BotInput {
    pub fn new(board: Board, win_count: usize, current_mark: Mark) -> Result<Self, EngineError> {
        let input = Self {
            board,
            win_count,
            current_mark,
        };
        input.validate()?;
        Ok(input)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let size = self.board.size();
        if self.win_count < 3 || self.win_count > size {
            return Err(EngineError::InvalidWinCondition {
                win_count: self.win_count,
                size,
            });
        }
        if !self.current_mark.is_player() {
            return Err(EngineError::InvalidPlayer);
        }
        Ok(())
    }

    pub fn opponent_mark(&self) -> Result<Mark, EngineError> {
        self.current_mark.opponent().ok_or(EngineError::InvalidPlayer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveReason {
    WinningMove,
    BlockingOpponent,
    CenterPosition,
    CornerPosition,
    OpeningBook,
    HeuristicPosition,
    RandomChoice,
    SearchResult,
}

impl fmt::Display for MoveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MoveReason::WinningMove => "Winning move",
            MoveReason::BlockingOpponent => "Blocking opponent",
            MoveReason::CenterPosition => "Center position",
            MoveReason::CornerPosition => "Corner position",
            MoveReason::OpeningBook => "Opening book move",
            MoveReason::HeuristicPosition => "Best heuristic position",
            MoveReason::RandomChoice => "Random choice",
            MoveReason::SearchResult => "Best move according to AI",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveChoice {
    pub position: Position,
    pub evaluation: f64,
    pub reason: Option<MoveReason>,
}

impl MoveChoice {
    pub fn new(position: Position, evaluation: f64, reason: MoveReason) -> Self {
        Self {
            position,
            evaluation,
            reason: Some(reason),
        }
    }

    pub fn searched(position: Position, evaluation: f64) -> Self {
        Self {
            position,
            evaluation,
            reason: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Advantage {
    X,
    O,
    #[serde(rename = "equal")]
    Equal,
}

impl Advantage {
    pub fn from_evaluation(evaluation: f64, player: Mark) -> Self {
        let leader = if evaluation > 0.0 {
            Some(player)
        } else if evaluation < 0.0 {
            player.opponent()
        } else {
            None
        };
        match leader {
            Some(Mark::X) => Advantage::X,
            Some(Mark::O) => Advantage::O,
            _ => Advantage::Equal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionAnalysis {
    pub evaluation: f64,
    pub advantage: Advantage,
    pub details: DetailedEvaluation,
}

/// Common contract of all difficulty levels.
///
/// `select_move` may place and clear trial marks on `input.board` but leaves
/// it exactly as it found it on every return path. `max_thinking_time_ms` is
/// advisory; searches run to completion.
pub trait Strategy: Send {
    fn name(&self) -> &'static str;

    fn select_move(
        &mut self,
        input: &mut BotInput,
        max_thinking_time_ms: u64,
    ) -> Result<MoveChoice, EngineError>;

    fn analyze_position(&self, input: &BotInput) -> Result<PositionAnalysis, EngineError> {
        input.validate()?;
        let evaluator = Evaluator::for_board(&input.board, input.win_count);
        let evaluation = evaluator.evaluate(&input.board, input.current_mark);
        Ok(PositionAnalysis {
            evaluation,
            advantage: Advantage::from_evaluation(evaluation, input.current_mark),
            details: evaluator.detailed(&input.board, input.current_mark),
        })
    }

    /// Drops any memoised search results.
    fn clear_cache(&mut self) {}
}

pub(crate) fn checked_moves(input: &BotInput) -> Result<Vec<Position>, EngineError> {
    input.validate()?;
    let moves = input.board.available_moves();
    if moves.is_empty() {
        return Err(EngineError::NoValidMoves);
    }
    Ok(moves)
}

pub fn find_winning_move(
    board: &mut Board,
    mark: Mark,
    win_count: usize,
    moves: &[Position],
) -> Option<Position> {
    for &pos in moves {
        board.place(pos, mark);
        let winner = check_win_from_move(board, pos, win_count);
        board.clear(pos);

        if winner.is_some() {
            return Some(pos);
        }
    }
    None
}

/// Terminal value of the position reached by `last_move`, from `ai_mark`'s side.
pub(crate) fn terminal_score(
    board: &Board,
    last_move: Position,
    win_count: usize,
    ai_mark: Mark,
    win_score: f64,
) -> Option<f64> {
    if let Some(line) = check_win_from_move(board, last_move, win_count) {
        return Some(if line.mark == ai_mark { win_score } else { -win_score });
    }
    if is_full(board) {
        return Some(0.0);
    }
    None
}
