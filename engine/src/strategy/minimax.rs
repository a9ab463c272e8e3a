use super::{BotInput, MoveChoice, MoveReason, Strategy, checked_moves, terminal_score};
use crate::board::Board;
use crate::error::EngineError;
use crate::evaluator::Evaluator;
use crate::types::{Mark, Position};

pub const DEFAULT_MINIMAX_DEPTH: usize = 4;
pub const MINIMAX_WIN_SCORE: f64 = 10.0;

/// Plain depth-limited minimax, no pruning.
pub struct MinimaxStrategy {
    depth: usize,
    win_score: f64,
    nodes: u64,
}

impl Default for MinimaxStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_MINIMAX_DEPTH)
    }
}

impl MinimaxStrategy {
    pub fn new(depth: usize) -> Self {
        Self::with_win_score(depth, MINIMAX_WIN_SCORE)
    }

    /// Same search with a different terminal magnitude, used to compare
    /// against alpha-beta on its ±100 scale.
    pub fn with_win_score(depth: usize, win_score: f64) -> Self {
        Self {
            depth: depth.max(1),
            win_score,
            nodes: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn nodes_searched(&self) -> u64 {
        self.nodes
    }

    fn minimax(
        &mut self,
        board: &mut Board,
        evaluator: &Evaluator,
        depth: usize,
        is_maximizing: bool,
        bot_mark: Mark,
        opponent_mark: Mark,
        last_move: Position,
    ) -> f64 {
        self.nodes += 1;
        let win_count = evaluator.win_count();

        if let Some(score) = terminal_score(board, last_move, win_count, bot_mark, self.win_score) {
            return score;
        }

        if depth == 0 {
            return evaluator.evaluate(board, bot_mark);
        }

        let mover = if is_maximizing { bot_mark } else { opponent_mark };
        let mut best = if is_maximizing { f64::NEG_INFINITY } else { f64::INFINITY };

        for pos in board.available_moves() {
            board.place(pos, mover);
            let eval = self.minimax(
                board,
                evaluator,
                depth - 1,
                !is_maximizing,
                bot_mark,
                opponent_mark,
                pos,
            );
            board.clear(pos);

            best = if is_maximizing { best.max(eval) } else { best.min(eval) };
        }

        best
    }
}

impl Strategy for MinimaxStrategy {
    fn name(&self) -> &'static str {
        "minimax"
    }

    fn select_move(
        &mut self,
        input: &mut BotInput,
        _max_thinking_time_ms: u64,
    ) -> Result<MoveChoice, EngineError> {
        let moves = checked_moves(input)?;
        let bot_mark = input.current_mark;
        let opponent_mark = input.opponent_mark()?;
        let board = &mut input.board;
        self.nodes = 0;

        if board.is_blank() {
            return Ok(if board.size() == 3 {
                MoveChoice::new(Position::new(1, 1), 0.0, MoveReason::CenterPosition)
            } else {
                MoveChoice::new(Position::new(0, 0), 0.0, MoveReason::CornerPosition)
            });
        }

        let evaluator = Evaluator::for_board(board, input.win_count);
        let mut best_move = moves[0];
        let mut best_score = f64::NEG_INFINITY;

        for &pos in &moves {
            board.place(pos, bot_mark);
            let score = self.minimax(
                board,
                &evaluator,
                self.depth - 1,
                false,
                bot_mark,
                opponent_mark,
                pos,
            );
            board.clear(pos);

            if score > best_score {
                best_score = score;
                best_move = pos;
            }
        }

        Ok(MoveChoice::searched(best_move, best_score))
    }
}
