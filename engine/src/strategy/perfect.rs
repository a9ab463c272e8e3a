use super::alphabeta::{AlphaBetaStrategy, DEFAULT_TABLE_LIMIT};
use super::{BotInput, MoveChoice, MoveReason, Strategy, checked_moves};
use crate::board::Board;
use crate::error::EngineError;
use crate::session_rng::SessionRng;
use crate::types::Position;

pub const DEFAULT_PERFECT_DEPTH: usize = 10;

/// Opening book for the classic 3x3 game, deep alpha-beta everywhere else.
pub struct PerfectStrategy {
    search: AlphaBetaStrategy,
    rng: SessionRng,
}

impl PerfectStrategy {
    pub fn new(rng: SessionRng) -> Self {
        Self::with_depth(DEFAULT_PERFECT_DEPTH, DEFAULT_TABLE_LIMIT, rng)
    }

    pub fn with_depth(depth: usize, table_limit: usize, rng: SessionRng) -> Self {
        Self {
            search: AlphaBetaStrategy::with_table_limit(depth, table_limit),
            rng,
        }
    }

    pub fn depth(&self) -> usize {
        self.search.depth()
    }

    /// First reply on 3x3: centre, or a random corner when the centre is gone.
    fn book_move(&mut self, board: &Board) -> Option<Position> {
        if board.size() != 3 {
            return None;
        }
        let center = board.center_cell();
        match board.move_count() {
            0 => Some(center),
            1 if board.is_empty_at(center) => Some(center),
            1 => self.rng.choose(&board.corners()).copied(),
            _ => None,
        }
    }
}

impl Strategy for PerfectStrategy {
    fn name(&self) -> &'static str {
        "perfect"
    }

    fn select_move(
        &mut self,
        input: &mut BotInput,
        max_thinking_time_ms: u64,
    ) -> Result<MoveChoice, EngineError> {
        checked_moves(input)?;
        if let Some(pos) = self.book_move(&input.board) {
            return Ok(MoveChoice::new(pos, 0.0, MoveReason::OpeningBook));
        }
        self.search.select_move(input, max_thinking_time_ms)
    }

    fn clear_cache(&mut self) {
        self.search.clear_cache();
    }
}
