use super::transposition::{Bound, PositionKey, TTEntry, TranspositionTable};
use super::{BotInput, MoveChoice, MoveReason, Strategy, checked_moves, terminal_score};
use crate::board::Board;
use crate::error::EngineError;
use crate::evaluator::Evaluator;
use crate::types::{Mark, Position};

pub const DEFAULT_ALPHA_BETA_DEPTH: usize = 6;
pub const ALPHA_BETA_WIN_SCORE: f64 = 100.0;
pub const DEFAULT_TABLE_LIMIT: usize = 1_000_000;

const ORDER_CENTER_WEIGHT: f64 = 2.0;
const ORDER_CORNER_BONUS: f64 = 5.0;

/// Minimax with alpha-beta pruning, centrality-ordered moves and a
/// transposition table that lives as long as the strategy.
pub struct AlphaBetaStrategy {
    depth: usize,
    table: TranspositionTable,
    nodes: u64,
}

impl Default for AlphaBetaStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA_BETA_DEPTH)
    }
}

struct SearchContext<'a> {
    evaluator: &'a Evaluator,
    ai_mark: Mark,
    opponent_mark: Mark,
}

impl AlphaBetaStrategy {
    pub fn new(depth: usize) -> Self {
        Self::with_table_limit(depth, DEFAULT_TABLE_LIMIT)
    }

    pub fn with_table_limit(depth: usize, table_limit: usize) -> Self {
        Self {
            depth: depth.max(1),
            table: TranspositionTable::new(table_limit),
            nodes: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn nodes_searched(&self) -> u64 {
        self.nodes
    }

    pub fn table(&self) -> &TranspositionTable {
        &self.table
    }

    /// Empty cells scored by `(size - centre distance) * 2` plus a flat corner
    /// bonus, best first. On 3×3 the bonus puts corners ahead of the centre.
    /// Equal scores keep row-major order.
    pub fn order_moves(board: &Board) -> Vec<Position> {
        let size = board.size() as f64;
        let score = |pos: Position| {
            let mut score = (size - board.center_distance(pos)) * ORDER_CENTER_WEIGHT;
            if board.is_corner(pos) {
                score += ORDER_CORNER_BONUS;
            }
            score
        };

        let mut moves = board.available_moves();
        moves.sort_by(|a, b| score(*b).total_cmp(&score(*a)));
        moves
    }

    fn alpha_beta(
        &mut self,
        board: &mut Board,
        ctx: &SearchContext,
        depth: usize,
        mut alpha: f64,
        mut beta: f64,
        is_maximizing: bool,
        last_move: Position,
    ) -> f64 {
        self.nodes += 1;
        let win_count = ctx.evaluator.win_count();

        if let Some(score) = terminal_score(board, last_move, win_count, ctx.ai_mark, ALPHA_BETA_WIN_SCORE) {
            return score;
        }

        if depth == 0 {
            return ctx.evaluator.evaluate(board, ctx.ai_mark);
        }

        let mover = if is_maximizing { ctx.ai_mark } else { ctx.opponent_mark };
        let key = PositionKey::new(board, win_count, ctx.ai_mark, mover);

        if let Some(entry) = self.table.probe(&key, depth) {
            match entry.bound {
                Bound::Exact => return entry.score,
                Bound::Lower => alpha = alpha.max(entry.score),
                Bound::Upper => beta = beta.min(entry.score),
            }
            if alpha >= beta {
                return entry.score;
            }
        }

        // Bound flags are judged against the window this node actually searched.
        let (window_alpha, window_beta) = (alpha, beta);
        let mut best = if is_maximizing { f64::NEG_INFINITY } else { f64::INFINITY };

        for pos in Self::order_moves(board) {
            board.place(pos, mover);
            let eval = self.alpha_beta(board, ctx, depth - 1, alpha, beta, !is_maximizing, pos);
            board.clear(pos);

            if is_maximizing {
                best = best.max(eval);
                alpha = alpha.max(eval);
            } else {
                best = best.min(eval);
                beta = beta.min(eval);
            }

            if beta <= alpha {
                break;
            }
        }

        let bound = if best <= window_alpha {
            Bound::Upper
        } else if best >= window_beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.table.store(
            key,
            TTEntry {
                score: best,
                depth,
                bound,
            },
        );

        best
    }
}

impl Strategy for AlphaBetaStrategy {
    fn name(&self) -> &'static str {
        "alpha-beta"
    }

    fn select_move(
        &mut self,
        input: &mut BotInput,
        _max_thinking_time_ms: u64,
    ) -> Result<MoveChoice, EngineError> {
        checked_moves(input)?;
        let ai_mark = input.current_mark;
        let opponent_mark = input.opponent_mark()?;
        let board = &mut input.board;
        self.nodes = 0;

        if board.is_blank() {
            return Ok(MoveChoice::new(board.center_cell(), 0.0, MoveReason::CenterPosition));
        }

        let evaluator = Evaluator::for_board(board, input.win_count);
        let ctx = SearchContext {
            evaluator: &evaluator,
            ai_mark,
            opponent_mark,
        };

        let moves = Self::order_moves(board);
        let mut best_move = moves[0];
        let mut best_score = f64::NEG_INFINITY;
        let mut alpha = f64::NEG_INFINITY;

        for pos in moves {
            board.place(pos, ai_mark);
            let score = self.alpha_beta(board, &ctx, self.depth - 1, alpha, f64::INFINITY, false, pos);
            board.clear(pos);

            if score > best_score {
                best_score = score;
                best_move = pos;
            }
            alpha = alpha.max(best_score);
        }

        crate::log_debug!(
            "alpha-beta depth {} searched {} nodes, table holds {} entries",
            self.depth,
            self.nodes,
            self.table.len()
        );
        Ok(MoveChoice::searched(best_move, best_score))
    }

    fn clear_cache(&mut self) {
        self.table.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::MinimaxStrategy;

    fn select(strategy: &mut AlphaBetaStrategy, text: &str, mark: Mark) -> MoveChoice {
        let mut input = BotInput::new(Board::parse(text).unwrap(), 3, mark).unwrap();
        let before = input.board.clone();
        let choice = strategy.select_move(&mut input, 2000).unwrap();
        assert_eq!(input.board, before);
        choice
    }

    #[test]
    fn test_empty_board_takes_center() {
        let mut strategy = AlphaBetaStrategy::default();
        let choice = select(&mut strategy, ".../.../...", Mark::X);
        assert_eq!(choice.position, Position::new(1, 1));
        assert_eq!(choice.evaluation, 0.0);

        let mut input = BotInput::new(Board::new(5).unwrap(), 4, Mark::O).unwrap();
        let choice = strategy.select_move(&mut input, 0).unwrap();
        assert_eq!(choice.position, Position::new(2, 2));
    }

    #[test]
    fn test_takes_immediate_win() {
        let mut strategy = AlphaBetaStrategy::default();
        let choice = select(&mut strategy, "XX./OO./...", Mark::X);
        assert_eq!(choice.position, Position::new(0, 2));
        assert_eq!(choice.evaluation, ALPHA_BETA_WIN_SCORE);
    }

    #[test]
    fn test_blocks_threat() {
        let mut strategy = AlphaBetaStrategy::default();
        let choice = select(&mut strategy, "XX./.O./...", Mark::O);
        assert_eq!(choice.position, Position::new(0, 2));
    }

    #[test]
    fn test_lost_position_scores_negative_terminal() {
        let mut strategy = AlphaBetaStrategy::default();
        let choice = select(&mut strategy, "X.X/.O./X..", Mark::O);
        assert_eq!(choice.evaluation, -ALPHA_BETA_WIN_SCORE);
    }

    #[test]
    fn test_order_moves_corners_then_center() {
        let board = Board::new(3).unwrap();
        let moves = AlphaBetaStrategy::order_moves(&board);
        assert_eq!(
            &moves[..5],
            &[
                Position::new(0, 0),
                Position::new(0, 2),
                Position::new(2, 0),
                Position::new(2, 2),
                Position::new(1, 1)
            ]
        );
        assert_eq!(moves.len(), 9);
    }

    #[test]
    fn test_order_moves_large_board_center_first() {
        let board = Board::new(5).unwrap();
        let moves = AlphaBetaStrategy::order_moves(&board);
        assert_eq!(
            &moves[..9],
            &[
                Position::new(2, 2),
                Position::new(1, 2),
                Position::new(2, 1),
                Position::new(2, 3),
                Position::new(3, 2),
                Position::new(0, 0),
                Position::new(0, 4),
                Position::new(4, 0),
                Position::new(4, 4)
            ]
        );
        assert_eq!(moves.len(), 25);
    }

    #[test]
    fn test_matches_minimax_value() {
        for (text, mark, depth) in [
            ("X../.O./...", Mark::X, 3),
            ("XO./.X./..O", Mark::X, 4),
            ("X.O/.../...", Mark::X, 5),
            ("O../.X./X..", Mark::O, 4),
        ] {
            let board = Board::parse(text).unwrap();
            let mut minimax_input = BotInput::new(board.clone(), 3, mark).unwrap();
            let mut alpha_beta_input = BotInput::new(board, 3, mark).unwrap();

            let expected = MinimaxStrategy::with_win_score(depth, ALPHA_BETA_WIN_SCORE)
                .select_move(&mut minimax_input, 0)
                .unwrap();
            let actual = AlphaBetaStrategy::new(depth)
                .select_move(&mut alpha_beta_input, 0)
                .unwrap();
            assert_eq!(actual.evaluation, expected.evaluation, "board {}", text);
        }
    }

    #[test]
    fn test_reused_table_keeps_result() {
        let mut strategy = AlphaBetaStrategy::default();
        let first = select(&mut strategy, "X../.O./..X", Mark::O);
        assert!(!strategy.table().is_empty());
        let second = select(&mut strategy, "X../.O./..X", Mark::O);
        assert_eq!(first, second);

        strategy.clear_cache();
        assert!(strategy.table().is_empty());
    }

    #[test]
    fn test_prunes_compared_to_minimax() {
        let text = "X../.O./...";
        let mut minimax = MinimaxStrategy::with_win_score(5, ALPHA_BETA_WIN_SCORE);
        let mut alpha_beta = AlphaBetaStrategy::new(5);
        let mut input = BotInput::new(Board::parse(text).unwrap(), 3, Mark::X).unwrap();
        minimax.select_move(&mut input, 0).unwrap();
        alpha_beta.select_move(&mut input, 0).unwrap();
        assert!(alpha_beta.nodes_searched() < minimax.nodes_searched());
    }

    #[test]
    fn test_full_board_fails() {
        let mut strategy = AlphaBetaStrategy::default();
        let mut input = BotInput::new(Board::parse("XOX/XOO/OXX").unwrap(), 3, Mark::X).unwrap();
        let before = input.board.clone();
        assert_eq!(
            strategy.select_move(&mut input, 0).unwrap_err(),
            EngineError::NoValidMoves
        );
        assert_eq!(input.board, before);
    }
}
