use super::{BotInput, MoveChoice, MoveReason, Strategy, checked_moves, find_winning_move};
use crate::board::Board;
use crate::error::EngineError;
use crate::types::{Mark, Position};

const WIN_EVALUATION: f64 = 1.0;
const BLOCK_EVALUATION: f64 = 0.8;
const CENTER_EVALUATION: f64 = 0.7;
const POSITIONAL_EVALUATION: f64 = 0.5;

const CORNER_WEIGHT: i32 = 3;
const EDGE_WEIGHT: i32 = 1;
const CENTER_WEIGHT: i32 = 4;
const OWN_NEIGHBOR_WEIGHT: i32 = 2;
const OPPONENT_NEIGHBOR_WEIGHT: i32 = 1;

const NEIGHBORHOOD: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Greedy rules: win, block, take the 3x3 centre, else best positional cell.
#[derive(Debug, Default, Clone)]
pub struct HeuristicStrategy;

impl HeuristicStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Position weight plus 8-neighbourhood weight; ties keep the earliest cell.
    fn best_positional_move(board: &Board, player: Mark, opponent: Mark, moves: &[Position]) -> Position {
        let mut best_move = moves[0];
        let mut best_score = i32::MIN;

        for &pos in moves {
            let score = cell_weight(board, pos) + neighborhood_score(board, pos, player, opponent);
            if score > best_score {
                best_score = score;
                best_move = pos;
            }
        }
        best_move
    }
}

/// The centre bonus covers interior cells within one step of the geometric
/// centre, so an even board rewards all four middle cells rather than the
/// single cell at `size / 2`.
fn cell_weight(board: &Board, pos: Position) -> i32 {
    let center = board.center();
    if board.is_corner(pos) {
        CORNER_WEIGHT
    } else if board.is_edge(pos) {
        EDGE_WEIGHT
    } else if (pos.row as f64 - center).abs() < 1.0 && (pos.col as f64 - center).abs() < 1.0 {
        CENTER_WEIGHT
    } else {
        0
    }
}

fn neighborhood_score(board: &Board, pos: Position, player: Mark, opponent: Mark) -> i32 {
    NEIGHBORHOOD
        .iter()
        .filter_map(|&(d_row, d_col)| pos.offset(d_row, d_col, 1, board.size()))
        .map(|neighbor| match board[neighbor] {
            cell if cell == player => OWN_NEIGHBOR_WEIGHT,
            cell if cell == opponent => OPPONENT_NEIGHBOR_WEIGHT,
            _ => 0,
        })
        .sum()
}

impl Strategy for HeuristicStrategy {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn select_move(
        &mut self,
        input: &mut BotInput,
        _max_thinking_time_ms: u64,
    ) -> Result<MoveChoice, EngineError> {
        let moves = checked_moves(input)?;
        let player = input.current_mark;
        let opponent = input.opponent_mark()?;
        let board = &mut input.board;

        if let Some(pos) = find_winning_move(board, player, input.win_count, &moves) {
            return Ok(MoveChoice::new(pos, WIN_EVALUATION, MoveReason::WinningMove));
        }

        if let Some(pos) = find_winning_move(board, opponent, input.win_count, &moves) {
            return Ok(MoveChoice::new(pos, BLOCK_EVALUATION, MoveReason::BlockingOpponent));
        }

        let center = Position::new(1, 1);
        if board.size() == 3 && board.is_empty_at(center) {
            return Ok(MoveChoice::new(center, CENTER_EVALUATION, MoveReason::CenterPosition));
        }

        let pos = Self::best_positional_move(board, player, opponent, &moves);
        Ok(MoveChoice::new(pos, POSITIONAL_EVALUATION, MoveReason::HeuristicPosition))
    }
}
