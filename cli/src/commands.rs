use std::error::Error;

use serde::Serialize;
use tictactoe_engine::analysis::{self, GameAnalysis, GameReport};
use tictactoe_engine::arena;
use tictactoe_engine::validate::{player_to_move, validate_board_state};
use tictactoe_engine::{
    AIEngine, Board, BotInput, Difficulty, EngineError, Mark, PlayedMove, Position, log_warn,
};

type CommandResult = Result<String, Box<dyn Error>>;

fn to_yaml<T: Serialize>(value: &T) -> CommandResult {
    Ok(serde_yaml_ng::to_string(value)?)
}

fn parse_player(player: Option<char>, board: &Board) -> Result<Mark, EngineError> {
    match player {
        Some(symbol) => Mark::from_symbol(symbol)
            .filter(|mark| mark.is_player())
            .ok_or(EngineError::InvalidPlayer),
        None => player_to_move(board),
    }
}

fn bot_input(board: &str, player: Option<char>, win_count: usize) -> Result<BotInput, EngineError> {
    let board = Board::parse(board)?;
    let mark = parse_player(player, &board)?;
    if let Err(err) = validate_board_state(&board) {
        log_warn!("{}", err);
    }
    BotInput::new(board, win_count, mark)
}

pub fn select_move(
    engine: &mut AIEngine,
    board: &str,
    difficulty: &str,
    player: Option<char>,
    win_count: usize,
    time_ms: u64,
) -> CommandResult {
    let mut input = bot_input(board, player, win_count)?;
    let chosen = engine.select_move_by_label(&mut input, difficulty, time_ms)?;
    to_yaml(&chosen)
}

pub fn analyze(engine: &AIEngine, board: &str, player: Option<char>, win_count: usize) -> CommandResult {
    let input = bot_input(board, player, win_count)?;
    to_yaml(&engine.analyze_position(&input)?)
}

pub fn hint(engine: &mut AIEngine, board: &str, player: Option<char>, win_count: usize) -> CommandResult {
    let mut input = bot_input(board, player, win_count)?;
    to_yaml(&engine.get_hint(&mut input)?)
}

pub fn self_play(
    engine: &mut AIEngine,
    x: &str,
    o: &str,
    size: usize,
    win_count: usize,
    games: usize,
    time_ms: u64,
) -> CommandResult {
    let x = x.parse::<Difficulty>()?;
    let o = o.parse::<Difficulty>()?;
    let result = arena::play_series(engine, x, o, size, win_count, games, time_ms)?;
    to_yaml(&result)
}

#[derive(Serialize)]
struct GameReview {
    analysis: GameAnalysis,
    report: GameReport,
}

/// Parses "row,col" pairs; marks alternate starting with X.
fn parse_moves(moves: &[String]) -> Result<Vec<PlayedMove>, Box<dyn Error>> {
    let mut mark = Mark::X;
    let mut played = Vec::with_capacity(moves.len());
    for text in moves {
        let (row, col) = text
            .split_once(',')
            .ok_or_else(|| format!("Move '{}' is not in row,col form", text))?;
        let position = Position::new(row.trim().parse()?, col.trim().parse()?);
        played.push(PlayedMove { mark, position });
        mark = mark.opponent().ok_or(EngineError::InvalidPlayer)?;
    }
    Ok(played)
}

pub fn analyze_game(engine: &mut AIEngine, moves: &[String], size: usize, win_count: usize) -> CommandResult {
    let played = parse_moves(moves)?;
    let analysis = analysis::analyze_game(engine, &played, size, win_count)?;
    let report = analysis::generate_report(&analysis);
    to_yaml(&GameReview { analysis, report })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_moves_alternates_marks() {
        let moves = vec!["0,0".to_string(), "1, 1".to_string()];
        let played = parse_moves(&moves).unwrap();
        assert_eq!(played[0].mark, Mark::X);
        assert_eq!(played[1].mark, Mark::O);
        assert_eq!(played[1].position, Position::new(1, 1));
        assert!(parse_moves(&["00".to_string()]).is_err());
    }

    #[test]
    fn test_player_inferred_from_counts() {
        let input = bot_input("X../.../...", None, 3).unwrap();
        assert_eq!(input.current_mark, Mark::O);
        let input = bot_input("X../.../...", Some('x'), 3).unwrap();
        assert_eq!(input.current_mark, Mark::X);
        assert!(bot_input("X../.../...", Some('.'), 3).is_err());
    }

    #[test]
    fn test_move_command_prints_yaml() {
        let mut engine = AIEngine::new();
        let output = select_move(&mut engine, "XX./OO./...", "expert", None, 3, 1000).unwrap();
        assert!(output.contains("row: 0"));
        assert!(output.contains("col: 2"));
        assert!(output.contains("from_cache: false"));
    }

    #[test]
    fn test_unknown_difficulty_is_error() {
        let mut engine = AIEngine::new();
        let err = select_move(&mut engine, ".../.../...", "legendary", None, 3, 0).unwrap_err();
        assert_eq!(err.to_string(), "Unknown difficulty: legendary");
    }
}
