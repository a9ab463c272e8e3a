use std::collections::HashSet;

use serde::Serialize;

use crate::difficulty::Difficulty;
use crate::dispatcher::AIEngine;
use crate::error::EngineError;
use crate::game::{Game, PlayedMove};
use crate::types::{GameStatus, Mark};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeriesResult {
    pub games: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
    /// Games whose move sequences differ from every earlier game in the series.
    pub distinct_games: usize,
}

impl SeriesResult {
    fn record(&mut self, status: GameStatus) {
        self.games += 1;
        match status {
            GameStatus::XWon => self.x_wins += 1,
            GameStatus::OWon => self.o_wins += 1,
            _ => self.draws += 1,
        }
    }
}

/// Engine versus engine until the game ends.
pub fn play_match(
    engine: &mut AIEngine,
    x_difficulty: Difficulty,
    o_difficulty: Difficulty,
    size: usize,
    win_count: usize,
    thinking_time_ms: u64,
) -> Result<Game, EngineError> {
    let mut game = Game::new(size, win_count)?;

    while !game.status().is_over() {
        let mark = game.current_mark();
        let difficulty = if mark == Mark::X { x_difficulty } else { o_difficulty };
        let mut input = game.bot_input()?;
        let chosen = engine.select_move(&mut input, difficulty, thinking_time_ms)?;
        game.place_mark(mark, chosen.position())?;
    }

    crate::log_debug!(
        "{} (X) vs {} (O) finished {:?} after {} moves",
        x_difficulty,
        o_difficulty,
        game.status(),
        game.history().len()
    );
    Ok(game)
}

fn play_games(
    engine: &mut AIEngine,
    x_difficulty: Difficulty,
    o_difficulty: Difficulty,
    size: usize,
    win_count: usize,
    games: usize,
    thinking_time_ms: u64,
) -> Result<SeriesResult, EngineError> {
    let mut result = SeriesResult::default();
    let mut histories: HashSet<Vec<PlayedMove>> = HashSet::new();
    for _ in 0..games {
        let game = play_match(engine, x_difficulty, o_difficulty, size, win_count, thinking_time_ms)?;
        result.record(game.status());
        histories.insert(game.history().to_vec());
    }
    result.distinct_games = histories.len();
    Ok(result)
}

/// Plays `games` independent games with the result cache switched off.
pub fn play_series(
    engine: &mut AIEngine,
    x_difficulty: Difficulty,
    o_difficulty: Difficulty,
    size: usize,
    win_count: usize,
    games: usize,
    thinking_time_ms: u64,
) -> Result<SeriesResult, EngineError> {
    // Cached answers would replay the first game's random choices every time.
    let cache_enabled = engine.is_cache_enabled();
    engine.set_cache_enabled(false);
    let played = play_games(engine, x_difficulty, o_difficulty, size, win_count, games, thinking_time_ms);
    engine.set_cache_enabled(cache_enabled);
    let result = played?;

    crate::log_info!(
        "{} vs {}: {} games, X {} / O {} / draws {}",
        x_difficulty,
        o_difficulty,
        result.games,
        result.x_wins,
        result.o_wins,
        result.draws
    );
    Ok(result)
}
