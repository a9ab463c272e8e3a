use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;

use crate::config::{ConfigError, EngineConfig, Validate};
use crate::difficulty::{Difficulty, PerDifficulty};
use crate::error::EngineError;
use crate::session_rng::SessionRng;
use crate::strategy::{
    AlphaBetaStrategy, BotInput, HeuristicStrategy, MinimaxStrategy, MoveChoice, MoveReason,
    PerfectStrategy, PositionAnalysis, RandomStrategy, Strategy, find_winning_move,
};
use crate::types::{Mark, Position};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineMove {
    pub row: usize,
    pub col: usize,
    pub evaluation: f64,
    pub thinking_time_ms: f64,
    pub from_cache: bool,
}

impl EngineMove {
    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hint {
    pub row: usize,
    pub col: usize,
    pub reason: String,
    pub evaluation: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    difficulty: Difficulty,
    board: String,
    player: Mark,
    win_count: usize,
}

impl CacheKey {
    fn new(difficulty: Difficulty, input: &BotInput) -> Self {
        Self {
            difficulty,
            board: input.board.serialize(),
            player: input.current_mark,
            win_count: input.win_count,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedMove {
    position: Position,
    evaluation: f64,
}

/// Full query -> move memo. Cleared wholesale when it reaches its limit.
struct ResultCache {
    entries: HashMap<CacheKey, CachedMove>,
    limit: usize,
}

impl ResultCache {
    fn new(limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            limit: limit.max(1),
        }
    }

    fn get(&self, key: &CacheKey) -> Option<CachedMove> {
        self.entries.get(key).copied()
    }

    fn insert(&mut self, key: CacheKey, entry: CachedMove) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.limit {
            crate::log_info!(
                "Result cache reached {} entries, starting a new generation",
                self.limit
            );
            self.entries.clear();
        }
        self.entries.insert(key, entry);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Difficulty-keyed front door to the strategies.
///
/// Not internally synchronised: a host that shares one engine between
/// threads wraps it in a `Mutex`.
pub struct AIEngine {
    strategies: PerDifficulty<Box<dyn Strategy>>,
    cache: ResultCache,
    cache_enabled: bool,
    config: EngineConfig,
}

impl AIEngine {
    pub fn new() -> Self {
        Self::build(EngineConfig::default())
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(Self::build(config.clone()))
    }

    fn build(config: EngineConfig) -> Self {
        let random_rng = SessionRng::from_seed(config.seed);
        let book_rng = SessionRng::from_seed(config.seed.map(|seed| seed.wrapping_add(1)));
        let table_limit = config.transposition_table_limit;

        let strategies: [Box<dyn Strategy>; 5] = [
            Box::new(RandomStrategy::with_delay(
                random_rng,
                config.random_delay_min_ms,
                config.random_delay_max_ms,
            )),
            Box::new(HeuristicStrategy::new()),
            Box::new(MinimaxStrategy::new(config.minimax_depth)),
            Box::new(AlphaBetaStrategy::with_table_limit(config.alpha_beta_depth, table_limit)),
            Box::new(PerfectStrategy::with_depth(config.perfect_depth, table_limit, book_rng)),
        ];

        Self {
            strategies: PerDifficulty::new(strategies),
            cache: ResultCache::new(config.result_cache_limit),
            cache_enabled: config.cache_enabled,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn strategy_name(&self, difficulty: Difficulty) -> &'static str {
        self.strategies.get(difficulty).name()
    }

    pub fn select_move(
        &mut self,
        input: &mut BotInput,
        difficulty: Difficulty,
        max_thinking_time_ms: u64,
    ) -> Result<EngineMove, EngineError> {
        let started = Instant::now();
        input.validate()?;

        let key = CacheKey::new(difficulty, input);
        if self.cache_enabled
            && let Some(cached) = self.cache.get(&key)
        {
            crate::log_debug!(
                "Cache hit for {} at {}: ({}, {})",
                difficulty,
                key.board,
                cached.position.row,
                cached.position.col
            );
            return Ok(EngineMove {
                row: cached.position.row,
                col: cached.position.col,
                evaluation: cached.evaluation,
                thinking_time_ms: elapsed_ms(started),
                from_cache: true,
            });
        }

        let strategy = self.strategies.get_mut(difficulty);
        let choice = strategy.select_move(input, max_thinking_time_ms)?;
        let thinking_time_ms = elapsed_ms(started);

        crate::log_debug!(
            "{} ({}) chose ({}, {}) eval {} in {:.2} ms",
            difficulty,
            strategy.name(),
            choice.position.row,
            choice.position.col,
            choice.evaluation,
            thinking_time_ms
        );
        if thinking_time_ms > max_thinking_time_ms as f64 {
            crate::log_warn!(
                "{} search took {:.0} ms, over the {} ms budget",
                difficulty,
                thinking_time_ms,
                max_thinking_time_ms
            );
        }

        if self.cache_enabled {
            self.cache.insert(
                key,
                CachedMove {
                    position: choice.position,
                    evaluation: choice.evaluation,
                },
            );
        }

        Ok(EngineMove {
            row: choice.position.row,
            col: choice.position.col,
            evaluation: choice.evaluation,
            thinking_time_ms,
            from_cache: false,
        })
    }

    pub fn select_move_by_label(
        &mut self,
        input: &mut BotInput,
        difficulty: &str,
        max_thinking_time_ms: u64,
    ) -> Result<EngineMove, EngineError> {
        let difficulty = difficulty.parse::<Difficulty>()?;
        self.select_move(input, difficulty, max_thinking_time_ms)
    }

    /// Static evaluation from the configured analysis strategy.
    pub fn analyze_position(&self, input: &BotInput) -> Result<PositionAnalysis, EngineError> {
        self.strategies
            .get(self.config.analysis_difficulty)
            .analyze_position(input)
    }

    /// Best move from the analysis strategy with a human readable reason.
    /// Bypasses the result cache.
    pub fn get_hint(&mut self, input: &mut BotInput) -> Result<Hint, EngineError> {
        let difficulty = self.config.analysis_difficulty;
        let budget = self.config.hint_thinking_time_ms;
        let choice = self.strategies.get_mut(difficulty).select_move(input, budget)?;
        let reason = hint_reason(input, &choice)?;

        Ok(Hint {
            row: choice.position.row,
            col: choice.position.col,
            reason: reason.to_string(),
            evaluation: choice.evaluation,
        })
    }

    /// Drops the result cache and every strategy's transposition table.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        for strategy in self.strategies.iter_mut() {
            strategy.clear_cache();
        }
        crate::log_debug!("Engine caches cleared");
    }

    pub fn set_cache_enabled(&mut self, enabled: bool) {
        self.cache_enabled = enabled;
    }

    pub fn is_cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    pub fn cached_results(&self) -> usize {
        self.cache.len()
    }
}

impl Default for AIEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

fn hint_reason(input: &mut BotInput, choice: &MoveChoice) -> Result<MoveReason, EngineError> {
    let target = [choice.position];
    let opponent = input.opponent_mark()?;
    let win_count = input.win_count;

    if find_winning_move(&mut input.board, input.current_mark, win_count, &target).is_some() {
        return Ok(MoveReason::WinningMove);
    }
    if find_winning_move(&mut input.board, opponent, win_count, &target).is_some() {
        return Ok(MoveReason::BlockingOpponent);
    }
    if let Some(reason) = choice.reason {
        return Ok(reason);
    }
    if choice.position == input.board.center_cell() && input.board.size() % 2 == 1 {
        return Ok(MoveReason::CenterPosition);
    }
    Ok(MoveReason::SearchResult)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn input(text: &str, mark: Mark) -> BotInput {
        BotInput::new(Board::parse(text).unwrap(), 3, mark).unwrap()
    }

    fn seeded_engine() -> AIEngine {
        AIEngine::from_config(&EngineConfig {
            seed: Some(9),
            ..EngineConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_cache_hit_on_repeat() {
        let mut engine = seeded_engine();
        let mut state = input("X../.O./...", Mark::X);
        let first = engine.select_move(&mut state, Difficulty::Expert, 2000).unwrap();
        let second = engine.select_move(&mut state, Difficulty::Expert, 2000).unwrap();
        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(first.position(), second.position());
        assert_eq!(first.evaluation, second.evaluation);
        assert_eq!(engine.cached_results(), 1);
    }

    #[test]
    fn test_cache_key_includes_difficulty_and_player() {
        let mut engine = seeded_engine();
        let mut state = input("X../.O./...", Mark::X);
        engine.select_move(&mut state, Difficulty::Hard, 2000).unwrap();
        let other = engine.select_move(&mut state, Difficulty::Expert, 2000).unwrap();
        assert!(!other.from_cache);

        let mut as_o = input("X../.O./...", Mark::O);
        let other = engine.select_move(&mut as_o, Difficulty::Hard, 2000).unwrap();
        assert!(!other.from_cache);
    }

    #[test]
    fn test_disabled_cache_never_hits() {
        let mut engine = seeded_engine();
        engine.set_cache_enabled(false);
        let mut state = input("X../.O./...", Mark::X);
        engine.select_move(&mut state, Difficulty::Medium, 0).unwrap();
        let second = engine.select_move(&mut state, Difficulty::Medium, 0).unwrap();
        assert!(!second.from_cache);
        assert_eq!(engine.cached_results(), 0);
    }

    #[test]
    fn test_clear_cache() {
        let mut engine = seeded_engine();
        let mut state = input("X../.O./...", Mark::X);
        engine.select_move(&mut state, Difficulty::Medium, 0).unwrap();
        engine.clear_cache();
        assert_eq!(engine.cached_results(), 0);
        let again = engine.select_move(&mut state, Difficulty::Medium, 0).unwrap();
        assert!(!again.from_cache);
    }

    #[test]
    fn test_cache_limit_starts_new_generation() {
        let mut engine = AIEngine::from_config(&EngineConfig {
            result_cache_limit: 2,
            seed: Some(1),
            ..EngineConfig::default()
        })
        .unwrap();
        for text in ["X../.O./...", ".X./.O./...", "..X/.O./..."] {
            let mut state = input(text, Mark::X);
            engine.select_move(&mut state, Difficulty::Medium, 0).unwrap();
        }
        assert_eq!(engine.cached_results(), 1);
    }

    #[test]
    fn test_unknown_label() {
        let mut engine = seeded_engine();
        let mut state = input(".../.../...", Mark::X);
        assert_eq!(
            engine.select_move_by_label(&mut state, "legendary", 0).unwrap_err(),
            EngineError::UnknownDifficulty("legendary".to_string())
        );
        let chosen = engine.select_move_by_label(&mut state, "impossible", 0).unwrap();
        assert_eq!(chosen.position(), Position::new(1, 1));
    }

    #[test]
    fn test_full_board_error_is_not_cached() {
        let mut engine = seeded_engine();
        let mut state = input("XOX/XOO/OXX", Mark::X);
        for difficulty in Difficulty::ALL {
            assert_eq!(
                engine.select_move(&mut state, difficulty, 0).unwrap_err(),
                EngineError::NoValidMoves
            );
        }
        assert_eq!(engine.cached_results(), 0);
    }

    #[test]
    fn test_hint_reasons() {
        let mut engine = seeded_engine();

        let mut state = input("XX./OO./...", Mark::X);
        let hint = engine.get_hint(&mut state).unwrap();
        assert_eq!((hint.row, hint.col), (0, 2));
        assert_eq!(hint.reason, MoveReason::WinningMove.to_string());

        let mut state = input("XX./.O./...", Mark::O);
        let hint = engine.get_hint(&mut state).unwrap();
        assert_eq!((hint.row, hint.col), (0, 2));
        assert_eq!(hint.reason, MoveReason::BlockingOpponent.to_string());

        let mut state = input(".../.../...", Mark::X);
        let hint = engine.get_hint(&mut state).unwrap();
        assert_eq!((hint.row, hint.col), (1, 1));
        assert_eq!(hint.reason, MoveReason::OpeningBook.to_string());
    }

    #[test]
    fn test_analyze_position() {
        let engine = seeded_engine();
        let analysis = engine.analyze_position(&input("XX./.O./...", Mark::X)).unwrap();
        assert!(analysis.evaluation > 0.0);
        assert_eq!(analysis.advantage, crate::strategy::Advantage::X);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            alpha_beta_depth: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(AIEngine::from_config(&config), Err(ConfigError::Invalid(_))));
    }
}
