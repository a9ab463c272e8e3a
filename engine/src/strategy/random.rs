use std::thread;
use std::time::Duration;

use super::{BotInput, MoveChoice, MoveReason, Strategy, checked_moves};
use crate::error::EngineError;
use crate::session_rng::SessionRng;

/// Uniform choice among empty cells, with an optional "thinking" pause.
pub struct RandomStrategy {
    rng: SessionRng,
    delay_ms: Option<(u64, u64)>,
}

impl RandomStrategy {
    pub fn new(rng: SessionRng) -> Self {
        Self { rng, delay_ms: None }
    }

    /// Sleeps a random `min_ms..=max_ms` before answering, capped by the
    /// caller's thinking budget. A zero range disables the pause.
    pub fn with_delay(rng: SessionRng, min_ms: u64, max_ms: u64) -> Self {
        let delay_ms = (max_ms > 0).then_some((min_ms.min(max_ms), max_ms));
        Self { rng, delay_ms }
    }

    fn pause(&mut self, max_thinking_time_ms: u64) {
        let Some((min_ms, max_ms)) = self.delay_ms else {
            return;
        };
        let delay = self.rng.random_range(min_ms..=max_ms).min(max_thinking_time_ms);
        if delay > 0 {
            thread::sleep(Duration::from_millis(delay));
        }
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn select_move(
        &mut self,
        input: &mut BotInput,
        max_thinking_time_ms: u64,
    ) -> Result<MoveChoice, EngineError> {
        let moves = checked_moves(input)?;
        self.pause(max_thinking_time_ms);
        let position = *self.rng.choose(&moves).ok_or(EngineError::NoValidMoves)?;
        Ok(MoveChoice::new(position, 0.0, MoveReason::RandomChoice))
    }
}
