use serde::{Deserialize, Serialize};

use super::Validate;
use crate::difficulty::Difficulty;

pub const MAX_SEARCH_DEPTH: usize = 12;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub cache_enabled: bool,
    pub result_cache_limit: usize,
    /// Per strategy instance.
    pub transposition_table_limit: usize,
    pub default_thinking_time_ms: u64,
    pub hint_thinking_time_ms: u64,
    /// Strategy behind `analyze_position` and `get_hint`.
    pub analysis_difficulty: Difficulty,
    pub minimax_depth: usize,
    pub alpha_beta_depth: usize,
    pub perfect_depth: usize,
    pub random_delay_min_ms: u64,
    pub random_delay_max_ms: u64,
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            result_cache_limit: 100_000,
            transposition_table_limit: 1_000_000,
            default_thinking_time_ms: 2000,
            hint_thinking_time_ms: 5000,
            analysis_difficulty: Difficulty::Impossible,
            minimax_depth: 4,
            alpha_beta_depth: 6,
            perfect_depth: 10,
            random_delay_min_ms: 0,
            random_delay_max_ms: 0,
            seed: None,
        }
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Result<(), String> {
        for (name, depth) in [
            ("minimax_depth", self.minimax_depth),
            ("alpha_beta_depth", self.alpha_beta_depth),
            ("perfect_depth", self.perfect_depth),
        ] {
            if depth == 0 || depth > MAX_SEARCH_DEPTH {
                return Err(format!(
                    "{} must be between 1 and {}, got {}",
                    name, MAX_SEARCH_DEPTH, depth
                ));
            }
        }
        if self.random_delay_min_ms > self.random_delay_max_ms {
            return Err(format!(
                "random_delay_min_ms ({}) cannot exceed random_delay_max_ms ({})",
                self.random_delay_min_ms, self.random_delay_max_ms
            ));
        }
        if self.result_cache_limit == 0 {
            return Err("result_cache_limit must be positive".to_string());
        }
        if self.transposition_table_limit == 0 {
            return Err("transposition_table_limit must be positive".to_string());
        }
        Ok(())
    }
}
