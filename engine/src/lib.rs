//! Adversarial search engine for N-by-N tic-tac-toe with a K-in-a-row win
//! condition.
//!
//! [`AIEngine`] maps a [`Difficulty`] to a [`Strategy`] and memoises answers.
//! Strategies borrow the caller's [`Board`] mutably during search and always
//! hand it back unchanged.

pub mod analysis;
pub mod arena;
pub mod board;
pub mod config;
pub mod difficulty;
pub mod dispatcher;
pub mod error;
pub mod evaluator;
pub mod game;
pub mod logger;
pub mod session_rng;
pub mod strategy;
pub mod types;
pub mod validate;
pub mod win_detector;

pub use board::Board;
pub use config::{ConfigError, EngineConfig};
pub use difficulty::Difficulty;
pub use dispatcher::{AIEngine, EngineMove, Hint};
pub use error::EngineError;
pub use evaluator::{DetailedEvaluation, Evaluator};
pub use game::{Game, PlayedMove};
pub use session_rng::SessionRng;
pub use strategy::{Advantage, BotInput, MoveChoice, MoveReason, PositionAnalysis, Strategy};
pub use types::{GameStatus, Mark, Position, WinningLine};
