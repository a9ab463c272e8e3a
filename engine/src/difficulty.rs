use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Difficulty labels understood by the engine, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
    Impossible,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
        Difficulty::Impossible,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
            Difficulty::Impossible => "impossible",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|difficulty| difficulty.label() == s)
            .ok_or_else(|| EngineError::UnknownDifficulty(s.to_string()))
    }
}

/// One slot per difficulty, indexed by the enum discriminant.
pub(crate) struct PerDifficulty<T>([T; 5]);

impl<T> PerDifficulty<T> {
    pub(crate) fn new(items: [T; 5]) -> Self {
        Self(items)
    }

    pub(crate) fn get_mut(&mut self, difficulty: Difficulty) -> &mut T {
        &mut self.0[difficulty.index()]
    }

    pub(crate) fn get(&self, difficulty: Difficulty) -> &T {
        &self.0[difficulty.index()]
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.0.iter_mut()
    }
}
