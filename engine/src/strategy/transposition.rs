//! Memoised subtree scores for alpha-beta search.
//!
//! Entries are keyed by the full board contents plus the win condition, the
//! searching side and the side to move, so distinct positions never share a
//! key. An entry answers a probe only when it was searched at least as deep
//! as requested. Scores cut off by the window are stored as bounds, which
//! keeps pruned results from masquerading as exact values.

use std::collections::HashMap;

use crate::board::Board;
use crate::types::Mark;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionKey(Vec<u8>);

impl PositionKey {
    pub fn new(board: &Board, win_count: usize, ai_mark: Mark, to_move: Mark) -> Self {
        let size = board.size();
        let mut bytes = Vec::with_capacity(size * size + 4);
        bytes.push(size as u8);
        bytes.push(win_count as u8);
        bytes.push(ai_mark.symbol() as u8);
        bytes.push(to_move.symbol() as u8);
        board.write_key_bytes(&mut bytes);
        Self(bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Score is the true minimax value at the stored depth.
    Exact,
    /// True value >= score (the search failed high).
    Lower,
    /// True value <= score (the search failed low).
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTEntry {
    pub score: f64,
    pub depth: usize,
    pub bound: Bound,
}

/// Unbounded within one generation: once `limit` distinct keys are held the
/// table is wiped before the next insert.
#[derive(Debug)]
pub struct TranspositionTable {
    entries: HashMap<PositionKey, TTEntry>,
    limit: usize,
    hits: u64,
    resets: u64,
}

impl TranspositionTable {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            limit: limit.max(1),
            hits: 0,
            resets: 0,
        }
    }

    /// Entry for `key` if it was searched to at least `depth` plies.
    pub fn probe(&mut self, key: &PositionKey, depth: usize) -> Option<TTEntry> {
        let entry = self.entries.get(key).copied()?;
        if entry.depth < depth {
            return None;
        }
        self.hits += 1;
        Some(entry)
    }

    /// Stores unless an entry from a deeper search is already present.
    pub fn store(&mut self, key: PositionKey, entry: TTEntry) {
        if let Some(existing) = self.entries.get_mut(&key) {
            if existing.depth <= entry.depth {
                *existing = entry;
            }
            return;
        }
        if self.entries.len() >= self.limit {
            crate::log_info!(
                "Transposition table reached {} entries, starting a new generation",
                self.limit
            );
            self.entries.clear();
            self.resets += 1;
        }
        self.entries.insert(key, entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn resets(&self) -> u64 {
        self.resets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(text: &str, to_move: Mark) -> PositionKey {
        PositionKey::new(&Board::parse(text).unwrap(), 3, Mark::X, to_move)
    }

    fn entry(score: f64, depth: usize) -> TTEntry {
        TTEntry {
            score,
            depth,
            bound: Bound::Exact,
        }
    }

    #[test]
    fn test_key_distinguishes_side_to_move() {
        assert_ne!(key("X../.../...", Mark::X), key("X../.../...", Mark::O));
        assert_eq!(key("X../.../...", Mark::O), key("X../.../...", Mark::O));
    }

    #[test]
    fn test_key_distinguishes_win_condition() {
        let board = Board::new(4).unwrap();
        assert_ne!(
            PositionKey::new(&board, 3, Mark::X, Mark::X),
            PositionKey::new(&board, 4, Mark::X, Mark::X)
        );
    }

    #[test]
    fn test_shallower_probe_uses_deeper_entry() {
        let mut table = TranspositionTable::new(16);
        let k = key("X../.O./...", Mark::X);
        table.store(k.clone(), entry(5.0, 4));
        assert_eq!(table.probe(&k, 3).map(|e| e.score), Some(5.0));
        assert_eq!(table.probe(&k, 4).map(|e| e.score), Some(5.0));
        assert!(table.probe(&k, 5).is_none());
        assert_eq!(table.hits(), 2);
    }

    #[test]
    fn test_deeper_result_overwrites_shallower() {
        let mut table = TranspositionTable::new(16);
        let k = key("X../.O./...", Mark::X);
        table.store(k.clone(), entry(1.0, 2));
        table.store(k.clone(), entry(7.0, 5));
        assert_eq!(table.probe(&k, 5).map(|e| e.score), Some(7.0));

        table.store(k.clone(), entry(-3.0, 1));
        assert_eq!(table.probe(&k, 1).map(|e| e.score), Some(7.0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_limit_starts_new_generation() {
        let mut table = TranspositionTable::new(2);
        table.store(key("X../.../...", Mark::O), entry(1.0, 1));
        table.store(key(".X./.../...", Mark::O), entry(1.0, 1));
        table.store(key("..X/.../...", Mark::O), entry(1.0, 1));
        assert_eq!(table.len(), 1);
        assert_eq!(table.resets(), 1);
    }

    #[test]
    fn test_clear() {
        let mut table = TranspositionTable::new(4);
        table.store(key("X../.../...", Mark::O), entry(1.0, 1));
        table.clear();
        assert!(table.is_empty());
    }
}
