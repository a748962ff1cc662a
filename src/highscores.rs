//! High score leaderboard
//!
//! Stored in the profile, keeps the top 10 scores sorted descending.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_HIGH_SCORES;
use crate::settings::sanitize_player_name;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Pilot name (at most 10 characters)
    #[serde(default)]
    pub name: String,
    /// Player's score
    pub score: u64,
    /// Level reached (1-based)
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub bombs_used: u32,
    /// Unix timestamp (seconds) when achieved
    #[serde(default)]
    pub timestamp: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Leaderboard {
    pub entries: Vec<HighScoreEntry>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, mut entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }
        entry.name = sanitize_player_name(&entry.name);

        // Find insertion point (sorted descending by score, ties keep arrival order)
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Restore ordering and size after loading untrusted data
    pub fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
        for entry in &mut self.entries {
            entry.name = sanitize_player_name(&entry.name);
        }
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// First `n` entries
    pub fn top(&self, n: usize) -> &[HighScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u64) -> HighScoreEntry {
        HighScoreEntry {
            name: name.to_string(),
            score,
            level: 1,
            bombs_used: 0,
            timestamp: 0,
        }
    }

    #[test]
    fn test_sorted_descending() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add_score(entry("A", 500)), Some(1));
        assert_eq!(board.add_score(entry("B", 1200)), Some(1));
        assert_eq!(board.add_score(entry("C", 800)), Some(2));
        let scores: Vec<u64> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![1200, 800, 500]);
        assert_eq!(board.top_score(), Some(1200));
    }

    #[test]
    fn test_truncates_to_max() {
        let mut board = Leaderboard::new();
        for i in 1..=15 {
            board.add_score(entry("P", i * 10));
        }
        assert_eq!(board.len(), MAX_HIGH_SCORES);
        assert_eq!(board.entries.last().map(|e| e.score), Some(60));
        assert!(!board.qualifies(60));
        assert!(board.qualifies(61));
        assert_eq!(board.add_score(entry("Low", 5)), None);
    }

    #[test]
    fn test_zero_score_never_qualifies() {
        let board = Leaderboard::new();
        assert!(!board.qualifies(0));
        assert_eq!(board.potential_rank(0), None);
        assert_eq!(board.potential_rank(10), Some(1));
    }

    #[test]
    fn test_name_is_sanitised() {
        let mut board = Leaderboard::new();
        board.add_score(entry("Commander Vector", 10));
        assert_eq!(board.entries[0].name, "Commander");
    }

    #[test]
    fn test_normalize_sorts_loaded_entries() {
        let mut board = Leaderboard {
            entries: vec![entry("A", 1), entry("B", 30), entry("C", 20)],
        };
        board.normalize();
        assert_eq!(board.top(2).iter().map(|e| e.score).collect::<Vec<_>>(), vec![30, 20]);
    }
}
