use crate::GameId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-game progress summary, created on first play and folded after each
/// completion. Persisted externally; the core never writes it to disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameProgress {
    pub game_id: GameId,
    /// Highest level reached.
    pub level: u32,
    pub high_score: u32,
    pub times_played: u32,
    /// Sticky: once mastered, stays mastered.
    pub mastered: bool,
    pub last_played: DateTime<Utc>,
    /// Objective id → whether the player has met it.
    pub objectives: BTreeMap<String, bool>,
}

impl GameProgress {
    /// Empty record for a game played for the first time.
    pub fn new(game_id: GameId, now: DateTime<Utc>) -> Self {
        Self {
            game_id,
            level: 1,
            high_score: 0,
            times_played: 0,
            mastered: false,
            last_played: now,
            objectives: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_record_starts_empty() {
        let p = GameProgress::new(GameId::new("npv-builder"), Utc::now());
        assert_eq!(p.level, 1);
        assert_eq!(p.times_played, 0);
        assert!(!p.mastered);
        assert!(p.objectives.is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let mut p = GameProgress::new(GameId::new("budget-battle"), Utc::now());
        p.objectives.insert("budget-allocation".to_string(), true);
        let s = serde_json::to_string(&p).unwrap();
        let back: GameProgress = serde_json::from_str(&s).unwrap();
        assert_eq!(back, p);
    }
}
