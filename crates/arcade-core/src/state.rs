use crate::{BudgetState, ElasticityState, NpvState, TileState};
use serde::{Deserialize, Serialize};

/// Counters shared by every game state.
///
/// Embedded in each per-game state; the host reads them through
/// [`GameState::stats`] without knowing the concrete variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Current level, starting at 1.
    pub level: u32,
    /// Cumulative score for the session.
    pub score: u32,
    /// Elapsed play time in milliseconds, stamped by the host.
    pub time_ms: u64,
    /// Count of invalid inputs and wrong answers.
    pub mistakes: u32,
}

impl SessionStats {
    /// Fresh counters at level 1.
    pub fn new() -> Self {
        Self {
            level: 1,
            score: 0,
            time_ms: 0,
            mistakes: 0,
        }
    }

    /// Reset the transient counters, keeping the level.
    pub fn reset_transient(&mut self) {
        self.score = 0;
        self.time_ms = 0;
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// The live state of whichever game is active.
///
/// A closed union: exactly one game's state exists at a time, owned by the
/// host session and replaced wholesale on restart.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum GameState {
    Npv(NpvState),
    Budget(BudgetState),
    Elasticity(ElasticityState),
    Tiles(TileState),
}

impl GameState {
    /// The shared counters of the active game.
    pub fn stats(&self) -> &SessionStats {
        match self {
            GameState::Npv(s) => &s.stats,
            GameState::Budget(s) => &s.stats,
            GameState::Elasticity(s) => &s.stats,
            GameState::Tiles(s) => &s.stats,
        }
    }

    /// Mutable access to the shared counters.
    pub fn stats_mut(&mut self) -> &mut SessionStats {
        match self {
            GameState::Npv(s) => &mut s.stats,
            GameState::Budget(s) => &mut s.stats,
            GameState::Elasticity(s) => &mut s.stats,
            GameState::Tiles(s) => &mut s.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_stats_start_at_level_one() {
        let s = SessionStats::new();
        assert_eq!(s.level, 1);
        assert_eq!(s.score, 0);
        assert_eq!(s.mistakes, 0);
    }

    #[test]
    fn reset_transient_keeps_level_and_mistakes() {
        let mut s = SessionStats {
            level: 3,
            score: 450,
            time_ms: 90_000,
            mistakes: 2,
        };
        s.reset_transient();
        assert_eq!(s.level, 3);
        assert_eq!(s.mistakes, 2);
        assert_eq!(s.score, 0);
        assert_eq!(s.time_ms, 0);
    }
}
