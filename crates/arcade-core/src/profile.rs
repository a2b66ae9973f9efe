use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// XP awarded for finishing a play session.
pub const XP_PER_PLAY: u32 = 10;
/// XP awarded for beating a personal best score.
pub const XP_PERSONAL_BEST: u32 = 5;

/// Profile level implied by an XP total; 100 XP per level, starting at 1.
pub fn level_for_xp(xp: u32) -> u32 {
    xp / 100 + 1
}

/// Progress within the current profile level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct XpProgress {
    /// XP earned inside the current level.
    pub current: u32,
    /// XP needed to finish the current level.
    pub needed: u32,
    /// `current / needed` in [0, 1).
    pub fraction: f32,
}

/// XP progress toward the next level.
pub fn xp_progress(xp: u32) -> XpProgress {
    let level = level_for_xp(xp);
    let floor = (level - 1) * 100;
    let current = xp - floor;
    let needed = 100;
    XpProgress {
        current,
        needed,
        fraction: current as f32 / needed as f32,
    }
}

/// The player's persistent profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub xp: u32,
    /// Cached level, kept consistent with `xp` by [`UserProfile::award_xp`].
    pub level: u32,
    pub achievements: Vec<String>,
    /// Ids of finance concepts the player has completed games for.
    pub concepts_completed: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Fresh profile with no XP.
    pub fn new(username: &str, now: DateTime<Utc>) -> Self {
        Self {
            username: username.to_string(),
            xp: 0,
            level: 1,
            achievements: Vec::new(),
            concepts_completed: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add XP and recompute the cached level.
    pub fn award_xp(&mut self, amount: u32, now: DateTime<Utc>) {
        self.xp = self.xp.saturating_add(amount);
        let level = level_for_xp(self.xp);
        if level > self.level {
            debug!(username = %self.username, level, "profile level up");
        }
        self.level = level;
        self.updated_at = now;
    }

    /// Record a completed concept once.
    pub fn complete_concept(&mut self, concept_id: &str, now: DateTime<Utc>) {
        if !self.concepts_completed.iter().any(|c| c == concept_id) {
            self.concepts_completed.push(concept_id.to_string());
            self.updated_at = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn level_math() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(250), 3);
    }

    #[test]
    fn xp_progress_within_level() {
        let p = xp_progress(250);
        assert_eq!(p.current, 50);
        assert_eq!(p.needed, 100);
        assert!((p.fraction - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn award_updates_level_and_timestamp() {
        let t0 = Utc::now();
        let mut profile = UserProfile::new("Player", t0);
        profile.award_xp(105, t0);
        assert_eq!(profile.xp, 105);
        assert_eq!(profile.level, 2);
    }

    #[test]
    fn concepts_recorded_once() {
        let now = Utc::now();
        let mut profile = UserProfile::new("Player", now);
        profile.complete_concept("npv", now);
        profile.complete_concept("npv", now);
        assert_eq!(profile.concepts_completed, vec!["npv".to_string()]);
    }

    proptest! {
        #[test]
        fn level_never_decreases_with_xp(a in 0u32..100_000, b in 0u32..10_000) {
            prop_assert!(level_for_xp(a + b) >= level_for_xp(a));
        }

        #[test]
        fn progress_fraction_in_unit_range(xp in 0u32..1_000_000) {
            let p = xp_progress(xp);
            prop_assert!(p.fraction >= 0.0 && p.fraction < 1.0);
        }
    }
}
