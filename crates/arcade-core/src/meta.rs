use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Unique identifier for a game, e.g. "npv-builder", "budget-battle".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId(pub String);

impl GameId {
    /// Convenience constructor from a string literal.
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A learning objective with the rubric used to assess it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LearningObjective {
    /// Stable objective identifier, unique within a game.
    pub id: String,
    /// Objective statement shown to the player.
    pub text: String,
    /// Rubric items describing what meeting the objective looks like.
    pub rubric: Vec<String>,
}

/// Input modes a game supports.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Controls {
    pub mouse: bool,
    pub touch: bool,
    pub keyboard: bool,
}

/// Immutable static descriptor for a registered game.
///
/// Never mutated after registration; the host reads metadata through this
/// and calls the game's capabilities, but never inspects game-internal
/// state shape.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameMeta {
    /// Registry identifier.
    pub id: GameId,
    /// Display title.
    pub title: String,
    /// One-paragraph summary.
    pub summary: String,
    /// Rough play time for one session, in minutes (> 0).
    pub estimated_time_min: u32,
    /// Learning objectives assessed by the mastery predicate.
    pub objectives: Vec<LearningObjective>,
    /// Supported input modes.
    pub controls: Controls,
    /// Ordered tutorial text, one entry per step.
    pub tutorial_steps: Vec<String>,
    /// Number of levels (>= 1).
    pub levels: u32,
}

/// Validation errors for registration-time invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Game id must be non-empty.
    #[error("game id must not be empty")]
    EmptyId,
    /// Title must be non-empty.
    #[error("game {0} has an empty title")]
    EmptyTitle(String),
    /// Estimated time must be positive.
    #[error("game {0} has a zero estimated time")]
    ZeroEstimatedTime(String),
    /// A game must have at least one level.
    #[error("game {0} declares no levels")]
    NoLevels(String),
    /// Objective ids must be unique within a game.
    #[error("game {0} has duplicate objective id {1}")]
    DuplicateObjective(String, String),
    /// Game ids must be unique across the registry.
    #[error("duplicate game id: {0}")]
    DuplicateGameId(String),
}

/// Validate a single game descriptor.
pub fn validate_meta(meta: &GameMeta) -> Result<(), ValidationError> {
    if meta.id.0.trim().is_empty() {
        return Err(ValidationError::EmptyId);
    }
    if meta.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle(meta.id.0.clone()));
    }
    if meta.estimated_time_min == 0 {
        return Err(ValidationError::ZeroEstimatedTime(meta.id.0.clone()));
    }
    if meta.levels == 0 {
        return Err(ValidationError::NoLevels(meta.id.0.clone()));
    }
    let mut seen = BTreeSet::new();
    for obj in &meta.objectives {
        if !seen.insert(&obj.id) {
            return Err(ValidationError::DuplicateObjective(
                meta.id.0.clone(),
                obj.id.clone(),
            ));
        }
    }
    Ok(())
}

/// Validate that a set of registered game ids contains no duplicates.
pub fn validate_unique_ids(ids: &[GameId]) -> Result<(), ValidationError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateGameId(id.0.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(id: &str) -> GameMeta {
        GameMeta {
            id: GameId::new(id),
            title: "Test Game".to_string(),
            summary: "A test".to_string(),
            estimated_time_min: 5,
            objectives: vec![LearningObjective {
                id: "obj-1".to_string(),
                text: "Learn a thing".to_string(),
                rubric: vec!["Knows the thing".to_string()],
            }],
            controls: Controls {
                mouse: true,
                touch: true,
                keyboard: true,
            },
            tutorial_steps: vec!["Step one".to_string()],
            levels: 3,
        }
    }

    #[test]
    fn valid_meta_passes() {
        validate_meta(&meta("npv-builder")).unwrap();
    }

    #[test]
    fn empty_id_rejected() {
        let mut m = meta("x");
        m.id = GameId::new("  ");
        assert_eq!(validate_meta(&m), Err(ValidationError::EmptyId));
    }

    #[test]
    fn zero_levels_rejected() {
        let mut m = meta("x");
        m.levels = 0;
        assert_eq!(
            validate_meta(&m),
            Err(ValidationError::NoLevels("x".to_string()))
        );
    }

    #[test]
    fn duplicate_objectives_rejected() {
        let mut m = meta("x");
        m.objectives.push(m.objectives[0].clone());
        assert!(matches!(
            validate_meta(&m),
            Err(ValidationError::DuplicateObjective(_, _))
        ));
    }

    #[test]
    fn duplicate_game_ids_rejected() {
        let ids = vec![GameId::new("a"), GameId::new("b"), GameId::new("a")];
        assert_eq!(
            validate_unique_ids(&ids),
            Err(ValidationError::DuplicateGameId("a".to_string()))
        );
    }

    #[test]
    fn serde_roundtrip_meta() {
        let m = meta("budget-battle");
        let s = serde_json::to_string(&m).unwrap();
        let back: GameMeta = serde_json::from_str(&s).unwrap();
        assert_eq!(back.id, GameId::new("budget-battle"));
        assert_eq!(back.levels, 3);
    }
}
