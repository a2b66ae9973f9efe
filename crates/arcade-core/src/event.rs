use crate::{BudgetAction, ElasticityAction, NpvAction, TileAction};
use serde::{Deserialize, Serialize};

/// An event dispatched from the view into the active game's reducer.
///
/// Carries no identity; consumed once. Reducers are total over this type:
/// every variant produces a next state without panicking, and a payload
/// addressed to a different game is a no-op.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Begin a session or level; resets transient counters.
    Start,
    /// A game-specific named operation.
    Action(ActionPayload),
    /// The player asked for a hint; reducers pass through, the host records it.
    Hint,
    /// An externally-decided pass/fail folded into the session.
    Complete { passed: bool, score: u32 },
    /// Host-level signal; reducers pass state through unchanged.
    Quit,
}

/// Closed union of per-game action payloads.
///
/// Replaces an untyped name/payload bag: each game matches its own variant
/// exhaustively and ignores the rest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActionPayload {
    Npv(NpvAction),
    Budget(BudgetAction),
    Elasticity(ElasticityAction),
    Tiles(TileAction),
}

/// A directional input, shared by grid movement and curve navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip_event() {
        let e = GameEvent::Complete {
            passed: true,
            score: 120,
        };
        let s = serde_json::to_string(&e).unwrap();
        let back: GameEvent = serde_json::from_str(&s).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn serde_roundtrip_action() {
        let e = GameEvent::Action(ActionPayload::Tiles(TileAction::Move {
            direction: Direction::Left,
        }));
        let s = serde_json::to_string(&e).unwrap();
        let back: GameEvent = serde_json::from_str(&s).unwrap();
        assert_eq!(back, e);
    }
}
