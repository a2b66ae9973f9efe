use crate::{GameEvent, GameMeta, GameState};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A renderable projection of a game state.
///
/// Pure data: the host decides how to present it. This is the headless
/// stand-in for a visual renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameView {
    /// Game title.
    pub title: String,
    /// One-line status (level, score, mistakes).
    pub status: String,
    /// Body lines describing the current state.
    pub lines: Vec<String>,
}

/// The capability set every registered game exposes.
///
/// The host only ever calls these five capabilities; it never inspects the
/// game-internal state shape. Reducers are pure: `update` must return a
/// fresh value and never panic for any (state, event) pair.
pub trait Game {
    /// Static descriptor: id, title, objectives, tutorial, level count.
    fn meta(&self) -> &GameMeta;

    /// Build the initial state for a fresh session.
    fn init(&self, rng: &mut ChaCha8Rng) -> GameState;

    /// Compute the next state for an event.
    ///
    /// Total and deterministic given (state, event, RNG stream). Events or
    /// payloads that do not apply return the input state unchanged; domain
    /// errors degrade to a no-op or a `mistakes` increment.
    fn update(&self, state: GameState, event: GameEvent, rng: &mut ChaCha8Rng) -> GameState;

    /// Project the state into a presentable view.
    fn view(&self, state: &GameState) -> GameView;

    /// Whether the final state meets this game's mastery predicate.
    fn assess_mastery(&self, state: &GameState) -> bool;
}
