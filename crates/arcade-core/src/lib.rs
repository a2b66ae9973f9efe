#![deny(warnings)]

//! Core domain models and invariants for the finance arcade.
//!
//! This crate defines the serializable types shared by every mini-game and
//! by the host: the closed event/state unions, the game contract trait, the
//! progress and profile records, and validation helpers that guarantee basic
//! invariants at registration time.

mod analytics;
mod budget;
mod elasticity;
mod event;
mod game;
mod glossary;
mod meta;
mod npv;
mod profile;
mod progress;
mod state;
mod tiles;

pub use analytics::{AnalyticsEvent, AnalyticsKind, AnalyticsLog, ANALYTICS_CAP};
pub use budget::{
    BudgetAction, BudgetCategory, BudgetState, BudgetViolation, CategoryKind, ScenarioEvent,
    ScenarioKind,
};
pub use elasticity::{
    DemandPoint, ElasticityAction, ElasticityClass, ElasticityState, Quest, QuestTarget,
};
pub use event::{ActionPayload, Direction, GameEvent};
pub use game::{Game, GameView};
pub use glossary::{glossary, GlossaryEntry};
pub use meta::{
    validate_meta, validate_unique_ids, Controls, GameId, GameMeta, LearningObjective,
    ValidationError,
};
pub use npv::{CashFlow, InvestmentDecision, NpvAction, NpvState, Project, ScheduledFlow};
pub use profile::{level_for_xp, xp_progress, UserProfile, XpProgress, XP_PERSONAL_BEST, XP_PER_PLAY};
pub use progress::GameProgress;
pub use state::{GameState, SessionStats};
pub use tiles::{Grid, TileAction, TileState, GRID_SIZE};
