use crate::{Direction, SessionStats};
use serde::{Deserialize, Serialize};

/// A sampled point on the demand curve, annotated once at generation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DemandPoint {
    pub price: f64,
    pub quantity: f64,
    /// Point elasticity (dQ/dP · P/Q); negative infinity at quantity zero.
    pub elasticity: f64,
    /// Total revenue, price × quantity.
    pub revenue: f64,
}

/// Elasticity classification labels.
///
/// The two perfect extremes are only reachable at the curve intercepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElasticityClass {
    PerfectlyElastic,
    Elastic,
    Unit,
    Inelastic,
    PerfectlyInelastic,
}

impl ElasticityClass {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ElasticityClass::PerfectlyElastic => "perfectly elastic",
            ElasticityClass::Elastic => "elastic",
            ElasticityClass::Unit => "unit",
            ElasticityClass::Inelastic => "inelastic",
            ElasticityClass::PerfectlyInelastic => "perfectly inelastic",
        }
    }
}

/// What a quest asks the player to reach.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum QuestTarget {
    /// An inclusive elasticity band.
    ElasticityRange { min: f64, max: f64 },
    /// A revenue value, within ±50.
    Revenue { target: f64 },
    /// A price point, within ±2.
    PricePoint { price: f64 },
}

/// One quest in the current level's set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target: QuestTarget,
    /// Monotonic: once true, stays true for the level.
    pub completed: bool,
}

/// State of the elasticity game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElasticityState {
    pub stats: SessionStats,
    /// Demand curve sampled once per session.
    pub curve: Vec<DemandPoint>,
    pub price: f64,
    pub quantity: f64,
    pub elasticity: f64,
    pub revenue: f64,
    pub marginal_revenue: f64,
    /// Quest set for the current level.
    pub quests: Vec<Quest>,
    /// Ids of quests completed across all levels; each awards points once.
    pub completed_quests: Vec<String>,
}

/// Actions accepted by the elasticity reducer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ElasticityAction {
    /// Pointer movement; snaps to the nearest sampled point.
    MovePoint { price: f64, quantity: f64 },
    /// Keyboard movement; one unit along the curve, then re-snapped.
    DirectionalMove { direction: Direction },
    /// Load the next level's quest set, bounded at the last level.
    NextLevel,
}
