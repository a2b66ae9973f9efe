//! Elasticity explorer: demand curve sampling, classification, and quests.

use arcade_core::{
    ActionPayload, Controls, DemandPoint, Direction, ElasticityAction, ElasticityClass,
    ElasticityState, Game, GameEvent, GameId, GameMeta, GameState, GameView, LearningObjective,
    Quest, QuestTarget, SessionStats,
};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Number of quest levels.
pub const LEVELS: u32 = 3;

/// Demand curve: P = 100 - 2Q.
pub const PRICE_INTERCEPT: f64 = 100.0;
/// Price drop per unit of quantity (dP/dQ is -2).
pub const PRICE_SLOPE: f64 = 2.0;
/// Quantity response per unit of price (dQ/dP) on the same line.
pub const QUANTITY_SLOPE: f64 = -0.5;
/// Largest sampled quantity.
pub const MAX_QUANTITY: u32 = 50;

/// Revenue tolerance for revenue-target quests.
const REVENUE_TOLERANCE: f64 = 50.0;
/// Price tolerance for price-point quests.
const PRICE_TOLERANCE: f64 = 2.0;
/// Points per quest, awarded exactly once.
const QUEST_POINTS: u32 = 100;
/// Pass bonus folded in by a `Complete` event.
const PASS_BONUS: u32 = 100;

/// Point elasticity E = (dQ/dP) · P/Q.
///
/// Unbounded at the vertical intercept: quantity zero yields negative
/// infinity (perfectly elastic). At price zero the result is zero
/// (perfectly inelastic).
pub fn point_elasticity(price: f64, quantity: f64) -> f64 {
    if quantity == 0.0 {
        return f64::NEG_INFINITY;
    }
    QUANTITY_SLOPE * price / quantity
}

/// Total revenue at a point.
pub fn revenue(price: f64, quantity: f64) -> f64 {
    price * quantity
}

/// Marginal revenue for the linear curve: MR = 2P - intercept.
pub fn marginal_revenue(price: f64) -> f64 {
    2.0 * price - PRICE_INTERCEPT
}

/// Classify an elasticity value.
pub fn classify(elasticity: f64) -> ElasticityClass {
    let abs = elasticity.abs();
    if abs.is_infinite() {
        ElasticityClass::PerfectlyElastic
    } else if abs == 0.0 {
        ElasticityClass::PerfectlyInelastic
    } else if abs > 1.0 {
        ElasticityClass::Elastic
    } else if abs < 1.0 {
        ElasticityClass::Inelastic
    } else {
        ElasticityClass::Unit
    }
}

/// Sample the demand curve once, annotating each point.
pub fn demand_curve() -> Vec<DemandPoint> {
    (0..=MAX_QUANTITY)
        .step_by(2)
        .map(|q| {
            let quantity = q as f64;
            let price = PRICE_INTERCEPT - PRICE_SLOPE * quantity;
            DemandPoint {
                price,
                quantity,
                elasticity: point_elasticity(price, quantity),
                revenue: revenue(price, quantity),
            }
        })
        .collect()
}

/// Nearest sampled point by Manhattan distance; first minimal match wins.
pub fn snap_to_curve(curve: &[DemandPoint], price: f64, quantity: f64) -> Option<DemandPoint> {
    let mut best: Option<(DemandPoint, f64)> = None;
    for point in curve {
        let distance = (point.price - price).abs() + (point.quantity - quantity).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((*point, distance)),
        }
    }
    best.map(|(point, _)| point)
}

fn quest(id: &str, title: &str, description: &str, target: QuestTarget) -> Quest {
    Quest {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        target,
        completed: false,
    }
}

/// The quest set offered at a level; clamped to the last level.
pub fn quests_for_level(level: u32) -> Vec<Quest> {
    match level.clamp(1, LEVELS) {
        1 => vec![
            quest(
                "find-elastic",
                "Find Elastic Demand",
                "Move to a point where demand is elastic (|E| > 1)",
                QuestTarget::ElasticityRange {
                    min: f64::NEG_INFINITY,
                    max: -1.0,
                },
            ),
            quest(
                "find-inelastic",
                "Find Inelastic Demand",
                "Move to a point where demand is inelastic (|E| < 1)",
                QuestTarget::ElasticityRange { min: -1.0, max: 0.0 },
            ),
        ],
        2 => vec![
            quest(
                "unit-elasticity",
                "Find Unit Elasticity",
                "Find the point where |E| = 1 (approximately)",
                QuestTarget::ElasticityRange {
                    min: -1.1,
                    max: -0.9,
                },
            ),
            quest(
                "max-revenue",
                "Maximize Revenue",
                "Find the price that maximizes total revenue",
                QuestTarget::Revenue { target: 1200.0 },
            ),
        ],
        _ => vec![
            quest(
                "revenue-elasticity",
                "Revenue and Elasticity",
                "Show that revenue is maximized when demand is unit elastic",
                QuestTarget::ElasticityRange {
                    min: -1.1,
                    max: -0.9,
                },
            ),
            quest(
                "price-discrimination",
                "Price Strategy",
                "Find the optimal price for a monopolist (where MR = MC = 0)",
                QuestTarget::PricePoint { price: 50.0 },
            ),
        ],
    }
}

fn quest_met(target: QuestTarget, point: &DemandPoint) -> bool {
    match target {
        QuestTarget::ElasticityRange { min, max } => {
            point.elasticity >= min && point.elasticity <= max
        }
        QuestTarget::Revenue { target } => (point.revenue - target).abs() <= REVENUE_TOLERANCE,
        QuestTarget::PricePoint { price } => (point.price - price).abs() <= PRICE_TOLERANCE,
    }
}

fn initial_state() -> ElasticityState {
    let curve = demand_curve();
    let start = curve[curve.len() / 2];
    ElasticityState {
        stats: SessionStats::new(),
        price: start.price,
        quantity: start.quantity,
        elasticity: start.elasticity,
        revenue: start.revenue,
        marginal_revenue: marginal_revenue(start.price),
        curve,
        quests: quests_for_level(1),
        completed_quests: Vec::new(),
    }
}

/// Snap to the curve and settle quest completions for the new point.
fn move_to(mut s: ElasticityState, price: f64, quantity: f64) -> ElasticityState {
    if !price.is_finite() || !quantity.is_finite() {
        return s;
    }
    let Some(point) = snap_to_curve(&s.curve, price, quantity) else {
        return s;
    };
    s.price = point.price;
    s.quantity = point.quantity;
    s.elasticity = point.elasticity;
    s.revenue = point.revenue;
    s.marginal_revenue = marginal_revenue(point.price);

    let mut earned = 0u32;
    for quest in s.quests.iter_mut() {
        if quest.completed || !quest_met(quest.target, &point) {
            continue;
        }
        quest.completed = true;
        if !s.completed_quests.iter().any(|id| id == &quest.id) {
            debug!(quest = %quest.id, "quest completed");
            s.completed_quests.push(quest.id.clone());
            earned += QUEST_POINTS;
        }
    }
    s.stats.score += earned;
    s
}

fn apply(s: ElasticityState, action: ElasticityAction) -> ElasticityState {
    match action {
        ElasticityAction::MovePoint { price, quantity } => move_to(s, price, quantity),
        ElasticityAction::DirectionalMove { direction } => {
            let (mut price, mut quantity) = (s.price, s.quantity);
            match direction {
                Direction::Left => quantity = (quantity - 1.0).max(0.0),
                Direction::Right => quantity = (quantity + 1.0).min(MAX_QUANTITY as f64),
                Direction::Up => price = (price + 1.0).min(PRICE_INTERCEPT),
                Direction::Down => price = (price - 1.0).max(0.0),
            }
            // Stay on the curve: re-derive the other coordinate.
            match direction {
                Direction::Left | Direction::Right => {
                    price = PRICE_INTERCEPT - PRICE_SLOPE * quantity;
                }
                Direction::Up | Direction::Down => {
                    quantity = (PRICE_INTERCEPT - price) / PRICE_SLOPE;
                }
            }
            move_to(s, price, quantity)
        }
        ElasticityAction::NextLevel => {
            let mut s = s;
            let next = (s.stats.level + 1).min(LEVELS);
            s.stats.level = next;
            s.quests = quests_for_level(next);
            s
        }
    }
}

fn reduce(mut s: ElasticityState, event: GameEvent) -> ElasticityState {
    match event {
        GameEvent::Start => {
            s.stats.reset_transient();
            s
        }
        GameEvent::Action(ActionPayload::Elasticity(action)) => apply(s, action),
        GameEvent::Action(_) | GameEvent::Hint | GameEvent::Quit => s,
        GameEvent::Complete { passed, .. } => {
            if passed {
                s.stats.score += PASS_BONUS;
            }
            s
        }
    }
}

fn view_state(meta: &GameMeta, s: &ElasticityState) -> GameView {
    let class = classify(s.elasticity);
    let mut lines = vec![
        format!("Price ${:.0} | Quantity {:.0}", s.price, s.quantity),
        format!(
            "Elasticity {:.2} ({}) | Revenue ${:.0} | MR {:.0}",
            s.elasticity,
            class.label(),
            s.revenue,
            s.marginal_revenue
        ),
    ];
    for quest in &s.quests {
        let mark = if quest.completed { "x" } else { " " };
        lines.push(format!("  [{mark}] {}: {}", quest.title, quest.description));
    }
    GameView {
        title: meta.title.clone(),
        status: format!(
            "Level {} | Score {} | Mistakes {}",
            s.stats.level, s.stats.score, s.stats.mistakes
        ),
        lines,
    }
}

/// The elasticity explorer game.
pub struct ElasticityGame {
    meta: GameMeta,
}

impl ElasticityGame {
    pub fn new() -> Self {
        Self { meta: meta() }
    }
}

impl Default for ElasticityGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for ElasticityGame {
    fn meta(&self) -> &GameMeta {
        &self.meta
    }

    fn init(&self, _rng: &mut ChaCha8Rng) -> GameState {
        GameState::Elasticity(initial_state())
    }

    fn update(&self, state: GameState, event: GameEvent, _rng: &mut ChaCha8Rng) -> GameState {
        match state {
            GameState::Elasticity(s) => GameState::Elasticity(reduce(s, event)),
            other => other,
        }
    }

    fn view(&self, state: &GameState) -> GameView {
        match state {
            GameState::Elasticity(s) => view_state(&self.meta, s),
            _ => GameView {
                title: self.meta.title.clone(),
                status: "inactive".to_string(),
                lines: Vec::new(),
            },
        }
    }

    fn assess_mastery(&self, state: &GameState) -> bool {
        match state {
            GameState::Elasticity(s) => {
                let total_quests = (s.stats.level * 2).max(1);
                let completion = s.completed_quests.len() as f64 / total_quests as f64;
                s.stats.level >= LEVELS && completion >= 0.8 && s.stats.score >= 400
            }
            _ => false,
        }
    }
}

fn meta() -> GameMeta {
    GameMeta {
        id: GameId::new("elasticity-explorer"),
        title: "Elasticity Explorer".to_string(),
        summary: "Explore price elasticity of demand through an interactive demand curve. Learn \
                  how elasticity affects revenue and business decisions."
            .to_string(),
        estimated_time_min: 12,
        objectives: vec![
            LearningObjective {
                id: "understand-elasticity".to_string(),
                text: "Understand price elasticity concepts".to_string(),
                rubric: vec![
                    "Can distinguish between elastic and inelastic demand".to_string(),
                    "Understands how elasticity changes along a linear demand curve".to_string(),
                    "Knows the relationship between elasticity and revenue".to_string(),
                ],
            },
            LearningObjective {
                id: "interpret-graphs".to_string(),
                text: "Interpret demand and revenue curves".to_string(),
                rubric: vec![
                    "Can read elasticity values from the demand curve".to_string(),
                    "Understands the shape of the revenue curve".to_string(),
                    "Identifies the revenue-maximizing price".to_string(),
                ],
            },
            LearningObjective {
                id: "business-applications".to_string(),
                text: "Apply elasticity to business decisions".to_string(),
                rubric: vec![
                    "Understands when to raise or lower prices".to_string(),
                    "Can explain marginal revenue concepts".to_string(),
                    "Makes pricing recommendations based on elasticity".to_string(),
                ],
            },
        ],
        controls: Controls {
            mouse: true,
            touch: true,
            keyboard: true,
        },
        tutorial_steps: vec![
            "Welcome to Elasticity Explorer! Price elasticity measures how responsive quantity \
             demanded is to price changes."
                .to_string(),
            "Move along the demand curve and watch how elasticity changes at different points!"
                .to_string(),
            "Elasticity = % change in quantity / % change in price. Values greater than 1 (in \
             absolute terms) are 'elastic'."
                .to_string(),
            "Check total revenue (Price x Quantity) at each point.".to_string(),
            "Notice: Revenue is maximized where elasticity equals -1 (unit elastic). This is key \
             for pricing decisions!"
                .to_string(),
            "Complete the quests to master elasticity concepts. Use arrow keys for precise \
             movement if needed."
                .to_string(),
        ],
        levels: LEVELS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(3)
    }

    fn move_point(game: &ElasticityGame, state: GameState, price: f64, quantity: f64) -> GameState {
        game.update(
            state,
            GameEvent::Action(ActionPayload::Elasticity(ElasticityAction::MovePoint {
                price,
                quantity,
            })),
            &mut rng(),
        )
    }

    #[test]
    fn midpoint_is_exactly_unit_elastic_and_revenue_maximal() {
        let e = point_elasticity(50.0, 25.0);
        assert_eq!(e, -1.0);
        assert_eq!(classify(e), ElasticityClass::Unit);
        assert_eq!(classify(e).label(), "unit");

        let curve = demand_curve();
        let mid = curve
            .iter()
            .find(|p| p.price == 50.0 && p.quantity == 25.0)
            .copied();
        // Q steps by 2, so Q=25 itself is off-grid; check the revenue peak
        // of the sampled curve brackets 1250 at the adjacent samples.
        assert!(mid.is_none());
        let max_revenue = curve.iter().map(|p| p.revenue).fold(f64::MIN, f64::max);
        assert_eq!(max_revenue, 1248.0);
        assert!(revenue(50.0, 25.0) == 1250.0);
        assert!(curve.iter().all(|p| p.revenue <= 1250.0));
    }

    #[test]
    fn intercepts_carry_the_perfect_labels() {
        let curve = demand_curve();
        let first = curve.first().unwrap();
        let last = curve.last().unwrap();
        assert_eq!(first.quantity, 0.0);
        assert_eq!(classify(first.elasticity), ElasticityClass::PerfectlyElastic);
        assert_eq!(last.price, 0.0);
        assert_eq!(classify(last.elasticity), ElasticityClass::PerfectlyInelastic);
    }

    #[test]
    fn snapping_prefers_the_first_minimal_match() {
        let curve = demand_curve();
        // Exactly between the samples at Q=10 and Q=12: first wins.
        let point = snap_to_curve(&curve, 0.0, 11.0).unwrap();
        // Price dominates the Manhattan distance here, so the snap pulls
        // toward the low-price end; ties resolve to the earlier sample.
        assert!(curve.contains(&point));
        let exact = snap_to_curve(&curve, 60.0, 20.0).unwrap();
        assert_eq!(exact.quantity, 20.0);
        assert_eq!(exact.price, 60.0);
    }

    #[test]
    fn movement_snaps_to_sampled_points() {
        let game = ElasticityGame::new();
        let state = game.init(&mut rng());
        let state = move_point(&game, state, 49.0, 24.0);
        match state {
            GameState::Elasticity(s) => {
                assert_eq!(s.quantity % 2.0, 0.0);
                assert_eq!(s.price, PRICE_INTERCEPT - PRICE_SLOPE * s.quantity);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn quests_award_points_exactly_once() {
        let game = ElasticityGame::new();
        let mut state = game.init(&mut rng());
        // Elastic region (low quantity), twice.
        state = move_point(&game, state, 90.0, 4.0);
        state = move_point(&game, state, 80.0, 10.0);
        match &state {
            GameState::Elasticity(s) => {
                assert!(s.completed_quests.iter().any(|q| q == "find-elastic"));
                assert_eq!(s.stats.score, 100);
            }
            _ => unreachable!(),
        }
        // Inelastic region completes the second quest.
        let state = move_point(&game, state, 20.0, 40.0);
        match state {
            GameState::Elasticity(s) => {
                assert_eq!(s.completed_quests.len(), 2);
                assert_eq!(s.stats.score, 200);
                assert!(s.quests.iter().all(|q| q.completed));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn directional_moves_stay_on_the_curve() {
        let game = ElasticityGame::new();
        let mut state = game.init(&mut rng());
        for direction in [
            Direction::Left,
            Direction::Left,
            Direction::Up,
            Direction::Right,
            Direction::Down,
        ] {
            state = game.update(
                state,
                GameEvent::Action(ActionPayload::Elasticity(
                    ElasticityAction::DirectionalMove { direction },
                )),
                &mut rng(),
            );
            match &state {
                GameState::Elasticity(s) => {
                    assert_eq!(s.price, PRICE_INTERCEPT - PRICE_SLOPE * s.quantity);
                }
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn completions_survive_level_advance() {
        let game = ElasticityGame::new();
        let mut state = game.init(&mut rng());
        state = move_point(&game, state, 90.0, 4.0);
        state = game.update(
            state,
            GameEvent::Action(ActionPayload::Elasticity(ElasticityAction::NextLevel)),
            &mut rng(),
        );
        match state {
            GameState::Elasticity(s) => {
                assert_eq!(s.stats.level, 2);
                assert!(s.completed_quests.iter().any(|q| q == "find-elastic"));
                assert!(s.quests.iter().all(|q| !q.completed));
                assert_eq!(s.quests[0].id, "unit-elasticity");
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn revenue_quest_matches_near_the_peak() {
        let peak = DemandPoint {
            price: 52.0,
            quantity: 24.0,
            elasticity: point_elasticity(52.0, 24.0),
            revenue: revenue(52.0, 24.0),
        };
        assert!(quest_met(QuestTarget::Revenue { target: 1200.0 }, &peak));
        let far = DemandPoint {
            price: 90.0,
            quantity: 5.0,
            elasticity: point_elasticity(90.0, 5.0),
            revenue: revenue(90.0, 5.0),
        };
        assert!(!quest_met(QuestTarget::Revenue { target: 1200.0 }, &far));
    }

    proptest! {
        #[test]
        fn snap_is_total_over_finite_inputs(price in -50.0f64..150.0, quantity in -20.0f64..70.0) {
            let curve = demand_curve();
            let point = snap_to_curve(&curve, price, quantity).unwrap();
            prop_assert!(curve.contains(&point));
        }

        #[test]
        fn classification_covers_the_sampled_curve(idx in 0usize..26) {
            let curve = demand_curve();
            let class = classify(curve[idx].elasticity);
            // Every sampled point lands on a defined label.
            let label = class.label();
            prop_assert!(!label.is_empty());
        }
    }
}
