//! Budget battle: allocation rules, round resolution, and scenario events.

use arcade_core::{
    ActionPayload, BudgetAction, BudgetCategory, BudgetState, BudgetViolation, CategoryKind,
    Controls, Game, GameEvent, GameId, GameMeta, GameState, GameView, LearningObjective,
    ScenarioEvent, ScenarioKind, SessionStats,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

/// Rounds in a full session.
pub const TOTAL_ROUNDS: u32 = 5;
/// Probability that a scenario event fires on submission.
const EVENT_PROBABILITY: f64 = 0.7;
/// Points for a successful round.
const ROUND_POINTS: u32 = 100;
/// Bonus once the streak reaches three.
const STREAK_BONUS: u32 = 50;
/// Pass bonus folded in by a `Complete` event.
const PASS_BONUS: u32 = 100;

const SAVINGS_NAME: &str = "Savings";
const DEBT_NAME: &str = "Debt Payments";

/// Result of checking a budget against the allocation rules.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetReport {
    pub valid: bool,
    pub total_allocated: Decimal,
    /// Savings as a percentage of income, for display.
    pub savings_rate: f64,
    /// Violated rules in report order.
    pub violations: Vec<BudgetViolation>,
}

fn allocated_for(categories: &[BudgetCategory], name: &str) -> Decimal {
    categories
        .iter()
        .find(|c| c.name == name)
        .map(|c| c.allocated)
        .unwrap_or(Decimal::ZERO)
}

fn rate_pct(part: Decimal, whole: Decimal) -> f64 {
    if whole <= Decimal::ZERO {
        return 0.0;
    }
    (part / whole).to_f64().unwrap_or(0.0) * 100.0
}

/// Check a budget: total within income, savings >= 15%, debt >= 10%.
///
/// Pure and idempotent; the same categories and income always yield the
/// same report. Rule comparisons are exact Decimal arithmetic.
pub fn validate_budget(categories: &[BudgetCategory], income: Decimal) -> BudgetReport {
    let total: Decimal = categories.iter().map(|c| c.allocated).sum();
    let savings = allocated_for(categories, SAVINGS_NAME);
    let debt = allocated_for(categories, DEBT_NAME);

    let mut violations = Vec::new();
    if total > income {
        violations.push(BudgetViolation::IncomeExceeded);
    }
    if savings * Decimal::ONE_HUNDRED < income * Decimal::new(15, 0) {
        violations.push(BudgetViolation::SavingsShortfall);
    }
    if debt * Decimal::new(10, 0) < income {
        violations.push(BudgetViolation::DebtShortfall);
    }

    BudgetReport {
        valid: violations.is_empty(),
        total_allocated: total,
        savings_rate: rate_pct(savings, income),
        violations,
    }
}

fn category(
    income: Decimal,
    id: &str,
    name: &str,
    kind: CategoryKind,
    share_pct: i64,
    priority: u8,
) -> BudgetCategory {
    BudgetCategory {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        allocated: (income * Decimal::new(share_pct, 2)).round(),
        spent: Decimal::ZERO,
        priority,
    }
}

/// The default allocation split for a monthly income.
pub fn default_categories(income: Decimal) -> Vec<BudgetCategory> {
    vec![
        category(income, "housing", "Housing", CategoryKind::Fixed, 25, 1),
        category(income, "transportation", "Transportation", CategoryKind::Variable, 15, 2),
        category(income, "food", "Food", CategoryKind::Variable, 12, 1),
        category(income, "utilities", "Utilities", CategoryKind::Fixed, 8, 1),
        category(income, "healthcare", "Healthcare", CategoryKind::Variable, 5, 1),
        category(income, "entertainment", "Entertainment", CategoryKind::Variable, 5, 3),
        category(income, "savings", SAVINGS_NAME, CategoryKind::Variable, 20, 1),
        category(income, "debt-payments", DEBT_NAME, CategoryKind::Fixed, 10, 1),
    ]
}

fn scenario(
    id: &str,
    title: &str,
    description: &str,
    impact: i64,
    target: Option<&str>,
    kind: ScenarioKind,
) -> ScenarioEvent {
    ScenarioEvent {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        impact: Decimal::new(impact, 0),
        category: target.map(|c| c.to_string()),
        kind,
    }
}

/// The pool of random scenario events resolved on submission.
pub fn scenario_events() -> Vec<ScenarioEvent> {
    vec![
        scenario(
            "car-repair",
            "Car Repair Emergency",
            "Your car broke down and needs immediate repair",
            -800,
            Some("Transportation"),
            ScenarioKind::Expense,
        ),
        scenario(
            "medical-bill",
            "Unexpected Medical Bill",
            "Insurance didn't cover everything",
            -400,
            Some("Healthcare"),
            ScenarioKind::Expense,
        ),
        scenario(
            "bonus",
            "Work Bonus",
            "Great performance this quarter!",
            600,
            None,
            ScenarioKind::Income,
        ),
        scenario(
            "utility-spike",
            "High Utility Bill",
            "Extreme weather increased your energy costs",
            -200,
            Some("Utilities"),
            ScenarioKind::Expense,
        ),
        scenario(
            "freelance-income",
            "Freelance Project",
            "Side hustle paying off!",
            300,
            None,
            ScenarioKind::Income,
        ),
        scenario(
            "subscription-increase",
            "Subscription Price Increase",
            "Your streaming services just got more expensive",
            -50,
            Some("Entertainment"),
            ScenarioKind::Expense,
        ),
    ]
}

fn initial_state() -> BudgetState {
    let income = Decimal::new(4000, 0);
    BudgetState {
        stats: SessionStats::new(),
        categories: default_categories(income),
        monthly_income: income,
        events: Vec::new(),
        current_round: 1,
        total_rounds: TOTAL_ROUNDS,
        cash_buffer: Decimal::new(500, 0),
        savings_goal: (income * Decimal::new(15, 2)).round(),
        consecutive_successes: 0,
    }
}

/// Resolve an accepted submission: maybe fire an event, then score the round.
fn resolve_round(mut s: BudgetState, fired: Option<ScenarioEvent>) -> BudgetState {
    if let Some(event) = fired {
        match event.kind {
            ScenarioKind::Income => s.monthly_income += event.impact,
            ScenarioKind::Expense => {
                if let Some(name) = &event.category {
                    if let Some(cat) = s.categories.iter_mut().find(|c| &c.name == name) {
                        cat.spent += event.impact.abs();
                    }
                } else {
                    // Uncategorized costs come out of the buffer.
                    s.cash_buffer += event.impact;
                }
            }
        }
        debug!(event = %event.id, impact = %event.impact, "scenario event fired");
        s.events.push(event);
    }

    let total_spent: Decimal = s.categories.iter().map(|c| c.spent).sum();
    let cash_flow = s.monthly_income - total_spent;
    let savings = allocated_for(&s.categories, SAVINGS_NAME);
    let success = cash_flow > Decimal::ZERO
        && savings * Decimal::ONE_HUNDRED >= s.monthly_income * Decimal::new(15, 0);

    s.consecutive_successes = if success {
        s.consecutive_successes + 1
    } else {
        0
    };
    if success {
        s.stats.score += ROUND_POINTS;
        if s.consecutive_successes >= 3 {
            s.stats.score += STREAK_BONUS;
        }
    }
    s.current_round += 1;
    s.cash_buffer = s.cash_buffer.max(Decimal::ZERO);
    s
}

fn apply(mut s: BudgetState, action: BudgetAction, rng: &mut ChaCha8Rng) -> BudgetState {
    match action {
        BudgetAction::Allocate {
            category_id,
            amount,
        } => {
            let Some(idx) = s.categories.iter().position(|c| c.id == category_id) else {
                return s;
            };
            s.categories[idx].allocated = amount.max(Decimal::ZERO);
            s
        }
        BudgetAction::SubmitBudget => {
            let report = validate_budget(&s.categories, s.monthly_income);
            if !report.valid {
                debug!(violations = ?report.violations, "budget rejected");
                s.stats.mistakes += 1;
                return s;
            }
            let fired = if rng.gen::<f64>() < EVENT_PROBABILITY {
                let pool = scenario_events();
                Some(pool[rng.gen_range(0..pool.len())].clone())
            } else {
                None
            };
            resolve_round(s, fired)
        }
        BudgetAction::UseEmergencyFund { amount } => {
            if amount < Decimal::ZERO {
                return s;
            }
            s.cash_buffer = (s.cash_buffer - amount).max(Decimal::ZERO);
            s
        }
    }
}

fn reduce(mut s: BudgetState, event: GameEvent, rng: &mut ChaCha8Rng) -> BudgetState {
    match event {
        GameEvent::Start => {
            s.stats.reset_transient();
            s
        }
        GameEvent::Action(ActionPayload::Budget(action)) => apply(s, action, rng),
        GameEvent::Action(_) | GameEvent::Hint | GameEvent::Quit => s,
        GameEvent::Complete { passed, .. } => {
            if passed {
                s.stats.score += PASS_BONUS;
            }
            s
        }
    }
}

fn view_state(meta: &GameMeta, s: &BudgetState) -> GameView {
    let report = validate_budget(&s.categories, s.monthly_income);
    let mut lines = vec![
        format!(
            "Round {}/{} | Income ${} | Buffer ${}",
            s.current_round, s.total_rounds, s.monthly_income, s.cash_buffer
        ),
        format!(
            "Allocated ${} | Savings rate {:.1}% | Streak {}",
            report.total_allocated, report.savings_rate, s.consecutive_successes
        ),
    ];
    for cat in &s.categories {
        lines.push(format!(
            "  {}: ${} allocated, ${} spent",
            cat.name, cat.allocated, cat.spent
        ));
    }
    for violation in &report.violations {
        lines.push(format!("  ! {violation}"));
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

/// The budget battle game.
pub struct BudgetGame {
    meta: GameMeta,
}

impl BudgetGame {
    pub fn new() -> Self {
        Self { meta: meta() }
    }
}

impl Default for BudgetGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for BudgetGame {
    fn meta(&self) -> &GameMeta {
        &self.meta
    }

    fn init(&self, _rng: &mut ChaCha8Rng) -> GameState {
        GameState::Budget(initial_state())
    }

    fn update(&self, state: GameState, event: GameEvent, rng: &mut ChaCha8Rng) -> GameState {
        match state {
            GameState::Budget(s) => GameState::Budget(reduce(s, event, rng)),
            other => other,
        }
    }

    fn view(&self, state: &GameState) -> GameView {
        match state {
            GameState::Budget(s) => view_state(&self.meta, s),
            _ => GameView {
                title: self.meta.title.clone(),
                status: "inactive".to_string(),
                lines: Vec::new(),
            },
        }
    }

    fn assess_mastery(&self, state: &GameState) -> bool {
        match state {
            GameState::Budget(s) => {
                s.current_round > s.total_rounds
                    && s.consecutive_successes >= 3
                    && s.stats.mistakes <= 3
            }
            _ => false,
        }
    }
}

fn meta() -> GameMeta {
    GameMeta {
        id: GameId::new("budget-battle"),
        title: "Budget Battle".to_string(),
        summary: "Master budgeting skills by allocating income across categories and handling \
                  financial emergencies. Learn to distinguish fixed vs variable costs."
            .to_string(),
        estimated_time_min: 10,
        objectives: vec![
            LearningObjective {
                id: "budget-allocation".to_string(),
                text: "Create balanced budget allocations".to_string(),
                rubric: vec![
                    "Allocates income across all necessary categories".to_string(),
                    "Maintains savings rate of at least 15%".to_string(),
                    "Ensures debt payments meet minimum requirements".to_string(),
                ],
            },
            LearningObjective {
                id: "emergency-handling".to_string(),
                text: "Handle financial emergencies effectively".to_string(),
                rubric: vec![
                    "Maintains positive cash flow during unexpected events".to_string(),
                    "Adjusts variable expenses before fixed expenses".to_string(),
                    "Uses emergency buffer when appropriate".to_string(),
                ],
            },
            LearningObjective {
                id: "sustained-success".to_string(),
                text: "Achieve sustained financial stability".to_string(),
                rubric: vec![
                    "Maintains positive cash balance for 3+ consecutive rounds".to_string(),
                    "Meets savings goals consistently".to_string(),
                    "Demonstrates understanding of fixed vs variable costs".to_string(),
                ],
            },
        ],
        controls: Controls {
            mouse: true,
            touch: true,
            keyboard: true,
        },
        tutorial_steps: vec![
            "Welcome to Budget Battle! You'll learn to manage money by creating and maintaining a \
             monthly budget."
                .to_string(),
            "Your monthly income is displayed at the top. You need to allocate this across \
             different spending categories."
                .to_string(),
            "Notice the difference: Fixed costs (like rent) stay the same each month, while \
             variable costs can be adjusted."
                .to_string(),
            "You must maintain at least 15% savings rate and 10% for debt payments - these are \
             non-negotiable!"
                .to_string(),
            "Watch out for random events! Car repairs, bonuses, and emergencies will test your \
             budget flexibility."
                .to_string(),
            "Success means keeping positive cash flow for 3 months straight. Can you maintain \
             financial stability?"
                .to_string(),
        ],
        levels: TOTAL_ROUNDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    fn income() -> Decimal {
        Decimal::new(4000, 0)
    }

    #[test]
    fn default_split_is_valid() {
        let categories = default_categories(income());
        let report = validate_budget(&categories, income());
        assert!(report.valid, "violations: {:?}", report.violations);
        assert_eq!(report.total_allocated, income());
        assert!((report.savings_rate - 20.0).abs() < 1e-9);
    }

    #[test]
    fn violations_are_reported_in_order() {
        let mut categories = default_categories(income());
        // Starve savings and debt, then overshoot housing past income.
        for cat in categories.iter_mut() {
            match cat.id.as_str() {
                "savings" => cat.allocated = Decimal::new(100, 0),
                "debt-payments" => cat.allocated = Decimal::new(100, 0),
                "housing" => cat.allocated = Decimal::new(4000, 0),
                _ => {}
            }
        }
        let report = validate_budget(&categories, income());
        assert!(!report.valid);
        assert_eq!(
            report.violations,
            vec![
                BudgetViolation::IncomeExceeded,
                BudgetViolation::SavingsShortfall,
                BudgetViolation::DebtShortfall,
            ]
        );
    }

    #[test]
    fn validator_is_idempotent() {
        let categories = default_categories(income());
        let first = validate_budget(&categories, income());
        let second = validate_budget(&categories, income());
        assert_eq!(first, second);
    }

    #[test]
    fn successful_round_without_event_advances_streak() {
        // No scenario event: score the round directly.
        let s = resolve_round(initial_state(), None);
        assert_eq!(s.consecutive_successes, 1);
        assert_eq!(s.current_round, 2);
        assert_eq!(s.stats.score, ROUND_POINTS);
        assert_eq!(s.stats.mistakes, 0);
    }

    #[test]
    fn invalid_submission_counts_a_mistake_and_holds_the_round() {
        let game = BudgetGame::new();
        let mut state = game.init(&mut rng());
        state = game.update(
            state,
            GameEvent::Action(ActionPayload::Budget(BudgetAction::Allocate {
                category_id: "savings".to_string(),
                amount: Decimal::ZERO,
            })),
            &mut rng(),
        );
        let state = game.update(
            state,
            GameEvent::Action(ActionPayload::Budget(BudgetAction::SubmitBudget)),
            &mut rng(),
        );
        match state {
            GameState::Budget(s) => {
                assert_eq!(s.stats.mistakes, 1);
                assert_eq!(s.current_round, 1);
                assert_eq!(s.consecutive_successes, 0);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn streak_bonus_lands_on_the_third_success() {
        let mut s = initial_state();
        for _ in 0..3 {
            s = resolve_round(s, None);
        }
        assert_eq!(s.consecutive_successes, 3);
        // 100 + 100 + (100 + 50)
        assert_eq!(s.stats.score, 350);
    }

    #[test]
    fn income_events_raise_income_and_expense_events_hit_their_category() {
        let pool = scenario_events();
        let bonus = pool.iter().find(|e| e.id == "bonus").unwrap().clone();
        let s = resolve_round(initial_state(), Some(bonus));
        assert_eq!(s.monthly_income, Decimal::new(4600, 0));

        let repair = pool.iter().find(|e| e.id == "car-repair").unwrap().clone();
        let s = resolve_round(initial_state(), Some(repair));
        let transport = s
            .categories
            .iter()
            .find(|c| c.name == "Transportation")
            .unwrap();
        assert_eq!(transport.spent, Decimal::new(800, 0));
        // 4000 income vs 800 spent still cash-flows positive.
        assert_eq!(s.consecutive_successes, 1);
    }

    #[test]
    fn emergency_fund_never_goes_negative() {
        let game = BudgetGame::new();
        let state = game.init(&mut rng());
        let state = game.update(
            state,
            GameEvent::Action(ActionPayload::Budget(BudgetAction::UseEmergencyFund {
                amount: Decimal::new(10_000, 0),
            })),
            &mut rng(),
        );
        match state {
            GameState::Budget(s) => assert_eq!(s.cash_buffer, Decimal::ZERO),
            _ => unreachable!(),
        }
    }

    #[test]
    fn mastery_needs_all_rounds_and_a_streak() {
        let game = BudgetGame::new();
        let mut s = initial_state();
        for _ in 0..TOTAL_ROUNDS {
            s = resolve_round(s, None);
        }
        assert!(s.current_round > s.total_rounds);
        assert!(game.assess_mastery(&GameState::Budget(s.clone())));
        s.stats.mistakes = 4;
        assert!(!game.assess_mastery(&GameState::Budget(s)));
    }

    proptest! {
        #[test]
        fn allocations_never_go_negative(amount in -5_000i64..5_000) {
            let game = BudgetGame::new();
            let state = game.init(&mut rng());
            let state = game.update(
                state,
                GameEvent::Action(ActionPayload::Budget(BudgetAction::Allocate {
                    category_id: "food".to_string(),
                    amount: Decimal::new(amount, 0),
                })),
                &mut rng(),
            );
            match state {
                GameState::Budget(s) => {
                    let food = s.categories.iter().find(|c| c.id == "food").unwrap();
                    prop_assert!(food.allocated >= Decimal::ZERO);
                }
                _ => unreachable!(),
            }
        }

        #[test]
        fn validator_report_is_stable(seed_alloc in 0i64..6_000) {
            let mut categories = default_categories(income());
            categories[0].allocated = Decimal::new(seed_alloc, 0);
            let a = validate_budget(&categories, income());
            let b = validate_budget(&categories, income());
            prop_assert_eq!(a, b);
        }
    }
}
