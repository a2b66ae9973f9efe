//! NPV builder: discounting, investment decisions, and project levels.

use arcade_core::{
    ActionPayload, CashFlow, Controls, Game, GameEvent, GameId, GameMeta, GameState, GameView,
    InvestmentDecision, LearningObjective, NpvAction, NpvState, Project, ScheduledFlow,
    SessionStats,
};
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

/// Number of project levels.
pub const LEVELS: u32 = 3;

/// Points for a correct investment call.
const DECISION_POINTS: u32 = 100;
/// Pass bonus folded in by a `Complete` event.
const PASS_BONUS: u32 = 50;

/// Errors produced by discounting helpers.
#[derive(Debug, Error, PartialEq)]
pub enum MathError {
    /// Rate must be finite and greater than -100%.
    #[error("invalid discount rate: {0}")]
    InvalidRate(f64),
    /// Numeric conversion to or from floating point failed.
    #[error("non-finite numeric conversion")]
    NonFinite,
}

/// Present value of one amount: `amount / (1 + rate)^year`.
///
/// Year 0 is undiscounted regardless of the rate. Decimal in and out;
/// the power is computed in f64 the way the rest of the money math does.
///
/// Example:
/// let amount = Decimal::new(110, 0);
/// let pv = present_value(amount, 0.1, 1).unwrap();
/// assert_eq!(pv, Decimal::new(100, 0));
pub fn present_value(amount: Decimal, rate: f64, year: u32) -> Result<Decimal, MathError> {
    if !rate.is_finite() || rate <= -1.0 {
        return Err(MathError::InvalidRate(rate));
    }
    if year == 0 {
        return Ok(amount);
    }
    let a = amount.to_f64().ok_or(MathError::NonFinite)?;
    let pv = a / (1.0 + rate).powi(year as i32);
    if !pv.is_finite() {
        return Err(MathError::NonFinite);
    }
    Decimal::from_f64(pv).ok_or(MathError::NonFinite)
}

/// NPV over the placed flows only.
pub fn npv(flows: &[CashFlow], rate: f64) -> Result<Decimal, MathError> {
    let mut total = Decimal::ZERO;
    for flow in flows.iter().filter(|f| f.placed) {
        total += present_value(flow.amount, rate, flow.year)?;
    }
    Ok(total)
}

/// Three-way call with a ±50 dead zone around zero.
pub fn assess_decision(value: Decimal) -> InvestmentDecision {
    let band = Decimal::new(50, 0);
    if value > band {
        InvestmentDecision::Invest
    } else if value < -band {
        InvestmentDecision::Reject
    } else {
        InvestmentDecision::Indifferent
    }
}

fn project(id: &str, name: &str, amounts: [i64; 4]) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        schedule: amounts
            .iter()
            .enumerate()
            .map(|(year, &amount)| ScheduledFlow {
                year: year as u32,
                amount: Decimal::new(amount, 0),
            })
            .collect(),
    }
}

/// The project set offered at a level; clamped to the last level.
pub fn projects_for_level(level: u32) -> Vec<Project> {
    match level.clamp(1, LEVELS) {
        1 => vec![project(
            "project-1",
            "Coffee Shop Investment",
            [-1000, 400, 400, 400],
        )],
        2 => vec![
            project("project-2a", "Project Alpha", [-1200, 600, 600, 400]),
            project("project-2b", "Project Beta", [-1200, 400, 500, 800]),
        ],
        _ => vec![
            project("project-3a", "Tech Startup", [-2000, 800, 900, 1000]),
            project("project-3b", "Real Estate", [-1500, 500, 600, 700]),
            project("project-3c", "Manufacturing", [-2500, 1000, 1200, 1400]),
        ],
    }
}

fn initial_state() -> NpvState {
    let projects = projects_for_level(1);
    let current = projects[0].clone();
    NpvState {
        stats: SessionStats::new(),
        cash_flows: CashFlow::from_project(&current),
        discount_rate: 0.1,
        current_project: current,
        available_projects: projects,
        npv: Decimal::ZERO,
        decision: None,
    }
}

fn apply(mut s: NpvState, action: NpvAction) -> NpvState {
    match action {
        NpvAction::PlaceCashFlow { id, year } => {
            let Some(idx) = s.cash_flows.iter().position(|f| f.id == id) else {
                return s;
            };
            let mut flows = s.cash_flows.clone();
            flows[idx].year = year;
            flows[idx].placed = true;
            match npv(&flows, s.discount_rate) {
                Ok(value) => {
                    s.cash_flows = flows;
                    s.npv = value;
                    s.decision = Some(assess_decision(value));
                    s
                }
                Err(err) => {
                    debug!(%err, "placement left state unchanged");
                    s
                }
            }
        }
        NpvAction::SetDiscountRate { percent } => {
            if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
                return s;
            }
            let rate = percent / 100.0;
            match npv(&s.cash_flows, rate) {
                Ok(value) => {
                    s.discount_rate = rate;
                    s.npv = value;
                    s.decision = Some(assess_decision(value));
                    s
                }
                Err(err) => {
                    debug!(%err, "rate change left state unchanged");
                    s
                }
            }
        }
        NpvAction::MakeDecision { decision } => {
            if decision == assess_decision(s.npv) {
                s.stats.score += DECISION_POINTS;
            } else {
                s.stats.mistakes += 1;
            }
            s
        }
        NpvAction::NextLevel => {
            let next = (s.stats.level + 1).min(LEVELS);
            let projects = projects_for_level(next);
            let current = projects[0].clone();
            s.stats.level = next;
            s.cash_flows = CashFlow::from_project(&current);
            s.current_project = current;
            s.available_projects = projects;
            s.npv = Decimal::ZERO;
            s.decision = None;
            s
        }
    }
}

fn reduce(mut s: NpvState, event: GameEvent) -> NpvState {
    match event {
        GameEvent::Start => {
            s.stats.reset_transient();
            s
        }
        GameEvent::Action(ActionPayload::Npv(action)) => apply(s, action),
        GameEvent::Action(_) | GameEvent::Hint | GameEvent::Quit => s,
        GameEvent::Complete { passed, .. } => {
            if passed {
                s.stats.score += PASS_BONUS;
            }
            s
        }
    }
}

fn decision_label(decision: Option<InvestmentDecision>) -> &'static str {
    match decision {
        Some(InvestmentDecision::Invest) => "invest",
        Some(InvestmentDecision::Reject) => "reject",
        Some(InvestmentDecision::Indifferent) => "indifferent",
        None => "undecided",
    }
}

fn view_state(meta: &GameMeta, s: &NpvState) -> GameView {
    let mut lines = vec![
        format!("Project: {}", s.current_project.name),
        format!("Discount rate: {:.1}%", s.discount_rate * 100.0),
    ];
    for flow in &s.cash_flows {
        let placement = if flow.placed {
            format!("year {}", flow.year)
        } else {
            "unplaced".to_string()
        };
        lines.push(format!("  {} ${} ({placement})", flow.id, flow.amount));
    }
    lines.push(format!(
        "NPV: ${} -> {}",
        s.npv.round_dp(2),
        decision_label(s.decision)
    ));
    GameView {
        title: meta.title.clone(),
        status: format!(
            "Level {} | Score {} | Mistakes {}",
            s.stats.level, s.stats.score, s.stats.mistakes
        ),
        lines,
    }
}

/// The NPV builder game.
pub struct NpvGame {
    meta: GameMeta,
}

impl NpvGame {
    pub fn new() -> Self {
        Self { meta: meta() }
    }
}

impl Default for NpvGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for NpvGame {
    fn meta(&self) -> &GameMeta {
        &self.meta
    }

    fn init(&self, _rng: &mut ChaCha8Rng) -> GameState {
        GameState::Npv(initial_state())
    }

    fn update(&self, state: GameState, event: GameEvent, _rng: &mut ChaCha8Rng) -> GameState {
        match state {
            GameState::Npv(s) => GameState::Npv(reduce(s, event)),
            other => other,
        }
    }

    fn view(&self, state: &GameState) -> GameView {
        match state {
            GameState::Npv(s) => view_state(&self.meta, s),
            _ => GameView {
                title: self.meta.title.clone(),
                status: "inactive".to_string(),
                lines: Vec::new(),
            },
        }
    }

    fn assess_mastery(&self, state: &GameState) -> bool {
        match state {
            GameState::Npv(s) => s.stats.level >= LEVELS && s.stats.mistakes <= 2 && s.stats.score >= 250,
            _ => false,
        }
    }
}

fn meta() -> GameMeta {
    GameMeta {
        id: GameId::new("npv-builder"),
        title: "NPV Builder".to_string(),
        summary: "Learn time value of money through interactive NPV calculations. Place cash \
                  flows, set discount rates, and make investment decisions."
            .to_string(),
        estimated_time_min: 8,
        objectives: vec![
            LearningObjective {
                id: "understand-discounting".to_string(),
                text: "Understand how discounting works".to_string(),
                rubric: vec![
                    "Can explain why money today is worth more than money tomorrow".to_string(),
                    "Understands the impact of discount rates on present values".to_string(),
                ],
            },
            LearningObjective {
                id: "calculate-npv".to_string(),
                text: "Calculate NPV correctly".to_string(),
                rubric: vec![
                    "Places cash flows on correct timeline positions".to_string(),
                    "Applies discount rate properly".to_string(),
                    "Sums discounted cash flows accurately".to_string(),
                ],
            },
            LearningObjective {
                id: "investment-decisions".to_string(),
                text: "Make sound investment decisions".to_string(),
                rubric: vec![
                    "Uses NPV > 0 rule correctly".to_string(),
                    "Can compare mutually exclusive projects".to_string(),
                    "Understands capital rationing constraints".to_string(),
                ],
            },
        ],
        controls: Controls {
            mouse: true,
            touch: true,
            keyboard: true,
        },
        tutorial_steps: vec![
            "Welcome to NPV Builder! Money today is worth more than money tomorrow - that's \
             discounting."
                .to_string(),
            "Use the discount rate slider to set your required rate of return. Higher rates make \
             future cash flows worth less today."
                .to_string(),
            "Place cash flow cards onto the timeline. Each year has a different present value."
                .to_string(),
            "Watch how each cash flow is discounted: CF / (1 + r)^t.".to_string(),
            "The total NPV is the sum of all discounted cash flows. Positive NPV means invest!"
                .to_string(),
            "If NPV > 0, invest. If NPV < 0, reject. If NPV is near 0, you're indifferent. Make \
             your decision!"
                .to_string(),
        ],
        levels: LEVELS,
    }
}
