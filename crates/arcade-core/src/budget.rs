use crate::SessionStats;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a category's cost is fixed month to month or adjustable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryKind {
    Fixed,
    Variable,
}

/// One spending category in the monthly budget.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: String,
    /// Display name; scenario events target categories by name.
    pub name: String,
    pub kind: CategoryKind,
    /// Amount the player has allocated for the month.
    pub allocated: Decimal,
    /// Amount actually spent, including event impacts.
    pub spent: Decimal,
    /// 1 = essential, 3 = discretionary.
    pub priority: u8,
}

/// Whether a scenario event changes income or spending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    Income,
    Expense,
}

/// A random financial event resolved on budget submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Signed impact in USD; negative for costs.
    pub impact: Decimal,
    /// Name of the category hit, if the expense is categorized.
    pub category: Option<String>,
    pub kind: ScenarioKind,
}

/// A violated budget rule, reported in a fixed order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetViolation {
    /// Total allocation exceeds monthly income.
    IncomeExceeded,
    /// Savings below the 15% minimum rate.
    SavingsShortfall,
    /// Debt payments below the 10% minimum.
    DebtShortfall,
}

impl fmt::Display for BudgetViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetViolation::IncomeExceeded => write!(f, "Total allocation exceeds income"),
            BudgetViolation::SavingsShortfall => write!(f, "Savings rate below 15% minimum"),
            BudgetViolation::DebtShortfall => write!(f, "Debt payments below 10% minimum"),
        }
    }
}

/// State of the budget game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BudgetState {
    pub stats: SessionStats,
    pub monthly_income: Decimal,
    pub categories: Vec<BudgetCategory>,
    /// Scenario events that have fired this session, oldest first.
    pub events: Vec<ScenarioEvent>,
    /// 1-based round counter; advances on each accepted submission.
    pub current_round: u32,
    pub total_rounds: u32,
    /// Emergency buffer, never negative.
    pub cash_buffer: Decimal,
    /// Monthly savings target in USD.
    pub savings_goal: Decimal,
    /// Streak of successful rounds; resets to 0 on failure.
    pub consecutive_successes: u32,
}

/// Actions accepted by the budget reducer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BudgetAction {
    /// Set a category's monthly allocation (clamped at zero).
    Allocate { category_id: String, amount: Decimal },
    /// Lock in the month's budget and resolve the round.
    SubmitBudget,
    /// Draw down the emergency buffer.
    UseEmergencyFund { amount: Decimal },
}
