use crate::SessionStats;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One scheduled amount within a project, e.g. (-1000 at year 0).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledFlow {
    /// Year offset from today; year 0 is undiscounted.
    pub year: u32,
    /// Signed amount in USD.
    pub amount: Decimal,
}

/// An investment project the player evaluates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Cash flow schedule in timeline order.
    pub schedule: Vec<ScheduledFlow>,
}

/// A cash flow card the player places onto the timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    /// Stable id within the session, derived from the project.
    pub id: String,
    /// Timeline year the flow currently sits at.
    pub year: u32,
    /// Signed amount in USD.
    pub amount: Decimal,
    /// Whether the flow has been placed on the timeline.
    pub placed: bool,
}

impl CashFlow {
    /// Unplaced cards for a project, one per scheduled flow.
    pub fn from_project(project: &Project) -> Vec<CashFlow> {
        project
            .schedule
            .iter()
            .enumerate()
            .map(|(i, flow)| CashFlow {
                id: format!("cf-{}-{}", project.id, i),
                year: flow.year,
                amount: flow.amount,
                placed: false,
            })
            .collect()
    }
}

/// The three-way investment call on a computed NPV.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestmentDecision {
    Invest,
    Reject,
    Indifferent,
}

/// State of the NPV builder game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NpvState {
    pub stats: SessionStats,
    /// Cash flow cards for the current project.
    pub cash_flows: Vec<CashFlow>,
    /// Discount rate as a fraction, e.g. 0.1 for 10%.
    pub discount_rate: f64,
    /// The project under evaluation.
    pub current_project: Project,
    /// All projects offered at this level.
    pub available_projects: Vec<Project>,
    /// NPV over the currently placed flows.
    pub npv: Decimal,
    /// Decision implied by the current NPV; set after each placement or
    /// rate change.
    pub decision: Option<InvestmentDecision>,
}

/// Actions accepted by the NPV builder reducer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NpvAction {
    /// Place (or re-place) a cash flow card at a timeline year.
    PlaceCashFlow { id: String, year: u32 },
    /// Set the discount rate from a percentage slider value.
    SetDiscountRate { percent: f64 },
    /// Commit an investment call; scored against the assessed decision.
    MakeDecision { decision: InvestmentDecision },
    /// Advance to the next project set, bounded at the last level.
    NextLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_inherit_schedule_and_start_unplaced() {
        let project = Project {
            id: "p1".to_string(),
            name: "Coffee Shop".to_string(),
            schedule: vec![
                ScheduledFlow {
                    year: 0,
                    amount: Decimal::new(-1000, 0),
                },
                ScheduledFlow {
                    year: 1,
                    amount: Decimal::new(400, 0),
                },
            ],
        };
        let cards = CashFlow::from_project(&project);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].id, "cf-p1-0");
        assert_eq!(cards[1].year, 1);
        assert!(cards.iter().all(|c| !c.placed));
    }
}
