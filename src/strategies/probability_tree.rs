//! Lookahead over years where risk could outrun the budget.
//!
//! A *conflict year* is one where the risky stages running that year could, in
//! the worst case, cost more than the funds left for it. For each conflict year
//! in order, every total risk cost outcome either fits the budget, in which case
//! evaluation carries on to the next conflict year, or forces a liquidation
//! whose lost investment is weighted by the probability of reaching it.

use crate::core::config::ProjectEconomics;
use crate::core::error::{Result, SimError};
use crate::core::ledger::FundYear;
use crate::core::types::{Amount, Project, Year};
use crate::portfolio::closure::find_optimal_closures;
use crate::risk::RiskModel;

/// A year whose worst-case risk exceeds its capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskConflict {
    pub year: Year,
    /// Number of risky stages running that year.
    pub risk_elements: usize,
}

/// Result of walking the conflict years.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeEvaluation {
    /// Committed spend of the existing projects up to the first conflict year.
    pub existing_return: Amount,
    /// Committed spend with the candidate, up to the first conflict year.
    pub maximum_return: Amount,
    /// Probability-weighted investment lost to forced liquidations.
    pub expected_loss: f64,
    /// Probability that no conflict year forced a liquidation.
    pub continuation_probability: f64,
}

impl TreeEvaluation {
    /// Return expected from taking the candidate.
    #[inline]
    pub fn expected_return(&self) -> f64 {
        self.maximum_return as f64 - self.expected_loss
    }

    /// Whether the candidate beats keeping the current portfolio.
    #[inline]
    pub fn favours_candidate(&self) -> bool {
        self.expected_return() >= self.existing_return as f64
    }
}

/// Find conflict years from `current_year` to the end of `funds`.
///
/// `funds[0]` is the ledger entry for `current_year`.
pub fn find_risk_conflicts(
    projects: &[Project],
    funds: &[FundYear],
    current_year: Year,
    worst_case_incident: Amount,
) -> Vec<RiskConflict> {
    funds
        .iter()
        .enumerate()
        .filter_map(|(i, fund)| {
            let year = current_year + i;
            let risk_elements = projects
                .iter()
                .filter(|p| p.current_sub_project(year).is_some_and(|s| s.has_risk))
                .count();

            (fund.allocated_funds < risk_elements as Amount * worst_case_incident)
                .then_some(RiskConflict {
                    year,
                    risk_elements,
                })
        })
        .collect()
}

/// Funds committed to `projects` from `from` through `to`, inclusive.
pub fn committed_spend(projects: &[Project], from: Year, to: Year, stage_cost: Amount) -> Amount {
    (from..=to)
        .map(|year| projects.iter().filter(|p| p.is_active(year)).count() as Amount * stage_cost)
        .sum()
}

/// Walk the conflict years and weigh forced liquidations.
///
/// # Arguments
/// * `conflicts` - Conflict years in chronological order
/// * `current_year` - Year of `funds[0]`
/// * `funds` - Ledger from the current year, with the candidate already debited
/// * `existing` - Projects held before the candidate
/// * `hypothetical` - `existing` plus the candidate
pub fn evaluate_conflicts(
    conflicts: &[RiskConflict],
    current_year: Year,
    funds: &[FundYear],
    existing: &[Project],
    hypothetical: &[Project],
    risk: &RiskModel,
    economics: &ProjectEconomics,
) -> Result<TreeEvaluation> {
    let first = conflicts.first().ok_or(SimError::EmptyConflictList)?;

    let mut continuation = 1.0;
    let mut expected_loss = 0.0;

    for conflict in conflicts {
        let capacity = conflict
            .year
            .checked_sub(current_year)
            .and_then(|i| funds.get(i))
            .ok_or_else(|| {
                SimError::invariant(format!(
                    "conflict year {} outside the ledger starting at year {current_year}",
                    conflict.year
                ))
            })?
            .allocated_funds;

        let mut next_continuation = 0.0;
        for outcome in risk.distribution(conflict.risk_elements)?.outcomes() {
            let probability = outcome.probability * continuation;
            let deficit = capacity - outcome.cost;

            if deficit < 0 {
                let loss = liquidation_loss(deficit, hypothetical, conflict.year, economics)?;
                expected_loss += loss as f64 * probability;
            } else {
                next_continuation += probability;
            }
        }
        continuation = next_continuation;
    }

    Ok(TreeEvaluation {
        existing_return: committed_spend(existing, 1, first.year, economics.stage_cost),
        maximum_return: committed_spend(hypothetical, 1, first.year, economics.stage_cost),
        expected_loss,
        continuation_probability: continuation,
    })
}

/// Investment given up when `deficit` in `year` is covered by the least-value
/// liquidation. Zero when no liquidation covers it.
fn liquidation_loss(
    deficit: Amount,
    projects: &[Project],
    year: Year,
    economics: &ProjectEconomics,
) -> Result<Amount> {
    let Some(plan) = find_optimal_closures(deficit, projects, year, economics.stage_value)? else {
        return Ok(0);
    };

    // Committed spend is additive per project, so the loss is the spend of the
    // liquidated projects alone.
    let closed: Vec<Project> = plan.indices.iter().map(|&i| projects[i].clone()).collect();
    Ok(committed_spend(&closed, 1, year, economics.stage_cost))
}
