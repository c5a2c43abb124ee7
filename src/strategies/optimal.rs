//! Risk-aware acceptance.
//!
//! The candidate is provisionally accepted on a copy of the ledger and project
//! set. If no future year can be overrun by worst-case risk, it is taken.
//! Otherwise the probability tree weighs the investment it adds against the
//! investment expected to be lost to forced liquidations.

use tracing::trace;

use crate::core::error::Result;
use crate::core::ledger::debit_window;
use crate::core::types::Project;
use crate::strategies::probability_tree::{evaluate_conflicts, find_risk_conflicts};
use crate::strategies::{fits_window, AcceptancePolicy, DecisionContext};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimalPolicy;

impl AcceptancePolicy for OptimalPolicy {
    fn should_accept(&self, ctx: &DecisionContext<'_>, candidate: &Project) -> Result<bool> {
        let stage_cost = ctx.economics.stage_cost;

        if !fits_window(ctx.future_funds, candidate, stage_cost) {
            return Ok(false);
        }

        let mut funds = ctx.future_funds.to_vec();
        debit_window(&mut funds, stage_cost);

        let mut hypothetical = ctx.current_projects.to_vec();
        hypothetical.push(candidate.clone());

        let conflicts = find_risk_conflicts(
            &hypothetical,
            &funds,
            ctx.current_year,
            ctx.risk.worst_case_incident(),
        );
        if conflicts.is_empty() {
            return Ok(true);
        }

        let evaluation = evaluate_conflicts(
            &conflicts,
            ctx.current_year,
            &funds,
            ctx.current_projects,
            &hypothetical,
            ctx.risk,
            ctx.economics,
        )?;

        trace!(
            year = ctx.current_year,
            conflicts = conflicts.len(),
            existing = evaluation.existing_return,
            maximum = evaluation.maximum_return,
            expected_loss = evaluation.expected_loss,
            "evaluated probability tree"
        );

        Ok(evaluation.favours_candidate())
    }
}
