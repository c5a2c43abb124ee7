//! Greedy acceptance: take anything the ledger can still fund.

use crate::core::error::Result;
use crate::core::types::Project;
use crate::strategies::{fits_window, AcceptancePolicy, DecisionContext};

/// Accepts a candidate whenever each visible year it runs in still holds one
/// stage cost. Years past the horizon are not checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreedyPolicy;

impl AcceptancePolicy for GreedyPolicy {
    fn should_accept(&self, ctx: &DecisionContext<'_>, candidate: &Project) -> Result<bool> {
        Ok(fits_window(ctx.future_funds, candidate, ctx.economics.stage_cost))
    }
}
