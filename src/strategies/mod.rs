//! Project acceptance policies.
//!
//! Every manager asks its policy, once per candidate, whether to take on a new
//! project. Policies only read the ledger; the manager debits it after an
//! acceptance.

pub mod conservative;
pub mod greedy;
pub mod optimal;
pub mod probability_tree;

pub use conservative::ConservativePolicy;
pub use greedy::GreedyPolicy;
pub use optimal::OptimalPolicy;
pub use probability_tree::{RiskConflict, TreeEvaluation};

use serde::{Deserialize, Serialize};

use crate::core::config::ProjectEconomics;
use crate::core::error::Result;
use crate::core::ledger::FundYear;
use crate::core::types::{Amount, Project, Year};
use crate::risk::RiskModel;

/// State a policy may inspect when deciding on a candidate.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    /// Ledger entries from the current year to the end of the horizon.
    pub future_funds: &'a [FundYear],
    /// Projects the manager currently runs.
    pub current_projects: &'a [Project],
    pub current_year: Year,
    pub economics: &'a ProjectEconomics,
    pub risk: &'a RiskModel,
}

/// Decides whether a manager takes on a candidate project.
pub trait AcceptancePolicy {
    /// Decide on `candidate`, already stamped with the current year.
    fn should_accept(&self, ctx: &DecisionContext<'_>, candidate: &Project) -> Result<bool>;
}

/// Policy selector used in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Greedy,
    #[serde(alias = "conservative")]
    MinusOne,
    Optimal,
}

/// The closed set of acceptance policies.
#[derive(Debug, Clone, PartialEq)]
pub enum Policy {
    Greedy(GreedyPolicy),
    Conservative(ConservativePolicy),
    Optimal(OptimalPolicy),
}

impl Policy {
    /// Which variant this is.
    pub fn kind(&self) -> PolicyKind {
        match self {
            Policy::Greedy(_) => PolicyKind::Greedy,
            Policy::Conservative(_) => PolicyKind::MinusOne,
            Policy::Optimal(_) => PolicyKind::Optimal,
        }
    }
}

impl From<PolicyKind> for Policy {
    fn from(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::Greedy => Policy::Greedy(GreedyPolicy),
            PolicyKind::MinusOne => Policy::Conservative(ConservativePolicy::default()),
            PolicyKind::Optimal => Policy::Optimal(OptimalPolicy),
        }
    }
}

impl AcceptancePolicy for Policy {
    fn should_accept(&self, ctx: &DecisionContext<'_>, candidate: &Project) -> Result<bool> {
        match self {
            Policy::Greedy(p) => p.should_accept(ctx, candidate),
            Policy::Conservative(p) => p.should_accept(ctx, candidate),
            Policy::Optimal(p) => p.should_accept(ctx, candidate),
        }
    }
}

/// Check that every year the candidate would run in, within the visible
/// window, holds at least `threshold`.
pub(crate) fn fits_window(funds: &[FundYear], candidate: &Project, threshold: Amount) -> bool {
    funds
        .iter()
        .take(candidate.sub_projects.len())
        .all(|year| year.allocated_funds >= threshold)
}
