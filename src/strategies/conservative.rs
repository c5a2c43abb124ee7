//! "Minus-one" acceptance: keep one spare stage cost in reserve.

use crate::core::error::Result;
use crate::core::types::{Amount, Project};
use crate::strategies::{fits_window, AcceptancePolicy, DecisionContext};

/// Greedy check with a multiplied threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConservativePolicy {
    /// Stage costs that must be available per year before accepting.
    pub reserve_multiplier: Amount,
}

impl Default for ConservativePolicy {
    fn default() -> Self {
        Self {
            reserve_multiplier: 2,
        }
    }
}

impl AcceptancePolicy for ConservativePolicy {
    fn should_accept(&self, ctx: &DecisionContext<'_>, candidate: &Project) -> Result<bool> {
        let threshold = ctx.economics.stage_cost * self.reserve_multiplier;
        Ok(fits_window(ctx.future_funds, candidate, threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ProjectEconomics;
    use crate::core::ledger::FundYear;
    use crate::core::types::{SubProject, PROJECT_LENGTH};
    use crate::risk::RiskModel;
    use crate::strategies::GreedyPolicy;

    fn funds(values: &[i64]) -> Vec<FundYear> {
        values.iter().copied().map(FundYear::new).collect()
    }

    #[test]
    fn test_requires_double_stage_cost() {
        let economics = ProjectEconomics::default();
        let risk = RiskModel::standard().unwrap();
        let candidate = Project::new(1, [SubProject::new(false, 5, 5); PROJECT_LENGTH]);

        let cases: [(&[i64], bool); 3] = [
            (&[20, 20, 20, 20, 20, 20], true),
            (&[20, 19, 20, 20, 20, 20], false),
            (&[23, 35, 46, 58, 58, 58, 58, 58, 58], true),
        ];

        for (values, expected) in cases {
            let f = funds(values);
            let ctx = DecisionContext {
                future_funds: &f,
                current_projects: &[],
                current_year: 1,
                economics: &economics,
                risk: &risk,
            };
            assert_eq!(ConservativePolicy::default().should_accept(&ctx, &candidate).unwrap(), expected);
        }
    }

    #[test]
    fn test_subset_of_greedy() {
        let economics = ProjectEconomics::default();
        let risk = RiskModel::standard().unwrap();
        let candidate = Project::new(1, [SubProject::new(false, 5, 5); PROJECT_LENGTH]);

        for a in (0..40).step_by(3) {
            for b in (0..40).step_by(7) {
                let f = funds(&[a, b, a, b, a, b]);
                let ctx = DecisionContext {
                    future_funds: &f,
                    current_projects: &[],
                    current_year: 1,
                    economics: &economics,
                    risk: &risk,
                };
                let conservative = ConservativePolicy::default().should_accept(&ctx, &candidate).unwrap();
                let greedy = GreedyPolicy.should_accept(&ctx, &candidate).unwrap();
                assert!(!conservative || greedy, "a={a} b={b}");
            }
        }
    }
}
