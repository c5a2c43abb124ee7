//! Total risk cost distributions.
//!
//! With `n` simultaneously risky stages, each drawing an independent incident
//! cost uniformly from the configured set, the total cost follows the n-fold
//! convolution of that uniform distribution. Tables are built once for
//! `0..=max_elements` and then only read.

use crate::core::error::{Result, SimError};
use crate::core::types::Amount;

/// A single possible total risk cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskOutcome {
    pub probability: f64,
    pub cost: Amount,
}

/// Distribution of total risk cost for a fixed number of risky stages.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskDistribution {
    risk_elements: usize,
    /// Outcomes sorted by increasing cost.
    outcomes: Vec<RiskOutcome>,
}

impl RiskDistribution {
    /// Number of risky stages this distribution describes.
    pub fn risk_elements(&self) -> usize {
        self.risk_elements
    }

    /// Outcomes in increasing cost order.
    pub fn outcomes(&self) -> &[RiskOutcome] {
        &self.outcomes
    }

    /// Sum of all outcome probabilities.
    pub fn total_probability(&self) -> f64 {
        self.outcomes.iter().map(|o| o.probability).sum()
    }

    /// Expected total cost.
    pub fn mean_cost(&self) -> f64 {
        self.outcomes.iter().map(|o| o.probability * o.cost as f64).sum()
    }

    /// Distribution of one more risky stage on top of this one.
    fn convolve(&self, incident_costs: &[Amount]) -> Self {
        let weight = 1.0 / incident_costs.len() as f64;
        let mut outcomes: Vec<RiskOutcome> = Vec::new();

        for outcome in &self.outcomes {
            for &incident in incident_costs {
                let cost = outcome.cost + incident;
                let probability = outcome.probability * weight;
                match outcomes.binary_search_by_key(&cost, |o| o.cost) {
                    Ok(idx) => outcomes[idx].probability += probability,
                    Err(idx) => outcomes.insert(idx, RiskOutcome { probability, cost }),
                }
            }
        }

        Self {
            risk_elements: self.risk_elements + 1,
            outcomes,
        }
    }
}

/// Precomputed distributions indexed by the number of risky stages.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskTable {
    distributions: Vec<RiskDistribution>,
}

impl RiskTable {
    /// Build tables for `0..=max_elements` risky stages.
    pub fn new(incident_costs: &[Amount], max_elements: usize) -> Result<Self> {
        if incident_costs.is_empty() {
            return Err(SimError::invalid_config("at least one incident cost is required"));
        }
        if let Some(cost) = incident_costs.iter().find(|&&c| c < 0) {
            return Err(SimError::invalid_config(format!(
                "incident costs must be non-negative, got {cost}"
            )));
        }

        let mut distributions = Vec::with_capacity(max_elements + 1);
        distributions.push(RiskDistribution {
            risk_elements: 0,
            outcomes: vec![RiskOutcome {
                probability: 1.0,
                cost: 0,
            }],
        });
        for n in 0..max_elements {
            let next = distributions[n].convolve(incident_costs);
            distributions.push(next);
        }

        Ok(Self { distributions })
    }

    /// Largest supported number of risky stages.
    pub fn max_elements(&self) -> usize {
        self.distributions.len() - 1
    }

    /// Distribution for `risk_elements` simultaneously risky stages.
    pub fn get(&self, risk_elements: usize) -> Result<&RiskDistribution> {
        self.distributions
            .get(risk_elements)
            .ok_or(SimError::RiskElementsOutOfRange {
                requested: risk_elements,
                max: self.max_elements(),
            })
    }
}
