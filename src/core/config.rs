//! Simulation configuration.
//!
//! Every field has a default matching the standard experiment, so a partial
//! document (or none at all) yields a runnable configuration.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::ledger::{FundLedger, STANDARD_CAPACITIES};
use crate::core::types::Amount;
use crate::strategies::PolicyKind;

/// Per-stage money constants shared by all managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEconomics {
    /// Funds reserved per active stage-year.
    pub stage_cost: Amount,
    /// Value earned per finished stage-year.
    pub stage_value: Amount,
}

impl Default for ProjectEconomics {
    fn default() -> Self {
        Self {
            stage_cost: 10,
            stage_value: 15,
        }
    }
}

/// Risk incident configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Equally likely costs of a single risk incident.
    pub incident_costs: Vec<Amount>,
    /// Largest number of simultaneously risky stages the tables cover.
    pub max_risk_elements: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            incident_costs: vec![0, 3, 6],
            max_risk_elements: 5,
        }
    }
}

/// Accepted size of the template pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateBounds {
    pub min: usize,
    pub max: usize,
}

impl Default for TemplateBounds {
    fn default() -> Self {
        Self { min: 1, max: 100 }
    }
}

/// A named manager and the policy it follows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerSpec {
    pub name: String,
    pub policy: PolicyKind,
}

impl ManagerSpec {
    pub fn new(name: impl Into<String>, policy: PolicyKind) -> Self {
        Self {
            name: name.into(),
            policy,
        }
    }
}

/// Full configuration of a simulation experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of iterations run for every manager.
    pub iterations: usize,
    /// Base seed; iteration `i` is seeded with `seed + i`.
    pub seed: u64,
    /// Fund capacity per year, year 1 first.
    pub fund_capacities: Vec<Amount>,
    pub economics: ProjectEconomics,
    pub risk: RiskConfig,
    pub template_bounds: TemplateBounds,
    /// Managers evaluated in each iteration, in reporting order.
    pub managers: Vec<ManagerSpec>,
    /// Run iterations on the rayon thread pool.
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            seed: 42,
            fund_capacities: STANDARD_CAPACITIES.to_vec(),
            economics: ProjectEconomics::default(),
            risk: RiskConfig::default(),
            template_bounds: TemplateBounds::default(),
            managers: vec![
                ManagerSpec::new("greedy_manager", PolicyKind::Greedy),
                ManagerSpec::new("minus_one_manager", PolicyKind::MinusOne),
                ManagerSpec::new("optimal_manager", PolicyKind::Optimal),
            ],
            parallel: true,
        }
    }
}

impl SimulationConfig {
    /// Set iteration count.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the evaluated managers.
    pub fn with_managers(mut self, managers: Vec<ManagerSpec>) -> Self {
        self.managers = managers;
        self
    }

    /// Replace the yearly capacities.
    pub fn with_capacities(mut self, capacities: Vec<Amount>) -> Self {
        self.fund_capacities = capacities;
        self
    }

    /// Set the per-incident risk costs.
    pub fn with_incident_costs(mut self, costs: Vec<Amount>) -> Self {
        self.risk.incident_costs = costs;
        self
    }

    /// Enable or disable parallel iterations.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Build the ledger every manager run starts from.
    pub fn ledger(&self) -> FundLedger {
        FundLedger::new(&self.fund_capacities)
    }

    /// Risk settings with tables deep enough for the configured capacities.
    ///
    /// Every accepted project reserves one stage cost per year, so the peak
    /// capacity bounds how many stages can run, and be risky, at once.
    pub fn effective_risk(&self) -> RiskConfig {
        let peak = self.fund_capacities.iter().copied().max().unwrap_or(0);
        let concurrent = (peak / self.economics.stage_cost.max(1)).max(0) as usize;
        RiskConfig {
            incident_costs: self.risk.incident_costs.clone(),
            max_risk_elements: self.risk.max_risk_elements.max(concurrent),
        }
    }

    /// Check the configuration before any simulation starts.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(SimError::invalid_config("iterations must be at least 1"));
        }
        if self.fund_capacities.is_empty() {
            return Err(SimError::invalid_config("fund capacities must cover at least one year"));
        }
        if let Some(cap) = self.fund_capacities.iter().find(|&&c| c < 0) {
            return Err(SimError::invalid_config(format!(
                "fund capacities must be non-negative, got {cap}"
            )));
        }
        if self.economics.stage_cost <= 0 {
            return Err(SimError::invalid_config("stage cost must be positive"));
        }
        if self.economics.stage_value < 0 {
            return Err(SimError::invalid_config("stage value must be non-negative"));
        }
        if self.template_bounds.min == 0 || self.template_bounds.min > self.template_bounds.max {
            return Err(SimError::invalid_config(format!(
                "template bounds {}..={} are empty",
                self.template_bounds.min, self.template_bounds.max
            )));
        }
        if self.managers.is_empty() {
            return Err(SimError::invalid_config("at least one manager is required"));
        }

        let mut names = HashSet::new();
        for manager in &self.managers {
            if !names.insert(manager.name.as_str()) {
                return Err(SimError::invalid_config(format!(
                    "duplicate manager name '{}'",
                    manager.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ledger().len(), 9);
        assert_eq!(config.managers.len(), 3);
    }

    #[test]
    fn test_rejects_zero_iterations() {
        let config = SimulationConfig::default().with_iterations(0);
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig { .. })));
    }

    #[test]
    fn test_rejects_duplicate_managers() {
        let config = SimulationConfig::default().with_managers(vec![
            ManagerSpec::new("a", PolicyKind::Greedy),
            ManagerSpec::new("a", PolicyKind::Optimal),
        ]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_risk_tables_follow_capacity() {
        let config = SimulationConfig::default();
        assert_eq!(config.effective_risk().max_risk_elements, 5);

        let config = SimulationConfig::default().with_capacities(vec![60; 9]);
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_risk().max_risk_elements, 6);
        assert_eq!(config.effective_risk().incident_costs, vec![0, 3, 6]);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{ "iterations": 25, "economics": { "stage_value": 20 } }"#)
                .unwrap();

        assert_eq!(config.iterations, 25);
        assert_eq!(config.economics.stage_value, 20);
        assert_eq!(config.economics.stage_cost, 10);
        assert_eq!(config.fund_capacities, STANDARD_CAPACITIES.to_vec());
        assert_eq!(config.managers[2].policy, PolicyKind::Optimal);
    }

    #[test]
    fn test_manager_policy_names() {
        let config: SimulationConfig = serde_json::from_str(
            r#"{ "managers": [{ "name": "careful", "policy": "minus_one" }] }"#,
        )
        .unwrap();

        assert_eq!(config.managers, vec![ManagerSpec::new("careful", PolicyKind::MinusOne)]);
    }
}
