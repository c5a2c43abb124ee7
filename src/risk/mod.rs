//! Risk cost model: incident sampling plus precomputed total-cost tables.

pub mod distribution;
pub mod sampler;

pub use distribution::{RiskDistribution, RiskOutcome, RiskTable};
pub use sampler::IncidentSampler;

use rand::Rng;

use crate::core::config::RiskConfig;
use crate::core::error::Result;
use crate::core::types::Amount;

/// Everything the simulation needs to know about risk incidents.
#[derive(Debug, Clone)]
pub struct RiskModel {
    sampler: IncidentSampler,
    table: RiskTable,
}

impl RiskModel {
    /// Build the model from configuration.
    pub fn new(config: &RiskConfig) -> Result<Self> {
        Ok(Self {
            sampler: IncidentSampler::new(config.incident_costs.clone())?,
            table: RiskTable::new(&config.incident_costs, config.max_risk_elements)?,
        })
    }

    /// Model with the standard `[0, 3, 6]` incident costs.
    pub fn standard() -> Result<Self> {
        Self::new(&RiskConfig::default())
    }

    /// Sample the cost of one incident.
    #[inline]
    pub fn sample_incident<R: Rng + ?Sized>(&self, rng: &mut R) -> Amount {
        self.sampler.sample(rng)
    }

    /// Largest cost a single incident can reach.
    pub fn worst_case_incident(&self) -> Amount {
        self.sampler.worst_case()
    }

    pub fn base_unit(&self) -> Amount {
        self.sampler.base_unit()
    }

    /// Total cost distribution for `risk_elements` risky stages.
    pub fn distribution(&self, risk_elements: usize) -> Result<&RiskDistribution> {
        self.table.get(risk_elements)
    }

    pub fn table(&self) -> &RiskTable {
        &self.table
    }
}
