//! Per-incident risk cost sampling.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::error::{Result, SimError};
use crate::core::types::Amount;

/// Draws the cost of a single risk incident uniformly from a fixed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentSampler {
    costs: Vec<Amount>,
}

impl IncidentSampler {
    /// Create a sampler over `costs`.
    pub fn new(costs: Vec<Amount>) -> Result<Self> {
        if costs.is_empty() {
            return Err(SimError::invalid_config("at least one incident cost is required"));
        }
        Ok(Self { costs })
    }

    /// Sample one incident cost.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Amount {
        // Non-empty by construction
        *self.costs.choose(rng).unwrap_or(&0)
    }

    /// Largest possible incident cost.
    pub fn worst_case(&self) -> Amount {
        self.costs.iter().copied().max().unwrap_or(0)
    }

    /// Greatest common divisor of the non-zero costs; every total cost is a
    /// multiple of it.
    pub fn base_unit(&self) -> Amount {
        self.costs
            .iter()
            .copied()
            .filter(|&c| c != 0)
            .fold(0, gcd)
    }

    pub fn costs(&self) -> &[Amount] {
        &self.costs
    }
}

fn gcd(a: Amount, b: Amount) -> Amount {
    if b == 0 {
        a.abs()
    } else {
        gcd(b, a % b)
    }
}
