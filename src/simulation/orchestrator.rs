//! Monte Carlo orchestration over managers and iterations.
//!
//! Iteration `i` seeds a ChaCha generator with `seed + i`; manager `m` in that
//! iteration reads stream `m` of it. Runs therefore do not depend on thread
//! scheduling, and iterations can be spread over the rayon pool.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::ledger::FundLedger;
use crate::core::types::{Amount, Portfolio};
use crate::input::TemplatePool;
use crate::portfolio::{ProjectManager, RunContext};
use crate::risk::RiskModel;
use crate::simulation::results::SimulationResult;

/// Portfolios of one iteration, keyed by manager name.
pub type IterationResult = Vec<(String, Portfolio)>;

/// A validated, ready-to-run experiment.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    ledger: FundLedger,
    templates: TemplatePool,
    risk: RiskModel,
}

impl Simulation {
    /// Validate `config` and `templates` and build the shared state.
    pub fn new(config: SimulationConfig, templates: TemplatePool) -> Result<Self> {
        config.validate()?;

        let bounds = config.template_bounds;
        if templates.len() < bounds.min || templates.len() > bounds.max {
            return Err(SimError::InvalidTemplateCount {
                found: templates.len(),
                min: bounds.min,
                max: bounds.max,
            });
        }

        let risk = RiskModel::new(&config.effective_risk())?;
        let ledger = config.ledger();

        Ok(Self {
            config,
            ledger,
            templates,
            risk,
        })
    }

    /// Build from raw template rows.
    pub fn from_rows<R: AsRef<[Amount]>>(config: SimulationConfig, rows: &[R]) -> Result<Self> {
        let templates = TemplatePool::from_rows(rows, config.template_bounds)?;
        Self::new(config, templates)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run every iteration and collect the samples.
    ///
    /// Any invariant violation aborts the whole run; no partial result is
    /// returned.
    pub fn run(&self) -> Result<SimulationResult> {
        let iterations = self.config.iterations;
        info!(
            iterations,
            managers = self.config.managers.len(),
            templates = self.templates.len(),
            horizon = self.ledger.len(),
            parallel = self.config.parallel,
            "starting simulation"
        );

        let runs: Vec<IterationResult> = if self.config.parallel {
            (0..iterations)
                .into_par_iter()
                .map(|i| self.run_iteration(i))
                .collect::<Result<Vec<_>>>()?
        } else {
            (0..iterations)
                .map(|i| self.run_iteration(i))
                .collect::<Result<Vec<_>>>()?
        };

        let names = self.config.managers.iter().map(|m| m.name.as_str());
        let mut result = SimulationResult::new(names, self.ledger.len());
        for run in &runs {
            result.add_iteration_result(run)?;
        }

        for (name, samples) in result.iter() {
            info!(
                manager = name,
                final_value = samples.final_value_mean().unwrap_or(0.0),
                final_cash = samples.mean_cash(samples.horizon()).unwrap_or(0.0),
                "simulation finished"
            );
        }

        Ok(result)
    }

    /// Run every manager once for iteration `iteration`.
    pub fn run_iteration(&self, iteration: usize) -> Result<IterationResult> {
        let seed = self.config.seed.wrapping_add(iteration as u64);
        let ctx = RunContext {
            funds: &self.ledger,
            templates: &self.templates,
            risk: &self.risk,
        };

        let portfolios = self
            .config
            .managers
            .iter()
            .enumerate()
            .map(|(stream, spec)| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(stream as u64);

                let mut manager = ProjectManager::new(spec.policy, self.config.economics);
                let portfolio = manager.run(&ctx, &mut rng)?;
                Ok((spec.name.clone(), portfolio))
            })
            .collect::<Result<IterationResult>>()?;

        debug!(iteration, seed, "iteration finished");
        Ok(portfolios)
    }
}
