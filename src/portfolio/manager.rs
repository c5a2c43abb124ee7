//! Year-by-year project manager.
//!
//! A manager owns three disjoint collections: running projects, projects that
//! finished all stages, and projects liquidated to cover a deficit. Each
//! simulated year it acquires new projects through its policy, pays for risk
//! incidents, liquidates on a shortfall, retires finished projects, and records
//! value and cash.

use rand::Rng;
use tracing::{debug, trace};

use crate::core::config::ProjectEconomics;
use crate::core::error::{Result, SimError};
use crate::core::ledger::FundLedger;
use crate::core::types::{Amount, Portfolio, Project, Year, PROJECT_LENGTH};
use crate::input::TemplatePool;
use crate::portfolio::closure::find_optimal_closures;
use crate::risk::RiskModel;
use crate::strategies::{AcceptancePolicy, DecisionContext, Policy};

/// Shared, read-only inputs of a manager run.
#[derive(Debug, Clone, Copy)]
pub struct RunContext<'a> {
    /// Ledger every run starts from; each run works on its own copy.
    pub funds: &'a FundLedger,
    pub templates: &'a TemplatePool,
    pub risk: &'a RiskModel,
}

/// Project manager driven by an acceptance policy.
#[derive(Debug, Clone)]
pub struct ProjectManager {
    policy: Policy,
    economics: ProjectEconomics,
    current: Vec<Project>,
    completed: Vec<Project>,
    discarded: Vec<Project>,
    /// Projects ever taken on, for the end-of-run balance check.
    accepted: usize,
}

impl ProjectManager {
    /// Create a manager with empty books.
    pub fn new(policy: impl Into<Policy>, economics: ProjectEconomics) -> Self {
        Self {
            policy: policy.into(),
            economics,
            current: Vec::new(),
            completed: Vec::new(),
            discarded: Vec::new(),
            accepted: 0,
        }
    }

    /// Start from already running projects.
    pub fn with_projects(mut self, projects: Vec<Project>) -> Self {
        self.accepted += projects.len();
        self.current = projects;
        self
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn current_projects(&self) -> &[Project] {
        &self.current
    }

    pub fn completed_projects(&self) -> &[Project] {
        &self.completed
    }

    pub fn discarded_projects(&self) -> &[Project] {
        &self.discarded
    }

    /// Clear all collections.
    pub fn reset(&mut self) {
        self.current.clear();
        self.completed.clear();
        self.discarded.clear();
        self.accepted = 0;
    }

    /// Run one iteration over the whole horizon.
    ///
    /// # Arguments
    /// * `ctx` - Starting ledger, template pool and risk model
    /// * `rng` - Source of template draws and incident costs
    ///
    /// # Returns
    /// The value and cash trajectory of the run
    pub fn run<R: Rng + ?Sized>(&mut self, ctx: &RunContext<'_>, rng: &mut R) -> Result<Portfolio> {
        self.reset();

        let mut ledger = ctx.funds.clone();
        let horizon = ledger.len();
        let mut portfolio = Portfolio::new(horizon);

        for year in 1..=horizon {
            // Step 1: acquire projects until the policy declines
            self.acquire(year, &mut ledger, ctx, rng)?;

            // Step 2: risk incidents of this year's stages
            let risk_cost = self.realize_risk(year, ctx.risk, rng)?;

            // Step 3: cover any deficit by liquidating projects
            let possible_deficit = ledger.capacity(year) - risk_cost;
            let year_cash = if possible_deficit < 0 {
                self.reacquire_deficit_value(possible_deficit, year, &mut ledger)?
            } else {
                possible_deficit
            };

            // Step 4: retire projects that ran their last stage
            self.retire(year)?;

            // Step 5: record
            portfolio.credit_cash(year, year_cash);
            portfolio.value[year - 1] = self.current_value(year);

            self.check_books(year)?;
        }

        Ok(portfolio)
    }

    fn acquire<R: Rng + ?Sized>(
        &mut self,
        year: Year,
        ledger: &mut FundLedger,
        ctx: &RunContext<'_>,
        rng: &mut R,
    ) -> Result<()> {
        loop {
            let candidate = ctx.templates.choose(rng).stamped(year);

            let decision = DecisionContext {
                future_funds: ledger.from_year(year),
                current_projects: &self.current,
                current_year: year,
                economics: &self.economics,
                risk: ctx.risk,
            };
            if !self.policy.should_accept(&decision, &candidate)? {
                trace!(year, held = self.current.len(), "candidate rejected");
                return Ok(());
            }

            trace!(year, held = self.current.len(), "candidate accepted");
            ledger.debit_project(&candidate, self.economics.stage_cost);
            self.current.push(candidate);
            self.accepted += 1;
        }
    }

    fn realize_risk<R: Rng + ?Sized>(&self, year: Year, risk: &RiskModel, rng: &mut R) -> Result<Amount> {
        let mut risk_cost = 0;
        for project in &self.current {
            let stage = project.current_sub_project(year).ok_or(SimError::InactiveStage {
                created_at: project.created_at,
                year,
            })?;
            if stage.has_risk {
                risk_cost += risk.sample_incident(rng);
            }
        }
        Ok(risk_cost)
    }

    /// Liquidate the least valuable projects covering `deficit`.
    ///
    /// Falls back to liquidating every running project when no subset covers
    /// the deficit; the year then yields no cash.
    ///
    /// # Returns
    /// Salvage left over after paying the deficit
    pub fn reacquire_deficit_value(
        &mut self,
        deficit: Amount,
        current_year: Year,
        ledger: &mut FundLedger,
    ) -> Result<Amount> {
        let plan = find_optimal_closures(
            deficit,
            &self.current,
            current_year,
            self.economics.stage_value,
        )?;

        let Some(plan) = plan else {
            debug!(
                year = current_year,
                deficit,
                liquidated = self.current.len(),
                "no viable closure, liquidating every project"
            );
            let all: Vec<usize> = (0..self.current.len()).collect();
            self.close_projects(&all, current_year, ledger);
            return Ok(0);
        };

        let excess = plan.excess(deficit);
        if excess < 0 {
            return Err(SimError::invariant(format!(
                "closure left a deficit of {excess} in year {current_year}"
            )));
        }

        debug!(
            year = current_year,
            deficit,
            liquidated = plan.indices.len(),
            value_lost = plan.value,
            "covered deficit by liquidation"
        );
        self.close_projects(&plan.indices, current_year, ledger);
        Ok(excess)
    }

    /// Move the projects at `indices` (ascending) to the discarded list and
    /// refund their remaining stages.
    fn close_projects(&mut self, indices: &[usize], current_year: Year, ledger: &mut FundLedger) {
        let current = std::mem::take(&mut self.current);
        for (i, project) in current.into_iter().enumerate() {
            if indices.binary_search(&i).is_ok() {
                ledger.refund_project(&project, current_year, self.economics.stage_cost);
                self.discarded.push(project);
            } else {
                self.current.push(project);
            }
        }
    }

    fn retire(&mut self, year: Year) -> Result<()> {
        if let Some(stale) = self.current.iter().find(|p| !p.is_active(year)) {
            return Err(SimError::invariant(format!(
                "project created in year {} still running in year {year}",
                stale.created_at
            )));
        }

        let (finished, running): (Vec<Project>, Vec<Project>) = std::mem::take(&mut self.current)
            .into_iter()
            .partition(|p| p.offset(year) == Some(PROJECT_LENGTH - 1));
        self.completed.extend(finished);
        self.current = running;
        Ok(())
    }

    /// Portfolio value at the end of `year`.
    pub fn current_value(&self, year: Year) -> Amount {
        let stage_value = self.economics.stage_value;
        let running: Amount = self.current.iter().map(|p| p.current_value(year, stage_value)).sum();
        let finished = self.completed.len() as Amount * PROJECT_LENGTH as Amount * stage_value;
        running + finished
    }

    /// Verify the collections at the end of `year`: every project is held
    /// exactly once, running ones are inside their window with stages left,
    /// and finished ones ran all stages by `year`.
    fn check_books(&self, year: Year) -> Result<()> {
        let held = self.current.len() + self.completed.len() + self.discarded.len();
        if held != self.accepted {
            return Err(SimError::invariant(format!(
                "books do not balance in year {year}: accepted {} but hold {held}",
                self.accepted
            )));
        }
        if let Some(p) = self
            .current
            .iter()
            .find(|p| !p.is_active(year) || p.offset(year) == Some(PROJECT_LENGTH - 1))
        {
            return Err(SimError::invariant(format!(
                "project created in year {} is not running in year {year}",
                p.created_at
            )));
        }
        if let Some(p) = self.completed.iter().find(|p| p.created_at + PROJECT_LENGTH - 1 > year) {
            return Err(SimError::invariant(format!(
                "project created in year {} completed before year {year}",
                p.created_at
            )));
        }
        Ok(())
    }
}
