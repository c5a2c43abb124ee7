//! Per-manager sample collections.
//!
//! Samples are stored per year, one entry per iteration, and can be exported as
//! tables with one row per iteration and one column per year.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::{Amount, Portfolio, Year};

/// All samples collected for one manager.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManagerResult {
    /// `value[year - 1][iteration]`
    value: Vec<Vec<Amount>>,
    /// `cash[year - 1][iteration]`
    cash: Vec<Vec<Amount>>,
}

impl ManagerResult {
    /// Create an empty result for a `horizon`-year simulation.
    pub fn new(horizon: usize) -> Self {
        Self {
            value: vec![Vec::new(); horizon],
            cash: vec![Vec::new(); horizon],
        }
    }

    /// Append one iteration's portfolio.
    pub fn record(&mut self, portfolio: &Portfolio) -> Result<()> {
        if portfolio.value.len() != self.horizon() || portfolio.cash.len() != self.horizon() {
            return Err(SimError::invariant(format!(
                "portfolio covers {} years, expected {}",
                portfolio.len(),
                self.horizon()
            )));
        }

        for (samples, &v) in self.value.iter_mut().zip(&portfolio.value) {
            samples.push(v);
        }
        for (samples, &c) in self.cash.iter_mut().zip(&portfolio.cash) {
            samples.push(c);
        }
        Ok(())
    }

    /// Number of simulated years.
    pub fn horizon(&self) -> usize {
        self.value.len()
    }

    /// Number of recorded iterations.
    pub fn iterations(&self) -> usize {
        self.value.first().map_or(0, Vec::len)
    }

    /// Value samples of `year` (1-based), one per iteration.
    ///
    /// # Panics
    /// Panics if `year` is 0 or past the horizon.
    pub fn value_samples(&self, year: Year) -> &[Amount] {
        &self.value[year - 1]
    }

    /// Cash samples of `year` (1-based), one per iteration.
    ///
    /// # Panics
    /// Panics if `year` is 0 or past the horizon.
    pub fn cash_samples(&self, year: Year) -> &[Amount] {
        &self.cash[year - 1]
    }

    /// Sample mean of the value in `year`.
    pub fn mean_value(&self, year: Year) -> Option<f64> {
        mean(self.value.get(year.checked_sub(1)?)?)
    }

    /// Sample mean of the cumulative cash in `year`.
    pub fn mean_cash(&self, year: Year) -> Option<f64> {
        mean(self.cash.get(year.checked_sub(1)?)?)
    }

    /// Sample mean of the value in the last year.
    pub fn final_value_mean(&self) -> Option<f64> {
        self.mean_value(self.horizon())
    }

    /// Value samples with one row per iteration.
    pub fn value_table(&self) -> Vec<Vec<Amount>> {
        transpose(&self.value)
    }

    /// Cash samples with one row per iteration.
    pub fn cash_table(&self) -> Vec<Vec<Amount>> {
        transpose(&self.cash)
    }
}

fn mean(samples: &[Amount]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().map(|&s| s as f64).sum::<f64>() / samples.len() as f64)
}

fn transpose(columns: &[Vec<Amount>]) -> Vec<Vec<Amount>> {
    let rows = columns.first().map_or(0, Vec::len);
    (0..rows)
        .map(|row| columns.iter().map(|column| column[row]).collect())
        .collect()
}

/// A named sheet ready for tabular export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    pub name: String,
    /// `year_1`, `year_2`, ...
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Amount>>,
}

/// Samples of every manager, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimulationResult {
    managers: Vec<(String, ManagerResult)>,
}

impl SimulationResult {
    /// Create empty results for the named managers.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>, horizon: usize) -> Self {
        Self {
            managers: names
                .into_iter()
                .map(|name| (name.into(), ManagerResult::new(horizon)))
                .collect(),
        }
    }

    /// Append one iteration, given as portfolios keyed by manager name.
    pub fn add_iteration_result(&mut self, iteration: &[(String, Portfolio)]) -> Result<()> {
        if iteration.len() != self.managers.len() {
            return Err(SimError::invariant(format!(
                "iteration reported {} managers, expected {}",
                iteration.len(),
                self.managers.len()
            )));
        }

        for (name, portfolio) in iteration {
            let result = self
                .managers
                .iter_mut()
                .find(|(n, _)| n == name)
                .map(|(_, r)| r)
                .ok_or_else(|| SimError::invariant(format!("unknown manager '{name}'")))?;
            result.record(portfolio)?;
        }
        Ok(())
    }

    /// Samples of the manager called `name`.
    pub fn get(&self, name: &str) -> Option<&ManagerResult> {
        self.managers.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    /// Managers in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ManagerResult)> {
        self.managers.iter().map(|(n, r)| (n.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }

    /// One value sheet and one cash sheet per manager.
    pub fn tables(&self) -> Vec<ResultTable> {
        let mut tables = Vec::with_capacity(self.managers.len() * 2);
        for (name, result) in &self.managers {
            let columns: Vec<String> = (1..=result.horizon()).map(|y| format!("year_{y}")).collect();
            tables.push(ResultTable {
                name: format!("{name}-value-result"),
                columns: columns.clone(),
                rows: result.value_table(),
            });
            tables.push(ResultTable {
                name: format!("{name}-cash-result"),
                columns,
                rows: result.cash_table(),
            });
        }
        tables
    }
}
