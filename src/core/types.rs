//! Core data types for fundsim.

use serde::{Deserialize, Serialize};

/// Number of yearly stages in every project.
pub const PROJECT_LENGTH: usize = 6;

/// Type alias for 1-based simulation years.
pub type Year = usize;

/// Type alias for money amounts (capacities, costs, deficits).
pub type Amount = i64;

/// One yearly stage of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubProject {
    /// Whether this stage can incur a risk incident.
    pub has_risk: bool,
    /// Cost already spent on the stage. Kept for records only.
    pub sunk_cost: Amount,
    /// Cash recovered if the project is liquidated during this stage.
    pub salvageable_cost: Amount,
}

impl SubProject {
    /// Create a new stage.
    pub fn new(has_risk: bool, sunk_cost: Amount, salvageable_cost: Amount) -> Self {
        Self {
            has_risk,
            sunk_cost,
            salvageable_cost,
        }
    }
}

/// A multi-stage investment opportunity.
///
/// A project started in `created_at` runs its stages in years
/// `created_at..created_at + PROJECT_LENGTH`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Year the project started.
    pub created_at: Year,
    /// The ordered stages.
    pub sub_projects: [SubProject; PROJECT_LENGTH],
}

impl Project {
    /// Create a new project.
    pub fn new(created_at: Year, sub_projects: [SubProject; PROJECT_LENGTH]) -> Self {
        Self {
            created_at,
            sub_projects,
        }
    }

    /// Copy of this project started in `year`.
    pub fn stamped(&self, year: Year) -> Self {
        Self {
            created_at: year,
            sub_projects: self.sub_projects,
        }
    }

    /// Stage offset for `year`, if the project is running that year.
    #[inline]
    pub fn offset(&self, year: Year) -> Option<usize> {
        year.checked_sub(self.created_at)
            .filter(|&offset| offset < PROJECT_LENGTH)
    }

    /// Check if the project is running in `year`.
    #[inline]
    pub fn is_active(&self, year: Year) -> bool {
        self.offset(year).is_some()
    }

    /// The stage worked on in `year`, `None` outside the active window.
    pub fn current_sub_project(&self, year: Year) -> Option<&SubProject> {
        self.offset(year).map(|offset| &self.sub_projects[offset])
    }

    /// Value accrued by `year`: finished stage-years times `stage_value`.
    pub fn current_value(&self, year: Year, stage_value: Amount) -> Amount {
        let elapsed = (year + 1).saturating_sub(self.created_at).min(PROJECT_LENGTH);
        elapsed as Amount * stage_value
    }

    /// Years in which the project is active.
    pub fn active_years(&self) -> std::ops::Range<Year> {
        self.created_at..self.created_at + PROJECT_LENGTH
    }
}

/// Value and cash trajectory of one manager over one iteration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Portfolio {
    /// Portfolio value at the end of each year.
    pub value: Vec<Amount>,
    /// Cumulative cash at the end of each year.
    pub cash: Vec<Amount>,
}

impl Portfolio {
    /// Create a zeroed portfolio for `years` years.
    pub fn new(years: usize) -> Self {
        Self {
            value: vec![0; years],
            cash: vec![0; years],
        }
    }

    /// Get the number of years.
    #[inline]
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Credit `amount` to `year` and every later year.
    pub fn credit_cash(&mut self, year: Year, amount: Amount) {
        for cash in self.cash.iter_mut().skip(year - 1) {
            *cash += amount;
        }
    }
}
