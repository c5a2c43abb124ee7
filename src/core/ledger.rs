//! Multi-year fund ledger.
//!
//! Each entry holds the funds still unallocated for one calendar year. Accepting
//! a project debits its stage cost from the years it runs in; liquidating a
//! project refunds the stages it no longer needs.

use serde::{Deserialize, Serialize};

use crate::core::types::{Amount, Project, Year, PROJECT_LENGTH};

/// Funds available in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundYear {
    pub allocated_funds: Amount,
}

impl FundYear {
    pub fn new(allocated_funds: Amount) -> Self {
        Self { allocated_funds }
    }
}

/// The standard nine-year funding profile.
pub const STANDARD_CAPACITIES: [Amount; 9] = [23, 35, 46, 58, 58, 58, 58, 58, 58];

/// Debit `stage_cost` from the first `PROJECT_LENGTH` entries of `funds`.
///
/// `funds` must start at the project's first year. Entries past the end are
/// clipped.
pub fn debit_window(funds: &mut [FundYear], stage_cost: Amount) {
    for year in funds.iter_mut().take(PROJECT_LENGTH) {
        year.allocated_funds -= stage_cost;
    }
}

/// Ordered per-year capacities for one manager run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundLedger {
    years: Vec<FundYear>,
}

impl FundLedger {
    /// Create a ledger from raw capacities, year 1 first.
    pub fn new(capacities: &[Amount]) -> Self {
        Self {
            years: capacities.iter().copied().map(FundYear::new).collect(),
        }
    }

    /// The standard nine-year ledger.
    pub fn standard() -> Self {
        Self::new(&STANDARD_CAPACITIES)
    }

    /// Get the number of years.
    #[inline]
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Funds left in `year` (1-based).
    ///
    /// # Panics
    /// Panics if `year` is outside the ledger.
    #[inline]
    pub fn capacity(&self, year: Year) -> Amount {
        self.years[year - 1].allocated_funds
    }

    /// All entries from `year` to the end of the horizon.
    pub fn from_year(&self, year: Year) -> &[FundYear] {
        &self.years[(year - 1).min(self.years.len())..]
    }

    /// All entries.
    pub fn years(&self) -> &[FundYear] {
        &self.years
    }

    /// Reserve `stage_cost` in every year `project` runs in.
    pub fn debit_project(&mut self, project: &Project, stage_cost: Amount) {
        let start = (project.created_at - 1).min(self.years.len());
        debit_window(&mut self.years[start..], stage_cost);
    }

    /// Return the reservations of `project` from its stage in `current_year`
    /// through the end of its window.
    pub fn refund_project(&mut self, project: &Project, current_year: Year, stage_cost: Amount) {
        let Some(offset) = project.offset(current_year) else {
            return;
        };

        for stage in offset..PROJECT_LENGTH {
            let index = project.created_at - 1 + stage;
            if let Some(year) = self.years.get_mut(index) {
                year.allocated_funds += stage_cost;
            }
        }
    }

    /// Sum of all capacities.
    pub fn total(&self) -> Amount {
        self.years.iter().map(|y| y.allocated_funds).sum()
    }
}

impl Default for FundLedger {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SubProject;

    fn project(created_at: Year) -> Project {
        Project::new(created_at, [SubProject::new(false, 0, 0); PROJECT_LENGTH])
    }

    #[test]
    fn test_debit_clips_to_horizon() {
        let mut ledger = FundLedger::standard();
        ledger.debit_project(&project(7), 10);

        assert_eq!(ledger.capacity(6), 58);
        assert_eq!(ledger.capacity(7), 48);
        assert_eq!(ledger.capacity(9), 48);
        assert_eq!(ledger.total(), FundLedger::standard().total() - 30);
    }

    #[test]
    fn test_refund_remaining_stages() {
        let mut ledger = FundLedger::new(&[20; 9]);
        let p = project(2);
        ledger.debit_project(&p, 10);
        ledger.refund_project(&p, 4, 10);

        assert_eq!(ledger.capacity(2), 10);
        assert_eq!(ledger.capacity(3), 10);
        assert_eq!(ledger.capacity(4), 20);
        assert_eq!(ledger.capacity(7), 20);
    }

    #[test]
    fn test_refund_outside_window_is_noop() {
        let mut ledger = FundLedger::new(&[20; 9]);
        ledger.refund_project(&project(1), 8, 10);
        assert_eq!(ledger.total(), 180);
    }

    #[test]
    fn test_from_year() {
        let ledger = FundLedger::standard();
        assert_eq!(ledger.from_year(1).len(), 9);
        assert_eq!(ledger.from_year(4)[0].allocated_funds, 58);
        assert_eq!(ledger.from_year(9).len(), 1);
        assert!(ledger.from_year(10).is_empty());
    }
}
