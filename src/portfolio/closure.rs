//! Least-value liquidation search.
//!
//! Given a funding deficit, finds the subset of held projects whose salvage
//! covers it while giving up the least accrued value. Subsets are enumerated in
//! canonical powerset order (by size, then lexicographically by index), and
//! ties keep the first subset found, so the result is fully deterministic.

use crate::core::error::{Result, SimError};
use crate::core::types::{Amount, Project, Year};

/// Largest active set the exhaustive search accepts.
pub const MAX_SEARCH_PROJECTS: usize = 24;

/// Projects chosen for liquidation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosurePlan {
    /// Indices into the searched project slice, ascending.
    pub indices: Vec<usize>,
    /// Total salvage recovered.
    pub salvage: Amount,
    /// Total accrued value given up.
    pub value: Amount,
}

impl ClosurePlan {
    /// Cash left over once `deficit` is paid from the salvage.
    #[inline]
    pub fn excess(&self, deficit: Amount) -> Amount {
        deficit + self.salvage
    }
}

/// Find the cheapest set of projects whose salvage covers `deficit`.
///
/// # Arguments
/// * `deficit` - Negative shortfall to cover
/// * `projects` - Candidates for liquidation
/// * `current_year` - Year whose stages are salvaged
/// * `stage_value` - Value per finished stage-year
///
/// # Returns
/// `None` when even liquidating everything does not cover the deficit.
pub fn find_optimal_closures(
    deficit: Amount,
    projects: &[Project],
    current_year: Year,
    stage_value: Amount,
) -> Result<Option<ClosurePlan>> {
    if deficit >= 0 {
        return Err(SimError::invariant(format!(
            "closure search needs a negative deficit, got {deficit}"
        )));
    }
    if projects.len() > MAX_SEARCH_PROJECTS {
        return Err(SimError::SearchSpaceTooLarge {
            projects: projects.len(),
            limit: MAX_SEARCH_PROJECTS,
        });
    }

    let salvages: Vec<Amount> = projects
        .iter()
        .map(|p| p.current_sub_project(current_year).map_or(0, |s| s.salvageable_cost))
        .collect();
    let values: Vec<Amount> =
        projects.iter().map(|p| p.current_value(current_year, stage_value)).collect();

    let mut best: Option<ClosurePlan> = None;

    for_each_subset(projects.len(), |subset| {
        let salvage: Amount = subset.iter().map(|&i| salvages[i]).sum();
        if deficit + salvage < 0 {
            return;
        }

        let value: Amount = subset.iter().map(|&i| values[i]).sum();
        if best.as_ref().map_or(true, |b| value < b.value) {
            best = Some(ClosurePlan {
                indices: subset.to_vec(),
                salvage,
                value,
            });
        }
    });

    Ok(best)
}

/// Visit every subset of `0..n` in canonical powerset order.
fn for_each_subset<F: FnMut(&[usize])>(n: usize, mut visit: F) {
    let mut indices: Vec<usize> = Vec::with_capacity(n);

    for size in 0..=n {
        indices.clear();
        indices.extend(0..size);

        loop {
            visit(&indices);

            // Advance to the next combination in lexicographic order
            let Some(pos) = (0..size).rev().find(|&i| indices[i] != i + n - size) else {
                break;
            };
            indices[pos] += 1;
            for j in pos + 1..size {
                indices[j] = indices[j - 1] + 1;
            }
        }
    }
}
