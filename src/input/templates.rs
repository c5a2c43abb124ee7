//! Project template pool and row validation.
//!
//! A template row carries three integers per stage, in stage order:
//! sunk cost, salvageable cost, and a risk flag (any non-zero value marks a
//! risky stage).

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::TemplateBounds;
use crate::core::error::{Result, SimError};
use crate::core::types::{Amount, Project, SubProject, PROJECT_LENGTH};

/// Integers per stage in a template row.
pub const STAGE_FIELDS: usize = 3;

/// Integers in a full template row.
pub const ROW_WIDTH: usize = STAGE_FIELDS * PROJECT_LENGTH;

/// Parse one row into a project template (created at year 0).
pub fn parse_template_row(row_index: usize, row: &[Amount]) -> Result<Project> {
    if row.len() != ROW_WIDTH {
        return Err(SimError::malformed_template(
            row_index,
            format!("expected {ROW_WIDTH} values, got {}", row.len()),
        ));
    }

    let mut stages = [SubProject::new(false, 0, 0); PROJECT_LENGTH];
    for (stage_index, (stage, fields)) in
        stages.iter_mut().zip(row.chunks_exact(STAGE_FIELDS)).enumerate()
    {
        let (sunk, salvage, flag) = (fields[0], fields[1], fields[2]);
        if sunk < 0 || salvage < 0 {
            return Err(SimError::malformed_template(
                row_index,
                format!("stage {} has a negative cost", stage_index + 1),
            ));
        }
        *stage = SubProject::new(flag != 0, sunk, salvage);
    }

    Ok(Project::new(0, stages))
}

/// Read-only pool of candidate projects, sampled with replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePool {
    templates: Vec<Project>,
}

impl TemplatePool {
    /// Create a pool, checking its size against `bounds`.
    pub fn new(templates: Vec<Project>, bounds: TemplateBounds) -> Result<Self> {
        let found = templates.len();
        if found < bounds.min || found > bounds.max {
            return Err(SimError::InvalidTemplateCount {
                found,
                min: bounds.min,
                max: bounds.max,
            });
        }

        for (row, template) in templates.iter().enumerate() {
            let negative = template
                .sub_projects
                .iter()
                .any(|s| s.sunk_cost < 0 || s.salvageable_cost < 0);
            if negative {
                return Err(SimError::malformed_template(row, "negative stage cost"));
            }
        }

        Ok(Self { templates })
    }

    /// Parse and validate raw rows.
    pub fn from_rows<R: AsRef<[Amount]>>(rows: &[R], bounds: TemplateBounds) -> Result<Self> {
        let templates = rows
            .iter()
            .enumerate()
            .map(|(i, row)| parse_template_row(i, row.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(templates, bounds)
    }

    /// Draw a template uniformly.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &Project {
        // Construction guarantees at least one template
        self.templates.choose(rng).unwrap_or(&self.templates[0])
    }

    /// Get the number of templates.
    #[inline]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn templates(&self) -> &[Project] {
        &self.templates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Vec<Amount> {
        vec![8, 2, 0, 7, 3, 1, 9, 1, 1, 5, 5, 0, 6, 4, 0, 8, 2, 1]
    }

    #[test]
    fn test_parse_row() {
        let project = parse_template_row(0, &row()).unwrap();
        let expected = [
            SubProject::new(false, 8, 2),
            SubProject::new(true, 7, 3),
            SubProject::new(true, 9, 1),
            SubProject::new(false, 5, 5),
            SubProject::new(false, 6, 4),
            SubProject::new(true, 8, 2),
        ];
        assert_eq!(project, Project::new(0, expected));
    }

    #[test]
    fn test_rejects_short_row() {
        let err = parse_template_row(4, &row()[..17]).unwrap_err();
        assert!(matches!(err, SimError::MalformedTemplate { row: 4, .. }));
    }

    #[test]
    fn test_any_nonzero_flag_is_risky() {
        let mut flags = row();
        flags[2] = 2;
        flags[5] = 0;
        flags[8] = -1;
        let project = parse_template_row(0, &flags).unwrap();

        assert!(project.sub_projects[0].has_risk);
        assert!(!project.sub_projects[1].has_risk);
        assert!(project.sub_projects[2].has_risk);
    }

    #[test]
    fn test_rejects_negative_cost() {
        let mut negative = row();
        negative[4] = -1;
        let err = parse_template_row(0, &negative).unwrap_err();
        assert!(err.to_string().contains("stage 2"));
    }

    #[test]
    fn test_pool_bounds() {
        let bounds = TemplateBounds { min: 1, max: 2 };
        let empty: Vec<Vec<Amount>> = Vec::new();
        assert_eq!(
            TemplatePool::from_rows(&empty, bounds).unwrap_err(),
            SimError::InvalidTemplateCount { found: 0, min: 1, max: 2 }
        );
        assert!(TemplatePool::from_rows(&[row(), row(), row()], bounds).is_err());
        assert_eq!(TemplatePool::from_rows(&[row(), row()], bounds).unwrap().len(), 2);
    }
}
