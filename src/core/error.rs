//! Error types for fundsim.

use thiserror::Error;

/// Result type alias for fundsim operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Error types for the simulation engine.
///
/// Input errors are raised before any iteration runs. Every other variant marks
/// a broken internal invariant and aborts the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Template pool size outside the configured bounds.
    #[error("Template count must be between {min} and {max}, got {found}")]
    InvalidTemplateCount { found: usize, min: usize, max: usize },

    /// A template row could not be turned into a project.
    #[error("Malformed template at row {row}: {message}")]
    MalformedTemplate { row: usize, message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A stage was requested outside a project's active window.
    #[error("Project created in year {created_at} has no stage in year {year}")]
    InactiveStage { created_at: usize, year: usize },

    /// Risk table lookup outside the precomputed range.
    #[error("Risk elements must be between 0 and {max}, got {requested}")]
    RiskElementsOutOfRange { requested: usize, max: usize },

    /// Probability tree evaluated without any conflict year.
    #[error("Probability tree evaluated on an empty conflict list")]
    EmptyConflictList,

    /// Closure search refused because the subset space is too large.
    #[error("Closure search over {projects} projects exceeds the limit of {limit}")]
    SearchSpaceTooLarge { projects: usize, limit: usize },

    /// Internal bookkeeping no longer holds.
    #[error("Invariant violated: {message}")]
    InvariantViolation { message: String },
}

impl SimError {
    /// Create a malformed template error.
    pub fn malformed_template(row: usize, message: impl Into<String>) -> Self {
        Self::MalformedTemplate {
            row,
            message: message.into(),
        }
    }

    /// Create an invalid config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invariant violation error.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// True for errors caused by bad input rather than a logic defect.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidTemplateCount { .. }
                | Self::MalformedTemplate { .. }
                | Self::InvalidConfig { .. }
        )
    }
}
