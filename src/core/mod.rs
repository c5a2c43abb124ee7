//! Core types and utilities for fundsim.

pub mod config;
pub mod error;
pub mod ledger;
pub mod types;

pub use config::{ManagerSpec, ProjectEconomics, RiskConfig, SimulationConfig, TemplateBounds};
pub use error::{Result, SimError};
pub use ledger::{FundLedger, FundYear};
pub use types::*;
