//! fundsim - Monte Carlo evaluation of project funding policies.
//!
//! A set of managers each fund a stream of six-stage projects from a
//! constrained multi-year budget. Risky stages draw random costs; a manager that
//! cannot pay liquidates its least valuable projects. Repeating the run many
//! times gives per-year value and cash distributions for every policy.
//!
//! This crate provides:
//! - Fund ledger and project model
//! - Risk incident sampling and total-cost probability tables
//! - Least-value liquidation search
//! - Greedy, minus-one and probability-tree acceptance policies
//! - Seeded, optionally parallel Monte Carlo orchestration

pub mod core;
pub mod input;
pub mod portfolio;
pub mod risk;
pub mod simulation;
pub mod strategies;

pub use crate::core::{
    FundLedger, ManagerSpec, Portfolio, Project, ProjectEconomics, Result, SimError,
    SimulationConfig, SubProject,
};
pub use crate::input::TemplatePool;
pub use crate::portfolio::ProjectManager;
pub use crate::risk::RiskModel;
pub use crate::simulation::{Simulation, SimulationResult};
pub use crate::strategies::{AcceptancePolicy, Policy, PolicyKind};
