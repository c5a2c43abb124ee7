//! Repeated simulation of all managers and result collection.

pub mod orchestrator;
pub mod results;

pub use orchestrator::{IterationResult, Simulation};
pub use results::{ManagerResult, ResultTable, SimulationResult};
