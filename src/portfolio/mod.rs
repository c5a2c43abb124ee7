//! Project portfolio management: the per-year manager and liquidation search.

pub mod closure;
pub mod manager;

pub use closure::{find_optimal_closures, ClosurePlan};
pub use manager::{ProjectManager, RunContext};
