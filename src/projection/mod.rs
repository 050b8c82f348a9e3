//! Simulation engine and cash-flow aggregation

mod state;
mod engine;
mod cashflows;
pub mod series;
pub mod irr;

pub use engine::SimulationEngine;
pub use cashflows::{CashflowRow, RunMetrics, SimulationResult};
pub use irr::{annualized_irr, monthly_irr};
