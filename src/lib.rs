//! Lease Simulator - cash-flow economics of a device-leasing business
//!
//! This library provides:
//! - Per-order installment schedules with bundled first payments and defaults
//! - Monthly order generation with single or mixed product portfolios
//! - Aggregated investment, repayment, net and cumulative cash-flow series
//! - Breakeven month, peak exposure, realized return and IRR metrics
//! - Parallel sensitivity sweeps over bad debt, prepayment, mix and first-payment uplift

pub mod error;
pub mod params;
pub mod order;
pub mod projection;
pub mod scenario;
pub mod report;

// Re-export commonly used types
pub use error::{ConfigError, ModelError};
pub use params::{DefaultRisk, OrderRange, Portfolio, ProductTerms, SimulationParams};
pub use order::LeaseOrder;
pub use projection::{CashflowRow, RunMetrics, SimulationEngine, SimulationResult};
pub use scenario::{ScenarioRunner, SensitivityReport, SweepAxis, SweepMetric};
