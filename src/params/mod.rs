//! Simulation parameters: product terms, order volume, and risk assumptions

mod product;
pub mod loader;

pub use product::{Portfolio, ProductTerms, MAX_REPAYMENT_PERIODS};
pub use loader::{load_params, params_from_json};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use product::check_unit_interval;

/// Longest origination window accepted (100 years)
pub const MAX_MONTHS: u32 = 1200;

/// Inclusive range for the number of orders originated each month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRange {
    pub low: u32,
    pub high: u32,
}

impl OrderRange {
    pub fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    /// A range that always yields `count`
    pub fn fixed(count: u32) -> Self {
        Self::new(count, count)
    }

    /// Uniform draw from `low..=high`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.low..=self.high)
    }

    /// Split into (base, remainder) cohorts; the remainder gets `share` of the volume
    pub fn split(&self, share: f64) -> (OrderRange, OrderRange) {
        let keep = (1.0 - share).clamp(0.0, 1.0);
        let base = OrderRange::new(
            (self.low as f64 * keep).floor() as u32,
            (self.high as f64 * keep).floor() as u32,
        );
        let rest = OrderRange::new(self.low - base.low, self.high - base.high);
        (base, rest)
    }
}

/// How the bad-debt rate reduces collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultRisk {
    /// Each order defaults independently with probability `bad_debt_rate`
    /// and then collects nothing
    PerOrder,
    /// Every collection is scaled by `1 - bad_debt_rate`
    Expected,
}

/// Full parameter set for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Months during which new orders originate
    pub months: u32,
    pub device_cost: f64,
    /// Fee as a fraction of contractual repayment, paid up front
    pub service_fee_rate: f64,
    pub bad_debt_rate: f64,
    pub monthly_order_range: OrderRange,
    /// Unset means the portfolio's own default, see [`SimulationParams::default_risk`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_risk: Option<DefaultRisk>,
    pub portfolio: Portfolio,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            months: 12,
            device_cost: 5000.0,
            service_fee_rate: 0.0,
            bad_debt_rate: 0.0,
            monthly_order_range: OrderRange::new(19, 20),
            default_risk: None,
            portfolio: Portfolio::Mixed {
                product1: ProductTerms::new(0.3, 9, 2),
                product2: ProductTerms::new(0.4, 12, 3),
                product1_ratio: 0.5,
                prepayment_rate: 0.2,
                investment_ratio: 1.0,
            },
        }
    }
}

impl SimulationParams {
    /// Single-product parameter set with per-order defaults
    pub fn single(
        months: u32,
        device_cost: f64,
        product: ProductTerms,
        monthly_order_range: OrderRange,
    ) -> Self {
        Self {
            months,
            device_cost,
            service_fee_rate: 0.0,
            bad_debt_rate: 0.0,
            monthly_order_range,
            default_risk: None,
            portfolio: Portfolio::Single { product },
        }
    }

    pub fn with_bad_debt_rate(mut self, rate: f64) -> Self {
        self.bad_debt_rate = rate;
        self
    }

    pub fn with_service_fee_rate(mut self, rate: f64) -> Self {
        self.service_fee_rate = rate;
        self
    }

    pub fn with_default_risk(mut self, risk: DefaultRisk) -> Self {
        self.default_risk = Some(risk);
        self
    }

    /// Default-risk mechanism in effect: per-order for a single product,
    /// expected-loss scaling for a mixed portfolio, unless set explicitly
    pub fn default_risk(&self) -> DefaultRisk {
        self.default_risk.unwrap_or(match self.portfolio {
            Portfolio::Single { .. } => DefaultRisk::PerOrder,
            Portfolio::Mixed { .. } => DefaultRisk::Expected,
        })
    }

    /// Length of every output series: origination months plus the longest tail
    pub fn horizon(&self) -> usize {
        self.months as usize + self.portfolio.max_repayment_tail() as usize
    }

    /// Check every parameter against its domain, reporting the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.months > MAX_MONTHS {
            return Err(ConfigError::invalid(
                "months",
                format!("must be at most {MAX_MONTHS}, got {}", self.months),
            ));
        }
        if !(self.device_cost.is_finite() && self.device_cost > 0.0) {
            return Err(ConfigError::invalid(
                "device_cost",
                format!("must be positive, got {}", self.device_cost),
            ));
        }
        if !(0.0..1.0).contains(&self.service_fee_rate) {
            return Err(ConfigError::invalid(
                "service_fee_rate",
                format!("must be in [0, 1), got {}", self.service_fee_rate),
            ));
        }
        check_unit_interval("bad_debt_rate", self.bad_debt_rate)?;
        if self.monthly_order_range.low > self.monthly_order_range.high {
            return Err(ConfigError::invalid(
                "monthly_order_range",
                format!(
                    "low ({}) exceeds high ({})",
                    self.monthly_order_range.low, self.monthly_order_range.high
                ),
            ));
        }
        self.portfolio.validate()
    }
}
