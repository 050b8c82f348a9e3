//! Monthly order-generation engine

use rand::Rng;

use super::cashflows::SimulationResult;
use super::state::RunState;
use crate::error::ConfigError;
use crate::order::LeaseOrder;
use crate::params::{DefaultRisk, Portfolio, ProductTerms, SimulationParams};

/// Simulation engine for one validated parameter set
///
/// The engine holds no run state: each call to [`simulate`](Self::simulate)
/// starts from empty accumulators and returns a fresh result.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    params: SimulationParams,
}

impl SimulationEngine {
    /// Validate `params` and build an engine
    pub fn new(params: SimulationParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Run the simulation, drawing order counts, product choice and defaults from `rng`
    pub fn simulate<R: Rng + ?Sized>(&self, rng: &mut R) -> SimulationResult {
        let params = &self.params;
        let investment_ratio = params.portfolio.investment_ratio();
        let default_risk = params.default_risk();
        let collection_scale = match default_risk {
            DefaultRisk::PerOrder => investment_ratio,
            DefaultRisk::Expected => (1.0 - params.bad_debt_rate) * investment_ratio,
        };

        log::info!(
            "Simulating {} months ({} month horizon), orders/month {}..={}",
            params.months,
            params.horizon(),
            params.monthly_order_range.low,
            params.monthly_order_range.high,
        );

        let mut state = RunState::new(params.months, params.horizon());

        for month in 1..=params.months {
            let order_count = params.monthly_order_range.sample(rng);
            let mut investment = 0.0;

            for _ in 0..order_count {
                let (terms, lease_rate) = self.pick_product(rng);
                let service_fee =
                    params.device_cost * (1.0 + terms.lease_rate) * params.service_fee_rate;
                investment += (params.device_cost + service_fee) * investment_ratio;

                let defaulted = match default_risk {
                    DefaultRisk::PerOrder => rng.gen::<f64>() < params.bad_debt_rate,
                    DefaultRisk::Expected => false,
                };

                let order = LeaseOrder::new(month, params.device_cost, terms, lease_rate, defaulted);
                state.record_order(order, collection_scale);
            }

            log::debug!("Month {}: {} orders, investment {:.2}", month, order_count, investment);
            state.record_month(order_count, investment);
        }

        let result = SimulationResult::from_state(state);
        log::info!(
            "Simulation complete: {} orders, breakeven {:?}",
            result.orders().len(),
            result.breakeven_month()
        );
        result
    }

    /// Choose the product for one order and its effective lease rate.
    ///
    /// Mixed portfolios blend in prepayment: a `prepayment_rate` share of the
    /// book settles early and earns half the contracted rate.
    fn pick_product<R: Rng + ?Sized>(&self, rng: &mut R) -> (&ProductTerms, f64) {
        match &self.params.portfolio {
            Portfolio::Single { product } => (product, product.lease_rate),
            Portfolio::Mixed {
                product1,
                product2,
                product1_ratio,
                prepayment_rate,
                ..
            } => {
                let terms = if rng.gen::<f64>() < *product1_ratio {
                    product1
                } else {
                    product2
                };
                let raw = terms.lease_rate;
                let adjusted = prepayment_rate * (raw / 2.0) + (1.0 - prepayment_rate) * raw;
                (terms, adjusted)
            }
        }
    }
}
