//! Sensitivity sweeps over a single parameter
//!
//! Each sweep point builds its own engine and random source, so points run
//! in parallel and results come back in grid order.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::params::{Portfolio, SimulationParams};
use crate::projection::series::{average_slope, combine_series, interpolate};
use crate::projection::{RunMetrics, SimulationEngine, SimulationResult};

/// Parameter varied by a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepAxis {
    BadDebtRate,
    PrepaymentRate,
    Product1Ratio,
    /// Share of orders that collect one extra installment up front
    FirstPaymentUplift,
}

impl SweepAxis {
    pub fn name(&self) -> &'static str {
        match self {
            SweepAxis::BadDebtRate => "bad_debt_rate",
            SweepAxis::PrepaymentRate => "prepayment_rate",
            SweepAxis::Product1Ratio => "product1_ratio",
            SweepAxis::FirstPaymentUplift => "first_payment_uplift",
        }
    }

    /// Standard grid for this axis
    pub fn default_grid(&self) -> Vec<f64> {
        match self {
            SweepAxis::BadDebtRate => linspace(0.0, 0.08, 9),
            SweepAxis::PrepaymentRate => linspace(0.0, 0.25, 11),
            SweepAxis::Product1Ratio => linspace(0.0, 1.0, 11),
            SweepAxis::FirstPaymentUplift => vec![0.0, 0.25, 0.5, 0.75, 1.0],
        }
    }

    /// Value of this axis in `params`; the base configuration has no uplift
    pub fn current_value(&self, params: &SimulationParams) -> Result<f64, ConfigError> {
        match (self, &params.portfolio) {
            (SweepAxis::BadDebtRate, _) => Ok(params.bad_debt_rate),
            (SweepAxis::FirstPaymentUplift, _) => Ok(0.0),
            (SweepAxis::PrepaymentRate, Portfolio::Mixed { prepayment_rate, .. }) => {
                Ok(*prepayment_rate)
            }
            (SweepAxis::Product1Ratio, Portfolio::Mixed { product1_ratio, .. }) => {
                Ok(*product1_ratio)
            }
            _ => Err(self.not_applicable()),
        }
    }

    /// Copy of `params` with this axis set to `value`
    fn apply(&self, params: &SimulationParams, value: f64) -> Result<SimulationParams, ConfigError> {
        let mut params = params.clone();
        match (self, &mut params.portfolio) {
            (SweepAxis::BadDebtRate, _) => params.bad_debt_rate = value,
            (SweepAxis::PrepaymentRate, Portfolio::Mixed { prepayment_rate, .. }) => {
                *prepayment_rate = value
            }
            (SweepAxis::Product1Ratio, Portfolio::Mixed { product1_ratio, .. }) => {
                *product1_ratio = value
            }
            _ => return Err(self.not_applicable()),
        }
        Ok(params)
    }

    fn not_applicable(&self) -> ConfigError {
        ConfigError::AxisNotApplicable {
            axis: self.name().to_string(),
        }
    }
}

/// Summary statistic read from each sweep point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMetric {
    NetProfit,
    PeakExposure,
    BreakevenMonth,
}

impl SweepMetric {
    /// None when the metric is undefined for the run (no breakeven)
    pub fn of(&self, metrics: &RunMetrics) -> Option<f64> {
        match self {
            SweepMetric::NetProfit => Some(metrics.net_profit),
            SweepMetric::PeakExposure => Some(metrics.peak_exposure),
            SweepMetric::BreakevenMonth => metrics.breakeven_month.map(f64::from),
        }
    }
}

/// One simulated grid point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub value: f64,
    pub metrics: RunMetrics,
}

/// All grid points of a sweep plus the base configuration's axis value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityReport {
    pub axis: SweepAxis,
    pub current_value: f64,
    /// In the order the values were supplied
    pub points: Vec<SweepPoint>,
}

impl SensitivityReport {
    /// (axis value, metric) pairs sorted by axis value, skipping undefined metrics
    pub fn series(&self, metric: SweepMetric) -> (Vec<f64>, Vec<f64>) {
        let mut pairs: Vec<(f64, f64)> = self
            .points
            .iter()
            .filter_map(|p| metric.of(&p.metrics).map(|y| (p.value, y)))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        pairs.into_iter().unzip()
    }

    /// Metric interpolated at the base configuration's axis value
    pub fn at_current(&self, metric: SweepMetric) -> Option<f64> {
        let (xs, ys) = self.series(metric);
        interpolate(&xs, &ys, self.current_value)
    }

    /// Average change in the metric per unit of the axis across the sweep
    pub fn average_slope(&self, metric: SweepMetric) -> Option<f64> {
        let (xs, ys) = self.series(metric);
        average_slope(&xs, &ys)
    }
}

/// Re-runs the engine across parameter sweeps, holding a base configuration fixed
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(SimulationParams::default())?.with_seed(7);
/// let report = runner.sweep(SweepAxis::BadDebtRate, &SweepAxis::BadDebtRate.default_grid())?;
/// let slope = report.average_slope(SweepMetric::NetProfit);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base: SimulationParams,
    /// Shared by every point when set (common random numbers)
    seed: Option<u64>,
}

impl ScenarioRunner {
    pub fn new(base: SimulationParams) -> Result<Self, ConfigError> {
        base.validate()?;
        Ok(Self { base, seed: None })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Simulate the base configuration
    pub fn run_base(&self) -> Result<SimulationResult, ConfigError> {
        let engine = SimulationEngine::new(self.base.clone())?;
        Ok(engine.simulate(&mut self.rng()))
    }

    /// Run one independent simulation per value along `axis`
    pub fn sweep(&self, axis: SweepAxis, values: &[f64]) -> Result<SensitivityReport, ConfigError> {
        if values.is_empty() {
            return Err(ConfigError::EmptySweep);
        }
        let current_value = axis.current_value(&self.base)?;
        if axis == SweepAxis::FirstPaymentUplift {
            // Fail before any run if the uplifted terms are impossible
            self.base.portfolio.with_extra_first_payment()?;
        }

        log::info!("Sweeping {} over {} values", axis.name(), values.len());

        let points = values
            .par_iter()
            .map(|&value| -> Result<SweepPoint, ConfigError> {
                let metrics = self.run_point(axis, value)?;
                if metrics.breakeven_month.is_none() {
                    log::warn!("{} = {}: no breakeven within the horizon", axis.name(), value);
                }
                Ok(SweepPoint { value, metrics })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SensitivityReport {
            axis,
            current_value,
            points,
        })
    }

    fn run_point(&self, axis: SweepAxis, value: f64) -> Result<RunMetrics, ConfigError> {
        if axis == SweepAxis::FirstPaymentUplift {
            return self.run_uplift(value);
        }
        let engine = SimulationEngine::new(axis.apply(&self.base, value)?)?;
        Ok(engine.simulate(&mut self.rng()).metrics())
    }

    /// Split each month's orders into a base cohort and a cohort collecting one
    /// extra installment up front, then sum the two net series.
    fn run_uplift(&self, share: f64) -> Result<RunMetrics, ConfigError> {
        if !(0.0..=1.0).contains(&share) {
            return Err(ConfigError::invalid(
                SweepAxis::FirstPaymentUplift.name(),
                format!("share must be in [0, 1], got {share}"),
            ));
        }
        let (base_range, uplift_range) = self.base.monthly_order_range.split(share);

        let mut base = self.base.clone();
        base.monthly_order_range = base_range;
        let mut uplift = self.base.clone();
        uplift.monthly_order_range = uplift_range;
        uplift.portfolio = self.base.portfolio.with_extra_first_payment()?;

        let mut rng = self.rng();
        let base_run = SimulationEngine::new(base)?.simulate(&mut rng);
        let uplift_run = SimulationEngine::new(uplift)?.simulate(&mut rng);

        let net = combine_series(&base_run.net_cashflow(), &uplift_run.net_cashflow());
        let base_metrics = base_run.metrics();
        let uplift_metrics = uplift_run.metrics();
        Ok(RunMetrics::from_net_cashflow(
            &net,
            base_metrics.total_investment + uplift_metrics.total_investment,
            base_metrics.total_orders + uplift_metrics.total_orders,
        ))
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// `count` evenly spaced values from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{DefaultRisk, OrderRange, ProductTerms};
    use approx::assert_relative_eq;

    fn mixed_params() -> SimulationParams {
        SimulationParams {
            months: 12,
            device_cost: 5000.0,
            service_fee_rate: 0.02,
            bad_debt_rate: 0.05,
            monthly_order_range: OrderRange::fixed(300),
            default_risk: Some(DefaultRisk::Expected),
            portfolio: Portfolio::Mixed {
                product1: ProductTerms::new(0.23, 9, 2),
                product2: ProductTerms::new(0.3, 12, 3),
                product1_ratio: 0.33,
                prepayment_rate: 0.0,
                investment_ratio: 1.0,
            },
        }
    }

    fn runner() -> ScenarioRunner {
        ScenarioRunner::new(mixed_params()).unwrap().with_seed(2024)
    }

    #[test]
    fn test_linspace() {
        let grid = linspace(0.0, 0.08, 9);
        assert_eq!(grid.len(), 9);
        assert_relative_eq!(grid[4], 0.04, epsilon = 1e-12);
        assert_relative_eq!(grid[8], 0.08, epsilon = 1e-12);
        assert_eq!(linspace(0.3, 1.0, 1), vec![0.3]);
    }

    #[test]
    fn test_bad_debt_sweep_is_monotonic() {
        let report = runner()
            .sweep(SweepAxis::BadDebtRate, &SweepAxis::BadDebtRate.default_grid())
            .unwrap();
        assert_eq!(report.points.len(), 9);
        assert_eq!(report.current_value, 0.05);

        let (_, profits) = report.series(SweepMetric::NetProfit);
        assert!(profits.windows(2).all(|w| w[1] <= w[0] + 1e-6));
        assert!(report.average_slope(SweepMetric::NetProfit).unwrap() < 0.0);

        let at_current = report.at_current(SweepMetric::NetProfit).unwrap();
        assert!(at_current <= profits[0] && at_current >= profits[8]);
    }

    #[test]
    fn test_prepayment_sweep_reduces_profit() {
        let report = runner()
            .sweep(SweepAxis::PrepaymentRate, &SweepAxis::PrepaymentRate.default_grid())
            .unwrap();
        let (_, profits) = report.series(SweepMetric::NetProfit);
        assert!(profits.windows(2).all(|w| w[1] <= w[0] + 1e-6));
    }

    #[test]
    fn test_points_keep_supplied_order() {
        let values = [0.08, 0.0, 0.04];
        let report = runner().sweep(SweepAxis::BadDebtRate, &values).unwrap();
        let supplied: Vec<f64> = report.points.iter().map(|p| p.value).collect();
        assert_eq!(supplied, values);

        let (xs, _) = report.series(SweepMetric::NetProfit);
        assert_eq!(xs, vec![0.0, 0.04, 0.08]);
    }

    #[test]
    fn test_seeded_sweep_is_reproducible() {
        let values = [0.0, 0.5, 1.0];
        let a = runner().sweep(SweepAxis::Product1Ratio, &values).unwrap();
        let b = runner().sweep(SweepAxis::Product1Ratio, &values).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_mixed_axes_rejected_for_single_product() {
        let params = SimulationParams::single(
            12,
            5000.0,
            ProductTerms::new(0.3, 9, 2),
            OrderRange::fixed(10),
        );
        let runner = ScenarioRunner::new(params).unwrap();
        let err = runner.sweep(SweepAxis::PrepaymentRate, &[0.0, 0.1]).unwrap_err();
        assert!(matches!(err, ConfigError::AxisNotApplicable { .. }));
        assert!(runner.sweep(SweepAxis::BadDebtRate, &[0.0, 0.1]).is_ok());
    }

    #[test]
    fn test_out_of_domain_value_rejected() {
        let err = runner().sweep(SweepAxis::BadDebtRate, &[0.0, 1.5]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { .. }));
        assert_eq!(runner().sweep(SweepAxis::BadDebtRate, &[]), Err(ConfigError::EmptySweep));
    }

    #[test]
    fn test_uplift_sweep_brings_cash_forward() {
        let mut params = mixed_params();
        params.bad_debt_rate = 0.0;
        let runner = ScenarioRunner::new(params).unwrap().with_seed(5);
        let report = runner
            .sweep(SweepAxis::FirstPaymentUplift, &SweepAxis::FirstPaymentUplift.default_grid())
            .unwrap();

        let none = &report.points[0].metrics;
        let all = &report.points[4].metrics;
        assert_eq!(none.total_orders, 12 * 300);
        assert_eq!(all.total_orders, 12 * 300);
        assert!(all.peak_exposure < none.peak_exposure);
        assert!(all.breakeven_month.unwrap() <= none.breakeven_month.unwrap());
        assert_eq!(report.current_value, 0.0);
    }

    #[test]
    fn test_uplift_matches_plain_run_at_zero_share() {
        let runner = runner();
        let report = runner.sweep(SweepAxis::FirstPaymentUplift, &[0.0]).unwrap();
        let plain = runner.run_base().unwrap().metrics();
        assert_relative_eq!(report.points[0].metrics.net_profit, plain.net_profit, epsilon = 1e-6);
        assert_eq!(report.points[0].metrics.breakeven_month, plain.breakeven_month);
    }

    #[test]
    fn test_uplift_rejected_when_terms_exhausted() {
        let params = SimulationParams::single(
            12,
            5000.0,
            ProductTerms::new(0.3, 3, 2),
            OrderRange::fixed(10),
        );
        let runner = ScenarioRunner::new(params).unwrap();
        let err = runner.sweep(SweepAxis::FirstPaymentUplift, &[0.5]).unwrap_err();
        assert!(matches!(err, ConfigError::UpliftExceedsTerm { .. }));
    }
}
