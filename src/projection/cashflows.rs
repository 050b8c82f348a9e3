//! Simulation output: per-month series, the reporting table, and run metrics

use serde::{Deserialize, Serialize};

use super::irr::annualized_irr;
use super::series::{breakeven_month, cumulative, pad_with_last, peak_exposure};
use super::state::RunState;
use crate::order::LeaseOrder;

/// One row of the per-month reporting table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowRow {
    /// Month on the project timeline (1-indexed)
    pub month: u32,
    pub orders: u32,
    pub investment: f64,
    pub cumulative_investment: f64,
    pub repayment: f64,
    pub net_cashflow: f64,
    pub cumulative_cashflow: f64,
}

/// Completed run; every derived series is recomputed on each call
#[derive(Debug, Clone)]
pub struct SimulationResult {
    state: RunState,
}

impl SimulationResult {
    pub(crate) fn from_state(state: RunState) -> Self {
        Self { state }
    }

    pub fn monthly_order_count(&self) -> &[u32] {
        &self.state.monthly_order_count
    }

    pub fn monthly_investment(&self) -> &[f64] {
        &self.state.monthly_investment
    }

    /// Collections per month over the full horizon
    pub fn total_cashflow(&self) -> &[f64] {
        &self.state.total_cashflow
    }

    pub fn orders(&self) -> &[LeaseOrder] {
        &self.state.orders
    }

    /// Number of months on the timeline (origination months plus repayment tail)
    pub fn horizon(&self) -> usize {
        self.state.total_cashflow.len()
    }

    /// Collections minus investment; investment is zero after the origination months
    pub fn net_cashflow(&self) -> Vec<f64> {
        self.state
            .total_cashflow
            .iter()
            .enumerate()
            .map(|(i, &inflow)| {
                let investment = self.state.monthly_investment.get(i).copied().unwrap_or(0.0);
                inflow - investment
            })
            .collect()
    }

    pub fn cumulative_cashflow(&self) -> Vec<f64> {
        cumulative(&self.net_cashflow())
    }

    /// Running investment, held at its final value over the repayment tail
    pub fn cumulative_investment(&self) -> Vec<f64> {
        pad_with_last(cumulative(&self.state.monthly_investment), self.horizon())
    }

    /// First month with non-negative cumulative cash flow
    pub fn breakeven_month(&self) -> Option<u32> {
        breakeven_month(&self.net_cashflow())
    }

    /// Peak exposure: the largest unrecovered capital at any month
    pub fn actual_investment(&self) -> f64 {
        peak_exposure(&self.cumulative_cashflow())
    }

    /// Per-month table with order count and investment zero-padded over the tail
    pub fn rows(&self) -> Vec<CashflowRow> {
        let net = self.net_cashflow();
        let cumulative_cf = cumulative(&net);
        let cumulative_inv = self.cumulative_investment();

        (0..self.horizon())
            .map(|i| CashflowRow {
                month: i as u32 + 1,
                orders: self.state.monthly_order_count.get(i).copied().unwrap_or(0),
                investment: self.state.monthly_investment.get(i).copied().unwrap_or(0.0),
                cumulative_investment: cumulative_inv[i],
                repayment: self.state.total_cashflow[i],
                net_cashflow: net[i],
                cumulative_cashflow: cumulative_cf[i],
            })
            .collect()
    }

    pub fn metrics(&self) -> RunMetrics {
        let total_orders = self.state.monthly_order_count.iter().map(|&n| n as u64).sum();
        let total_investment = self.state.monthly_investment.iter().sum();
        RunMetrics::from_net_cashflow(&self.net_cashflow(), total_investment, total_orders)
    }
}

/// Scalar summary of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub total_orders: u64,
    /// Total capital deployed over the origination months
    pub total_investment: f64,
    pub peak_exposure: f64,
    /// Final cumulative net cash flow
    pub net_profit: f64,
    /// Net profit over total investment
    pub return_on_investment: Option<f64>,
    /// Net profit over peak exposure
    pub return_on_peak_exposure: Option<f64>,
    pub breakeven_month: Option<u32>,
    pub annualized_irr: Option<f64>,
}

impl RunMetrics {
    /// Derive every metric from a net cash-flow series
    pub fn from_net_cashflow(net_cashflow: &[f64], total_investment: f64, total_orders: u64) -> Self {
        let cumulative_cf = cumulative(net_cashflow);
        let net_profit = cumulative_cf.last().copied().unwrap_or(0.0);
        let peak = peak_exposure(&cumulative_cf);

        Self {
            total_orders,
            total_investment,
            peak_exposure: peak,
            net_profit,
            return_on_investment: ratio(net_profit, total_investment),
            return_on_peak_exposure: ratio(net_profit, peak),
            breakeven_month: breakeven_month(net_cashflow),
            annualized_irr: annualized_irr(net_cashflow),
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator.abs() < 1e-12 {
        None
    } else {
        Some(numerator / denominator)
    }
}
