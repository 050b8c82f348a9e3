//! Accumulators mutated during a single simulation run

use crate::order::LeaseOrder;

/// Aggregate state built up month by month while orders are originated
#[derive(Debug, Clone)]
pub struct RunState {
    /// Orders originated per month (length = months)
    pub monthly_order_count: Vec<u32>,

    /// Investment outflow per month (length = months)
    pub monthly_investment: Vec<f64>,

    /// Collections per month over the full horizon
    pub total_cashflow: Vec<f64>,

    /// Every originated order, in origination order
    pub orders: Vec<LeaseOrder>,
}

impl RunState {
    /// Empty state for `months` origination months over a `horizon`-month timeline
    pub fn new(months: u32, horizon: usize) -> Self {
        Self {
            monthly_order_count: Vec::with_capacity(months as usize),
            monthly_investment: Vec::with_capacity(months as usize),
            total_cashflow: vec![0.0; horizon],
            orders: Vec::new(),
        }
    }

    /// Add an order's collections, scaled by `scale`, starting at its origination month
    pub fn record_order(&mut self, order: LeaseOrder, scale: f64) {
        let offset = order.start_month.saturating_sub(1) as usize;
        for (i, payment) in order.schedule().into_iter().enumerate() {
            // Horizon is sized for the longest repayment tail
            if let Some(slot) = self.total_cashflow.get_mut(offset + i) {
                *slot += payment * scale;
            }
        }
        self.orders.push(order);
    }

    /// Close out an origination month
    pub fn record_month(&mut self, order_count: u32, investment: f64) {
        self.monthly_order_count.push(order_count);
        self.monthly_investment.push(investment);
    }
}
