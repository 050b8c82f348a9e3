//! Lease order contract and its installment schedule

use serde::{Deserialize, Serialize};

use crate::params::ProductTerms;

/// One originated lease contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseOrder {
    /// Origination month (1-indexed)
    pub start_month: u32,
    pub device_cost: f64,
    /// Effective lease rate after any prepayment adjustment
    pub lease_rate: f64,
    pub repayment_periods: u32,
    pub first_payment_terms: u32,
    pub defaulted: bool,
}

impl LeaseOrder {
    /// Build an order from product terms, overriding the lease rate
    pub fn new(
        start_month: u32,
        device_cost: f64,
        terms: &ProductTerms,
        lease_rate: f64,
        defaulted: bool,
    ) -> Self {
        Self {
            start_month,
            device_cost,
            lease_rate,
            repayment_periods: terms.repayment_periods,
            first_payment_terms: terms.first_payment_terms,
            defaulted,
        }
    }

    /// Contractual repayment over the life of the lease
    pub fn total_repayment(&self) -> f64 {
        self.device_cost * (1.0 + self.lease_rate)
    }

    pub fn monthly_payment(&self) -> f64 {
        if self.repayment_periods == 0 {
            return 0.0;
        }
        self.total_repayment() / self.repayment_periods as f64
    }

    /// Number of months in which this order collects (origination month included)
    pub fn schedule_len(&self) -> usize {
        self.repayment_periods.saturating_sub(self.first_payment_terms) as usize + 1
    }

    /// Collections relative to the origination month.
    ///
    /// Month 0 collects `first_payment_terms` installments at once; every later
    /// month collects one. A defaulted order collects nothing.
    pub fn schedule(&self) -> Vec<f64> {
        let len = self.schedule_len();
        if self.defaulted {
            return vec![0.0; len];
        }
        let payment = self.monthly_payment();
        let mut schedule = vec![payment; len];
        schedule[0] = payment * self.first_payment_terms as f64;
        schedule
    }

    /// Collections on the project timeline, left-padded for the months before origination
    pub fn monthly_cashflow(&self) -> Vec<f64> {
        let offset = self.start_month.saturating_sub(1) as usize;
        let mut cashflows = vec![0.0; offset];
        cashflows.extend(self.schedule());
        cashflows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn order(start_month: u32, first_payment_terms: u32, defaulted: bool) -> LeaseOrder {
        let terms = ProductTerms::new(0.3, 9, first_payment_terms);
        LeaseOrder::new(start_month, 5000.0, &terms, 0.3, defaulted)
    }

    #[test]
    fn test_concrete_schedule() {
        let o = order(1, 2, false);
        let schedule = o.schedule();

        assert_eq!(schedule.len(), 8);
        assert_relative_eq!(o.monthly_payment(), 5000.0 * 1.3 / 9.0, epsilon = 1e-9);
        assert_relative_eq!(schedule[0], 1444.444_444_444, epsilon = 1e-6);
        for &payment in &schedule[1..] {
            assert_relative_eq!(payment, 722.222_222_222, epsilon = 1e-6);
        }
        assert_relative_eq!(schedule.iter().sum::<f64>(), 6500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_schedule_total_independent_of_first_payment_terms() {
        for terms in 0..9 {
            let o = order(1, terms, false);
            let total: f64 = o.schedule().iter().sum();
            assert_relative_eq!(total, o.total_repayment(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zero_first_payment_terms() {
        let o = order(1, 0, false);
        let schedule = o.schedule();
        assert_eq!(schedule.len(), 10);
        assert_eq!(schedule[0], 0.0);
        assert_relative_eq!(schedule[1], o.monthly_payment());
    }

    #[test]
    fn test_defaulted_order_collects_nothing() {
        let good = order(3, 2, false);
        let bad = order(3, 2, true);

        assert_eq!(bad.monthly_cashflow().len(), good.monthly_cashflow().len());
        assert_eq!(bad.monthly_cashflow().iter().sum::<f64>(), 0.0);
    }

    #[test]
    fn test_alignment_to_project_timeline() {
        let o = order(4, 2, false);
        let cashflows = o.monthly_cashflow();

        assert_eq!(cashflows.len(), 3 + 8);
        assert!(cashflows[..3].iter().all(|&cf| cf == 0.0));
        // First collection lands in month 4 (1-indexed)
        let first = cashflows.iter().position(|&cf| cf > 0.0).unwrap();
        assert_eq!(first + 1, 4);
    }
}
