//! Internal rate of return of a monthly net cash-flow series
//!
//! Newton-Raphson on the monthly rate, falling back to bisection when the
//! derivative vanishes or the iteration fails to settle.

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 1000;
const MIN_RATE: f64 = -0.99;
const MAX_RATE: f64 = 10.0;

/// Monthly IRR, or None if the series has no sign change or no root is bracketed
pub fn monthly_irr(net_cashflow: &[f64]) -> Option<f64> {
    let has_inflow = net_cashflow.iter().any(|&cf| cf > TOLERANCE);
    let has_outflow = net_cashflow.iter().any(|&cf| cf < -TOLERANCE);
    if !has_inflow || !has_outflow {
        return None;
    }

    let mut rate = 0.01;
    for _ in 0..MAX_ITERATIONS {
        let (npv, slope) = npv_with_slope(net_cashflow, rate);
        if slope.abs() < 1e-20 {
            return bisect(net_cashflow);
        }

        let next = (rate - npv / slope).clamp(MIN_RATE, MAX_RATE);
        if (next - rate).abs() < TOLERANCE {
            return Some(next);
        }
        rate = next;
    }

    bisect(net_cashflow)
}

/// Monthly IRR compounded over twelve months
pub fn annualized_irr(net_cashflow: &[f64]) -> Option<f64> {
    monthly_irr(net_cashflow).map(|r| (1.0 + r).powi(12) - 1.0)
}

fn npv(net_cashflow: &[f64], rate: f64) -> f64 {
    net_cashflow
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

fn npv_with_slope(net_cashflow: &[f64], rate: f64) -> (f64, f64) {
    net_cashflow
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(value, slope), (t, &cf)| {
            let growth = (1.0 + rate).powi(t as i32);
            (
                value + cf / growth,
                slope - t as f64 * cf / (growth * (1.0 + rate)),
            )
        })
}

fn bisect(net_cashflow: &[f64]) -> Option<f64> {
    let mut low = MIN_RATE;
    let mut high = MAX_RATE;
    let mut npv_low = npv(net_cashflow, low);
    if npv_low * npv(net_cashflow, high) > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv(net_cashflow, mid);
        if npv_mid.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Some(mid);
        }
        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}
