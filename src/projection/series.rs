//! Helpers over period-aligned cash-flow series

/// Running sum of a series
pub fn cumulative(series: &[f64]) -> Vec<f64> {
    series
        .iter()
        .scan(0.0, |total, &value| {
            *total += value;
            Some(*total)
        })
        .collect()
}

/// Element-wise sum of two series, zero-padding the shorter one
pub fn combine_series(a: &[f64], b: &[f64]) -> Vec<f64> {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| a.get(i).copied().unwrap_or(0.0) + b.get(i).copied().unwrap_or(0.0))
        .collect()
}

/// Right-pad `series` with its last value (or zero if empty) up to `len`
pub fn pad_with_last(mut series: Vec<f64>, len: usize) -> Vec<f64> {
    let fill = series.last().copied().unwrap_or(0.0);
    if series.len() < len {
        series.resize(len, fill);
    }
    series
}

/// First month (1-indexed) at which cumulative net cash flow is non-negative.
///
/// Months before any cash has moved do not count, so an all-zero series has
/// no breakeven.
pub fn breakeven_month(net_cashflow: &[f64]) -> Option<u32> {
    let mut total = 0.0;
    let mut active = false;
    for (i, &net) in net_cashflow.iter().enumerate() {
        total += net;
        active |= net != 0.0;
        if active && total >= 0.0 {
            return Some(i as u32 + 1);
        }
    }
    None
}

/// Largest unrecovered capital: the depth of the cumulative series below zero
pub fn peak_exposure(cumulative_cashflow: &[f64]) -> f64 {
    let min = cumulative_cashflow.iter().copied().fold(0.0_f64, f64::min);
    if min < 0.0 {
        -min
    } else {
        0.0
    }
}

/// Piecewise-linear interpolation at `x`, clamped to the end points.
///
/// `xs` must be sorted ascending and the same length as `ys`.
pub fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> Option<f64> {
    if xs.is_empty() || xs.len() != ys.len() {
        return None;
    }
    let last = xs.len() - 1;
    if x <= xs[0] {
        return Some(ys[0]);
    }
    if x >= xs[last] {
        return Some(ys[last]);
    }
    let upper = xs.iter().position(|&xi| xi >= x)?;
    let lower = upper - 1;
    let span = xs[upper] - xs[lower];
    if span == 0.0 {
        return Some(ys[upper]);
    }
    let weight = (x - xs[lower]) / span;
    Some(ys[lower] + weight * (ys[upper] - ys[lower]))
}

/// Average change in `ys` per unit of `xs` between the first and last points
pub fn average_slope(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() < 2 || xs.len() != ys.len() {
        return None;
    }
    let dx = xs[xs.len() - 1] - xs[0];
    if dx == 0.0 {
        return None;
    }
    Some((ys[ys.len() - 1] - ys[0]) / dx)
}
