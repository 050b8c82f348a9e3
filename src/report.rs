//! CSV export of the monthly table and sweep results

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::ModelError;
use crate::projection::CashflowRow;
use crate::scenario::SensitivityReport;

/// Flattened sweep point for tabular output
#[derive(Debug, Serialize)]
struct SweepRow {
    axis: &'static str,
    value: f64,
    net_profit: f64,
    peak_exposure: f64,
    breakeven_month: Option<u32>,
    return_on_investment: Option<f64>,
}

/// Write the monthly table as CSV to any writer
pub fn write_rows<W: Write>(writer: W, rows: &[CashflowRow]) -> Result<(), ModelError> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_rows_csv(path: &Path, rows: &[CashflowRow]) -> Result<(), ModelError> {
    write_rows(File::create(path)?, rows)?;
    log::info!("Wrote {} monthly rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write one line per sweep point as CSV to any writer
pub fn write_sweep<W: Write>(writer: W, report: &SensitivityReport) -> Result<(), ModelError> {
    let mut csv = csv::Writer::from_writer(writer);
    for point in &report.points {
        csv.serialize(SweepRow {
            axis: report.axis.name(),
            value: point.value,
            net_profit: point.metrics.net_profit,
            peak_exposure: point.metrics.peak_exposure,
            breakeven_month: point.metrics.breakeven_month,
            return_on_investment: point.metrics.return_on_investment,
        })?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_sweep_csv(path: &Path, report: &SensitivityReport) -> Result<(), ModelError> {
    write_sweep(File::create(path)?, report)?;
    log::info!("Wrote {} sweep points to {}", report.points.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::RunMetrics;
    use crate::scenario::{SweepAxis, SweepPoint};

    #[test]
    fn test_rows_csv_layout() {
        let rows = vec![
            CashflowRow {
                month: 1,
                orders: 2,
                investment: 10000.0,
                cumulative_investment: 10000.0,
                repayment: 2888.5,
                net_cashflow: -7111.5,
                cumulative_cashflow: -7111.5,
            },
            CashflowRow {
                month: 2,
                orders: 0,
                investment: 0.0,
                cumulative_investment: 10000.0,
                repayment: 1444.25,
                net_cashflow: 1444.25,
                cumulative_cashflow: -5667.25,
            },
        ];

        let mut buffer = Vec::new();
        write_rows(&mut buffer, &rows).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "month,orders,investment,cumulative_investment,repayment,net_cashflow,cumulative_cashflow"
        );
        assert_eq!(lines[1], "1,2,10000.0,10000.0,2888.5,-7111.5,-7111.5");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_sweep_csv_leaves_missing_breakeven_empty() {
        let metrics = RunMetrics::from_net_cashflow(&[-100.0, 40.0], 100.0, 1);
        let report = SensitivityReport {
            axis: SweepAxis::BadDebtRate,
            current_value: 0.0,
            points: vec![SweepPoint { value: 0.02, metrics }],
        };

        let mut buffer = Vec::new();
        write_sweep(&mut buffer, &report).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "axis,value,net_profit,peak_exposure,breakeven_month,return_on_investment"
        );
        assert_eq!(lines[1], "bad_debt_rate,0.02,-60.0,100.0,,-0.6");
    }
}
