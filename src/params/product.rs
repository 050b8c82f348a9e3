//! Product terms and portfolio mix

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Longest contract accepted, in installment periods
pub const MAX_REPAYMENT_PERIODS: u32 = 1200;

/// Contract terms for one lease product
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductTerms {
    /// Markup over device cost defining total repayment
    pub lease_rate: f64,
    /// Total contractual installment periods
    pub repayment_periods: u32,
    /// Installments bundled into the origination month's payment
    pub first_payment_terms: u32,
}

impl ProductTerms {
    pub fn new(lease_rate: f64, repayment_periods: u32, first_payment_terms: u32) -> Self {
        Self {
            lease_rate,
            repayment_periods,
            first_payment_terms,
        }
    }

    /// Months of collections after the origination month
    pub fn repayment_tail(&self) -> u32 {
        self.repayment_periods.saturating_sub(self.first_payment_terms)
    }

    /// Same product with one more installment collected up front
    pub fn with_extra_first_payment(&self, field: &str) -> Result<Self, ConfigError> {
        let first_payment_terms = self.first_payment_terms + 1;
        if first_payment_terms >= self.repayment_periods {
            return Err(ConfigError::UpliftExceedsTerm {
                field: field.to_string(),
                repayment_periods: self.repayment_periods,
            });
        }
        Ok(Self {
            first_payment_terms,
            ..*self
        })
    }

    /// Check the terms, naming offending fields with `prefix` (e.g. "product1.")
    pub fn validate(&self, prefix: &str) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.lease_rate) {
            return Err(ConfigError::invalid(
                &format!("{prefix}lease_rate"),
                format!("must be in [0, 1), got {}", self.lease_rate),
            ));
        }
        if !(1..=MAX_REPAYMENT_PERIODS).contains(&self.repayment_periods) {
            return Err(ConfigError::invalid(
                &format!("{prefix}repayment_periods"),
                format!(
                    "must be in 1..={MAX_REPAYMENT_PERIODS}, got {}",
                    self.repayment_periods
                ),
            ));
        }
        if self.first_payment_terms >= self.repayment_periods {
            return Err(ConfigError::invalid(
                &format!("{prefix}first_payment_terms"),
                format!(
                    "must be less than repayment_periods ({}), got {}",
                    self.repayment_periods, self.first_payment_terms
                ),
            ));
        }
        Ok(())
    }
}

/// Which products the simulated merchant sells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Portfolio {
    /// Every order uses the same terms
    Single { product: ProductTerms },
    /// Each order picks product 1 with probability `product1_ratio`
    Mixed {
        product1: ProductTerms,
        product2: ProductTerms,
        product1_ratio: f64,
        /// Share of the book settling early at half the contracted rate
        prepayment_rate: f64,
        /// Fraction of each order funded (and collected) by this investor
        investment_ratio: f64,
    },
}

impl Portfolio {
    /// Longest repayment tail over the active products
    pub fn max_repayment_tail(&self) -> u32 {
        match self {
            Portfolio::Single { product } => product.repayment_tail(),
            Portfolio::Mixed {
                product1, product2, ..
            } => product1.repayment_tail().max(product2.repayment_tail()),
        }
    }

    /// Scale applied to both investment and collections
    pub fn investment_ratio(&self) -> f64 {
        match self {
            Portfolio::Single { .. } => 1.0,
            Portfolio::Mixed {
                investment_ratio, ..
            } => *investment_ratio,
        }
    }

    /// Same portfolio with one extra first-payment term on every product
    pub fn with_extra_first_payment(&self) -> Result<Self, ConfigError> {
        Ok(match self {
            Portfolio::Single { product } => Portfolio::Single {
                product: product.with_extra_first_payment("first_payment_terms")?,
            },
            Portfolio::Mixed {
                product1,
                product2,
                product1_ratio,
                prepayment_rate,
                investment_ratio,
            } => Portfolio::Mixed {
                product1: product1.with_extra_first_payment("product1.first_payment_terms")?,
                product2: product2.with_extra_first_payment("product2.first_payment_terms")?,
                product1_ratio: *product1_ratio,
                prepayment_rate: *prepayment_rate,
                investment_ratio: *investment_ratio,
            },
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Portfolio::Single { product } => product.validate(""),
            Portfolio::Mixed {
                product1,
                product2,
                product1_ratio,
                prepayment_rate,
                investment_ratio,
            } => {
                product1.validate("product1.")?;
                product2.validate("product2.")?;
                check_unit_interval("product1_ratio", *product1_ratio)?;
                check_unit_interval("prepayment_rate", *prepayment_rate)?;
                if !(*investment_ratio > 0.0 && *investment_ratio <= 1.0) {
                    return Err(ConfigError::invalid(
                        "investment_ratio",
                        format!("must be in (0, 1], got {investment_ratio}"),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Reject values outside the closed interval [0, 1] (NaN included)
pub(crate) fn check_unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be in [0, 1], got {value}"),
        ))
    }
}
