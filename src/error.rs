//! Error types for configuration and model I/O

use thiserror::Error;

/// A parameter set that cannot be simulated
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("sweep axis `{axis}` requires a mixed-product portfolio")]
    AxisNotApplicable { axis: String },

    #[error("cannot add a first-payment term: {field} would reach repayment_periods ({repayment_periods})")]
    UpliftExceedsTerm { field: String, repayment_periods: u32 },

    #[error("sweep has no candidate values")]
    EmptySweep,
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Any failure surfaced by the library: bad configuration or I/O at the edges
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
