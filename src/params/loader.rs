//! JSON parameter loader
//!
//! Missing fields fall back to `SimulationParams::default()`; the result is
//! validated before it is returned.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::SimulationParams;
use crate::error::ModelError;

/// Load and validate parameters from a JSON file
pub fn load_params(path: &Path) -> Result<SimulationParams, ModelError> {
    let file = File::open(path)?;
    let params: SimulationParams = serde_json::from_reader(BufReader::new(file))?;
    params.validate()?;
    log::info!("Loaded simulation parameters from {}", path.display());
    Ok(params)
}

/// Parse and validate parameters from a JSON string
pub fn params_from_json(json: &str) -> Result<SimulationParams, ModelError> {
    let params: SimulationParams = serde_json::from_str(json)?;
    params.validate()?;
    Ok(params)
}
