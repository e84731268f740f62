// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CYCLES: usize = 10;
pub const DEFAULT_MC_CYCLES: usize = 100_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid optimizer config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Tuning knobs for the randomized optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Number of independent search workers.
    pub cycles: usize,
    /// Perturbations tried by each worker.
    pub mc_cycles: usize,
    /// Base seed; worker `i` uses `seed + i`. Drawn at random when unset.
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            cycles: DEFAULT_CYCLES,
            mc_cycles: DEFAULT_MC_CYCLES,
            seed: None,
        }
    }
}

impl OptimizerConfig {
    /// Loads a JSON config file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: OptimizerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycles == 0 {
            return Err(ConfigError::Zero("cycles"));
        }
        if self.mc_cycles == 0 {
            return Err(ConfigError::Zero("mc_cycles"));
        }
        Ok(())
    }
}
