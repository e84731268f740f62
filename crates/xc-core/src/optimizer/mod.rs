// SPDX-License-Identifier: MIT

//! Turnpoint selection over a recorded track.
//!
//! An optimizer picks `n_tp` points out of the track (start and finish
//! included, so 3 means out-and-return and 4 a triangle) that maximize the
//! summed great-circle distance between consecutive picks.

pub mod montecarlo;

pub use montecarlo::MonteCarlo;

use crate::config::OptimizerConfig;
use crate::flight::Point;
use serde::Serialize;
use thiserror::Error;

/// Ids accepted by [`optimizer_by_id`].
pub const OPTIMIZERS: &[&str] = &[montecarlo::ID];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptimizeError {
    #[error("at least 2 turnpoints are required, got {0}")]
    TooFewTurnpoints(usize),
    #[error("track has {points} points, fewer than the {turnpoints} turnpoints requested")]
    TrackTooShort { points: usize, turnpoints: usize },
    #[error("unknown optimizer '{0}'")]
    UnknownOptimizer(String),
    #[error("invalid optimizer config: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OptResult {
    /// Chosen points, copied from the track, in track order.
    pub turnpoints: Vec<Point>,
    /// Sum of great-circle legs between the turnpoints, in meters.
    pub distance: f64,
    /// Contest score. Not computed by any optimizer yet.
    pub score: f64,
    /// Scorer that produced `score`, if any.
    pub scorer_id: Option<String>,
}

pub trait Optimizer: Send + Sync {
    fn id(&self) -> &'static str;

    fn optimize(&self, track: &[Point], n_tp: usize) -> Result<OptResult, OptimizeError>;
}

/// Builds the optimizer registered under `id`.
pub fn optimizer_by_id(
    id: &str,
    config: OptimizerConfig,
) -> Result<Box<dyn Optimizer>, OptimizeError> {
    match id {
        montecarlo::ID => Ok(Box::new(MonteCarlo::new(config))),
        other => Err(OptimizeError::UnknownOptimizer(other.to_string())),
    }
}

/// Summed leg distance of the track points at `indices`, in meters.
pub fn route_distance(track: &[Point], indices: &[usize]) -> f64 {
    indices
        .windows(2)
        .map(|leg| track[leg[0]].distance_to(&track[leg[1]]))
        .sum()
}

fn check_request(track: &[Point], n_tp: usize) -> Result<(), OptimizeError> {
    if n_tp < 2 {
        return Err(OptimizeError::TooFewTurnpoints(n_tp));
    }
    if track.len() < n_tp {
        return Err(OptimizeError::TrackTooShort {
            points: track.len(),
            turnpoints: n_tp,
        });
    }
    Ok(())
}
