// SPDX-License-Identifier: MIT

use super::{check_request, route_distance, OptResult, OptimizeError, Optimizer};
use crate::config::OptimizerConfig;
use crate::flight::Point;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

pub const ID: &str = "montecarlo";

/// Randomized hill climbing with restarts.
///
/// `cycles` workers run in parallel, each from the same evenly spread
/// candidate with its own seeded RNG. A worker repeatedly moves one interior
/// turnpoint to a random track index between its neighbours and keeps the
/// move only if the total distance grows. The longest worker result wins.
#[derive(Debug, Clone, Default)]
pub struct MonteCarlo {
    config: OptimizerConfig,
}

#[derive(Debug, Clone, PartialEq)]
struct WorkerResult {
    distance: f64,
    indices: Vec<usize>,
}

impl MonteCarlo {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }
}

impl Optimizer for MonteCarlo {
    fn id(&self) -> &'static str {
        ID
    }

    fn optimize(&self, track: &[Point], n_tp: usize) -> Result<OptResult, OptimizeError> {
        check_request(track, n_tp)?;
        self.config
            .validate()
            .map_err(|e| OptimizeError::InvalidConfig(e.to_string()))?;

        let workers = self.config.cycles;
        let iterations = self.config.mc_cycles;
        let base_seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen());

        // Worker 0 runs here and seeds the fold; the rest run on rayon.
        let first = search(track, n_tp, iterations, base_seed);
        log_worker(0, &first);
        let rest: Vec<WorkerResult> = (1..workers)
            .into_par_iter()
            .map(|worker| search(track, n_tp, iterations, base_seed.wrapping_add(worker as u64)))
            .collect();

        // Strictly greater wins, so ties keep the lowest worker.
        let best = rest
            .into_iter()
            .zip(1..)
            .fold(first, |best, (result, worker)| {
                log_worker(worker, &result);
                if result.distance > best.distance {
                    result
                } else {
                    best
                }
            });

        info!(
            "Optimized track — points={} turnpoints={} workers={} iterations={} distance_m={:.1}",
            track.len(),
            n_tp,
            workers,
            iterations,
            best.distance
        );

        Ok(OptResult {
            turnpoints: best.indices.iter().map(|&i| track[i].clone()).collect(),
            distance: best.distance,
            ..Default::default()
        })
    }
}

fn log_worker(worker: usize, result: &WorkerResult) {
    debug!(
        "Worker finished — worker={} distance_m={:.1} indices={:?}",
        worker, result.distance, result.indices
    );
}

/// Evenly spread starting indices, clamped to the last track point.
fn initial_candidate(len: usize, n_tp: usize) -> Vec<usize> {
    let step = len / (n_tp - 1);
    (0..n_tp).map(|i| (step * i).min(len - 1)).collect()
}

/// One worker's local search. The first and last indices never move.
fn search(track: &[Point], n_tp: usize, iterations: usize, seed: u64) -> WorkerResult {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut candidate = initial_candidate(track.len(), n_tp);
    let mut distance = route_distance(track, &candidate);

    // With two turnpoints there is no interior index to move.
    if n_tp > 2 {
        for _ in 0..iterations {
            let index = rng.gen_range(1..n_tp - 1);
            let lower = candidate[index - 1];
            let upper = candidate[index + 1];
            let previous = candidate[index];

            candidate[index] = rng.gen_range(lower..=upper);
            let moved = route_distance(track, &candidate);
            if moved > distance {
                distance = moved;
            } else {
                candidate[index] = previous;
            }
        }
    }

    WorkerResult {
        distance,
        indices: candidate,
    }
}
