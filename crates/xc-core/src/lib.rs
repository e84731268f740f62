// SPDX-License-Identifier: MIT

//! Core of the cross-country tooling: IGC flight log parsing and turnpoint
//! optimization over the recovered track.

pub mod config;
pub mod flight;
pub mod geo;
pub mod igc;
pub mod manufacturer;
pub mod optimizer;

pub use config::OptimizerConfig;
pub use flight::{FixValidity, Flight, Header, LogEntry, Point, Task};
pub use igc::IgcParser;
pub use optimizer::{optimizer_by_id, OptResult, Optimizer};
