//! Headless simulation - shot sweeps and windowless gameplay apps
//!
//! `shot` and `sweep` drive the pure ball core directly for analysis tools;
//! `app_builder` runs the full system chain for scenario and integration tests.

pub mod app_builder;
pub mod config;
pub mod runner;
pub mod shot;
pub mod sweep;

pub use app_builder::{HeadlessAppBuilder, step_fixed};
pub use config::{SimConfig, SimMode};
pub use runner::run_simulation;
pub use shot::{ShotResult, court_spot, simulate_shot};
pub use sweep::{
    DistanceSummary, MakeRateGrid, OutcomeCounts, SweepPlan, SweepSample, make_rate_grid,
    pitch_range, run_sweep, sample_random_shots, summarize_by_distance,
};
