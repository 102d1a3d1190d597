//! Shot Simulation Tool - headless ball physics sweeps
//!
//! Usage:
//!   cargo run --bin simulate -- --help
//!   cargo run --bin simulate -- --side left --distance 4:30:2
//!   cargo run --bin simulate -- --sample 5000 --seed 7
//!   cargo run --bin simulate -- --single 30,0,0.9

use hoopshot::simulation::{SimConfig, run_simulation};

fn main() {
    let config = SimConfig::from_args();
    std::process::exit(run_simulation(config));
}
