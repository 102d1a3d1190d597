//! Simulation configuration

use serde::{Deserialize, Serialize};

use crate::court::HoopSide;

/// Simulation mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum SimMode {
    /// Sweep distance x pitch toward one hoop and report the best pitch per distance
    #[default]
    PitchTable,
    /// Random spots and pitches across the whole court
    Sample { count: usize },
    /// One throw with a tick-by-tick report
    Single { x: f32, z: f32, pitch: f32 },
}

/// Configuration for a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub mode: SimMode,
    /// Hoop targeted by the pitch table
    pub side: HoopSide,
    pub min_distance: f32,
    pub max_distance: f32,
    pub distance_step: f32,
    /// Offsets along z for the pitch table (empty = center line only)
    pub lateral: Vec<f32>,
    /// Pitch samples between flat and vertical
    pub pitch_steps: usize,
    /// Tick cap per throw
    pub max_ticks: u32,
    /// RNG seed for `Sample` mode (None = random)
    pub seed: Option<u64>,
    /// Layer config/gameplay_tuning.json over the default physics
    pub use_tuning_file: bool,
    /// Output JSON file path (None = table on stdout only)
    pub output_file: Option<String>,
    /// Suppress progress output
    pub quiet: bool,
    /// Rayon threads (0 = auto)
    pub parallel: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            mode: SimMode::PitchTable,
            side: HoopSide::Right,
            min_distance: 2.0,
            max_distance: 40.0,
            distance_step: 2.0,
            lateral: Vec::new(),
            pitch_steps: 91,
            max_ticks: 600,
            seed: None,
            use_tuning_file: true,
            output_file: None,
            quiet: false,
            parallel: 0,
        }
    }
}

/// Local simulation settings (gitignored, user's custom settings)
pub const SIM_SETTINGS_FILE: &str = "config/simulation_settings.json";

impl SimConfig {
    /// Load configuration from a JSON settings file
    pub fn from_file(path: &str) -> Result<Self, String> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", path, e))
    }

    /// Distances covered by the pitch table, ascending
    pub fn distances(&self) -> Vec<f32> {
        if !(self.distance_step > 0.0) || self.max_distance < self.min_distance {
            return vec![self.min_distance.max(0.0)];
        }
        let count = ((self.max_distance - self.min_distance) / self.distance_step).floor() as usize;
        (0..=count)
            .map(|i| self.min_distance + self.distance_step * i as f32)
            .collect()
    }

    /// Parse configuration from command line arguments
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::parse(&args[1..])
    }

    /// Settings file (local file, then `--settings`) with CLI overrides on top
    pub fn parse(args: &[String]) -> Self {
        let mut config = Self::from_file(SIM_SETTINGS_FILE).unwrap_or_default();

        if let Some(path) = args
            .iter()
            .position(|a| a == "--settings")
            .and_then(|i| args.get(i + 1))
        {
            match Self::from_file(path) {
                Ok(loaded) => config = loaded,
                Err(e) => eprintln!("Warning: {}", e),
            }
        }

        let mut i = 0;
        while i < args.len() {
            let value = args.get(i + 1);
            match args[i].as_str() {
                "--settings" => i += 1,
                "--side" => {
                    if let Some(v) = value {
                        config.side = if v.eq_ignore_ascii_case("left") {
                            HoopSide::Left
                        } else {
                            HoopSide::Right
                        };
                        i += 1;
                    }
                }
                "--distance" => {
                    // "min:max:step"
                    if let Some(v) = value {
                        let parts: Vec<f32> = v.split(':').filter_map(|s| s.trim().parse().ok()).collect();
                        if let [min, max, step] = parts[..] {
                            config.min_distance = min;
                            config.max_distance = max;
                            config.distance_step = step;
                        }
                        i += 1;
                    }
                }
                "--lateral" => {
                    if let Some(v) = value {
                        config.lateral = v.split(',').filter_map(|s| s.trim().parse().ok()).collect();
                        i += 1;
                    }
                }
                "--pitch-steps" => {
                    if let Some(v) = value {
                        config.pitch_steps = v.parse().unwrap_or(config.pitch_steps);
                        i += 1;
                    }
                }
                "--max-ticks" => {
                    if let Some(v) = value {
                        config.max_ticks = v.parse().unwrap_or(config.max_ticks);
                        i += 1;
                    }
                }
                "--sample" => {
                    let count = match value.filter(|v| !v.starts_with('-')) {
                        Some(v) => {
                            i += 1;
                            v.parse().unwrap_or(1000)
                        }
                        None => 1000,
                    };
                    config.mode = SimMode::Sample { count };
                }
                "--single" => {
                    // "x,z,pitch"
                    if let Some(v) = value {
                        let parts: Vec<f32> = v.split(',').filter_map(|s| s.trim().parse().ok()).collect();
                        if let [x, z, pitch] = parts[..] {
                            config.mode = SimMode::Single { x, z, pitch };
                        }
                        i += 1;
                    }
                }
                "--seed" => {
                    if let Some(v) = value {
                        config.seed = v.parse().ok();
                        i += 1;
                    }
                }
                "--no-tuning" => config.use_tuning_file = false,
                "--output" => {
                    if let Some(v) = value {
                        config.output_file = Some(v.clone());
                        i += 1;
                    }
                }
                "--quiet" | "-q" => config.quiet = true,
                "--parallel" => {
                    if let Some(v) = value {
                        config.parallel = v.parse().unwrap_or(0);
                        i += 1;
                    }
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {}
            }
            i += 1;
        }

        config
    }
}

fn print_help() {
    println!(
        r#"Shot Simulation Tool - headless ball physics sweeps

USAGE:
    cargo run --bin simulate -- [OPTIONS]

OPTIONS:
    --settings <FILE>       Load settings from JSON file (CLI args override file settings)
    --side <left|right>     Hoop for the pitch table (default: right)
    --distance <MIN:MAX:STEP>
                            Distances from the rim (default: 2:40:2)
    --lateral <LIST>        Comma-separated z offsets (default: 0)
    --pitch-steps <N>       Pitch samples from flat to vertical (default: 91)
    --max-ticks <N>         Tick cap per throw (default: 600)
    --sample [N]            Random court spots and pitches (default: 1000)
    --single <X,Z,PITCH>    Simulate one throw and print its trace
    --seed <N>              RNG seed for --sample
    --no-tuning             Ignore config/gameplay_tuning.json
    --output <FILE>         Also write results as JSON
    --quiet, -q             Suppress progress output
    --parallel <N>          Rayon worker threads (default: auto)
    --help, -h              Show this help

EXAMPLES:
    # Best pitch for every 2 units out from the right rim
    cargo run --bin simulate

    # Wider table including off-center spots
    cargo run --bin simulate -- --distance 4:30:1 --lateral -10,0,10

    # Reproducible random sample
    cargo run --bin simulate -- --sample 5000 --seed 7 --output sample.json
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_distances() {
        let config = SimConfig {
            min_distance: 2.0,
            max_distance: 6.0,
            distance_step: 2.0,
            ..default_config()
        };
        assert_eq!(config.distances(), vec![2.0, 4.0, 6.0]);

        let broken = SimConfig { distance_step: 0.0, ..default_config() };
        assert_eq!(broken.distances().len(), 1);
    }

    #[test]
    fn test_parse_overrides() {
        let config = SimConfig::parse(&args(&[
            "--side", "left", "--distance", "4:10:3", "--sample", "50", "--seed", "9", "-q",
        ]));
        assert_eq!(config.side, HoopSide::Left);
        assert_eq!(config.distances(), vec![4.0, 7.0, 10.0]);
        assert_eq!(config.mode, SimMode::Sample { count: 50 });
        assert_eq!(config.seed, Some(9));
        assert!(config.quiet);
    }

    #[test]
    fn test_parse_single() {
        let config = SimConfig::parse(&args(&["--single", "30,2,1.1"]));
        assert_eq!(config.mode, SimMode::Single { x: 30.0, z: 2.0, pitch: 1.1 });
    }

    fn default_config() -> SimConfig {
        SimConfig::default()
    }
}
