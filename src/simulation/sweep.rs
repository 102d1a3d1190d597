//! Parallel shot sweeps
//!
//! Runs `simulate_shot` over grids of court positions and pitch values using
//! Rayon. Each shot is independent and the core is deterministic, so results
//! come back in input order regardless of thread count.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::shot::{ShotResult, court_spot, simulate_shot};
use crate::constants::{PITCH_MAX, PITCH_MIN};
use crate::court::{CourtGeometry, HoopSide};
use crate::scoring::ShotFeedback;
use crate::tuning::PhysicsTweaks;

/// Initialize the global Rayon pool. `0` keeps Rayon's auto-detected size.
pub fn init_parallel(threads: usize) -> Result<(), String> {
    if threads == 0 {
        return Ok(());
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .map_err(|e| format!("Failed to initialize Rayon thread pool: {}", e))
}

/// `steps` evenly spaced pitches covering [PITCH_MIN, PITCH_MAX]
pub fn pitch_range(steps: usize) -> Vec<f32> {
    match steps {
        0 => Vec::new(),
        1 => vec![(PITCH_MIN + PITCH_MAX) * 0.5],
        n => (0..n)
            .map(|i| PITCH_MIN + (PITCH_MAX - PITCH_MIN) * i as f32 / (n - 1) as f32)
            .collect(),
    }
}

/// One simulated throw in a sweep
#[derive(Debug, Clone)]
pub struct SweepSample {
    pub position: Vec3,
    /// Horizontal distance from the start spot to the rim center
    pub distance: f32,
    pub pitch: f32,
    pub result: ShotResult,
}

/// Straight-line sweep toward one hoop: every distance x lateral offset x pitch
#[derive(Debug, Clone)]
pub struct SweepPlan {
    pub side: HoopSide,
    /// Distances out from the rim along the court axis
    pub distances: Vec<f32>,
    /// Offsets along z
    pub lateral: Vec<f32>,
    pub pitches: Vec<f32>,
    pub max_ticks: u32,
}

impl SweepPlan {
    /// Court spots of the sweep, clamped into the inner court
    pub fn spots(&self, court: &CourtGeometry) -> Vec<Vec3> {
        let Some(hoop) = court.hoops.iter().find(|h| h.side == self.side) else {
            return Vec::new();
        };
        let rim = hoop.rim_center();
        let toward_center = -self.side.sign();
        let mut spots = Vec::with_capacity(self.distances.len() * self.lateral.len().max(1));
        for &d in &self.distances {
            let lateral: &[f32] = if self.lateral.is_empty() { &[0.0] } else { &self.lateral };
            for &z in lateral {
                let raw = court_spot(court, rim.x + toward_center * d, z);
                spots.push(court.bounds.clamp_inner(raw, court.ball_radius));
            }
        }
        spots
    }
}

/// Simulate every (spot, pitch) pair of the plan in parallel
pub fn run_sweep(court: &CourtGeometry, tweaks: &PhysicsTweaks, plan: &SweepPlan) -> Vec<SweepSample> {
    let jobs: Vec<(Vec3, f32)> = plan
        .spots(court)
        .into_iter()
        .flat_map(|spot| plan.pitches.iter().map(move |&pitch| (spot, pitch)))
        .collect();
    run_jobs(court, tweaks, &jobs, plan.max_ticks)
}

/// Random spots inside the inner court with random pitches, reproducible from `seed`
pub fn sample_random_shots(
    court: &CourtGeometry,
    tweaks: &PhysicsTweaks,
    count: usize,
    seed: u64,
    max_ticks: u32,
) -> Vec<SweepSample> {
    let mut rng = StdRng::seed_from_u64(seed);
    let hx = (court.bounds.inner_half.x - court.ball_radius).max(0.0);
    let hz = (court.bounds.inner_half.y - court.ball_radius).max(0.0);
    let jobs: Vec<(Vec3, f32)> = (0..count)
        .map(|_| {
            let x = rng.gen_range(-hx..=hx);
            let z = rng.gen_range(-hz..=hz);
            let pitch = rng.gen_range(PITCH_MIN..=PITCH_MAX);
            (court_spot(court, x, z), pitch)
        })
        .collect();
    run_jobs(court, tweaks, &jobs, max_ticks)
}

fn run_jobs(
    court: &CourtGeometry,
    tweaks: &PhysicsTweaks,
    jobs: &[(Vec3, f32)],
    max_ticks: u32,
) -> Vec<SweepSample> {
    jobs.par_iter()
        .map(|&(position, pitch)| {
            let rim = court.hoop_for(position).rim_center();
            SweepSample {
                position,
                distance: position.xz().distance(rim.xz()),
                pitch,
                result: simulate_shot(court, tweaks, position, pitch, max_ticks),
            }
        })
        .collect()
}

/// Outcome counts for a group of samples
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub made: u32,
    pub too_strong: u32,
    pub too_weak: u32,
    pub close: u32,
    /// Hit the tick cap without settling
    pub unresolved: u32,
}

impl OutcomeCounts {
    pub fn add(&mut self, result: &ShotResult) {
        match result.feedback {
            Some(ShotFeedback::Made) => self.made += 1,
            Some(ShotFeedback::TooStrong) => self.too_strong += 1,
            Some(ShotFeedback::TooWeak) => self.too_weak += 1,
            Some(ShotFeedback::Close) => self.close += 1,
            None => self.unresolved += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.made + self.too_strong + self.too_weak + self.close + self.unresolved
    }

    pub fn make_rate(&self) -> f32 {
        match self.total() {
            0 => 0.0,
            n => self.made as f32 / n as f32,
        }
    }
}

/// Per-distance summary of a sweep
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceSummary {
    pub distance: f32,
    pub counts: OutcomeCounts,
    /// Pitches that scored, ascending
    pub making_pitches: Vec<f32>,
}

impl DistanceSummary {
    /// Middle of the scoring pitches, the most forgiving choice
    pub fn best_pitch(&self) -> Option<f32> {
        if self.making_pitches.is_empty() {
            return None;
        }
        Some(self.making_pitches[self.making_pitches.len() / 2])
    }
}

/// Group samples by distance (rounded to 0.1) in ascending order
pub fn summarize_by_distance(samples: &[SweepSample]) -> Vec<DistanceSummary> {
    let mut summaries: Vec<DistanceSummary> = Vec::new();
    for sample in samples {
        let key = (sample.distance * 10.0).round() / 10.0;
        let idx = match summaries.iter().position(|s| (s.distance - key).abs() < 1e-3) {
            Some(idx) => idx,
            None => {
                summaries.push(DistanceSummary {
                    distance: key,
                    counts: OutcomeCounts::default(),
                    making_pitches: Vec::new(),
                });
                summaries.len() - 1
            }
        };
        let summary = &mut summaries[idx];
        summary.counts.add(&sample.result);
        if sample.result.made {
            summary.making_pitches.push(sample.pitch);
        }
    }
    for summary in &mut summaries {
        summary.making_pitches.sort_by(f32::total_cmp);
    }
    summaries.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    summaries
}

/// Make rate per cell of a grid over one half court
#[derive(Debug, Clone)]
pub struct MakeRateGrid {
    pub side: HoopSide,
    pub cols: u32,
    pub rows: u32,
    /// Court-space x range covered by the columns
    pub x_range: (f32, f32),
    /// Court-space z range covered by the rows
    pub z_range: (f32, f32),
    /// Row-major, `rows * cols` entries in [0, 1]
    pub rates: Vec<f32>,
}

impl MakeRateGrid {
    pub fn get(&self, col: u32, row: u32) -> f32 {
        self.rates
            .get((row * self.cols + col) as usize)
            .copied()
            .unwrap_or(0.0)
    }

    /// Court-space center of a cell
    pub fn cell_center(&self, col: u32, row: u32) -> Vec2 {
        let fx = (col as f32 + 0.5) / self.cols as f32;
        let fz = (row as f32 + 0.5) / self.rows as f32;
        Vec2::new(
            self.x_range.0 + (self.x_range.1 - self.x_range.0) * fx,
            self.z_range.0 + (self.z_range.1 - self.z_range.0) * fz,
        )
    }
}

/// Fraction of `pitches` that score from each cell of the half court facing `side`
pub fn make_rate_grid(
    court: &CourtGeometry,
    tweaks: &PhysicsTweaks,
    side: HoopSide,
    cols: u32,
    rows: u32,
    pitches: &[f32],
    max_ticks: u32,
) -> MakeRateGrid {
    let hx = (court.bounds.inner_half.x - court.ball_radius).max(0.0);
    let hz = (court.bounds.inner_half.y - court.ball_radius).max(0.0);
    let x_range = match side {
        HoopSide::Right => (0.0, hx),
        HoopSide::Left => (-hx, 0.0),
    };
    let mut grid = MakeRateGrid {
        side,
        cols,
        rows,
        x_range,
        z_range: (-hz, hz),
        rates: Vec::new(),
    };

    let cells: Vec<(u32, u32)> = (0..rows)
        .flat_map(|row| (0..cols).map(move |col| (col, row)))
        .collect();
    grid.rates = cells
        .par_iter()
        .map(|&(col, row)| {
            let center = grid.cell_center(col, row);
            let start = court_spot(court, center.x, center.y);
            let mut counts = OutcomeCounts::default();
            for &pitch in pitches {
                counts.add(&simulate_shot(court, tweaks, start, pitch, max_ticks));
            }
            counts.make_rate()
        })
        .collect();
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::shot::DEFAULT_MAX_TICKS;

    fn setup() -> (CourtGeometry, PhysicsTweaks) {
        (CourtGeometry::standard().unwrap(), PhysicsTweaks::default())
    }

    #[test]
    fn test_pitch_range_endpoints() {
        let pitches = pitch_range(5);
        assert_eq!(pitches.len(), 5);
        assert_eq!(pitches[0], PITCH_MIN);
        assert!((pitches[4] - PITCH_MAX).abs() < 1e-6);
        assert!(pitch_range(0).is_empty());
    }

    #[test]
    fn test_spots_stay_inside_court() {
        let (court, _) = setup();
        let plan = SweepPlan {
            side: HoopSide::Left,
            distances: vec![2.0, 200.0],
            lateral: vec![-100.0, 0.0],
            pitches: vec![0.5],
            max_ticks: DEFAULT_MAX_TICKS,
        };
        let spots = plan.spots(&court);
        assert_eq!(spots.len(), 4);
        for spot in spots {
            assert!(court.bounds.is_inside_inner(spot));
        }
    }

    #[test]
    fn test_sweep_preserves_order_and_counts() {
        let (court, tweaks) = setup();
        let plan = SweepPlan {
            side: HoopSide::Right,
            distances: vec![10.0, 20.0],
            lateral: Vec::new(),
            pitches: pitch_range(3),
            max_ticks: DEFAULT_MAX_TICKS,
        };
        let samples = run_sweep(&court, &tweaks, &plan);
        assert_eq!(samples.len(), 6);
        assert_eq!(samples[0].pitch, samples[3].pitch);

        let summaries = summarize_by_distance(&samples);
        assert_eq!(summaries.len(), 2);
        assert!(summaries[0].distance < summaries[1].distance);
        assert_eq!(summaries[0].counts.total(), 3);
    }

    #[test]
    fn test_random_samples_reproducible() {
        let (court, tweaks) = setup();
        let a = sample_random_shots(&court, &tweaks, 8, 42, 120);
        let b = sample_random_shots(&court, &tweaks, 8, 42, 120);
        let key = |s: &SweepSample| (s.position, s.pitch, s.result.ticks);
        assert_eq!(a.iter().map(key).collect::<Vec<_>>(), b.iter().map(key).collect::<Vec<_>>());
    }

    #[test]
    fn test_outcome_counts_rate() {
        let mut counts = OutcomeCounts::default();
        assert_eq!(counts.make_rate(), 0.0);
        counts.made = 1;
        counts.too_weak = 3;
        assert!((counts.make_rate() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_grid_dimensions() {
        let (court, tweaks) = setup();
        let grid = make_rate_grid(&court, &tweaks, HoopSide::Right, 3, 2, &[0.0], 60);
        assert_eq!(grid.rates.len(), 6);
        assert!(grid.rates.iter().all(|r| (0.0..=1.0).contains(r)));
        assert!(grid.cell_center(0, 0).x > 0.0);
    }
}
