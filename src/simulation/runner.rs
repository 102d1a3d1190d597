//! Simulation runner - executes a `SimConfig` and prints the results

use std::io::Write;

use super::config::{SimConfig, SimMode};
use super::shot::{court_spot, simulate_shot};
use super::sweep::{
    OutcomeCounts, SweepPlan, init_parallel, pitch_range, run_sweep, sample_random_shots,
    summarize_by_distance,
};
use crate::court::CourtGeometry;
use crate::tuning::{self, PhysicsTweaks};

/// Physics values for a run: defaults, optionally overlaid with the tuning file
pub fn load_tweaks(config: &SimConfig) -> PhysicsTweaks {
    let mut tweaks = PhysicsTweaks::default();
    if config.use_tuning_file
        && let Err(e) = tuning::apply_global_tuning(&mut tweaks)
    {
        eprintln!("Warning: {}", e);
    }
    tweaks
}

/// Run the configured simulation. Returns a process exit code.
pub fn run_simulation(config: SimConfig) -> i32 {
    let court = match CourtGeometry::standard() {
        Ok(court) => court,
        Err(e) => {
            eprintln!("Invalid court geometry: {}", e);
            return 1;
        }
    };
    if let Err(e) = init_parallel(config.parallel) {
        eprintln!("Warning: {}", e);
    }
    let tweaks = load_tweaks(&config);

    let report = match config.mode {
        SimMode::PitchTable => run_pitch_table(&config, &court, &tweaks),
        SimMode::Sample { count } => run_sample(&config, &court, &tweaks, count),
        SimMode::Single { x, z, pitch } => run_single(&config, &court, &tweaks, x, z, pitch),
    };

    if let Some(path) = &config.output_file {
        let written = serde_json::to_string_pretty(&report)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => {
                if !config.quiet {
                    println!("Results written to {}", path);
                }
            }
            Err(e) => {
                eprintln!("Failed to write {}: {}", path, e);
                return 1;
            }
        }
    }
    0
}

fn run_pitch_table(config: &SimConfig, court: &CourtGeometry, tweaks: &PhysicsTweaks) -> serde_json::Value {
    let plan = SweepPlan {
        side: config.side,
        distances: config.distances(),
        lateral: config.lateral.clone(),
        pitches: pitch_range(config.pitch_steps),
        max_ticks: config.max_ticks,
    };
    if !config.quiet {
        println!("Pitch Table ({} hoop)", config.side);
        println!("=======================\n");
        println!(
            "{} spots x {} pitches",
            plan.spots(court).len(),
            plan.pitches.len()
        );
    }

    let samples = run_sweep(court, tweaks, &plan);
    let summaries = summarize_by_distance(&samples);

    println!("\n  Dist   Best pitch   Makes  Strong  Weak  Close  Rate");
    println!("  ─────────────────────────────────────────────────────");
    let mut rows = Vec::with_capacity(summaries.len());
    for s in &summaries {
        let best = s
            .best_pitch()
            .map(|p| format!("{:>5.1}°", p.to_degrees()))
            .unwrap_or_else(|| "    -".to_string());
        println!(
            "  {:>5.1}  {:>10}   {:>5}  {:>6}  {:>4}  {:>5}  {:>4.0}%",
            s.distance,
            best,
            s.counts.made,
            s.counts.too_strong,
            s.counts.too_weak,
            s.counts.close,
            s.counts.make_rate() * 100.0
        );
        rows.push(serde_json::json!({
            "distance": s.distance,
            "best_pitch": s.best_pitch(),
            "making_pitches": s.making_pitches,
            "counts": counts_json(&s.counts),
        }));
    }

    serde_json::json!({ "mode": "pitch_table", "side": config.side, "distances": rows })
}

fn run_sample(
    config: &SimConfig,
    court: &CourtGeometry,
    tweaks: &PhysicsTweaks,
    count: usize,
) -> serde_json::Value {
    let seed = config.seed.unwrap_or_else(rand::random);
    if !config.quiet {
        println!("Random sample: {} throws, seed {}", count, seed);
        std::io::stdout().flush().ok();
    }

    let samples = sample_random_shots(court, tweaks, count, seed, config.max_ticks);
    let mut counts = OutcomeCounts::default();
    for sample in &samples {
        counts.add(&sample.result);
    }

    println!(
        "Made {} / {} ({:.1}%), too strong {}, too weak {}, close {}, unresolved {}",
        counts.made,
        counts.total(),
        counts.make_rate() * 100.0,
        counts.too_strong,
        counts.too_weak,
        counts.close,
        counts.unresolved
    );

    let makes: Vec<_> = samples
        .iter()
        .filter(|s| s.result.made)
        .map(|s| serde_json::json!({ "x": s.position.x, "z": s.position.z, "pitch": s.pitch }))
        .collect();
    serde_json::json!({ "mode": "sample", "seed": seed, "counts": counts_json(&counts), "makes": makes })
}

fn run_single(
    config: &SimConfig,
    court: &CourtGeometry,
    tweaks: &PhysicsTweaks,
    x: f32,
    z: f32,
    pitch: f32,
) -> serde_json::Value {
    let start = court.bounds.clamp_inner(court_spot(court, x, z), court.ball_radius);
    let result = simulate_shot(court, tweaks, start, pitch, config.max_ticks);
    let v = result.launch_velocity;

    println!("Start ({:.2}, {:.2}) pitch {:.3} rad", start.x, start.z, pitch);
    println!("Launch velocity ({:.2}, {:.2}, {:.2}) |v| = {:.2}", v.x, v.y, v.z, v.length());
    println!("Peak height {:.2}, {} ticks", result.peak_height, result.ticks);
    for contact in &result.contacts {
        println!("  contact: {:?}", contact);
    }
    println!(
        "Result: {} ({})",
        result.feedback.map(|f| f.message()).unwrap_or("no verdict"),
        if result.settled { "settled" } else { "tick cap" }
    );

    serde_json::json!({
        "mode": "single",
        "start": [start.x, start.y, start.z],
        "pitch": pitch,
        "made": result.made,
        "feedback": result.feedback,
        "ticks": result.ticks,
        "peak_height": result.peak_height,
        "rest": [result.rest_position.x, result.rest_position.y, result.rest_position.z],
    })
}

fn counts_json(counts: &OutcomeCounts) -> serde_json::Value {
    serde_json::json!({
        "made": counts.made,
        "too_strong": counts.too_strong,
        "too_weak": counts.too_weak,
        "close": counts.close,
        "unresolved": counts.unresolved,
        "make_rate": counts.make_rate(),
    })
}
