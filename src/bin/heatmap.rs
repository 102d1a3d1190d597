//! Make-rate heatmap for one half court
//!
//! Every cell throws the full pitch sweep from its center at the hoop on that
//! half and colors the cell by the fraction of pitches that score.
//!
//! Usage:
//!   cargo run --bin heatmap                         # Right hoop, default grid
//!   cargo run --bin heatmap -- --side left
//!   cargo run --bin heatmap -- --cols 94 --rows 50 --pitch-steps 181
//!   cargo run --bin heatmap -- --no-tuning --out showcase/heatmaps
//!
//! Outputs land in showcase/heatmaps as:
//!   heatmap_make_rate_<side>.png
//!   heatmap_make_rate_<side>.txt (x,z,make_rate)

use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use hoopshot::court::{CourtGeometry, HoopSide};
use hoopshot::simulation::sweep::init_parallel;
use hoopshot::simulation::{MakeRateGrid, make_rate_grid, pitch_range};
use hoopshot::tuning::{self, PhysicsTweaks};
use image::{Rgb, RgbImage};

const CELL_SIZE: u32 = 12; // pixels per cell
const DEFAULT_OUT_DIR: &str = "showcase/heatmaps";

struct HeatmapArgs {
    side: HoopSide,
    cols: u32,
    rows: u32,
    pitch_steps: usize,
    max_ticks: u32,
    use_tuning_file: bool,
    parallel: usize,
    out_dir: PathBuf,
}

impl Default for HeatmapArgs {
    fn default() -> Self {
        Self {
            side: HoopSide::Right,
            cols: 47,
            rows: 25,
            pitch_steps: 91,
            max_ticks: 600,
            use_tuning_file: true,
            parallel: 0,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

fn parse_args() -> HeatmapArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut parsed = HeatmapArgs::default();

    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--side" => {
                if let Some(v) = value {
                    parsed.side = if v.eq_ignore_ascii_case("left") { HoopSide::Left } else { HoopSide::Right };
                    i += 1;
                }
            }
            "--cols" => {
                if let Some(v) = value {
                    parsed.cols = v.parse().unwrap_or(parsed.cols).max(1);
                    i += 1;
                }
            }
            "--rows" => {
                if let Some(v) = value {
                    parsed.rows = v.parse().unwrap_or(parsed.rows).max(1);
                    i += 1;
                }
            }
            "--pitch-steps" => {
                if let Some(v) = value {
                    parsed.pitch_steps = v.parse().unwrap_or(parsed.pitch_steps);
                    i += 1;
                }
            }
            "--max-ticks" => {
                if let Some(v) = value {
                    parsed.max_ticks = v.parse().unwrap_or(parsed.max_ticks);
                    i += 1;
                }
            }
            "--parallel" => {
                if let Some(v) = value {
                    parsed.parallel = v.parse().unwrap_or(0);
                    i += 1;
                }
            }
            "--out" => {
                if let Some(v) = value {
                    parsed.out_dir = PathBuf::from(v);
                    i += 1;
                }
            }
            "--no-tuning" => parsed.use_tuning_file = false,
            "--help" | "-h" => {
                println!("Usage: heatmap [--side left|right] [--cols N] [--rows N] [--pitch-steps N]");
                println!("               [--max-ticks N] [--parallel N] [--no-tuning] [--out DIR]");
                std::process::exit(0);
            }
            other => eprintln!("Ignoring unknown argument '{}'", other),
        }
        i += 1;
    }
    parsed
}

fn main() {
    let args = parse_args();

    let court = match CourtGeometry::standard() {
        Ok(court) => court,
        Err(e) => {
            eprintln!("Invalid court geometry: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = init_parallel(args.parallel) {
        eprintln!("Warning: {}", e);
    }

    let mut tweaks = PhysicsTweaks::default();
    if args.use_tuning_file
        && let Err(e) = tuning::apply_global_tuning(&mut tweaks)
    {
        eprintln!("Warning: {}", e);
    }

    let pitches = pitch_range(args.pitch_steps);
    println!(
        "Make-rate heatmap ({} hoop): {}x{} cells, {} pitches each",
        args.side,
        args.cols,
        args.rows,
        pitches.len()
    );
    let started = Instant::now();
    let grid = make_rate_grid(&court, &tweaks, args.side, args.cols, args.rows, &pitches, args.max_ticks);
    println!("Simulated in {:.1}s", started.elapsed().as_secs_f32());

    if let Err(e) = fs::create_dir_all(&args.out_dir) {
        eprintln!("Failed to create {}: {}", args.out_dir.display(), e);
        std::process::exit(1);
    }

    let side_tag = format!("{}", args.side).to_ascii_lowercase();
    let png_path = args.out_dir.join(format!("heatmap_make_rate_{}.png", side_tag));
    let txt_path = args.out_dir.join(format!("heatmap_make_rate_{}.txt", side_tag));

    let img = render_grid(&grid, &court);
    if let Err(e) = img.save(&png_path) {
        eprintln!("Failed to write {}: {}", png_path.display(), e);
        std::process::exit(1);
    }
    if let Err(e) = fs::write(&txt_path, grid_text(&grid)) {
        eprintln!("Failed to write {}: {}", txt_path.display(), e);
        std::process::exit(1);
    }

    let best = grid.rates.iter().copied().fold(0.0f32, f32::max);
    let mean = grid.rates.iter().sum::<f32>() / grid.rates.len().max(1) as f32;
    println!("Best cell {:.0}%, mean {:.1}%", best * 100.0, mean * 100.0);
    println!("Wrote {} and {}", png_path.display(), txt_path.display());
}

/// `x,z,make_rate` per cell center
fn grid_text(grid: &MakeRateGrid) -> String {
    let mut out = String::from("x,z,make_rate\n");
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let center = grid.cell_center(col, row);
            let _ = writeln!(out, "{:.2},{:.2},{:.4}", center.x, center.y, grid.get(col, row));
        }
    }
    out
}

fn render_grid(grid: &MakeRateGrid, court: &CourtGeometry) -> RgbImage {
    let mut img = RgbImage::new(grid.cols * CELL_SIZE, grid.rows * CELL_SIZE);

    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let rate = grid.get(col, row);
            let color = if rate > 0.0 { rate_to_color(rate) } else { Rgb([230, 230, 230]) };
            fill_cell(&mut img, col, row, color);
        }
    }

    if let Some(hoop) = court.hoops.iter().find(|h| h.side == grid.side) {
        let rim = hoop.rim_center();
        draw_rim_marker(&mut img, grid, rim.x, rim.z);
    }
    img
}

/// Convert make rate (0-1) to RGB color
/// Low rate = red, high rate = green
fn rate_to_color(rate: f32) -> Rgb<u8> {
    let r = ((1.0 - rate) * 2.0).min(1.0);
    let g = (rate * 2.0).min(1.0);
    Rgb([(r * 255.0) as u8, (g * 255.0) as u8, 50])
}

/// Fill a cell with a solid color
fn fill_cell(img: &mut RgbImage, cx: u32, cy: u32, color: Rgb<u8>) {
    let x_start = cx * CELL_SIZE;
    let y_start = cy * CELL_SIZE;

    for dy in 0..CELL_SIZE {
        for dx in 0..CELL_SIZE {
            img.put_pixel(x_start + dx, y_start + dy, color);
        }
    }
}

/// Cross at the rim's court position
fn draw_rim_marker(img: &mut RgbImage, grid: &MakeRateGrid, x: f32, z: f32) {
    let span_x = (grid.x_range.1 - grid.x_range.0).max(f32::EPSILON);
    let span_z = (grid.z_range.1 - grid.z_range.0).max(f32::EPSILON);
    let px = ((x - grid.x_range.0) / span_x * img.width() as f32).round() as i32;
    let py = ((z - grid.z_range.0) / span_z * img.height() as f32).round() as i32;

    let color = Rgb([40, 40, 40]);
    let size = CELL_SIZE as i32;
    for i in -size..=size {
        for (x, y) in [(px + i, py), (px, py + i)] {
            if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}
