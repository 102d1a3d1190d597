//! Scenario test runner CLI
//!
//! Usage:
//!   cargo run --bin test-scenarios                   # Run all scenarios
//!   cargo run --bin test-scenarios -- modes/         # Run one folder
//!   cargo run --bin test-scenarios -- flat_throw     # Any path containing the text
//!   cargo run --bin test-scenarios -- --list         # List without running
//!   cargo run --bin test-scenarios -- --verbose      # Expected/actual on failure

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use hoopshot::testing::{SCENARIOS_DIR, TestResult, parse_test_file, run_test};

#[derive(Default)]
struct Tally {
    passed: u32,
    failed: u32,
    errors: u32,
}

impl Tally {
    fn add(&mut self, result: &TestResult) {
        match result {
            TestResult::Pass { .. } => self.passed += 1,
            TestResult::Fail { .. } => self.failed += 1,
            TestResult::Error { .. } => self.errors += 1,
        }
    }

    fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    let list_only = args.iter().any(|a| a == "--list");
    let filter = args.iter().find(|a| !a.starts_with('-')).cloned();

    let scenarios_path = Path::new(SCENARIOS_DIR);
    if !scenarios_path.is_dir() {
        eprintln!("No scenarios directory found at {}", SCENARIOS_DIR);
        std::process::exit(1);
    }

    let tests = discover_tests(scenarios_path, filter.as_deref());
    if tests.is_empty() {
        eprintln!("No scenario files matched{}", filter.map(|f| format!(" '{}'", f)).unwrap_or_default());
        std::process::exit(1);
    }

    if list_only {
        for path in &tests {
            println!("{}", path.strip_prefix(scenarios_path).unwrap_or(path).display());
        }
        return;
    }

    println!("Scenario Tests");
    println!("==============\n");

    let started = Instant::now();
    let mut tally = Tally::default();
    let mut current_category = String::new();

    for test_path in &tests {
        let rel_path = test_path.strip_prefix(scenarios_path).unwrap_or(test_path);

        let category = rel_path
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();
        if category != current_category {
            if !category.is_empty() {
                println!("{}/", category);
            }
            current_category = category;
        }

        let test_name = rel_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let result = match parse_test_file(test_path) {
            Ok(def) => run_test(&def),
            Err(message) => TestResult::Error { message },
        };
        tally.add(&result);
        print_result(&test_name, &result, verbose);
    }

    println!("\n==============");
    println!(
        "Results: {} passed, {} failed, {} errors ({:.2}s)",
        tally.passed,
        tally.failed,
        tally.errors,
        started.elapsed().as_secs_f32()
    );

    if !tally.all_passed() {
        std::process::exit(1);
    }
}

/// All `.toml` files under `base` whose relative path contains `filter`, sorted
fn discover_tests(base: &Path, filter: Option<&str>) -> Vec<PathBuf> {
    let mut tests = Vec::new();
    let mut dirs = vec![base.to_path_buf()];

    while let Some(dir) = dirs.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for path in entries.flatten().map(|e| e.path()) {
            if path.is_dir() {
                dirs.push(path);
            } else if path.extension().is_some_and(|e| e == "toml") {
                let rel = path.strip_prefix(base).unwrap_or(&path).to_string_lossy().to_string();
                if filter.is_none_or(|f| rel.contains(f)) {
                    tests.push(path);
                }
            }
        }
    }

    tests.sort();
    tests
}

fn print_result(name: &str, result: &TestResult, verbose: bool) {
    let dots = ".".repeat(40 - name.len().min(39));

    match result {
        TestResult::Pass { frames } => println!("  {} {} PASS ({} frames)", name, dots, frames),
        TestResult::Fail { error } => {
            println!("  {} {} FAIL", name, dots);
            if verbose {
                println!("    {}", error);
            } else {
                println!("    {}", error.message);
            }
        }
        TestResult::Error { message } => {
            println!("  {} {} ERROR", name, dots);
            println!("    {}", message);
        }
    }
}
