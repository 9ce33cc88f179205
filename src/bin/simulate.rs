use std::path::{Path, PathBuf};

use dki::catalog::Catalog;
use dki::constants::{DEFAULT_SEED, DEFAULT_TRIALS};
use dki::error::CatalogError;
use dki::report::write_simulation_report;
use dki::simulation::{simulate_batch_with_progress, summarize};
use dki::storage::{save_json, simulation_file_name, timestamp_secs};

struct Args {
    num_trials: usize,
    seed: u64,
    output: Option<String>,
}

const USAGE: &str = "Usage: dki-simulate [--trials N] [--seed S] [--output DIR]";

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut num_trials = DEFAULT_TRIALS;
    let mut seed = DEFAULT_SEED;
    let mut output: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--trials" => {
                i += 1;
                if i < args.len() {
                    num_trials = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --trials value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    seed = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --seed value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--output" => {
                i += 1;
                if i < args.len() {
                    output = Some(args[i].clone());
                }
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                println!();
                println!("Options:");
                println!("  --trials N     Number of trials to simulate (default: {})", DEFAULT_TRIALS);
                println!("  --seed S       RNG seed (default: {})", DEFAULT_SEED);
                println!("  --output DIR   Write the summary JSON to DIR (default: current directory)");
                println!();
                println!("Catalog files are read from DKI_BASE_PATH (default: .).");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("{}", USAGE);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    Args {
        num_trials,
        seed,
        output,
    }
}

fn load_catalog(base: &Path) -> Catalog {
    match Catalog::load(base) {
        Ok(catalog) => catalog,
        Err(CatalogError::Missing(files)) => {
            eprintln!("Error: The following required files are missing:");
            for file in files {
                eprintln!("- {}", file);
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn main() {
    dki::env_config::init_tracing();
    let Args {
        num_trials,
        seed,
        output,
    } = parse_args();
    let base = dki::env_config::base_path();
    let catalog = load_catalog(&base);
    let num_threads = dki::env_config::init_rayon_threads_lenient();

    println!(
        "Starting Monte Carlo simulation with {} trials (seed {}, {} threads)...",
        num_trials, seed, num_threads
    );
    let start = std::time::Instant::now();
    let result = simulate_batch_with_progress(&catalog, num_trials, seed, |done| {
        println!(
            "Progress: {:.1}% ({}/{}), Elapsed time: {:.2}s",
            done as f64 / num_trials as f64 * 100.0,
            done,
            num_trials,
            start.elapsed().as_secs_f64()
        );
    });
    tracing::info!(
        valid = result.valid_trials(),
        elapsed_s = result.elapsed.as_secs_f64(),
        "simulation finished"
    );

    let summary = summarize(&catalog, &result);
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = write_simulation_report(&mut stdout, &summary) {
        eprintln!("Failed to write report: {}", e);
        std::process::exit(1);
    }
    if summary.is_empty() {
        return;
    }

    let dir = output.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(simulation_file_name(num_trials, timestamp_secs()));
    match save_json(&summary.record(), &path) {
        Ok(()) => println!("\nDetailed simulation results saved to {}", path.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
