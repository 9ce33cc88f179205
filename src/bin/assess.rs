use std::path::{Path, PathBuf};

use dki::assessment::run_assessment;
use dki::catalog::Catalog;
use dki::error::{CatalogError, PromptError};
use dki::prompt::ConsolePrompter;
use dki::report::write_assessment_report;
use dki::storage::{assessment_file_name, save_json, timestamp_secs};

struct Args {
    output: Option<String>,
}

const USAGE: &str = "Usage: dki-assess [--output DIR]";

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut output: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
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
                println!("  --output DIR   Write the assessment JSON to DIR (default: current directory)");
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

    Args { output }
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
    let Args { output } = parse_args();
    let base = dki::env_config::base_path();
    let catalog = load_catalog(&base);

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    let mut prompter = ConsolePrompter::new(stdin, stdout);
    if let Err(e) = prompter.print_header(&catalog) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let result = match run_assessment(&catalog, &mut prompter) {
        Ok(result) => result,
        Err(PromptError::Closed) => {
            eprintln!("\nAssessment cancelled by user.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut out = prompter.into_output();
    if let Err(e) = write_assessment_report(&mut out, &result) {
        eprintln!("Failed to write report: {}", e);
        std::process::exit(1);
    }
    drop(out);

    let dir = output.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(assessment_file_name(timestamp_secs()));
    match save_json(&result, &path) {
        Ok(()) => println!("\nAssessment data saved to {}", path.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
