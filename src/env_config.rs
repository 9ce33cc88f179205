//! Shared environment configuration for the dKI binaries.
//!
//! | Variable | Default | Effect |
//! |----------|---------|--------|
//! | `DKI_BASE_PATH` | `.` | Directory holding the catalog JSON files |
//! | `RAYON_NUM_THREADS` | `OMP_NUM_THREADS`, then 8 | Simulation worker threads |
//! | `DKI_LOG` | `dki=info` | `tracing` filter directives |

use std::path::PathBuf;
use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING: Once = Once::new();

/// Install the stderr `tracing` subscriber. Idempotent.
///
/// Filter comes from `DKI_LOG` (e.g. `DKI_LOG=dki::simulation=debug`) and falls
/// back to `dki=info` when unset or invalid. Logs go to stderr so they never
/// interleave with prompts or reports on stdout.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter =
            EnvFilter::try_from_env("DKI_LOG").unwrap_or_else(|_| EnvFilter::new("dki=info"));
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}

/// Read `DKI_BASE_PATH` (default `"."`).
pub fn base_path() -> PathBuf {
    let base = std::env::var("DKI_BASE_PATH").unwrap_or_else(|_| ".".to_string());
    tracing::debug!(base_path = %base, "catalog base path");
    PathBuf::from(base)
}

/// Read `RAYON_NUM_THREADS` (fallback `OMP_NUM_THREADS`, default 8) and build
/// the global rayon pool. Tolerates an already-initialized pool. Returns
/// thread count.
pub fn init_rayon_threads_lenient() -> usize {
    let num_threads = std::env::var("RAYON_NUM_THREADS")
        .or_else(|_| std::env::var("OMP_NUM_THREADS"))
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);
    if rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .is_err()
    {
        tracing::debug!("rayon pool already initialized");
    }
    tracing::info!(num_threads, "rayon threads");
    num_threads
}
