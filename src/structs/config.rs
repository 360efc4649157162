//! # **Config Module** - *Explicit Per-Run Benchmark Configuration*
//!
//! Carries everything a run needs as an explicit value, passed by reference
//! into the harness and the worker-pool strategies. Nothing here is global
//! and nothing is mutated mid-run.

use std::fmt::{Display, Formatter};
use std::thread::available_parallelism;

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 42;

/// Logical core count reported by the host, falling back to 4 when the
/// platform cannot say.
pub fn default_workers() -> usize {
    available_parallelism().map(|n| n.get()).unwrap_or(4)
}

/// # BenchConfig
///
/// Run-level configuration consumed by the execution harness.
///
/// ## Description
/// - `seed`: generator seed; fixed across strategies so they all see the
///   same dataset.
/// - `warmup`: untimed invocations per strategy before measurement starts.
/// - `iterations`: timed invocations per strategy; each produces one sample.
/// - `workers`: fan-out width for the pool, invoke, and future strategies.
///
/// ## Example
/// ```rust
/// use parafold::BenchConfig;
///
/// let quick = BenchConfig { warmup: 0, iterations: 1, ..Default::default() };
/// assert_eq!(quick.seed, 42);
/// assert!(quick.workers >= 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BenchConfig {
    pub seed: u64,
    pub warmup: usize,
    pub iterations: usize,
    pub workers: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            warmup: 3,
            iterations: 10,
            workers: default_workers(),
        }
    }
}

impl Display for BenchConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BenchConfig (seed: {}, warmup: {}, iterations: {}, workers: {})",
            self.seed, self.warmup, self.iterations, self.workers
        )
    }
}
