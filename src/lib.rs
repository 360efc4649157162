//! # Parafold
//!
//! Parallel reduction benchmark engine: five numeric reduction tasks, each
//! runnable under a catalog of concurrency and vectorisation strategies,
//! with a measuring harness that reports per-strategy statistics and
//! speedup against the sequential baseline.

#![feature(portable_simd)]

pub mod enums {
    pub mod error;
    pub mod run_phase;
    pub mod strategy;
    pub mod task;
}

pub mod structs {
    pub mod benchmark_result;
    pub mod config;
    pub mod dataset;
    pub mod run_stats;
}

pub mod traits {
    pub mod type_unions;
}

pub mod kernels {
    pub mod lanes;
    pub mod partition;
    pub(crate) mod routing;
    pub mod reduction {
        pub mod above_mean;
        pub mod divisible;
        pub mod mode_frequency;
        pub mod non_extreme_max;
        pub mod primes;
    }
}

pub mod aliases;
pub mod harness;
pub mod utils;

pub use aliases::{ChunkRange, KernelFn, Measurement, SampleSet, TaskValue};
pub use enums::error::ParafoldError;
pub use enums::run_phase::RunPhase;
pub use enums::strategy::Strategy;
pub use enums::task::Task;
pub use harness::{RunOutcome, run, run_benchmark, run_benchmark_with};
pub use kernels::lanes::LANES;
pub use kernels::partition::{CACHE_LINE_BYTES, DYNAMIC_GRAIN, chunk_ranges};
pub use kernels::reduction::non_extreme_max::NO_QUALIFYING_ELEMENT;
pub use structs::benchmark_result::{BenchmarkResult, FAILED_LABEL};
pub use structs::config::{BenchConfig, DEFAULT_SEED, default_workers};
pub use structs::dataset::{Dataset, VALUE_RANGE};
pub use structs::run_stats::{RunStatistics, compute_speedup};
pub use traits::type_unions::Element;
pub use utils::{
    avx2_available, format_duration, format_speedup, now_epoch_millis, parse_duration_str,
    parse_speedup_str,
};
