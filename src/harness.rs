//! # **Harness Module** - *Benchmark Execution Engine*
//!
//! Drives `(task, strategy)` pairs through the warmup/measure cycle and
//! assembles the sorted result set for a task.
//!
//! ## Behaviour
//! - [`run`] executes one pair: `warmup` untimed invocations, then
//!   `iterations` timed ones, each wall-clock sample recorded individually.
//! - A panic inside a kernel is caught and recorded as
//!   `MeasurementFailure`; `UnsupportedPlatform` likewise fails the pair.
//!   Either way the task's remaining strategies still run and report.
//! - [`run_benchmark`] resolves the task name, generates the dataset, runs
//!   the sequential baseline first so speedup has a stable reference, then
//!   every other applicable strategy, and sorts the records ascending by
//!   mean time with failed rows after all completed ones.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use crate::aliases::{KernelFn, SampleSet, TaskValue};
use crate::enums::error::ParafoldError;
use crate::enums::run_phase::RunPhase;
use crate::enums::strategy::Strategy;
use crate::enums::task::Task;
use crate::kernels::routing::kernel_for;
use crate::structs::benchmark_result::BenchmarkResult;
use crate::structs::config::BenchConfig;
use crate::structs::dataset::Dataset;
use crate::structs::run_stats::{RunStatistics, compute_speedup};

/// # RunOutcome
///
/// Raw outcome of one `(task, strategy)` run, before the speedup against
/// the baseline is known.
///
/// ## Behaviour
/// - `phase` is always terminal here: `Completed` or `Failed`.
/// - On failure the samples are empty and the value absent; the error says
/// why. A warmup failure fails the pair the same way a measured one does.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOutcome {
    /// Terminal phase of the run.
    pub phase: RunPhase,
    /// Reduction value from the final measured iteration.
    pub value: Option<TaskValue>,
    /// One wall-clock sample per measured iteration.
    pub samples: SampleSet,
    /// Failure cause, present exactly when `phase` is `Failed`.
    pub error: Option<ParafoldError>,
}

impl RunOutcome {
    fn completed(value: Option<TaskValue>, samples: SampleSet) -> Self {
        RunOutcome { phase: RunPhase::Completed, value, samples, error: None }
    }

    fn failed(error: ParafoldError) -> Self {
        RunOutcome {
            phase: RunPhase::Failed,
            value: None,
            samples: SampleSet::new(),
            error: Some(error),
        }
    }

    /// Statistics over the measured samples.
    pub fn stats(&self) -> RunStatistics {
        RunStatistics::from_samples(&self.samples)
    }

    /// Folds the outcome into a result record, computing speedup against
    /// the given baseline mean.
    pub fn into_result(
        self,
        task: Task,
        strategy: Strategy,
        dataset_size: usize,
        baseline_mean: f64,
    ) -> BenchmarkResult {
        match self.error {
            Some(error) => BenchmarkResult::failed(task, strategy, dataset_size, error),
            None => {
                let mean = self.stats().mean;
                BenchmarkResult::completed(
                    task,
                    strategy,
                    dataset_size,
                    self.value.unwrap_or_default(),
                    self.samples,
                    compute_speedup(baseline_mean, mean),
                )
            }
        }
    }
}

/// Panic payload rendered to text, when it carries any.
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> Option<String> {
    if let Some(s) = payload.downcast_ref::<&str>() {
        Some((*s).to_string())
    } else {
        payload.downcast_ref::<String>().cloned()
    }
}

/// One guarded kernel invocation. A panic inside the kernel surfaces as
/// `MeasurementFailure` instead of unwinding through the harness.
fn invoke(
    kernel: KernelFn,
    dataset: &Dataset<i32>,
    workers: usize,
    strategy: Strategy,
) -> Result<TaskValue, ParafoldError> {
    match catch_unwind(AssertUnwindSafe(|| kernel(dataset, workers))) {
        Ok(result) => result,
        Err(payload) => Err(ParafoldError::MeasurementFailure {
            strategy: strategy.name(),
            message: panic_message(payload),
        }),
    }
}

/// Runs one `(task, strategy)` pair through its warmup/measure cycle.
///
/// The first error, in warmup or measurement, fails the pair; there are no
/// retries and no partial sample sets on failure.
pub fn run(
    task: Task,
    strategy: Strategy,
    dataset: &Dataset<i32>,
    config: &BenchConfig,
) -> RunOutcome {
    let kernel = kernel_for(task, strategy);
    for _ in 0..config.warmup {
        if let Err(error) = invoke(kernel, dataset, config.workers, strategy) {
            return RunOutcome::failed(error);
        }
    }
    let mut samples = SampleSet::with_capacity(config.iterations);
    let mut value = None;
    for _ in 0..config.iterations {
        let started = Instant::now();
        match invoke(kernel, dataset, config.workers, strategy) {
            Ok(v) => {
                samples.push(started.elapsed());
                value = Some(v);
            }
            Err(error) => return RunOutcome::failed(error),
        }
    }
    RunOutcome::completed(value, samples)
}

/// Runs every applicable strategy for a named task with the default
/// configuration.
pub fn run_benchmark(task_name: &str, size: usize) -> Result<Vec<BenchmarkResult>, ParafoldError> {
    run_benchmark_with(task_name, size, &BenchConfig::default())
}

/// Runs every applicable strategy for a named task.
///
/// An unrecognised name returns `UnknownTask` before any dataset is
/// generated. The sequential baseline runs first so every speedup is
/// measured against a reference taken on the same dataset in the same
/// process; its own row always reads `1.00x`.
pub fn run_benchmark_with(
    task_name: &str,
    size: usize,
    config: &BenchConfig,
) -> Result<Vec<BenchmarkResult>, ParafoldError> {
    let task = Task::from_name(task_name)?;
    let dataset = Dataset::<i32>::generate(size, config.seed);
    let strategies = task.strategies();

    let baseline = run(task, Strategy::Sequential, &dataset, config);
    let baseline_mean = baseline.stats().mean;
    let mut results = Vec::with_capacity(strategies.len());
    results.push(baseline.into_result(task, Strategy::Sequential, size, baseline_mean));

    for strategy in strategies.into_iter().skip(1) {
        let outcome = run(task, strategy, &dataset, config);
        results.push(outcome.into_result(task, strategy, size, baseline_mean));
    }

    // Failed rows sort after every completed row; the stable sort keeps
    // declaration order across equal means.
    results.sort_by(|a, b| {
        let ka = (a.is_failed(), a.mean_ms());
        let kb = (b.is_failed(), b.mean_ms());
        ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> BenchConfig {
        BenchConfig { seed: 42, warmup: 1, iterations: 4, workers: 2 }
    }

    fn exploding_kernel(_: &Dataset<i32>, _: usize) -> Result<TaskValue, ParafoldError> {
        panic!("synthetic kernel failure")
    }

    #[test]
    fn test_run_completes_and_samples_each_iteration() {
        let dataset = Dataset::<i32>::generate(512, 42);
        let config = quick_config();
        let outcome = run(Task::FindPrimes, Strategy::Sequential, &dataset, &config);
        assert_eq!(outcome.phase, RunPhase::Completed);
        assert_eq!(outcome.samples.len(), config.iterations);
        assert_eq!(outcome.value, Some(Task::FindPrimes.oracle(&dataset)));
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_invoke_converts_panics_to_measurement_failure() {
        let dataset = Dataset::<i32>::generate(8, 42);
        let err = invoke(exploding_kernel, &dataset, 1, Strategy::StaticPool).unwrap_err();
        assert_eq!(
            err,
            ParafoldError::MeasurementFailure {
                strategy: Strategy::StaticPool.name(),
                message: Some("synthetic kernel failure".to_string()),
            }
        );
    }

    #[test]
    fn test_run_benchmark_unknown_task() {
        let err = run_benchmark("Sort Numbers", 100).unwrap_err();
        assert_eq!(err, ParafoldError::UnknownTask { name: "Sort Numbers".to_string() });
    }

    #[test]
    fn test_run_benchmark_row_per_strategy() {
        let results =
            run_benchmark_with("Max Frequency Of Elements", 256, &quick_config()).unwrap();
        let catalog = Task::MaxFrequency.strategies();
        assert_eq!(results.len(), catalog.len());

        let mut names: Vec<&str> = results.iter().map(|r| r.strategy.as_str()).collect();
        names.sort_unstable();
        let mut expected: Vec<&str> = catalog.iter().map(|s| s.name()).collect();
        expected.sort_unstable();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_run_benchmark_sorted_with_failures_last() {
        let results = run_benchmark_with("Divisible By 3 And 5", 256, &quick_config()).unwrap();
        for pair in results.windows(2) {
            let ka = (pair[0].is_failed(), pair[0].mean_ms());
            let kb = (pair[1].is_failed(), pair[1].mean_ms());
            assert!(ka <= kb, "rows out of order: {:?} then {:?}", ka, kb);
        }
    }

    #[test]
    fn test_run_benchmark_baseline_reads_one() {
        let results = run_benchmark_with("Count Above Average", 128, &quick_config()).unwrap();
        let baseline = results.iter().find(|r| r.strategy == Strategy::Sequential.name()).unwrap();
        assert_eq!(baseline.speedup, "1.00x");
        assert!(!baseline.is_failed());
    }

    #[test]
    fn test_run_benchmark_values_agree_with_oracle() {
        let config = quick_config();
        let dataset = Dataset::<i32>::generate(200, config.seed);
        let expected = Task::NonExtremeMax.oracle(&dataset);
        let results =
            run_benchmark_with("Maximum Of Non Extreme Elements", 200, &config).unwrap();
        for row in &results {
            if !row.is_failed() {
                assert_eq!(row.value, Some(expected), "strategy {}", row.strategy);
            }
        }
    }
}
