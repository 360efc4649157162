//! # **Benchmark Result Module** - *Per-Run Result Record*
//!
//! The flat record one `(task, strategy)` run reduces to: identifying
//! names, the reduction value, formatted timing and speedup strings, the
//! raw samples, summary statistics and a wall-clock timestamp.
//!
//! Formatted strings use the [`crate::utils`] format/parse pairs, so the
//! persistence and charting collaborators can recover the numbers without
//! reaching into the raw samples.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

use crate::aliases::{SampleSet, TaskValue};
use crate::enums::error::ParafoldError;
use crate::enums::run_phase::RunPhase;
use crate::enums::strategy::Strategy;
use crate::enums::task::Task;
use crate::structs::run_stats::RunStatistics;
use crate::utils::{format_duration, format_speedup, now_epoch_millis};

/// Placeholder carried in the formatted fields of a failed run.
pub const FAILED_LABEL: &str = "failed";

/// # BenchmarkResult
///
/// Outcome record of one `(task, strategy)` benchmark run.
///
/// ## Behaviour
/// - A completed run carries the reduction value, formatted mean execution
/// time, formatted speedup against the sequential baseline, and the raw
/// samples behind them.
/// - A failed run carries the error instead: the value is absent, both
/// formatted fields read [`FAILED_LABEL`], the samples are empty and the
/// statistics are all zero.
/// - `timestamp_ms` is Unix epoch milliseconds at record assembly, so a
/// result set orders by wall clock even across processes.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkResult {
    /// Task display name.
    pub task: String,
    /// Number of elements in the dataset.
    pub dataset_size: usize,
    /// Strategy display name.
    pub strategy: String,
    /// Reduction value from the final measured iteration; absent on failure.
    pub value: Option<TaskValue>,
    /// Mean execution time, unit-tiered; [`FAILED_LABEL`] on failure.
    pub execution_time: String,
    /// Speedup against the sequential baseline, e.g. `3.52x`;
    /// [`FAILED_LABEL`] on failure.
    pub speedup: String,
    /// Unix epoch milliseconds at record assembly.
    pub timestamp_ms: i64,
    /// Raw measured samples behind the statistics.
    pub samples: SampleSet,
    /// Terminal phase of the run.
    pub phase: RunPhase,
    /// Failure cause; present exactly when the phase is `Failed`.
    pub error: Option<ParafoldError>,
    /// Summary statistics over the measured samples.
    pub stats: RunStatistics,
}

impl BenchmarkResult {
    /// Record for a run that completed all iterations.
    pub fn completed(
        task: Task,
        strategy: Strategy,
        dataset_size: usize,
        value: TaskValue,
        samples: SampleSet,
        speedup: f64,
    ) -> Self {
        let stats = RunStatistics::from_samples(&samples);
        BenchmarkResult {
            task: task.name().to_string(),
            dataset_size,
            strategy: strategy.name().to_string(),
            value: Some(value),
            execution_time: format_duration(Duration::from_secs_f64(stats.mean / 1_000.0)),
            speedup: format_speedup(speedup),
            timestamp_ms: now_epoch_millis(),
            samples,
            phase: RunPhase::Completed,
            error: None,
            stats,
        }
    }

    /// Record for a run aborted by an error.
    pub fn failed(task: Task, strategy: Strategy, dataset_size: usize, error: ParafoldError) -> Self {
        BenchmarkResult {
            task: task.name().to_string(),
            dataset_size,
            strategy: strategy.name().to_string(),
            value: None,
            execution_time: FAILED_LABEL.to_string(),
            speedup: FAILED_LABEL.to_string(),
            timestamp_ms: now_epoch_millis(),
            samples: SampleSet::new(),
            phase: RunPhase::Failed,
            error: Some(error),
            stats: RunStatistics::default(),
        }
    }

    /// True when the run aborted before completing its iterations.
    #[inline]
    pub fn is_failed(&self) -> bool {
        self.phase == RunPhase::Failed
    }

    /// Mean execution time in milliseconds; `0.0` on a failed run.
    #[inline]
    pub fn mean_ms(&self) -> f64 {
        self.stats.mean
    }

    /// Assembly time as a UTC datetime.
    #[cfg(feature = "datetime_ops")]
    pub fn timestamp_utc(&self) -> time::OffsetDateTime {
        time::OffsetDateTime::from_unix_timestamp_nanos(self.timestamp_ms as i128 * 1_000_000)
            .unwrap_or(time::OffsetDateTime::UNIX_EPOCH)
    }

    /// Assembly time as RFC 3339 text, e.g. `2025-07-01T09:30:00.123Z`.
    ///
    /// Falls back to the raw epoch milliseconds if the timestamp cannot be
    /// rendered.
    #[cfg(feature = "datetime_ops")]
    pub fn timestamp_rfc3339(&self) -> String {
        self.timestamp_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| self.timestamp_ms.to_string())
    }
}

impl Display for BenchmarkResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} | {} elements | {} | value {} | {} | {}",
            self.task,
            self.dataset_size,
            self.strategy,
            match self.value {
                Some(v) => v.to_string(),
                None => FAILED_LABEL.to_string(),
            },
            self.execution_time,
            self.speedup
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_record_formats_its_fields() {
        let samples =
            vec![Duration::from_millis(2), Duration::from_millis(4), Duration::from_millis(6)];
        let result = BenchmarkResult::completed(
            Task::FindPrimes,
            Strategy::StaticPool,
            1000,
            168,
            samples,
            2.5,
        );
        assert_eq!(result.task, "Find Prime Numbers");
        assert_eq!(result.strategy, "Static Worker Pool");
        assert_eq!(result.value, Some(168));
        assert_eq!(result.execution_time, "4.000 ms");
        assert_eq!(result.speedup, "2.50x");
        assert_eq!(result.phase, RunPhase::Completed);
        assert!(result.error.is_none());
        assert!(!result.is_failed());
        assert!((result.mean_ms() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_failed_record_carries_the_error() {
        let result = BenchmarkResult::failed(
            Task::FindPrimes,
            Strategy::Avx2,
            1000,
            ParafoldError::avx2_unsupported(),
        );
        assert!(result.is_failed());
        assert_eq!(result.value, None);
        assert_eq!(result.execution_time, FAILED_LABEL);
        assert_eq!(result.speedup, FAILED_LABEL);
        assert!(result.samples.is_empty());
        assert_eq!(result.stats, RunStatistics::default());
        assert_eq!(result.error, Some(ParafoldError::avx2_unsupported()));
    }

    #[test]
    fn test_record_timestamps_are_wall_clock() {
        let result = BenchmarkResult::completed(
            Task::CountAboveAverage,
            Strategy::Sequential,
            10,
            3,
            vec![Duration::from_micros(10)],
            1.0,
        );
        // 2020-01-01 in epoch millis
        assert!(result.timestamp_ms > 1_577_836_800_000);
    }

    #[test]
    fn test_display_is_one_row() {
        let result = BenchmarkResult::completed(
            Task::DivisibleBy3And5,
            Strategy::Sequential,
            100,
            7,
            vec![Duration::from_millis(1)],
            1.0,
        );
        let row = format!("{result}");
        assert!(row.contains("Divisible By 3 And 5"));
        assert!(row.contains("100 elements"));
        assert!(row.contains("value 7"));
        assert!(row.contains("1.00x"));
    }

    #[cfg(feature = "datetime_ops")]
    #[test]
    fn test_timestamp_utc_matches_epoch_millis() {
        let result = BenchmarkResult::completed(
            Task::FindPrimes,
            Strategy::Sequential,
            10,
            4,
            vec![Duration::from_micros(10)],
            1.0,
        );
        let utc = result.timestamp_utc();
        assert_eq!(utc.unix_timestamp(), result.timestamp_ms / 1000);

        let text = result.timestamp_rfc3339();
        assert!(text.ends_with('Z'), "not UTC-suffixed: {text}");
        let parsed =
            time::OffsetDateTime::parse(&text, &time::format_description::well_known::Rfc3339)
                .unwrap();
        assert_eq!(parsed.unix_timestamp(), result.timestamp_ms / 1000);
    }
}
