//! # **Run Statistics Module** - *Timing Sample Reduction*
//!
//! Condenses the measured samples of one benchmark run into mean, sample
//! standard deviation and standard error, and derives speedup ratios
//! against the sequential baseline.
//!
//! All figures are in milliseconds, matching the external display unit.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::aliases::SampleSet;

/// # RunStatistics
///
/// Summary statistics over the measured samples of one run.
///
/// ## Behaviour
/// - Uses the sample (`n - 1`) form of the standard deviation; one sample
/// or none yields zero spread rather than a division by zero.
/// - The standard error is `σ / √n`, the figure quoted alongside the mean
/// in reports.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct RunStatistics {
    /// Mean execution time in milliseconds.
    pub mean: f64,
    /// Standard error of the mean in milliseconds.
    pub std_error: f64,
    /// Sample standard deviation in milliseconds.
    pub std_dev: f64,
}

impl RunStatistics {
    /// Reduces measured samples to summary statistics.
    ///
    /// An empty sample set reduces to all zeros, which a failed run's
    /// record carries.
    pub fn from_samples(samples: &SampleSet) -> Self {
        let n = samples.len();
        if n == 0 {
            return RunStatistics::default();
        }
        let ms: Vec<f64> = samples.iter().map(|d| d.as_secs_f64() * 1_000.0).collect();
        let mean = ms.iter().sum::<f64>() / n as f64;
        if n == 1 {
            return RunStatistics { mean, std_error: 0.0, std_dev: 0.0 };
        }
        let variance = ms.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
        let std_dev = variance.sqrt();
        let std_error = std_dev / (n as f64).sqrt();
        RunStatistics { mean, std_error, std_dev }
    }
}

impl Display for RunStatistics {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:.3} ms ± {:.3} ms", self.mean, self.std_error)
    }
}

/// Speedup of a run against the sequential baseline.
///
/// Defined as `baseline_mean / mean` when both are positive. Degenerate
/// timings (zero or negative on either side) report `1.0`, keeping tiny
/// datasets whose runs round to zero from dividing by it.
pub fn compute_speedup(baseline_mean: f64, mean: f64) -> f64 {
    if baseline_mean > 0.0 && mean > 0.0 { baseline_mean / mean } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_from_samples_known_values() {
        let samples =
            vec![Duration::from_millis(2), Duration::from_millis(4), Duration::from_millis(6)];
        let stats = RunStatistics::from_samples(&samples);
        assert!((stats.mean - 4.0).abs() < EPS);
        assert!((stats.std_dev - 2.0).abs() < EPS);
        assert!((stats.std_error - 2.0 / 3f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_from_samples_identical_samples_have_no_spread() {
        let samples = vec![Duration::from_millis(5); 4];
        let stats = RunStatistics::from_samples(&samples);
        assert!((stats.mean - 5.0).abs() < EPS);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.std_error, 0.0);
    }

    #[test]
    fn test_from_samples_degenerate_counts() {
        let empty = RunStatistics::from_samples(&vec![]);
        assert_eq!(empty, RunStatistics::default());

        let single = RunStatistics::from_samples(&vec![Duration::from_millis(3)]);
        assert!((single.mean - 3.0).abs() < EPS);
        assert_eq!(single.std_dev, 0.0);
        assert_eq!(single.std_error, 0.0);
    }

    #[test]
    fn test_compute_speedup_ratio() {
        assert!((compute_speedup(100.0, 50.0) - 2.0).abs() < EPS);
        assert!((compute_speedup(100.0, 200.0) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_compute_speedup_degenerate_timings() {
        assert_eq!(compute_speedup(0.0, 50.0), 1.0);
        assert_eq!(compute_speedup(50.0, 0.0), 1.0);
        assert_eq!(compute_speedup(0.0, 0.0), 1.0);
    }

    #[test]
    fn test_display_quotes_mean_and_error() {
        let samples =
            vec![Duration::from_millis(2), Duration::from_millis(4), Duration::from_millis(6)];
        let stats = RunStatistics::from_samples(&samples);
        assert_eq!(format!("{stats}"), "4.000 ms ± 1.155 ms");
    }
}
