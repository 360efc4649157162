//! # **Task Module** - *The Five Reduction Problems*
//!
//! Identifies each benchmark task, parses external task names, and exposes
//! each task's sequential oracle and its ordered strategy catalog.
//!
//! The oracle plays two roles: it is the correctness reference every other
//! strategy is checked against, and its mean execution time is the baseline
//! all speedup ratios are computed from.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::aliases::TaskValue;
use crate::enums::error::ParafoldError;
use crate::enums::strategy::Strategy;
use crate::kernels::reduction::{above_mean, divisible, mode_frequency, non_extreme_max, primes};
use crate::structs::dataset::Dataset;

/// # Task
///
/// One of the five numeric reduction problems under benchmark.
///
/// ## Purpose
/// - Names the problem for the external shell (`name` / `from_name` round-trip).
/// - Dispatches to the sequential oracle kernel.
/// - Owns the ordered list of strategies applicable to it.
///
/// ## Behaviour
/// - Count-valued tasks combine partials additively; the maximum task
/// combines by `max` with an `i64::MIN` identity; the frequency task merges
/// per-worker maps by summing counts.
/// - `MaxFrequency` omits the unrolled and SIMD strategies: map-valued
/// accumulation has no lane-wise form.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Task {
    /// Count of elements strictly greater than the arithmetic mean.
    CountAboveAverage,
    /// Count of elements divisible by both 3 and 5.
    DivisibleBy3And5,
    /// Count of prime elements, by trial division.
    FindPrimes,
    /// Maximum over elements that are not local extrema.
    NonExtremeMax,
    /// Highest occurrence count of any single value.
    MaxFrequency,
}

impl Task {
    /// Every task, in canonical declaration order.
    pub const ALL: [Task; 5] = [
        Task::CountAboveAverage,
        Task::DivisibleBy3And5,
        Task::FindPrimes,
        Task::NonExtremeMax,
        Task::MaxFrequency,
    ];

    /// Canonical display name, as consumed by the persistence and charting
    /// collaborators and accepted back by [`Task::from_name`].
    pub const fn name(&self) -> &'static str {
        match self {
            Task::CountAboveAverage => "Count Above Average",
            Task::DivisibleBy3And5 => "Divisible By 3 And 5",
            Task::FindPrimes => "Find Prime Numbers",
            Task::NonExtremeMax => "Maximum Of Non Extreme Elements",
            Task::MaxFrequency => "Max Frequency Of Elements",
        }
    }

    /// Resolves an external task name.
    ///
    /// Unrecognised names surface [`ParafoldError::UnknownTask`] immediately;
    /// no dataset is generated and no measurement starts.
    pub fn from_name(name: &str) -> Result<Self, ParafoldError> {
        Task::ALL
            .iter()
            .copied()
            .find(|t| t.name() == name.trim())
            .ok_or_else(|| ParafoldError::UnknownTask { name: name.to_string() })
    }

    /// Runs the sequential oracle for this task.
    pub fn oracle(&self, dataset: &Dataset<i32>) -> TaskValue {
        match self {
            Task::CountAboveAverage => above_mean::oracle(dataset),
            Task::DivisibleBy3And5 => divisible::oracle(dataset),
            Task::FindPrimes => primes::oracle(dataset),
            Task::NonExtremeMax => non_extreme_max::oracle(dataset),
            Task::MaxFrequency => mode_frequency::oracle(dataset),
        }
    }

    /// Ordered strategy catalog for this task.
    ///
    /// Order follows [`Strategy`] declaration order, which also breaks ties
    /// when results are sorted by mean execution time.
    pub fn strategies(&self) -> Vec<Strategy> {
        let mut list = vec![Strategy::Sequential];
        #[cfg(feature = "parallel_proc")]
        list.push(Strategy::Declarative);
        list.push(Strategy::StaticPool);
        list.push(Strategy::DynamicPool);
        list.push(Strategy::ParallelInvoke);
        list.push(Strategy::FutureFanout);
        if self.vectorisable() {
            list.push(Strategy::Unrolled);
            list.push(Strategy::PortableSimd);
            list.push(Strategy::Avx2);
        }
        list
    }

    /// True when the task's reduction has a lane-wise form.
    #[inline]
    pub const fn vectorisable(&self) -> bool {
        !matches!(self, Task::MaxFrequency)
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_roundtrip() {
        for task in Task::ALL {
            assert_eq!(Task::from_name(task.name()).unwrap(), task);
        }
    }

    #[test]
    fn test_from_name_trims_whitespace() {
        assert_eq!(Task::from_name("  Find Prime Numbers ").unwrap(), Task::FindPrimes);
    }

    #[test]
    fn test_from_name_unknown() {
        let err = Task::from_name("Sort Numbers").unwrap_err();
        assert_eq!(err, ParafoldError::UnknownTask { name: "Sort Numbers".to_string() });
    }

    #[test]
    fn test_catalog_order_starts_at_baseline() {
        for task in Task::ALL {
            let list = task.strategies();
            assert_eq!(list[0], Strategy::Sequential);
            assert!(list.iter().skip(1).all(|s| !s.is_baseline()));
        }
    }

    #[test]
    fn test_frequency_task_omits_lane_strategies() {
        let list = Task::MaxFrequency.strategies();
        assert!(!list.contains(&Strategy::Unrolled));
        assert!(!list.contains(&Strategy::PortableSimd));
        assert!(!list.contains(&Strategy::Avx2));

        let full = Task::FindPrimes.strategies();
        assert_eq!(full.len(), list.len() + 3);
    }
}
