//! # **AboveMean Module** - *Count Above Average Reduction*
//!
//! Counts the elements strictly greater than the arithmetic mean of the
//! whole array, once per strategy in the catalog.
//!
//! ## Behaviour
//! - The threshold is the floor of `sum / len` over an `i64` sum. For
//!   integral elements `x > sum/len` exactly when `x > floor(sum/len)`, so
//!   the integer threshold preserves the strict comparison without floats.
//! - Every strategy computes the threshold in one sequential pass, then
//!   applies its own scheduling scheme to the counting pass. The combine
//!   step is a plain associative add, so any partitioning is valid and an
//!   empty input counts zero.

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::thread;

use crate::aliases::TaskValue;
use crate::enums::error::ParafoldError;
use crate::kernels::lanes::LANES;
use crate::kernels::partition::{DYNAMIC_GRAIN, chunk_ranges};
use crate::structs::dataset::Dataset;
#[cfg(target_arch = "x86_64")]
use crate::utils::avx2_available;

/// Floor of the arithmetic mean over an `i64` sum; `0` for an empty input.
#[inline]
fn floor_mean(data: &[i32]) -> i64 {
    if data.is_empty() {
        return 0;
    }
    let sum: i64 = data.iter().map(|&v| v as i64).sum();
    sum.div_euclid(data.len() as i64)
}

/// Elements of `chunk` strictly above `mean`.
#[inline]
fn count_above(chunk: &[i32], mean: i64) -> i64 {
    chunk.iter().filter(|&&v| (v as i64) > mean).count() as i64
}

/// Sequential oracle: one pass to sum, divide, one pass to count.
pub fn oracle(dataset: &Dataset<i32>) -> TaskValue {
    let data = dataset.as_slice();
    count_above(data, floor_mean(data))
}

/// Baseline strategy; the oracle behind the uniform kernel signature.
pub fn sequential(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    Ok(oracle(dataset))
}

/// Rayon parallel iterator; partitioning is the runtime's affair.
#[cfg(feature = "parallel_proc")]
pub fn declarative(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    use rayon::prelude::*;

    let data = dataset.as_slice();
    let mean = floor_mean(data);
    Ok(data.par_iter().filter(|&&v| (v as i64) > mean).count() as TaskValue)
}

/// One contiguous chunk per worker, sized up front, partials merged by
/// atomic add.
pub fn static_pool(dataset: &Dataset<i32>, workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    let mean = floor_mean(data);
    let total = AtomicI64::new(0);
    thread::scope(|s| {
        for range in chunk_ranges::<i32>(data.len(), workers) {
            let total = &total;
            s.spawn(move || {
                let local = count_above(&data[range], mean);
                total.fetch_add(local, Ordering::Relaxed);
            });
        }
    });
    Ok(total.load(Ordering::Relaxed))
}

/// Workers claim fixed-size chunks off a shared cursor until none remain,
/// so an uneven load cannot strand one thread with the whole tail.
pub fn dynamic_pool(dataset: &Dataset<i32>, workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    let mean = floor_mean(data);
    let cursor = AtomicUsize::new(0);
    let total = AtomicI64::new(0);
    thread::scope(|s| {
        for _ in 0..workers.max(1) {
            let cursor = &cursor;
            let total = &total;
            s.spawn(move || {
                let mut local = 0i64;
                loop {
                    let start = cursor.fetch_add(DYNAMIC_GRAIN, Ordering::Relaxed);
                    if start >= data.len() {
                        break;
                    }
                    let end = usize::min(start + DYNAMIC_GRAIN, data.len());
                    local += count_above(&data[start..end], mean);
                }
                total.fetch_add(local, Ordering::Relaxed);
            });
        }
    });
    Ok(total.load(Ordering::Relaxed))
}

/// Explicit array of per-core closures, dispatched and joined by hand,
/// each merging once into a mutex-guarded accumulator.
pub fn parallel_invoke(dataset: &Dataset<i32>, workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    let mean = floor_mean(data);
    let total = Mutex::new(0i64);
    thread::scope(|s| {
        let actions: Vec<Box<dyn FnOnce() + Send + '_>> = chunk_ranges::<i32>(data.len(), workers)
            .into_iter()
            .map(|range| {
                let total = &total;
                Box::new(move || {
                    let local = count_above(&data[range], mean);
                    *total.lock().unwrap() += local;
                }) as Box<dyn FnOnce() + Send + '_>
            })
            .collect();
        for action in actions {
            s.spawn(action);
        }
    });
    Ok(total.into_inner().unwrap_or_else(|e| e.into_inner()))
}

/// One spawned handle per chunk; partials come back through the handles
/// and are reduced after joining, with no shared state during execution.
pub fn future_fanout(dataset: &Dataset<i32>, workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    let mean = floor_mean(data);
    let total = thread::scope(|s| {
        let handles: Vec<_> = chunk_ranges::<i32>(data.len(), workers)
            .into_iter()
            .map(|range| s.spawn(move || count_above(&data[range], mean)))
            .collect();
        let mut total = 0i64;
        for handle in handles {
            match handle.join() {
                Ok(partial) => total += partial,
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
        total
    });
    Ok(total)
}

/// Eight elements per iteration over four independent accumulators, scalar
/// tail for the remainder.
pub fn unrolled(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    let mean = floor_mean(data);
    let mut acc = [0i64; 4];
    let mut chunks = data.chunks_exact(8);
    for w in chunks.by_ref() {
        acc[0] += ((w[0] as i64) > mean) as i64 + ((w[4] as i64) > mean) as i64;
        acc[1] += ((w[1] as i64) > mean) as i64 + ((w[5] as i64) > mean) as i64;
        acc[2] += ((w[2] as i64) > mean) as i64 + ((w[6] as i64) > mean) as i64;
        acc[3] += ((w[3] as i64) > mean) as i64 + ((w[7] as i64) > mean) as i64;
    }
    let mut total = acc[0] + acc[1] + acc[2] + acc[3];
    for &v in chunks.remainder() {
        total += ((v as i64) > mean) as i64;
    }
    Ok(total)
}

/// `i32x8` lanes: splat the threshold, compare, popcount the mask.
pub fn portable_simd(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    use std::simd::Simd;
    use std::simd::cmp::SimdPartialOrd;

    let data = dataset.as_slice();
    let mean = floor_mean(data);
    // mean of values in [0, 25000) always fits a lane
    let threshold = Simd::<i32, LANES>::splat(mean as i32);
    let mut count = 0i64;
    let mut chunks = data.chunks_exact(LANES);
    for w in chunks.by_ref() {
        let v = Simd::<i32, LANES>::from_slice(w);
        count += v.simd_gt(threshold).to_bitmask().count_ones() as i64;
    }
    for &v in chunks.remainder() {
        count += ((v as i64) > mean) as i64;
    }
    Ok(count)
}

/// 256-bit compare-and-accumulate behind the runtime AVX2 probe.
#[cfg(target_arch = "x86_64")]
pub fn avx2(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    if !avx2_available() {
        return Err(ParafoldError::avx2_unsupported());
    }
    let data = dataset.as_slice();
    let mean = floor_mean(data);
    Ok(unsafe { count_above_avx2(data, mean) })
}

/// 256-bit compare-and-accumulate behind the runtime AVX2 probe.
#[cfg(not(target_arch = "x86_64"))]
pub fn avx2(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    let _ = dataset;
    Err(ParafoldError::avx2_unsupported())
}

/// Lane counters increment by subtracting the all-ones compare mask; one
/// horizontal add collapses them at the end.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn count_above_avx2(data: &[i32], mean: i64) -> i64 {
    use std::arch::x86_64::*;

    use crate::kernels::lanes::hsum_epi32;

    unsafe {
        let threshold = _mm256_set1_epi32(mean as i32);
        let mut lane_counts = _mm256_setzero_si256();
        let mut chunks = data.chunks_exact(LANES);
        for w in chunks.by_ref() {
            let v = _mm256_loadu_si256(w.as_ptr() as *const __m256i);
            let gt = _mm256_cmpgt_epi32(v, threshold);
            lane_counts = _mm256_sub_epi32(lane_counts, gt);
        }
        let mut count = hsum_epi32(lane_counts) as i64;
        for &v in chunks.remainder() {
            count += ((v as i64) > mean) as i64;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_known_values() {
        // sum 20, mean 4: only 10 is strictly above
        let ds = Dataset::from_values(&[1, 2, 3, 4, 10]);
        assert_eq!(oracle(&ds), 1);
    }

    #[test]
    fn test_oracle_all_equal_counts_zero() {
        let ds = Dataset::from_values(&[7, 7, 7, 7]);
        assert_eq!(oracle(&ds), 0);
    }

    #[test]
    fn test_oracle_degenerate_sizes() {
        assert_eq!(oracle(&Dataset::from_values(&[])), 0);
        assert_eq!(oracle(&Dataset::from_values(&[5])), 0);
        assert_eq!(oracle(&Dataset::from_values(&[1, 2])), 1);
    }

    #[test]
    fn test_floor_mean_preserves_strict_comparison() {
        // sum 7, len 2: true mean 3.5, floor 3; 4 is above both
        let ds = Dataset::from_values(&[3, 4]);
        assert_eq!(oracle(&ds), 1);
    }

    #[test]
    fn test_threaded_strategies_match_oracle() {
        let ds = Dataset::<i32>::generate(1000, 42);
        let expected = oracle(&ds);
        for kernel in [static_pool, dynamic_pool, parallel_invoke, future_fanout] {
            for workers in [1, 3, 8] {
                assert_eq!(kernel(&ds, workers).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_lane_strategies_match_oracle() {
        for len in [0, 1, 2, 7, 8, 9, 1000] {
            let ds = Dataset::<i32>::generate(len, 42);
            let expected = oracle(&ds);
            assert_eq!(unrolled(&ds, 1).unwrap(), expected);
            assert_eq!(portable_simd(&ds, 1).unwrap(), expected);
        }
    }

    #[test]
    fn test_avx2_matches_or_reports_unsupported() {
        let ds = Dataset::<i32>::generate(1000, 42);
        match avx2(&ds, 1) {
            Ok(v) => assert_eq!(v, oracle(&ds)),
            Err(e) => assert_eq!(e, ParafoldError::avx2_unsupported()),
        }
    }
}

#[cfg(all(test, feature = "parallel_proc"))]
mod parallel_tests {
    use super::*;

    #[test]
    fn test_declarative_matches_oracle() {
        for len in [0, 1, 2, 1000] {
            let ds = Dataset::<i32>::generate(len, 42);
            assert_eq!(declarative(&ds, 1).unwrap(), oracle(&ds));
        }
    }
}
