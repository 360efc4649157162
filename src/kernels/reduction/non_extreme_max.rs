//! # **Non-Extreme Max Module** - *Maximum Of Non Extreme Elements Reduction*
//!
//! Finds the largest element that is not a strict local peak or trough
//! relative to its neighbours.
//!
//! ## Behaviour
//! - Interior elements are extreme when strictly greater than both
//!   neighbours or strictly less than both. Plateau members never qualify
//!   as extreme, so equal-neighbour runs stay candidates.
//! - Boundary elements have one neighbour and are extreme exactly when
//!   they differ from it.
//! - Datasets shorter than two elements have no qualifying candidates and
//!   reduce to [`NO_QUALIFYING_ELEMENT`].
//! - The neighbour test always indexes the full dataset, so chunked
//!   kernels agree with the sequential result across partition seams.
//! - The combine step is `max`; the sentinel is its identity.

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::thread;

use crate::aliases::{ChunkRange, TaskValue};
use crate::enums::error::ParafoldError;
use crate::kernels::lanes::LANES;
use crate::kernels::partition::{DYNAMIC_GRAIN, chunk_ranges};
use crate::structs::dataset::Dataset;
#[cfg(target_arch = "x86_64")]
use crate::utils::avx2_available;

/// Reduction result when no element qualifies.
///
/// Doubles as the identity of the `max` combine, so partial results from
/// empty or all-extreme chunks merge without special cases.
pub const NO_QUALIFYING_ELEMENT: TaskValue = TaskValue::MIN;

/// Whether `data[i]` is a strict local peak or trough.
///
/// Boundary elements compare against their single neighbour. A dataset of
/// one element has no neighbour at all and is treated as extreme.
pub(crate) fn is_extreme(data: &[i32], i: usize) -> bool {
    if data.len() < 2 {
        return true;
    }
    let last = data.len() - 1;
    if i == 0 {
        return data[0] != data[1];
    }
    if i == last {
        return data[last] != data[last - 1];
    }
    let (prev, cur, next) = (data[i - 1], data[i], data[i + 1]);
    (cur > prev && cur > next) || (cur < prev && cur < next)
}

/// Candidate value at `i`, or the sentinel when the element is extreme.
#[inline]
fn candidate(data: &[i32], i: usize) -> i64 {
    if is_extreme(data, i) {
        NO_QUALIFYING_ELEMENT
    } else {
        data[i] as i64
    }
}

/// Largest candidate over a global index range.
fn max_candidate(data: &[i32], range: ChunkRange) -> i64 {
    let mut best = NO_QUALIFYING_ELEMENT;
    for i in range {
        best = best.max(candidate(data, i));
    }
    best
}

/// Sequential oracle: one candidate sweep over the full index range.
pub fn oracle(dataset: &Dataset<i32>) -> TaskValue {
    let data = dataset.as_slice();
    if data.len() < 2 {
        return NO_QUALIFYING_ELEMENT;
    }
    max_candidate(data, 0..data.len())
}

/// Baseline strategy; the oracle behind the uniform kernel signature.
pub fn sequential(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    Ok(oracle(dataset))
}

/// Rayon parallel iterator over indices; partitioning is the runtime's
/// affair.
#[cfg(feature = "parallel_proc")]
pub fn declarative(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    use rayon::prelude::*;

    let data = dataset.as_slice();
    if data.len() < 2 {
        return Ok(NO_QUALIFYING_ELEMENT);
    }
    Ok((0..data.len())
        .into_par_iter()
        .filter(|&i| !is_extreme(data, i))
        .map(|i| data[i] as i64)
        .max()
        .unwrap_or(NO_QUALIFYING_ELEMENT))
}

/// One contiguous index range per worker, partials merged by atomic max.
pub fn static_pool(dataset: &Dataset<i32>, workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    if data.len() < 2 {
        return Ok(NO_QUALIFYING_ELEMENT);
    }
    let best = AtomicI64::new(NO_QUALIFYING_ELEMENT);
    thread::scope(|s| {
        for range in chunk_ranges::<i32>(data.len(), workers) {
            let best = &best;
            s.spawn(move || {
                let local = max_candidate(data, range);
                best.fetch_max(local, Ordering::Relaxed);
            });
        }
    });
    Ok(best.load(Ordering::Relaxed))
}

/// Workers claim fixed-size index ranges off a shared cursor until none
/// remain.
pub fn dynamic_pool(dataset: &Dataset<i32>, workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    if data.len() < 2 {
        return Ok(NO_QUALIFYING_ELEMENT);
    }
    let cursor = AtomicUsize::new(0);
    let best = AtomicI64::new(NO_QUALIFYING_ELEMENT);
    thread::scope(|s| {
        for _ in 0..workers.max(1) {
            let cursor = &cursor;
            let best = &best;
            s.spawn(move || {
                let mut local = NO_QUALIFYING_ELEMENT;
                loop {
                    let start = cursor.fetch_add(DYNAMIC_GRAIN, Ordering::Relaxed);
                    if start >= data.len() {
                        break;
                    }
                    let end = usize::min(start + DYNAMIC_GRAIN, data.len());
                    local = local.max(max_candidate(data, start..end));
                }
                best.fetch_max(local, Ordering::Relaxed);
            });
        }
    });
    Ok(best.load(Ordering::Relaxed))
}

/// Explicit array of per-core closures, each merging once into a
/// mutex-guarded maximum.
pub fn parallel_invoke(dataset: &Dataset<i32>, workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    if data.len() < 2 {
        return Ok(NO_QUALIFYING_ELEMENT);
    }
    let best = Mutex::new(NO_QUALIFYING_ELEMENT);
    thread::scope(|s| {
        let actions: Vec<Box<dyn FnOnce() + Send + '_>> = chunk_ranges::<i32>(data.len(), workers)
            .into_iter()
            .map(|range| {
                let best = &best;
                Box::new(move || {
                    let local = max_candidate(data, range);
                    let mut guard = best.lock().unwrap();
                    if local > *guard {
                        *guard = local;
                    }
                }) as Box<dyn FnOnce() + Send + '_>
            })
            .collect();
        for action in actions {
            s.spawn(action);
        }
    });
    Ok(best.into_inner().unwrap_or_else(|e| e.into_inner()))
}

/// One spawned handle per index range; partials reduced after joining.
pub fn future_fanout(dataset: &Dataset<i32>, workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    if data.len() < 2 {
        return Ok(NO_QUALIFYING_ELEMENT);
    }
    let best = thread::scope(|s| {
        let handles: Vec<_> = chunk_ranges::<i32>(data.len(), workers)
            .into_iter()
            .map(|range| s.spawn(move || max_candidate(data, range)))
            .collect();
        let mut best = NO_QUALIFYING_ELEMENT;
        for handle in handles {
            match handle.join() {
                Ok(partial) => best = best.max(partial),
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
        best
    });
    Ok(best)
}

/// Eight indices per iteration over four independent running maxima.
pub fn unrolled(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    if data.len() < 2 {
        return Ok(NO_QUALIFYING_ELEMENT);
    }
    let mut acc = [NO_QUALIFYING_ELEMENT; 4];
    let mut i = 0usize;
    while i + 8 <= data.len() {
        acc[0] = acc[0].max(candidate(data, i)).max(candidate(data, i + 4));
        acc[1] = acc[1].max(candidate(data, i + 1)).max(candidate(data, i + 5));
        acc[2] = acc[2].max(candidate(data, i + 2)).max(candidate(data, i + 6));
        acc[3] = acc[3].max(candidate(data, i + 3)).max(candidate(data, i + 7));
        i += 8;
    }
    let mut best = acc[0].max(acc[1]).max(acc[2]).max(acc[3]);
    while i < data.len() {
        best = best.max(candidate(data, i));
        i += 1;
    }
    Ok(best)
}

/// `i32x8` lanes over interior windows: extremes are masked down to
/// `i32::MIN` before a lane-wise max, boundaries and the remainder stay
/// scalar.
///
/// Values are assumed to lie above `i32::MIN`, which the generator range
/// guarantees.
pub fn portable_simd(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    use std::simd::Select;
    use std::simd::Simd;
    use std::simd::cmp::SimdPartialOrd;
    use std::simd::num::SimdInt;

    let data = dataset.as_slice();
    if data.len() < 2 {
        return Ok(NO_QUALIFYING_ELEMENT);
    }
    let mut best = candidate(data, 0).max(candidate(data, data.len() - 1));
    let floor = Simd::<i32, LANES>::splat(i32::MIN);
    let interior_end = data.len() - 1;
    let mut i = 1usize;
    while i + LANES <= interior_end {
        let prev = Simd::<i32, LANES>::from_slice(&data[i - 1..i - 1 + LANES]);
        let cur = Simd::<i32, LANES>::from_slice(&data[i..i + LANES]);
        let next = Simd::<i32, LANES>::from_slice(&data[i + 1..i + 1 + LANES]);
        let peak = cur.simd_gt(prev) & cur.simd_gt(next);
        let trough = cur.simd_lt(prev) & cur.simd_lt(next);
        let masked = (peak | trough).select(floor, cur);
        let m = masked.reduce_max();
        if m != i32::MIN {
            best = best.max(m as i64);
        }
        i += LANES;
    }
    while i < interior_end {
        best = best.max(candidate(data, i));
        i += 1;
    }
    Ok(best)
}

/// 256-bit interior windows behind the runtime AVX2 probe.
#[cfg(target_arch = "x86_64")]
pub fn avx2(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    if !avx2_available() {
        return Err(ParafoldError::avx2_unsupported());
    }
    let data = dataset.as_slice();
    if data.len() < 2 {
        return Ok(NO_QUALIFYING_ELEMENT);
    }
    Ok(unsafe { non_extreme_max_avx2(data) })
}

/// 256-bit interior windows behind the runtime AVX2 probe.
#[cfg(not(target_arch = "x86_64"))]
pub fn avx2(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    let _ = dataset;
    Err(ParafoldError::avx2_unsupported())
}

/// Extremes are blended down to `i32::MIN` before a running 256-bit max.
///
/// `_mm256_blendv_epi8` keys off the high bit of every byte, which the
/// all-ones compare masks set uniformly across each 32-bit lane.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn non_extreme_max_avx2(data: &[i32]) -> i64 {
    use std::arch::x86_64::*;

    use crate::kernels::lanes::hmax_epi32;

    unsafe {
        let floor = _mm256_set1_epi32(i32::MIN);
        let mut lane_best = floor;
        let interior_end = data.len() - 1;
        let mut i = 1usize;
        while i + LANES <= interior_end {
            let prev = _mm256_loadu_si256(data.as_ptr().add(i - 1) as *const __m256i);
            let cur = _mm256_loadu_si256(data.as_ptr().add(i) as *const __m256i);
            let next = _mm256_loadu_si256(data.as_ptr().add(i + 1) as *const __m256i);
            let peak = _mm256_and_si256(_mm256_cmpgt_epi32(cur, prev), _mm256_cmpgt_epi32(cur, next));
            let trough =
                _mm256_and_si256(_mm256_cmpgt_epi32(prev, cur), _mm256_cmpgt_epi32(next, cur));
            let extreme = _mm256_or_si256(peak, trough);
            let masked = _mm256_blendv_epi8(cur, floor, extreme);
            lane_best = _mm256_max_epi32(lane_best, masked);
            i += LANES;
        }
        let mut best = candidate(data, 0).max(candidate(data, data.len() - 1));
        let m = hmax_epi32(lane_best);
        if m != i32::MIN {
            best = best.max(m as i64);
        }
        while i < interior_end {
            best = best.max(candidate(data, i));
            i += 1;
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_plateau_between_extremes() {
        // 5 and 9 differ from their single neighbours; the plateau of 3s
        // is never strictly above or below both sides.
        let ds = Dataset::from_values(&[5, 3, 3, 3, 9]);
        assert_eq!(oracle(&ds), 3);
    }

    #[test]
    fn test_oracle_monotonic_run() {
        // boundaries differ from their neighbours; the interior of a
        // strictly increasing run is never a peak or trough
        let ds = Dataset::from_values(&[1, 2, 3, 4, 5]);
        assert_eq!(oracle(&ds), 4);
    }

    #[test]
    fn test_oracle_all_extreme() {
        let ds = Dataset::from_values(&[5, 1, 5]);
        assert_eq!(oracle(&ds), NO_QUALIFYING_ELEMENT);
    }

    #[test]
    fn test_oracle_equal_pair() {
        let ds = Dataset::from_values(&[2, 2]);
        assert_eq!(oracle(&ds), 2);
    }

    #[test]
    fn test_oracle_degenerate_sizes() {
        assert_eq!(oracle(&Dataset::from_values(&[])), NO_QUALIFYING_ELEMENT);
        assert_eq!(oracle(&Dataset::from_values(&[7])), NO_QUALIFYING_ELEMENT);
        assert_eq!(oracle(&Dataset::from_values(&[1, 2])), NO_QUALIFYING_ELEMENT);
    }

    #[test]
    fn test_is_extreme_boundaries_and_plateaus() {
        let data = [1, 3, 3, 1];
        assert!(is_extreme(&data, 0));
        assert!(!is_extreme(&data, 1));
        assert!(!is_extreme(&data, 2));
        assert!(is_extreme(&data, 3));
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
    fn test_threaded_strategies_agree_across_seams() {
        // fine grain relative to dataset length forces candidates to
        // straddle chunk boundaries
        let ds = Dataset::<i32>::generate(100_000, 7);
        let expected = oracle(&ds);
        for kernel in [static_pool, dynamic_pool, parallel_invoke, future_fanout] {
            assert_eq!(kernel(&ds, 8).unwrap(), expected);
        }
    }

    #[test]
    fn test_lane_strategies_match_oracle() {
        for len in [0, 1, 2, 3, 7, 8, 9, 10, 1000] {
            let ds = Dataset::<i32>::generate(len, 42);
            let expected = oracle(&ds);
            assert_eq!(unrolled(&ds, 1).unwrap(), expected, "unrolled len {len}");
            assert_eq!(portable_simd(&ds, 1).unwrap(), expected, "simd len {len}");
        }
    }

    #[test]
    fn test_lane_strategies_zigzag_is_all_extreme() {
        let zigzag: Vec<i32> = (0..64).map(|i| if i % 2 == 0 { 9 } else { 0 }).collect();
        let ds = Dataset::from_values(&zigzag);
        assert_eq!(oracle(&ds), NO_QUALIFYING_ELEMENT);
        assert_eq!(unrolled(&ds, 1).unwrap(), NO_QUALIFYING_ELEMENT);
        assert_eq!(portable_simd(&ds, 1).unwrap(), NO_QUALIFYING_ELEMENT);
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
