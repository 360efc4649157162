//! # **Primes Module** - *Find Prime Numbers Reduction*
//!
//! Counts the prime elements of the dataset by trial division.
//!
//! ## Behaviour
//! - The scalar test checks 2, then odd divisors up to the square root.
//! - The lane kernels run the whole odd-divisor sweep over eight elements
//!   at a time with a `d*d <= v` activity mask, trading the scalar early
//!   exit for branch-free lane breadth. Divisor sweeps are bounded by the
//!   generator's value range, so every composite in range is caught.
//! - The AVX2 kernel recovers lane remainders through single-precision
//!   division: all values sit below 2^24, where `trunc(v / d)` from a
//!   correctly rounded `f32` divide is exact for every divisor in the sweep.
//! - The combine step is a plain associative add.

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::thread;

use crate::aliases::TaskValue;
use crate::enums::error::ParafoldError;
use crate::kernels::lanes::LANES;
use crate::kernels::partition::{DYNAMIC_GRAIN, chunk_ranges};
#[cfg(target_arch = "x86_64")]
use crate::structs::dataset::VALUE_RANGE;
use crate::structs::dataset::Dataset;
#[cfg(target_arch = "x86_64")]
use crate::utils::avx2_available;

/// Primality by trial division: check 2, then odd divisors up to `√v`.
pub fn is_prime(v: i32) -> bool {
    if v < 2 {
        return false;
    }
    if v == 2 {
        return true;
    }
    if v % 2 == 0 {
        return false;
    }
    let mut d = 3i32;
    while d * d <= v {
        if v % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Prime elements of `chunk`.
#[inline]
fn count_primes(chunk: &[i32]) -> i64 {
    chunk.iter().filter(|&&v| is_prime(v)).count() as i64
}

/// Sequential oracle: one filtering pass over the scalar primality test.
pub fn oracle(dataset: &Dataset<i32>) -> TaskValue {
    count_primes(dataset.as_slice())
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
    Ok(data.par_iter().filter(|&&v| is_prime(v)).count() as TaskValue)
}

/// One contiguous chunk per worker, partials merged by atomic add.
pub fn static_pool(dataset: &Dataset<i32>, workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    let total = AtomicI64::new(0);
    thread::scope(|s| {
        for range in chunk_ranges::<i32>(data.len(), workers) {
            let total = &total;
            s.spawn(move || {
                let local = count_primes(&data[range]);
                total.fetch_add(local, Ordering::Relaxed);
            });
        }
    });
    Ok(total.load(Ordering::Relaxed))
}

/// Workers claim fixed-size chunks off a shared cursor until none remain.
/// Primality cost varies element to element, which is exactly the load
/// imbalance self-scheduling absorbs.
pub fn dynamic_pool(dataset: &Dataset<i32>, workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
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
                    local += count_primes(&data[start..end]);
                }
                total.fetch_add(local, Ordering::Relaxed);
            });
        }
    });
    Ok(total.load(Ordering::Relaxed))
}

/// Explicit array of per-core closures, each merging once into a
/// mutex-guarded accumulator.
pub fn parallel_invoke(dataset: &Dataset<i32>, workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    let total = Mutex::new(0i64);
    thread::scope(|s| {
        let actions: Vec<Box<dyn FnOnce() + Send + '_>> = chunk_ranges::<i32>(data.len(), workers)
            .into_iter()
            .map(|range| {
                let total = &total;
                Box::new(move || {
                    let local = count_primes(&data[range]);
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

/// One spawned handle per chunk; partials reduced after joining.
pub fn future_fanout(dataset: &Dataset<i32>, workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    let total = thread::scope(|s| {
        let handles: Vec<_> = chunk_ranges::<i32>(data.len(), workers)
            .into_iter()
            .map(|range| s.spawn(move || count_primes(&data[range])))
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

/// Eight elements per iteration over four independent accumulators.
pub fn unrolled(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    let mut acc = [0i64; 4];
    let mut chunks = data.chunks_exact(8);
    for w in chunks.by_ref() {
        acc[0] += is_prime(w[0]) as i64 + is_prime(w[4]) as i64;
        acc[1] += is_prime(w[1]) as i64 + is_prime(w[5]) as i64;
        acc[2] += is_prime(w[2]) as i64 + is_prime(w[6]) as i64;
        acc[3] += is_prime(w[3]) as i64 + is_prime(w[7]) as i64;
    }
    let mut total = acc[0] + acc[1] + acc[2] + acc[3];
    for &v in chunks.remainder() {
        total += is_prime(v) as i64;
    }
    Ok(total)
}

/// `i32x8` lanes: full odd-divisor sweep per batch with a `d*d <= v`
/// activity mask; the sweep stops at the batch's own maximum.
pub fn portable_simd(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    use std::simd::Simd;
    use std::simd::cmp::{SimdPartialEq, SimdPartialOrd};
    use std::simd::num::SimdInt;

    let data = dataset.as_slice();
    let two = Simd::<i32, LANES>::splat(2);
    let zero = Simd::<i32, LANES>::splat(0);
    let mut count = 0i64;
    let mut chunks = data.chunks_exact(LANES);
    for w in chunks.by_ref() {
        let v = Simd::<i32, LANES>::from_slice(w);
        let below_two = v.simd_lt(two);
        let is_two = v.simd_eq(two);
        let mut composite = (v % two).simd_eq(zero) & !is_two;
        let bound = v.reduce_max();
        let mut d = 3i32;
        while d * d <= bound {
            let active = Simd::splat(d * d).simd_le(v);
            composite |= (v % Simd::splat(d)).simd_eq(zero) & active;
            d += 2;
        }
        let prime = !(composite | below_two);
        count += prime.to_bitmask().count_ones() as i64;
    }
    for &v in chunks.remainder() {
        count += is_prime(v) as i64;
    }
    Ok(count)
}

/// 256-bit divisor sweep behind the runtime AVX2 probe.
#[cfg(target_arch = "x86_64")]
pub fn avx2(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    if !avx2_available() {
        return Err(ParafoldError::avx2_unsupported());
    }
    Ok(unsafe { count_primes_avx2(dataset.as_slice()) })
}

/// 256-bit divisor sweep behind the runtime AVX2 probe.
#[cfg(not(target_arch = "x86_64"))]
pub fn avx2(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    let _ = dataset;
    Err(ParafoldError::avx2_unsupported())
}

/// Lane remainders are recovered as `v - d * trunc(v / d)` through an `f32`
/// divide, exact for all values below 2^24 with the divisors swept here.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn count_primes_avx2(data: &[i32]) -> i64 {
    use std::arch::x86_64::*;

    use crate::kernels::lanes::hsum_epi32;

    unsafe {
        let ones = _mm256_set1_epi32(-1);
        let one = _mm256_set1_epi32(1);
        let two = _mm256_set1_epi32(2);
        let zero = _mm256_setzero_si256();
        let mut lane_counts = zero;
        let mut chunks = data.chunks_exact(LANES);
        for w in chunks.by_ref() {
            let v = _mm256_loadu_si256(w.as_ptr() as *const __m256i);
            let below_two = _mm256_cmpgt_epi32(two, v);
            let is_two = _mm256_cmpeq_epi32(v, two);
            let odd = _mm256_cmpeq_epi32(_mm256_and_si256(v, one), one);
            let even = _mm256_andnot_si256(odd, ones);
            let mut composite = _mm256_andnot_si256(is_two, even);
            let vf = _mm256_cvtepi32_ps(v);
            let mut d = 3i32;
            while (d * d) < VALUE_RANGE as i32 {
                let quot = _mm256_cvttps_epi32(_mm256_div_ps(vf, _mm256_set1_ps(d as f32)));
                let rem = _mm256_sub_epi32(v, _mm256_mullo_epi32(quot, _mm256_set1_epi32(d)));
                let exact = _mm256_cmpeq_epi32(rem, zero);
                let active = _mm256_cmpgt_epi32(v, _mm256_set1_epi32(d * d - 1));
                composite = _mm256_or_si256(composite, _mm256_and_si256(exact, active));
                d += 2;
            }
            let prime = _mm256_andnot_si256(_mm256_or_si256(composite, below_two), ones);
            lane_counts = _mm256_sub_epi32(lane_counts, prime);
        }
        let mut count = hsum_epi32(lane_counts) as i64;
        for &v in chunks.remainder() {
            count += is_prime(v) as i64;
        }
        count
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
