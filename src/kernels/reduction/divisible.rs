//! # **Divisible Module** - *Divisible By 3 And 5 Reduction*
//!
//! Counts the elements divisible by both 3 and 5, i.e. by 15.
//!
//! ## Behaviour
//! - The combine step is a plain associative add; any partitioning is valid
//!   and an empty input counts zero.
//! - The scalar shapes test `v % 15 == 0` directly. The AVX2 kernel strength-
//!   reduces the test to a multiply by the modular inverse of 15 and one
//!   unsigned compare, which is how a remainder-free lane test is done when
//!   the instruction set has no integer division.

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

/// Elements of `chunk` divisible by 15.
#[inline]
fn count_divisible(chunk: &[i32]) -> i64 {
    chunk.iter().filter(|&&v| v % 15 == 0).count() as i64
}

/// Sequential oracle: one filtering pass.
pub fn oracle(dataset: &Dataset<i32>) -> TaskValue {
    count_divisible(dataset.as_slice())
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
    Ok(data.par_iter().filter(|&&v| v % 15 == 0).count() as TaskValue)
}

/// One contiguous chunk per worker, partials merged by atomic add.
pub fn static_pool(dataset: &Dataset<i32>, workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    let total = AtomicI64::new(0);
    thread::scope(|s| {
        for range in chunk_ranges::<i32>(data.len(), workers) {
            let total = &total;
            s.spawn(move || {
                let local = count_divisible(&data[range]);
                total.fetch_add(local, Ordering::Relaxed);
            });
        }
    });
    Ok(total.load(Ordering::Relaxed))
}

/// Workers claim fixed-size chunks off a shared cursor until none remain.
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
                    local += count_divisible(&data[start..end]);
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
                    let local = count_divisible(&data[range]);
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
            .map(|range| s.spawn(move || count_divisible(&data[range])))
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
        acc[0] += (w[0] % 15 == 0) as i64 + (w[4] % 15 == 0) as i64;
        acc[1] += (w[1] % 15 == 0) as i64 + (w[5] % 15 == 0) as i64;
        acc[2] += (w[2] % 15 == 0) as i64 + (w[6] % 15 == 0) as i64;
        acc[3] += (w[3] % 15 == 0) as i64 + (w[7] % 15 == 0) as i64;
    }
    let mut total = acc[0] + acc[1] + acc[2] + acc[3];
    for &v in chunks.remainder() {
        total += (v % 15 == 0) as i64;
    }
    Ok(total)
}

/// `i32x8` lanes: element-wise remainder, compare against zero, popcount.
pub fn portable_simd(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    use std::simd::Simd;
    use std::simd::cmp::SimdPartialEq;

    let data = dataset.as_slice();
    let fifteen = Simd::<i32, LANES>::splat(15);
    let zero = Simd::<i32, LANES>::splat(0);
    let mut count = 0i64;
    let mut chunks = data.chunks_exact(LANES);
    for w in chunks.by_ref() {
        let v = Simd::<i32, LANES>::from_slice(w);
        count += (v % fifteen).simd_eq(zero).to_bitmask().count_ones() as i64;
    }
    for &v in chunks.remainder() {
        count += (v % 15 == 0) as i64;
    }
    Ok(count)
}

/// 256-bit inverse-multiply divisibility test behind the runtime AVX2 probe.
#[cfg(target_arch = "x86_64")]
pub fn avx2(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    if !avx2_available() {
        return Err(ParafoldError::avx2_unsupported());
    }
    Ok(unsafe { count_divisible_avx2(dataset.as_slice()) })
}

/// 256-bit inverse-multiply divisibility test behind the runtime AVX2 probe.
#[cfg(not(target_arch = "x86_64"))]
pub fn avx2(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    let _ = dataset;
    Err(ParafoldError::avx2_unsupported())
}

/// Modular inverse of 15 over 2^32: `15 * 0xEEEEEEEF ≡ 1 (mod 2^32)`.
#[cfg(target_arch = "x86_64")]
const INV15: i32 = 0xEEEE_EEEFu32 as i32;
/// `floor((2^32 - 1) / 15)`; products at or below it mark exact multiples.
#[cfg(target_arch = "x86_64")]
const LIMIT15: i32 = 0x1111_1111;

/// `n % 15 == 0` ⇔ `n * INV15 (mod 2^32) <= LIMIT15` as unsigned. AVX2 has
/// no unsigned compare, so both sides carry a flipped sign bit first.
///
/// Valid for non-negative lanes, which is all the generator produces; a
/// negative lane would be tested for unsigned divisibility instead.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn count_divisible_avx2(data: &[i32]) -> i64 {
    use std::arch::x86_64::*;

    use crate::kernels::lanes::hsum_epi32;

    unsafe {
        let inv = _mm256_set1_epi32(INV15);
        let sign = _mm256_set1_epi32(i32::MIN);
        let biased_limit = _mm256_set1_epi32(LIMIT15 ^ i32::MIN);
        let zero = _mm256_setzero_si256();
        let mut lane_counts = zero;
        let mut chunks = data.chunks_exact(LANES);
        for w in chunks.by_ref() {
            let v = _mm256_loadu_si256(w.as_ptr() as *const __m256i);
            let prod = _mm256_mullo_epi32(v, inv);
            let biased = _mm256_xor_si256(prod, sign);
            let above = _mm256_cmpgt_epi32(biased, biased_limit);
            let divisible = _mm256_cmpeq_epi32(above, zero);
            lane_counts = _mm256_sub_epi32(lane_counts, divisible);
        }
        let mut count = hsum_epi32(lane_counts) as i64;
        for &v in chunks.remainder() {
            count += (v % 15 == 0) as i64;
        }
        count
    }
}
