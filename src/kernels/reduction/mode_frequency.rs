//! # **Mode Frequency Module** - *Max Frequency Of Elements Reduction*
//!
//! Finds the highest number of occurrences of any single value.
//!
//! ## Behaviour
//! - The reduction is over multisets: per-worker frequency maps merge by
//!   adding counts, so chunked kernels agree with the sequential result
//!   regardless of partitioning.
//! - Each worker touches the shared accumulator exactly once, merging its
//!   whole local map inside a single critical section.
//! - Hash-based counting has no lane-parallel form, so this task carries
//!   no unrolled or SIMD kernels.
//! - The empty dataset has no occurrences at all and reduces to `0`.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crate::aliases::TaskValue;
use crate::enums::error::ParafoldError;
use crate::kernels::partition::{DYNAMIC_GRAIN, chunk_ranges};
use crate::structs::dataset::Dataset;

#[cfg(feature = "fast_hash")]
type Map = ahash::AHashMap<i32, i64>;
#[cfg(not(feature = "fast_hash"))]
type Map = std::collections::HashMap<i32, i64>;

/// Frequency map of `chunk`.
fn frequency_map(chunk: &[i32]) -> Map {
    let mut map = Map::default();
    for &v in chunk {
        *map.entry(v).or_insert(0) += 1;
    }
    map
}

/// Adds every count in `local` into `total`.
fn merge_into(total: &mut Map, local: Map) {
    for (value, count) in local {
        *total.entry(value).or_insert(0) += count;
    }
}

/// Highest count in the map, `0` when empty.
fn peak(map: &Map) -> i64 {
    map.values().copied().max().unwrap_or(0)
}

/// Sequential oracle: one counting pass, then the map's highest count.
pub fn oracle(dataset: &Dataset<i32>) -> TaskValue {
    peak(&frequency_map(dataset.as_slice()))
}

/// Baseline strategy; the oracle behind the uniform kernel signature.
pub fn sequential(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    Ok(oracle(dataset))
}

/// Rayon fold/reduce: per-split maps built by `fold`, merged pairwise by
/// `reduce`.
#[cfg(feature = "parallel_proc")]
pub fn declarative(dataset: &Dataset<i32>, _workers: usize) -> Result<TaskValue, ParafoldError> {
    use rayon::prelude::*;

    let data = dataset.as_slice();
    let merged = data
        .par_iter()
        .fold(Map::default, |mut map, &v| {
            *map.entry(v).or_insert(0) += 1;
            map
        })
        .reduce(Map::default, |mut a, b| {
            merge_into(&mut a, b);
            a
        });
    Ok(peak(&merged))
}

/// One contiguous chunk per worker; local maps merge under a shared mutex.
pub fn static_pool(dataset: &Dataset<i32>, workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    let total = Mutex::new(Map::default());
    thread::scope(|s| {
        for range in chunk_ranges::<i32>(data.len(), workers) {
            let total = &total;
            s.spawn(move || {
                let local = frequency_map(&data[range]);
                merge_into(&mut total.lock().unwrap(), local);
            });
        }
    });
    let total = total.into_inner().unwrap_or_else(|e| e.into_inner());
    Ok(peak(&total))
}

/// Workers claim fixed-size chunks off a shared cursor, counting into a
/// private map and merging it once at the end.
pub fn dynamic_pool(dataset: &Dataset<i32>, workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    let cursor = AtomicUsize::new(0);
    let total = Mutex::new(Map::default());
    thread::scope(|s| {
        for _ in 0..workers.max(1) {
            let cursor = &cursor;
            let total = &total;
            s.spawn(move || {
                let mut local = Map::default();
                loop {
                    let start = cursor.fetch_add(DYNAMIC_GRAIN, Ordering::Relaxed);
                    if start >= data.len() {
                        break;
                    }
                    let end = usize::min(start + DYNAMIC_GRAIN, data.len());
                    for &v in &data[start..end] {
                        *local.entry(v).or_insert(0) += 1;
                    }
                }
                merge_into(&mut total.lock().unwrap(), local);
            });
        }
    });
    let total = total.into_inner().unwrap_or_else(|e| e.into_inner());
    Ok(peak(&total))
}

/// Explicit array of per-core closures, each merging its map once into the
/// mutex-guarded accumulator.
pub fn parallel_invoke(dataset: &Dataset<i32>, workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    let total = Mutex::new(Map::default());
    thread::scope(|s| {
        let actions: Vec<Box<dyn FnOnce() + Send + '_>> = chunk_ranges::<i32>(data.len(), workers)
            .into_iter()
            .map(|range| {
                let total = &total;
                Box::new(move || {
                    let local = frequency_map(&data[range]);
                    merge_into(&mut total.lock().unwrap(), local);
                }) as Box<dyn FnOnce() + Send + '_>
            })
            .collect();
        for action in actions {
            s.spawn(action);
        }
    });
    let total = total.into_inner().unwrap_or_else(|e| e.into_inner());
    Ok(peak(&total))
}

/// One spawned handle per chunk returning its whole map; the caller merges
/// after joining, so no lock is needed at all.
pub fn future_fanout(dataset: &Dataset<i32>, workers: usize) -> Result<TaskValue, ParafoldError> {
    let data = dataset.as_slice();
    let merged = thread::scope(|s| {
        let handles: Vec<_> = chunk_ranges::<i32>(data.len(), workers)
            .into_iter()
            .map(|range| s.spawn(move || frequency_map(&data[range])))
            .collect();
        let mut merged = Map::default();
        for handle in handles {
            match handle.join() {
                Ok(local) => merge_into(&mut merged, local),
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
        merged
    });
    Ok(peak(&merged))
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
