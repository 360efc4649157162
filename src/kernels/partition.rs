//! # **Partition Module** - *Chunk Geometry for Worker Fan-Out*
//!
//! Splits a dataset's index space into the contiguous ranges the pool,
//! invoke, and future strategies hand to their workers.
//!
//! ## Behaviour
//! - Per-worker chunk lengths are rounded up to a whole cache line of
//!   elements, so two workers never write-share a line while streaming.
//! - Ranges are half-open, in ascending order, non-overlapping, and cover
//!   `[0, len)` exactly; short inputs yield fewer ranges than workers, and
//!   `len == 0` yields none. Count-style combines treat a missing partition
//!   as zero, so both degenerate shapes are legal.

use crate::aliases::ChunkRange;

/// Cache line width assumed for chunk alignment.
pub const CACHE_LINE_BYTES: usize = 64;

/// Elements handed out per claim by the dynamic self-scheduling pool.
pub const DYNAMIC_GRAIN: usize = 4096;

/// Integer ceiling division.
#[inline(always)]
pub const fn divide_round_up(n: usize, d: usize) -> usize {
    (n + d - 1) / d
}

/// Rounds `n` up to the next multiple of `m`.
#[inline(always)]
pub const fn round_up_to_multiple(n: usize, m: usize) -> usize {
    divide_round_up(n, m) * m
}

/// Cache-line-rounded element count per worker for a `len`-element input
/// of `T` split `workers` ways.
#[inline]
pub fn elems_per_worker<T>(len: usize, workers: usize) -> usize {
    let workers = workers.max(1);
    let line = CACHE_LINE_BYTES / size_of::<T>().max(1);
    round_up_to_multiple(divide_round_up(len, workers), line.max(1))
}

/// Contiguous half-open ranges covering `[0, len)`, at most one per worker.
pub fn chunk_ranges<T>(len: usize, workers: usize) -> Vec<ChunkRange> {
    let per = elems_per_worker::<T>(len, workers);
    if per == 0 {
        return Vec::new();
    }
    let mut ranges = Vec::with_capacity(workers.max(1));
    let mut start = 0;
    while start < len {
        let end = usize::min(start + per, len);
        ranges.push(start..end);
        start = end;
    }
    ranges
}
