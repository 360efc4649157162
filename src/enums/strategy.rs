//! # **Strategy Module** - *The Concurrency / Vectorisation Catalog*
//!
//! Enumerates the alternative implementations every task can be solved with.
//!
//! Declaration order is load-bearing: it fixes the catalog's canonical
//! ordering, which the harness uses both for execution order and for breaking
//! ties between strategies whose mean times are equal.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// # Strategy
///
/// One concurrency or vectorisation scheme for executing a task's reduction.
///
/// ## Purpose
/// - Identifies which kernel the dispatcher routes a `(task, strategy)` pair to.
/// - Every strategy of a task must return the same value as the task's
/// sequential oracle; they differ only in how the work is scheduled.
///
/// ## Behaviour
/// - `Sequential` doubles as the correctness oracle and the speedup baseline.
/// - `Avx2` requires a runtime capability probe and fails with
/// `UnsupportedPlatform` where 256-bit integer SIMD is unavailable.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Strategy {
    /// Single-threaded reference loop; baseline for speedup.
    Sequential,
    /// Library-level parallel iterator; partitioning delegated to rayon.
    #[cfg(feature = "parallel_proc")]
    Declarative,
    /// One contiguous chunk per worker, sized up front, scoped threads.
    StaticPool,
    /// Workers self-schedule fixed-size chunks off a shared atomic cursor.
    DynamicPool,
    /// Explicit per-core closures, dispatched and joined by hand.
    ParallelInvoke,
    /// One spawned handle per chunk; partials reduced after joining.
    FutureFanout,
    /// Scalar loop unrolled eight-wide over independent accumulators.
    Unrolled,
    /// `std::simd` fixed-width lanes with a scalar tail.
    PortableSimd,
    /// 256-bit `std::arch` intrinsics behind a runtime AVX2 probe.
    Avx2,
}

impl Strategy {
    /// Canonical display name, as consumed by the persistence and charting
    /// collaborators.
    pub const fn name(&self) -> &'static str {
        match self {
            Strategy::Sequential => "Sequential",
            #[cfg(feature = "parallel_proc")]
            Strategy::Declarative => "Declarative Parallel",
            Strategy::StaticPool => "Static Worker Pool",
            Strategy::DynamicPool => "Dynamic Worker Pool",
            Strategy::ParallelInvoke => "Parallel Invoke",
            Strategy::FutureFanout => "Future Fan-Out",
            Strategy::Unrolled => "Unrolled Loop",
            Strategy::PortableSimd => "Portable SIMD",
            Strategy::Avx2 => "AVX2 Intrinsics",
        }
    }

    /// True for the baseline strategy the speedup ratio is anchored to.
    #[inline]
    pub const fn is_baseline(&self) -> bool {
        matches!(self, Strategy::Sequential)
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}
