use std::ops::Range;
use std::time::Duration;

use crate::enums::error::ParafoldError;
use crate::structs::dataset::Dataset;

/// The value every task reduction produces.
///
/// # Description
/// - A count (above-average, divisibility, primality, frequency tasks)
/// or a maximum (non-extreme maximum task).
/// - Wide enough to hold any sum or count over a dataset of `i32`
/// elements without overflow.
/// - `i64::MIN` doubles as the "no qualifying element" sentinel for
/// maximum-style reductions over empty or fully-excluded inputs.
pub type TaskValue = i64;

/// One wall-clock duration sample for a single strategy invocation.
///
/// Captured at nanosecond resolution via `std::time::Instant`.
pub type Measurement = Duration;

/// Ordered raw samples recorded for one (task, strategy) pair.
///
/// Index order matches invocation order; warmup invocations are never
/// recorded here.
pub type SampleSet = Vec<Measurement>;

// ----------------- Kernel plumbing ----------------------------
//
// Shared shapes for the partitioners and the (task, strategy)
// dispatch table, so kernel signatures stay uniform across the
// whole catalog.
//
// -----------------------------------------------------------------

/// Half-open index range `[start, end)` assigned to one worker.
pub type ChunkRange = Range<usize>;

/// Uniform signature every strategy kernel implements.
///
/// The second argument is the fan-out width for the worker-pool shapes;
/// single-threaded and rayon-scheduled kernels ignore it. Kernels borrow
/// the dataset read-only and allocate any scratch they need internally,
/// so nothing is retained between invocations.
pub type KernelFn = fn(&Dataset<i32>, usize) -> Result<TaskValue, ParafoldError>;
