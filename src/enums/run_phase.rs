//! # **RunPhase Module** - *Per-Pair Measurement State Machine*
//!
//! Tracks where a single `(task, strategy)` pair sits in its life cycle:
//! `Pending → Warming → Measuring → Completed`, or `Failed` at any point
//! once an error surfaces. There are no retries; a failed pair stays failed
//! and is excluded from statistics and speedup.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// # RunPhase
///
/// Life-cycle position of one `(task, strategy)` measurement.
///
/// ## Behaviour
/// - The harness advances the phase as the run proceeds; external consumers
/// only ever observe the terminal phases on a finished result.
/// - `Failed` covers both `UnsupportedPlatform` and `MeasurementFailure`;
/// the error on the result record says which.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum RunPhase {
    /// Not yet started.
    #[default]
    Pending,
    /// Untimed warmup invocations in progress.
    Warming,
    /// Timed invocations in progress.
    Measuring,
    /// All iterations finished; value and samples are final.
    Completed,
    /// Aborted by an error; no further invocations are attempted.
    Failed,
}

impl RunPhase {
    /// True once the pair can no longer change state.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Completed | RunPhase::Failed)
    }
}

impl Display for RunPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RunPhase::Pending => f.write_str("Pending"),
            RunPhase::Warming => f.write_str("Warming"),
            RunPhase::Measuring => f.write_str("Measuring"),
            RunPhase::Completed => f.write_str("Completed"),
            RunPhase::Failed => f.write_str("Failed"),
        }
    }
}
