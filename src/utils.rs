//! # Utilities - *Internal Helper Utilities*
//!
//! A small collection of helpers that support formatting, parsing, and
//! platform probing elsewhere within the crate.
//!
//! The format/parse pairs are part of the external contract: the charting
//! collaborator renders from numbers it recovers by parsing the formatted
//! strings on `BenchmarkResult`, so each parser must invert its formatter
//! closely enough for chart fidelity.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Formats a duration into the unit tier it reads best in.
///
/// Tiers: `s` at one second and above, `ms` down to one millisecond,
/// `µs` down to one microsecond, whole `ns` below that. Three decimals
/// are kept in the fractional tiers.
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos >= 1_000_000_000 {
        format!("{:.3} s", d.as_secs_f64())
    } else if nanos >= 1_000_000 {
        format!("{:.3} ms", nanos as f64 / 1e6)
    } else if nanos >= 1_000 {
        format!("{:.3} µs", nanos as f64 / 1e3)
    } else {
        format!("{} ns", nanos)
    }
}

/// Parses a formatted duration back into canonical milliseconds.
/// Returns `Some(f64)` on success, or `None` if the string could not be
/// parsed (including the literal `failed` marker on errored rows).
///
/// Accepts the suffixes `s`, `ms`, `µs`/`us`, and `ns`; a bare number is
/// taken as milliseconds.
pub fn parse_duration_str(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    // Longest suffixes first, so `ms` never strips as bare `s`.
    let (num, to_ms) = if let Some(v) = s.strip_suffix("ms") {
        (v, 1.0)
    } else if let Some(v) = s.strip_suffix("µs").or_else(|| s.strip_suffix("us")) {
        (v, 1e-3)
    } else if let Some(v) = s.strip_suffix("ns") {
        (v, 1e-6)
    } else if let Some(v) = s.strip_suffix('s') {
        (v, 1e3)
    } else {
        (s, 1.0)
    };
    num.trim().parse::<f64>().ok().map(|v| v * to_ms)
}

/// Formats a speedup ratio as the collaborators expect it, e.g. `3.52x`.
pub fn format_speedup(ratio: f64) -> String {
    format!("{:.2}x", ratio)
}

/// Parses a formatted speedup back into a ratio.
/// Returns `None` for anything that is not a number with an `x` suffix.
pub fn parse_speedup_str(s: &str) -> Option<f64> {
    let s = s.trim();
    let v = s.strip_suffix('x').or_else(|| s.strip_suffix('X'))?;
    v.trim().parse::<f64>().ok()
}

/// Milliseconds since the Unix epoch, `0` if the system clock predates it.
pub fn now_epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Runtime probe for 256-bit integer SIMD support.
///
/// The AVX2 strategy calls this before dispatching into intrinsics; a
/// `false` here routes to `UnsupportedPlatform` rather than a fallback.
#[cfg(target_arch = "x86_64")]
pub fn avx2_available() -> bool {
    is_x86_feature_detected!("avx2")
}

/// Runtime probe for 256-bit integer SIMD support.
///
/// Always `false` off x86-64; the AVX2 strategy reports
/// `UnsupportedPlatform` on such targets.
#[cfg(not(target_arch = "x86_64"))]
pub fn avx2_available() -> bool {
    false
}
