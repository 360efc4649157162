//! # Error Module - Custom *Parafold* Error Type
//!
//! Defines the unified error type for Parafold.
//!
//! ## Features
//! - Covers unknown task names, strategies the host hardware cannot run,
//! and failures raised during a timed invocation.
//! - Implements `Display` for readable output and `Error` for integration
//! with standard Rust error handling.

use std::error::Error;
use std::fmt;

use crate::enums::strategy::Strategy;

/// Catch all error type for `Parafold`
///
/// The taxonomy is deliberately small: an unknown task aborts the whole run
/// before any measurement starts, while the other two variants are scoped to
/// a single (task, strategy) pair and leave the remaining strategies free to
/// run and report.
#[derive(Debug, Clone, PartialEq)]
pub enum ParafoldError {
    UnknownTask {
        name: String,
    },
    UnsupportedPlatform {
        strategy: &'static str,
        detail: &'static str,
    },
    MeasurementFailure {
        strategy: &'static str,
        message: Option<String>,
    },
}

impl ParafoldError {
    /// The failure every AVX2 kernel raises when the runtime probe finds no
    /// 256-bit integer SIMD support.
    pub fn avx2_unsupported() -> Self {
        ParafoldError::UnsupportedPlatform {
            strategy: Strategy::Avx2.name(),
            detail: "AVX2 instruction set not detected",
        }
    }
}

impl fmt::Display for ParafoldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParafoldError::UnknownTask { name } => {
                write!(f, "Unknown task: no benchmark task is registered under the name '{}'.", name)
            }
            ParafoldError::UnsupportedPlatform { strategy, detail } => {
                write!(
                    f,
                    "Unsupported platform: strategy '{}' cannot run on this hardware: {}.",
                    strategy, detail
                )
            }
            ParafoldError::MeasurementFailure { strategy, message } => {
                if let Some(msg) = message {
                    write!(f, "Measurement failure in strategy '{}': {}", strategy, msg)
                } else {
                    write!(f, "Measurement failure in strategy '{}'.", strategy)
                }
            }
        }
    }
}

impl Error for ParafoldError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_unknown_task() {
        let err = ParafoldError::UnknownTask { name: "Sort Numbers".to_string() };
        assert_eq!(
            err.to_string(),
            "Unknown task: no benchmark task is registered under the name 'Sort Numbers'."
        );
    }

    #[test]
    fn test_display_unsupported_platform() {
        let err = ParafoldError::UnsupportedPlatform {
            strategy: "AVX2 Intrinsics",
            detail: "AVX2 instruction set not detected"
        };
        assert!(err.to_string().contains("AVX2 Intrinsics"));
        assert!(err.to_string().contains("not detected"));
    }

    #[test]
    fn test_display_measurement_failure() {
        let with_msg = ParafoldError::MeasurementFailure {
            strategy: "Unrolled Loop",
            message: Some("index out of bounds".to_string())
        };
        assert!(with_msg.to_string().contains("index out of bounds"));

        let without = ParafoldError::MeasurementFailure { strategy: "Unrolled Loop", message: None };
        assert_eq!(without.to_string(), "Measurement failure in strategy 'Unrolled Loop'.");
    }
}
