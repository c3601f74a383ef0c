//! Bench-specific error types.
//!
//! Core routines propagate errors through these types rather than panicking,
//! so the demo scenarios can log a verdict and keep running.

use std::fmt;

/// Top-level error enum for the regolith bench.
#[derive(Debug, Clone, PartialEq)]
pub enum LabError {
    /// A pattern or state vector did not match the network's node count.
    DimensionMismatch {
        /// Length of the vector that was supplied.
        got: usize,
        /// Length the network expects.
        expected: usize,
    },

    /// A ship-design part index was out of range.
    PartIndexOutOfRange {
        /// Index that was requested.
        index: usize,
        /// Number of parts currently in the design.
        len: usize,
    },

    /// A ship design failed validation before save.
    InvalidDesign {
        /// Human-readable description of the first problem found.
        reason: String,
    },

    /// Bench constant is outside its safe operating range.
    /// Returned by validation helpers; not triggered at runtime by default.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for LabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabError::DimensionMismatch { got, expected } => write!(
                f,
                "vector length {} does not match network node count {}",
                got, expected
            ),
            LabError::PartIndexOutOfRange { index, len } => {
                write!(f, "part index {} out of range (design has {})", index, len)
            }
            LabError::InvalidDesign { reason } => {
                write!(f, "ship design rejected: {}", reason)
            }
            LabError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for LabError {}

/// Convenience alias: a `Result` using `LabError` as the error type.
pub type LabResult<T> = Result<T, LabError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if `step_percent` is outside its validated safe range.
///
/// Values above 1.0 overshoot the equilibrium every pass and the cloud never
/// settles; zero or negative values freeze the relaxation entirely.
pub fn validate_step_percent(value: f32) -> LabResult<()> {
    if value <= 0.0 || value > 1.0 {
        Err(LabError::UnsafeConstant {
            name: "RELAX_STEP_PERCENT",
            value,
            safe_range: "(0.0, 1.0]",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if `radius` is not strictly positive and finite.
pub fn validate_relax_radius(value: f32) -> LabResult<()> {
    if value <= 0.0 || !value.is_finite() {
        Err(LabError::UnsafeConstant {
            name: "RELAX_RADIUS",
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if `strength` would destabilise the gravity demos.
///
/// Values above 100.0 accelerate debris through cube walls between physics
/// steps.
pub fn validate_gravity_strength(value: f32) -> LabResult<()> {
    if value < 0.0 || value > 100.0 {
        Err(LabError::UnsafeConstant {
            name: "GRAVITY_STRENGTH",
            value,
            safe_range: "[0.0, 100.0]",
        })
    } else {
        Ok(())
    }
}
