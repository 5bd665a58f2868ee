//! Study-level error types for configuration and simulation.
//!
//! Purpose
//! -------
//! Centralize the *programming/configuration* error tier of the crate: an
//! invalid study setup (zero horizon, non-positive baseline rate, empty
//! scenario axes) is a caller mistake and fails fast at construction time.
//! Per-fit statistical failures are a different tier and live in
//! [`crate::fit::errors::FitError`]; they are recorded per replicate and
//! never abort a batch.
//!
//! Conventions
//! -----------
//! - Variants carry the offending value so messages stay actionable.
//! - Errors implement `Display` + `std::error::Error` by hand; the crate
//!   reports every failure through `Result`, never panics.

/// Crate-wide result alias for study setup and simulation operations.
pub type StudyResult<T> = Result<T, StudyError>;

/// Configuration and simulation errors (the fail-fast tier).
#[derive(Debug, Clone, PartialEq)]
pub enum StudyError {
    /// Reference horizon must be at least one period.
    InvalidHorizon { value: usize },

    /// Baseline expected count must be finite and strictly positive.
    InvalidBaselineRate { value: f64 },

    /// At least one replicate per scenario is required.
    InvalidReplicates,

    /// The candidate duration set must be non-empty.
    NoDurations,

    /// Scenario durations must be at least one period.
    InvalidDuration { value: usize },

    /// The candidate total-change set must be non-empty.
    NoTotalChanges,

    /// Total change must be finite and greater than -1 (rates stay positive).
    InvalidTotalChange { value: f64 },

    /// A per-period Poisson mean fell outside the sampler's domain.
    InvalidMeanCount { value: f64 },
}

impl std::error::Error for StudyError {}

impl std::fmt::Display for StudyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudyError::InvalidHorizon { value } => {
                write!(f, "Invalid reference horizon {value}: must be at least 1 period")
            }
            StudyError::InvalidBaselineRate { value } => {
                write!(f, "Invalid baseline expected count {value}: must be finite and > 0")
            }
            StudyError::InvalidReplicates => {
                write!(f, "Replicate count must be at least 1")
            }
            StudyError::NoDurations => {
                write!(f, "No candidate durations provided")
            }
            StudyError::InvalidDuration { value } => {
                write!(f, "Invalid scenario duration {value}: must be at least 1 period")
            }
            StudyError::NoTotalChanges => {
                write!(f, "No candidate total-change magnitudes provided")
            }
            StudyError::InvalidTotalChange { value } => {
                write!(f, "Invalid total change {value}: must be finite and > -1")
            }
            StudyError::InvalidMeanCount { value } => {
                write!(f, "Invalid Poisson mean {value}: must be finite and > 0")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Smoke-check that error messages carry the offending value, so batch
    // logs stay diagnosable.
    fn display_includes_offending_value() {
        let err = StudyError::InvalidBaselineRate { value: -1.5 };
        assert!(err.to_string().contains("-1.5"));

        let err = StudyError::InvalidTotalChange { value: -2.0 };
        assert!(err.to_string().contains("-2"));
    }
}
