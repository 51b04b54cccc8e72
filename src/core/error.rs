//! Error types for FastACF
//!
//! Defines all error types used throughout the library.

use crate::formats::bed::BedParseError;
use thiserror::Error;

/// Main error type for FastACF operations
#[derive(Debug, Error)]
pub enum AcfError {
    /// Invalid lag specification or option
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Bin layouts disagree while merging units
    #[error("Merge error: {0}")]
    Merge(#[from] MergeConsistencyError),

    /// Input violates the binning preconditions
    #[error("Binning error: {0}")]
    Binning(#[from] BinningError),

    /// Values outside the domain of the requested transform
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Malformed interval records
    #[error("Input error: {0}")]
    Input(#[from] BedParseError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors in the lag specification or other run options
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Lag specification is not `start:stop:step`
    #[error("Malformed lag specification '{spec}': {message}")]
    MalformedSpec { spec: String, message: String },

    /// Step must be strictly positive
    #[error("Lag step must be positive, got {0}")]
    NonPositiveStep(i64),

    /// Lag start must not be negative
    #[error("Lag start must not be negative, got {0}")]
    NegativeStart(i64),

    /// The range produced no bins
    #[error("Lag range {start}:{stop}:{step} yields no bins")]
    EmptyRange { start: i64, stop: i64, step: i64 },

    /// More bins than a run is allowed to allocate
    #[error("Lag range yields {count} bins, at most {max} are allowed")]
    TooManyBins { count: u64, max: usize },

    /// Custom bins are empty, unordered or overlapping
    #[error("Invalid lag bins: {0}")]
    InvalidBins(String),

    /// Value column cannot be used
    #[error("Invalid value column: {0}")]
    InvalidColumn(String),
}

/// Bin layouts of two accumulation sets disagree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeConsistencyError {
    #[error("Bin count mismatch: expected {expected}, found {found}")]
    BinCountMismatch { expected: usize, found: usize },

    #[error("Bin {index} mismatch: expected {}-{}, found {}-{}", expected.0, expected.1, found.0, found.1)]
    BinKeyMismatch {
        index: usize,
        expected: (u64, u64),
        found: (u64, u64),
    },
}

/// Violations of the sorted-input contract of the binner
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BinningError {
    /// Starts must be non-decreasing within a chromosome
    #[error("Unsorted input on {chrom} at interval {index}: start {start} follows {previous_start}")]
    Unsorted {
        chrom: String,
        index: usize,
        previous_start: u64,
        start: u64,
    },

    /// Start must not exceed end
    #[error("Invalid interval {chrom}:{start}-{end}: start > end")]
    InvalidInterval { chrom: String, start: u64, end: u64 },
}

/// Values that cannot be transformed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// -log10 needs strictly positive, finite input
    #[error("Value {value} is outside the domain of -log10 (expected 0 < v < inf)")]
    OutOfDomain { value: f64 },
}

/// Result type alias for FastACF operations
pub type Result<T> = std::result::Result<T, AcfError>;

/// Result type alias for configuration parsing
pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;

/// Result type alias for merge operations
pub type MergeResult<T> = std::result::Result<T, MergeConsistencyError>;

/// Result type alias for binning operations
pub type BinningResult<T> = std::result::Result<T, BinningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MergeConsistencyError::BinKeyMismatch {
            index: 2,
            expected: (15, 65),
            found: (10, 60),
        };
        assert_eq!(err.to_string(), "Bin 2 mismatch: expected 15-65, found 10-60");

        let err = ConfigurationError::NonPositiveStep(0);
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_error_conversion() {
        let err: AcfError = ConfigurationError::NegativeStart(-5).into();
        assert!(matches!(err, AcfError::Configuration(ConfigurationError::NegativeStart(-5))));

        let err: AcfError = TransformError::OutOfDomain { value: 0.0 }.into();
        assert!(err.to_string().starts_with("Transform error"));
    }
}
