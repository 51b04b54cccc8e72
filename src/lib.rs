//! FastACF - lag-binned autocorrelation of genomic interval values
//!
//! Computes how correlated the values of intervals are as a function of
//! the distance separating them, for a caller-supplied set of lag bins.
//!
//! # Features
//!
//! - Partial (per-bin) and full (cumulative) autocorrelation
//! - Local, per-interval autocorrelation over bounded neighborhoods
//! - Parallel per-chromosome binning with rayon
//! - Support for compressed input files (gzip, bzip2)
//!
//! # Example
//!
//! ```ignore
//! use fast_acf::{run_acf, AcfOptions, LagBinSet};
//!
//! let lags = LagBinSet::from_spec("15:500:50")?;
//! let output = run_acf(&["pvalues.bed.gz"], &lags, &AcfOptions::default())?;
//! for r in &output.results {
//!     println!("{}", r);
//! }
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use core::{
    bin_intervals, merge_bins, reduce, AcfError, AcfMode, BinningError, ConfigurationError,
    CorrelationResult, Interval, LagBin, LagBinSet, LagBins, LagRange, MergeConsistencyError,
    Result, TransformError, ValueTransform,
};
pub use formats::{run_acf, run_local_acf, AcfOptions, AcfOutput, ValueColumn};
