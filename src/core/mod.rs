//! Core autocorrelation engine
//!
//! This module contains the lag bin layout, the pairwise binning kernel,
//! merging of per-chromosome results and the correlation reducer.

pub mod binner;
pub mod correlation;
mod error;
pub mod io;
pub mod lags;
pub mod local;
mod merge;
pub mod window;

pub use binner::{assign, bin_intervals, validate_sorted, Assignment, Interval, LagBin, LagBins};
pub use correlation::{
    correlate, pearson, reduce, AcfMode, CorrelationResult, SampleStatus, ValueTransform,
    MIN_SAMPLES,
};
pub use error::{
    AcfError, BinningError, BinningResult, ConfigResult, ConfigurationError,
    MergeConsistencyError, MergeResult, Result, TransformError,
};
pub use io::{
    detect_compression, open_input, ByteLineIterator, CompressionFormat, InputReader,
    DEFAULT_BUFFER_SIZE, LARGE_BUFFER_SIZE, MMAP_THRESHOLD,
};
pub use lags::{LagBinSet, LagRange, DEFAULT_LAG_SPEC, MAX_LAG_BINS};
pub use local::{local_row, local_rows, LocalRow};
pub use merge::merge_bins;
pub use window::{NeighborIndex, Neighborhood};
