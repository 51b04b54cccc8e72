//! File adapters and reporting
//!
//! BED input, file-level autocorrelation runs, and text output.

pub mod acf;
pub mod bed;
pub mod chart;
pub mod report;

pub use acf::{run_acf, run_local_acf, AcfOptions, AcfOutput, AcfStats, LocalStats};
pub use bed::{
    read_chrom_groups, BedIntervalReader, BedParseError, BedRecordView, ChromGroup, ChromGroups,
    ValueColumn,
};
pub use report::{format_coefficient, format_g, write_acf, write_local_header, write_local_row, write_warnings};
