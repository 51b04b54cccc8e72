//! File-level autocorrelation runs
//!
//! Each chromosome block of each input file is an independent unit of work.
//! With `threads > 1` the units of a file are binned on a rayon pool; with
//! one thread they are streamed and merged one at a time. Both paths merge
//! units in file order, so results do not depend on the thread count.

use crate::core::{
    bin_intervals, local_row, local_rows, reduce, validate_sorted, AcfError, AcfMode,
    BinningResult, CorrelationResult, LagBinSet, LagBins, LocalRow, NeighborIndex, Result,
    ValueTransform,
};
use crate::formats::bed::{read_chrom_groups, ChromGroup, ValueColumn};
use crate::formats::report;
use log::{debug, info};
use rayon::prelude::*;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Options of an autocorrelation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcfOptions {
    pub mode: AcfMode,
    pub transform: ValueTransform,
    pub value_column: ValueColumn,
    /// Number of worker threads (1 = sequential)
    pub threads: usize,
}

impl Default for AcfOptions {
    fn default() -> Self {
        Self {
            mode: AcfMode::Partial,
            transform: ValueTransform::Identity,
            value_column: ValueColumn::default(),
            threads: 1,
        }
    }
}

/// Run statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AcfStats {
    pub files: usize,
    /// Chromosome blocks processed
    pub units: usize,
    pub intervals: usize,
    pub pairs_binned: usize,
    pub pairs_unbinned: usize,
}

/// Results of a genome-wide run
#[derive(Debug, Clone, PartialEq)]
pub struct AcfOutput {
    /// One result per bin, ordered by ascending lag
    pub results: Vec<CorrelationResult>,
    pub stats: AcfStats,
}

fn build_pool(threads: usize) -> Result<Option<rayon::ThreadPool>> {
    if threads <= 1 {
        return Ok(None);
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| {
            AcfError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to create thread pool: {}", e),
            ))
        })?;
    Ok(Some(pool))
}

/// Compute autocorrelation over all chromosomes of all files
pub fn run_acf<P: AsRef<Path>>(
    files: &[P],
    lags: &LagBinSet,
    options: &AcfOptions,
) -> Result<AcfOutput> {
    let start = Instant::now();
    let pool = build_pool(options.threads)?;

    let mut merged = LagBins::empty(lags);
    let mut stats = AcfStats::default();

    for file in files {
        let path = file.as_ref();
        info!("Reading {:?}", path);
        stats.files += 1;

        let groups = read_chrom_groups(path, options.value_column)?;
        match &pool {
            Some(pool) => {
                let groups: Vec<ChromGroup> = groups.collect::<std::result::Result<_, _>>()?;
                stats.units += groups.len();
                stats.intervals += groups.iter().map(|g| g.intervals.len()).sum::<usize>();

                let binned: Vec<LagBins> = pool.install(|| {
                    groups
                        .par_iter()
                        .map(|g| bin_intervals(&g.intervals, lags))
                        .collect::<BinningResult<_>>()
                })?;
                drop(groups);

                for unit in binned {
                    merged.absorb(unit)?;
                }
            }
            None => {
                for group in groups {
                    let group = group?;
                    stats.units += 1;
                    stats.intervals += group.intervals.len();
                    let unit = bin_intervals(&group.intervals, lags)?;
                    debug!("{}: {} pairs binned", group.chrom, unit.pairs_binned);
                    merged.absorb(unit)?;
                }
            }
        }
    }

    stats.pairs_binned = merged.pairs_binned;
    stats.pairs_unbinned = merged.pairs_unbinned;
    info!(
        "Binned {} pairs from {} intervals in {} units ({} unbinned) in {:.2}s",
        stats.pairs_binned,
        stats.intervals,
        stats.units,
        stats.pairs_unbinned,
        start.elapsed().as_secs_f64()
    );

    let results = reduce(merged, options.mode, options.transform)?;
    Ok(AcfOutput { results, stats })
}

/// Local run statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LocalStats {
    pub units: usize,
    pub rows: usize,
}

fn local_rows_parallel(
    pool: &rayon::ThreadPool,
    group: &ChromGroup,
    lags: &LagBinSet,
    transform: ValueTransform,
) -> Result<Vec<LocalRow>> {
    validate_sorted(&group.intervals)?;
    let index = NeighborIndex::new(&group.intervals, lags.max_lag());
    pool.install(|| {
        (0..index.len())
            .into_par_iter()
            .map(|i| local_row(&index.neighborhood(i), lags, transform))
            .collect()
    })
}

/// Compute local autocorrelation for every interval of one file and write
/// the table to `out`. The mode option is ignored: local rows are always
/// computed per bin.
///
/// Every chromosome is computed before anything is written, so a failing
/// run leaves `out` untouched.
pub fn run_local_acf<P: AsRef<Path>, W: Write>(
    file: P,
    lags: &LagBinSet,
    options: &AcfOptions,
    out: &mut W,
) -> Result<LocalStats> {
    let start = Instant::now();
    let pool = build_pool(options.threads)?;
    let mut stats = LocalStats::default();

    let mut rows = Vec::new();
    for group in read_chrom_groups(file.as_ref(), options.value_column)? {
        let group = group?;
        let unit = match &pool {
            Some(pool) => local_rows_parallel(pool, &group, lags, options.transform)?,
            None => local_rows(&group.intervals, lags, options.transform)?,
        };
        debug!("{}: {} local rows", group.chrom, unit.len());
        stats.units += 1;
        rows.extend(unit);
    }
    stats.rows = rows.len();

    report::write_local_header(lags, out)?;
    for row in &rows {
        report::write_local_row(row, out)?;
    }

    info!(
        "Wrote {} local rows from {} units in {:.2}s",
        stats.rows,
        stats.units,
        start.elapsed().as_secs_f64()
    );
    Ok(stats)
}
