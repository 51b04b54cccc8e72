//! Local autocorrelation
//!
//! Runs the binning kernel on each interval's bounded neighborhood instead
//! of a whole chromosome and correlates every bin on its own pairs.

use crate::core::binner::{bin_intervals, validate_sorted, Interval};
use crate::core::correlation::{correlate, CorrelationResult, ValueTransform};
use crate::core::error::Result;
use crate::core::lags::{LagBinSet, LagRange};
use crate::core::window::{NeighborIndex, Neighborhood};
use std::sync::Arc;

/// One output row of local mode
#[derive(Debug, Clone, PartialEq)]
pub struct LocalRow {
    pub chrom: Arc<str>,
    pub start: u64,
    pub end: u64,
    pub value: f64,
    /// One result per bin, largest lag first
    pub cells: Vec<CorrelationResult>,
}

/// Correlations for a single neighborhood
pub fn local_row(
    hood: &Neighborhood<'_>,
    lags: &LagBinSet,
    transform: ValueTransform,
) -> Result<LocalRow> {
    let members = hood.members();
    let bins = bin_intervals(&members, lags)?;

    let mut cells = Vec::with_capacity(bins.bins.len());
    for bin in bins.bins.into_iter().rev() {
        let xs = transform.apply(&bin.xs)?;
        let ys = transform.apply(&bin.ys)?;
        cells.push(correlate(LagRange::new(bin.lag_min, bin.lag_max), &xs, &ys));
    }

    let center = hood.center;
    Ok(LocalRow {
        chrom: Arc::clone(&center.chrom),
        start: center.start,
        end: center.end,
        value: center.value,
        cells,
    })
}

/// Local rows for one chromosome's sorted intervals, in input order
pub fn local_rows(
    intervals: &[Interval],
    lags: &LagBinSet,
    transform: ValueTransform,
) -> Result<Vec<LocalRow>> {
    validate_sorted(intervals)?;
    let index = NeighborIndex::new(intervals, lags.max_lag());
    index.iter().map(|hood| local_row(&hood, lags, transform)).collect()
}
