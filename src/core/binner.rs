//! Pairwise lag binning
//!
//! For one chromosome (or one local neighborhood) every interval `x` is
//! paired with the intervals `y` that follow it, and `(x.value, y.value)` is
//! appended to the bin holding `dist = y.start - x.end`.
//!
//! Input must be sorted by start. For a fixed `x` the distance is then
//! non-decreasing along the forward scan, so the scan for `x` stops at the
//! first `y` further than the largest lag. The sort order is validated up
//! front rather than trusted.

use crate::core::error::{BinningError, BinningResult};
use crate::core::lags::{LagBinSet, LagRange};
use std::sync::Arc;

/// A genomic interval carrying a numeric value
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    /// Chromosome name, shared by all intervals of one group
    pub chrom: Arc<str>,
    /// Start position (0-based)
    pub start: u64,
    /// End position (exclusive)
    pub end: u64,
    /// Value to correlate
    pub value: f64,
}

impl Interval {
    pub fn new(chrom: impl Into<Arc<str>>, start: u64, end: u64, value: f64) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
            value,
        }
    }

    /// Distance from the end of `self` to the start of a later interval
    #[inline]
    pub fn distance_to(&self, later: &Interval) -> i64 {
        later.start as i64 - self.end as i64
    }
}

impl AsRef<Interval> for Interval {
    fn as_ref(&self) -> &Interval {
        self
    }
}

/// Paired values accumulated for one lag range
///
/// `xs[i]` and `ys[i]` always form one pair: `xs` holds the earlier
/// interval's value and `ys` the later one's.
#[derive(Debug, Clone, PartialEq)]
pub struct LagBin {
    pub lag_min: u64,
    pub lag_max: u64,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl LagBin {
    pub fn empty(range: &LagRange) -> Self {
        Self {
            lag_min: range.lag_min,
            lag_max: range.lag_max,
            xs: Vec::new(),
            ys: Vec::new(),
        }
    }

    pub fn key(&self) -> (u64, u64) {
        (self.lag_min, self.lag_max)
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    #[inline]
    fn push(&mut self, x: f64, y: f64) {
        self.xs.push(x);
        self.ys.push(y);
    }
}

/// One accumulation set: a [`LagBin`] per range of a [`LagBinSet`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LagBins {
    /// Bins in ascending lag order, aligned with [`LagBinSet::ranges`]
    pub bins: Vec<LagBin>,
    /// Pairs within the largest lag that were assigned to a bin
    pub pairs_binned: usize,
    /// Pairs within the largest lag that fell outside every bin
    pub pairs_unbinned: usize,
}

impl LagBins {
    /// Empty accumulation set for a bin layout
    pub fn empty(lags: &LagBinSet) -> Self {
        Self {
            bins: lags.ranges().iter().map(LagBin::empty).collect(),
            pairs_binned: 0,
            pairs_unbinned: 0,
        }
    }

    /// Total number of binned pairs across all bins
    pub fn total_pairs(&self) -> usize {
        self.bins.iter().map(LagBin::len).sum()
    }
}

/// Outcome of assigning one pair distance to a bin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Index of the matching bin
    Binned(usize),
    /// Distance falls in a gap or outside every bin
    Unbinned,
}

/// Find the bin for a distance, scanning from the largest bin down.
///
/// A distance at or past the upper edge of the current bin cannot match any
/// smaller bin, so the scan stops there.
#[inline]
pub fn assign(lags: &LagBinSet, dist: i64) -> Assignment {
    for (idx, range) in lags.assignment_order() {
        if range.contains(dist) {
            return Assignment::Binned(idx);
        }
        if dist >= range.lag_max as i64 {
            return Assignment::Unbinned;
        }
    }
    Assignment::Unbinned
}

/// Check that intervals are sorted by start and well formed
pub fn validate_sorted<T: AsRef<Interval>>(intervals: &[T]) -> BinningResult<()> {
    let mut previous: Option<&Interval> = None;
    for (index, item) in intervals.iter().enumerate() {
        let iv = item.as_ref();
        if iv.start > iv.end {
            return Err(BinningError::InvalidInterval {
                chrom: iv.chrom.to_string(),
                start: iv.start,
                end: iv.end,
            });
        }
        if let Some(prev) = previous {
            if iv.start < prev.start {
                return Err(BinningError::Unsorted {
                    chrom: iv.chrom.to_string(),
                    index,
                    previous_start: prev.start,
                    start: iv.start,
                });
            }
        }
        previous = Some(iv);
    }
    Ok(())
}

/// Bin all forward pairs of a sorted interval sequence.
///
/// # Examples
/// ```
/// use fast_acf::core::{bin_intervals, Interval, LagBinSet};
/// let ivs = vec![
///     Interval::new("chr1", 0, 10, 0.1),
///     Interval::new("chr1", 20, 30, 0.2),
/// ];
/// let lags = LagBinSet::new(0, 20, 10).unwrap();
/// let bins = bin_intervals(&ivs, &lags).unwrap();
/// assert_eq!(bins.bins[1].xs, vec![0.1]);
/// ```
pub fn bin_intervals<T: AsRef<Interval>>(
    intervals: &[T],
    lags: &LagBinSet,
) -> BinningResult<LagBins> {
    validate_sorted(intervals)?;

    let mut out = LagBins::empty(lags);
    let max_lag = lags.max_lag() as i64;

    for (ix, x) in intervals.iter().enumerate() {
        let x = x.as_ref();
        for y in &intervals[ix + 1..] {
            let y = y.as_ref();
            let dist = x.distance_to(y);
            if dist > max_lag {
                break;
            }

            match assign(lags, dist) {
                Assignment::Binned(idx) => {
                    out.bins[idx].push(x.value, y.value);
                    out.pairs_binned += 1;
                }
                Assignment::Unbinned => out.pairs_unbinned += 1,
            }
        }
    }

    Ok(out)
}
