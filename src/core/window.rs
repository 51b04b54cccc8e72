//! Bounded neighborhoods for local autocorrelation
//!
//! Uses rust-lapper for O(log n + k) window queries over one chromosome.

use crate::core::binner::Interval;
use rust_lapper::Lapper;

/// An interval and every other interval within `max_lag` of it
#[derive(Debug, Clone)]
pub struct Neighborhood<'a> {
    pub center: &'a Interval,
    /// Neighbors in input (start-sorted) order, center excluded
    pub neighbors: Vec<&'a Interval>,
}

impl<'a> Neighborhood<'a> {
    /// Center and neighbors together, sorted by start
    pub fn members(&self) -> Vec<&'a Interval> {
        let at = self
            .neighbors
            .partition_point(|iv| iv.start <= self.center.start);
        let mut out = Vec::with_capacity(self.neighbors.len() + 1);
        out.extend_from_slice(&self.neighbors[..at]);
        out.push(self.center);
        out.extend_from_slice(&self.neighbors[at..]);
        out
    }
}

/// Neighbor index over one chromosome's sorted intervals
pub struct NeighborIndex<'a> {
    intervals: &'a [Interval],
    /// Positions stored as `[start, end + 1)` so zero-length intervals are found
    lapper: Lapper<u64, usize>,
    max_lag: u64,
}

impl<'a> NeighborIndex<'a> {
    pub fn new(intervals: &'a [Interval], max_lag: u64) -> Self {
        let entries = intervals
            .iter()
            .enumerate()
            .map(|(idx, iv)| rust_lapper::Interval {
                start: iv.start,
                stop: iv.end + 1,
                val: idx,
            })
            .collect();
        Self {
            intervals,
            lapper: Lapper::new(entries),
            max_lag,
        }
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Neighborhood of the interval at `idx`.
    ///
    /// A neighbor `y` of `x` satisfies `y.start - x.end <= max_lag` and
    /// `x.start - y.end <= max_lag`, whichever side it lies on.
    pub fn neighborhood(&self, idx: usize) -> Neighborhood<'a> {
        let center = &self.intervals[idx];
        let lo = center.start.saturating_sub(self.max_lag);
        let hi = center.end.saturating_add(self.max_lag).saturating_add(1);

        let mut found: Vec<usize> = self
            .lapper
            .find(lo, hi)
            .map(|iv| iv.val)
            .filter(|&i| i != idx)
            .collect();
        found.sort_unstable();

        Neighborhood {
            center,
            neighbors: found.into_iter().map(|i| &self.intervals[i]).collect(),
        }
    }

    /// Neighborhoods of every interval, in input order
    pub fn iter(&self) -> impl Iterator<Item = Neighborhood<'a>> + '_ {
        (0..self.intervals.len()).map(move |i| self.neighborhood(i))
    }
}
