//! Lag bin layout
//!
//! A [`LagBinSet`] is the ordered set of half-open distance ranges that
//! pairs of intervals are sorted into. It is built once per run and shared
//! read-only by every unit of work.
//!
//! Two orderings are exposed explicitly:
//! - [`LagBinSet::assignment_order`]: largest upper bound first, used while
//!   binning so that the scan can stop as soon as a distance exceeds the
//!   current bin.
//! - [`LagBinSet::reduction_order`]: smallest lag first, used while
//!   reducing bins to correlations.

use crate::core::error::{ConfigResult, ConfigurationError};
use std::fmt;
use std::str::FromStr;

/// Lag specification used when none is given (`start:stop:step`)
pub const DEFAULT_LAG_SPEC: &str = "15:500:50";

/// Upper bound on the number of bins in one set
pub const MAX_LAG_BINS: usize = 100_000;

/// A half-open distance range `[lag_min, lag_max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LagRange {
    pub lag_min: u64,
    pub lag_max: u64,
}

impl LagRange {
    pub fn new(lag_min: u64, lag_max: u64) -> Self {
        Self { lag_min, lag_max }
    }

    /// Check whether a distance falls inside this range
    #[inline]
    pub fn contains(&self, dist: i64) -> bool {
        dist >= self.lag_min as i64 && dist < self.lag_max as i64
    }

    pub fn key(&self) -> (u64, u64) {
        (self.lag_min, self.lag_max)
    }
}

impl fmt::Display for LagRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lag_min, self.lag_max)
    }
}

/// Ordered, disjoint set of lag ranges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LagBinSet {
    /// Ranges sorted by ascending `lag_min`
    ranges: Vec<LagRange>,
}

impl LagBinSet {
    /// Build contiguous bins from `start`, `start + step`, ... up to and
    /// including `stop`.
    ///
    /// # Examples
    /// ```
    /// use fast_acf::core::LagBinSet;
    /// let lags = LagBinSet::new(0, 30, 10).unwrap();
    /// assert_eq!(lags.len(), 3);
    /// assert_eq!(lags.max_lag(), 30);
    /// ```
    pub fn new(start: i64, stop: i64, step: i64) -> ConfigResult<Self> {
        if step <= 0 {
            return Err(ConfigurationError::NonPositiveStep(step));
        }
        if start < 0 {
            return Err(ConfigurationError::NegativeStart(start));
        }

        if stop > start {
            let count = ((stop - start) / step) as u64;
            if count > MAX_LAG_BINS as u64 {
                return Err(ConfigurationError::TooManyBins {
                    count,
                    max: MAX_LAG_BINS,
                });
            }
        }

        let mut boundaries = Vec::new();
        let mut b = start;
        while b <= stop {
            boundaries.push(b as u64);
            b = match b.checked_add(step) {
                Some(next) => next,
                None => break,
            };
        }

        if boundaries.len() < 2 {
            return Err(ConfigurationError::EmptyRange { start, stop, step });
        }

        let ranges = boundaries
            .windows(2)
            .map(|w| LagRange::new(w[0], w[1]))
            .collect();

        Ok(Self { ranges })
    }

    /// Parse a `start:stop:step` string
    pub fn from_spec(spec: &str) -> ConfigResult<Self> {
        let malformed = |message: &str| ConfigurationError::MalformedSpec {
            spec: spec.to_string(),
            message: message.to_string(),
        };

        let fields: Vec<&str> = spec.trim().split(':').collect();
        if fields.len() != 3 {
            return Err(malformed("expected three ':'-separated integers"));
        }

        let mut parsed = [0i64; 3];
        for (slot, field) in parsed.iter_mut().zip(&fields) {
            *slot = field
                .trim()
                .parse()
                .map_err(|_| malformed(&format!("'{}' is not an integer", field)))?;
        }

        Self::new(parsed[0], parsed[1], parsed[2])
    }

    /// Build from explicit ranges, which may leave gaps between them.
    ///
    /// Ranges must be non-empty and pairwise disjoint; they are sorted here.
    pub fn from_ranges(mut ranges: Vec<LagRange>) -> ConfigResult<Self> {
        if ranges.is_empty() {
            return Err(ConfigurationError::InvalidBins("no bins given".to_string()));
        }
        if ranges.len() > MAX_LAG_BINS {
            return Err(ConfigurationError::TooManyBins {
                count: ranges.len() as u64,
                max: MAX_LAG_BINS,
            });
        }
        ranges.sort();

        for r in &ranges {
            if r.lag_min >= r.lag_max {
                return Err(ConfigurationError::InvalidBins(format!("empty bin {}", r)));
            }
        }
        for w in ranges.windows(2) {
            if w[1].lag_min < w[0].lag_max {
                return Err(ConfigurationError::InvalidBins(format!(
                    "bins {} and {} overlap",
                    w[0], w[1]
                )));
            }
        }

        Ok(Self { ranges })
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Largest upper bound across all bins
    pub fn max_lag(&self) -> u64 {
        self.ranges.last().map_or(0, |r| r.lag_max)
    }

    /// Ranges sorted by ascending lag
    pub fn ranges(&self) -> &[LagRange] {
        &self.ranges
    }

    /// Bin indices with the largest upper bound first
    pub fn assignment_order(&self) -> impl Iterator<Item = (usize, &LagRange)> + '_ {
        self.ranges.iter().enumerate().rev()
    }

    /// Bin indices with the smallest lag first
    pub fn reduction_order(&self) -> impl Iterator<Item = (usize, &LagRange)> + '_ {
        self.ranges.iter().enumerate()
    }
}

impl Default for LagBinSet {
    /// Bins of [`DEFAULT_LAG_SPEC`]
    fn default() -> Self {
        let ranges = (0..9u64)
            .map(|i| LagRange::new(15 + 50 * i, 65 + 50 * i))
            .collect();
        Self { ranges }
    }
}

impl FromStr for LagBinSet {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_spec(s)
    }
}
