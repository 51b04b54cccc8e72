//! Reduction of merged bins to correlation coefficients
//!
//! Bins are visited from the smallest lag to the largest. In
//! [`AcfMode::Partial`] each bin is correlated on its own pairs; in
//! [`AcfMode::Full`] the pairs of every bin seen so far are accumulated and
//! the correlation is taken over the whole accumulator.

use crate::core::binner::LagBins;
use crate::core::error::TransformError;
use crate::core::lags::LagRange;
use log::debug;
use std::fmt;

/// Correlations need more than this many pairs
pub const MIN_SAMPLES: usize = 3;

/// Which pairs feed the correlation of a bin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcfMode {
    /// Only the pairs of the bin itself
    #[default]
    Partial,
    /// All pairs at or inside the bin's upper lag
    Full,
}

/// Elementwise transform applied to values before correlating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueTransform {
    #[default]
    Identity,
    /// `-log10(v)`, for p-value-like inputs in (0, 1]
    NegLog10,
}

impl ValueTransform {
    /// Transform a slice of values
    pub fn apply(&self, values: &[f64]) -> Result<Vec<f64>, TransformError> {
        match self {
            ValueTransform::Identity => Ok(values.to_vec()),
            ValueTransform::NegLog10 => values
                .iter()
                .map(|&v| {
                    if v > 0.0 && v.is_finite() {
                        Ok(-v.log10())
                    } else {
                        Err(TransformError::OutOfDomain { value: v })
                    }
                })
                .collect(),
        }
    }
}

/// Sample situation of one reported bin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleStatus {
    /// No pairs at all
    Empty,
    /// Between 1 and [`MIN_SAMPLES`] pairs
    TooFew,
    /// Enough pairs to correlate
    Ok,
}

/// Correlation reported for one lag bin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationResult {
    pub lag_min: u64,
    pub lag_max: u64,
    /// `None` is reported as NA
    pub coefficient: Option<f64>,
    /// Number of pairs the coefficient is based on
    pub n: usize,
}

impl CorrelationResult {
    pub fn key(&self) -> (u64, u64) {
        (self.lag_min, self.lag_max)
    }

    pub fn status(&self) -> SampleStatus {
        match self.n {
            0 => SampleStatus::Empty,
            n if n <= MIN_SAMPLES => SampleStatus::TooFew,
            _ => SampleStatus::Ok,
        }
    }
}

impl fmt::Display for CorrelationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.coefficient {
            Some(r) => write!(f, "{}-{}: r={:.4} (n={})", self.lag_min, self.lag_max, r, self.n),
            None => write!(f, "{}-{}: NA (n={})", self.lag_min, self.lag_max, self.n),
        }
    }
}

/// Pearson correlation of two equally long samples.
///
/// Returns `None` when either sample has zero variance or is empty.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    if n == 0 {
        return None;
    }

    let nf = n as f64;
    let mean_x = xs.iter().sum::<f64>() / nf;
    let mean_y = ys.iter().sum::<f64>() / nf;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    let r = sxy / (sxx.sqrt() * syy.sqrt());
    if r.is_finite() {
        Some(r.clamp(-1.0, 1.0))
    } else {
        None
    }
}

/// Correlate already-transformed pairs for one range
pub fn correlate(range: LagRange, xs: &[f64], ys: &[f64]) -> CorrelationResult {
    let n = xs.len();
    let coefficient = if n > MIN_SAMPLES { pearson(xs, ys) } else { None };
    CorrelationResult {
        lag_min: range.lag_min,
        lag_max: range.lag_max,
        coefficient,
        n,
    }
}

/// Reduce merged bins to one result per bin, ordered by ascending lag
pub fn reduce(
    bins: LagBins,
    mode: AcfMode,
    transform: ValueTransform,
) -> Result<Vec<CorrelationResult>, TransformError> {
    let mut results = Vec::with_capacity(bins.bins.len());
    let mut acc_x: Vec<f64> = Vec::new();
    let mut acc_y: Vec<f64> = Vec::new();

    // bins are stored in reduction order already
    for bin in bins.bins {
        let range = LagRange::new(bin.lag_min, bin.lag_max);
        let xs = transform.apply(&bin.xs)?;
        let ys = transform.apply(&bin.ys)?;
        drop(bin);

        let result = match mode {
            AcfMode::Partial => correlate(range, &xs, &ys),
            AcfMode::Full => {
                acc_x.extend(xs);
                acc_y.extend(ys);
                correlate(range, &acc_x, &acc_y)
            }
        };
        debug!("{}", result);
        results.push(result);
    }

    results.sort_by_key(|r| r.key());
    Ok(results)
}
