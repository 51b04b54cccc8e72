//! One-line text chart of coefficients across lags

use crate::core::CorrelationResult;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render values as a sparkline; missing values become blanks
///
/// # Examples
/// ```
/// use fast_acf::formats::chart::sparkline;
/// assert_eq!(sparkline(&[Some(0.0), None, Some(1.0)]), "▁ █");
/// ```
pub fn sparkline(values: &[Option<f64>]) -> String {
    let present = values.iter().flatten().copied();
    let (lo, hi) = present.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let span = hi - lo;

    values
        .iter()
        .map(|v| match v {
            None => ' ',
            Some(_) if span <= 0.0 => BARS[BARS.len() / 2],
            Some(v) => {
                let level = ((v - lo) / span * (BARS.len() - 1) as f64).round() as usize;
                BARS[level.min(BARS.len() - 1)]
            }
        })
        .collect()
}

/// Summary line for a set of results: sparkline, lag span and value range
pub fn summarize(results: &[CorrelationResult]) -> String {
    let values: Vec<Option<f64>> = results.iter().map(|r| r.coefficient).collect();
    let spark = sparkline(&values);

    let lags = match (results.first(), results.last()) {
        (Some(first), Some(last)) => format!("{}..{}", first.lag_min, last.lag_max),
        _ => String::from("-"),
    };
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let range = if present.is_empty() {
        String::from("NA")
    } else {
        let lo = present.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        format!("{:.3}..{:.3}", lo, hi)
    };

    format!("{} lag {} r {}", spark, lags, range)
}
