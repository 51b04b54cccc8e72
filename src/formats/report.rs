//! Text output of genome-wide and local results

use crate::core::{CorrelationResult, LagBinSet, LocalRow, SampleStatus};
use crate::formats::chart;
use std::io::{self, Write};

/// Format a float like C's `%.{precision}g`
///
/// # Examples
/// ```
/// use fast_acf::formats::report::format_g;
/// assert_eq!(format_g(0.25, 4), "0.25");
/// assert_eq!(format_g(1e-5, 4), "1e-05");
/// assert_eq!(format_g(123456.0, 4), "1.235e+05");
/// ```
pub fn format_g(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let p = precision.max(1);
    let sci = format!("{:.*e}", p - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= p as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// `%.4g` coefficient or `NA`
pub fn format_coefficient(coefficient: Option<f64>) -> String {
    coefficient.map_or_else(|| "NA".to_string(), |r| format_g(r, 4))
}

/// Write the genome-wide table: chart line, header, one row per bin
pub fn write_acf<W: Write>(results: &[CorrelationResult], out: &mut W) -> io::Result<()> {
    writeln!(out, "# {}", chart::summarize(results))?;
    writeln!(out, "#lag_min\tlag_max\tcorrelation\tN")?;
    for r in results {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            r.lag_min,
            r.lag_max,
            format_coefficient(r.coefficient),
            r.n
        )?;
    }
    Ok(())
}

/// Write one warning line per bin without any pairs; returns how many
pub fn write_warnings<W: Write>(results: &[CorrelationResult], out: &mut W) -> io::Result<usize> {
    let mut count = 0;
    for r in results.iter().filter(|r| r.status() == SampleStatus::Empty) {
        writeln!(out, "no values found at lag: {}-{}", r.lag_min, r.lag_max)?;
        count += 1;
    }
    Ok(count)
}

/// Header of the local table, bins largest lag first
pub fn write_local_header<W: Write>(lags: &LagBinSet, out: &mut W) -> io::Result<()> {
    write!(out, "#chrom\tstart\tend\tp")?;
    for (_, range) in lags.assignment_order() {
        write!(out, "\t{}-corr\t{}-N", range, range)?;
    }
    writeln!(out)
}

/// One row of the local table
pub fn write_local_row<W: Write>(row: &LocalRow, out: &mut W) -> io::Result<()> {
    write!(
        out,
        "{}\t{}\t{}\t{}",
        row.chrom,
        row.start,
        row.end,
        format_g(row.value, 4)
    )?;
    for cell in &row.cells {
        write!(out, "\t{}\t{}", format_coefficient(cell.coefficient), cell.n)?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn result(lag_min: u64, lag_max: u64, coefficient: Option<f64>, n: usize) -> CorrelationResult {
        CorrelationResult { lag_min, lag_max, coefficient, n }
    }

    #[test]
    fn test_format_g() {
        assert_eq!(format_g(0.5, 4), "0.5");
        assert_eq!(format_g(1.0, 4), "1");
        assert_eq!(format_g(-0.8, 4), "-0.8");
        assert_eq!(format_g(0.0, 4), "0");
        assert_eq!(format_g(0.0001, 4), "0.0001");
        assert_eq!(format_g(0.00001, 4), "1e-05");
        assert_eq!(format_g(1234.0, 4), "1234");
        assert_eq!(format_g(12340.0, 4), "1.234e+04");
        assert_eq!(format_g(2.0 / 3.0, 4), "0.6667");
    }

    #[test]
    fn test_write_acf() {
        let results = vec![result(0, 15, None, 2), result(15, 35, Some(0.5), 10)];
        let mut buf = Vec::new();
        write_acf(&results, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("# "));
        assert_eq!(lines[1], "#lag_min\tlag_max\tcorrelation\tN");
        assert_eq!(lines[2], "0\t15\tNA\t2");
        assert_eq!(lines[3], "15\t35\t0.5\t10");
    }

    #[test]
    fn test_write_warnings() {
        let results = vec![result(0, 15, None, 0), result(15, 35, None, 3), result(35, 50, None, 0)];
        let mut buf = Vec::new();
        assert_eq!(write_warnings(&results, &mut buf).unwrap(), 2);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "no values found at lag: 0-15\nno values found at lag: 35-50\n"
        );
    }

    #[test]
    fn test_local_output() {
        let lags = LagBinSet::new(0, 20, 10).unwrap();
        let mut buf = Vec::new();
        write_local_header(&lags, &mut buf).unwrap();

        let row = LocalRow {
            chrom: Arc::from("chr1"),
            start: 5,
            end: 10,
            value: 0.01,
            cells: vec![result(10, 20, Some(0.25), 8), result(0, 10, None, 1)],
        };
        write_local_row(&row, &mut buf).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "#chrom\tstart\tend\tp\t10-20-corr\t10-20-N\t0-10-corr\t0-10-N\n\
             chr1\t5\t10\t0.01\t0.25\t8\tNA\t1\n"
        );
    }
}
