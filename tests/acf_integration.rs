//! End-to-end tests over BED files on disk

use fast_acf::core::{AcfError, AcfMode, LagBinSet, TransformError, ValueTransform};
use fast_acf::formats::{run_acf, run_local_acf, write_acf, write_warnings, AcfOptions, ValueColumn};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

/// Deterministic pseudo-random p-values on a few chromosomes
fn synthetic_bed(chroms: &[&str], per_chrom: u64) -> String {
    let mut out = String::from("#chrom\tstart\tend\tp\n");
    let mut state: u64 = 42;
    for chrom in chroms {
        let mut pos = 0;
        for _ in 0..per_chrom {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let gap = (state >> 33) % 40;
            let p = ((state >> 11) % 999 + 1) as f64 / 1000.0;
            pos += gap;
            out.push_str(&format!("{}\t{}\t{}\t{}\n", chrom, pos, pos + 10, p));
        }
    }
    out
}

fn write_plain(content: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

fn write_gz(content: &str) -> NamedTempFile {
    let mut f = Builder::new().suffix(".bed.gz").tempfile().unwrap();
    {
        let mut enc = flate2::write::GzEncoder::new(&mut f, flate2::Compression::default());
        enc.write_all(content.as_bytes()).unwrap();
        enc.finish().unwrap();
    }
    f.flush().unwrap();
    f
}

#[test]
fn test_threads_do_not_change_results() {
    let f = write_plain(&synthetic_bed(&["chr1", "chr2", "chr3", "chrX"], 300));
    let lags = LagBinSet::from_spec("0:100:20").unwrap();

    for mode in [AcfMode::Partial, AcfMode::Full] {
        let seq = AcfOptions { mode, ..AcfOptions::default() };
        let par = AcfOptions { mode, threads: 4, ..AcfOptions::default() };
        let a = run_acf(&[f.path()], &lags, &seq).unwrap();
        let b = run_acf(&[f.path()], &lags, &par).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.stats.units, 4);
        assert_eq!(a.stats.intervals, 1200);
    }
}

#[test]
fn test_gzip_input_matches_plain() {
    let content = synthetic_bed(&["chr1", "chr2"], 200);
    let plain = write_plain(&content);
    let gz = write_gz(&content);
    let lags = LagBinSet::default();

    let a = run_acf(&[plain.path()], &lags, &AcfOptions::default()).unwrap();
    let b = run_acf(&[gz.path()], &lags, &AcfOptions::default()).unwrap();
    assert_eq!(a.results, b.results);
}

#[test]
fn test_multiple_files_merge_like_one() {
    let one = write_plain(&synthetic_bed(&["chr1", "chr2"], 150));
    let text = synthetic_bed(&["chr1", "chr2"], 150);
    let split_at = text.find("chr2\t").unwrap();
    let first = write_plain(&text[..split_at]);
    let second = write_plain(&text[split_at..]);
    let lags = LagBinSet::from_spec("0:60:15").unwrap();

    let whole = run_acf(&[one.path()], &lags, &AcfOptions::default()).unwrap();
    let parts = run_acf(&[first.path(), second.path()], &lags, &AcfOptions::default()).unwrap();
    assert_eq!(whole.results, parts.results);
    assert_eq!(parts.stats.files, 2);
}

#[test]
fn test_full_mode_accumulates_partial_counts() {
    let f = write_plain(&synthetic_bed(&["chr1"], 400));
    let lags = LagBinSet::from_spec("0:80:20").unwrap();

    let partial = run_acf(&[f.path()], &lags, &AcfOptions::default()).unwrap();
    let full = run_acf(
        &[f.path()],
        &lags,
        &AcfOptions { mode: AcfMode::Full, ..AcfOptions::default() },
    )
    .unwrap();

    let mut running = 0;
    for (p, c) in partial.results.iter().zip(&full.results) {
        running += p.n;
        assert_eq!(c.n, running);
    }
    assert_eq!(partial.results[0], full.results[0]);
}

#[test]
fn test_neg_log10_transform() {
    let f = write_plain(&synthetic_bed(&["chr1"], 200));
    let options = AcfOptions { transform: ValueTransform::NegLog10, ..AcfOptions::default() };
    let out = run_acf(&[f.path()], &LagBinSet::default(), &options).unwrap();
    assert!(out.results.iter().any(|r| r.coefficient.is_some()));

    let bad = write_plain("chr1\t0\t10\t0.5\nchr1\t20\t30\t0\n");
    let lags = LagBinSet::from_spec("0:20:10").unwrap();
    let err = run_acf(&[bad.path()], &lags, &options).unwrap_err();
    assert!(matches!(err, AcfError::Transform(TransformError::OutOfDomain { .. })));
}

#[test]
fn test_value_column_selection() {
    let f = write_plain("chr1\t0\t10\tname\t0.5\t+\nchr1\t20\t30\tname\t0.25\t-\n");
    let lags = LagBinSet::from_spec("0:20:10").unwrap();

    let options = AcfOptions { value_column: ValueColumn::from_arg(5).unwrap(), ..AcfOptions::default() };
    let out = run_acf(&[f.path()], &lags, &options).unwrap();
    assert_eq!(out.results[1].n, 1);

    // column 4 holds names
    let err = run_acf(&[f.path()], &lags, &AcfOptions::default()).unwrap_err();
    assert!(matches!(err, AcfError::Input(_)));
}

#[test]
fn test_report_output() {
    let f = write_plain("chr1\t0\t10\t0.1\nchr1\t20\t30\t0.2\nchr1\t40\t50\t0.3\n");
    let lags = LagBinSet::from_spec("0:60:20").unwrap();
    let out = run_acf(&[f.path()], &lags, &AcfOptions::default()).unwrap();

    let mut text = Vec::new();
    write_acf(&out.results, &mut text).unwrap();
    let text = String::from_utf8(text).unwrap();
    let rows: Vec<&str> = text.lines().skip(2).collect();
    assert_eq!(rows, vec!["0\t20\tNA\t2", "20\t40\tNA\t1", "40\t60\tNA\t0"]);

    let mut warnings = Vec::new();
    assert_eq!(write_warnings(&out.results, &mut warnings).unwrap(), 1);
    assert_eq!(String::from_utf8(warnings).unwrap(), "no values found at lag: 40-60\n");
}

#[test]
fn test_local_sequential_matches_parallel() {
    let f = write_plain(&synthetic_bed(&["chr1", "chr2"], 120));
    let lags = LagBinSet::from_spec("0:60:20").unwrap();
    let seq_opts = AcfOptions { transform: ValueTransform::NegLog10, ..AcfOptions::default() };
    let par_opts = AcfOptions { threads: 3, ..seq_opts };

    let mut seq = Vec::new();
    let mut par = Vec::new();
    let stats = run_local_acf(f.path(), &lags, &seq_opts, &mut seq).unwrap();
    run_local_acf(f.path(), &lags, &par_opts, &mut par).unwrap();

    assert_eq!(stats.rows, 240);
    assert_eq!(seq, par);
    let text = String::from_utf8(seq).unwrap();
    assert_eq!(text.lines().count(), 241);
    assert!(text.lines().nth(1).unwrap().split('\t').count() == 4 + 2 * lags.len());
}
