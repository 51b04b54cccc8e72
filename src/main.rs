//! FastACF CLI entry point
//!
//! Autocorrelation of values in sorted BED files across distance lags.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use fast_acf::core::{AcfMode, LagBinSet, ValueTransform, DEFAULT_LAG_SPEC};
use fast_acf::formats::{self, AcfOptions, ValueColumn};
use log::warn;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Value transform applied before correlating (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum TransformArg {
    /// Correlate raw values
    #[default]
    #[value(name = "none")]
    None,
    /// Correlate -log10 of the values (p-values)
    #[value(name = "neg-log10")]
    NegLog10,
}

impl From<TransformArg> for ValueTransform {
    fn from(arg: TransformArg) -> Self {
        match arg {
            TransformArg::None => ValueTransform::Identity,
            TransformArg::NegLog10 => ValueTransform::NegLog10,
        }
    }
}

#[derive(Parser)]
#[command(name = "fast-acf")]
#[command(about = "Autocorrelation of values in sorted BED files across distance lags")]
#[command(version)]
#[command(author = "FastACF Contributors")]
struct Cli {
    /// start:stop:step of distance; stop is inclusive
    #[arg(short = 'd', default_value = DEFAULT_LAG_SPEC, allow_hyphen_values = true)]
    lags: String,

    /// Column holding the value (1-based; negative counts from the end)
    #[arg(short = 'c', default_value = "4", allow_hyphen_values = true)]
    column: i64,

    /// Full (cumulative) autocorrelation instead of partial
    #[arg(long)]
    full: bool,

    /// Per-interval autocorrelation over each interval's neighborhood.
    /// Values are correlated as given; pass `--transform neg-log10` to
    /// correlate -log10 p-values as cpv's local mode does
    #[arg(long, conflicts_with = "full")]
    local: bool,

    /// Value transform applied before correlating
    #[arg(long, default_value = "none")]
    transform: TransformArg,

    /// Number of threads
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,

    /// Output file (stdout if not specified)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Sorted BED files to process
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn open_output(path: Option<&PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::with_capacity(
            128 * 1024,
            File::create(p).with_context(|| format!("Failed to create {:?}", p))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let start = Instant::now();

    let lags = LagBinSet::from_spec(&cli.lags).context("Invalid lag specification")?;
    let options = AcfOptions {
        mode: if cli.full { AcfMode::Full } else { AcfMode::Partial },
        transform: cli.transform.into(),
        value_column: ValueColumn::from_arg(cli.column)?,
        threads: cli.threads.max(1),
    };
    let mut out = open_output(cli.output.as_ref())?;

    if cli.local {
        if cli.files.len() > 1 {
            warn!("local mode reads only the first file: {:?}", cli.files[0]);
        }
        let stats = formats::run_local_acf(&cli.files[0], &lags, &options, &mut out)?;
        out.flush()?;
        eprintln!("Local rows:      {}", stats.rows);
    } else {
        let output = formats::run_acf(&cli.files, &lags, &options)?;
        formats::write_acf(&output.results, &mut out)?;
        out.flush()?;
        formats::write_warnings(&output.results, &mut io::stderr().lock())?;

        eprintln!("\n=== ACF Statistics ===");
        eprintln!("Files:           {}", output.stats.files);
        eprintln!("Chromosomes:     {}", output.stats.units);
        eprintln!("Intervals:       {}", output.stats.intervals);
        eprintln!("Pairs binned:    {}", output.stats.pairs_binned);
        eprintln!("Pairs unbinned:  {}", output.stats.pairs_unbinned);
    }
    eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_local_help_names_the_transform() {
        let cmd = Cli::command();
        let local = cmd
            .get_arguments()
            .find(|a| a.get_id() == "local")
            .unwrap();
        let help = local.get_long_help().or(local.get_help()).unwrap().to_string();
        assert!(help.contains("--transform neg-log10"), "{}", help);
    }

    #[test]
    fn test_local_defaults_to_identity() {
        let cli = Cli::try_parse_from(["fast-acf", "--local", "in.bed"]).unwrap();
        assert!(cli.local);
        assert_eq!(ValueTransform::from(cli.transform), ValueTransform::Identity);

        let cli = Cli::try_parse_from(["fast-acf", "--local", "--transform", "neg-log10", "in.bed"]).unwrap();
        assert_eq!(ValueTransform::from(cli.transform), ValueTransform::NegLog10);
    }
}
