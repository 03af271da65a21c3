//! Reports the GTF feature that each position in a position file falls in.
//!
//! ```shell
//! cargo run --release --bin=gtfpos --features=binaries -- positions.tsv genes.gtf
//! ```

use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::ValueEnum;
use clap_verbosity_flag::Verbosity;
use gtfpos::feature;
use gtfpos::index;
use gtfpos::index::SearchStrategy;
use gtfpos::position;
use gtfpos::reader;
use gtfpos::report;
use gtfpos::resolve::NameSource;
use gtfpos::resolve::Resolver;
use tracing::info;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

/// How the candidate feature for a position is chosen.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    /// The feature with the greatest start at or before the position.
    Preceding,
    /// The feature at the leftmost insertion point of the position (only
    /// positions on a feature start are found).
    Leftmost,
}

impl From<Strategy> for SearchStrategy {
    fn from(value: Strategy) -> Self {
        match value {
            Strategy::Preceding => SearchStrategy::Preceding,
            Strategy::Leftmost => SearchStrategy::Leftmost,
        }
    }
}

/// Reports the GTF feature each position falls in.
#[derive(Parser)]
struct Args {
    /// A tab-delimited file of `chromosome<TAB>coordinate` lines (optionally
    /// gzipped).
    positions: PathBuf,

    /// A GTF file (optionally gzipped).
    gtf: PathBuf,

    /// How the candidate feature for a position is chosen.
    #[arg(short, long, value_enum, default_value_t = Strategy::Preceding)]
    strategy: Strategy,

    /// Report the value of this attribute tag instead of the first attribute
    /// value.
    #[arg(short, long)]
    name_tag: Option<String>,

    #[command(flatten)]
    verbose: Verbosity,
}

fn resolve(args: &Args) -> Result<()> {
    for path in [&args.positions, &args.gtf] {
        if !path.exists() {
            bail!(
                "input file does not exist: {}. Please provide existing, accessible files.",
                path.display()
            );
        }
    }

    let gtf = reader::open(&args.gtf)
        .with_context(|| format!("opening GTF file: {}", args.gtf.display()))?;
    let index = index::Builder::default()
        .try_build_from(feature::Reader::new(gtf))
        .with_context(|| format!("reading GTF file: {}", args.gtf.display()))?;
    info!(
        chromosomes = index.len(),
        features = index.num_features(),
        "indexed {}",
        args.gtf.display()
    );

    let positions = reader::open(&args.positions)
        .with_context(|| format!("opening position file: {}", args.positions.display()))?;
    let queries = position::Queries::try_from_reader(position::Reader::new(positions))
        .with_context(|| format!("reading position file: {}", args.positions.display()))?;
    info!(
        chromosomes = queries.len(),
        coordinates = queries.num_coordinates(),
        "read {}",
        args.positions.display()
    );

    let names = match &args.name_tag {
        Some(tag) => NameSource::Tag(tag.clone()),
        None => NameSource::FirstToken,
    };

    let resolver = Resolver::new(&index)
        .with_strategy(args.strategy.into())
        .with_names(names);

    let stdout = io::stdout();
    let stderr = io::stderr();
    let summary = report::run(&resolver, &queries, stdout.lock(), stderr.lock())
        .context("writing results")?;

    info!(
        found = summary.found,
        not_found = summary.not_found,
        malformed = summary.malformed,
        unknown_chromosomes = summary.unknown_chromosomes,
        "resolved {} positions",
        summary.coordinates
    );

    Ok(())
}

/// The process exit code for an argument error: `0` for `--help` and
/// `--version`, `1` for anything else.
fn exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            err.print().context("printing usage")?;
            process::exit(exit_code(&err));
        }
    };

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .with_writer(io::stderr)
            .init(),
    };

    resolve(&args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_arguments_exit_with_one() {
        let err = Args::try_parse_from(["gtfpos", "positions.tsv"]).err().unwrap();
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn help_exits_with_zero() {
        let err = Args::try_parse_from(["gtfpos", "--help"]).err().unwrap();
        assert_eq!(exit_code(&err), 0);
    }

    #[test]
    fn valid_arguments() {
        let args = Args::try_parse_from(["gtfpos", "positions.tsv", "genes.gtf", "-s", "leftmost"])
            .unwrap();
        assert_eq!(args.positions, PathBuf::from("positions.tsv"));
        assert!(matches!(args.strategy, Strategy::Leftmost));
    }
}
