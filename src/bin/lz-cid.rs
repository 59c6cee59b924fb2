//! LZ77 compression entropy (CID) of a symbol file.
//!
//! ## Usage
//!
//! ```bash
//! # CID only
//! lz-cid snapshot.bin
//!
//! # length<TAB>factors<TAB>cid
//! lz-cid -t snapshot.bin
//!
//! # Human-readable report plus diagnostics on stderr
//! lz-cid -v snapshot.bin
//!
//! # Sequence line plus precomputed sa_seq.txt next to it
//! lz-cid --legacy seq.txt
//!
//! # Normalize against 10 shuffled copies
//! lz-cid --shuffles 10 --seed 1 snapshot.bin
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use cid_rs::{
    legacy, CidAnalyzer, CompressionStats, Error, FactorizeOptions, NormalizedCid, Overlap,
    ShuffleBaseline, Strategy,
};

#[derive(Parser, Debug)]
#[command(name = "lz-cid")]
#[command(version)]
#[command(about = "Computes LZ77-based compression entropy (CID)", long_about = None)]
struct Args {
    /// Tab-delimited output (length\tfactors\tcid)
    #[arg(short = 't')]
    tab: bool,

    /// Verbose output
    #[arg(short = 'v')]
    verbose: bool,

    /// JSON output
    #[arg(long, conflicts_with = "tab")]
    json: bool,

    /// Matching strategy
    #[arg(long, value_enum, default_value = "accelerated")]
    strategy: StrategyArg,

    /// Allow copies to overlap the text they produce
    #[arg(long)]
    overlap: bool,

    /// Read the first line of the input and its precomputed sa_<input> file
    #[arg(long)]
    legacy: bool,

    /// Also normalize against this many shuffled copies
    #[arg(long)]
    shuffles: Option<usize>,

    /// Seed for the shuffled copies
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Log level; overrides -v
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    /// Input file
    input: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Reference,
    Accelerated,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Reference => Strategy::Reference,
            StrategyArg::Accelerated => Strategy::Accelerated,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(arg: LogLevel) -> Self {
        match arg {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

fn init_logging(args: &Args) {
    let level = match args.log_level {
        Some(level) => level.into(),
        None if args.verbose => Level::DEBUG,
        None => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    // Only fails if a subscriber is already installed.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn read_input(path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn run(args: &Args) -> Result<(), Error> {
    let options = FactorizeOptions::default()
        .with_strategy(args.strategy.into())
        .with_overlap(if args.overlap {
            Overlap::Allowed
        } else {
            Overlap::NonOverlapping
        });
    let analyzer = CidAnalyzer::new(options);

    let (text, stats) = if args.legacy {
        let (text, sa) = legacy::load(&args.input)?;
        let stats = analyzer.analyze_with(&text, &sa)?.stats;
        (text, stats)
    } else {
        let text = read_input(&args.input)?;
        debug!(path = %args.input.display(), bytes = text.len(), "input read");
        let stats = analyzer.stats(&text)?;
        (text, stats)
    };

    let baseline = args
        .shuffles
        .map(|shuffles| ShuffleBaseline::new(shuffles, args.seed).compute(&analyzer, &text))
        .transpose()?;

    print_report(args, &stats, baseline.as_ref());
    Ok(())
}

fn print_report(args: &Args, stats: &CompressionStats, baseline: Option<&NormalizedCid>) {
    if args.json {
        println!("{}", json!({ "stats": stats, "baseline": baseline }));
    } else if args.tab {
        match baseline {
            Some(b) => println!(
                "{}\t{}\t{}\t{}\t{}",
                stats.length, stats.factors, stats.cid, b.cid_shuffled, b.cid_normalized
            ),
            None => println!("{}\t{}\t{}", stats.length, stats.factors, stats.cid),
        }
    } else if args.verbose {
        println!("Input length:         {} bytes", stats.length);
        println!("LZ77 factors:         {}", stats.factors);
        println!("Compressed size:      {} bits", stats.compressed_bits);
        println!("Compressed size:      {} bytes", stats.compressed_bytes());
        println!("Compression ratio:    {}", stats.compression_ratio());
        println!("CID (bits/char):      {}", stats.cid);
        if stats.is_incompressible() {
            println!("Regime:               incompressible");
        }
        if let Some(b) = baseline {
            println!(
                "CID (shuffled):       {} +/- {}",
                b.cid_shuffled, b.cid_shuffled_std
            );
            println!("CID (normalized):     {}", b.cid_normalized);
            println!("Compression gain:     {}", b.compression_gain);
        }
    } else {
        println!("{}", stats.cid);
        if let Some(b) = baseline {
            println!("{}", b.cid_normalized);
        }
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // Help and version go to stdout with success; usage errors exit 1.
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    init_logging(&args);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
