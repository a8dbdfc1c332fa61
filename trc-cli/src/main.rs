//! TRC Decoder CLI Application
//!
//! Command-line front end for the trc-decoder library: converts a PCAN TRC
//! trace file (version 1.3 or 2.1) into a CSV table with the J1939
//! identifier fields broken out per frame.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use trc_decoder::TrcParser;

mod sink;

/// TRC Decoder - Convert PCAN TRC trace files to J1939 CSV tables
#[derive(Parser, Debug)]
#[command(name = "trc-cli")]
#[command(about = "Convert PCAN TRC trace files (1.3 / 2.1) to J1939 CSV", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the TRC trace file to convert
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output CSV file (default: input path with .csv extension)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Maximum number of records to convert (for testing)
    #[arg(long, value_name = "COUNT")]
    max_records: Option<usize>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("TRC Decoder CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", trc_decoder::VERSION);

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("csv"));

    log::info!("Processing: {:?}", args.input);
    log::info!("Output file: {:?}", output);

    let mut records = TrcParser::parse(&args.input)
        .with_context(|| format!("Failed to parse trace file {:?}", args.input))?;
    log::info!("Trace file version: {}", records.version());

    let out_file = File::create(&output)
        .with_context(|| format!("Failed to create output file {:?}", output))?;
    let mut csv_sink = sink::CsvSink::new(BufWriter::new(out_file))?;

    let mut written = 0usize;
    for record in records.by_ref() {
        let record = record.context("Failed to read trace file")?;
        csv_sink.write_record(&record)?;
        written += 1;

        if let Some(max) = args.max_records {
            if written >= max {
                log::info!("Record limit of {} reached, stopping", max);
                break;
            }
        }
    }
    csv_sink.finish()?;

    if records.lines_skipped > 0 {
        log::warn!(
            "{} of {} data lines did not match the {} grammar and were skipped",
            records.lines_skipped,
            records.lines_processed,
            records.version()
        );
    }

    if !args.quiet {
        println!("CSV file created: {}", output.display());
        println!(
            "  Records written: {} (skipped lines: {})",
            written, records.lines_skipped
        );
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
