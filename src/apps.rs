//! CLI definitions and runnable entry points for the shipped binaries.
//!
//! Binaries stay thin: argument parsing, logging setup, and report printing
//! live here so both tools can be driven from tests with a plain argument
//! iterator instead of a spawned process.

use std::error::Error;
use std::path::PathBuf;

use clap::{ArgGroup, Parser, error::ErrorKind};

use crate::constants::sampler::DEFAULT_SEED;
use crate::constants::verify::DEFAULT_PREVIEW_RECORDS;
use crate::errors::SubsetError;
use crate::store::FsDatasetStore;
use crate::subset::{SubsetSpec, create_subset};
use crate::utils::{banner_rule, format_count};
use crate::verify::{CheckStatus, VerifyOptions, VerifyReport, verify_subset};

#[derive(Debug, Parser)]
#[command(
    name = "create_subset",
    disable_help_subcommand = true,
    about = "Draw a reproducible random subset from an on-disk dataset",
    long_about = "Load a dataset, draw a seeded random sample of its records without replacement, and save the selection as a new dataset. Selected records keep their original relative order.",
    after_help = "Examples:\n  create_subset --input ./tokenized/wmt22_train --output ./tokenized/wmt22_train_1m --size 1000000\n  create_subset --input ./tokenized/wmt22_train --output ./tokenized/wmt22_train_10pct --percentage 0.1",
    group(ArgGroup::new("target").required(true).args(["size", "percentage"]))
)]
struct CreateSubsetCli {
    #[arg(long, value_name = "PATH", help = "Source dataset directory")]
    input: PathBuf,
    #[arg(
        long,
        value_name = "PATH",
        help = "Destination directory for the subset"
    )]
    output: PathBuf,
    #[arg(long, value_name = "N", help = "Number of records to keep")]
    size: Option<usize>,
    #[arg(
        long,
        value_name = "P",
        help = "Fraction of records to keep, e.g. 0.1 for 10%"
    )]
    percentage: Option<f64>,
    #[arg(
        long,
        default_value_t = DEFAULT_SEED,
        help = "Seed for reproducible sampling"
    )]
    seed: u64,
}

#[derive(Debug, Parser)]
#[command(
    name = "verify_subset",
    disable_help_subcommand = true,
    about = "Verify a dataset subset against its source",
    long_about = "Compare a subset dataset against its original: existence, loadability, size relationship, feature schema, first-record structure, and a short record preview. Exits 0 when all checks pass, 1 otherwise.",
    after_help = "Examples:\n  verify_subset --original ./tokenized/wmt22_train --subset ./tokenized/wmt22_train_10pct\n  verify_subset --original ./tokenized/wmt22_train --subset ./tokenized/wmt22_train_10pct --samples 5"
)]
struct VerifySubsetCli {
    #[arg(long, value_name = "PATH", help = "Path to the original dataset")]
    original: PathBuf,
    #[arg(long, value_name = "PATH", help = "Path to the subset dataset")]
    subset: PathBuf,
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_PREVIEW_RECORDS,
        help = "Number of subset records to preview"
    )]
    samples: usize,
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Run the subset creator with CLI-style arguments (binary name excluded).
pub fn run_create_subset<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    init_logging();
    let Some(cli) = parse_cli::<CreateSubsetCli, _>(
        std::iter::once("create_subset".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let spec = match (cli.size, cli.percentage) {
        (Some(size), None) => SubsetSpec::Count(size),
        (None, Some(percentage)) => SubsetSpec::Fraction(percentage),
        // clap's arg group enforces exactly one; keep the contract for
        // callers that bypass parsing.
        _ => {
            return Err(SubsetError::Configuration(
                "exactly one of --size/--percentage is required".to_string(),
            )
            .into());
        }
    };

    println!("Loading dataset from: {}", cli.input.display());
    let store = FsDatasetStore::new();
    let summary = create_subset(&store, &cli.input, &cli.output, spec, cli.seed)?;

    println!(
        "Original dataset size: {} records",
        format_count(summary.total)
    );
    println!("Subset saved successfully");
    println!(
        "  records:  {} ({:.2}%)",
        format_count(summary.subset_size),
        summary.percentage()
    );
    println!("  location: {}", summary.output.display());
    Ok(())
}

/// Run the subset verifier with CLI-style arguments (binary name excluded);
/// `Ok(true)` means every check passed.
pub fn run_verify_subset<I>(args_iter: I) -> Result<bool, Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    init_logging();
    let Some(cli) = parse_cli::<VerifySubsetCli, _>(
        std::iter::once("verify_subset".to_string()).chain(args_iter),
    )?
    else {
        return Ok(true);
    };

    let store = FsDatasetStore::new();
    let options = VerifyOptions {
        preview_records: cli.samples,
    };
    let report = verify_subset(&store, &cli.original, &cli.subset, &options);
    print_report(&report);
    Ok(report.passed())
}

fn print_report(report: &VerifyReport) {
    println!("{}", banner_rule());
    println!("DATASET SUBSET VERIFICATION");
    println!("{}", banner_rule());

    let mut current_stage = None;
    let mut step = 0usize;
    for event in &report.events {
        if current_stage != Some(event.stage) {
            current_stage = Some(event.stage);
            step += 1;
            println!();
            println!("[{step}] {}...", event.stage.heading());
        }
        match event.status {
            CheckStatus::Info => println!("  {}", event.message),
            CheckStatus::Pass => println!("  ok: {}", event.message),
            CheckStatus::Warn => println!("  WARNING: {}", event.message),
            CheckStatus::Fail => println!("  ERROR: {}", event.message),
        }
    }

    if !report.previews.is_empty() {
        step += 1;
        println!();
        println!("[{step}] Previewing subset records...");
        for preview in &report.previews {
            println!();
            println!("  Record {}:", preview.index + 1);
            for line in &preview.lines {
                println!("    {line}");
            }
        }
    }

    println!();
    println!("{}", banner_rule());
    println!("VERIFICATION SUMMARY");
    println!("{}", banner_rule());
    if report.passed() {
        if let Some(sizes) = report.sizes {
            println!(
                "subset verified: {} / {} records ({:.4}%)",
                format_count(sizes.subset),
                format_count(sizes.original),
                sizes.percentage()
            );
        }
        match report.warning_count() {
            0 => println!("all checks passed"),
            count => println!("passed with {count} warning(s)"),
        }
    } else {
        println!("verification FAILED");
    }
    println!("{}", banner_rule());
}
