mod logger;
mod parse;

use std::{env, ops::RangeInclusive, path::PathBuf, process::ExitCode};

use anyhow::anyhow;
use clap::{
    builder::{styling::AnsiColor, Styles},
    ArgAction, Parser,
};
use log::error;
use tokio::{signal, spawn};

use crate::{
    backup::{self, BackupArgs, Interrupt, RunOutcome},
    error::Result,
    format::format_bytes,
    remote::Remote,
    stats::BackupStats,
    storage::S3Storage,
};

const ENV_VAR_BUCKET: &str = "BACKSTOP_BUCKET";

const WORKERS_RANGE: RangeInclusive<usize> = 1..=64;
const DEFAULT_WORKERS: usize = 4;

const BATCH_SIZE_RANGE: RangeInclusive<usize> = 1..=100_000;
const DEFAULT_BATCH_SIZE: usize = 100;

fn parse_workers(s: &str) -> std::result::Result<usize, String> {
    parse::parse_range_inclusive(s, WORKERS_RANGE)
}

fn parse_batch_size(s: &str) -> std::result::Result<usize, String> {
    parse::parse_range_inclusive(s, BATCH_SIZE_RANGE)
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None, styles = cli_styles())]
pub struct Cli {
    /// Local directory to verify
    #[arg(short, long, value_name = "DIR")]
    pub source: PathBuf,

    /// Bucket holding the backup (or $BACKSTOP_BUCKET)
    #[arg(short, long, value_name = "NAME")]
    pub bucket: Option<String>,

    /// Key prefix the backup lives under
    #[arg(short, long, value_name = "PREFIX", default_value = "")]
    pub prefix: String,

    /// Number of concurrent upload workers
    #[arg(
        short = 'j',
        long,
        value_name = "NUM",
        default_value_t = DEFAULT_WORKERS,
        value_parser = parse_workers,
    )]
    pub workers: usize,

    /// Number of files per batch
    #[arg(
        long,
        value_name = "NUM",
        default_value_t = DEFAULT_BATCH_SIZE,
        value_parser = parse_batch_size,
    )]
    pub batch_size: usize,

    /// Show what would be uploaded without touching the store
    #[arg(short = 'n', long, default_value_t = false)]
    pub dry_run: bool,

    /// Size difference in bytes still considered up to date
    #[arg(long, value_name = "BYTES", default_value_t = 0)]
    pub size_tolerance: u64,

    /// Skip files whose name matches PATTERN (exact or `*` glob)
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Delete remote objects that no longer exist locally
    #[arg(long, default_value_t = false)]
    pub delete_orphans: bool,

    /// Path for the detailed run log
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, action = ArgAction::Count, group = "verbosity")]
    pub verbose: u8,

    #[arg(short, long, action = ArgAction::Count, group = "verbosity")]
    pub quiet: u8,
}

pub async fn main() -> ExitCode {
    let cli = Cli::parse();
    let log_path = logger::init(cli.verbose, cli.quiet, cli.dry_run, cli.log_file.clone());

    let interrupt = Interrupt::new();
    let signal_interrupt = interrupt.clone();
    spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            signal_interrupt.raise();
        }
    });

    let dry_run = cli.dry_run;
    let delete_orphans = cli.delete_orphans;
    let result = run(cli, &interrupt).await;
    log::logger().flush();

    match result {
        Ok(outcome) if outcome.interrupted => {
            eprintln!("operation cancelled by user");
            ExitCode::from(130)
        }
        Ok(outcome) => {
            print_summary(&outcome.stats, dry_run, delete_orphans);
            if let Some(path) = log_path {
                println!("detailed log: {}", path.display());
            }
            if outcome.stats.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(err) => {
            error!("{err}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli, interrupt: &Interrupt) -> Result<RunOutcome> {
    let bucket = bucket_name(cli.bucket)?;
    let storage = S3Storage::new(bucket.clone()).await;
    let remote = Remote::new(Box::new(storage), bucket);

    let args = BackupArgs {
        remote,
        source: cli.source,
        prefix: cli.prefix,
        exclude: cli.exclude,
        workers: cli.workers,
        batch_size: cli.batch_size,
        dry_run: cli.dry_run,
        size_tolerance: cli.size_tolerance,
        delete_orphans: cli.delete_orphans,
    };
    backup::run(args, interrupt).await
}

fn bucket_name(arg: Option<String>) -> Result<String> {
    let bucket = if let Some(bucket) = arg {
        bucket
    } else {
        env::var(ENV_VAR_BUCKET).map_err(|_| anyhow!("`{ENV_VAR_BUCKET}` must be set"))?
    };
    Ok(bucket)
}

fn print_summary(stats: &BackupStats, dry_run: bool, delete_orphans: bool) {
    println!();
    println!("===== summary =====");
    println!("files scanned:   {}", stats.files_scanned);
    println!("already present: {}", stats.files_present);
    println!("uploaded:        {}", stats.files_uploaded);
    println!("upload failures: {}", stats.upload_failures);
    println!("scan errors:     {}", stats.scan_errors);
    if delete_orphans {
        println!("orphans deleted: {}", stats.files_deleted);
        println!("delete failures: {}", stats.delete_failures);
    }
    println!("data uploaded:   {}", format_bytes(stats.bytes_uploaded));
    if dry_run {
        println!();
        println!("this was a dry run - nothing was uploaded");
    }
}

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightMagenta.on_default())
        .usage(AnsiColor::BrightMagenta.on_default())
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightCyan.on_default())
}
