mod batches;
mod reconcile;

use std::{
    collections::HashSet,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use log::{info, warn};

use crate::{
    error::{Error, Result},
    format::format_bytes,
    keys,
    progress::Progress,
    remote::Remote,
    scan::Scanner,
    stats::BackupStats,
};

pub struct BackupArgs {
    pub remote: Remote,
    pub source: PathBuf,
    pub prefix: String,
    pub exclude: Vec<String>,
    pub workers: usize,
    pub batch_size: usize,
    pub dry_run: bool,
    pub size_tolerance: u64,
    pub delete_orphans: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Interrupt::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct RunOutcome {
    pub stats: BackupStats,
    pub interrupted: bool,
}

pub async fn run(args: BackupArgs, interrupt: &Interrupt) -> Result<RunOutcome> {
    if !args.source.is_dir() {
        return Err(Error::SourceDoesNotExist(args.source));
    }

    if !args.remote.validate().await {
        return Err(Error::BucketUnavailable(args.remote.bucket().to_owned()));
    }

    if args.dry_run {
        info!("dry run - no files will be uploaded");
    }
    info!("bucket: {}, prefix: `{}`", args.remote.bucket(), args.prefix);
    info!(
        "workers: {}, batch size: {}, size tolerance: {}",
        args.workers, args.batch_size, args.size_tolerance
    );

    let scanner = Scanner::new(args.source.clone(), args.exclude.clone());
    let files = scanner.scan();
    if files.is_empty() {
        warn!("no files found to process");
        return Ok(RunOutcome {
            stats: BackupStats::new(),
            interrupted: interrupt.is_raised(),
        });
    }

    match args.remote.warm_cache(&args.prefix).await {
        Ok(count) => info!("cached {count} remote objects under `{}`", args.prefix),
        Err(err) => warn!("could not pre-list remote objects: {err}"),
    }

    let progress = Progress::new(files.len() as u64);
    let args = Arc::new(args);
    let mut stats = batches::process_batches(&args, &files, &progress, interrupt).await;
    progress.finish();

    if args.delete_orphans && !interrupt.is_raised() {
        let expected: HashSet<String> = files
            .iter()
            .map(|file| keys::object_key(&args.prefix, &file.relative_key))
            .collect();
        delete_orphans(&args, &expected, &mut stats, interrupt).await;
    }

    log_summary(&stats, &args);
    Ok(RunOutcome {
        stats,
        interrupted: interrupt.is_raised(),
    })
}

async fn delete_orphans(
    args: &BackupArgs,
    expected: &HashSet<String>,
    stats: &mut BackupStats,
    interrupt: &Interrupt,
) {
    let objects = match args.remote.list(&args.prefix).await {
        Ok(objects) => objects,
        Err(err) => {
            warn!("skipping orphan cleanup, remote listing failed: {err}");
            return;
        }
    };

    for object in objects {
        if interrupt.is_raised() {
            break;
        }
        if expected.contains(&object.key) {
            continue;
        }

        if args.dry_run {
            info!("[dry run] would delete orphan: {}", object.key);
            stats.files_deleted += 1;
        } else if args.remote.delete(&object.key).await {
            info!("deleted orphan: {}", object.key);
            stats.files_deleted += 1;
        } else {
            stats.delete_failures += 1;
        }
    }
}

fn log_summary(stats: &BackupStats, args: &BackupArgs) {
    info!("===== backup verification summary =====");
    info!("files scanned: {}", stats.files_scanned);
    info!("already in store: {}", stats.files_present);
    info!("uploaded: {}", stats.files_uploaded);
    info!("upload failures: {}", stats.upload_failures);
    info!("scan errors: {}", stats.scan_errors);
    if args.delete_orphans {
        info!("orphans deleted: {}", stats.files_deleted);
        info!("delete failures: {}", stats.delete_failures);
    }
    info!("bytes uploaded: {}", format_bytes(stats.bytes_uploaded));
    if args.dry_run {
        info!("this was a dry run - nothing was uploaded");
    }
}
