use std::{collections::HashMap, sync::Arc};

use log::error;
use tokio::task::JoinSet;

use crate::{progress::Progress, scan::FileRecord, stats::BackupStats};

use super::{reconcile::process_chunk, BackupArgs, Interrupt};

pub async fn process_batches(
    args: &Arc<BackupArgs>,
    files: &[FileRecord],
    progress: &Progress,
    interrupt: &Interrupt,
) -> BackupStats {
    let mut totals = BackupStats::new();

    // Batches run strictly one after another; the join below is the
    // barrier that bounds how many files are in flight at once.
    for batch in files.chunks(args.batch_size) {
        if interrupt.is_raised() {
            break;
        }

        let batch_stats = process_batch(args, batch, progress, interrupt).await;
        totals.merge(batch_stats);
    }

    totals
}

async fn process_batch(
    args: &Arc<BackupArgs>,
    batch: &[FileRecord],
    progress: &Progress,
    interrupt: &Interrupt,
) -> BackupStats {
    let mut join_set = JoinSet::new();
    let mut chunk_sizes = HashMap::new();

    let chunk_size = batch.len().div_ceil(args.workers).max(1);
    for chunk in batch.chunks(chunk_size) {
        if interrupt.is_raised() {
            break;
        }

        let chunk = chunk.to_vec();
        let chunk_len = chunk.len() as u64;
        let handle = join_set.spawn(process_chunk(args.clone(), chunk));
        chunk_sizes.insert(handle.id(), chunk_len);
    }

    let mut stats = BackupStats::new();
    while let Some(result) = join_set.join_next_with_id().await {
        match result {
            Ok((_, chunk_stats)) => {
                stats.merge(chunk_stats);
                progress.update(chunk_stats.files_scanned);
            }
            Err(err) => {
                // One chunk going down must not take its siblings with it;
                // every file it held is reported as an error instead.
                let failed = chunk_sizes.get(&err.id()).copied().unwrap_or(0);
                error!("processing failed for a chunk of {failed} files: {err}");
                stats.files_scanned += failed;
                stats.scan_errors += failed;
                progress.update(failed);
            }
        }
    }

    stats
}
