use std::{collections::HashMap, sync::Arc};

use log::{debug, error, info};
use tokio::fs;

use crate::{
    error::Result,
    keys,
    remote::RemoteEntry,
    scan::FileRecord,
    stats::BackupStats,
};

use super::BackupArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Skip,
    Upload,
}

pub fn decide(local_size: u64, remote: RemoteEntry, size_tolerance: u64) -> Action {
    match remote {
        RemoteEntry::Missing => Action::Upload,
        RemoteEntry::Present { size } if local_size <= size.saturating_add(size_tolerance) => {
            Action::Skip
        }
        RemoteEntry::Present { .. } => Action::Upload,
    }
}

enum FileOutcome {
    Present,
    Uploaded(u64),
    Failed,
}

pub async fn process_chunk(args: Arc<BackupArgs>, files: Vec<FileRecord>) -> BackupStats {
    let mut stats = BackupStats::new();
    stats.files_scanned = files.len() as u64;

    let object_keys: Vec<String> = files
        .iter()
        .map(|file| keys::object_key(&args.prefix, &file.relative_key))
        .collect();
    let entries = args.remote.batch_exists(&object_keys).await;

    for (file, key) in files.iter().zip(&object_keys) {
        match process_file(&args, file, key, &entries).await {
            Ok(FileOutcome::Present) => stats.files_present += 1,
            Ok(FileOutcome::Uploaded(bytes)) => {
                stats.files_uploaded += 1;
                stats.bytes_uploaded += bytes;
            }
            Ok(FileOutcome::Failed) => stats.upload_failures += 1,
            Err(err) => {
                error!("error processing `{}`: {err}", file.relative_key);
                stats.scan_errors += 1;
            }
        }
    }

    stats
}

async fn process_file(
    args: &BackupArgs,
    file: &FileRecord,
    key: &str,
    entries: &HashMap<String, RemoteEntry>,
) -> Result<FileOutcome> {
    let entry = entries.get(key).copied().unwrap_or(RemoteEntry::Missing);
    let local_size = fs::metadata(&file.local_path).await?.len();

    match decide(local_size, entry, args.size_tolerance) {
        Action::Skip => {
            debug!("already in store: {}", file.relative_key);
            Ok(FileOutcome::Present)
        }
        Action::Upload if args.dry_run => {
            info!("[dry run] would upload: {}", file.relative_key);
            Ok(FileOutcome::Uploaded(0))
        }
        Action::Upload => {
            info!("uploading: {}", file.relative_key);
            let (success, bytes) = args.remote.upload(key, &file.local_path).await;
            if success {
                Ok(FileOutcome::Uploaded(bytes))
            } else {
                Ok(FileOutcome::Failed)
            }
        }
    }
}
