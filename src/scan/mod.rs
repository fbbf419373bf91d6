mod exclude;
#[cfg(test)]
mod tests;

use std::path::PathBuf;

use log::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::{format::format_path, keys};

pub use exclude::is_excluded;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub local_path: PathBuf,
    pub relative_key: String,
}

#[derive(Debug)]
pub struct Scanner {
    root: PathBuf,
    exclude: Vec<String>,
}

impl Scanner {
    pub fn new(root: PathBuf, exclude: Vec<String>) -> Self {
        Scanner { root, exclude }
    }

    pub fn scan(&self) -> Vec<FileRecord> {
        info!("scanning files in {}", format_path(&self.root));

        let mut files = vec![];
        if !self.root.is_dir() {
            error!("directory does not exist: {}", format_path(&self.root));
            return files;
        }

        for entry_result in WalkDir::new(&self.root) {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("skipping unreadable entry: {err}");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if is_excluded(&name, &self.exclude) {
                debug!("excluded {}", format_path(entry.path()));
                continue;
            }

            match entry.path().strip_prefix(&self.root) {
                Ok(relative) => files.push(FileRecord {
                    local_path: entry.path().to_owned(),
                    relative_key: keys::relative_key(relative),
                }),
                Err(err) => warn!("skipping {}: {err}", format_path(entry.path())),
            }
        }

        info!("found {} files to process", files.len());
        files
    }
}
