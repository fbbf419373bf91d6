
use std::{collections::HashMap, path::Path, sync::Mutex, time::Duration};

use log::{debug, error, info, warn};
use tokio::{fs, time::sleep};

use crate::{
    error::Result,
    storage::{BoxedStorage, RemoteObject},
};

const UPLOAD_ATTEMPTS: u32 = 3;
const BACKOFF_BASE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteEntry {
    Missing,
    Present { size: u64 },
}

impl RemoteEntry {
    pub fn exists(self) -> bool {
        matches!(self, RemoteEntry::Present { .. })
    }
}

#[derive(Debug)]
pub struct Remote {
    storage: BoxedStorage,
    bucket: String,
    cache: Mutex<HashMap<String, RemoteEntry>>,
}

impl Remote {
    pub fn new(storage: BoxedStorage, bucket: String) -> Self {
        Remote {
            storage,
            bucket,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub async fn validate(&self) -> bool {
        info!("validating bucket `{}`", self.bucket);
        match self.storage.validate().await {
            Ok(()) => {
                debug!("bucket `{}` is reachable", self.bucket);
                true
            }
            Err(err) => {
                error!("bucket `{}` validation failed: {err}", self.bucket);
                false
            }
        }
    }

    pub async fn exists(&self, key: &str) -> RemoteEntry {
        if let Some(entry) = self.cached(key) {
            return entry;
        }

        let entry = match self.storage.head(key).await {
            Ok(Some(size)) => RemoteEntry::Present { size },
            Ok(None) => RemoteEntry::Missing,
            Err(err) => {
                // A failed probe must not sink the run; assume the object is
                // missing and let the upload path sort it out.
                warn!("existence check failed for `{key}`: {err}");
                RemoteEntry::Missing
            }
        };

        self.cache.lock().unwrap().insert(key.to_owned(), entry);
        entry
    }

    pub async fn batch_exists(&self, keys: &[String]) -> HashMap<String, RemoteEntry> {
        let mut entries = HashMap::with_capacity(keys.len());
        let mut uncached = vec![];

        {
            let cache = self.cache.lock().unwrap();
            for key in keys {
                match cache.get(key) {
                    Some(entry) => {
                        entries.insert(key.clone(), *entry);
                    }
                    None => uncached.push(key),
                }
            }
        }

        for key in uncached {
            let entry = self.exists(key).await;
            entries.insert(key.clone(), entry);
        }

        entries
    }

    pub async fn warm_cache(&self, prefix: &str) -> Result<usize> {
        let objects = self.storage.list(prefix).await?;
        let count = objects.len();

        let mut cache = self.cache.lock().unwrap();
        for object in objects {
            cache.insert(object.key, RemoteEntry::Present { size: object.size });
        }

        Ok(count)
    }

    pub async fn upload(&self, key: &str, path: &Path) -> (bool, u64) {
        let size = match fs::metadata(path).await {
            Ok(metadata) => metadata.len(),
            Err(err) => {
                error!("could not stat `{}`: {err}", path.display());
                return (false, 0);
            }
        };

        let mut delay = BACKOFF_BASE;
        for attempt in 1..=UPLOAD_ATTEMPTS {
            match self.storage.put_file(key, path).await {
                Ok(()) => {
                    self.cache
                        .lock()
                        .unwrap()
                        .insert(key.to_owned(), RemoteEntry::Present { size });
                    debug!("uploaded `{}` ({size} bytes) to `{key}`", path.display());
                    return (true, size);
                }
                Err(err) if attempt < UPLOAD_ATTEMPTS => {
                    warn!("upload of `{key}` failed (attempt {attempt}): {err}");
                    sleep(delay).await;
                    delay *= 2;
                }
                Err(err) => {
                    error!(
                        "failed to upload `{}` to `{key}` after {UPLOAD_ATTEMPTS} attempts: {err}",
                        path.display()
                    );
                }
            }
        }

        (false, 0)
    }

    pub async fn list(&self, prefix: &str) -> Result<Vec<RemoteObject>> {
        self.storage.list(prefix).await
    }

    pub async fn delete(&self, key: &str) -> bool {
        match self.storage.delete(key).await {
            Ok(()) => {
                self.cache
                    .lock()
                    .unwrap()
                    .insert(key.to_owned(), RemoteEntry::Missing);
                true
            }
            Err(err) => {
                error!("failed to delete `{key}`: {err}");
                false
            }
        }
    }

    fn cached(&self, key: &str) -> Option<RemoteEntry> {
        self.cache.lock().unwrap().get(key).copied()
    }
}
