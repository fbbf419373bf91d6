use std::{
    collections::BTreeMap,
    path::Path,
    sync::{
        atomic::{AtomicBool, AtomicU32, Ordering},
        Arc, Mutex,
    },
};

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::fs;

use crate::error::{Error, Result};

use super::{RemoteObject, Storage};

/// In-memory store for tests. Clones share the same objects, like a real
/// client handle.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    pending_put_failures: Arc<AtomicU32>,
    unreachable: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    pub fn insert(&self, key: &str, data: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_owned(), data.to_vec());
    }

    pub fn remove(&self, key: &str) {
        self.objects.lock().unwrap().remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn size(&self, key: &str) -> Option<u64> {
        let objects = self.objects.lock().unwrap();
        objects.get(key).map(|data| data.len() as u64)
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Make the next `count` uploads fail.
    pub fn fail_next_puts(&self, count: u32) {
        self.pending_put_failures.store(count, Ordering::SeqCst);
    }

    pub fn set_unreachable(&self) {
        self.unreachable.store(true, Ordering::SeqCst);
    }

    fn take_put_failure(&self) -> bool {
        self.pending_put_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                count.checked_sub(1)
            })
            .is_ok()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn validate(&self) -> Result<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(Error::Other(anyhow!("container is unreachable")));
        }
        Ok(())
    }

    async fn head(&self, key: &str) -> Result<Option<u64>> {
        Ok(self.size(key))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<RemoteObject>> {
        let objects = self.objects.lock().unwrap();
        let listed = objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, data)| RemoteObject {
                key: key.clone(),
                size: data.len() as u64,
            })
            .collect();
        Ok(listed)
    }

    async fn put_file(&self, key: &str, path: &Path) -> Result<()> {
        if self.take_put_failure() {
            return Err(Error::Other(anyhow!("injected put failure for `{key}`")));
        }

        let data = fs::read(path).await?;
        self.insert(key, &data);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.remove(key);
        Ok(())
    }
}
