#[cfg(test)]
mod memory;
mod s3;

use std::{fmt::Debug, path::Path};

use async_trait::async_trait;

use crate::error::Result;

#[cfg(test)]
pub use memory::MemoryStorage;
pub use s3::S3Storage;

pub type BoxedStorage = Box<dyn Storage + Sync + Send + 'static>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    pub key: String,
    pub size: u64,
}

#[async_trait]
pub trait Storage: Debug {
    /// Cheapest request that proves the container is reachable.
    async fn validate(&self) -> Result<()>;

    /// Size of the object, or `None` for a definitive not-found.
    async fn head(&self, key: &str) -> Result<Option<u64>>;

    async fn list(&self, prefix: &str) -> Result<Vec<RemoteObject>>;

    async fn put_file(&self, key: &str, path: &Path) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;
}
