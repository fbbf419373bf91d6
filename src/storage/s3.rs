use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::{
    error::SdkError, operation::head_object::HeadObjectError, primitives::ByteStream, Client,
};

use crate::error::{Error, Result};

use super::{RemoteObject, Storage};

#[derive(Debug)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    pub async fn new(bucket: String) -> Self {
        let s3_config = aws_config::load_from_env().await;
        let client = Client::new(&s3_config);
        S3Storage { client, bucket }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn validate(&self) -> Result<()> {
        self.client
            .list_objects_v2()
            .bucket(&self.bucket)
            .max_keys(1)
            .send()
            .await?;
        Ok(())
    }

    async fn head(&self, key: &str) -> Result<Option<u64>> {
        let response_result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(SdkError::into_service_error);

        match response_result {
            Ok(response) => {
                let size = response
                    .content_length()
                    .and_then(|length| u64::try_from(length).ok())
                    .unwrap_or(0);
                Ok(Some(size))
            }
            Err(HeadObjectError::NotFound(_)) => Ok(None),
            Err(err) => Err(Error::other(err)),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<RemoteObject>> {
        let prefix_owned = (!prefix.is_empty()).then(|| prefix.to_owned());
        let mut stream = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .set_prefix(prefix_owned)
            .into_paginator()
            .send();

        let mut objects = vec![];
        while let Some(page) = stream.try_next().await? {
            for object in page.contents.unwrap_or_default() {
                let key = object.key.ok_or_else(|| Error::InvalidKey(String::new()))?;
                let size = object
                    .size
                    .and_then(|size_signed| u64::try_from(size_signed).ok())
                    .unwrap_or(0);
                objects.push(RemoteObject { key, size });
            }
        }

        Ok(objects)
    }

    async fn put_file(&self, key: &str, path: &Path) -> Result<()> {
        let body = ByteStream::from_path(path).await?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }
}
