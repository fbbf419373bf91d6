use std::path::PathBuf;

use aws_sdk_s3::{error::SdkError, primitives::ByteStreamError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("source directory `{0}` does not exist")]
    SourceDoesNotExist(PathBuf),

    #[error("bucket `{0}` is not accessible")]
    BucketUnavailable(String),

    #[error("key `{0}` is invalid")]
    InvalidKey(String),

    #[error("{source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("{source}")]
    ByteStream {
        #[from]
        source: ByteStreamError,
    },

    #[error("{0}")]
    Sdk(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Other(error.into())
    }
}

impl<E, R> From<SdkError<E, R>> for Error {
    fn from(error: SdkError<E, R>) -> Self {
        Error::Sdk(error.to_string())
    }
}
