//! Error types for the service client

use std::path::PathBuf;

use aw_protocol::CodecError;
use thiserror::Error;

/// Errors from the disk tier of the response cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing a cache file failed
    #[error("cache I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure reported by the transport
///
/// The transport owns authentication, retries and rate limiting; by the time
/// this error surfaces the call has definitively failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors returned by [`ServiceClient`](crate::ServiceClient)
#[derive(Debug, Error)]
pub enum ClientError {
    /// Response could not be decoded
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Call failed in the transport
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Cache I/O error
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}
