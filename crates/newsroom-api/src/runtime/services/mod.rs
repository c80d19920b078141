//! Actor-based services
//!
//! This module provides the long-lived blob store service and the `Services`
//! container that hands out the namespaces each resource handler works in.

pub mod blobs;

use std::sync::Arc;

pub use blobs::{BlobConfig, BlobNamespace, BlobStore};

use crate::content::{ContentDocument, ContentRepository};

/// Namespace holding the single content document.
pub const CONTENT_NAMESPACE: &str = "content";
/// Namespace holding raw article text keyed by filename.
pub const ARTICLES_NAMESPACE: &str = "articles";
/// Namespace holding the subscriber email list.
pub const SUBSCRIPTIONS_NAMESPACE: &str = "subscriptions";

/// Container for all available services
///
/// This is passed to handlers via Context and provides access to the shared
/// blob store plus the seed document used when the store has no content.
#[derive(Clone)]
pub struct Services {
    /// Blob store shared by every namespace
    pub blobs: BlobStore,

    /// Seed content document
    pub seed: Arc<ContentDocument>,
}

impl Services {
    pub fn new(blobs: BlobStore, seed: ContentDocument) -> Self {
        Self {
            blobs,
            seed: Arc::new(seed),
        }
    }

    /// Repository over the content document
    pub fn content(&self) -> ContentRepository {
        ContentRepository::new(self.blobs.namespace(CONTENT_NAMESPACE), self.seed.clone())
    }

    /// Article text namespace
    pub fn articles(&self) -> BlobNamespace {
        self.blobs.namespace(ARTICLES_NAMESPACE)
    }

    /// Subscriber list namespace
    pub fn subscriptions(&self) -> BlobNamespace {
        self.blobs.namespace(SUBSCRIPTIONS_NAMESPACE)
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("blobs", &self.blobs)
            .field("seed_news", &self.seed.news.len())
            .field("seed_videos", &self.seed.videos.len())
            .finish()
    }
}

/// Errors related to service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored value is valid JSON but not a shape the service can work with
    #[error("Malformed stored value: {0}")]
    Malformed(String),
}

impl From<ServiceError> for newsroom_sdk::HandlerError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Malformed(_) => {
                tracing::error!("Refusing to use stored content: {}", err);
                newsroom_sdk::HandlerError::Internal("Stored content is malformed".to_string())
            }
            _ => {
                tracing::error!("Store write failed: {}", err);
                newsroom_sdk::HandlerError::StorageError("Failed to save content".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsroom_sdk::HandlerError;

    #[test]
    fn test_handler_error_conversion() {
        let err: HandlerError = ServiceError::Unavailable("gone".into()).into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), "Failed to save content");

        let err: HandlerError = ServiceError::Malformed("news is a string".into()).into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), "Stored content is malformed");
    }
}
