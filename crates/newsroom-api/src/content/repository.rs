//! Content repository
//!
//! Loads and saves the content document as a single blob. Every request works
//! on its own snapshot: `load` then `save` is not atomic, so two concurrent
//! writers race and the later `save` replaces the earlier one entirely. There
//! is no version check to detect this.
//!
//! A stored document that parses as JSON is never replaced by the seed. If
//! its collections have the wrong type the load fails instead, so the next
//! write cannot overwrite it.

use std::sync::Arc;

use serde_json::Value;

use crate::runtime::services::{BlobNamespace, ServiceError};

use super::ContentDocument;

/// Key of the content document inside its namespace
pub const CONTENT_KEY: &str = "data";

#[derive(Clone, Debug)]
pub struct ContentRepository {
    blobs: BlobNamespace,
    seed: Arc<ContentDocument>,
}

impl ContentRepository {
    pub fn new(blobs: BlobNamespace, seed: Arc<ContentDocument>) -> Self {
        Self { blobs, seed }
    }

    /// Load the stored document, falling back to a copy of the seed when the
    /// store is empty, unreachable, or holds something that is not JSON.
    ///
    /// Fails with `ServiceError::Malformed` when the stored JSON is not an
    /// object of arrays.
    pub async fn load(&self) -> Result<ContentDocument, ServiceError> {
        let stored = match self.blobs.get_json::<Value>(CONTENT_KEY).await {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                tracing::debug!(namespace = self.blobs.name(), "No stored content, using seed");
                return Ok(self.seed.as_ref().clone());
            }
            Err(e) => {
                tracing::warn!(namespace = self.blobs.name(), "Using seed content: {}", e);
                return Ok(self.seed.as_ref().clone());
            }
        };

        serde_json::from_value(stored).map_err(|e| ServiceError::Malformed(e.to_string()))
    }

    /// Write the whole document back.
    pub async fn save(&self, document: &ContentDocument) -> Result<(), ServiceError> {
        self.blobs.set_json(CONTENT_KEY, document).await
    }

    /// Write the seed into an empty store. Returns `true` when it did.
    /// An existing document is never touched.
    pub async fn provision(&self) -> Result<bool, ServiceError> {
        if self.blobs.get_text(CONTENT_KEY).await?.is_some() {
            return Ok(false);
        }
        self.save(&self.seed).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::seed::default_content;
    use crate::runtime::services::{BlobConfig, BlobStore, CONTENT_NAMESPACE};
    use serde_json::json;

    async fn repository() -> (BlobStore, ContentRepository) {
        let store = BlobStore::start(BlobConfig::Memory).await.unwrap();
        let repo = ContentRepository::new(store.namespace(CONTENT_NAMESPACE), Arc::new(default_content()));
        (store, repo)
    }

    #[tokio::test]
    async fn test_empty_store_loads_seed() {
        let (_store, repo) = repository().await;
        assert_eq!(repo.load().await.unwrap(), default_content());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let (_store, repo) = repository().await;
        let mut document = repo.load().await.unwrap();
        document.news.remove(0);
        repo.save(&document).await.unwrap();

        let loaded = repo.load().await.unwrap();
        assert_eq!(loaded.news.len(), 3);
        assert_eq!(loaded, document);
    }

    #[tokio::test]
    async fn test_unparseable_document_falls_back_to_seed() {
        let (store, repo) = repository().await;
        store.namespace(CONTENT_NAMESPACE).set_text(CONTENT_KEY, "{broken").await.unwrap();
        assert_eq!(repo.load().await.unwrap(), default_content());
    }

    #[tokio::test]
    async fn test_oddly_shaped_document_is_kept() {
        let (store, repo) = repository().await;
        let stored = json!({"news": [{"_id": "mine"}], "videos": [{"_id": "v_keep"}], "trending": null});
        store.namespace(CONTENT_NAMESPACE).set_json(CONTENT_KEY, &stored).await.unwrap();

        let document = repo.load().await.unwrap();
        assert_eq!(document.news, vec![json!({"_id": "mine"})]);
        assert_eq!(document.videos, vec![json!({"_id": "v_keep"})]);
        assert!(document.trending.is_empty());
    }

    #[tokio::test]
    async fn test_wrongly_typed_document_is_an_error() {
        let (store, repo) = repository().await;
        store.namespace(CONTENT_NAMESPACE).set_json(CONTENT_KEY, &json!({"news": "x"})).await.unwrap();

        let err = repo.load().await.unwrap_err();
        assert!(matches!(err, ServiceError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_unreachable_store() {
        let (store, repo) = repository().await;
        store.shutdown().await.unwrap();

        assert_eq!(repo.load().await.unwrap(), default_content());
        assert!(repo.save(&default_content()).await.is_err());
    }

    #[tokio::test]
    async fn test_provision_only_once() {
        let (store, repo) = repository().await;
        assert!(repo.provision().await.unwrap());

        let ns = store.namespace(CONTENT_NAMESPACE);
        ns.set_json(CONTENT_KEY, &json!({"news": [], "videos": [], "trending": []})).await.unwrap();

        assert!(!repo.provision().await.unwrap());
        assert!(repo.load().await.unwrap().news.is_empty());
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let (_store, repo) = repository().await;

        let mut first = repo.load().await.unwrap();
        let mut second = repo.load().await.unwrap();
        first.trending.push(json!({"_id": "a"}));
        second.trending.push(json!({"_id": "b"}));

        repo.save(&first).await.unwrap();
        repo.save(&second).await.unwrap();

        let stored = repo.load().await.unwrap();
        assert_eq!(stored.trending.len(), 1);
        assert_eq!(stored.trending[0]["_id"], json!("b"));
    }
}
