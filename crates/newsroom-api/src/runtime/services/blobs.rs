//! Blob store actor service
//!
//! A key-value store of opaque values grouped into namespaces. Values are
//! always read and written whole. Supports an in-memory backend and a
//! directory-per-namespace filesystem backend.
//!
//! There is no versioning and no compare-and-swap: callers that read, modify
//! and write back a value race with each other and the last write wins.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use super::ServiceError;
use crate::runtime::actor::{spawn_actor, ActorHandle, ActorMessage};

/// Blob store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlobConfig {
    /// Values live in the actor's memory and vanish on restart
    Memory,

    /// Values are files under `root/<namespace>/`
    Filesystem { root: PathBuf },
}

/// Commands sent to the blob actor
pub enum BlobCommand {
    /// Read a value
    Get {
        namespace: String,
        key: String,
        reply: oneshot::Sender<Result<Option<Bytes>, ServiceError>>,
    },

    /// Write a value, replacing any previous one
    Put {
        namespace: String,
        key: String,
        data: Bytes,
        reply: oneshot::Sender<Result<(), ServiceError>>,
    },

    /// Health check
    Health {
        reply: oneshot::Sender<Result<bool, ServiceError>>,
    },

    /// Shutdown
    Shutdown,
}

impl ActorMessage for BlobCommand {}

/// Blob store handle - cheap to clone
#[derive(Clone)]
pub struct BlobStore {
    handle: ActorHandle<BlobCommand>,
    config: BlobConfig,
}

impl BlobStore {
    /// Start the blob actor and return a handle
    pub async fn start(config: BlobConfig) -> Result<Self, ServiceError> {
        if let BlobConfig::Filesystem { root } = &config {
            tokio::fs::create_dir_all(root).await?;
        }

        let backend = Backend::from_config(&config);
        let handle = spawn_actor(100, move |rx| blob_actor(backend, rx));

        Ok(Self { handle, config })
    }

    /// Scope the store to one namespace
    pub fn namespace(&self, name: &str) -> BlobNamespace {
        BlobNamespace {
            store: self.clone(),
            name: name.to_string(),
        }
    }

    /// Read a value
    pub async fn get(&self, namespace: &str, key: &str) -> Result<Option<Bytes>, ServiceError> {
        let (tx, rx) = oneshot::channel();

        self.handle.send(BlobCommand::Get {
            namespace: namespace.to_string(),
            key: key.to_string(),
            reply: tx,
        }).await?;

        rx.await.map_err(|_| ServiceError::Unavailable("no response from blob actor".into()))?
    }

    /// Write a value
    pub async fn put(&self, namespace: &str, key: &str, data: Bytes) -> Result<(), ServiceError> {
        let (tx, rx) = oneshot::channel();

        self.handle.send(BlobCommand::Put {
            namespace: namespace.to_string(),
            key: key.to_string(),
            data,
            reply: tx,
        }).await?;

        rx.await.map_err(|_| ServiceError::Unavailable("no response from blob actor".into()))?
    }

    /// Health check
    pub async fn health(&self) -> Result<bool, ServiceError> {
        let (tx, rx) = oneshot::channel();

        self.handle.send(BlobCommand::Health { reply: tx }).await?;

        rx.await.map_err(|_| ServiceError::Unavailable("no response from blob actor".into()))?
    }

    /// Ask the actor to stop. Later calls fail with `ServiceError::Unavailable`.
    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        self.handle.send(BlobCommand::Shutdown).await
    }
}

impl std::fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobStore")
            .field("config", &self.config)
            .field("alive", &self.handle.is_alive())
            .finish()
    }
}

/// A blob store scoped to one namespace, with text and JSON helpers
#[derive(Clone, Debug)]
pub struct BlobNamespace {
    store: BlobStore,
    name: String,
}

impl BlobNamespace {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read a value as UTF-8 text (invalid sequences are replaced)
    pub async fn get_text(&self, key: &str) -> Result<Option<String>, ServiceError> {
        let value = self.store.get(&self.name, key).await?;
        Ok(value.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Read a value and deserialize it from JSON
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ServiceError> {
        match self.store.get(&self.name, key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Write raw text
    pub async fn set_text(&self, key: &str, value: &str) -> Result<(), ServiceError> {
        self.store
            .put(&self.name, key, Bytes::copy_from_slice(value.as_bytes()))
            .await
    }

    /// Serialize a value as JSON and write it
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ServiceError> {
        let json = serde_json::to_vec(value)?;
        self.store.put(&self.name, key, Bytes::from(json)).await
    }
}

/// Storage owned by the actor task
enum Backend {
    Memory(HashMap<(String, String), Bytes>),
    Filesystem(PathBuf),
}

impl Backend {
    fn from_config(config: &BlobConfig) -> Self {
        match config {
            BlobConfig::Memory => Backend::Memory(HashMap::new()),
            BlobConfig::Filesystem { root } => Backend::Filesystem(root.clone()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Backend::Memory(_) => "memory",
            Backend::Filesystem(_) => "filesystem",
        }
    }

    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Bytes>, ServiceError> {
        match self {
            Backend::Memory(map) => Ok(map.get(&(namespace.to_string(), key.to_string())).cloned()),
            Backend::Filesystem(root) => {
                match tokio::fs::read(blob_path(root, namespace, key)).await {
                    Ok(data) => Ok(Some(Bytes::from(data))),
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    async fn put(&mut self, namespace: &str, key: &str, data: Bytes) -> Result<(), ServiceError> {
        match self {
            Backend::Memory(map) => {
                map.insert((namespace.to_string(), key.to_string()), data);
                Ok(())
            }
            Backend::Filesystem(root) => {
                let dir = root.join(namespace);
                tokio::fs::create_dir_all(&dir).await?;

                // Write beside the target and rename so readers never see a
                // partially written value.
                let name = file_name(key);
                let path = dir.join(&name);
                let tmp = dir.join(format!(".{}.tmp", name));
                tokio::fs::write(&tmp, &data).await?;
                tokio::fs::rename(&tmp, &path).await?;
                Ok(())
            }
        }
    }
}

/// Longest file name a key maps to. With the temp-file affixes this stays
/// under the usual 255-byte name limit.
const MAX_FILE_NAME: usize = 200;

/// Keys are arbitrary strings (article filenames come straight from the URL),
/// so they are encoded before touching the filesystem. Keys too long to encode
/// whole keep an encoded prefix followed by `.` and their MD5 digest; `.` is
/// outside the URL-safe alphabet so the two forms never collide.
fn file_name(key: &str) -> String {
    let encoded = URL_SAFE_NO_PAD.encode(key.as_bytes());
    if encoded.len() <= MAX_FILE_NAME {
        return encoded;
    }

    let digest = format!("{:x}", md5::compute(key.as_bytes()));
    let prefix = &encoded[..MAX_FILE_NAME - digest.len() - 1];
    format!("{}.{}", prefix, digest)
}

fn blob_path(root: &Path, namespace: &str, key: &str) -> PathBuf {
    root.join(namespace).join(file_name(key))
}

/// The blob actor loop
async fn blob_actor(mut backend: Backend, mut rx: mpsc::Receiver<BlobCommand>) {
    tracing::info!("Starting blob actor ({})", backend.kind());

    while let Some(cmd) = rx.recv().await {
        match cmd {
            BlobCommand::Get { namespace, key, reply } => {
                let result = backend.get(&namespace, &key).await;
                if let Err(e) = &result {
                    tracing::warn!(namespace = %namespace, key = %key, "Blob read failed: {}", e);
                }
                let _ = reply.send(result);
            }

            BlobCommand::Put { namespace, key, data, reply } => {
                tracing::debug!(namespace = %namespace, key = %key, bytes = data.len(), "Writing blob");
                let result = backend.put(&namespace, &key, data).await;
                if let Err(e) = &result {
                    tracing::error!(namespace = %namespace, key = %key, "Blob write failed: {}", e);
                }
                let _ = reply.send(result);
            }

            BlobCommand::Health { reply } => {
                let _ = reply.send(Ok(true));
            }

            BlobCommand::Shutdown => {
                tracing::info!("Blob actor shutting down");
                break;
            }
        }
    }

    tracing::info!("Blob actor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn exercise(store: BlobStore) {
        // Missing key
        assert!(store.get("content", "data").await.unwrap().is_none());

        // Put and get
        store.put("content", "data", Bytes::from_static(b"{}")).await.unwrap();
        assert_eq!(store.get("content", "data").await.unwrap().unwrap(), Bytes::from_static(b"{}"));

        // Overwrite is whole-value
        store.put("content", "data", Bytes::from_static(b"[1]")).await.unwrap();
        assert_eq!(store.get("content", "data").await.unwrap().unwrap(), Bytes::from_static(b"[1]"));

        // Namespaces are independent
        assert!(store.get("articles", "data").await.unwrap().is_none());

        // Keys with path separators stay inside their namespace
        store.put("articles", "news/a.html", Bytes::from_static(b"a")).await.unwrap();
        assert_eq!(store.get("articles", "news/a.html").await.unwrap().unwrap(), Bytes::from_static(b"a"));
        assert!(store.get("articles", "a.html").await.unwrap().is_none());

        assert!(store.health().await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_backend() {
        let store = BlobStore::start(BlobConfig::Memory).await.unwrap();
        exercise(store).await;
    }

    #[tokio::test]
    async fn test_filesystem_backend() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::start(BlobConfig::Filesystem { root: dir.path().to_path_buf() })
            .await
            .unwrap();
        exercise(store).await;
    }

    #[tokio::test]
    async fn test_filesystem_values_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = BlobConfig::Filesystem { root: dir.path().to_path_buf() };

        let store = BlobStore::start(config.clone()).await.unwrap();
        store.namespace("articles").set_text("../escape.html", "<p>hi</p>").await.unwrap();
        store.shutdown().await.unwrap();

        let store = BlobStore::start(config).await.unwrap();
        let text = store.namespace("articles").get_text("../escape.html").await.unwrap();
        assert_eq!(text.as_deref(), Some("<p>hi</p>"));

        // The key never became a path component.
        assert!(!dir.path().join("escape.html").exists());
    }

    #[tokio::test]
    async fn test_filesystem_long_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::start(BlobConfig::Filesystem { root: dir.path().to_path_buf() })
            .await
            .unwrap();
        let ns = store.namespace("articles");

        let first = format!("{}-one.html", "a".repeat(300));
        let second = format!("{}-two.html", "a".repeat(300));
        ns.set_text(&first, "one").await.unwrap();
        ns.set_text(&second, "two").await.unwrap();

        assert_eq!(ns.get_text(&first).await.unwrap().as_deref(), Some("one"));
        assert_eq!(ns.get_text(&second).await.unwrap().as_deref(), Some("two"));
        assert!(file_name(&first).len() <= MAX_FILE_NAME);
        assert_ne!(file_name(&first), file_name(&second));
    }

    #[test]
    fn test_short_keys_are_encoded_whole() {
        assert_eq!(file_name("a.html"), URL_SAFE_NO_PAD.encode("a.html"));
    }

    #[tokio::test]
    async fn test_namespace_json_helpers() {
        let store = BlobStore::start(BlobConfig::Memory).await.unwrap();
        let ns = store.namespace("subscriptions");
        assert_eq!(ns.name(), "subscriptions");

        ns.set_json("emails", &vec!["a@example.com"]).await.unwrap();
        let emails: Vec<String> = ns.get_json("emails").await.unwrap().unwrap();
        assert_eq!(emails, vec!["a@example.com"]);

        ns.set_text("emails", "not json").await.unwrap();
        let err = ns.get_json::<Vec<String>>("emails").await.unwrap_err();
        assert!(matches!(err, ServiceError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_calls_after_shutdown_are_unavailable() {
        let store = BlobStore::start(BlobConfig::Memory).await.unwrap();
        store.shutdown().await.unwrap();

        let err = store.get("content", "data").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable(_)));
    }
}
