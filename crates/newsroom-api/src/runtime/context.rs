//! Context API for handlers
//!
//! The Context gives a handler access to the shared services and the
//! identifier of the request it is serving.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::services::Services;

/// Request identifier for tracing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Create a new random request ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from a string
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context passed to every handler
///
/// Cheap to clone; handlers take it by reference.
///
/// # Example
///
/// ```ignore
/// async fn handle(ctx: &Context, req: &Request) -> Result<Response, HandlerError> {
///     let document = ctx.services.content().load().await?;
///     tracing::info!(request_id = %ctx.request_id, "Listed news");
///     Ok(Response::ok(&document.news))
/// }
/// ```
#[derive(Clone)]
pub struct Context {
    /// Shared services
    pub services: Services,

    /// Unique request identifier
    pub request_id: RequestId,
}

impl Context {
    /// Create a context with a specific request ID
    pub fn with_request_id(services: Services, request_id: RequestId) -> Self {
        Self {
            services,
            request_id,
        }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("request_id", &self.request_id)
            .field("services", &self.services)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentDocument;
    use crate::runtime::services::{BlobConfig, BlobStore};

    #[test]
    fn test_request_id() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();
        assert_ne!(id1, id2);

        let id3 = RequestId::from_string("test-id".to_string());
        assert_eq!(id3.as_str(), "test-id");
        assert_eq!(id3.to_string(), "test-id");
    }

    #[tokio::test]
    async fn test_context_with_request_id() {
        let blobs = BlobStore::start(BlobConfig::Memory).await.unwrap();
        let services = Services::new(blobs, ContentDocument::default());

        let ctx = Context::with_request_id(services, RequestId::from_string("req-123".to_string()));
        assert_eq!(ctx.request_id.as_str(), "req-123");
        assert!(format!("{:?}", ctx).contains("req-123"));
    }
}
