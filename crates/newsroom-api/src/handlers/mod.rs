//! Resource handlers and the dispatcher that picks one per request
//!
//! Every handler returns `Result<Response, HandlerError>`; the dispatcher
//! turns errors into `{"error": ...}` responses.

pub mod articles;
pub mod collection;
pub mod subscribe;
pub mod upload;

use newsroom_sdk::{HandlerError, Request, Response};

use crate::content::Collection;
use crate::path::ApiPath;
use crate::runtime::Context;

/// Route a request by its resource segment.
pub async fn dispatch(ctx: &Context, req: &Request) -> Response {
    let path = ApiPath::parse(&req.path);

    tracing::debug!(
        request_id = %ctx.request_id,
        method = %req.method,
        resource = %path.resource,
        id = ?path.id,
        sub_resource = ?path.sub_resource,
        "Dispatching request"
    );

    let result = match path.resource {
        "articles" => articles::handle(ctx, path.id, req).await,
        "subscribe" => subscribe::handle(ctx, req).await,
        "upload" => upload::handle(path.id, req),
        other => match Collection::from_resource(other) {
            Some(collection) => collection::handle(ctx, collection, path.id, req).await,
            None => Err(HandlerError::not_found()),
        },
    };

    result.unwrap_or_else(|err| {
        if err.status_code() >= 500 {
            tracing::error!(request_id = %ctx.request_id, "Request failed: {}", err);
        } else {
            tracing::debug!(request_id = %ctx.request_id, status = err.status_code(), "Request rejected: {}", err);
        }
        err.to_response()
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_unknown_resource_is_not_found() {
        let ctx = testing::context().await;
        let response = dispatch(&ctx, &Request::new("GET", "/api/podcasts")).await;
        assert_eq!(response.status, 404);
        assert_eq!(response.json_body(), Some(json!({"error": "Not found"})));
    }

    #[tokio::test]
    async fn test_empty_store_lists_seed_news() {
        let ctx = testing::context().await;
        let response = dispatch(&ctx, &Request::new("GET", "/api/news")).await;
        assert_eq!(response.status, 200);
        let body = response.json_body().unwrap();
        let ids: Vec<_> = body.as_array().unwrap().iter().map(|n| n["_id"].clone()).collect();
        assert_eq!(ids, vec![json!("news_1"), json!("news_2"), json!("news_3"), json!("news_4")]);
    }

    #[tokio::test]
    async fn test_sub_resource_is_ignored() {
        let ctx = testing::context().await;
        let response = dispatch(&ctx, &Request::new("GET", "/api/news/news_2/comments")).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.json_body().unwrap()["_id"], json!("news_2"));
    }

    #[tokio::test]
    async fn test_each_resource_is_routed() {
        let ctx = testing::context().await;

        let response = dispatch(&ctx, &Request::new("GET", "/api/videos")).await;
        assert_eq!(response.json_body().unwrap().as_array().unwrap().len(), 3);

        let response = dispatch(&ctx, &Request::new("GET", "/api/trending")).await;
        assert_eq!(response.json_body(), Some(json!([])));

        let response = dispatch(&ctx, &Request::new("GET", "/api/articles/")).await;
        assert_eq!(response.status, 400);

        let response = dispatch(&ctx, &Request::new("GET", "/api/subscribe")).await;
        assert_eq!(response.status, 405);

        let response = dispatch(&ctx, &Request::new("POST", "/api/upload/image")).await;
        assert_eq!(response.status, 200);
    }
}
