//! HTTP router - turns axum requests into handler requests and back
//!
//! `/health` is answered here; every other path goes to the dispatcher,
//! which answers 404 for anything it does not recognise.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::runtime::RequestId;
use crate::AppState;

/// Build the API router with its middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/{*path}", any(handle_api_request))
        .fallback(handle_api_request)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check: reports whether the blob store answers
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.services.blobs.health().await {
        Ok(true) => (StatusCode::OK, "OK"),
        _ => (StatusCode::SERVICE_UNAVAILABLE, "Blob store unavailable"),
    }
}

/// Convert the incoming request, dispatch it, and convert the result
async fn handle_api_request(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Response {
    let request_id = request.headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| RequestId::from_string(v.to_string()))
        .unwrap_or_default();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Incoming request"
    );

    let body_bytes = match axum::body::to_bytes(request.into_body(), state.config.max_body_bytes).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(request_id = %request_id, "Failed to read body: {}", e);
            let response = newsroom_sdk::Response::bad_request("Failed to read body")
                .with_header("X-Request-Id", request_id.as_str());
            return into_http_response(response);
        }
    };

    let body = if body_bytes.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(&body_bytes).into_owned())
    };

    let sdk_request = newsroom_sdk::Request { method, path, body };

    let ctx = state.context(request_id.clone());
    let response = handlers::dispatch(&ctx, &sdk_request).await;

    into_http_response(response.with_header("X-Request-Id", request_id.as_str()))
}

fn into_http_response(sdk_response: newsroom_sdk::Response) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::from_u16(sdk_response.status).unwrap_or(StatusCode::OK));

    for (key, value) in sdk_response.headers {
        builder = builder.header(&key, &value);
    }

    match builder.body(Body::from(sdk_response.body.unwrap_or_default())) {
        Ok(response) => response,
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response").into_response(),
    }
}
