//! Article text handler
//!
//! Articles are raw text (HTML in practice) stored under their filename,
//! separate from the content document.

use newsroom_sdk::prelude::*;

use crate::runtime::Context;

pub async fn handle(ctx: &Context, filename: Option<&str>, req: &Request) -> Result<Response, HandlerError> {
    let filename = filename
        .filter(|f| !f.is_empty())
        .ok_or_else(|| HandlerError::BadRequest("Filename required".to_string()))?;

    match req.method.to_ascii_uppercase().as_str() {
        "GET" => get_article(ctx, filename).await,
        "PUT" => {
            save_article(ctx, filename, req).await.map_err(|e| {
                tracing::warn!(request_id = %ctx.request_id, filename, "Article save failed: {}", e);
                HandlerError::BadRequest("Failed to save article".to_string())
            })?;
            tracing::info!(request_id = %ctx.request_id, filename, "Article saved");
            Ok(Response::ok(json!({"success": true, "filename": filename})))
        }
        _ => Err(HandlerError::MethodNotAllowed),
    }
}

async fn get_article(ctx: &Context, filename: &str) -> Result<Response, HandlerError> {
    match ctx.services.articles().get_text(filename).await {
        Ok(Some(content)) if !content.is_empty() => Ok(Response::ok(json!({"content": content}))),
        Ok(_) => Err(HandlerError::NotFound("Article not found".to_string())),
        Err(e) => {
            tracing::warn!(request_id = %ctx.request_id, filename, "Article read failed: {}", e);
            Err(HandlerError::NotFound("Article not found".to_string()))
        }
    }
}

#[derive(Deserialize)]
struct SaveArticleRequest {
    content: String,
}

async fn save_article(ctx: &Context, filename: &str, req: &Request) -> Result<(), HandlerError> {
    let body: SaveArticleRequest = req.json()?;
    ctx.services.articles().set_text(filename, &body.content).await?;
    Ok(())
}
