//! Newsletter subscription handler

use newsroom_sdk::prelude::*;

use crate::runtime::Context;

/// Key of the subscriber list inside its namespace
pub const EMAILS_KEY: &str = "emails";

const THANK_YOU: &str = "Thank you for subscribing! You'll be notified when new podcasts are added.";

pub async fn handle(ctx: &Context, req: &Request) -> Result<Response, HandlerError> {
    if !req.is_method("POST") {
        return Err(HandlerError::MethodNotAllowed);
    }

    let body: JsonValue = req.json().map_err(|_| subscription_failed())?;

    // Only a presence check for '@'; no address validation beyond that.
    let email = match body.get("email").and_then(JsonValue::as_str) {
        Some(email) if email.contains('@') => email,
        _ => return Err(HandlerError::BadRequest("Valid email required".to_string())),
    };

    let store = ctx.services.subscriptions();
    let mut emails: Vec<String> = match store.get_json(EMAILS_KEY).await {
        Ok(emails) => emails.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(request_id = %ctx.request_id, "Starting a fresh subscriber list: {}", e);
            Vec::new()
        }
    };

    if !emails.iter().any(|existing| existing == email) {
        emails.push(email.to_string());
        store.set_json(EMAILS_KEY, &emails).await.map_err(|e| {
            tracing::error!(request_id = %ctx.request_id, "Subscriber list write failed: {}", e);
            subscription_failed()
        })?;
        tracing::info!(request_id = %ctx.request_id, subscribers = emails.len(), "New subscriber");
    }

    Ok(Response::ok(json!({
        "success": true,
        "message": THANK_YOU,
    })))
}

fn subscription_failed() -> HandlerError {
    HandlerError::BadRequest("Subscription failed".to_string())
}
