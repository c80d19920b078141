//! News, videos and trending handlers
//!
//! The three collections behave identically apart from how a new item is
//! built and where it is inserted; see [`Collection`].

use newsroom_sdk::prelude::*;

use crate::content::{ids, merge_into, position_of, Collection, Record};
use crate::runtime::Context;

pub async fn handle(
    ctx: &Context,
    collection: Collection,
    id: Option<&str>,
    req: &Request,
) -> Result<Response, HandlerError> {
    let repo = ctx.services.content();
    let mut document = repo.load().await?;

    match req.method.to_ascii_uppercase().as_str() {
        "GET" => {
            let items = collection.items(&document);
            match id {
                Some(id) => {
                    let index = position_of(items, id).ok_or_else(HandlerError::not_found)?;
                    Ok(Response::ok(&items[index]))
                }
                None => Ok(Response::ok(items)),
            }
        }

        "POST" => {
            let body: JsonValue = req.json()?;
            let items = collection.items_mut(&mut document);
            let item = collection.build_item(ids::generate_id(collection.id_prefix()), &body, items.len())?;
            collection.insert(items, item.clone());

            repo.save(&document).await?;
            tracing::info!(
                request_id = %ctx.request_id,
                collection = collection.name(),
                id = ?item.get("_id"),
                "Item created"
            );
            Ok(Response::created(item))
        }

        "PUT" => {
            let id = id.ok_or_else(|| HandlerError::BadRequest("ID required".to_string()))?;
            let items = collection.items_mut(&mut document);
            let index = position_of(items, id).ok_or_else(HandlerError::not_found)?;

            let updates: Record = req.json()?;
            merge_into(&mut items[index], updates);
            let updated = items[index].clone();

            repo.save(&document).await?;
            tracing::info!(request_id = %ctx.request_id, collection = collection.name(), id, "Item updated");
            Ok(Response::ok(updated))
        }

        "DELETE" => {
            let id = id.ok_or_else(|| HandlerError::BadRequest("ID required".to_string()))?;
            let items = collection.items_mut(&mut document);
            let index = position_of(items, id).ok_or_else(HandlerError::not_found)?;
            items.remove(index);

            repo.save(&document).await?;
            tracing::info!(request_id = %ctx.request_id, collection = collection.name(), id, "Item deleted");
            Ok(Response::ok(json!({"success": true})))
        }

        _ => Err(HandlerError::MethodNotAllowed),
    }
}
