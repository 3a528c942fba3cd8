use crate::envelope::Envelope;
use crate::error::{ApiError, ErrorResponse};
use crate::models::{Item, ItemFields, ItemUpdate, timestamp_now};
use crate::routes;
use crate::store::ItemStore;
use axum::http::StatusCode;
use serde_json::{Map, Value as JsonValue};

const UPDATE_FAILED: &str = "Failed to update item";

/// PUT /items/{id} - Partially update an item
///
/// Only `name`, `description`, `price` and `quantity` are applied; every other
/// key is ignored. `updated_at` is always refreshed. The store call is
/// conditional on the item existing, so a missing id never writes.
#[utoipa::path(
    put,
    path = routes::ITEM,
    params(
        ("id" = String, Path, description = "Item id")
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 400, description = "Invalid field values", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn update_item(
    store: &dyn ItemStore,
    id: &str,
    body: Map<String, JsonValue>,
) -> Result<Envelope, ApiError> {
    let update = ItemUpdate {
        fields: ItemFields::from_body(&body)?,
        updated_at: timestamp_now(),
    };

    let item = store
        .update(id, &update)
        .await
        .map_err(|e| ApiError::from_store(UPDATE_FAILED, e))?;

    tracing::info!("Successfully updated item with id: {}", id);
    Envelope::json(StatusCode::OK, &item)
}
