use crate::envelope::Envelope;
use crate::error::{ApiError, ErrorResponse};
use crate::models::MessageResponse;
use crate::routes;
use crate::store::ItemStore;
use axum::http::StatusCode;

const DELETE_FAILED: &str = "Failed to delete item";

/// DELETE /items/{id} - Delete an item
#[utoipa::path(
    delete,
    path = routes::ITEM,
    params(
        ("id" = String, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Item deleted", body = MessageResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn delete_item(store: &dyn ItemStore, id: &str) -> Result<Envelope, ApiError> {
    store
        .delete(id)
        .await
        .map_err(|e| ApiError::from_store(DELETE_FAILED, e))?;

    tracing::info!("Successfully deleted item with id: {}", id);
    Envelope::json(
        StatusCode::OK,
        &MessageResponse {
            message: format!("Item {} deleted successfully", id),
        },
    )
}
