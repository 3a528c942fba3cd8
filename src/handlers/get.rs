use crate::envelope::Envelope;
use crate::error::{ApiError, ErrorResponse};
use crate::models::Item;
use crate::routes;
use crate::store::ItemStore;
use axum::http::StatusCode;

const GET_FAILED: &str = "Failed to retrieve item";

/// GET /items/{id} - Retrieve a single item
#[utoipa::path(
    get,
    path = routes::ITEM,
    params(
        ("id" = String, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Item found", body = Item),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn get_item(store: &dyn ItemStore, id: &str) -> Result<Envelope, ApiError> {
    match store
        .get(id)
        .await
        .map_err(|e| ApiError::from_store(GET_FAILED, e))?
    {
        Some(item) => {
            tracing::info!("Successfully retrieved item with id: {}", id);
            Envelope::json(StatusCode::OK, &item)
        }
        None => {
            tracing::info!("Item not found with id: {}", id);
            Err(ApiError::ItemNotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_get_existing_item() {
        let store = InMemoryStore::new();
        let item = Item {
            id: "abc".to_string(),
            name: "Mug".to_string(),
            description: "Coffee mug".to_string(),
            price: Some(Decimal::new(1999, 2)),
            quantity: Some(2),
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000000Z".to_string(),
        };
        store.put(&item).await.unwrap();

        let envelope = get_item(&store, "abc").await.unwrap();

        assert_eq!(envelope.status_code, 200);
        let response: Item = serde_json::from_str(&envelope.body).unwrap();
        assert_eq!(response, item);
    }

    #[tokio::test]
    async fn test_get_missing_item() {
        let store = InMemoryStore::new();

        let err = get_item(&store, "nope").await.unwrap_err();

        assert!(matches!(err, ApiError::ItemNotFound));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
