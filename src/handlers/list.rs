use crate::envelope::Envelope;
use crate::error::{ApiError, ErrorResponse};
use crate::models::ListResponse;
use crate::routes;
use crate::store::ItemStore;
use axum::http::StatusCode;

const LIST_FAILED: &str = "Failed to retrieve items";

/// GET /items - List all items
///
/// Full table scan: no filtering, no pagination, no ordering guarantee.
#[utoipa::path(
    get,
    path = routes::ITEMS,
    responses(
        (status = 200, description = "All stored items", body = ListResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn list_items(store: &dyn ItemStore) -> Result<Envelope, ApiError> {
    let items = store
        .scan()
        .await
        .map_err(|e| ApiError::from_store(LIST_FAILED, e))?;

    tracing::info!("Listed {} items", items.len());
    Envelope::json(
        StatusCode::OK,
        &ListResponse {
            count: items.len(),
            items,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use crate::store::InMemoryStore;

    fn item(id: &str) -> Item {
        Item {
            id: id.to_string(),
            name: format!("item {}", id),
            description: "listed".to_string(),
            price: None,
            quantity: None,
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_empty() {
        let store = InMemoryStore::new();

        let envelope = list_items(&store).await.unwrap();

        assert_eq!(envelope.status_code, 200);
        let response: ListResponse = serde_json::from_str(&envelope.body).unwrap();
        assert!(response.items.is_empty());
        assert_eq!(response.count, 0);
    }

    #[tokio::test]
    async fn test_list_count_matches_items() {
        let store = InMemoryStore::new();
        for id in ["1", "2", "3"] {
            store.put(&item(id)).await.unwrap();
        }

        let envelope = list_items(&store).await.unwrap();

        let response: ListResponse = serde_json::from_str(&envelope.body).unwrap();
        assert_eq!(response.count, 3);
        assert_eq!(response.items.len(), 3);
    }
}
