use crate::envelope::Envelope;
use crate::error::{ApiError, ErrorResponse};
use crate::models::{Item, ItemFields, REQUIRED_FIELDS, timestamp_now};
use crate::routes;
use crate::store::ItemStore;
use axum::http::StatusCode;
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

const CREATE_FAILED: &str = "Failed to create item";

/// POST /items - Create an item
///
/// `name` and `description` are required. `price` is stored as an exact
/// decimal and `quantity` as an integer, each only when supplied. The id and
/// both timestamps are generated here.
#[utoipa::path(
    post,
    path = routes::ITEMS,
    request_body = serde_json::Value,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn create_item(
    store: &dyn ItemStore,
    body: Map<String, JsonValue>,
) -> Result<Envelope, ApiError> {
    let missing: Vec<&str> = REQUIRED_FIELDS
        .into_iter()
        .filter(|field| !body.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    // Both required fields are present, so coercion yields Some for each
    let fields = ItemFields::from_body(&body)?;
    let now = timestamp_now();
    let item = Item {
        id: Uuid::new_v4().to_string(),
        name: fields.name.unwrap_or_default(),
        description: fields.description.unwrap_or_default(),
        price: fields.price,
        quantity: fields.quantity,
        created_at: now.clone(),
        updated_at: now,
    };

    store
        .put(&item)
        .await
        .map_err(|e| ApiError::from_store(CREATE_FAILED, e))?;

    tracing::info!("Successfully created item with id: {}", item.id);
    Envelope::json(StatusCode::CREATED, &item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn body(value: JsonValue) -> Map<String, JsonValue> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_create_generates_id_and_timestamps() {
        let store = InMemoryStore::new();

        let envelope = create_item(
            &store,
            body(json!({"name": "Pen", "description": "Blue pen", "price": 1.25, "quantity": 10})),
        )
        .await
        .unwrap();

        assert_eq!(envelope.status_code, 201);
        let item: Item = serde_json::from_str(&envelope.body).unwrap();
        assert!(Uuid::parse_str(&item.id).is_ok());
        assert_eq!(item.created_at, item.updated_at);
        assert_eq!(item.price, Some(Decimal::new(125, 2)));
        assert_eq!(item.quantity, Some(10));
        assert_eq!(store.get(&item.id).await.unwrap(), Some(item));
    }

    #[tokio::test]
    async fn test_create_omits_absent_optional_fields() {
        let store = InMemoryStore::new();

        let envelope = create_item(&store, body(json!({"name": "Pen", "description": "Blue pen"})))
            .await
            .unwrap();

        let value: JsonValue = serde_json::from_str(&envelope.body).unwrap();
        assert!(value.get("price").is_none());
        assert!(value.get("quantity").is_none());
    }

    #[tokio::test]
    async fn test_create_lists_missing_fields() {
        let store = InMemoryStore::new();

        let err = create_item(&store, body(json!({}))).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Missing required fields: name, description");
        assert!(store.scan().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_non_numeric_price() {
        let store = InMemoryStore::new();

        let err = create_item(
            &store,
            body(json!({"name": "Pen", "description": "Blue pen", "price": "free"})),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(store.scan().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_ignores_client_id() {
        let store = InMemoryStore::new();

        let envelope = create_item(
            &store,
            body(json!({"id": "mine", "name": "Pen", "description": "Blue pen"})),
        )
        .await
        .unwrap();

        let item: Item = serde_json::from_str(&envelope.body).unwrap();
        assert_ne!(item.id, "mine");
    }
}
