use chrono::{SecondsFormat, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

/// Fields that must be present when creating an item
pub const REQUIRED_FIELDS: [&str; 2] = ["name", "description"];

/// A stored item, as returned by every read or write operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "decimal_number"
    )]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl Item {
    /// Apply a partial update in place. `id` and `created_at` are never touched.
    pub fn apply(&mut self, update: &ItemUpdate) {
        let fields = &update.fields;
        if let Some(name) = &fields.name {
            self.name = name.clone();
        }
        if let Some(description) = &fields.description {
            self.description = description.clone();
        }
        if let Some(price) = fields.price {
            self.price = Some(price);
        }
        if let Some(quantity) = fields.quantity {
            self.quantity = Some(quantity);
        }
        self.updated_at = update.updated_at.clone();
    }
}

/// The recognised item fields found in a request body, already coerced.
///
/// A field is `Some` only when the body carried it. Unknown keys, `id` and
/// `created_at` are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i64>,
}

impl ItemFields {
    pub fn from_body(body: &Map<String, JsonValue>) -> Result<Self, FieldError> {
        Ok(Self {
            name: body
                .get("name")
                .map(|value| coerce_string("name", value))
                .transpose()?,
            description: body
                .get("description")
                .map(|value| coerce_string("description", value))
                .transpose()?,
            price: body.get("price").map(coerce_price).transpose()?,
            quantity: body.get("quantity").map(coerce_quantity).transpose()?,
        })
    }
}

/// A partial update: the changed fields plus the refreshed `updated_at`
#[derive(Debug, Clone, PartialEq)]
pub struct ItemUpdate {
    pub fields: ItemFields,
    pub updated_at: String,
}

/// Errors raised while coercing body fields to their stored types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Field '{0}' must be a string")]
    NotAString(&'static str),
    #[error("Field 'price' must be a decimal number, got {0}")]
    InvalidPrice(String),
    #[error("Field 'quantity' must be an integer, got {0}")]
    InvalidQuantity(String),
}

/// Response type for the list operation
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListResponse {
    pub items: Vec<Item>,
    pub count: usize,
}

/// Response type for the delete operation
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Current UTC time as an ISO-8601 string with microsecond precision.
///
/// The fixed width keeps lexicographic order equal to chronological order.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse decimal text exactly, accepting plain and scientific notation
pub fn parse_decimal(text: &str) -> Result<Decimal, rust_decimal::Error> {
    let text = text.trim();
    if text.contains(['e', 'E']) {
        Decimal::from_scientific(text)
    } else {
        Decimal::from_str_exact(text)
    }
}

fn coerce_string(field: &'static str, value: &JsonValue) -> Result<String, FieldError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or(FieldError::NotAString(field))
}

fn coerce_price(value: &JsonValue) -> Result<Decimal, FieldError> {
    let parsed = match value {
        JsonValue::Number(number) => parse_decimal(&number.to_string()).ok(),
        JsonValue::String(text) => parse_decimal(text).ok(),
        _ => None,
    };
    parsed.ok_or_else(|| FieldError::InvalidPrice(value.to_string()))
}

fn coerce_quantity(value: &JsonValue) -> Result<i64, FieldError> {
    let parsed = match value {
        // fractional numbers truncate toward zero
        JsonValue::Number(number) => number.as_i64().or_else(|| {
            parse_decimal(&number.to_string())
                .ok()
                .and_then(|decimal| decimal.trunc().to_i64())
        }),
        JsonValue::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| FieldError::InvalidQuantity(value.to_string()))
}

/// Serde adapter that writes decimals as exact JSON number literals
mod decimal_number {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(decimal) => serde_json::Number::from_str(&decimal.to_string())
                .map_err(<S::Error as serde::ser::Error>::custom)?
                .serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        Option::<serde_json::Number>::deserialize(deserializer)?
            .map(|number| {
                super::parse_decimal(&number.to_string())
                    .map_err(<D::Error as serde::de::Error>::custom)
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: JsonValue) -> Map<String, JsonValue> {
        value.as_object().cloned().unwrap()
    }

    fn sample_item() -> Item {
        Item {
            id: "abc".to_string(),
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: Some(Decimal::new(1999, 2)),
            quantity: Some(3),
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000000Z".to_string(),
        }
    }

    #[test]
    fn test_price_serializes_as_exact_number() {
        let value = serde_json::to_string(&sample_item()).unwrap();
        assert!(value.contains("\"price\":19.99"));
    }

    #[test]
    fn test_absent_optional_fields_are_omitted() {
        let mut item = sample_item();
        item.price = None;
        item.quantity = None;

        let value = serde_json::to_value(&item).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("price"));
        assert!(!object.contains_key("quantity"));
    }

    #[test]
    fn test_item_deserializes_price() {
        let item: Item = serde_json::from_str(
            r#"{"id":"1","name":"n","description":"d","price":0.1,"created_at":"t","updated_at":"t"}"#,
        )
        .unwrap();
        assert_eq!(item.price, Some(Decimal::new(1, 1)));
        assert_eq!(item.quantity, None);
    }

    #[test]
    fn test_fields_from_body_coerces_values() {
        let fields = ItemFields::from_body(&body(json!({
            "name": "Widget",
            "price": "12.50",
            "quantity": 4.9,
            "id": "ignored",
            "color": "blue"
        })))
        .unwrap();

        assert_eq!(fields.name.as_deref(), Some("Widget"));
        assert_eq!(fields.description, None);
        assert_eq!(fields.price, Some(Decimal::new(1250, 2)));
        assert_eq!(fields.quantity, Some(4));
    }

    #[test]
    fn test_fields_from_body_accepts_string_quantity() {
        let fields = ItemFields::from_body(&body(json!({"quantity": " 7 "}))).unwrap();
        assert_eq!(fields.quantity, Some(7));
    }

    #[test]
    fn test_fields_from_body_rejects_bad_price() {
        let err = ItemFields::from_body(&body(json!({"price": "cheap"}))).unwrap_err();
        assert_eq!(err, FieldError::InvalidPrice("\"cheap\"".to_string()));
    }

    #[test]
    fn test_fields_from_body_rejects_bad_quantity() {
        let err = ItemFields::from_body(&body(json!({"quantity": true}))).unwrap_err();
        assert!(err.to_string().contains("quantity"));
    }

    #[test]
    fn test_fields_from_body_rejects_non_string_name() {
        let err = ItemFields::from_body(&body(json!({"name": 5}))).unwrap_err();
        assert_eq!(err, FieldError::NotAString("name"));
    }

    #[test]
    fn test_parse_decimal_scientific() {
        assert_eq!(parse_decimal("1.5e2").unwrap(), Decimal::new(150, 0));
        assert!(parse_decimal("NaN").is_err());
    }

    #[test]
    fn test_apply_keeps_identity_fields() {
        let mut item = sample_item();
        let update = ItemUpdate {
            fields: ItemFields {
                price: Some(Decimal::new(500, 2)),
                ..Default::default()
            },
            updated_at: "2024-02-01T00:00:00.000000Z".to_string(),
        };

        item.apply(&update);

        assert_eq!(item.id, "abc");
        assert_eq!(item.name, "Widget");
        assert_eq!(item.quantity, Some(3));
        assert_eq!(item.price, Some(Decimal::new(500, 2)));
        assert_eq!(item.created_at, "2024-01-01T00:00:00.000000Z");
        assert_eq!(item.updated_at, "2024-02-01T00:00:00.000000Z");
    }

    #[test]
    fn test_timestamp_now_is_rfc3339_utc() {
        let now = timestamp_now();
        assert!(now.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&now).is_ok());
    }
}
