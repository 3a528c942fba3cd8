//! DynamoDB attribute conversion functions.
//!
//! Pure functions between `AttributeValue` maps and items, testable without
//! DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use rust_decimal::Decimal;

use crate::models::{Item, ItemUpdate, parse_decimal};
use crate::store::StoreError;

pub const ATTR_ID: &str = "id";
pub const ATTR_NAME: &str = "name";
pub const ATTR_DESCRIPTION: &str = "description";
pub const ATTR_PRICE: &str = "price";
pub const ATTR_QUANTITY: &str = "quantity";
pub const ATTR_CREATED_AT: &str = "created_at";
pub const ATTR_UPDATED_AT: &str = "updated_at";

/// Condition that holds only while the key is stored
pub const ITEM_EXISTS_CONDITION: &str = "attribute_exists(#id)";

/// Convert an item to a DynamoDB attribute map.
pub fn item_to_attributes(item: &Item) -> HashMap<String, AttributeValue> {
    let mut attributes = HashMap::new();

    attributes.insert(ATTR_ID.to_string(), AttributeValue::S(item.id.clone()));
    attributes.insert(ATTR_NAME.to_string(), AttributeValue::S(item.name.clone()));
    attributes.insert(
        ATTR_DESCRIPTION.to_string(),
        AttributeValue::S(item.description.clone()),
    );
    if let Some(price) = item.price {
        attributes.insert(ATTR_PRICE.to_string(), decimal_to_attribute(price));
    }
    if let Some(quantity) = item.quantity {
        attributes.insert(
            ATTR_QUANTITY.to_string(),
            AttributeValue::N(quantity.to_string()),
        );
    }
    attributes.insert(
        ATTR_CREATED_AT.to_string(),
        AttributeValue::S(item.created_at.clone()),
    );
    attributes.insert(
        ATTR_UPDATED_AT.to_string(),
        AttributeValue::S(item.updated_at.clone()),
    );

    attributes
}

/// Convert a DynamoDB attribute map to an item.
pub fn attributes_to_item(
    attributes: &HashMap<String, AttributeValue>,
) -> Result<Item, StoreError> {
    Ok(Item {
        id: get_string(attributes, ATTR_ID)?,
        name: get_string(attributes, ATTR_NAME)?,
        description: get_string(attributes, ATTR_DESCRIPTION)?,
        price: get_optional_number(attributes, ATTR_PRICE)?
            .map(|text| {
                parse_decimal(text).map_err(|e| {
                    StoreError::InvalidData(format!("Invalid decimal in {}: {}", ATTR_PRICE, e))
                })
            })
            .transpose()?,
        quantity: get_optional_number(attributes, ATTR_QUANTITY)?
            .map(|text| {
                text.parse::<i64>().map_err(|e| {
                    StoreError::InvalidData(format!("Invalid integer in {}: {}", ATTR_QUANTITY, e))
                })
            })
            .transpose()?,
        created_at: get_string(attributes, ATTR_CREATED_AT)?,
        updated_at: get_string(attributes, ATTR_UPDATED_AT)?,
    })
}

/// Decode scanned rows, skipping any that do not form a valid item.
pub fn decode_rows(rows: Vec<HashMap<String, AttributeValue>>) -> Vec<Item> {
    rows.iter()
        .filter_map(|attributes| match attributes_to_item(attributes) {
            Ok(item) => Some(item),
            Err(e) => {
                let id = attributes.get(ATTR_ID).and_then(|v| v.as_s().ok());
                tracing::warn!("Skipping undecodable item {:?}: {}", id, e);
                None
            }
        })
        .collect()
}

/// Key map addressing a single item.
pub fn item_key(id: &str) -> HashMap<String, AttributeValue> {
    HashMap::from([(ATTR_ID.to_string(), AttributeValue::S(id.to_string()))])
}

/// A `SET` update expression with its placeholder maps.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

impl UpdateExpression {
    fn set(&mut self, attribute: &str, value: AttributeValue) {
        let clause = format!("#{attribute} = :{attribute}");
        if self.expression.is_empty() {
            self.expression = format!("SET {}", clause);
        } else {
            self.expression.push_str(", ");
            self.expression.push_str(&clause);
        }
        self.names
            .insert(format!("#{attribute}"), attribute.to_string());
        self.values.insert(format!(":{attribute}"), value);
    }
}

/// Build the update expression for a partial update.
///
/// `updated_at` is always set. `#id` is registered for the existence
/// condition; `id` and `created_at` are never assigned.
pub fn build_update_expression(update: &ItemUpdate) -> UpdateExpression {
    let mut expr = UpdateExpression {
        expression: String::new(),
        names: HashMap::from([("#id".to_string(), ATTR_ID.to_string())]),
        values: HashMap::new(),
    };

    expr.set(
        ATTR_UPDATED_AT,
        AttributeValue::S(update.updated_at.clone()),
    );

    let fields = &update.fields;
    if let Some(name) = &fields.name {
        expr.set(ATTR_NAME, AttributeValue::S(name.clone()));
    }
    if let Some(description) = &fields.description {
        expr.set(ATTR_DESCRIPTION, AttributeValue::S(description.clone()));
    }
    if let Some(price) = fields.price {
        expr.set(ATTR_PRICE, decimal_to_attribute(price));
    }
    if let Some(quantity) = fields.quantity {
        expr.set(ATTR_QUANTITY, AttributeValue::N(quantity.to_string()));
    }

    expr
}

fn decimal_to_attribute(value: Decimal) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

fn get_string(
    attributes: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<String, StoreError> {
    attributes
        .get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| StoreError::InvalidData(format!("Missing or invalid field: {}", key)))
}

fn get_optional_number<'a>(
    attributes: &'a HashMap<String, AttributeValue>,
    key: &str,
) -> Result<Option<&'a str>, StoreError> {
    match attributes.get(key) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(AttributeValue::N(text)) => Ok(Some(text.as_str())),
        Some(_) => Err(StoreError::InvalidData(format!(
            "Field {} is not a number",
            key
        ))),
    }
}
