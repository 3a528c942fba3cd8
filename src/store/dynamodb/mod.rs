//! DynamoDB storage backend.

mod conversions;
mod error;

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType, ReturnValue,
    ScalarAttributeType, TableStatus,
};

use super::{ItemStore, Result, StoreError};
use crate::models::{Item, ItemUpdate};
use conversions::{
    ATTR_ID, ITEM_EXISTS_CONDITION, attributes_to_item, build_update_expression, decode_rows,
    item_key, item_to_attributes,
};
use error::{
    map_delete_item_error, map_describe_table_error, map_get_item_error, map_put_item_error,
    map_scan_error, map_update_item_error,
};

const TABLE_ACTIVE_ATTEMPTS: u32 = 30;
const TABLE_ACTIVE_DELAY: Duration = Duration::from_secs(1);

/// DynamoDB-backed item store over a single table keyed by `id`.
#[derive(Clone)]
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl DynamoDbStore {
    /// Creates a store with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Create a store from the AWS default credential chain
    ///
    /// A custom endpoint points the client at a local DynamoDB and enables
    /// auto-provisioning: the table is created if it does not exist.
    pub async fn connect(table_name: &str, endpoint: Option<&str>) -> AnyResult<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(endpoint) = endpoint {
            tracing::info!("Connecting to DynamoDB at: {}", endpoint);
            loader = loader.endpoint_url(endpoint);
        } else {
            tracing::info!("Connecting to AWS DynamoDB");
        }

        let sdk_config = loader.load().await;
        let store = Self::new(Client::new(&sdk_config), table_name);

        if endpoint.is_some() {
            store.ensure_table().await?;
        }

        tracing::info!("Using DynamoDB table: {}", store.table_name);
        Ok(store)
    }

    /// Ensure the table exists, creating it if necessary
    pub async fn ensure_table(&self) -> AnyResult<()> {
        match self
            .client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
        {
            Ok(_) => {
                tracing::info!("Table '{}' already exists", self.table_name);
                return Ok(());
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception()) =>
            {
                tracing::info!("Table '{}' not found, creating...", self.table_name);
            }
            Err(err) => return Err(map_describe_table_error(err).into()),
        }

        let key_schema = KeySchemaElement::builder()
            .attribute_name(ATTR_ID)
            .key_type(KeyType::Hash)
            .build()
            .context("Invalid key schema")?;
        let attribute_definition = AttributeDefinition::builder()
            .attribute_name(ATTR_ID)
            .attribute_type(ScalarAttributeType::S)
            .build()
            .context("Invalid attribute definition")?;

        self.client
            .create_table()
            .table_name(&self.table_name)
            .key_schema(key_schema)
            .attribute_definitions(attribute_definition)
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
            .with_context(|| format!("Failed to create table '{}'", self.table_name))?;

        self.wait_for_table_active().await?;
        tracing::info!("Table '{}' created successfully", self.table_name);
        Ok(())
    }

    async fn wait_for_table_active(&self) -> AnyResult<()> {
        for _ in 0..TABLE_ACTIVE_ATTEMPTS {
            let response = self
                .client
                .describe_table()
                .table_name(&self.table_name)
                .send()
                .await
                .map_err(map_describe_table_error)?;

            let status = response.table().and_then(|table| table.table_status());
            if status == Some(&TableStatus::Active) {
                return Ok(());
            }
            tokio::time::sleep(TABLE_ACTIVE_DELAY).await;
        }

        anyhow::bail!("Table '{}' did not become active in time", self.table_name)
    }
}

#[async_trait]
impl ItemStore for DynamoDbStore {
    async fn get(&self, id: &str) -> Result<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(item_key(id)))
            .consistent_read(true)
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(attributes) => Ok(Some(attributes_to_item(&attributes)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, item: &Item) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item_to_attributes(item)))
            .send()
            .await
            .map_err(map_put_item_error)?;

        tracing::debug!("Put item with id: {}", item.id);
        Ok(())
    }

    async fn update(&self, id: &str, update: &ItemUpdate) -> Result<Item> {
        let expr = build_update_expression(update);

        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(item_key(id)))
            .update_expression(expr.expression)
            .condition_expression(ITEM_EXISTS_CONDITION)
            .set_expression_attribute_names(Some(expr.names))
            .set_expression_attribute_values(Some(expr.values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| map_update_item_error(e, id))?;

        let attributes = result.attributes.ok_or_else(|| {
            StoreError::InvalidData("UpdateItem returned no attributes".to_string())
        })?;
        attributes_to_item(&attributes)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(item_key(id)))
            .condition_expression(ITEM_EXISTS_CONDITION)
            .expression_attribute_names("#id", ATTR_ID)
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, id))?;

        tracing::debug!("Deleted item with id: {}", id);
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let mut page = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(map_scan_error)?;

            items.extend(decode_rows(page.items.take().unwrap_or_default()));

            match page.last_evaluated_key.take() {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        tracing::debug!("Scanned {} items from {}", items.len(), self.table_name);
        Ok(items)
    }

    async fn health_check(&self) -> Result<()> {
        self.client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(map_describe_table_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_is_clonable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<DynamoDbStore>();
    }

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DynamoDbStore>();
    }
}
