use std::env;
use anyhow::{Context, Result, bail};

use crate::routes::DEFAULT_STAGE_NAMES;

/// Where items are persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb {
        table_name: String,
        endpoint: Option<String>,
    },
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub stage_names: Vec<String>,
    pub service_port: u16,
    pub service_host: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store_backend: StoreBackend::Memory,
            stage_names: DEFAULT_STAGE_NAMES.iter().map(|s| s.to_string()).collect(),
            service_port: 3000,
            service_host: "0.0.0.0".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let backend = lookup("STORE_BACKEND").unwrap_or_else(|| "dynamodb".to_string());

        let store_backend = match backend.trim().to_ascii_lowercase().as_str() {
            "dynamodb" => {
                let table_name = lookup("DYNAMODB_TABLE")
                    .filter(|name| !name.trim().is_empty())
                    .context("DYNAMODB_TABLE environment variable is required")?;
                StoreBackend::DynamoDb {
                    table_name,
                    endpoint: lookup("DYNAMODB_ENDPOINT"),
                }
            }
            "memory" => StoreBackend::Memory,
            other => bail!("STORE_BACKEND must be one of: dynamodb, memory, got '{}'", other),
        };

        let stage_names = match lookup("STAGE_NAMES") {
            Some(names) => names
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_STAGE_NAMES.iter().map(|s| s.to_string()).collect(),
        };

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            store_backend,
            stage_names,
            service_port,
            service_host,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        match &self.store_backend {
            StoreBackend::DynamoDb {
                table_name,
                endpoint,
            } => {
                tracing::info!("  Store: DynamoDB table {}", table_name);
                tracing::info!("  DynamoDB endpoint: {}",
                    endpoint.as_deref().unwrap_or("default (AWS)"));
            }
            StoreBackend::Memory => tracing::info!("  Store: in-memory"),
        }
        tracing::info!("  Stage prefixes: {}", self.stage_names.join(", "));
        tracing::info!("  Local server address: {}:{}", self.service_host, self.service_port);
    }
}
