mod api_doc;
mod config;
mod dispatcher;
mod envelope;
mod error;
mod handlers;
mod lambda;
mod models;
mod routes;
mod server;
mod state;
mod store;

use config::Config;
use state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Set by the managed function host in every execution environment
const LAMBDA_RUNTIME_API: &str = "AWS_LAMBDA_RUNTIME_API";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let managed = std::env::var_os(LAMBDA_RUNTIME_API).is_some();
    init_tracing(managed);

    tracing::info!("items-api starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store = store::connect(&config).await?;
    let state = AppState::new(store, config);

    if managed {
        lambda::run(state).await.map_err(|e| anyhow::anyhow!(e))
    } else {
        server::serve(state).await
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "items_api=info,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .without_time(),
            )
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
