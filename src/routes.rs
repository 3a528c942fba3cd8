// Route path constants - single source of truth for all API paths

pub const ITEMS: &str = "/items";
pub const ITEM: &str = "/items/{id}";
pub const ITEM_PREFIX: &str = "/items/";

// Local server only
pub const HEALTH: &str = "/health";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
pub const SWAGGER_UI: &str = "/swagger-ui";

/// Deployment stage prefixes the upstream router may inject
pub const DEFAULT_STAGE_NAMES: [&str; 3] = ["dev", "staging", "prod"];
