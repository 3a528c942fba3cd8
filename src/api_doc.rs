use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{Item, ListResponse, MessageResponse};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "items-api",
        version = "1.0.0",
        description = "CRUD API for items backed by a DynamoDB table"
    ),
    paths(
        handlers::health::health_handler,
        handlers::list::list_items,
        handlers::create::create_item,
        handlers::get::get_item,
        handlers::update::update_item,
        handlers::delete::delete_item
    ),
    components(
        schemas(
            Item,
            ListResponse,
            MessageResponse,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "items", description = "Item operations")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_item_routes() {
        let document = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = &document["paths"];

        assert!(paths["/items"]["get"].is_object());
        assert!(paths["/items"]["post"].is_object());
        assert!(paths["/items/{id}"]["get"].is_object());
        assert!(paths["/items/{id}"]["put"].is_object());
        assert!(paths["/items/{id}"]["delete"].is_object());
        assert!(document["components"]["schemas"]["Item"].is_object());
    }
}
