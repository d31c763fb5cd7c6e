use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "stockroom-api",
        description = "Inventory items and the stock movements that change them"
    ),
    paths(
        handlers::items::list_items,
        handlers::items::create_item,
        handlers::items::get_item,
        handlers::items::get_item_by_serial,
        handlers::items::search_items,
        handlers::items::update_item,
        handlers::items::delete_item,
        handlers::items::item_movements,
        handlers::movements::list_movements,
        handlers::movements::record_movement,
        handlers::movements::get_movement,
        handlers::movements::update_movement_status,
        handlers::reports::summary,
        handlers::reports::damaged_items,
        handlers::reports::low_stock_items,
        handlers::reports::export_snapshot,
    ),
    tags(
        (name = "items", description = "Item store operations"),
        (name = "movements", description = "Movement engine operations"),
        (name = "reports", description = "Reporting reads")
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at /docs, serving the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
