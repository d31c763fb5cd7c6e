use crate::{
    commands::items::{CreateItemCommand, DeleteItemResult, UpdateItemCommand},
    entities::{item, stock_movement},
    errors::ServiceError,
    ApiResponse, ApiResult, AppState, ListQuery, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Create the items router
pub fn items_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/search", get(search_items))
        .route("/by-serial/{serial}", get(get_item_by_serial))
        .route("/{id}", get(get_item).put(update_item).delete(delete_item))
        .route("/{id}/movements", get(item_movements))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    pub name: String,
    pub model: Option<String>,
    pub serial_number: String,
    pub project_category: Option<String>,
    pub description: Option<String>,
    pub supplier: Option<String>,
    #[serde(default)]
    pub quantity: i32,
    pub storage_location: String,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub date_added: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub name: String,
    pub model: Option<String>,
    pub serial_number: String,
    pub project_category: Option<String>,
    pub description: Option<String>,
    pub supplier: Option<String>,
    pub quantity: i32,
    pub storage_location: String,
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Substring to match against item names
    pub name: String,
    pub limit: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/items",
    params(("page" = u64, Query, description = "Page number"), ("limit" = u64, Query, description = "Page size")),
    responses(
        (status = 200, description = "Item list returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<item::Model>> {
    let (items, total) = state
        .inventory_service
        .list_items(query.page, query.limit)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items,
        total,
        query.page,
        query.limit,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = item::Model),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate serial number", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn create_item(
    State(state): State<AppState>,
    Json(req): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state
        .inventory_service
        .create_item(CreateItemCommand {
            name: req.name,
            model: req.model,
            serial_number: req.serial_number,
            project_category: req.project_category,
            description: req.description,
            supplier: req.supplier,
            quantity: req.quantity,
            storage_location: req.storage_location,
            status: req.status,
            notes: req.notes,
            date_added: req.date_added,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    params(("id" = Uuid, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item returned", body = item::Model),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<item::Model> {
    let found = state.inventory_service.get_item(id).await?;
    Ok(Json(ApiResponse::success(found)))
}

#[utoipa::path(
    get,
    path = "/api/v1/items/by-serial/{serial}",
    params(("serial" = String, Path, description = "Serial number")),
    responses(
        (status = 200, description = "Item returned", body = item::Model),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn get_item_by_serial(
    State(state): State<AppState>,
    Path(serial): Path<String>,
) -> ApiResult<item::Model> {
    let found = state.inventory_service.get_item_by_serial(serial).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// Name search backing the autocomplete widget in the presentation layer.
#[utoipa::path(
    get,
    path = "/api/v1/items/search",
    params(SearchParams),
    responses((status = 200, description = "Matching items returned")),
    tag = "items"
)]
pub async fn search_items(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<item::Model>> {
    let matches = state
        .inventory_service
        .search_items(params.name, params.limit.unwrap_or(20))
        .await?;
    Ok(Json(ApiResponse::success(matches)))
}

#[utoipa::path(
    put,
    path = "/api/v1/items/{id}",
    params(("id" = Uuid, Path, description = "Item id")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = item::Model),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate serial number", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateItemRequest>,
) -> ApiResult<item::Model> {
    let updated = state
        .inventory_service
        .update_item(UpdateItemCommand {
            item_id: id,
            name: req.name,
            model: req.model,
            serial_number: req.serial_number,
            project_category: req.project_category,
            description: req.description,
            supplier: req.supplier,
            quantity: req.quantity,
            storage_location: req.storage_location,
            status: req.status,
            notes: req.notes,
        })
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    params(("id" = Uuid, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item and its movements deleted", body = DeleteItemResult),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<DeleteItemResult> {
    let result = state.inventory_service.delete_item(id).await?;
    Ok(Json(ApiResponse::success(result)))
}

#[utoipa::path(
    get,
    path = "/api/v1/items/{id}/movements",
    params(("id" = Uuid, Path, description = "Item id")),
    responses(
        (status = 200, description = "Movement history returned"),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn item_movements(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<stock_movement::Model>> {
    let movements = state.inventory_service.movements_for_item(id).await?;
    Ok(Json(ApiResponse::success(movements)))
}
