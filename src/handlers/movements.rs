use crate::{
    commands::movements::{RecordMovementCommand, RecordMovementResult, UpdateMovementStatusResult},
    entities::stock_movement,
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
use utoipa::ToSchema;
use uuid::Uuid;

/// Create the movements router
pub fn movements_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_movements).post(record_movement))
        .route("/{id}", get(get_movement))
        .route("/{id}/status", axum::routing::put(update_movement_status))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordMovementRequest {
    /// Identity of the item the movement applies to. Resolving a typed-in
    /// name to an id is the autocomplete collaborator's job.
    pub item_id: Uuid,
    pub movement_type: String,
    pub quantity: i32,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub from_project: Option<String>,
    pub to_project: Option<String>,
    pub status: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMovementStatusRequest {
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/movements",
    params(("page" = u64, Query, description = "Page number"), ("limit" = u64, Query, description = "Page size")),
    responses((status = 200, description = "Movement list returned, newest first")),
    tag = "movements"
)]
pub async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<stock_movement::Model>> {
    let (movements, total) = state
        .inventory_service
        .list_movements(query.page, query.limit)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        movements,
        total,
        query.page,
        query.limit,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/movements",
    request_body = RecordMovementRequest,
    responses(
        (status = 201, description = "Movement applied", body = RecordMovementResult),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient quantity", body = crate::errors::ErrorResponse)
    ),
    tag = "movements"
)]
pub async fn record_movement(
    State(state): State<AppState>,
    Json(req): Json<RecordMovementRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let applied = state
        .inventory_service
        .record_movement(RecordMovementCommand {
            item_id: req.item_id,
            movement_type: req.movement_type,
            quantity: req.quantity,
            from_location: req.from_location,
            to_location: req.to_location,
            from_project: req.from_project,
            to_project: req.to_project,
            status: req.status,
            date: req.date,
            notes: req.notes,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(applied))))
}

#[utoipa::path(
    get,
    path = "/api/v1/movements/{id}",
    params(("id" = Uuid, Path, description = "Movement id")),
    responses(
        (status = 200, description = "Movement returned", body = stock_movement::Model),
        (status = 404, description = "Movement not found", body = crate::errors::ErrorResponse)
    ),
    tag = "movements"
)]
pub async fn get_movement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<stock_movement::Model> {
    let found = state.inventory_service.get_movement(id).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// Status is the only field of a stored movement that can be edited; a
/// correction to damaged re-propagates onto the linked item.
#[utoipa::path(
    put,
    path = "/api/v1/movements/{id}/status",
    params(("id" = Uuid, Path, description = "Movement id")),
    request_body = UpdateMovementStatusRequest,
    responses(
        (status = 200, description = "Movement status corrected", body = UpdateMovementStatusResult),
        (status = 400, description = "Invalid status", body = crate::errors::ErrorResponse),
        (status = 404, description = "Movement not found", body = crate::errors::ErrorResponse)
    ),
    tag = "movements"
)]
pub async fn update_movement_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMovementStatusRequest>,
) -> ApiResult<UpdateMovementStatusResult> {
    let result = state
        .inventory_service
        .correct_movement_status(id, req.status)
        .await?;
    Ok(Json(ApiResponse::success(result)))
}
