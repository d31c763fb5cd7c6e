use crate::{
    entities::item,
    queries::report_queries::{ExportSnapshot, InventorySummary},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

/// Create the reports router
pub fn reports_router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(summary))
        .route("/damaged", get(damaged_items))
        .route("/low-stock", get(low_stock_items))
        .route("/export", get(export_snapshot))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LowStockParams {
    /// Overrides the configured low-stock threshold
    pub threshold: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/summary",
    responses((status = 200, description = "Dashboard summary returned", body = InventorySummary)),
    tag = "reports"
)]
pub async fn summary(State(state): State<AppState>) -> ApiResult<InventorySummary> {
    let summary = state
        .inventory_service
        .inventory_summary(state.config.low_stock_threshold)
        .await?;
    Ok(Json(ApiResponse::success(summary)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/damaged",
    responses((status = 200, description = "Damaged items returned")),
    tag = "reports"
)]
pub async fn damaged_items(State(state): State<AppState>) -> ApiResult<Vec<item::Model>> {
    let items = state.inventory_service.damaged_items().await?;
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/low-stock",
    params(LowStockParams),
    responses((status = 200, description = "Low stock items returned")),
    tag = "reports"
)]
pub async fn low_stock_items(
    State(state): State<AppState>,
    Query(params): Query<LowStockParams>,
) -> ApiResult<Vec<item::Model>> {
    let threshold = params
        .threshold
        .unwrap_or(state.config.low_stock_threshold);
    let items = state.inventory_service.low_stock_items(threshold).await?;
    Ok(Json(ApiResponse::success(items)))
}

/// Full item/movement/damaged collections for the export collaborator.
#[utoipa::path(
    get,
    path = "/api/v1/reports/export",
    responses((status = 200, description = "Export snapshot returned", body = ExportSnapshot)),
    tag = "reports"
)]
pub async fn export_snapshot(State(state): State<AppState>) -> ApiResult<ExportSnapshot> {
    let snapshot = state.inventory_service.export_snapshot().await?;
    Ok(Json(ApiResponse::success(snapshot)))
}
