use crate::{
    entities::{
        item::{self, Entity as Item, ItemStatus},
        stock_movement::{self, Entity as StockMovement},
    },
    errors::ServiceError,
    queries::Query,
};
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Item count per project category.
#[derive(Debug, FromQueryResult, Serialize, Deserialize, ToSchema)]
pub struct CategoryCount {
    pub project_category: Option<String>,
    pub count: i64,
}

/// Headline numbers for the dashboard collaborator.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InventorySummary {
    pub total_items: u64,
    pub low_stock_items: u64,
    pub damaged_items: u64,
    pub category_distribution: Vec<CategoryCount>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetInventorySummaryQuery {
    pub low_stock_threshold: i32,
}

#[async_trait]
impl Query for GetInventorySummaryQuery {
    type Result = InventorySummary;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let total_items = Item::find()
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;

        let low_stock_items = Item::find()
            .filter(item::Column::Quantity.lt(self.low_stock_threshold))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;

        let damaged_items = Item::find()
            .filter(item::Column::Status.eq(ItemStatus::Damaged.as_str()))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;

        let category_distribution = Item::find()
            .select_only()
            .column(item::Column::ProjectCategory)
            .column_as(item::Column::Id.count(), "count")
            .group_by(item::Column::ProjectCategory)
            .into_model::<CategoryCount>()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(InventorySummary {
            total_items,
            low_stock_items,
            damaged_items,
            category_distribution,
        })
    }
}

/// Full collections handed to the export collaborator; it owns the tabular
/// file format, this query only supplies the rows.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExportSnapshot {
    pub items: Vec<item::Model>,
    pub movements: Vec<stock_movement::Model>,
    pub damaged_items: Vec<item::Model>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetExportSnapshotQuery;

#[async_trait]
impl Query for GetExportSnapshotQuery {
    type Result = ExportSnapshot;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let items = Item::find()
            .order_by_asc(item::Column::Name)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let movements = StockMovement::find()
            .order_by_desc(stock_movement::Column::Date)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let damaged_items = items
            .iter()
            .filter(|i| i.status() == Some(ItemStatus::Damaged))
            .cloned()
            .collect();

        Ok(ExportSnapshot {
            items,
            movements,
            damaged_items,
        })
    }
}
