use crate::{
    entities::{
        item::Entity as Item,
        stock_movement::{self, Entity as StockMovement},
    },
    errors::ServiceError,
    queries::Query,
};
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct GetMovementQuery {
    pub movement_id: Uuid,
}

#[async_trait]
impl Query for GetMovementQuery {
    type Result = stock_movement::Model;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        StockMovement::find_by_id(self.movement_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Stock movement {} not found", self.movement_id))
            })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListMovementsQuery {
    pub page: u64,
    pub limit: u64,
}

#[async_trait]
impl Query for ListMovementsQuery {
    type Result = (Vec<stock_movement::Model>, u64);

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let paginator = StockMovement::find()
            .order_by_desc(stock_movement::Column::Date)
            .paginate(db, self.limit.max(1));

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let movements = paginator
            .fetch_page(self.page.max(1) - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((movements, total))
    }
}

/// Movement history for one item, newest first.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListMovementsForItemQuery {
    pub item_id: Uuid,
}

#[async_trait]
impl Query for ListMovementsForItemQuery {
    type Result = Vec<stock_movement::Model>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Item::find_by_id(self.item_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", self.item_id)))?;

        StockMovement::find()
            .filter(stock_movement::Column::ItemId.eq(self.item_id))
            .order_by_desc(stock_movement::Column::Date)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }
}
