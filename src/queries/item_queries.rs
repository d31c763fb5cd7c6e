use crate::{
    entities::item::{self, Entity as Item, ItemStatus},
    errors::ServiceError,
    queries::Query,
};
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct GetItemQuery {
    pub item_id: Uuid,
}

#[async_trait]
impl Query for GetItemQuery {
    type Result = item::Model;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Item::find_by_id(self.item_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", self.item_id)))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetItemBySerialQuery {
    pub serial_number: String,
}

#[async_trait]
impl Query for GetItemBySerialQuery {
    type Result = item::Model;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Item::find()
            .filter(item::Column::SerialNumber.eq(self.serial_number.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Item with serial {} not found",
                    self.serial_number
                ))
            })
    }
}

/// Exact-name lookup. Kept for the autocomplete collaborator; movement
/// submission resolves items by id, never by name.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetItemByNameQuery {
    pub name: String,
}

#[async_trait]
impl Query for GetItemByNameQuery {
    type Result = item::Model;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Item::find()
            .filter(item::Column::Name.eq(self.name.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Item named {} not found", self.name)))
    }
}

/// Substring search over item names feeding the autocomplete widget.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchItemsByNameQuery {
    pub name: String,
    pub limit: u64,
}

#[async_trait]
impl Query for SearchItemsByNameQuery {
    type Result = Vec<item::Model>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Item::find()
            .filter(item::Column::Name.contains(self.name.clone()))
            .order_by_asc(item::Column::Name)
            .limit(self.limit)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListItemsQuery {
    pub page: u64,
    pub limit: u64,
}

#[async_trait]
impl Query for ListItemsQuery {
    type Result = (Vec<item::Model>, u64);

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let paginator = Item::find()
            .order_by_asc(item::Column::Name)
            .paginate(db, self.limit.max(1));

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(self.page.max(1) - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((items, total))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetLowStockItemsQuery {
    pub threshold: i32,
}

#[async_trait]
impl Query for GetLowStockItemsQuery {
    type Result = Vec<item::Model>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Item::find()
            .filter(item::Column::Quantity.lt(self.threshold))
            .order_by_asc(item::Column::Quantity)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetDamagedItemsQuery;

#[async_trait]
impl Query for GetDamagedItemsQuery {
    type Result = Vec<item::Model>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Item::find()
            .filter(item::Column::Status.eq(ItemStatus::Damaged.as_str()))
            .order_by_asc(item::Column::Name)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }
}
