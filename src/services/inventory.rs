use crate::{
    commands::{
        items::{CreateItemCommand, DeleteItemCommand, DeleteItemResult, UpdateItemCommand},
        movements::{
            RecordMovementCommand, RecordMovementResult, UpdateMovementStatusCommand,
            UpdateMovementStatusResult,
        },
        Command,
    },
    db::DbPool,
    entities::{item, stock_movement},
    errors::ServiceError,
    events::EventSender,
    queries::{
        item_queries::{
            GetDamagedItemsQuery, GetItemByNameQuery, GetItemBySerialQuery, GetItemQuery,
            GetLowStockItemsQuery, ListItemsQuery, SearchItemsByNameQuery,
        },
        movement_queries::{GetMovementQuery, ListMovementsForItemQuery, ListMovementsQuery},
        report_queries::{
            ExportSnapshot, GetExportSnapshotQuery, GetInventorySummaryQuery, InventorySummary,
        },
        Query,
    },
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Facade over the movement engine and the item store, used by the HTTP
/// handlers and by anything embedding the crate.
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl InventoryService {
    /// Creates a new inventory service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    // Write side

    #[instrument(skip(self, command))]
    pub async fn create_item(
        &self,
        command: CreateItemCommand,
    ) -> Result<item::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn update_item(
        &self,
        command: UpdateItemCommand,
    ) -> Result<item::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, item_id: Uuid) -> Result<DeleteItemResult, ServiceError> {
        DeleteItemCommand { item_id }
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    /// Runs a movement through the engine: validation, application, ledger
    /// append, and damaged propagation, atomically.
    #[instrument(skip(self, command))]
    pub async fn record_movement(
        &self,
        command: RecordMovementCommand,
    ) -> Result<RecordMovementResult, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn correct_movement_status(
        &self,
        movement_id: Uuid,
        status: String,
    ) -> Result<UpdateMovementStatusResult, ServiceError> {
        UpdateMovementStatusCommand {
            movement_id,
            status,
        }
        .execute(self.db_pool.clone(), self.event_sender.clone())
        .await
    }

    // Read side

    pub async fn get_item(&self, item_id: Uuid) -> Result<item::Model, ServiceError> {
        GetItemQuery { item_id }.execute(&self.db_pool).await
    }

    pub async fn get_item_by_serial(
        &self,
        serial_number: String,
    ) -> Result<item::Model, ServiceError> {
        GetItemBySerialQuery { serial_number }
            .execute(&self.db_pool)
            .await
    }

    pub async fn get_item_by_name(&self, name: String) -> Result<item::Model, ServiceError> {
        GetItemByNameQuery { name }.execute(&self.db_pool).await
    }

    pub async fn search_items(
        &self,
        name: String,
        limit: u64,
    ) -> Result<Vec<item::Model>, ServiceError> {
        SearchItemsByNameQuery { name, limit }
            .execute(&self.db_pool)
            .await
    }

    pub async fn list_items(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<item::Model>, u64), ServiceError> {
        ListItemsQuery { page, limit }.execute(&self.db_pool).await
    }

    pub async fn get_movement(
        &self,
        movement_id: Uuid,
    ) -> Result<stock_movement::Model, ServiceError> {
        GetMovementQuery { movement_id }
            .execute(&self.db_pool)
            .await
    }

    pub async fn list_movements(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<stock_movement::Model>, u64), ServiceError> {
        ListMovementsQuery { page, limit }
            .execute(&self.db_pool)
            .await
    }

    pub async fn movements_for_item(
        &self,
        item_id: Uuid,
    ) -> Result<Vec<stock_movement::Model>, ServiceError> {
        ListMovementsForItemQuery { item_id }
            .execute(&self.db_pool)
            .await
    }

    pub async fn low_stock_items(
        &self,
        threshold: i32,
    ) -> Result<Vec<item::Model>, ServiceError> {
        GetLowStockItemsQuery { threshold }
            .execute(&self.db_pool)
            .await
    }

    pub async fn damaged_items(&self) -> Result<Vec<item::Model>, ServiceError> {
        GetDamagedItemsQuery.execute(&self.db_pool).await
    }

    pub async fn inventory_summary(
        &self,
        low_stock_threshold: i32,
    ) -> Result<InventorySummary, ServiceError> {
        GetInventorySummaryQuery {
            low_stock_threshold,
        }
        .execute(&self.db_pool)
        .await
    }

    pub async fn export_snapshot(&self) -> Result<ExportSnapshot, ServiceError> {
        GetExportSnapshotQuery.execute(&self.db_pool).await
    }
}
