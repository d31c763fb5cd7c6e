use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        item::{self, Entity as Item},
        stock_movement::{self, Entity as StockMovement},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    metrics::ITEMS_DELETED,
};
use sea_orm::{ColumnTrait, EntityTrait, ModelTrait, QueryFilter, TransactionError, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteItemCommand {
    pub item_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteItemResult {
    pub item_id: Uuid,
    pub movements_removed: u64,
}

#[async_trait::async_trait]
impl Command for DeleteItemCommand {
    type Result = DeleteItemResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let db = db_pool.as_ref();
        let item_id = self.item_id;

        // Deleting an item takes its movement history with it.
        let movements_removed = db
            .transaction::<_, u64, ServiceError>(move |txn| {
                Box::pin(async move {
                    let existing = Item::find_by_id(item_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Item {} not found", item_id))
                        })?;

                    let removed = StockMovement::delete_many()
                        .filter(stock_movement::Column::ItemId.eq(item_id))
                        .exec(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .rows_affected;

                    existing
                        .delete(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    Ok(removed)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        info!(
            item_id = %item_id,
            movements_removed = %movements_removed,
            "Item deleted"
        );
        event_sender
            .send(Event::ItemDeleted {
                item_id,
                movements_removed,
            })
            .await
            .map_err(ServiceError::EventError)?;
        ITEMS_DELETED.inc();

        Ok(DeleteItemResult {
            item_id,
            movements_removed,
        })
    }
}
