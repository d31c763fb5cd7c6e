use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        item::{self, Entity as Item, ItemStatus},
        stock_movement::{self, Entity as StockMovement},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    metrics::ITEMS_MARKED_DAMAGED,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionError, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Post-hoc correction of a stored movement's status. The only mutable field
/// on a ledger row. Correcting a movement to damaged re-triggers propagation
/// onto the linked item; correcting it back never reverts the item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMovementStatusCommand {
    pub movement_id: Uuid,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateMovementStatusResult {
    pub movement: stock_movement::Model,
    pub old_status: String,
    pub item_marked_damaged: bool,
}

#[async_trait::async_trait]
impl Command for UpdateMovementStatusCommand {
    type Result = UpdateMovementStatusResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let status = ItemStatus::from_str(&self.status)
            .ok_or_else(|| ServiceError::InvalidStatus(self.status.clone()))?;

        let db = db_pool.as_ref();
        let movement_id = self.movement_id;

        let result = db
            .transaction::<_, UpdateMovementStatusResult, ServiceError>(move |txn| {
                Box::pin(async move {
                    let movement = StockMovement::find_by_id(movement_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Stock movement {} not found",
                                movement_id
                            ))
                        })?;

                    let old_status = movement.status.clone();
                    let item_id = movement.item_id;

                    let mut active: stock_movement::ActiveModel = movement.into();
                    active.status = Set(status.as_str().to_string());
                    let updated_movement =
                        active.update(txn).await.map_err(ServiceError::db_error)?;

                    let mut item_marked_damaged = false;
                    if status == ItemStatus::Damaged {
                        let linked = Item::find_by_id(item_id)
                            .one(txn)
                            .await
                            .map_err(ServiceError::db_error)?
                            .ok_or_else(|| {
                                ServiceError::NotFound(format!("Item {} not found", item_id))
                            })?;

                        if linked.status() != Some(ItemStatus::Damaged) {
                            let mut active_item: item::ActiveModel = linked.into();
                            active_item.status = Set(ItemStatus::Damaged.as_str().to_string());
                            active_item.updated_at = Set(Utc::now());
                            active_item
                                .update(txn)
                                .await
                                .map_err(ServiceError::db_error)?;
                            item_marked_damaged = true;
                        }
                    }

                    Ok(UpdateMovementStatusResult {
                        movement: updated_movement,
                        old_status,
                        item_marked_damaged,
                    })
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        info!(
            movement_id = %result.movement.id,
            old_status = %result.old_status,
            new_status = %result.movement.status,
            "Movement status corrected"
        );
        event_sender
            .send(Event::MovementStatusChanged {
                movement_id: result.movement.id,
                old_status: result.old_status.clone(),
                new_status: result.movement.status.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        if result.item_marked_damaged {
            ITEMS_MARKED_DAMAGED.inc();
            event_sender
                .send(Event::ItemMarkedDamaged {
                    item_id: result.movement.item_id,
                    movement_id: result.movement.id,
                })
                .await
                .map_err(ServiceError::EventError)?;
        }

        Ok(result)
    }
}
