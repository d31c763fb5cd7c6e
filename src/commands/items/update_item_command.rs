use crate::{
    commands::Command,
    db::DbPool,
    entities::item::{self, Entity as Item, ItemStatus, StorageLocation},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionError,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Full-record overwrite of an item's editable fields. Identity, `date_added`,
/// and movement links never change.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateItemCommand {
    pub item_id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 100))]
    pub model: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub serial_number: String,
    #[validate(length(max = 100))]
    pub project_category: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub supplier: Option<String>,
    pub quantity: i32,
    pub storage_location: String,
    pub status: String,
    pub notes: Option<String>,
}

#[async_trait::async_trait]
impl Command for UpdateItemCommand {
    type Result = item::Model;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            let msg = format!("Invalid input: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        if self.quantity < 0 {
            return Err(ServiceError::InvalidQuantity(format!(
                "quantity must be non-negative, got {}",
                self.quantity
            )));
        }
        let location = StorageLocation::from_str(&self.storage_location).ok_or_else(|| {
            ServiceError::InvalidLocation(self.storage_location.clone())
        })?;
        let status = ItemStatus::from_str(&self.status)
            .ok_or_else(|| ServiceError::InvalidStatus(self.status.clone()))?;

        let db = db_pool.as_ref();
        let command = self.clone();
        let serial_number = self.serial_number.trim().to_string();

        let updated = db
            .transaction::<_, item::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let current = Item::find_by_id(command.item_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Item {} not found", command.item_id))
                        })?;

                    if serial_number != current.serial_number {
                        let taken = Item::find()
                            .filter(item::Column::SerialNumber.eq(serial_number.clone()))
                            .filter(item::Column::Id.ne(command.item_id))
                            .one(txn)
                            .await
                            .map_err(ServiceError::db_error)?;
                        if taken.is_some() {
                            return Err(ServiceError::DuplicateSerial(serial_number));
                        }
                    }

                    let mut active: item::ActiveModel = current.into();
                    active.name = Set(command.name.clone());
                    active.model = Set(command.model.clone());
                    active.serial_number = Set(serial_number);
                    active.project_category = Set(command.project_category.clone());
                    active.description = Set(command.description.clone());
                    active.supplier = Set(command.supplier.clone());
                    active.quantity = Set(command.quantity);
                    active.storage_location = Set(location.as_str().to_string());
                    active.status = Set(status.as_str().to_string());
                    active.notes = Set(command.notes.clone());
                    active.updated_at = Set(Utc::now());

                    active.update(txn).await.map_err(ServiceError::db_error)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        info!(item_id = %updated.id, "Item updated");
        event_sender
            .send(Event::ItemUpdated {
                item_id: updated.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
