use crate::{
    commands::Command,
    db::DbPool,
    entities::item::{self, Entity as Item, ItemStatus, StorageLocation},
    errors::ServiceError,
    events::{Event, EventSender},
    metrics::ITEMS_CREATED,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionError,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateItemCommand {
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
    #[validate(range(min = 0))]
    pub quantity: i32,
    pub storage_location: String,
    /// Defaults to active when omitted
    pub status: Option<String>,
    pub notes: Option<String>,
    /// Defaults to submission time when omitted
    pub date_added: Option<DateTime<Utc>>,
}

#[async_trait::async_trait]
impl Command for CreateItemCommand {
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

        let location = StorageLocation::from_str(&self.storage_location).ok_or_else(|| {
            ServiceError::InvalidLocation(self.storage_location.clone())
        })?;
        let status = match &self.status {
            Some(raw) => {
                ItemStatus::from_str(raw).ok_or_else(|| ServiceError::InvalidStatus(raw.clone()))?
            }
            None => ItemStatus::default(),
        };

        let db = db_pool.as_ref();
        let now = Utc::now();
        let serial_number = self.serial_number.trim().to_string();
        let new_item = item::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(self.name.clone()),
            model: Set(self.model.clone()),
            serial_number: Set(serial_number.clone()),
            project_category: Set(self.project_category.clone()),
            description: Set(self.description.clone()),
            supplier: Set(self.supplier.clone()),
            quantity: Set(self.quantity),
            storage_location: Set(location.as_str().to_string()),
            status: Set(status.as_str().to_string()),
            notes: Set(self.notes.clone()),
            date_added: Set(self.date_added.unwrap_or(now)),
            updated_at: Set(now),
        };

        let created = db
            .transaction::<_, item::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let existing = Item::find()
                        .filter(item::Column::SerialNumber.eq(serial_number.clone()))
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?;
                    if existing.is_some() {
                        return Err(ServiceError::DuplicateSerial(serial_number));
                    }

                    new_item.insert(txn).await.map_err(ServiceError::db_error)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        info!(
            item_id = %created.id,
            serial_number = %created.serial_number,
            "Item created"
        );
        event_sender
            .send(Event::ItemCreated {
                item_id: created.id,
                serial_number: created.serial_number.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;
        ITEMS_CREATED.inc();

        Ok(created)
    }
}
