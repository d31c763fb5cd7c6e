use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        item::{self, Entity as Item, ItemStatus, StorageLocation},
        stock_movement::{self, MovementType},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    metrics::{ITEMS_MARKED_DAMAGED, MOVEMENTS_RECORDED, MOVEMENT_FAILURES, TRANSFER_SPLITS},
};
use chrono::{DateTime, Utc};
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionError,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Attempts at minting a unique derived serial before giving up.
const SERIAL_MINT_ATTEMPTS: usize = 5;

/// Applies a stock movement against an item: validates it, mutates the item's
/// quantity/location, appends the ledger row, and for transfers splits off a
/// derived item. Everything happens in one transaction; a rejected movement
/// leaves all state untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordMovementCommand {
    pub item_id: Uuid,
    pub movement_type: String,
    pub quantity: i32,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    #[validate(length(max = 100))]
    pub from_project: Option<String>,
    #[validate(length(max = 100))]
    pub to_project: Option<String>,
    /// Defaults to active when omitted
    pub status: Option<String>,
    /// Defaults to submission time when omitted
    pub date: Option<DateTime<Utc>>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RecordMovementResult {
    pub movement: stock_movement::Model,
    /// Source item after the movement was applied
    pub item: item::Model,
    /// Present only for transfer movements
    pub derived_item: Option<item::Model>,
    /// Whether a damaged movement status flipped the source item
    pub item_marked_damaged: bool,
}

fn failure(label: &str) {
    MOVEMENT_FAILURES.with_label_values(&[label]).inc();
}

#[async_trait::async_trait]
impl Command for RecordMovementCommand {
    type Result = RecordMovementResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            failure("validation_error");
            let msg = format!("Invalid input: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        if self.quantity < 1 {
            failure("invalid_quantity");
            return Err(ServiceError::InvalidQuantity(format!(
                "movement quantity must be positive, got {}",
                self.quantity
            )));
        }
        let kind = MovementType::from_str(&self.movement_type).ok_or_else(|| {
            failure("invalid_movement_type");
            ServiceError::InvalidMovementType(self.movement_type.clone())
        })?;
        let status = match &self.status {
            Some(raw) => ItemStatus::from_str(raw).ok_or_else(|| {
                failure("invalid_status");
                ServiceError::InvalidStatus(raw.clone())
            })?,
            None => ItemStatus::default(),
        };
        let from_location = self
            .from_location
            .as_deref()
            .map(|raw| {
                StorageLocation::from_str(raw).ok_or_else(|| {
                    failure("invalid_location");
                    ServiceError::InvalidLocation(raw.to_string())
                })
            })
            .transpose()?;
        let to_location = self
            .to_location
            .as_deref()
            .map(|raw| {
                StorageLocation::from_str(raw).ok_or_else(|| {
                    failure("invalid_location");
                    ServiceError::InvalidLocation(raw.to_string())
                })
            })
            .transpose()?;
        if kind == MovementType::Transferred && to_location.is_none() {
            failure("missing_destination");
            return Err(ServiceError::InvalidInput(
                "transfer movements require a destination location".to_string(),
            ));
        }

        let now = Utc::now();
        let date = self.date.unwrap_or(now);
        // Pre-minted suffix candidates; thread_rng cannot cross the
        // transaction future.
        let serial_suffixes: Vec<String> = {
            let mut rng = rand::thread_rng();
            (0..SERIAL_MINT_ATTEMPTS)
                .map(|_| {
                    format!(
                        "TR{}{:04}",
                        date.format("%Y%m%d%H%M%S"),
                        rng.gen_range(0..10_000)
                    )
                })
                .collect()
        };

        let db = db_pool.as_ref();
        let command = self.clone();
        let quantity = self.quantity;

        let applied = db
            .transaction::<_, RecordMovementResult, ServiceError>(move |txn| {
                Box::pin(async move {
                    let source = Item::find_by_id(command.item_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Item {} not found", command.item_id))
                        })?;

                    if matches!(kind, MovementType::Out | MovementType::Transferred)
                        && source.quantity < quantity
                    {
                        return Err(ServiceError::InsufficientQuantity(format!(
                            "item {} holds {}, movement requires {}",
                            source.serial_number, source.quantity, quantity
                        )));
                    }

                    let mut new_quantity = source.quantity;
                    let mut new_location = source.storage_location.clone();
                    match kind {
                        MovementType::In => {
                            new_quantity += quantity;
                            if let Some(dest) = to_location {
                                new_location = dest.as_str().to_string();
                            }
                        }
                        MovementType::Out => {
                            new_quantity -= quantity;
                            if let Some(dest) = to_location {
                                new_location = dest.as_str().to_string();
                            }
                        }
                        // The source keeps its location; the transferred
                        // quantity lives on in the derived item.
                        MovementType::Transferred => {
                            new_quantity -= quantity;
                        }
                    }

                    let item_marked_damaged = status == ItemStatus::Damaged
                        && source.status() != Some(ItemStatus::Damaged);

                    let derived_item = if kind == MovementType::Transferred {
                        let dest = to_location.ok_or_else(|| {
                            ServiceError::InvalidInput(
                                "transfer movements require a destination location".to_string(),
                            )
                        })?;

                        let mut minted = None;
                        for suffix in &serial_suffixes {
                            let candidate = format!("{}-{}", source.serial_number, suffix);
                            let taken = Item::find()
                                .filter(item::Column::SerialNumber.eq(candidate.clone()))
                                .one(txn)
                                .await
                                .map_err(ServiceError::db_error)?;
                            if taken.is_none() {
                                minted = Some(candidate);
                                break;
                            }
                        }
                        let serial_number = minted.ok_or_else(|| {
                            ServiceError::InternalError(format!(
                                "could not mint a unique serial for transfer of {}",
                                source.serial_number
                            ))
                        })?;

                        let from_project_label = command
                            .from_project
                            .clone()
                            .or_else(|| source.project_category.clone())
                            .unwrap_or_else(|| "unassigned".to_string());
                        let from_location_label = from_location
                            .map(|l| l.as_str().to_string())
                            .unwrap_or_else(|| source.storage_location.clone());

                        let derived = item::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            name: Set(source.name.clone()),
                            model: Set(source.model.clone()),
                            serial_number: Set(serial_number),
                            project_category: Set(command.to_project.clone()),
                            description: Set(source.description.clone()),
                            supplier: Set(source.supplier.clone()),
                            quantity: Set(quantity),
                            storage_location: Set(dest.as_str().to_string()),
                            status: Set(ItemStatus::default().as_str().to_string()),
                            notes: Set(Some(format!(
                                "Transferred from {} ({})",
                                from_project_label, from_location_label
                            ))),
                            date_added: Set(date),
                            updated_at: Set(date),
                        };
                        Some(derived.insert(txn).await.map_err(ServiceError::db_error)?)
                    } else {
                        None
                    };

                    let mut active_source: item::ActiveModel = source.into();
                    active_source.quantity = Set(new_quantity);
                    active_source.storage_location = Set(new_location);
                    if item_marked_damaged {
                        active_source.status = Set(ItemStatus::Damaged.as_str().to_string());
                    }
                    active_source.updated_at = Set(Utc::now());
                    let updated_item = active_source
                        .update(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    // Ledger append happens on every branch.
                    let movement = stock_movement::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        item_id: Set(updated_item.id),
                        movement_type: Set(kind.as_str().to_string()),
                        quantity: Set(quantity),
                        from_location: Set(from_location.map(|l| l.as_str().to_string())),
                        to_location: Set(to_location.map(|l| l.as_str().to_string())),
                        from_project: Set(command.from_project.clone()),
                        to_project: Set(command.to_project.clone()),
                        status: Set(status.as_str().to_string()),
                        date: Set(date),
                        notes: Set(command.notes.clone()),
                        created_at: Set(Utc::now()),
                    }
                    .insert(txn)
                    .await
                    .map_err(ServiceError::db_error)?;

                    Ok(RecordMovementResult {
                        movement,
                        item: updated_item,
                        derived_item,
                        item_marked_damaged,
                    })
                })
            })
            .await
            .map_err(|e| {
                let service_err = match e {
                    TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                    TransactionError::Transaction(service_err) => service_err,
                };
                match &service_err {
                    ServiceError::NotFound(_) => failure("item_not_found"),
                    ServiceError::InsufficientQuantity(_) => failure("insufficient_quantity"),
                    _ => failure("transaction_error"),
                }
                service_err
            })?;

        self.log_and_trigger_events(&event_sender, &applied).await?;
        MOVEMENTS_RECORDED.with_label_values(&[kind.as_str()]).inc();

        Ok(applied)
    }
}

impl RecordMovementCommand {
    async fn log_and_trigger_events(
        &self,
        event_sender: &EventSender,
        result: &RecordMovementResult,
    ) -> Result<(), ServiceError> {
        info!(
            movement_id = %result.movement.id,
            item_id = %result.item.id,
            movement_type = %result.movement.movement_type,
            quantity = %result.movement.quantity,
            new_item_quantity = %result.item.quantity,
            "Stock movement recorded"
        );

        event_sender
            .send(Event::MovementRecorded {
                movement_id: result.movement.id,
                item_id: result.item.id,
                movement_type: result.movement.movement_type.clone(),
                quantity: result.movement.quantity,
                new_item_quantity: result.item.quantity,
            })
            .await
            .map_err(ServiceError::EventError)?;

        if let Some(derived) = &result.derived_item {
            TRANSFER_SPLITS.inc();
            event_sender
                .send(Event::TransferSplit {
                    movement_id: result.movement.id,
                    source_item_id: result.item.id,
                    derived_item_id: derived.id,
                    quantity: derived.quantity,
                })
                .await
                .map_err(ServiceError::EventError)?;
        }

        if result.item_marked_damaged {
            ITEMS_MARKED_DAMAGED.inc();
            event_sender
                .send(Event::ItemMarkedDamaged {
                    item_id: result.item.id,
                    movement_id: result.movement.id,
                })
                .await
                .map_err(ServiceError::EventError)?;
        }

        Ok(())
    }
}
