use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

// Define the various events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Item events
    ItemCreated {
        item_id: Uuid,
        serial_number: String,
    },
    ItemUpdated {
        item_id: Uuid,
    },
    ItemDeleted {
        item_id: Uuid,
        movements_removed: u64,
    },

    // Movement events
    MovementRecorded {
        movement_id: Uuid,
        item_id: Uuid,
        movement_type: String,
        quantity: i32,
        new_item_quantity: i32,
    },
    TransferSplit {
        movement_id: Uuid,
        source_item_id: Uuid,
        derived_item_id: Uuid,
        quantity: i32,
    },
    MovementStatusChanged {
        movement_id: Uuid,
        old_status: String,
        new_status: String,
    },

    // Status propagation
    ItemMarkedDamaged {
        item_id: Uuid,
        movement_id: Uuid,
    },
}

/// Drains the event channel, logging each event.
///
/// Downstream consumers (webhook fan-out, notification digests) hang off
/// this loop; today every event is recorded through tracing only.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::ItemMarkedDamaged {
                item_id,
                movement_id,
            } => {
                warn!(
                    item_id = %item_id,
                    movement_id = %movement_id,
                    "Item marked damaged by movement"
                );
            }
            Event::TransferSplit {
                source_item_id,
                derived_item_id,
                quantity,
                ..
            } => {
                info!(
                    source_item_id = %source_item_id,
                    derived_item_id = %derived_item_id,
                    quantity = %quantity,
                    "Transfer split created derived item"
                );
            }
            other => {
                info!("Received event: {:?}", other);
            }
        }
    }

    info!("Event channel closed; stopping event processing loop");
}
