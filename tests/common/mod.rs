use std::sync::Arc;

use stockroom_api::{
    commands::items::CreateItemCommand,
    db::{establish_connection_with_config, run_migrations, DbConfig, DbPool},
    events::{process_events, EventSender},
    services::InventoryService,
};
use tokio::sync::mpsc;

/// Connects to a fresh in-memory database, runs migrations, and wires an
/// inventory service with a live event loop.
///
/// One connection only: every pooled connection to `sqlite::memory:` would
/// otherwise open its own empty database. The private (non-shared-cache)
/// URL keeps concurrently running tests isolated from each other.
pub async fn setup_service() -> (Arc<DbPool>, InventoryService) {
    let cfg = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let pool = establish_connection_with_config(&cfg)
        .await
        .expect("failed to connect to in-memory database");
    run_migrations(&pool).await.expect("failed to run migrations");
    let db = Arc::new(pool);

    let (tx, rx) = mpsc::channel(100);
    tokio::spawn(process_events(rx));

    let service = InventoryService::new(db.clone(), Arc::new(EventSender::new(tx)));
    (db, service)
}

pub fn item_fixture(name: &str, serial: &str, quantity: i32, location: &str) -> CreateItemCommand {
    CreateItemCommand {
        name: name.to_string(),
        model: Some("MK-II".to_string()),
        serial_number: serial.to_string(),
        project_category: Some("Survey".to_string()),
        description: Some(format!("{} test unit", name)),
        supplier: Some("Acme Supplies".to_string()),
        quantity,
        storage_location: location.to_string(),
        status: None,
        notes: None,
        date_added: None,
    }
}
