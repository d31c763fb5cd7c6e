//! Item store tests: CRUD round-trips, serial uniqueness, cascade delete,
//! lookup paths, and the reporting reads built on top of the store.

mod common;

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use common::{item_fixture, setup_service};
use sea_orm::EntityTrait;
use stockroom_api::{
    commands::{
        items::{CreateItemCommand, UpdateItemCommand},
        movements::RecordMovementCommand,
    },
    entities::stock_movement::Entity as StockMovement,
    errors::ServiceError,
};
use uuid::Uuid;

#[tokio::test]
async fn create_then_read_back_by_serial_round_trips() {
    let (_db, service) = setup_service().await;
    let date_added = Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap();

    let created = service
        .create_item(CreateItemCommand {
            date_added: Some(date_added),
            notes: Some("bench stock".to_string()),
            ..item_fixture("Multimeter", "MM-42", 7, "data office")
        })
        .await
        .expect("create item");

    let read_back = service
        .get_item_by_serial("MM-42".to_string())
        .await
        .expect("read back by serial");

    assert_eq!(read_back, created);
    assert_eq!(read_back.name, "Multimeter");
    assert_eq!(read_back.quantity, 7);
    assert_eq!(read_back.storage_location, "data office");
    assert_eq!(read_back.status, "active");
    assert_eq!(read_back.date_added, date_added);
}

#[tokio::test]
async fn duplicate_serial_is_rejected() {
    let (_db, service) = setup_service().await;
    service
        .create_item(item_fixture("Charger", "CH-1", 1, "stores"))
        .await
        .expect("create first item");

    let err = service
        .create_item(item_fixture("Other Charger", "CH-1", 1, "office"))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::DuplicateSerial(_));
}

#[tokio::test]
async fn invalid_location_is_rejected_at_the_boundary() {
    let (_db, service) = setup_service().await;

    let err = service
        .create_item(item_fixture("Ladder", "LD-1", 1, "warehouse 9"))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidLocation(_));
}

#[tokio::test]
async fn update_overwrites_editable_fields_but_not_identity() {
    let (_db, service) = setup_service().await;
    let created = service
        .create_item(item_fixture("Printer", "PR-1", 2, "office"))
        .await
        .expect("create item");

    let updated = service
        .update_item(UpdateItemCommand {
            item_id: created.id,
            name: "Large Format Printer".to_string(),
            model: Some("LFP-900".to_string()),
            serial_number: "PR-1-B".to_string(),
            project_category: Some("Drafting".to_string()),
            description: None,
            supplier: Some("Print Co".to_string()),
            quantity: 3,
            storage_location: "stores".to_string(),
            status: "inactive".to_string(),
            notes: None,
        })
        .await
        .expect("update item");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.date_added, created.date_added);
    assert_eq!(updated.name, "Large Format Printer");
    assert_eq!(updated.serial_number, "PR-1-B");
    assert_eq!(updated.quantity, 3);
    assert_eq!(updated.status, "inactive");
}

#[tokio::test]
async fn update_to_taken_serial_is_rejected() {
    let (_db, service) = setup_service().await;
    service
        .create_item(item_fixture("Router", "RT-1", 1, "stores"))
        .await
        .expect("create first item");
    let second = service
        .create_item(item_fixture("Switch", "SW-1", 1, "stores"))
        .await
        .expect("create second item");

    let err = service
        .update_item(UpdateItemCommand {
            item_id: second.id,
            name: second.name.clone(),
            model: second.model.clone(),
            serial_number: "RT-1".to_string(),
            project_category: second.project_category.clone(),
            description: second.description.clone(),
            supplier: second.supplier.clone(),
            quantity: second.quantity,
            storage_location: second.storage_location.clone(),
            status: second.status.clone(),
            notes: second.notes.clone(),
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::DuplicateSerial(_));
}

#[tokio::test]
async fn update_rejects_negative_quantity() {
    let (_db, service) = setup_service().await;
    let created = service
        .create_item(item_fixture("Scanner", "SC-1", 1, "stores"))
        .await
        .expect("create item");

    let err = service
        .update_item(UpdateItemCommand {
            item_id: created.id,
            name: created.name.clone(),
            model: created.model.clone(),
            serial_number: created.serial_number.clone(),
            project_category: created.project_category.clone(),
            description: created.description.clone(),
            supplier: created.supplier.clone(),
            quantity: -1,
            storage_location: created.storage_location.clone(),
            status: created.status.clone(),
            notes: created.notes.clone(),
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidQuantity(_));
}

#[tokio::test]
async fn delete_cascades_to_movements() {
    let (db, service) = setup_service().await;
    let created = service
        .create_item(item_fixture("Battery Pack", "BP-1", 10, "stores"))
        .await
        .expect("create item");

    for _ in 0..2 {
        service
            .record_movement(RecordMovementCommand {
                item_id: created.id,
                movement_type: "out".to_string(),
                quantity: 1,
                from_location: None,
                to_location: None,
                from_project: None,
                to_project: None,
                status: None,
                date: None,
                notes: None,
            })
            .await
            .expect("record movement");
    }

    let result = service.delete_item(created.id).await.expect("delete item");
    assert_eq!(result.movements_removed, 2);

    let err = service.get_item(created.id).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));

    let remaining = StockMovement::find()
        .all(db.as_ref())
        .await
        .expect("query ledger");
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn delete_of_missing_item_is_rejected() {
    let (_db, service) = setup_service().await;

    let err = service.delete_item(Uuid::new_v4()).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn name_lookup_and_search_feed_the_autocomplete() {
    let (_db, service) = setup_service().await;
    service
        .create_item(item_fixture("Total Station", "TS-1", 1, "stores"))
        .await
        .expect("create item");
    service
        .create_item(item_fixture("Total Station Tripod", "TS-2", 1, "stores"))
        .await
        .expect("create item");

    let exact = service
        .get_item_by_name("Total Station".to_string())
        .await
        .expect("exact lookup");
    assert_eq!(exact.serial_number, "TS-1");

    let matches = service
        .search_items("Total".to_string(), 10)
        .await
        .expect("search");
    assert_eq!(matches.len(), 2);

    let err = service
        .get_item_by_name("Missing".to_string())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn summary_counts_track_item_state() {
    let (_db, service) = setup_service().await;
    service
        .create_item(item_fixture("Helmet", "HM-1", 20, "stores"))
        .await
        .expect("create item");
    service
        .create_item(item_fixture("Gloves", "GL-1", 2, "stores"))
        .await
        .expect("create item");
    let vest = service
        .create_item(CreateItemCommand {
            project_category: Some("Safety".to_string()),
            ..item_fixture("Vest", "VS-1", 8, "office")
        })
        .await
        .expect("create item");

    // Damage the vest through a movement.
    service
        .record_movement(RecordMovementCommand {
            item_id: vest.id,
            movement_type: "out".to_string(),
            quantity: 1,
            from_location: None,
            to_location: None,
            from_project: None,
            to_project: None,
            status: Some("damaged".to_string()),
            date: None,
            notes: None,
        })
        .await
        .expect("record damaged movement");

    let summary = service.inventory_summary(5).await.expect("summary");
    assert_eq!(summary.total_items, 3);
    assert_eq!(summary.low_stock_items, 1);
    assert_eq!(summary.damaged_items, 1);
    let safety = summary
        .category_distribution
        .iter()
        .find(|c| c.project_category.as_deref() == Some("Safety"))
        .expect("safety category present");
    assert_eq!(safety.count, 1);

    let damaged = service.damaged_items().await.expect("damaged items");
    assert_eq!(damaged.len(), 1);
    assert_eq!(damaged[0].serial_number, "VS-1");

    let low = service.low_stock_items(5).await.expect("low stock");
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].serial_number, "GL-1");
}

#[tokio::test]
async fn export_snapshot_serializes_all_collections() {
    let (_db, service) = setup_service().await;
    let item = service
        .create_item(item_fixture("Compressor", "CMP-1", 5, "stores"))
        .await
        .expect("create item");
    service
        .record_movement(RecordMovementCommand {
            item_id: item.id,
            movement_type: "in".to_string(),
            quantity: 2,
            from_location: None,
            to_location: None,
            from_project: None,
            to_project: None,
            status: None,
            date: None,
            notes: None,
        })
        .await
        .expect("record movement");

    let snapshot = service.export_snapshot().await.expect("export snapshot");
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.movements.len(), 1);
    assert!(snapshot.damaged_items.is_empty());
}
