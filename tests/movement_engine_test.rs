//! End-to-end tests for the movement-application engine: quantity and
//! location mutation per movement type, transfer splits, damaged
//! propagation, and rejection paths that must leave state untouched.

mod common;

use assert_matches::assert_matches;
use common::{item_fixture, setup_service};
use sea_orm::EntityTrait;
use stockroom_api::{
    commands::movements::RecordMovementCommand,
    entities::stock_movement::Entity as StockMovement,
    errors::ServiceError,
};
use uuid::Uuid;

fn movement(item_id: Uuid, movement_type: &str, quantity: i32) -> RecordMovementCommand {
    RecordMovementCommand {
        item_id,
        movement_type: movement_type.to_string(),
        quantity,
        from_location: None,
        to_location: None,
        from_project: None,
        to_project: None,
        status: None,
        date: None,
        notes: None,
    }
}

#[tokio::test]
async fn in_movement_increases_quantity_and_moves_location() {
    let (_db, service) = setup_service().await;
    let item = service
        .create_item(item_fixture("Theodolite", "TH-100", 10, "stores"))
        .await
        .expect("create item");

    let result = service
        .record_movement(RecordMovementCommand {
            to_location: Some("office".to_string()),
            ..movement(item.id, "in", 5)
        })
        .await
        .expect("record in movement");

    assert_eq!(result.item.quantity, 15);
    assert_eq!(result.item.storage_location, "office");
    assert!(result.derived_item.is_none());
    assert_eq!(result.movement.movement_type, "in");
    assert_eq!(result.movement.quantity, 5);
}

#[tokio::test]
async fn in_movement_without_destination_keeps_location() {
    let (_db, service) = setup_service().await;
    let item = service
        .create_item(item_fixture("Level", "LV-200", 3, "container"))
        .await
        .expect("create item");

    let result = service
        .record_movement(movement(item.id, "in", 2))
        .await
        .expect("record in movement");

    assert_eq!(result.item.quantity, 5);
    assert_eq!(result.item.storage_location, "container");
}

#[tokio::test]
async fn out_movement_decreases_quantity_and_sets_location() {
    let (_db, service) = setup_service().await;
    let item = service
        .create_item(item_fixture("GPS Receiver", "GPS-1", 10, "stores"))
        .await
        .expect("create item");

    let result = service
        .record_movement(RecordMovementCommand {
            to_location: Some("Field Work".to_string()),
            ..movement(item.id, "out", 4)
        })
        .await
        .expect("record out movement");

    assert_eq!(result.item.quantity, 6);
    assert_eq!(result.item.storage_location, "field work");
}

#[tokio::test]
async fn insufficient_quantity_is_rejected_and_leaves_state_untouched() {
    let (db, service) = setup_service().await;
    let item = service
        .create_item(item_fixture("Drone", "DR-5", 5, "stores"))
        .await
        .expect("create item");

    let err = service
        .record_movement(movement(item.id, "out", 20))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InsufficientQuantity(_));

    // Neither the item nor the ledger moved.
    let unchanged = service.get_item(item.id).await.expect("reload item");
    assert_eq!(unchanged.quantity, 5);
    assert_eq!(unchanged.storage_location, "stores");
    let ledger = StockMovement::find()
        .all(db.as_ref())
        .await
        .expect("query ledger");
    assert!(ledger.is_empty());
}

#[tokio::test]
async fn transfer_splits_off_a_derived_item() {
    let (_db, service) = setup_service().await;
    let item = service
        .create_item(item_fixture("Radio", "SN-1", 5, "stores"))
        .await
        .expect("create item");

    let result = service
        .record_movement(RecordMovementCommand {
            to_location: Some("Container".to_string()),
            to_project: Some("ProjectX".to_string()),
            ..movement(item.id, "transferred", 3)
        })
        .await
        .expect("record transfer");

    assert_eq!(result.item.quantity, 2);
    // The source keeps its location on transfers.
    assert_eq!(result.item.storage_location, "stores");

    let derived = result.derived_item.expect("transfer derives an item");
    assert_eq!(derived.quantity, 3);
    assert_eq!(derived.storage_location, "container");
    assert_eq!(derived.project_category.as_deref(), Some("ProjectX"));
    assert!(derived.serial_number.starts_with("SN-1-TR"));
    assert_ne!(derived.serial_number, item.serial_number);
    assert_eq!(derived.name, item.name);
    assert_eq!(derived.supplier, item.supplier);
    // Provenance falls back to the source's own project and location.
    assert_eq!(
        derived.notes.as_deref(),
        Some("Transferred from Survey (stores)")
    );

    // The ledger row belongs to the source item.
    let history = service
        .movements_for_item(item.id)
        .await
        .expect("movement history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].movement_type, "transferred");
    let derived_history = service
        .movements_for_item(derived.id)
        .await
        .expect("derived history");
    assert!(derived_history.is_empty());
}

#[tokio::test]
async fn transfer_provenance_prefers_movement_fields() {
    let (_db, service) = setup_service().await;
    let item = service
        .create_item(item_fixture("Radio", "SN-9", 4, "stores"))
        .await
        .expect("create item");

    let result = service
        .record_movement(RecordMovementCommand {
            from_location: Some("office".to_string()),
            from_project: Some("Baseline".to_string()),
            to_location: Some("container".to_string()),
            to_project: Some("ProjectY".to_string()),
            ..movement(item.id, "transferred", 1)
        })
        .await
        .expect("record transfer");

    let derived = result.derived_item.expect("transfer derives an item");
    assert_eq!(
        derived.notes.as_deref(),
        Some("Transferred from Baseline (office)")
    );
}

#[tokio::test]
async fn transfer_without_destination_is_rejected() {
    let (_db, service) = setup_service().await;
    let item = service
        .create_item(item_fixture("Camera", "CAM-1", 4, "stores"))
        .await
        .expect("create item");

    let err = service
        .record_movement(movement(item.id, "transferred", 2))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidInput(_));

    let unchanged = service.get_item(item.id).await.expect("reload item");
    assert_eq!(unchanged.quantity, 4);
}

#[tokio::test]
async fn repeated_transfers_mint_unique_serials() {
    let (_db, service) = setup_service().await;
    let item = service
        .create_item(item_fixture("Tripod", "TP-7", 10, "stores"))
        .await
        .expect("create item");

    let mut serials = Vec::new();
    for _ in 0..3 {
        let result = service
            .record_movement(RecordMovementCommand {
                to_location: Some("office".to_string()),
                ..movement(item.id, "transferred", 1)
            })
            .await
            .expect("record transfer");
        let derived = result.derived_item.expect("transfer derives an item");
        assert!(derived.serial_number.starts_with("TP-7-TR"));
        serials.push(derived.serial_number);
    }

    serials.sort();
    serials.dedup();
    assert_eq!(serials.len(), 3, "derived serials must not collide");
}

#[tokio::test]
async fn damaged_movement_marks_the_item() {
    let (_db, service) = setup_service().await;
    let item = service
        .create_item(item_fixture("Generator", "GEN-1", 2, "stores"))
        .await
        .expect("create item");

    let result = service
        .record_movement(RecordMovementCommand {
            status: Some("damaged".to_string()),
            ..movement(item.id, "in", 1)
        })
        .await
        .expect("record damaged movement");

    assert!(result.item_marked_damaged);
    assert_eq!(result.item.status, "damaged");

    // A later non-damaged movement never reverts the item.
    let follow_up = service
        .record_movement(RecordMovementCommand {
            status: Some("active".to_string()),
            ..movement(item.id, "in", 1)
        })
        .await
        .expect("record follow-up movement");
    assert!(!follow_up.item_marked_damaged);
    assert_eq!(follow_up.item.status, "damaged");
}

#[tokio::test]
async fn status_correction_propagates_damage_once() {
    let (_db, service) = setup_service().await;
    let item = service
        .create_item(item_fixture("Pump", "PMP-1", 2, "stores"))
        .await
        .expect("create item");

    let recorded = service
        .record_movement(movement(item.id, "in", 1))
        .await
        .expect("record movement");
    assert_eq!(recorded.item.status, "active");

    let corrected = service
        .correct_movement_status(recorded.movement.id, "damaged".to_string())
        .await
        .expect("correct status");
    assert!(corrected.item_marked_damaged);
    assert_eq!(corrected.movement.status, "damaged");
    assert_eq!(corrected.old_status, "active");

    let flagged = service.get_item(item.id).await.expect("reload item");
    assert_eq!(flagged.status, "damaged");

    // Correcting back to active keeps the item damaged.
    let reverted = service
        .correct_movement_status(recorded.movement.id, "active".to_string())
        .await
        .expect("correct status back");
    assert!(!reverted.item_marked_damaged);
    let still_flagged = service.get_item(item.id).await.expect("reload item");
    assert_eq!(still_flagged.status, "damaged");
}

#[tokio::test]
async fn non_positive_quantity_is_rejected() {
    let (_db, service) = setup_service().await;
    let item = service
        .create_item(item_fixture("Sensor", "SNS-1", 2, "stores"))
        .await
        .expect("create item");

    let err = service
        .record_movement(movement(item.id, "in", 0))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidQuantity(_));

    let err = service
        .record_movement(movement(item.id, "out", -3))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidQuantity(_));
}

#[tokio::test]
async fn unknown_movement_type_is_rejected() {
    let (_db, service) = setup_service().await;
    let item = service
        .create_item(item_fixture("Cable", "CB-1", 2, "stores"))
        .await
        .expect("create item");

    let err = service
        .record_movement(movement(item.id, "misplaced", 1))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidMovementType(_));
}

#[tokio::test]
async fn movement_against_missing_item_is_rejected() {
    let (_db, service) = setup_service().await;

    let err = service
        .record_movement(movement(Uuid::new_v4(), "in", 1))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn ledger_orders_history_newest_first() {
    let (_db, service) = setup_service().await;
    let item = service
        .create_item(item_fixture("Winch", "WN-1", 10, "stores"))
        .await
        .expect("create item");

    service
        .record_movement(movement(item.id, "in", 2))
        .await
        .expect("first movement");
    service
        .record_movement(movement(item.id, "out", 1))
        .await
        .expect("second movement");

    let history = service
        .movements_for_item(item.id)
        .await
        .expect("movement history");
    assert_eq!(history.len(), 2);
    assert!(history[0].date >= history[1].date);
}
