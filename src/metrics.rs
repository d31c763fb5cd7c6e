use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    pub static ref ITEMS_CREATED: IntCounter = register_int_counter!(
        "stockroom_items_created_total",
        "Total number of items created"
    )
    .expect("metric can be created");
    pub static ref ITEMS_DELETED: IntCounter = register_int_counter!(
        "stockroom_items_deleted_total",
        "Total number of items deleted"
    )
    .expect("metric can be created");
    pub static ref MOVEMENTS_RECORDED: IntCounterVec = register_int_counter_vec!(
        "stockroom_movements_recorded_total",
        "Total number of stock movements recorded",
        &["movement_type"]
    )
    .expect("metric can be created");
    pub static ref MOVEMENT_FAILURES: IntCounterVec = register_int_counter_vec!(
        "stockroom_movement_failures_total",
        "Total number of rejected stock movements",
        &["error_type"]
    )
    .expect("metric can be created");
    pub static ref TRANSFER_SPLITS: IntCounter = register_int_counter!(
        "stockroom_transfer_splits_total",
        "Total number of derived items created by transfers"
    )
    .expect("metric can be created");
    pub static ref ITEMS_MARKED_DAMAGED: IntCounter = register_int_counter!(
        "stockroom_items_marked_damaged_total",
        "Total number of items flipped to damaged by movement status"
    )
    .expect("metric can be created");
}

/// Renders all registered metrics in the Prometheus text format.
pub async fn metrics_handler() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}
