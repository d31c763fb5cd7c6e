//! Database entities for the two-table inventory layout.

pub mod item;
pub mod stock_movement;

pub use item::{ItemStatus, StorageLocation};
pub use stock_movement::{MovementStatus, MovementType};
