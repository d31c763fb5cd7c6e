pub mod record_movement_command;
pub mod update_movement_status_command;

pub use record_movement_command::{RecordMovementCommand, RecordMovementResult};
pub use update_movement_status_command::{
    UpdateMovementStatusCommand, UpdateMovementStatusResult,
};
