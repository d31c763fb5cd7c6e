pub mod create_item_command;
pub mod delete_item_command;
pub mod update_item_command;

pub use create_item_command::CreateItemCommand;
pub use delete_item_command::{DeleteItemCommand, DeleteItemResult};
pub use update_item_command::UpdateItemCommand;
