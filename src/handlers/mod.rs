pub mod health;
pub mod list;
pub mod get;
pub mod create;
pub mod update;
pub mod delete;

pub use health::health_handler;
pub use list::list_items;
pub use get::get_item;
pub use create::create_item;
pub use update::update_item;
pub use delete::delete_item;
