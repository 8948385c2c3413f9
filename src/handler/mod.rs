pub mod quote_handler;
pub mod page_handler;
pub mod settings_handler;
pub mod media_handler;
pub mod user_handler;
