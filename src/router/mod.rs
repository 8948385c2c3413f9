pub mod quote_router;
pub mod page_router;
pub mod settings_router;
pub mod media_router;
pub mod user_router;
