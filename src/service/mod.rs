pub mod quote_service;
pub mod page_service;
pub mod settings_service;
pub mod media_service;
pub mod user_service;
