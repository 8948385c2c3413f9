pub mod repository_error;
pub mod quote_repo;
pub mod page_repo;
pub mod settings_repo;
pub mod media_repo;
pub mod user_repo;
