pub mod quote;
pub mod page;
pub mod settings;
pub mod media;
pub mod user;
