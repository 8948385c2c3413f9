pub mod quote_dto;
pub mod page_dto;
pub mod media_dto;
