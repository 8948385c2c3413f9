//! Insurance Plaza backend: the quote request wizard and the page content
//! editor, served over HTTP and backed by MongoDB.

pub mod app;
pub mod config;
pub mod content;
pub mod dto;
pub mod handler;
pub mod middlewares;
pub mod model;
pub mod quote;
pub mod repository;
pub mod router;
pub mod service;
pub mod util;
