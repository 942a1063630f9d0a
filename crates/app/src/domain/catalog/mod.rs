//! Catalog
//!
//! Read-only access to products, their variants and categories.

pub mod data;
mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::CatalogServiceError;
pub use service::*;
