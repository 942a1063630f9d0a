//! Loyalty

mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::LoyaltyServiceError;
pub use service::*;
