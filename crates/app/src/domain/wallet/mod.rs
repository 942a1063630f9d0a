//! Wallet

mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;
pub mod top_up;

pub use errors::WalletServiceError;
pub use service::*;
pub use top_up::{TopUpFlow, TopUpStatus};
