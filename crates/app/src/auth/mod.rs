//! Authentication
//!
//! Shoppers sign in with the hosted auth provider; requests carry its access
//! token, which is exchanged for the shopper's id.

pub mod client;
mod errors;
mod service;

pub use client::{AuthClient, AuthConfig, AuthUser};
pub use errors::*;
pub use service::*;
