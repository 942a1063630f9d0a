//! Larder Domain Concerns

pub mod catalog;
pub mod coupons;
pub mod loyalty;
pub mod orders;
pub mod recommendations;
pub mod reviews;
pub mod users;
pub mod wallet;
