//! Larder
//!
//! Larder is the domain core of a grocery storefront: the device-local cart,
//! coupon evaluation, loyalty tiers and points, wallet views, checkout totals,
//! review validation and recommendation selection. Everything here is pure and
//! synchronous; talking to the hosted backend is left to `larder-app`.

pub mod cart;
pub mod checkout;
pub mod coupons;
pub mod discounts;
pub mod geo;
pub mod loyalty;
pub mod prelude;
pub mod pricing;
pub mod recommendations;
pub mod reviews;
pub mod wallet;
