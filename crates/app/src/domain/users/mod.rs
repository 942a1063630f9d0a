//! Users
//!
//! Shoppers are owned by the hosted auth provider; only their id is used here.

use crate::uuids::TypedUuid;

/// Marker for shopper ids.
#[derive(Debug)]
pub struct UserRecord;

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;
