//! Geocoding
//!
//! Lookups always answer 200; the `status` field says whether anything was
//! found or the geocoder was unavailable.

mod handlers;

pub(crate) use handlers::*;
