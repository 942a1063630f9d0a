//! Loyalty Handlers

pub(crate) mod convert;
pub(crate) mod quote;
pub(crate) mod summary;
